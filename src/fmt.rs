use std::fmt::{self, Write as _};
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::record::{Map, Record};
use crate::serializer::JsonSerializer;
use crate::value::Value;

/// `tracing_subscriber` event formatter that renders each event as one
/// JSON document through a [`JsonSerializer`].
///
/// The formatter only produces text; the `fmt` layer it is installed on
/// owns the writer. Events that fail to serialize are reported to the layer
/// as [`fmt::Error`].
#[derive(Clone)]
pub struct JsonFormat {
    serializer: Arc<dyn JsonSerializer>,
    service_name: Option<String>,
}

impl JsonFormat {
    pub fn new(serializer: Arc<dyn JsonSerializer>) -> Self {
        JsonFormat {
            serializer,
            service_name: None,
        }
    }

    /// Attach a logical service name to every record as `service`.
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    /// Build the record for `event`.
    ///
    /// `span` is the name of the innermost entered span, if any.
    pub fn record_for(&self, event: &Event<'_>, span: Option<&str>) -> Record {
        let meta = event.metadata();

        let mut fields = Map::new();
        let mut message: Option<String> = None;
        let mut visitor = FieldVisitor {
            fields: &mut fields,
            message: &mut message,
        };
        event.record(&mut visitor);

        let mut record = Record::with_capacity(11);
        record.insert(
            "timestamp",
            Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        );
        record.insert("level", meta.level().as_str());
        record.insert("target", meta.target());
        record.insert("module", meta.module_path());
        record.insert("file", meta.file());
        record.insert("line", meta.line());
        record.insert("message", message);
        if let Some(span) = span {
            record.insert("span", span);
        }
        if let Some(service) = &self.service_name {
            record.insert("service", service.as_str());
        }
        record.insert("fields", fields);
        record
    }
}

impl fmt::Debug for JsonFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonFormat")
            .field("backend", &self.serializer.kind())
            .field("service_name", &self.service_name)
            .finish()
    }
}

impl<S, N> FormatEvent<S, N> for JsonFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let span = ctx.lookup_current();
        let record = self.record_for(event, span.as_ref().map(|s| s.name()));

        let line = self.serializer.to_json(&record).map_err(|_| fmt::Error)?;
        writer.write_str(&line)?;
        if !line.ends_with('\n') {
            writer.write_char('\n')?;
        }
        Ok(())
    }
}

/// Collects event fields; `message` is pulled out separately.
pub struct FieldVisitor<'a> {
    pub fields: &'a mut Map,
    pub message: &'a mut Option<String>,
}

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.fields.insert(field.name(), value);
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name(), value);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name(), value);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.fields.insert(field.name(), value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert(field.name(), value);
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let text = format!("{:?}", value);
        if field.name() == "message" {
            *self.message = Some(text);
        } else {
            self.fields.insert(field.name(), Value::Str(text));
        }
    }
}
