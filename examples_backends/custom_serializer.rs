use std::sync::Arc;

use log_json_serializer::fmt::JsonFormat;
use log_json_serializer::{record, BackendKind, EncodeError, JsonSerializer, Record};
use tracing::{error, info};

/// Example of plugging in a serializer that is not one of the built-in
/// backends by implementing `JsonSerializer` directly. This one wraps the
/// standard backend and prefixes each document with a record separator
/// for `application/json-seq` consumers.
struct JsonSeqSerializer {
    inner: Arc<dyn JsonSerializer>,
}

impl JsonSerializer for JsonSeqSerializer {
    fn kind(&self) -> BackendKind {
        self.inner.kind()
    }

    fn to_json(&self, record: &Record) -> Result<String, EncodeError> {
        Ok(format!("\u{1e}{}", self.inner.to_json(record)?))
    }
}

fn main() {
    let inner = log_json_serializer::resolve(
        "standard",
        &Default::default(),
        false,
        "utf-8",
    )
    .expect("standard backend is always available");
    let serializer: Arc<dyn JsonSerializer> = Arc::new(JsonSeqSerializer { inner });

    println!("{:?}", serializer.to_json(&record! { "direct" => true }));

    tracing_subscriber::fmt()
        .event_format(JsonFormat::new(serializer))
        .init();

    info!("custom serializer example started");
    error!(db = "my-custom-db", "simulated error sent via custom serializer");
}
