use crate::backend::BackendKind;
use crate::encode::EncodePolicy;
use crate::error::EncodeError;
use crate::record::Record;
use crate::serializer::JsonSerializer;

/// Serializer backed by `sonic-rs`.
///
/// Same contract as [`StandardSerializer`](crate::standard::StandardSerializer):
/// plain JSON shapes, string keys, non-ASCII written as-is, and `pretty`
/// as the only switch.
#[derive(Debug, Clone)]
pub struct FastTextSerializer {
    pretty: bool,
    policy: EncodePolicy,
}

impl FastTextSerializer {
    pub fn new(pretty: bool) -> Self {
        FastTextSerializer {
            pretty,
            policy: EncodePolicy::strict(),
        }
    }
}

impl JsonSerializer for FastTextSerializer {
    fn kind(&self) -> BackendKind {
        BackendKind::FastText
    }

    fn to_json(&self, record: &Record) -> Result<String, EncodeError> {
        let value = self.policy.record(record);
        let text = if self.pretty {
            sonic_rs::to_string_pretty(&value)
        } else {
            sonic_rs::to_string(&value)
        };
        text.map_err(|e| EncodeError::type_error(BackendKind::FastText, e))
    }
}
