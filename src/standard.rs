use crate::backend::BackendKind;
use crate::encode::EncodePolicy;
use crate::error::EncodeError;
use crate::record::Record;
use crate::serializer::JsonSerializer;

/// Serializer backed by `serde_json`. Always compiled in.
///
/// Only plain JSON shapes with string keys are accepted; option flags do
/// not apply. `pretty` switches between compact output and 2-space
/// indentation.
#[derive(Debug, Clone)]
pub struct StandardSerializer {
    pretty: bool,
    policy: EncodePolicy,
}

impl StandardSerializer {
    pub fn new(pretty: bool) -> Self {
        StandardSerializer {
            pretty,
            policy: EncodePolicy::strict(),
        }
    }
}

impl JsonSerializer for StandardSerializer {
    fn kind(&self) -> BackendKind {
        BackendKind::Standard
    }

    fn to_json(&self, record: &Record) -> Result<String, EncodeError> {
        let value = self.policy.record(record);
        let text = if self.pretty {
            serde_json::to_string_pretty(&value)
        } else {
            serde_json::to_string(&value)
        };
        text.map_err(|e| EncodeError::type_error(BackendKind::Standard, e))
    }
}
