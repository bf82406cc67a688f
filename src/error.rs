use crate::backend::BackendKind;
use crate::encoding::TextEncoding;

/// Error returned while resolving a serializer from configuration.
///
/// All of these are startup problems: none of them is ever produced while
/// encoding an individual record.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown serializer backend {0:?}, expected \"fast-binary\", \"fast-text\" or \"standard\"")]
    UnknownBackend(String),

    #[error("unknown text encoding {0:?}")]
    UnknownEncoding(String),

    #[error("unknown option flag {0:?}")]
    UnknownOption(String),

    #[error("invalid boolean value {value:?} for {key}")]
    InvalidFlag { key: String, value: String },

    #[error("{backend} backend is not available, rebuild with the `{feature}` feature")]
    BackendUnavailable {
        backend: BackendKind,
        feature: &'static str,
    },
}

/// Error returned when a single record cannot be encoded.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The record holds a key or value the active backend cannot represent.
    #[error("{backend} backend cannot encode record: {message}")]
    Type {
        backend: BackendKind,
        message: String,
    },

    /// Encoded bytes are not valid in the configured text encoding.
    #[error("encoded record is not valid {encoding}")]
    Decode { encoding: TextEncoding },
}

impl EncodeError {
    pub(crate) fn type_error(backend: BackendKind, err: impl std::fmt::Display) -> Self {
        EncodeError::Type {
            backend,
            message: err.to_string(),
        }
    }
}

/// Crate-level error used by the process-wide helpers.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("failed to install global subscriber: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}
