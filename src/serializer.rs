use crate::backend::BackendKind;
use crate::error::EncodeError;
use crate::record::Record;

/// Converts a [`Record`] into one JSON document.
///
/// Implementations hold only configuration that was fixed at resolution
/// time, so a single instance can be shared across threads and called
/// concurrently.
pub trait JsonSerializer: Send + Sync {
    /// Backend this serializer is built on.
    fn kind(&self) -> BackendKind;

    /// Serialize one record.
    ///
    /// **Returns**
    /// - `Ok(text)` with the JSON document. Whether it ends with a newline
    ///   depends on the backend configuration.
    /// - `Err(EncodeError::Type)` if the record holds a key or value the
    ///   backend cannot represent. Nothing is retried or substituted; the
    ///   caller decides whether to drop the record.
    fn to_json(&self, record: &Record) -> Result<String, EncodeError>;
}
