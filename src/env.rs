//! Environment variable names used by this crate for configuring the
//! serializer of a service.
//!
//! These are purely helpers; the serializers themselves never read the
//! environment.

/// Backend name: `fast-binary`, `fast-text` or `standard`.
pub const LOGGING_SERIALIZER_ENV: &str = "LOGGING_SERIALIZER";

/// Development mode; enables pretty output on the fast-text and standard backends.
pub const LOGGING_DEVELOP_ENV: &str = "LOGGING_DEVELOP";

/// Encoding used to decode fast-binary output, e.g. `utf-8`.
pub const LOGGING_ENCODING_ENV: &str = "LOGGING_ENCODING";

/// Optional logical service name added to every formatted record.
pub const LOGGING_SERVICE_NAME_ENV: &str = "LOGGING_SERVICE_NAME";

/// Prefix of the per-flag variables, e.g. `LOGGING_OPT_SORT_KEYS`.
pub const LOGGING_OPT_PREFIX: &str = "LOGGING_OPT_";

/// Interpret a configuration value as a boolean.
///
/// Returns `None` for anything that is not a recognised spelling.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
