use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::SerializerConfig;
use crate::error::ConfigError;
use crate::serializer::JsonSerializer;
use crate::standard::StandardSerializer;

/// Supported serializer backends that can be selected via config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// Option-bit driven byte encoder on `sonic-rs`.
    FastBinary,
    /// SIMD text encoder (`sonic-rs`).
    FastText,
    /// `serde_json`.
    Standard,
}

impl BackendKind {
    pub const ALL: [BackendKind; 3] = [
        BackendKind::FastBinary,
        BackendKind::FastText,
        BackendKind::Standard,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BackendKind::FastBinary => "fast-binary",
            BackendKind::FastText => "fast-text",
            BackendKind::Standard => "standard",
        }
    }

    /// Cargo feature that compiles this backend in, if it is optional.
    pub fn feature(self) -> Option<&'static str> {
        match self {
            BackendKind::FastBinary => Some("fast-binary"),
            BackendKind::FastText => Some("fast-text"),
            BackendKind::Standard => None,
        }
    }

    /// Whether this build links the backend's implementation.
    pub fn is_available(self) -> bool {
        match self {
            BackendKind::FastBinary => cfg!(feature = "fast-binary"),
            BackendKind::FastText => cfg!(feature = "fast-text"),
            BackendKind::Standard => true,
        }
    }

    #[cfg_attr(all(feature = "fast-binary", feature = "fast-text"), allow(dead_code))]
    fn unavailable(self) -> ConfigError {
        ConfigError::BackendUnavailable {
            backend: self,
            feature: self.feature().unwrap_or_default(),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse a backend name such as `"fast-binary"`.
///
/// Matching ignores ASCII case and surrounding whitespace; anything outside
/// the three known names is rejected.
impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        BackendKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigError::UnknownBackend(s.to_string()))
    }
}

/// Create a concrete [`JsonSerializer`] from a [`SerializerConfig`].
///
/// This is the single place where a backend is chosen. A backend whose
/// feature is not compiled in fails here, before any record is encoded;
/// there is no fallback to another backend.
pub fn make_serializer_from_config(
    cfg: &SerializerConfig,
) -> Result<Arc<dyn JsonSerializer>, ConfigError> {
    let bits = cfg.options.to_bits();
    if cfg.backend != BackendKind::FastBinary && !bits.is_empty() {
        warn!(
            backend = %cfg.backend,
            ignored = ?bits,
            "option flags are only honoured by the fast-binary backend"
        );
    }

    let serializer: Arc<dyn JsonSerializer> = match cfg.backend {
        BackendKind::FastBinary => {
            #[cfg(feature = "fast-binary")]
            {
                use crate::fast_binary::FastBinarySerializer;

                Arc::new(FastBinarySerializer::new(&cfg.options, cfg.encoding))
            }

            #[cfg(not(feature = "fast-binary"))]
            {
                return Err(BackendKind::FastBinary.unavailable());
            }
        }
        BackendKind::FastText => {
            #[cfg(feature = "fast-text")]
            {
                use crate::fast_text::FastTextSerializer;

                Arc::new(FastTextSerializer::new(cfg.pretty))
            }

            #[cfg(not(feature = "fast-text"))]
            {
                return Err(BackendKind::FastText.unavailable());
            }
        }
        BackendKind::Standard => Arc::new(StandardSerializer::new(cfg.pretty)),
    };

    debug!(
        backend = %cfg.backend,
        options = ?bits,
        pretty = cfg.pretty,
        encoding = %cfg.encoding,
        "resolved json serializer"
    );
    Ok(serializer)
}

/// Resolve a serializer from loosely typed inputs.
///
/// **Parameters**
/// - `backend_name`: `"fast-binary"`, `"fast-text"` or `"standard"`.
/// - `options`: option flags; only the fast-binary backend reads them.
/// - `pretty`: development mode; 2-space indentation on the fast-text and
///   standard backends.
/// - `text_encoding`: decoding of fast-binary output, e.g. `"utf-8"`.
///
/// **Returns**
/// - `Err(ConfigError)` for an unknown backend or encoding name, or for a
///   backend that is not compiled in.
pub fn resolve(
    backend_name: &str,
    options: &crate::options::OptionFlags,
    pretty: bool,
    text_encoding: &str,
) -> Result<Arc<dyn JsonSerializer>, ConfigError> {
    let cfg = SerializerConfig {
        backend: backend_name.parse()?,
        options: *options,
        pretty,
        encoding: text_encoding.parse()?,
    };
    make_serializer_from_config(&cfg)
}
