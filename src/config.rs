use crate::backend::BackendKind;
use crate::encoding::TextEncoding;
use crate::env::{
    parse_bool, LOGGING_DEVELOP_ENV, LOGGING_ENCODING_ENV, LOGGING_SERIALIZER_ENV,
};
use crate::error::ConfigError;
use crate::options::{OptionFlag, OptionFlags};

/// Static serializer configuration, read once at startup.
///
/// **Fields**
/// - `backend`: which [`BackendKind`] to build.
/// - `options`: option flags; only the fast-binary backend reads them.
/// - `pretty`: development mode, 2-space indentation on the fast-text and
///   standard backends.
/// - `encoding`: decoding of fast-binary output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializerConfig {
    pub backend: BackendKind,
    pub options: OptionFlags,
    pub pretty: bool,
    pub encoding: TextEncoding,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        SerializerConfig::new(BackendKind::Standard)
    }
}

impl SerializerConfig {
    pub fn new(backend: BackendKind) -> Self {
        SerializerConfig {
            backend,
            options: OptionFlags::new(),
            pretty: false,
            encoding: TextEncoding::Utf8,
        }
    }

    pub fn with_option(mut self, flag: OptionFlag) -> Self {
        self.options.set(flag, true);
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Load configuration from the process environment.
    ///
    /// See [`crate::env`] for the variable names. Unset variables fall back
    /// to the defaults of [`SerializerConfig::default`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &str| -> Result<bool, ConfigError> {
            match lookup(key) {
                None => Ok(false),
                Some(value) => parse_bool(&value).ok_or_else(|| ConfigError::InvalidFlag {
                    key: key.to_string(),
                    value,
                }),
            }
        };

        let mut cfg = SerializerConfig::default();
        if let Some(name) = lookup(LOGGING_SERIALIZER_ENV) {
            cfg.backend = name.parse()?;
        }
        if let Some(name) = lookup(LOGGING_ENCODING_ENV) {
            cfg.encoding = name.parse()?;
        }
        cfg.pretty = flag(LOGGING_DEVELOP_ENV)?;
        for option in OptionFlag::ALL {
            cfg.options.set(option, flag(option.env_key().as_str())?);
        }

        Ok(cfg)
    }
}
