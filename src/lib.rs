pub mod backend;
pub mod config;
mod encode;
pub mod encoding;
pub mod env;
pub mod error;
pub mod fmt;
pub mod init;
pub mod options;
pub mod record;
pub mod serializer;
pub mod standard;
pub mod value;

#[cfg(feature = "fast-binary")]
pub mod fast_binary;

#[cfg(feature = "fast-text")]
pub mod fast_text;

pub use backend::{make_serializer_from_config, resolve, BackendKind};
pub use config::SerializerConfig;
pub use encode::STRICT_INTEGER_MAX;
pub use encoding::TextEncoding;
pub use error::{ConfigError, EncodeError, Error};
pub use init::{init_logging, init_serializer, to_json};
pub use options::{Opt, OptionFlag, OptionFlags};
pub use record::Record;
pub use serializer::JsonSerializer;
pub use value::{Key, Value};
