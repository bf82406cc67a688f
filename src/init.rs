use std::sync::{Arc, OnceLock};

use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, Registry};

use crate::backend::make_serializer_from_config;
use crate::config::SerializerConfig;
use crate::env::LOGGING_SERVICE_NAME_ENV;
use crate::error::{ConfigError, Error};
use crate::fmt::JsonFormat;
use crate::record::Record;
use crate::serializer::JsonSerializer;

static SERIALIZER: OnceLock<Installed> = OnceLock::new();

/// Serializer stored in the global slot together with the configuration it
/// was resolved from.
struct Installed {
    config: SerializerConfig,
    serializer: Arc<dyn JsonSerializer>,
}

impl Installed {
    /// Whether `requested` asks for something other than what is installed.
    fn ignores(&self, requested: &SerializerConfig) -> bool {
        self.config != *requested
    }
}

/// Resolve `config` into the process-wide serializer.
///
/// The first successful call wins. Later calls, whatever their
/// configuration, return the serializer that is already installed; the
/// configuration is static for the lifetime of the process.
///
/// Concurrent first calls may each build a serializer, but only one is
/// stored and every caller gets that one.
pub fn init_serializer(config: SerializerConfig) -> Result<Arc<dyn JsonSerializer>, ConfigError> {
    let installed = install(&SERIALIZER, config)?;
    Ok(Arc::clone(&installed.serializer))
}

fn install(
    slot: &OnceLock<Installed>,
    config: SerializerConfig,
) -> Result<&Installed, ConfigError> {
    let installed = match slot.get() {
        Some(existing) => existing,
        None => {
            let serializer = make_serializer_from_config(&config)?;
            slot.get_or_init(|| Installed { config, serializer })
        }
    };
    if installed.ignores(&config) {
        debug!(
            requested = ?config,
            installed = ?installed.config,
            "serializer already initialized, keeping the installed configuration"
        );
    }
    Ok(installed)
}

/// Process-wide serializer, resolved from the environment on first use.
pub fn serializer() -> Result<Arc<dyn JsonSerializer>, ConfigError> {
    match SERIALIZER.get() {
        Some(existing) => Ok(Arc::clone(&existing.serializer)),
        None => init_serializer(SerializerConfig::from_env()?),
    }
}

/// Serialize `record` with the process-wide serializer.
pub fn to_json(record: &Record) -> Result<String, Error> {
    Ok(serializer()?.to_json(record)?)
}

/// Settings of the formatter installed by [`init_logging_with_config`].
///
/// **Fields**
/// - `max_level`: most verbose level that is formatted.
/// - `service_name`: optional `service` field added to every record.
#[derive(Clone, Debug)]
pub struct FormatConfig {
    pub max_level: LevelFilter,
    pub service_name: Option<String>,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            max_level: LevelFilter::INFO,
            service_name: std::env::var(LOGGING_SERVICE_NAME_ENV).ok(),
        }
    }
}

/// Install a global `tracing` subscriber that writes one JSON document per
/// event to stdout.
///
/// **Parameters**
/// - `serializer_config`: configuration handed to [`init_serializer`].
/// - `config`: [`FormatConfig`] for level filtering and the service name.
///
/// **Returns**
/// - `Err(Error::Config)` if the serializer cannot be resolved.
/// - `Err(Error::Subscriber)` if a global subscriber is already set.
pub fn init_logging_with_config(
    serializer_config: SerializerConfig,
    config: FormatConfig,
) -> Result<(), Error> {
    let serializer = init_serializer(serializer_config)?;

    let mut format = JsonFormat::new(serializer);
    if let Some(name) = config.service_name {
        format = format.with_service_name(name);
    }

    let layer = tracing_subscriber::fmt::layer()
        .event_format(format)
        .with_filter(config.max_level);
    let subscriber = Registry::default().with(layer);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Install the JSON subscriber with configuration read from the environment.
///
/// Equivalent to calling [`init_logging_with_config`] with
/// [`SerializerConfig::from_env`] and [`FormatConfig::default`].
pub fn init_logging() -> Result<(), Error> {
    init_logging_with_config(SerializerConfig::from_env()?, FormatConfig::default())
}
