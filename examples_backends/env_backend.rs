use tracing::{error, info};

use log_json_serializer::init::{init_logging_with_config, FormatConfig};
use log_json_serializer::SerializerConfig;

/// Select the backend through the environment, e.g.
///
///   LOGGING_SERIALIZER=fast-binary LOGGING_OPT_SORT_KEYS=1 \
///     cargo run --example env_backend
fn main() {
    let cfg = match SerializerConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("invalid logging configuration: {e}");
            std::process::exit(1);
        }
    };

    let format = FormatConfig {
        service_name: Some("env-backend-example".to_string()),
        ..FormatConfig::default()
    };
    if let Err(e) = init_logging_with_config(cfg, format) {
        eprintln!("failed to initialize logging: {e}");
        std::process::exit(1);
    }

    info!(backend = %cfg.backend, "starting service");

    error!(
        user_id = 42,
        reason = "invalid password",
        "authentication failed"
    );
}
