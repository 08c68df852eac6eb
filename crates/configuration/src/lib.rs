use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_logging;
pub use settings::{Config, Logging, Market};

/// The file read when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Prefix for environment overrides, e.g. `INSIGHT_MARKET__SYMBOL=^GSPC`.
pub const ENV_PREFIX: &str = "INSIGHT";

/// Loads the application configuration.
///
/// Built-in defaults are layered under the TOML file at `path` (or
/// `config.toml` in the working directory, which may be absent) and
/// environment variables. The result is validated before it is returned.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = match path {
        // An explicitly requested file must exist.
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .set_default("market.symbol", "^NSEI")?
        .set_default("market.start_date", "2000-01-01")?
        .set_default("market.data_dir", "data")?
        .set_default("logging.level", "info")?
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}
