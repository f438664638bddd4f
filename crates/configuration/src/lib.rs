use std::path::Path;
use tracing::debug;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{
    AnalysisSettings, Config, ForecastSettings, LoggingSettings, MAX_FORECAST_HORIZON,
    PanelSettings,
};

/// Loads the application configuration.
///
/// The file at `path` is optional; every value has a default. Environment variables prefixed
/// with `ECONTRENDS__` override file values, using `__` between section and key
/// (e.g. `ECONTRENDS__ANALYSIS__TOP_N=3`). The result is validated before it is returned.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("ECONTRENDS")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    debug!(path = %path.display(), ?config, "Configuration loaded");
    Ok(config)
}
