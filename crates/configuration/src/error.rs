use core_types::PanelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from file: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid [panel] year range: {0}")]
    YearRange(#[from] PanelError),

    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}
