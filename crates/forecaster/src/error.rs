use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    #[error("No model trained for {0}")]
    UnknownCountry(String),
}
