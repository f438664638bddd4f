use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyzerError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
