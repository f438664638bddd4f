use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PanelError {
    #[error("Malformed row at index {index}: {reason}")]
    MalformedRow { index: usize, reason: String },

    #[error("Invalid year range: start {start} is after end {end}")]
    InvalidRange { start: i32, end: i32 },
}

impl PanelError {
    pub(crate) fn malformed(index: usize, reason: impl Into<String>) -> Self {
        PanelError::MalformedRow {
            index,
            reason: reason.into(),
        }
    }
}
