use crate::error::PanelError;
use serde::{Deserialize, Serialize};

/// A single indicator reading for one country in one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub country: String,
    pub country_code: String,
    pub year: i32,
    pub value: f64,
}

impl Observation {
    pub fn new(
        country: impl Into<String>,
        country_code: impl Into<String>,
        year: i32,
        value: f64,
    ) -> Self {
        Self {
            country: country.into(),
            country_code: country_code.into(),
            year,
            value,
        }
    }
}

/// An inclusive range of years a panel is allowed to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Result<Self, PanelError> {
        if start > end {
            return Err(PanelError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }
}
