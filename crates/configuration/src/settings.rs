use crate::error::ConfigError;
use chrono::{Datelike, Utc};
use core_types::YearRange;
use serde::Deserialize;

/// Upper bound for `forecast.horizon`, in years.
pub const MAX_FORECAST_HORIZON: u32 = 100;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub panel: PanelSettings,
    pub analysis: AnalysisSettings,
    pub forecast: ForecastSettings,
    pub logging: LoggingSettings,
}

/// Controls how raw rows become a `Panel`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PanelSettings {
    /// First year a row may carry.
    pub start_year: i32,
    /// Last year a row may carry. Defaults to last calendar year.
    pub end_year: i32,
    /// When true, one malformed row fails the whole load.
    pub strict: bool,
}

/// Parameters for movement detection and its display.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// How many rises and dips to keep per country.
    pub top_n: usize,
    /// Movements smaller than this (in absolute percent) are not displayed.
    pub min_abs_change_pct: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ForecastSettings {
    /// Nominal level of the prediction band. Recorded but not used in the band width.
    pub confidence: f64,
    /// Years ahead of each country's last observation to predict with bounds.
    pub horizon: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive, used when `RUST_LOG` is not set.
    pub filter: String,
    /// If set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<String>,
}

// --- Default Implementations ---
// This allows a user to omit any section from their toml and still have it work.

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            start_year: 1960,
            end_year: Utc::now().year() - 1,
            strict: false,
        }
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            top_n: 2,
            min_abs_change_pct: 0.0,
        }
    }
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            confidence: 0.95,
            horizon: 1,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            directory: None,
        }
    }
}

impl Config {
    /// Checks cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.year_range()?;
        if self.panel.start_year <= 0 {
            return Err(ConfigError::ValidationError(format!(
                "panel.start_year must be positive, got {}",
                self.panel.start_year
            )));
        }
        if self.analysis.top_n == 0 {
            return Err(ConfigError::ValidationError(
                "analysis.top_n must be at least 1".to_string(),
            ));
        }
        if !self.analysis.min_abs_change_pct.is_finite() || self.analysis.min_abs_change_pct < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "analysis.min_abs_change_pct must be a non-negative number, got {}",
                self.analysis.min_abs_change_pct
            )));
        }
        if !(self.forecast.confidence > 0.0 && self.forecast.confidence < 1.0) {
            return Err(ConfigError::ValidationError(format!(
                "forecast.confidence must be between 0 and 1, got {}",
                self.forecast.confidence
            )));
        }
        if self.forecast.horizon == 0 || self.forecast.horizon > MAX_FORECAST_HORIZON {
            return Err(ConfigError::ValidationError(format!(
                "forecast.horizon must be between 1 and {MAX_FORECAST_HORIZON}, got {}",
                self.forecast.horizon
            )));
        }
        Ok(())
    }

    /// The declared year range of the panel.
    pub fn year_range(&self) -> Result<YearRange, ConfigError> {
        Ok(YearRange::new(self.panel.start_year, self.panel.end_year)?)
    }
}
