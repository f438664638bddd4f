use crate::error::ForecastError;
use crate::predictor::{RegressionModel, TrendPredictor};
use core_types::format::scaled_magnitude;

impl RegressionModel {
    /// A short human-readable description of the fitted trend.
    pub fn summary(&self) -> String {
        let trend = if self.slope > 0.0 {
            "increasing"
        } else {
            "decreasing"
        };

        format!(
            "{country} Trend Model\n\
             \n\
             - Trend: {trend} by approximately {slope} per year\n\
             - R² Score: {r2:.4} (model explains {variance:.1}% of variance)\n\
             - Mean Absolute Error: {mae}\n\
             - Model Equation: value = {slope_sci:.2e} × year + {intercept_sci:.2e}",
            country = self.country,
            slope = scaled_magnitude(self.slope, 2),
            r2 = self.r_squared,
            variance = self.r_squared * 100.0,
            mae = scaled_magnitude(self.mean_absolute_error, 2),
            slope_sci = self.slope,
            intercept_sci = self.intercept,
        )
    }
}

impl TrendPredictor {
    /// The summary of `country`'s model.
    ///
    /// # Errors
    ///
    /// `ForecastError::UnknownCountry` if no model is registered for `country`.
    pub fn summary(&self, country: &str) -> Result<String, ForecastError> {
        self.model(country)
            .map(RegressionModel::summary)
            .ok_or_else(|| ForecastError::UnknownCountry(country.to_string()))
    }
}
