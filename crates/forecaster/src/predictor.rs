use crate::error::ForecastError;
use crate::regression::LinearFit;
use core_types::{CountrySeries, Panel, YearRange};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info};

/// Countries with fewer observations than this get no model.
pub const MIN_TRAINING_POINTS: usize = 3;

/// Half-width of a prediction band, in multiples of the model's mean absolute error.
pub const BAND_MAE_MULTIPLIER: f64 = 2.0;

/// A linear trend `value = slope * year + intercept` fitted to one country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionModel {
    pub country: String,
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub mean_absolute_error: f64,
    pub trained_years: YearRange,
}

impl RegressionModel {
    /// Evaluates the line at `year`. Years outside `trained_years` are extrapolated without
    /// any guard.
    pub fn predict(&self, year: i32) -> f64 {
        self.slope * f64::from(year) + self.intercept
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub country: String,
    pub year: i32,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalPrediction {
    pub country: String,
    pub year: i32,
    pub value: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// Per-country linear trend models.
///
/// The registry belongs to whoever constructs the predictor; independent sessions should each
/// own their own instance. Every call to [`TrendPredictor::train`] discards the previous models.
#[derive(Debug, Default)]
pub struct TrendPredictor {
    models: IndexMap<String, RegressionModel>,
}

impl TrendPredictor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the registry from `panel`.
    ///
    /// Countries with fewer than [`MIN_TRAINING_POINTS`] observations are skipped and simply
    /// have no model afterwards.
    pub fn train(&mut self, panel: &Panel) -> &IndexMap<String, RegressionModel> {
        self.models = panel
            .series()
            .filter_map(|series| fit_series(series).map(|m| (m.country.clone(), m)))
            .collect();

        info!(
            trained = self.models.len(),
            skipped = panel.country_count() - self.models.len(),
            "Trained trend models"
        );
        &self.models
    }

    /// Predicts `country` at each of `years`.
    ///
    /// # Errors
    ///
    /// `ForecastError::UnknownCountry` if no model is registered for `country`.
    pub fn predict(&self, country: &str, years: &[i32]) -> Result<Vec<Prediction>, ForecastError> {
        let model = self
            .models
            .get(country)
            .ok_or_else(|| ForecastError::UnknownCountry(country.to_string()))?;

        Ok(years
            .iter()
            .map(|&year| Prediction {
                country: model.country.clone(),
                year,
                value: model.predict(year),
            })
            .collect())
    }

    /// Predicts one year past each country's last observation.
    ///
    /// Trains on `panel` only if the registry is empty; existing models are reused otherwise.
    /// Countries without a model are left out.
    pub fn predict_next_year(&mut self, panel: &Panel) -> Vec<Prediction> {
        self.ensure_trained(panel);

        panel
            .series()
            .filter_map(|series| {
                let model = self.models.get(series.country())?;
                let (last_year, _) = series.last()?;
                let year = last_year + 1;
                Some(Prediction {
                    country: model.country.clone(),
                    year,
                    value: model.predict(year),
                })
            })
            .collect()
    }

    /// Predicts `years` for every country with a model, with bounds at
    /// `prediction ± 2 × mean_absolute_error`.
    ///
    /// The band is a fixed heuristic, not a calibrated interval: `confidence` is accepted for
    /// callers that record it, but the width is the same for every value.
    pub fn predict_with_confidence(
        &mut self,
        panel: &Panel,
        years: &[i32],
        confidence: f64,
    ) -> Vec<IntervalPrediction> {
        self.ensure_trained(panel);
        debug!(confidence, "Prediction band width does not depend on confidence");

        panel
            .countries()
            .filter_map(|country| self.models.get(country))
            .flat_map(|model| {
                let margin = model.mean_absolute_error * BAND_MAE_MULTIPLIER;
                years.iter().map(move |&year| {
                    let value = model.predict(year);
                    IntervalPrediction {
                        country: model.country.clone(),
                        year,
                        value,
                        lower_bound: value - margin,
                        upper_bound: value + margin,
                    }
                })
            })
            .collect()
    }

    pub fn model(&self, country: &str) -> Option<&RegressionModel> {
        self.models.get(country)
    }

    pub fn models(&self) -> &IndexMap<String, RegressionModel> {
        &self.models
    }

    pub fn is_trained(&self) -> bool {
        !self.models.is_empty()
    }

    fn ensure_trained(&mut self, panel: &Panel) {
        if self.models.is_empty() {
            self.train(panel);
        }
    }
}

fn fit_series(series: &CountrySeries) -> Option<RegressionModel> {
    if series.len() < MIN_TRAINING_POINTS {
        debug!(
            country = series.country(),
            points = series.len(),
            "Not enough data to train, skipping"
        );
        return None;
    }

    let points: Vec<(f64, f64)> = series
        .points()
        .iter()
        .map(|&(year, value)| (f64::from(year), value))
        .collect();
    let fit = LinearFit::fit(&points)?;
    let (start, _) = series.first()?;
    let (end, _) = series.last()?;

    Some(RegressionModel {
        country: series.country().to_string(),
        slope: fit.slope,
        intercept: fit.intercept,
        r_squared: fit.r_squared,
        mean_absolute_error: fit.mean_absolute_error,
        trained_years: YearRange { start, end },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Observation;

    fn panel(rows: &[(&str, i32, f64)]) -> Panel {
        let rows = rows
            .iter()
            .map(|&(country, year, value)| Observation::new(country, country, year, value));
        Panel::try_new(rows, YearRange::new(1960, 2030).unwrap()).unwrap()
    }

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual}"
        );
    }

    fn sample() -> Panel {
        panel(&[
            ("Line", 2000, 100.0),
            ("Line", 2001, 110.0),
            ("Line", 2002, 120.0),
            ("Short", 2021, 1.0),
            ("Short", 2022, 2.0),
            ("Noisy", 2019, 2.0),
            ("Noisy", 2020, 2.0),
            ("Noisy", 2021, 4.0),
            ("Noisy", 2022, 8.0),
        ])
    }

    #[test]
    fn train_skips_countries_with_two_points() {
        let mut predictor = TrendPredictor::new();
        let models = predictor.train(&sample());

        assert_eq!(models.keys().collect::<Vec<_>>(), vec!["Line", "Noisy"]);
        assert!(predictor.model("Short").is_none());
    }

    #[test]
    fn train_collinear_points() {
        let mut predictor = TrendPredictor::new();
        predictor.train(&sample());
        let line = predictor.model("Line").unwrap();

        assert_close(line.slope, 10.0, 1e-9);
        assert_close(line.r_squared, 1.0, 1e-12);
        assert_close(line.mean_absolute_error, 0.0, 1e-9);
        assert_eq!(line.trained_years, YearRange { start: 2000, end: 2002 });
    }

    #[test]
    fn retraining_replaces_the_registry() {
        let mut predictor = TrendPredictor::new();
        predictor.train(&sample());
        predictor.train(&panel(&[("Other", 2000, 1.0), ("Other", 2001, 2.0), ("Other", 2002, 3.0)]));

        assert_eq!(predictor.models().len(), 1);
        assert!(predictor.model("Line").is_none());
        assert!(predictor.model("Other").is_some());
    }

    #[test]
    fn predict_extrapolates_and_rejects_unknown_countries() {
        let mut predictor = TrendPredictor::new();
        predictor.train(&sample());

        let predictions = predictor.predict("Line", &[2003, 2010]).unwrap();
        assert_eq!(predictions.len(), 2);
        assert_close(predictions[0].value, 130.0, 1e-6);
        assert_close(predictions[1].value, 200.0, 1e-6);

        assert_eq!(
            predictor.predict("Short", &[2023]),
            Err(ForecastError::UnknownCountry("Short".to_string()))
        );
    }

    #[test]
    fn predict_next_year_uses_each_countrys_last_year() {
        let mut predictor = TrendPredictor::new();
        let predictions = predictor.predict_next_year(&sample());

        let years: Vec<(&str, i32)> = predictions
            .iter()
            .map(|p| (p.country.as_str(), p.year))
            .collect();
        assert_eq!(years, vec![("Line", 2003), ("Noisy", 2023)]);
        // slope 2, intercept 1 relative to 2019
        assert_close(predictions[1].value, 9.0, 1e-6);
    }

    #[test]
    fn predict_next_year_reuses_existing_models() {
        let mut predictor = TrendPredictor::new();
        predictor.train(&panel(&[("Line", 2000, 0.0), ("Line", 2001, 1.0), ("Line", 2002, 2.0)]));

        let predictions = predictor.predict_next_year(&sample());

        assert_eq!(predictions.len(), 1);
        assert_eq!(predictions[0].year, 2003);
        assert_close(predictions[0].value, 3.0, 1e-6);
    }

    #[test]
    fn confidence_band_is_twice_the_mae() {
        let mut predictor = TrendPredictor::new();
        let narrow = predictor.predict_with_confidence(&sample(), &[2023, 2024], 0.5);
        let wide = predictor.predict_with_confidence(&sample(), &[2023, 2024], 0.99);

        assert_eq!(narrow, wide);
        assert_eq!(narrow.len(), 4);

        let noisy = narrow.iter().find(|p| p.country == "Noisy" && p.year == 2023).unwrap();
        assert_close(noisy.value, 9.0, 1e-6);
        assert_close(noisy.lower_bound, 7.0, 1e-6);
        assert_close(noisy.upper_bound, 11.0, 1e-6);

        let line = narrow.iter().find(|p| p.country == "Line").unwrap();
        assert_close(line.upper_bound - line.lower_bound, 0.0, 1e-6);
    }

    #[test]
    fn empty_panel_produces_no_predictions() {
        let mut predictor = TrendPredictor::new();
        let empty = panel(&[]);

        assert!(predictor.train(&empty).is_empty());
        assert!(predictor.predict_next_year(&empty).is_empty());
        assert!(predictor.predict_with_confidence(&empty, &[2030], 0.95).is_empty());
        assert!(!predictor.is_trained());
    }
}
