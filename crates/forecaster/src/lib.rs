//! # Forecaster
//!
//! Per-country linear trend models over a [`core_types::Panel`], with next-year predictions and
//! a fixed-width uncertainty band.
//!
//! Known limitations, kept on purpose:
//!
//! - The model is a straight line in the year; predictions far outside the training years are
//!   extrapolated without any guard.
//! - The band is `± 2 × MAE`, not a calibrated confidence interval. The requested confidence
//!   level does not change it.

pub mod error;
pub mod predictor;
pub mod regression;
pub mod summary;

pub use error::ForecastError;
pub use predictor::{IntervalPrediction, Prediction, RegressionModel, TrendPredictor};
pub use regression::LinearFit;
