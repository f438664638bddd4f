//! # Analytics
//!
//! Descriptive statistics and growth metrics over a [`core_types::Panel`].
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** no I/O, depends only on `core-types`.
//! - **Stateless calculation:** the `StatisticsEngine` takes a panel and produces new result
//!   rows. Countries for which a metric is undefined are left out of the result rather than
//!   reported as errors.
//!
//! ## Public API
//!
//! - `StatisticsEngine`: `summarize`, `cagr`, `growth_rates`, `rank_latest`, `compare_years`.
//! - The row types in `report`.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{DEFAULT_COMPARISON_YEARS, StatisticsEngine};
pub use report::{CagrRow, ComparisonRow, GrowthRow, RankingRow, StatisticsRow};
