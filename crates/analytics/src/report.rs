use serde::Serialize;

/// Descriptive statistics of one country's series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsRow {
    pub country: String,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation (n - 1 divisor). Zero for a single observation.
    pub std: f64,
    /// Value at the country's latest year.
    pub latest: f64,
}

/// Compound annual growth between a country's first and last observed year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CagrRow {
    pub country: String,
    pub start_year: i32,
    pub end_year: i32,
    pub start_value: f64,
    pub end_value: f64,
    /// In percent.
    pub cagr: f64,
}

/// One year-over-year growth figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthRow {
    pub country: String,
    pub year: i32,
    pub change_pct: f64,
}

/// A country's position among all countries observed in the panel's latest year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingRow {
    /// 1-based.
    pub rank: usize,
    pub country: String,
    pub country_code: String,
    pub year: i32,
    pub value: f64,
}

/// A country's value in one of the years picked for a side-by-side comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub country: String,
    pub country_code: String,
    pub year: i32,
    pub value: f64,
}
