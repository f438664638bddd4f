use crate::report::{CagrRow, ComparisonRow, GrowthRow, RankingRow, StatisticsRow};
use core_types::{CountrySeries, Panel};
use std::collections::BTreeSet;
use tracing::debug;

/// How many of the panel's latest years a comparison covers when none are requested.
pub const DEFAULT_COMPARISON_YEARS: usize = 3;

/// A stateless calculator for deriving descriptive statistics from a panel.
#[derive(Debug, Default)]
pub struct StatisticsEngine {}

impl StatisticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes mean, median, min, max, sample std and latest value for every country.
    ///
    /// # Returns
    ///
    /// One `StatisticsRow` per country, in the panel's country iteration order.
    pub fn summarize(&self, panel: &Panel) -> Vec<StatisticsRow> {
        let rows: Vec<StatisticsRow> = panel.series().filter_map(summarize_series).collect();
        debug!(countries = rows.len(), "Summarized panel");
        rows
    }

    /// Calculates the compound annual growth rate between each country's first and last year.
    ///
    /// `cagr = ((end_value / start_value) ^ (1 / (end_year - start_year)) - 1) * 100`
    ///
    /// A country is left out when it has fewer than two years or when either endpoint is not
    /// positive, since the rate is undefined there.
    pub fn cagr(&self, panel: &Panel) -> Vec<CagrRow> {
        let rows: Vec<CagrRow> = panel.series().filter_map(cagr_for_series).collect();
        debug!(
            countries = rows.len(),
            excluded = panel.country_count() - rows.len(),
            "Calculated CAGR"
        );
        rows
    }

    /// The year-over-year growth series of every country. The first year of each country has
    /// nothing to compare against and is not part of it.
    pub fn growth_rates(&self, panel: &Panel) -> Vec<GrowthRow> {
        panel
            .series()
            .flat_map(|series| {
                series.pct_changes().into_iter().map(move |change| GrowthRow {
                    country: series.country().to_string(),
                    year: change.year,
                    change_pct: change.change_pct,
                })
            })
            .collect()
    }

    /// Ranks every country observed in the panel's latest year by value, highest first.
    pub fn rank_latest(&self, panel: &Panel) -> Vec<RankingRow> {
        let Some(latest_year) = panel.max_year() else {
            return Vec::new();
        };

        let mut observations: Vec<_> = panel
            .latest()
            .into_iter()
            .filter(|o| o.year == latest_year)
            .collect();
        // Stable, so equal values keep the panel's country order.
        observations.sort_by(|a, b| b.value.total_cmp(&a.value));

        observations
            .into_iter()
            .enumerate()
            .map(|(i, o)| RankingRow {
                rank: i + 1,
                country: o.country,
                country_code: o.country_code,
                year: o.year,
                value: o.value,
            })
            .collect()
    }

    /// Each country's values in the requested years, side by side.
    ///
    /// `years` is deduplicated and sorted. A country that was not observed in a year has no
    /// row for it. Rows are grouped by country in panel order, years ascending within a country.
    pub fn compare_years(&self, panel: &Panel, years: &[i32]) -> Vec<ComparisonRow> {
        let wanted: BTreeSet<i32> = years.iter().copied().collect();
        let wanted = &wanted;

        let rows: Vec<ComparisonRow> = panel
            .series()
            .flat_map(move |series| {
                series
                    .points()
                    .iter()
                    .filter(move |(year, _)| wanted.contains(year))
                    .map(move |&(year, value)| ComparisonRow {
                        country: series.country().to_string(),
                        country_code: series.country_code().to_string(),
                        year,
                        value,
                    })
            })
            .collect();

        debug!(years = wanted.len(), rows = rows.len(), "Compared years");
        rows
    }

    /// The last [`DEFAULT_COMPARISON_YEARS`] distinct years present in the panel, ascending.
    pub fn default_comparison_years(&self, panel: &Panel) -> Vec<i32> {
        let years: BTreeSet<i32> = panel
            .series()
            .flat_map(|series| series.points().iter().map(|&(year, _)| year))
            .collect();

        let skip = years.len().saturating_sub(DEFAULT_COMPARISON_YEARS);
        years.into_iter().skip(skip).collect()
    }
}

fn summarize_series(series: &CountrySeries) -> Option<StatisticsRow> {
    let (_, latest) = series.last()?;
    let mut values: Vec<f64> = series.values().collect();
    values.sort_by(f64::total_cmp);

    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    let std = if values.len() < 2 {
        0.0
    } else {
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1.0);
        variance.sqrt()
    };

    Some(StatisticsRow {
        country: series.country().to_string(),
        mean,
        median: median(&values),
        min: values[0],
        max: values[values.len() - 1],
        std,
        latest,
    })
}

/// Median of an already sorted, non-empty slice.
fn median(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn cagr_for_series(series: &CountrySeries) -> Option<CagrRow> {
    let (start_year, start_value) = series.first()?;
    let (end_year, end_value) = series.last()?;

    if start_year == end_year || start_value <= 0.0 || end_value <= 0.0 {
        debug!(country = series.country(), "CAGR undefined, skipping");
        return None;
    }

    let periods = f64::from(end_year - start_year);
    let cagr = ((end_value / start_value).powf(1.0 / periods) - 1.0) * 100.0;

    Some(CagrRow {
        country: series.country().to_string(),
        start_year,
        end_year,
        start_value,
        end_value,
        cagr,
    })
}
