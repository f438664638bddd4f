use crate::error::AnalyzerError;
use core_types::{CountrySeries, Panel, YearChange};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

/// A single ranked year-over-year movement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovementRecord {
    pub country: String,
    pub year: i32,
    /// Change against the preceding observed year of the same country, in percent.
    pub change_pct: f64,
    pub value: f64,
}

/// The largest rises and the deepest dips of one country.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CountryMovements {
    /// Largest change first.
    pub rises: Vec<MovementRecord>,
    /// Most negative change first.
    pub dips: Vec<MovementRecord>,
}

/// Ranks each country's year-over-year changes.
#[derive(Debug, Default)]
pub struct ExtremeMovementDetector {}

impl ExtremeMovementDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Picks the `top_n` largest and `top_n` smallest changes of every country.
    ///
    /// Countries come out in ascending name order, whatever the order of the input rows.
    /// Equal changes keep ascending-year order. Countries with no valid change (a single year,
    /// or only zero bases) are absent from the result; countries with fewer than `top_n`
    /// changes return all of them.
    ///
    /// # Errors
    ///
    /// `AnalyzerError::InvalidParameter` if `top_n` is zero.
    pub fn detect(
        &self,
        panel: &Panel,
        top_n: usize,
    ) -> Result<IndexMap<String, CountryMovements>, AnalyzerError> {
        if top_n == 0 {
            return Err(AnalyzerError::InvalidParameter(
                "top_n must be at least 1".to_string(),
            ));
        }

        let mut movements: IndexMap<String, CountryMovements> = panel
            .series()
            .filter_map(|series| {
                rank_series(series, top_n).map(|m| (series.country().to_string(), m))
            })
            .collect();
        movements.sort_keys();

        debug!(
            countries = movements.len(),
            skipped = panel.country_count() - movements.len(),
            top_n,
            "Detected extreme movements"
        );
        Ok(movements)
    }
}

fn rank_series(series: &CountrySeries, top_n: usize) -> Option<CountryMovements> {
    let changes = series.pct_changes();
    if changes.is_empty() {
        return None;
    }

    // `sort_by` is stable and `changes` is in ascending year order, which is the tie-break.
    let mut rises = changes.clone();
    rises.sort_by(|a, b| b.change_pct.total_cmp(&a.change_pct));
    let mut dips = changes;
    dips.sort_by(|a, b| a.change_pct.total_cmp(&b.change_pct));

    let to_record = |c: YearChange| MovementRecord {
        country: series.country().to_string(),
        year: c.year,
        change_pct: c.change_pct,
        value: c.value,
    };

    Some(CountryMovements {
        rises: rises.into_iter().take(top_n).map(to_record).collect(),
        dips: dips.into_iter().take(top_n).map(to_record).collect(),
    })
}
