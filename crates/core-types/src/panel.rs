use crate::error::PanelError;
use crate::structs::{Observation, YearRange};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// A year-over-year change between two consecutive observed years of one country.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearChange {
    pub year: i32,
    pub change_pct: f64,
    pub value: f64,
}

/// All observations of one country, sorted by ascending year.
#[derive(Debug, Clone, PartialEq)]
pub struct CountrySeries {
    country: String,
    country_code: String,
    points: Vec<(i32, f64)>,
}

impl CountrySeries {
    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    /// `(year, value)` pairs in ascending year order. Years may have gaps.
    pub fn points(&self) -> &[(i32, f64)] {
        &self.points
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|&(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<(i32, f64)> {
        self.points.first().copied()
    }

    /// The observation with the highest year.
    pub fn last(&self) -> Option<(i32, f64)> {
        self.points.last().copied()
    }

    /// Percentage change of every point against the preceding observed year.
    ///
    /// The first point has no predecessor and is never part of the result. A change against a
    /// zero base is undefined and is skipped as well.
    pub fn pct_changes(&self) -> Vec<YearChange> {
        self.points
            .windows(2)
            .filter(|w| w[0].1 != 0.0)
            .map(|w| YearChange {
                year: w[1].0,
                change_pct: (w[1].1 - w[0].1) / w[0].1 * 100.0,
                value: w[1].1,
            })
            .collect()
    }
}

/// The normalized country x year x value data set every analysis consumes.
///
/// A `Panel` can only be built through [`Panel::try_new`] or [`Panel::new_lenient`], both of
/// which enforce its invariants: finite values, positive years inside the declared range, and
/// at most one observation per `(country, year)`. Once built it is never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    range: YearRange,
    series: IndexMap<String, CountrySeries>,
    len: usize,
}

impl Panel {
    /// Builds a panel, failing on the first malformed row.
    pub fn try_new<I>(rows: I, range: YearRange) -> Result<Self, PanelError>
    where
        I: IntoIterator<Item = Observation>,
    {
        let mut builder = PanelBuilder::new(range);
        for (index, row) in rows.into_iter().enumerate() {
            builder.push(index, row)?;
        }
        Ok(builder.finish())
    }

    /// Builds a panel from every well-formed row and returns the rejected ones alongside it.
    pub fn new_lenient<I>(rows: I, range: YearRange) -> (Self, Vec<PanelError>)
    where
        I: IntoIterator<Item = Observation>,
    {
        let mut builder = PanelBuilder::new(range);
        let mut rejected = Vec::new();
        for (index, row) in rows.into_iter().enumerate() {
            if let Err(e) = builder.push(index, row) {
                warn!(error = %e, "Rejected panel row");
                rejected.push(e);
            }
        }
        (builder.finish(), rejected)
    }

    pub fn range(&self) -> YearRange {
        self.range
    }

    /// Total number of observations.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn country_count(&self) -> usize {
        self.series.len()
    }

    /// Country names in iteration order (first appearance in the input).
    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    /// Per-country series in iteration order.
    pub fn series(&self) -> impl Iterator<Item = &CountrySeries> {
        self.series.values()
    }

    pub fn get(&self, country: &str) -> Option<&CountrySeries> {
        self.series.get(country)
    }

    /// Every observation, grouped by country and sorted by year within each group.
    pub fn observations(&self) -> impl Iterator<Item = Observation> + '_ {
        self.series.values().flat_map(|s| {
            s.points
                .iter()
                .map(move |&(year, value)| Observation::new(&s.country, &s.country_code, year, value))
        })
    }

    /// The latest observation of each country.
    pub fn latest(&self) -> Vec<Observation> {
        self.series
            .values()
            .filter_map(|s| {
                s.last()
                    .map(|(year, value)| Observation::new(&s.country, &s.country_code, year, value))
            })
            .collect()
    }

    /// The highest year observed across all countries.
    pub fn max_year(&self) -> Option<i32> {
        self.series.values().filter_map(|s| s.last()).map(|(year, _)| year).max()
    }
}

/// Accumulates validated rows keyed by country, sorting by year as it goes.
struct PanelBuilder {
    range: YearRange,
    groups: IndexMap<String, (String, BTreeMap<i32, f64>)>,
}

impl PanelBuilder {
    fn new(range: YearRange) -> Self {
        Self {
            range,
            groups: IndexMap::new(),
        }
    }

    fn push(&mut self, index: usize, row: Observation) -> Result<(), PanelError> {
        if !row.value.is_finite() {
            return Err(PanelError::malformed(
                index,
                format!("non-finite value {} for {} {}", row.value, row.country, row.year),
            ));
        }
        if row.year <= 0 {
            return Err(PanelError::malformed(
                index,
                format!("non-positive year {} for {}", row.year, row.country),
            ));
        }
        if !self.range.contains(row.year) {
            return Err(PanelError::malformed(
                index,
                format!(
                    "year {} for {} is outside {}..={}",
                    row.year, row.country, self.range.start, self.range.end
                ),
            ));
        }

        let (_, points) = self
            .groups
            .entry(row.country.clone())
            .or_insert_with(|| (row.country_code.clone(), BTreeMap::new()));
        if points.contains_key(&row.year) {
            return Err(PanelError::malformed(
                index,
                format!("duplicate observation for {} {}", row.country, row.year),
            ));
        }
        points.insert(row.year, row.value);
        Ok(())
    }

    fn finish(self) -> Panel {
        let mut len = 0;
        let series: IndexMap<String, CountrySeries> = self
            .groups
            .into_iter()
            .map(|(country, (country_code, points))| {
                len += points.len();
                let series = CountrySeries {
                    country: country.clone(),
                    country_code,
                    points: points.into_iter().collect(),
                };
                (country, series)
            })
            .collect();

        debug!(countries = series.len(), observations = len, "Panel constructed");

        Panel {
            range: self.range,
            series,
            len,
        }
    }
}
