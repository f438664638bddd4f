//! Reads an indicator panel from CSV and writes a validated one back.
//!
//! Expected header: `country,country_code,year,value`. Rows with an empty value are missing
//! data and are dropped here, before the panel ever sees them.

use anyhow::{Context, Result};
use configuration::PanelSettings;
use core_types::{Observation, Panel, YearRange};
use serde::Deserialize;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct RawRecord {
    country: String,
    country_code: String,
    year: i32,
    value: Option<f64>,
}

/// Observations read from a source, plus how many rows had no value.
#[derive(Debug)]
pub struct RawPanel {
    pub observations: Vec<Observation>,
    pub missing: usize,
}

pub fn read_observations<R: Read>(reader: R) -> Result<RawPanel> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut observations = Vec::new();
    let mut missing = 0;

    for (index, record) in csv_reader.deserialize::<RawRecord>().enumerate() {
        let record = record.with_context(|| format!("Failed to parse CSV record {}", index + 1))?;
        match record.value {
            Some(value) => observations.push(Observation::new(
                record.country,
                record.country_code,
                record.year,
                value,
            )),
            None => missing += 1,
        }
    }

    Ok(RawPanel {
        observations,
        missing,
    })
}

/// Builds a panel from raw observations following the configured ingest mode.
pub fn build_panel(raw: RawPanel, range: YearRange, strict: bool) -> Result<Panel> {
    if raw.missing > 0 {
        info!(rows = raw.missing, "Dropped rows with missing values");
    }

    if strict {
        return Panel::try_new(raw.observations, range).context("Panel validation failed");
    }

    let (panel, rejected) = Panel::new_lenient(raw.observations, range);
    if !rejected.is_empty() {
        warn!(rows = rejected.len(), "Rejected malformed rows");
    }
    Ok(panel)
}

/// Reads `path` and builds a panel with the given settings.
pub fn load_panel(path: &Path, settings: &PanelSettings) -> Result<Panel> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open panel file {}", path.display()))?;
    let raw = read_observations(file)?;
    let range = YearRange::new(settings.start_year, settings.end_year)?;
    let panel = build_panel(raw, range, settings.strict)?;

    info!(
        path = %path.display(),
        countries = panel.country_count(),
        observations = panel.len(),
        "Panel loaded"
    );
    Ok(panel)
}

/// Writes every observation of `panel` as CSV, sorted by country name and then year.
///
/// Returns the number of data rows written.
pub fn write_observations<W: Write>(writer: W, panel: &Panel) -> Result<usize> {
    let mut observations: Vec<Observation> = panel.observations().collect();
    // Stable, and years are already ascending within a country.
    observations.sort_by(|a, b| a.country.cmp(&b.country));

    let mut csv_writer = csv::Writer::from_writer(writer);
    for observation in &observations {
        csv_writer
            .serialize(observation)
            .with_context(|| format!("Failed to write {} {}", observation.country, observation.year))?;
    }
    csv_writer.flush().context("Failed to flush CSV output")?;
    Ok(observations.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "country,country_code,year,value
India,IND,2001,10.5
India,IND,2000,
Chile,CHL,2000,3
India,IND,2001,11
";

    fn range() -> YearRange {
        YearRange::new(1990, 2030).unwrap()
    }

    #[test]
    fn missing_values_are_dropped_at_the_boundary() {
        let raw = read_observations(CSV.as_bytes()).unwrap();

        assert_eq!(raw.missing, 1);
        assert_eq!(raw.observations.len(), 3);
        assert_eq!(raw.observations[0], Observation::new("India", "IND", 2001, 10.5));
    }

    #[test]
    fn lenient_mode_skips_duplicates() {
        let raw = read_observations(CSV.as_bytes()).unwrap();
        let panel = build_panel(raw, range(), false).unwrap();

        assert_eq!(panel.len(), 2);
        assert_eq!(panel.get("India").unwrap().points(), &[(2001, 10.5)]);
    }

    #[test]
    fn strict_mode_fails_on_duplicates() {
        let raw = read_observations(CSV.as_bytes()).unwrap();
        assert!(build_panel(raw, range(), true).is_err());
    }

    #[test]
    fn unparseable_rows_are_errors() {
        let bad = "country,country_code,year,value\nIndia,IND,twenty,1\n";
        assert!(read_observations(bad.as_bytes()).is_err());
    }

    #[test]
    fn export_is_sorted_by_country_and_year() {
        let rows = vec![
            Observation::new("Zambia", "ZMB", 2001, 2.0),
            Observation::new("Austria", "AUT", 2001, 1.5),
            Observation::new("Zambia", "ZMB", 2000, 1.0),
            Observation::new("Austria", "AUT", 2000, 0.25),
        ];
        let panel = Panel::try_new(rows, range()).unwrap();

        let mut out = Vec::new();
        let written = write_observations(&mut out, &panel).unwrap();

        assert_eq!(written, 4);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "country,country_code,year,value
Austria,AUT,2000,0.25
Austria,AUT,2001,1.5
Zambia,ZMB,2000,1.0
Zambia,ZMB,2001,2.0
"
        );
    }

    #[test]
    fn exported_panel_reads_back_unchanged() {
        let raw = read_observations(CSV.as_bytes()).unwrap();
        let panel = build_panel(raw, range(), false).unwrap();

        let mut out = Vec::new();
        write_observations(&mut out, &panel).unwrap();
        let reread = build_panel(read_observations(out.as_slice()).unwrap(), range(), true).unwrap();

        assert_eq!(reread.len(), panel.len());
        assert_eq!(reread.get("India"), panel.get("India"));
        assert_eq!(reread.get("Chile"), panel.get("Chile"));
    }
}
