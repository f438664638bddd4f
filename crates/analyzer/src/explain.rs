//! Turns explanation entries into display lines.

use crate::annotator::{ContextualAnnotator, ExplanationEntry};
use crate::detector::ExtremeMovementDetector;
use crate::error::AnalyzerError;
use core_types::{Direction, Panel};
use std::collections::HashSet;
use tracing::info;

pub const NO_DATA: &str = "No data available to analyze dips/rises.";
pub const NO_MOVEMENTS: &str = "No significant year-over-year movements detected.";
pub const DISCLAIMER: &str = "Explanations are heuristic; verify with authoritative sources.";
pub const DIP_FALLBACK: &str = "Local factors or data volatility";
pub const RISE_FALLBACK: &str = "Potential recovery, structural growth, or base effects";

/// One display line for an entry, with the fallback reason when none was found.
pub fn render_line(entry: &ExplanationEntry) -> String {
    let (marker, label, fallback) = match entry.direction {
        Direction::Dip => ("🔻", "decline", DIP_FALLBACK),
        Direction::Rise => ("🔺", "rise", RISE_FALLBACK),
    };
    let reasons = if entry.reasons.is_empty() {
        fallback.to_string()
    } else {
        entry.reasons.join("; ")
    };

    format!(
        "{marker} {} {}: {:.2}% {label} (value {:.2}) - {reasons}",
        entry.country, entry.year, entry.change_pct, entry.value
    )
}

/// Renders entries whose absolute change reaches `min_abs_change_pct`.
///
/// Exact duplicate lines are dropped, keeping the first. A non-empty result always ends with
/// the disclaimer; if nothing passes the threshold the single line [`NO_MOVEMENTS`] is
/// returned instead.
pub fn render_explanations(entries: &[ExplanationEntry], min_abs_change_pct: f64) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut lines: Vec<String> = entries
        .iter()
        .filter(|e| e.change_pct.abs() >= min_abs_change_pct)
        .map(render_line)
        .filter(|line| seen.insert(line.clone()))
        .collect();

    if lines.is_empty() {
        return vec![NO_MOVEMENTS.to_string()];
    }
    lines.push(DISCLAIMER.to_string());
    lines
}

/// Detects, annotates and renders the movements of `panel` in one go.
///
/// An empty panel yields the single line [`NO_DATA`].
pub fn explain(
    panel: &Panel,
    indicator_key: &str,
    top_n: usize,
    min_abs_change_pct: f64,
) -> Result<Vec<String>, AnalyzerError> {
    let movements = ExtremeMovementDetector::new().detect(panel, top_n)?;
    if panel.is_empty() {
        return Ok(vec![NO_DATA.to_string()]);
    }

    let entries = ContextualAnnotator::new().annotate(&movements, indicator_key);
    info!(
        indicator = indicator_key,
        countries = movements.len(),
        entries = entries.len(),
        "Annotated movements"
    );
    Ok(render_explanations(&entries, min_abs_change_pct))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{Observation, YearRange};

    fn entry(direction: Direction, year: i32, change_pct: f64, reasons: &[&str]) -> ExplanationEntry {
        ExplanationEntry {
            country: "India".to_string(),
            year,
            direction,
            change_pct,
            value: 1234.5,
            reasons: reasons.iter().map(|r| r.to_string()).collect(),
        }
    }

    fn panel(rows: &[(&str, i32, f64)]) -> Panel {
        let rows = rows
            .iter()
            .map(|&(country, year, value)| Observation::new(country, country, year, value));
        Panel::try_new(rows, YearRange::new(1960, 2030).unwrap()).unwrap()
    }

    #[test]
    fn render_line_formats_reasons_and_fallbacks() {
        let cases = vec![
            (
                entry(Direction::Dip, 2020, -7.256, &["A", "B"]),
                "🔻 India 2020: -7.26% decline (value 1234.50) - A; B",
            ),
            (
                entry(Direction::Dip, 2005, -1.0, &[]),
                "🔻 India 2005: -1.00% decline (value 1234.50) - Local factors or data volatility",
            ),
            (
                entry(Direction::Rise, 2006, 4.5, &[]),
                "🔺 India 2006: 4.50% rise (value 1234.50) - Potential recovery, structural growth, or base effects",
            ),
        ];

        for (index, (entry, expected)) in cases.iter().enumerate() {
            assert_eq!(render_line(entry), *expected, "TC{index} failed");
        }
    }

    #[test]
    fn duplicates_are_removed_and_disclaimer_appended() {
        // With a single change the same year is both the top rise and the top dip.
        let entries = vec![
            entry(Direction::Dip, 2001, 5.0, &[]),
            entry(Direction::Dip, 2001, 5.0, &[]),
            entry(Direction::Rise, 2001, 5.0, &[]),
        ];
        let lines = render_explanations(&entries, 0.0);

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("🔻 India 2001"));
        assert!(lines[1].starts_with("🔺 India 2001"));
        assert_eq!(lines[2], DISCLAIMER);
    }

    #[test]
    fn threshold_filters_small_moves() {
        let entries = vec![
            entry(Direction::Dip, 2001, -0.5, &[]),
            entry(Direction::Rise, 2002, 0.4, &[]),
        ];

        assert_eq!(render_explanations(&entries, 1.0), vec![NO_MOVEMENTS]);
        assert_eq!(render_explanations(&[], 0.0), vec![NO_MOVEMENTS]);
    }

    #[test]
    fn explain_empty_panel() {
        assert_eq!(explain(&panel(&[]), "gdp", 2, 0.0).unwrap(), vec![NO_DATA]);
    }

    #[test]
    fn explain_panel_without_changes() {
        let lines = explain(&panel(&[("A", 2000, 1.0)]), "gdp", 2, 0.0).unwrap();
        assert_eq!(lines, vec![NO_MOVEMENTS]);
    }

    #[test]
    fn explain_end_to_end() {
        let panel = panel(&[
            ("India", 2019, 100.0),
            ("India", 2020, 90.0),
            ("India", 2021, 99.0),
        ]);
        let lines = explain(&panel, "gdp", 1, 0.0).unwrap();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("🔻 India 2020: -10.00% decline (value 90.00) - COVID-19"));
        assert!(lines[0].ends_with("Historic contraction from pandemic restrictions"));
        assert!(lines[1].starts_with("🔺 India 2021: 10.00% rise (value 99.00) - Initial recovery"));
        assert_eq!(lines[2], DISCLAIMER);
    }

    #[test]
    fn explain_rejects_zero_top_n() {
        assert!(explain(&panel(&[]), "gdp", 0, 0.0).is_err());
    }
}
