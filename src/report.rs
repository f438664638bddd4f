//! Renders analysis results as terminal tables.

use crate::display::{ValueFormat, growth_endpoint};
use analytics::{CagrRow, ComparisonRow, GrowthRow, RankingRow, StatisticsRow};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Table};
use core_types::Observation;
use forecaster::{IntervalPrediction, Prediction, RegressionModel};

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header);
    table
}

pub fn latest_table(latest: &[Observation], format: ValueFormat) -> Table {
    let mut t = table(vec!["Country", "Code", "Year", "Latest Value"]);
    for o in latest {
        t.add_row(vec![
            Cell::new(&o.country),
            Cell::new(&o.country_code),
            Cell::new(o.year),
            Cell::new(format.value(o.value)),
        ]);
    }
    t
}

pub fn statistics_table(rows: &[StatisticsRow], format: ValueFormat) -> Table {
    let mut t = table(vec![
        "Country", "Average", "Median", "Minimum", "Maximum", "Std Dev", "Latest Value",
    ]);
    for r in rows {
        t.add_row(vec![
            r.country.clone(),
            format.value(r.mean),
            format.value(r.median),
            format.value(r.min),
            format.value(r.max),
            format.spread(r.std),
            format.value(r.latest),
        ]);
    }
    t
}

pub fn cagr_table(rows: &[CagrRow], indicator_key: &str) -> Table {
    let mut t = table(vec![
        "Country",
        "Start Year",
        "End Year",
        "Start Value",
        "End Value",
        "CAGR",
    ]);
    for r in rows {
        t.add_row(vec![
            r.country.clone(),
            r.start_year.to_string(),
            r.end_year.to_string(),
            growth_endpoint(indicator_key, r.start_value),
            growth_endpoint(indicator_key, r.end_value),
            format!("{:.2}%", r.cagr),
        ]);
    }
    t
}

pub fn growth_table(rows: &[GrowthRow]) -> Table {
    let mut t = table(vec!["Country", "Year", "YoY Change"]);
    for r in rows {
        t.add_row(vec![
            r.country.clone(),
            r.year.to_string(),
            format!("{:.2}%", r.change_pct),
        ]);
    }
    t
}

pub fn ranking_table(rows: &[RankingRow], format: ValueFormat) -> Table {
    let mut t = table(vec!["Rank", "Country", "Code", "Year", "Value"]);
    for r in rows {
        t.add_row(vec![
            r.rank.to_string(),
            r.country.clone(),
            r.country_code.clone(),
            r.year.to_string(),
            format.value(r.value),
        ]);
    }
    t
}

/// One row per country, one column per year. Years a country lacks are left blank.
pub fn comparison_table(rows: &[ComparisonRow], years: &[i32], format: ValueFormat) -> Table {
    let year_headers: Vec<String> = years.iter().map(i32::to_string).collect();
    let mut header = vec!["Country"];
    header.extend(year_headers.iter().map(String::as_str));
    let mut t = table(header);

    // Rows arrive grouped by country.
    let mut countries: Vec<(&str, Vec<Option<f64>>)> = Vec::new();
    for r in rows {
        if countries.last().is_none_or(|(country, _)| *country != r.country) {
            countries.push((r.country.as_str(), vec![None; years.len()]));
        }
        if let (Some((_, values)), Some(column)) = (
            countries.last_mut(),
            years.iter().position(|&y| y == r.year),
        ) {
            values[column] = Some(r.value);
        }
    }

    for (country, values) in countries {
        let mut cells = vec![country.to_string()];
        cells.extend(values.into_iter().map(|v| v.map(|v| format.value(v)).unwrap_or_default()));
        t.add_row(cells);
    }
    t
}

pub fn models_table<'a>(models: impl IntoIterator<Item = &'a RegressionModel>) -> Table {
    let mut t = table(vec!["Country", "Years", "Slope / Year", "R²", "MAE"]);
    for m in models {
        t.add_row(vec![
            m.country.clone(),
            format!("{}-{}", m.trained_years.start, m.trained_years.end),
            format!("{:.4e}", m.slope),
            format!("{:.4}", m.r_squared),
            format!("{:.4e}", m.mean_absolute_error),
        ]);
    }
    t
}

pub fn predictions_table(rows: &[Prediction], format: ValueFormat) -> Table {
    let mut t = table(vec!["Country", "Year", "Predicted"]);
    for r in rows {
        t.add_row(vec![r.country.clone(), r.year.to_string(), format.value(r.value)]);
    }
    t
}

pub fn intervals_table(rows: &[IntervalPrediction], format: ValueFormat) -> Table {
    let mut t = table(vec!["Country", "Year", "Predicted", "Lower Bound", "Upper Bound"]);
    for r in rows {
        t.add_row(vec![
            r.country.clone(),
            r.year.to_string(),
            format.value(r.value),
            format.value(r.lower_bound),
            format.value(r.upper_bound),
        ]);
    }
    t
}
