//! Indicator-aware number formatting for tables.
//!
//! The formatter is chosen from substrings of the indicator key, so `gdp_growth` is treated
//! as a percentage even though it also contains `gdp`.

use core_types::format::{group_thousands, scaled_magnitude};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    Percentage,
    LargeNumber,
    Plain,
}

impl ValueFormat {
    pub fn for_indicator(indicator_key: &str) -> Self {
        if ["pct", "rate", "growth"]
            .iter()
            .any(|s| indicator_key.contains(s))
        {
            ValueFormat::Percentage
        } else if is_large_number(indicator_key) {
            ValueFormat::LargeNumber
        } else {
            ValueFormat::Plain
        }
    }

    pub fn value(&self, value: f64) -> String {
        match self {
            ValueFormat::Percentage => format_percentage(value),
            ValueFormat::LargeNumber => format_large_number(value, 2),
            ValueFormat::Plain => group_thousands(value, 2),
        }
    }

    /// Standard deviations of large-number indicators get one decimal.
    pub fn spread(&self, value: f64) -> String {
        match self {
            ValueFormat::LargeNumber => format_large_number(value, 1),
            _ => self.value(value),
        }
    }
}

/// Growth endpoints are never shown as percentages, only scaled or plain.
pub fn growth_endpoint(indicator_key: &str, value: f64) -> String {
    if is_large_number(indicator_key) {
        format_large_number(value, 2)
    } else {
        group_thousands(value, 2)
    }
}

pub fn format_percentage(value: f64) -> String {
    format!("{value:.2}%")
}

pub fn format_large_number(value: f64, decimals: usize) -> String {
    scaled_magnitude(value, decimals)
}

fn is_large_number(indicator_key: &str) -> bool {
    ["population", "gdp", "gni"]
        .iter()
        .any(|s| indicator_key.contains(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_by_substring() {
        let cases = vec![
            ("gdp", ValueFormat::LargeNumber),
            ("gdp_growth", ValueFormat::Percentage),
            ("unemployment_rate", ValueFormat::Percentage),
            ("population_total", ValueFormat::LargeNumber),
            ("gni_per_capita", ValueFormat::LargeNumber),
            ("trade_pct_gdp", ValueFormat::Percentage),
            ("life_expectancy", ValueFormat::Plain),
            ("co2_emissions", ValueFormat::Plain),
        ];

        for (index, (key, expected)) in cases.into_iter().enumerate() {
            assert_eq!(ValueFormat::for_indicator(key), expected, "TC{index} failed");
        }
    }

    #[test]
    fn formatting() {
        assert_eq!(ValueFormat::Percentage.value(3.14159), "3.14%");
        assert_eq!(ValueFormat::LargeNumber.value(2.5e12), "2.50T");
        assert_eq!(ValueFormat::LargeNumber.spread(2.56e9), "2.6B");
        assert_eq!(ValueFormat::Plain.value(71234.456), "71,234.46");
        assert_eq!(ValueFormat::Percentage.spread(1.5), "1.50%");
    }

    #[test]
    fn growth_endpoints_ignore_percentage_keys() {
        assert_eq!(growth_endpoint("gdp", 1.5e9), "1.50B");
        assert_eq!(growth_endpoint("inflation_rate", 1234.5), "1,234.50");
    }
}
