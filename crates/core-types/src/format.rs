//! Plain-text number formatting shared by the report builders.

/// Formats `value` with `decimals` fractional digits and `,` between thousands.
pub fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (integer, fraction) = match formatted.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(formatted.len() + integer.len() / 3 + 1);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }

    // "-0" is not worth printing
    if value.is_sign_negative() && grouped.chars().any(|c| c.is_ascii_digit() && c != '0') {
        grouped.insert(0, '-');
    }
    grouped
}

/// Scales a magnitude to `T`, `B` or `M` at 1e12, 1e9 and 1e6. Smaller values are printed in
/// full with thousand separators.
pub fn scaled_magnitude(value: f64, decimals: usize) -> String {
    let magnitude = value.abs();
    if magnitude >= 1e12 {
        format!("{:.*}T", decimals, value / 1e12)
    } else if magnitude >= 1e9 {
        format!("{:.*}B", decimals, value / 1e9)
    } else if magnitude >= 1e6 {
        format!("{:.*}M", decimals, value / 1e6)
    } else {
        group_thousands(value, 0)
    }
}
