//! Locale-free number formatting for display.
use num_format::{Locale, ToFormattedString};

/// Placeholder shown for unknown figures.
pub const NOT_AVAILABLE: &str = "N/A";

/// Format a possibly-unknown count with `,` thousands separators; `None`
/// becomes `"N/A"`.
///
/// ```
/// use covid_dash::format::format_number;
/// assert_eq!(format_number(Some(1_234_567)), "1,234,567");
/// assert_eq!(format_number(None), "N/A");
/// ```
pub fn format_number(value: Option<u64>) -> String {
    match value {
        Some(v) => format_count(v),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Format a known count with `,` thousands separators.
pub fn format_count(value: u64) -> String {
    value.to_formatted_string(&Locale::en)
}

/// Format a per-million figure. Whole values print like counts; fractional
/// values keep up to two decimals with trailing zeros trimmed.
pub fn format_metric(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => {
            let rounded = (v * 100.0).round() / 100.0;
            let whole = rounded.trunc() as u64;
            let frac = format!("{:.2}", rounded.fract());
            let frac = frac.trim_start_matches('0').trim_end_matches('0');
            if frac == "." || frac.is_empty() {
                format_count(whole)
            } else {
                format!("{}{}", format_count(whole), frac)
            }
        }
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Today's increment as `"+N"`, or `None` when there is nothing to show.
pub fn format_delta(value: Option<u64>) -> Option<String> {
    match value {
        Some(v) if v > 0 => Some(format!("+{}", format_count(v))),
        _ => None,
    }
}

/// `part / whole` as a percentage with two decimals, `"N/A"` if `whole` is 0.
pub fn format_rate(part: u64, whole: u64) -> String {
    if whole == 0 {
        return NOT_AVAILABLE.to_string();
    }
    format!("{:.2}%", part as f64 / whole as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_trims_decimals() {
        assert_eq!(format_metric(Some(12345.0)), "12,345");
        assert_eq!(format_metric(Some(12345.6)), "12,345.6");
        assert_eq!(format_metric(Some(0.25)), "0.25");
        assert_eq!(format_metric(Some(99.999)), "100");
        assert_eq!(format_metric(None), "N/A");
        assert_eq!(format_metric(Some(f64::NAN)), "N/A");
    }
}
