//! Display formatting for preview/result cells and numeric axis labels.

use chrono::DateTime;

use crate::result_set::{format_plain_number, Scalar};

/// Render a cell for the preview and result tables. Nulls render empty,
/// integral numbers drop their fractional part, and strings that parse as
/// RFC 3339 timestamps are shortened to their date part.
pub fn display_cell(value: &Scalar) -> String {
    match value {
        Scalar::Null => String::new(),
        Scalar::Num(n) => format_plain_number(*n),
        Scalar::Str(s) => match DateTime::parse_from_rfc3339(s) {
            Ok(dt) => dt.format("%Y-%m-%d").to_string(),
            Err(_) => s.clone(),
        },
    }
}

/// Format a numeric axis tick: scientific notation for very large or very
/// small magnitudes, two decimals otherwise.
pub fn format_axis_label(v: f64) -> String {
    if v.abs() >= 1e6 || (v.abs() < 1e-2 && v != 0.0) {
        format!("{:.2e}", v)
    } else {
        format!("{:.2}", v)
    }
}
