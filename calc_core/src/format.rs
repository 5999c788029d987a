//! # Result Formatting
//!
//! Turns an already-derived result into display strings. Nothing here
//! recomputes a value: rounding happens only at this step, after the whole
//! derivation ran at full precision.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::format::{format_currency, format_feet_inches, format_number};
//! use calc_core::settings::Settings;
//!
//! let settings = Settings::default();
//! assert_eq!(format_currency(1234.5, &settings), "$1,235");
//! assert_eq!(format_number(26250.0, 0, &settings), "26,250");
//! assert_eq!(format_feet_inches(168.0), "14'0\"");
//! ```

use serde::{Deserialize, Serialize};

use crate::estimator::CostRange;
use crate::settings::Settings;

/// One labelled line of a result breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    pub label: String,
    pub value: String,
}

impl ResultRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        ResultRow {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Results that can render themselves as labelled rows.
pub trait Breakdown {
    fn rows(&self, settings: &Settings) -> Vec<ResultRow>;
}

/// Round half away from zero to `decimals` places and insert separators.
///
/// Non-finite values render as `0`.
pub fn format_number(value: f64, decimals: usize, settings: &Settings) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let text = format!("{:.*}", decimals, round_to(value, decimals).abs());
    let (whole, frac) = match text.split_once('.') {
        Some((w, f)) => (w.to_string(), Some(f.to_string())),
        None => (text, None),
    };

    let grouped = group_thousands(&whole, &settings.thousands_separator);
    let negative = value < 0.0 && text_is_nonzero(&grouped, frac.as_deref());
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac {
        out.push('.');
        out.push_str(&frac);
    }
    out
}

/// Quantity with the configured number of decimals
pub fn format_quantity(value: f64, settings: &Settings) -> String {
    format_number(value, settings.quantity_decimals, settings)
}

/// Money with zero decimal places: `$1,235`
pub fn format_currency(value: f64, settings: &Settings) -> String {
    let number = format_number(value, 0, settings);
    match number.strip_prefix('-') {
        Some(rest) => format!("-{}{}", settings.currency_symbol, rest),
        None => format!("{}{}", settings.currency_symbol, number),
    }
}

/// A cost range as `$low–$high`, collapsing to one amount when both ends
/// round to the same figure
pub fn format_range(range: &CostRange, settings: &Settings) -> String {
    let low = format_currency(range.low, settings);
    let high = format_currency(range.high, settings);
    if low == high {
        low
    } else {
        format!("{}–{}", low, high)
    }
}

/// Inches as feet and whole inches: `168` -> `14'0"`
pub fn format_feet_inches(total_inches: f64) -> String {
    let total = if total_inches.is_finite() && total_inches > 0.0 {
        total_inches.round() as u64
    } else {
        0
    };
    format!("{}'{}\"", total / 12, total % 12)
}

/// Percentage with no decimals: `25%`
pub fn format_percent(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    format!("{:.0}%", value)
}

fn round_to(value: f64, decimals: usize) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let scaled = (value * factor).round() / factor;
    if scaled.is_finite() {
        scaled
    } else {
        value
    }
}

fn group_thousands(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

fn text_is_nonzero(whole: &str, frac: Option<&str>) -> bool {
    whole.chars().chain(frac.unwrap_or("").chars()).any(|c| c.is_ascii_digit() && c != '0')
}
