//! # Input Fields
//!
//! Numeric inputs are kept as the raw text the user typed so an incomplete
//! value like `"1."` or `""` never has to be rejected mid-keystroke. Parsing
//! happens only when an estimator reads the field, and it never fails:
//! anything that is not a finite number reads as `0.0` (or the documented
//! default passed to [`NumericField::value_or`]).
//!
//! ## Example
//!
//! ```rust
//! use calc_core::input::NumericField;
//!
//! let mut width = NumericField::from("12.5");
//! assert_eq!(width.value(), 12.5);
//!
//! width.set("12.");
//! assert_eq!(width.value(), 12.0);
//!
//! width.set("abc");
//! assert_eq!(width.value(), 0.0);
//! ```

use serde::{Deserialize, Deserializer, Serialize};

/// Largest magnitude [`NumericField::positive`] passes through
pub const MAX_INPUT: f64 = 1e9;

/// A numeric input stored as raw text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct NumericField(String);

impl NumericField {
    /// Create a field holding the given text
    pub fn new(text: impl Into<String>) -> Self {
        NumericField(text.into())
    }

    /// Replace the stored text. Never fails.
    pub fn set(&mut self, text: impl Into<String>) {
        self.0 = text.into();
    }

    /// Store a number as text
    pub fn set_number(&mut self, value: f64) {
        self.0 = trim_number(value);
    }

    /// The raw text as typed
    pub fn text(&self) -> &str {
        &self.0
    }

    /// Parse the field, returning `None` when it is empty or not a finite number
    pub fn parse(&self) -> Option<f64> {
        let cleaned: String = self
            .0
            .trim()
            .chars()
            .filter(|c| !matches!(c, ',' | '_' | ' '))
            .collect();
        if cleaned.is_empty() {
            return None;
        }
        cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// Parsed value, or `0.0` for empty/invalid text
    pub fn value(&self) -> f64 {
        self.value_or(0.0)
    }

    /// Parsed value, or `default` for empty/invalid text
    pub fn value_or(&self, default: f64) -> f64 {
        self.parse().unwrap_or(default)
    }

    /// Parsed value clamped into `[0, MAX_INPUT]`. Dimensions use this so a
    /// negative or garbage entry collapses the result to zero and products
    /// of several inputs stay finite.
    pub fn positive(&self) -> f64 {
        non_negative(self.value()).min(MAX_INPUT)
    }

    /// Parsed value clamped into `[min, max]`, with invalid text reading as `min`
    pub fn clamped(&self, min: f64, max: f64) -> f64 {
        self.value_or(min).clamp(min, max)
    }

    /// Rewrite the stored number through a conversion, leaving
    /// unparseable text untouched.
    pub fn convert_with(&mut self, f: impl Fn(f64) -> f64) {
        if let Some(value) = self.parse() {
            self.set_number(f(value));
        }
    }
}

impl From<&str> for NumericField {
    fn from(text: &str) -> Self {
        NumericField::new(text)
    }
}

impl From<String> for NumericField {
    fn from(text: String) -> Self {
        NumericField(text)
    }
}

impl From<f64> for NumericField {
    fn from(value: f64) -> Self {
        NumericField(trim_number(value))
    }
}

impl std::fmt::Display for NumericField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// JSON callers may send either `"12.5"` or `12.5`.
impl<'de> Deserialize<'de> for NumericField {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(f64),
            Null(()),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => NumericField(text),
            Raw::Number(value) => NumericField::from(value),
            Raw::Null(()) => NumericField::default(),
        })
    }
}

/// Clamp to `>= 0`, mapping NaN and infinities to zero
pub fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Divide, yielding zero instead of NaN/inf when the divisor is not positive
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator.is_finite() && denominator.abs() > f64::EPSILON {
        let q = numerator / denominator;
        if q.is_finite() {
            q
        } else {
            0.0
        }
    } else {
        0.0
    }
}

fn trim_number(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    let mut text = format!("{:.6}", value);
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defensive_parsing() {
        assert_eq!(NumericField::from("").value(), 0.0);
        assert_eq!(NumericField::from("   ").value(), 0.0);
        assert_eq!(NumericField::from("abc").value(), 0.0);
        assert_eq!(NumericField::from("1,250").value(), 1250.0);
        assert_eq!(NumericField::from(" 3.5 ").value(), 3.5);
        assert_eq!(NumericField::from(".5").value(), 0.5);
        assert_eq!(NumericField::from("-4").value(), -4.0);
        assert_eq!(NumericField::from("NaN").value(), 0.0);
        assert_eq!(NumericField::from("inf").value(), 0.0);
    }

    #[test]
    fn test_value_or_default() {
        assert_eq!(NumericField::from("").value_or(75.0), 75.0);
        assert_eq!(NumericField::from("60").value_or(75.0), 60.0);
    }

    #[test]
    fn test_positive_clamps() {
        assert_eq!(NumericField::from("-4").positive(), 0.0);
        assert_eq!(NumericField::from("4").positive(), 4.0);
        assert_eq!(NumericField::from("x").clamped(1.0, 50.0), 1.0);
        assert_eq!(NumericField::from("500").clamped(1.0, 50.0), 50.0);
    }

    #[test]
    fn test_positive_caps_magnitude() {
        assert_eq!(NumericField::from("1e200").positive(), MAX_INPUT);
        assert_eq!(NumericField::from("1e9").positive(), 1e9);
        let product = NumericField::from("1e200").positive().powi(4);
        assert!(product.is_finite());
    }

    #[test]
    fn test_set_number_formatting() {
        assert_eq!(NumericField::from(3.0).text(), "3");
        assert_eq!(NumericField::from(171.0).text(), "171");
        assert_eq!(NumericField::from(0.25).text(), "0.25");
        assert_eq!(NumericField::from(f64::NAN).text(), "");
    }

    #[test]
    fn test_convert_with_leaves_garbage() {
        let mut field = NumericField::from("abc");
        field.convert_with(|v| v * 2.0);
        assert_eq!(field.text(), "abc");

        let mut field = NumericField::from("10");
        field.convert_with(|v| v * 17.1);
        assert_eq!(field.text(), "171");
    }

    #[test]
    fn test_deserialize_text_or_number() {
        let a: NumericField = serde_json::from_str("\"12.5\"").unwrap();
        let b: NumericField = serde_json::from_str("12.5").unwrap();
        let c: NumericField = serde_json::from_str("null").unwrap();
        assert_eq!(a.value(), 12.5);
        assert_eq!(b.value(), 12.5);
        assert_eq!(c.value(), 0.0);
        assert_eq!(serde_json::to_string(&a).unwrap(), "\"12.5\"");
    }

    #[test]
    fn test_safe_div() {
        assert_eq!(safe_div(10.0, 0.0), 0.0);
        assert_eq!(safe_div(10.0, 4.0), 2.5);
        assert_eq!(safe_div(f64::MAX, 1e-300), 0.0);
    }
}
