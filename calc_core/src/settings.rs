//! # Settings
//!
//! Presentation settings shared by every estimator. None of these affect a
//! derivation; they only change how results are stringified.
//!
//! Settings load from TOML. Every field has a default, so a partial file
//! (or no file at all) is fine:
//!
//! ```rust
//! use calc_core::settings::Settings;
//!
//! let settings = Settings::from_toml_str("currency_symbol = \"€\"").unwrap();
//! assert_eq!(settings.currency_symbol, "€");
//! assert_eq!(settings.quantity_decimals, 2);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Largest batch the phrase generator will produce
pub const MAX_PHRASE_COUNT: usize = 50;

/// Global presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Currency symbol prefixed to money amounts
    pub currency_symbol: String,

    /// Thousands separator for numbers and money
    pub thousands_separator: String,

    /// Decimal places for quantities (area, volume, weight)
    pub quantity_decimals: usize,

    /// Default number of phrases when a request does not say
    pub default_phrase_count: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            currency_symbol: "$".to_string(),
            thousands_separator: ",".to_string(),
            quantity_decimals: 2,
            default_phrase_count: 10,
        }
    }
}

impl Settings {
    /// Parse settings from a TOML document
    pub fn from_toml_str(text: &str) -> CalcResult<Self> {
        let settings: Settings =
            toml::from_str(text).map_err(|e| CalcError::config("settings", e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file
    pub fn load(path: &Path) -> CalcResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CalcError::config(path.display().to_string(), e.to_string()))?;
        let settings = Self::from_toml_str(&text).map_err(|e| match e {
            CalcError::Config { reason, .. } => CalcError::config(path.display().to_string(), reason),
            other => other,
        })?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Check ranges
    pub fn validate(&self) -> CalcResult<()> {
        if self.quantity_decimals > 6 {
            return Err(CalcError::invalid_input(
                "quantity_decimals",
                self.quantity_decimals.to_string(),
                "At most 6 decimal places are supported",
            ));
        }
        if self.default_phrase_count == 0 || self.default_phrase_count > MAX_PHRASE_COUNT {
            return Err(CalcError::invalid_input(
                "default_phrase_count",
                self.default_phrase_count.to_string(),
                format!("Must be between 1 and {}", MAX_PHRASE_COUNT),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.thousands_separator, ",");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let settings = Settings::from_toml_str("quantity_decimals = 1\n").unwrap();
        assert_eq!(settings.quantity_decimals, 1);
        assert_eq!(settings.currency_symbol, "$");
    }

    #[test]
    fn test_empty_toml() {
        assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
    }

    #[test]
    fn test_invalid_values() {
        let err = Settings::from_toml_str("quantity_decimals = 12").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let err = Settings::from_toml_str("quantity_decimals = \"two\"").unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_missing_file() {
        let err = Settings::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }
}
