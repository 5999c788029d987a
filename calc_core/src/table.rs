//! # Coefficient Tables
//!
//! A [`CoefficientTable`] maps a category key (the value a dropdown submits)
//! to a record of numeric coefficients. Tables are static: built once at
//! startup and never mutated. Entry order is display order.
//!
//! Every table carries an explicit fallback record. Categorical setters only
//! store keys that [`CoefficientTable::validate_key`] accepted, so a lookup
//! miss means a caller bypassed the setter; [`CoefficientTable::get_or_fallback`]
//! logs it and returns the fallback rather than failing the estimate.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::table::CoefficientTable;
//!
//! let multipliers = CoefficientTable::new(1.0, vec![
//!     ("flat", 1.0),
//!     ("sloped", 1.25),
//! ]);
//!
//! assert_eq!(*multipliers.get_or_fallback("sloped"), 1.25);
//! assert_eq!(*multipliers.get_or_fallback("cliff"), 1.0);
//! assert_eq!(multipliers.keys().collect::<Vec<_>>(), vec!["flat", "sloped"]);
//! ```

use crate::errors::{CalcError, CalcResult};

/// Ordered, immutable mapping from category key to coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientTable<V> {
    entries: Vec<(&'static str, V)>,
    fallback: V,
}

impl<V> CoefficientTable<V> {
    /// Build a table from built-in data.
    ///
    /// Duplicate keys keep their first occurrence and are logged.
    pub fn new(fallback: V, entries: Vec<(&'static str, V)>) -> Self {
        let mut unique: Vec<(&'static str, V)> = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            if unique.iter().any(|(k, _)| *k == key) {
                tracing::warn!(key, "duplicate coefficient table key ignored");
                continue;
            }
            unique.push((key, value));
        }
        CoefficientTable {
            entries: unique,
            fallback,
        }
    }

    /// Build a table, rejecting empty tables, blank keys and duplicates.
    pub fn try_new(fallback: V, entries: Vec<(&'static str, V)>) -> CalcResult<Self> {
        if entries.is_empty() {
            return Err(CalcError::invalid_input(
                "entries",
                "[]",
                "Coefficient table needs at least one entry",
            ));
        }
        for (i, (key, _)) in entries.iter().enumerate() {
            if key.trim().is_empty() {
                return Err(CalcError::invalid_input("key", *key, "Keys must not be blank"));
            }
            if entries[..i].iter().any(|(k, _)| k == key) {
                return Err(CalcError::invalid_input("key", *key, "Duplicate key"));
            }
        }
        Ok(CoefficientTable { entries, fallback })
    }

    /// Look up a key
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Look up a key, falling back to the table default on a miss
    pub fn get_or_fallback(&self, key: &str) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => {
                tracing::warn!(key, "category key missing from coefficient table; using fallback");
                &self.fallback
            }
        }
    }

    /// Whether the key is present
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Resolve a user-supplied key to the table's own key.
    ///
    /// `table_name` only feeds the error message.
    pub fn validate_key(&self, table_name: &str, key: &str) -> CalcResult<&'static str> {
        self.entries
            .iter()
            .map(|(k, _)| *k)
            .find(|k| *k == key.trim())
            .ok_or_else(|| CalcError::unknown_category(table_name, key))
    }

    /// Keys in display order
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    /// Entries in display order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &V)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    /// The first key, used as the default selection
    pub fn first_key(&self) -> Option<&'static str> {
        self.entries.first().map(|(k, _)| *k)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Piecewise-linear interpolation over `(x, y)` points sorted by `x`.
///
/// Values outside the table clamp to the nearest end point. An empty table
/// yields `0.0`.
pub fn interpolate(points: &[(f64, f64)], x: f64) -> f64 {
    let (first, last) = match (points.first(), points.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return 0.0,
    };
    if !x.is_finite() || x <= first.0 {
        return first.1;
    }
    if x >= last.0 {
        return last.1;
    }
    for pair in points.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        if x >= x0 && x <= x1 {
            if (x1 - x0).abs() < f64::EPSILON {
                return y0;
            }
            return y0 + (y1 - y0) * (x - x0) / (x1 - x0);
        }
    }
    last.1
}

/// Smallest tier that is at least `required`, or the largest tier when
/// nothing is big enough. Tiers must be sorted ascending.
pub fn next_tier_up(tiers: &[f64], required: f64) -> Option<f64> {
    tiers
        .iter()
        .copied()
        .find(|tier| *tier >= required)
        .or_else(|| tiers.last().copied())
}
