//! # Cost Adjustments
//!
//! Cost tools apply modifiers to a base subtotal in a fixed order:
//!
//! 1. Every [`Adjustment::Multiplier`] (terrain, property type, regional cost
//!    level), in the order given.
//! 2. Every additive adjustment: [`Adjustment::Flat`] fees, [`Adjustment::PerUnit`]
//!    fees and [`Adjustment::PercentOfBase`] surcharges. A percent-of-base
//!    surcharge is computed from the *pre-multiplier* base.
//!
//! Swapping the two phases changes the answer, so the order is fixed here
//! rather than left to each tool.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::adjust::{apply_adjustments, Adjustment};
//!
//! let breakdown = apply_adjustments(1000.0, &[
//!     Adjustment::flat("Permit", 150.0),
//!     Adjustment::multiplier("Sloped terrain", 1.25),
//!     Adjustment::percent_of_base("Erosion control", 10.0),
//! ]);
//!
//! // 1000 * 1.25 = 1250, then + 150 + 10% of 1000
//! assert_eq!(breakdown.after_multipliers, 1250.0);
//! assert_eq!(breakdown.total, 1500.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::input::non_negative;

/// A single cost modifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Adjustment {
    /// Scales the running subtotal
    Multiplier { label: String, factor: f64 },
    /// Adds a fixed amount
    Flat { label: String, amount: f64 },
    /// Adds `quantity × rate`
    PerUnit { label: String, quantity: f64, rate: f64 },
    /// Adds a percentage of the pre-multiplier base
    PercentOfBase { label: String, percent: f64 },
}

impl Adjustment {
    pub fn multiplier(label: impl Into<String>, factor: f64) -> Self {
        Adjustment::Multiplier {
            label: label.into(),
            factor,
        }
    }

    pub fn flat(label: impl Into<String>, amount: f64) -> Self {
        Adjustment::Flat {
            label: label.into(),
            amount,
        }
    }

    pub fn per_unit(label: impl Into<String>, quantity: f64, rate: f64) -> Self {
        Adjustment::PerUnit {
            label: label.into(),
            quantity,
            rate,
        }
    }

    pub fn percent_of_base(label: impl Into<String>, percent: f64) -> Self {
        Adjustment::PercentOfBase {
            label: label.into(),
            percent,
        }
    }

    /// Display label
    pub fn label(&self) -> &str {
        match self {
            Adjustment::Multiplier { label, .. }
            | Adjustment::Flat { label, .. }
            | Adjustment::PerUnit { label, .. }
            | Adjustment::PercentOfBase { label, .. } => label,
        }
    }

    /// True for adjustments applied in the multiplier phase
    pub fn is_multiplier(&self) -> bool {
        matches!(self, Adjustment::Multiplier { .. })
    }
}

/// One applied adjustment and what it changed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentLine {
    pub label: String,
    /// Change to the running total caused by this line
    pub delta: f64,
    /// Running total after this line
    pub running_total: f64,
}

/// Result of applying an adjustment list to a base amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentBreakdown {
    pub base: f64,
    pub after_multipliers: f64,
    pub lines: Vec<AdjustmentLine>,
    pub total: f64,
}

/// Apply adjustments to a base amount, multipliers first.
///
/// Non-finite or negative factors and amounts are treated as zero so a
/// half-typed form can never produce NaN.
pub fn apply_adjustments(base: f64, adjustments: &[Adjustment]) -> AdjustmentBreakdown {
    let base = non_negative(base);
    let mut running = base;
    let mut lines = Vec::with_capacity(adjustments.len());

    for adj in adjustments.iter().filter(|a| a.is_multiplier()) {
        if let Adjustment::Multiplier { label, factor } = adj {
            let next = running * non_negative(*factor);
            lines.push(AdjustmentLine {
                label: label.clone(),
                delta: next - running,
                running_total: next,
            });
            running = next;
        }
    }
    let after_multipliers = running;

    for adj in adjustments.iter().filter(|a| !a.is_multiplier()) {
        let delta = match adj {
            Adjustment::Flat { amount, .. } => non_negative(*amount),
            Adjustment::PerUnit { quantity, rate, .. } => non_negative(*quantity) * non_negative(*rate),
            Adjustment::PercentOfBase { percent, .. } => base * non_negative(*percent) / 100.0,
            Adjustment::Multiplier { .. } => 0.0,
        };
        running += delta;
        lines.push(AdjustmentLine {
            label: adj.label().to_string(),
            delta,
            running_total: running,
        });
    }

    AdjustmentBreakdown {
        base,
        after_multipliers,
        lines,
        total: running,
    }
}
