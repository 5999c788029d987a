//! # Generic Estimator
//!
//! Every calculator follows the same loop: the input state changes, the
//! result is derived again from scratch, and the presenter renders it.
//! [`Tool`] captures the per-calculator part (its input record and a pure
//! derive function); [`Estimator`] is the loop itself.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::estimator::Estimator;
//! use calc_core::tools::river_rock::RiverRock;
//!
//! let mut estimator = Estimator::<RiverRock>::new();
//! let result = estimator.update(|input| {
//!     input.length.set("10");
//!     input.width.set("10");
//!     input.depth.set("3");
//! });
//! assert_eq!(result.area_sqft, 100.0);
//!
//! // Same input, same answer
//! assert_eq!(estimator.result(), result);
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::format::Breakdown;
use crate::input::non_negative;

/// Which family a tool belongs to (used by catalogs, not by derivations)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCategory {
    /// Bulk landscaping and hardscape materials
    Materials,
    /// Insulation and building envelope
    Insulation,
    /// Site work and labor costs
    SiteWork,
    /// Plumbing and water treatment
    Water,
    /// Framing and structure
    Framing,
    /// Conversions and mechanical calculators
    Conversion,
    /// Text generators
    Text,
}

/// A deterministic calculator: an input record and a pure derivation.
pub trait Tool {
    /// Stable identifier (used in JSON requests and the CLI)
    const ID: &'static str;
    /// Human-readable name
    const NAME: &'static str;
    /// Catalog grouping
    const CATEGORY: ToolCategory;

    /// Input state, initialised from hard-coded defaults
    type Input: Default + Clone + Serialize + DeserializeOwned;
    /// Result bundle, recomputed on every change
    type Output: Clone + PartialEq + Serialize + Breakdown;

    /// Derive the result bundle. Must be pure and never panic.
    fn derive(input: &Self::Input) -> Self::Output;
}

/// Holds one tool's input state and recomputes its result on demand.
pub struct Estimator<T: Tool> {
    input: T::Input,
}

impl<T: Tool> Estimator<T> {
    /// Start from the tool's defaults
    pub fn new() -> Self {
        Estimator {
            input: T::Input::default(),
        }
    }

    /// Current input state
    pub fn input(&self) -> &T::Input {
        &self.input
    }

    /// Mutate the input and return the freshly derived result
    pub fn update(&mut self, f: impl FnOnce(&mut T::Input)) -> T::Output {
        f(&mut self.input);
        self.result()
    }

    /// Mutate the input through a fallible setter (e.g. a categorical key).
    /// On error the input is left as the setter left it, which for table
    /// setters means unchanged.
    pub fn try_update<E>(&mut self, f: impl FnOnce(&mut T::Input) -> Result<(), E>) -> Result<T::Output, E> {
        f(&mut self.input)?;
        Ok(self.result())
    }

    /// Derive the result for the current input
    pub fn result(&self) -> T::Output {
        let output = T::derive(&self.input);
        tracing::debug!(tool = T::ID, "derived estimate");
        output
    }

    /// Restore the tool's defaults
    pub fn reset(&mut self) {
        self.input = T::Input::default();
    }
}

impl<T: Tool> Default for Estimator<T> {
    fn default() -> Self {
        Estimator::new()
    }
}

impl<T: Tool> Clone for Estimator<T> {
    fn clone(&self) -> Self {
        Estimator {
            input: self.input.clone(),
        }
    }
}

impl<T: Tool> std::fmt::Debug for Estimator<T>
where
    T::Input: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Estimator")
            .field("tool", &T::ID)
            .field("input", &self.input)
            .finish()
    }
}

/// A low/high pair, for costs quoted as a typical range.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CostRange {
    pub low: f64,
    pub high: f64,
}

impl CostRange {
    /// Build a range; ends are swapped if given out of order and
    /// non-finite/negative ends read as zero.
    pub fn new(low: f64, high: f64) -> Self {
        let (low, high) = (non_negative(low), non_negative(high));
        if low <= high {
            CostRange { low, high }
        } else {
            CostRange { low: high, high: low }
        }
    }

    /// A zero-width range
    pub fn exact(value: f64) -> Self {
        CostRange::new(value, value)
    }

    pub fn zero() -> Self {
        CostRange::default()
    }

    /// Multiply both ends by a quantity
    pub fn scale(self, factor: f64) -> Self {
        CostRange::new(self.low * factor, self.high * factor)
    }

    /// Add a fixed amount to both ends
    pub fn shift(self, amount: f64) -> Self {
        CostRange::new(self.low + amount, self.high + amount)
    }

    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    pub fn is_zero(&self) -> bool {
        self.low == 0.0 && self.high == 0.0
    }
}

impl std::ops::Add for CostRange {
    type Output = CostRange;
    fn add(self, rhs: CostRange) -> CostRange {
        CostRange::new(self.low + rhs.low, self.high + rhs.high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::crusher_run::{CrusherRun, CrusherRunInput};
    use crate::tools::gravel::Gravel;

    #[test]
    fn test_cost_range_normalizes() {
        let range = CostRange::new(300.0, 100.0);
        assert_eq!(range.low, 100.0);
        assert_eq!(range.high, 300.0);
        assert_eq!(CostRange::new(f64::NAN, 5.0), CostRange::new(0.0, 5.0));
        assert_eq!(range.midpoint(), 200.0);
        assert_eq!(range.scale(2.0), CostRange::new(200.0, 600.0));
        assert_eq!(range.shift(10.0), CostRange::new(110.0, 310.0));
        assert_eq!(range + CostRange::exact(1.0), CostRange::new(101.0, 301.0));
        assert!(CostRange::zero().is_zero());
    }

    #[test]
    fn test_update_recomputes() {
        let mut estimator = Estimator::<CrusherRun>::new();
        let first = estimator.update(|input| {
            input.length.set("20");
            input.width.set("10");
        });
        let second = estimator.update(|input| input.length.set("40"));
        assert!(second.cubic_yards > first.cubic_yards);
    }

    #[test]
    fn test_idempotent_result() {
        let estimator = Estimator::<Gravel>::new();
        let a = serde_json::to_string(&estimator.result()).unwrap();
        let b = serde_json::to_string(&estimator.result()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_try_update_keeps_state_on_error() {
        let mut estimator = Estimator::<Gravel>::new();
        let before = estimator.input().clone();
        let err = estimator.try_update(|input| input.set_gravel_type("moon-dust"));
        assert!(err.is_err());
        assert_eq!(estimator.input(), &before);
    }

    #[test]
    fn test_reset() {
        let mut estimator = Estimator::<CrusherRun>::new();
        estimator.update(|input| input.length.set("999"));
        estimator.reset();
        assert_eq!(estimator.input(), &CrusherRunInput::default());
    }
}
