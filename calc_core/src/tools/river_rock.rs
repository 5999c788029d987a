//! # River Rock Calculator
//!
//! Estimates decorative rock for a rectangular bed: covered area, volume,
//! weight and delivered cost.
//!
//! ## Formula
//!
//! ```text
//! area (sq ft)   = length × width
//! volume (cu ft) = area × depth
//! weight (tons)  = volume × density (lb/cu ft) / 2000
//! cost           = weight × price per ton
//! ```
//!
//! ## Example
//!
//! ```rust
//! use calc_core::estimator::Tool;
//! use calc_core::tools::river_rock::{RiverRock, RiverRockInput};
//!
//! let mut input = RiverRockInput::default();
//! input.length.set("10");
//! input.width.set("10");
//! input.depth.set("3");
//! input.set_rock("river-rock-1-3").unwrap();
//! input.price_per_ton.set("50");
//!
//! let result = RiverRock::derive(&input);
//! assert_eq!(result.volume_cuft, 25.0);
//! assert!((result.weight_tons - 1.0625).abs() < 1e-9);
//! assert!((result.cost - 53.125).abs() < 1e-9);
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::estimator::{CostRange, Tool, ToolCategory};
use crate::format::{format_currency, format_quantity, format_range, Breakdown, ResultRow};
use crate::input::NumericField;
use crate::settings::Settings;
use crate::table::CoefficientTable;
use crate::units::{CuFt, CuYd, Feet, LengthUnit, Pounds, Tons};

use super::dimension_ft;

/// Coefficients for one rock product
#[derive(Debug, Clone, PartialEq)]
pub struct RockSpec {
    pub name: &'static str,
    /// Bulk density in pounds per cubic foot
    pub density_lb_per_cuft: f64,
    /// Typical delivered price per ton
    pub price_per_ton: CostRange,
}

const fn rock(name: &'static str, density_lb_per_cuft: f64, low: f64, high: f64) -> RockSpec {
    RockSpec {
        name,
        density_lb_per_cuft,
        price_per_ton: CostRange { low, high },
    }
}

/// Rock products in display order
pub static ROCK_TYPES: Lazy<CoefficientTable<RockSpec>> = Lazy::new(|| {
    CoefficientTable::new(
        rock("River Rock", 85.0, 50.0, 90.0),
        vec![
            ("river-rock-0.75-1", rock("3/4-1\" River Rock", 90.0, 45.0, 80.0)),
            ("river-rock-1-3", rock("1-3\" River Rock", 85.0, 50.0, 90.0)),
            ("river-rock-3-5", rock("3-5\" River Rock", 80.0, 55.0, 100.0)),
            ("pea-gravel", rock("Pea Gravel", 100.0, 30.0, 55.0)),
            ("egg-rock", rock("Egg Rock", 85.0, 60.0, 110.0)),
            ("mexican-beach-pebble", rock("Mexican Beach Pebble", 90.0, 300.0, 600.0)),
            ("lava-rock", rock("Lava Rock", 45.0, 80.0, 150.0)),
        ],
    )
});

/// Input state for the river rock calculator.
///
/// ## JSON Example
///
/// ```json
/// {
///   "length": "10",
///   "width": "10",
///   "length_unit": "feet",
///   "depth": "3",
///   "depth_unit": "inches",
///   "rock": "river-rock-1-3",
///   "price_per_ton": "50"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiverRockInput {
    pub length: NumericField,
    pub width: NumericField,
    /// Unit for length and width
    pub length_unit: LengthUnit,
    pub depth: NumericField,
    pub depth_unit: LengthUnit,
    /// Key into [`ROCK_TYPES`]
    pub rock: String,
    pub price_per_ton: NumericField,
}

impl Default for RiverRockInput {
    fn default() -> Self {
        RiverRockInput {
            length: "10".into(),
            width: "10".into(),
            length_unit: LengthUnit::Feet,
            depth: "3".into(),
            depth_unit: LengthUnit::Inches,
            rock: "river-rock-1-3".to_string(),
            price_per_ton: "50".into(),
        }
    }
}

impl RiverRockInput {
    /// Select a rock product; unknown keys are rejected and leave the selection unchanged
    pub fn set_rock(&mut self, key: &str) -> CalcResult<()> {
        self.rock = ROCK_TYPES.validate_key("rock type", key)?.to_string();
        Ok(())
    }

    /// Switch the length/width unit. The typed numbers are re-read in the new unit.
    pub fn set_length_unit(&mut self, unit: LengthUnit) {
        self.length_unit = unit;
    }

    /// Switch the depth unit. The typed number is re-read in the new unit.
    pub fn set_depth_unit(&mut self, unit: LengthUnit) {
        self.depth_unit = unit;
    }
}

/// Result bundle for the river rock calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiverRockResult {
    pub rock_name: String,
    pub area_sqft: f64,
    pub volume_cuft: f64,
    pub cubic_yards: f64,
    pub weight_lb: f64,
    pub weight_tons: f64,
    /// Weight × entered price
    pub cost: f64,
    /// Weight × typical market price range for this rock
    pub typical_cost: CostRange,
}

/// River rock estimator
pub struct RiverRock;

impl Tool for RiverRock {
    const ID: &'static str = "river_rock";
    const NAME: &'static str = "River Rock Calculator";
    const CATEGORY: ToolCategory = ToolCategory::Materials;

    type Input = RiverRockInput;
    type Output = RiverRockResult;

    fn derive(input: &RiverRockInput) -> RiverRockResult {
        let spec = ROCK_TYPES.get_or_fallback(&input.rock);

        let length = Feet(dimension_ft(&input.length, input.length_unit));
        let width = Feet(dimension_ft(&input.width, input.length_unit));
        let depth = Feet(dimension_ft(&input.depth, input.depth_unit));

        let area = length.by(width);
        let volume: CuFt = area.at_depth(depth);
        let yards: CuYd = volume.into();
        let weight = Pounds(volume.0 * spec.density_lb_per_cuft);
        let tons: Tons = weight.into();

        RiverRockResult {
            rock_name: spec.name.to_string(),
            area_sqft: area.0,
            volume_cuft: volume.0,
            cubic_yards: yards.0,
            weight_lb: weight.0,
            weight_tons: tons.0,
            cost: tons.0 * input.price_per_ton.positive(),
            typical_cost: spec.price_per_ton.scale(tons.0),
        }
    }
}

impl Breakdown for RiverRockResult {
    fn rows(&self, settings: &Settings) -> Vec<ResultRow> {
        vec![
            ResultRow::new("Rock", self.rock_name.clone()),
            ResultRow::new("Area", format!("{} sq ft", format_quantity(self.area_sqft, settings))),
            ResultRow::new("Volume", format!("{} cu ft", format_quantity(self.volume_cuft, settings))),
            ResultRow::new("Cubic yards", format_quantity(self.cubic_yards, settings)),
            ResultRow::new("Weight", format!("{} tons", format_quantity(self.weight_tons, settings))),
            ResultRow::new("Estimated cost", format_currency(self.cost, settings)),
            ResultRow::new("Typical market cost", format_range(&self.typical_cost, settings)),
        ]
    }
}
