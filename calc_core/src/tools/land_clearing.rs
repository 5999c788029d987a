//! # Land Clearing Cost Calculator
//!
//! Per-acre clearing cost by vegetation density, scaled by terrain and
//! regional cost level, then topped up with optional services.
//!
//! ## Modifier order
//!
//! 1. base = acres × cost per acre (low/high)
//! 2. × terrain multiplier, × regional cost multiplier
//! 3. + stump removal (per stump), + debris hauling (flat), + permit (flat),
//!    + erosion control (percentage of the step 1 base)
//!
//! See [`crate::adjust`] for how the order is enforced.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::adjust::{apply_adjustments, Adjustment, AdjustmentBreakdown};
use crate::errors::CalcResult;
use crate::estimator::{CostRange, Tool, ToolCategory};
use crate::format::{format_number, format_range, Breakdown, ResultRow};
use crate::input::{safe_div, NumericField};
use crate::settings::Settings;
use crate::table::CoefficientTable;
use crate::units::{AreaUnit, SQFT_PER_ACRE};

/// Stump grinding and removal, per stump
pub const STUMP_REMOVAL: CostRange = CostRange { low: 100.0, high: 400.0 };
/// Debris hauling, flat per job
pub const DEBRIS_HAULING: CostRange = CostRange { low: 500.0, high: 1500.0 };
/// Silt fence and erosion control, percent of the base clearing cost
pub const EROSION_CONTROL_PCT: f64 = 8.0;

// Terrain and regional cost level lead every adjustment list.
const MULTIPLIER_LINES: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct Vegetation {
    pub name: &'static str,
    pub cost_per_acre: CostRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Multiplier {
    pub name: &'static str,
    pub factor: f64,
}

pub static VEGETATION: Lazy<CoefficientTable<Vegetation>> = Lazy::new(|| {
    let vegetation = |name, low, high| Vegetation {
        name,
        cost_per_acre: CostRange::new(low, high),
    };
    CoefficientTable::new(
        vegetation("Moderate Brush", 2500.0, 4500.0),
        vec![
            ("light", vegetation("Light Brush / Grass", 1000.0, 2500.0)),
            ("moderate", vegetation("Moderate Brush", 2500.0, 4500.0)),
            ("heavy", vegetation("Heavy Brush / Small Trees", 4500.0, 6500.0)),
            ("wooded", vegetation("Heavily Wooded", 6000.0, 10000.0)),
        ],
    )
});

pub static TERRAIN: Lazy<CoefficientTable<Multiplier>> = Lazy::new(|| {
    let terrain = |name, factor| Multiplier { name, factor };
    CoefficientTable::new(
        terrain("Flat", 1.0),
        vec![
            ("flat", terrain("Flat", 1.0)),
            ("rolling", terrain("Rolling", 1.15)),
            ("sloped", terrain("Sloped", 1.3)),
            ("steep", terrain("Steep / Rocky", 1.6)),
        ],
    )
});

pub static COST_LEVELS: Lazy<CoefficientTable<Multiplier>> = Lazy::new(|| {
    let level = |name, factor| Multiplier { name, factor };
    CoefficientTable::new(
        level("Average", 1.0),
        vec![
            ("low", level("Low-Cost Area", 0.85)),
            ("average", level("Average", 1.0)),
            ("high", level("High-Cost Area", 1.25)),
        ],
    )
});

/// Input state for the land clearing calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandClearingInput {
    pub area: NumericField,
    pub area_unit: AreaUnit,
    pub vegetation: String,
    pub terrain: String,
    pub cost_level: String,
    /// Number of stumps to grind (empty means none)
    pub stumps: NumericField,
    pub haul_debris: bool,
    pub erosion_control: bool,
    pub permit_fee: NumericField,
}

impl Default for LandClearingInput {
    fn default() -> Self {
        LandClearingInput {
            area: "1".into(),
            area_unit: AreaUnit::Acres,
            vegetation: "moderate".to_string(),
            terrain: "flat".to_string(),
            cost_level: "average".to_string(),
            stumps: "0".into(),
            haul_debris: false,
            erosion_control: false,
            permit_fee: "0".into(),
        }
    }
}

impl LandClearingInput {
    pub fn set_vegetation(&mut self, key: &str) -> CalcResult<()> {
        self.vegetation = VEGETATION.validate_key("vegetation", key)?.to_string();
        Ok(())
    }

    pub fn set_terrain(&mut self, key: &str) -> CalcResult<()> {
        self.terrain = TERRAIN.validate_key("terrain", key)?.to_string();
        Ok(())
    }

    pub fn set_cost_level(&mut self, key: &str) -> CalcResult<()> {
        self.cost_level = COST_LEVELS.validate_key("cost level", key)?.to_string();
        Ok(())
    }

    /// Switch the area unit; the typed number is re-read in the new unit
    pub fn set_area_unit(&mut self, unit: AreaUnit) {
        self.area_unit = unit;
    }

    /// Modifier list for one end of the range
    fn adjustments(&self, terrain: f64, cost_level: f64, high_end: bool) -> Vec<Adjustment> {
        let pick = |range: CostRange| if high_end { range.high } else { range.low };
        let mut adjustments = vec![
            Adjustment::multiplier("Terrain", terrain),
            Adjustment::multiplier("Regional cost level", cost_level),
        ];
        let stumps = self.stumps.positive().floor();
        if stumps > 0.0 {
            adjustments.push(Adjustment::per_unit("Stump removal", stumps, pick(STUMP_REMOVAL)));
        }
        if self.haul_debris {
            adjustments.push(Adjustment::flat("Debris hauling", pick(DEBRIS_HAULING)));
        }
        if self.erosion_control {
            adjustments.push(Adjustment::percent_of_base("Erosion control", EROSION_CONTROL_PCT));
        }
        let permit = self.permit_fee.positive();
        if permit > 0.0 {
            adjustments.push(Adjustment::flat("Permit", permit));
        }
        adjustments
    }
}

/// Result bundle for the land clearing calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandClearingResult {
    pub vegetation_name: String,
    pub terrain_name: String,
    pub cost_level_name: String,
    pub acres: f64,
    /// Clearing cost before any modifier
    pub base: CostRange,
    /// After terrain and regional multipliers
    pub after_multipliers: CostRange,
    pub total: CostRange,
    /// Total divided by acreage
    pub per_acre: CostRange,
    pub breakdown_low: AdjustmentBreakdown,
    pub breakdown_high: AdjustmentBreakdown,
}

/// Land clearing estimator
pub struct LandClearing;

impl Tool for LandClearing {
    const ID: &'static str = "land_clearing";
    const NAME: &'static str = "Land Clearing Cost Calculator";
    const CATEGORY: ToolCategory = ToolCategory::SiteWork;

    type Input = LandClearingInput;
    type Output = LandClearingResult;

    fn derive(input: &LandClearingInput) -> LandClearingResult {
        let vegetation = VEGETATION.get_or_fallback(&input.vegetation);
        let terrain = TERRAIN.get_or_fallback(&input.terrain);
        let cost_level = COST_LEVELS.get_or_fallback(&input.cost_level);

        let acres = input.area_unit.to_sqft(input.area.positive()) / SQFT_PER_ACRE;
        let base = vegetation.cost_per_acre.scale(acres);

        // No acreage, no services.
        let (low, high) = if acres > 0.0 {
            (
                apply_adjustments(base.low, &input.adjustments(terrain.factor, cost_level.factor, false)),
                apply_adjustments(base.high, &input.adjustments(terrain.factor, cost_level.factor, true)),
            )
        } else {
            (apply_adjustments(0.0, &[]), apply_adjustments(0.0, &[]))
        };

        let total = CostRange::new(low.total, high.total);
        LandClearingResult {
            vegetation_name: vegetation.name.to_string(),
            terrain_name: terrain.name.to_string(),
            cost_level_name: cost_level.name.to_string(),
            acres,
            base,
            after_multipliers: CostRange::new(low.after_multipliers, high.after_multipliers),
            total,
            per_acre: CostRange::new(safe_div(total.low, acres), safe_div(total.high, acres)),
            breakdown_low: low,
            breakdown_high: high,
        }
    }
}

impl Breakdown for LandClearingResult {
    fn rows(&self, settings: &Settings) -> Vec<ResultRow> {
        let mut rows = vec![
            ResultRow::new("Area", format!("{} acres", format_number(self.acres, 2, settings))),
            ResultRow::new("Vegetation", self.vegetation_name.clone()),
            ResultRow::new("Base clearing cost", format_range(&self.base, settings)),
            ResultRow::new(
                format!("{} terrain, {}", self.terrain_name, self.cost_level_name),
                format_range(&self.after_multipliers, settings),
            ),
        ];
        for (low, high) in self
            .breakdown_low
            .lines
            .iter()
            .zip(&self.breakdown_high.lines)
            .skip(MULTIPLIER_LINES)
        {
            let range = CostRange::new(low.delta, high.delta);
            rows.push(ResultRow::new(format!("+ {}", low.label), format_range(&range, settings)));
        }
        rows.push(ResultRow::new("Total", format_range(&self.total, settings)));
        rows.push(ResultRow::new("Per acre", format_range(&self.per_acre, settings)));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_acre_moderate() {
        let result = LandClearing::derive(&LandClearingInput::default());
        assert_eq!(result.acres, 1.0);
        assert_eq!(result.total, CostRange::new(2500.0, 4500.0));
        assert_eq!(result.per_acre, CostRange::new(2500.0, 4500.0));
    }

    #[test]
    fn test_multipliers_then_services() {
        let mut input = LandClearingInput::default();
        input.set_terrain("sloped").unwrap();
        input.set_cost_level("high").unwrap();
        input.stumps.set("4");
        input.haul_debris = true;
        input.erosion_control = true;
        input.permit_fee.set("200");

        let result = LandClearing::derive(&input);
        // low: 2500 * 1.3 * 1.25 = 4062.5; + 4*100 + 500 + 8% of 2500 (200) + 200
        assert!((result.after_multipliers.low - 4062.5).abs() < 1e-9);
        assert!((result.total.low - 5362.5).abs() < 1e-9);
        // high: 4500 * 1.625 = 7312.5; + 4*400 + 1500 + 360 + 200
        assert!((result.total.high - 10972.5).abs() < 1e-9);
    }

    #[test]
    fn test_area_in_square_feet() {
        let mut input = LandClearingInput::default();
        input.set_area_unit(AreaUnit::SquareFeet);
        input.area.set("21780");
        let result = LandClearing::derive(&input);
        assert!((result.acres - 0.5).abs() < 1e-12);
        assert!((result.total.low - 1250.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_area_ignores_services() {
        let mut input = LandClearingInput::default();
        input.area.set("");
        input.haul_debris = true;
        input.permit_fee.set("300");
        let result = LandClearing::derive(&input);
        assert!(result.total.is_zero());
        assert!(result.per_acre.is_zero());
    }

    #[test]
    fn test_rows_include_services() {
        let mut input = LandClearingInput::default();
        input.haul_debris = true;
        let rows = LandClearing::derive(&input).rows(&Settings::default());
        let hauling = rows.iter().find(|r| r.label == "+ Debris hauling").unwrap();
        assert_eq!(hauling.value, "$500–$1,500");
        assert_eq!(rows.last().unwrap().label, "Per acre");
        assert_eq!(rows.last().unwrap().value, "$2,500–$4,500");
    }

    #[test]
    fn test_per_acre_row_collapses_equal_ends() {
        let mut input = LandClearingInput::default();
        input.area.set("0");
        let rows = LandClearing::derive(&input).rows(&Settings::default());
        assert_eq!(rows.last().unwrap().value, "$0");
    }

    #[test]
    fn test_monotonic_in_area() {
        let mut previous = CostRange::zero();
        for tenth in 0..50 {
            let mut input = LandClearingInput::default();
            input.area.set_number(tenth as f64 / 10.0);
            input.stumps.set("2");
            let result = LandClearing::derive(&input);
            assert!(result.total.low >= previous.low);
            assert!(result.total.high >= previous.high);
            previous = result.total;
        }
    }

    #[test]
    fn test_huge_inputs_stay_finite() {
        let mut input = LandClearingInput::default();
        input.area.set("1e200");
        input.stumps.set("1e200");
        input.permit_fee.set("1e200");
        input.haul_debris = true;
        input.erosion_control = true;
        let result = LandClearing::derive(&input);
        assert!(result.total.high.is_finite() && result.total.high > 0.0);
        assert!(result.per_acre.high.is_finite());
    }
}
