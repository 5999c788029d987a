//! # Spray Foam Insulation Calculator
//!
//! Spray foam is sold and priced by the board foot: one square foot at one
//! inch thick. Choosing an application fills in a recommended thickness.
//!
//! ```text
//! board feet = area (sq ft) × thickness (in)
//! R-value    = thickness × R per inch
//! cost       = board feet × cost per board foot (low/high)
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::estimator::{CostRange, Tool, ToolCategory};
use crate::format::{format_number, format_quantity, format_range, Breakdown, ResultRow};
use crate::input::NumericField;
use crate::settings::Settings;
use crate::table::CoefficientTable;
use crate::units::{Feet, LengthUnit};

use super::{dimension_ft, dimension_in};

/// Board feet covered by one two-component DIY kit
pub const BOARD_FEET_PER_KIT: f64 = 600.0;

#[derive(Debug, Clone, PartialEq)]
pub struct FoamType {
    pub name: &'static str,
    pub r_per_inch: f64,
    /// Installed cost per board foot
    pub cost_per_board_foot: CostRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Application {
    pub name: &'static str,
    pub recommended_thickness_in: f64,
}

pub static FOAM_TYPES: Lazy<CoefficientTable<FoamType>> = Lazy::new(|| {
    let foam = |name, r_per_inch, low, high| FoamType {
        name,
        r_per_inch,
        cost_per_board_foot: CostRange::new(low, high),
    };
    CoefficientTable::new(
        foam("Open-Cell", 3.7, 0.44, 0.65),
        vec![
            ("open-cell", foam("Open-Cell", 3.7, 0.44, 0.65)),
            ("closed-cell", foam("Closed-Cell", 6.5, 1.00, 1.50)),
            ("closed-cell-hfo", foam("Closed-Cell (HFO blowing agent)", 7.0, 1.25, 1.75)),
        ],
    )
});

pub static APPLICATIONS: Lazy<CoefficientTable<Application>> = Lazy::new(|| {
    let application = |name, recommended_thickness_in| Application {
        name,
        recommended_thickness_in,
    };
    CoefficientTable::new(
        application("Exterior Wall (2x4)", 3.5),
        vec![
            ("wall-2x4", application("Exterior Wall (2x4)", 3.5)),
            ("wall-2x6", application("Exterior Wall (2x6)", 5.5)),
            ("roof-deck", application("Attic Roof Deck", 6.0)),
            ("rim-joist", application("Rim Joist", 3.0)),
            ("crawlspace", application("Crawlspace Wall", 2.0)),
        ],
    )
});

/// Input state for the spray foam calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SprayFoamInput {
    pub length: NumericField,
    pub width: NumericField,
    pub length_unit: LengthUnit,
    pub thickness: NumericField,
    pub thickness_unit: LengthUnit,
    pub foam_type: String,
    pub application: String,
}

impl Default for SprayFoamInput {
    fn default() -> Self {
        SprayFoamInput {
            length: "40".into(),
            width: "8".into(),
            length_unit: LengthUnit::Feet,
            thickness: "3.5".into(),
            thickness_unit: LengthUnit::Inches,
            foam_type: "open-cell".to_string(),
            application: "wall-2x4".to_string(),
        }
    }
}

impl SprayFoamInput {
    pub fn set_foam_type(&mut self, key: &str) -> CalcResult<()> {
        self.foam_type = FOAM_TYPES.validate_key("foam type", key)?.to_string();
        Ok(())
    }

    /// Select an application and reset the thickness to its recommendation,
    /// expressed in the current thickness unit.
    pub fn set_application(&mut self, key: &str) -> CalcResult<()> {
        let key = APPLICATIONS.validate_key("application", key)?;
        self.application = key.to_string();
        let inches = APPLICATIONS.get_or_fallback(key).recommended_thickness_in;
        let feet = LengthUnit::Inches.to_feet(inches);
        self.thickness.set_number(self.thickness_unit.from_feet(feet));
        Ok(())
    }

    /// Switch the thickness unit; the typed number is re-read in the new unit
    pub fn set_thickness_unit(&mut self, unit: LengthUnit) {
        self.thickness_unit = unit;
    }
}

/// Result bundle for the spray foam calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprayFoamResult {
    pub foam_name: String,
    pub application_name: String,
    pub area_sqft: f64,
    pub thickness_in: f64,
    pub board_feet: f64,
    pub r_value: f64,
    /// 600 board-foot kits needed for a DIY job
    pub kits: u32,
    pub cost: CostRange,
}

/// Spray foam estimator
pub struct SprayFoam;

impl Tool for SprayFoam {
    const ID: &'static str = "spray_foam";
    const NAME: &'static str = "Spray Foam Insulation Calculator";
    const CATEGORY: ToolCategory = ToolCategory::Insulation;

    type Input = SprayFoamInput;
    type Output = SprayFoamResult;

    fn derive(input: &SprayFoamInput) -> SprayFoamResult {
        let foam = FOAM_TYPES.get_or_fallback(&input.foam_type);
        let application = APPLICATIONS.get_or_fallback(&input.application);

        let area = Feet(dimension_ft(&input.length, input.length_unit))
            .by(Feet(dimension_ft(&input.width, input.length_unit)));
        let thickness_in = dimension_in(&input.thickness, input.thickness_unit);
        let board_feet = area.0 * thickness_in;
        let kits = (board_feet / BOARD_FEET_PER_KIT).ceil();

        SprayFoamResult {
            foam_name: foam.name.to_string(),
            application_name: application.name.to_string(),
            area_sqft: area.0,
            thickness_in,
            board_feet,
            r_value: thickness_in * foam.r_per_inch,
            kits: if kits.is_finite() && kits > 0.0 { kits as u32 } else { 0 },
            cost: foam.cost_per_board_foot.scale(board_feet),
        }
    }
}

impl Breakdown for SprayFoamResult {
    fn rows(&self, settings: &Settings) -> Vec<ResultRow> {
        vec![
            ResultRow::new("Foam", self.foam_name.clone()),
            ResultRow::new("Application", self.application_name.clone()),
            ResultRow::new("Area", format!("{} sq ft", format_quantity(self.area_sqft, settings))),
            ResultRow::new("Board feet", format_number(self.board_feet, 0, settings)),
            ResultRow::new("R-value", format!("R-{}", format_number(self.r_value, 1, settings))),
            ResultRow::new("DIY kits (600 bf)", self.kits.to_string()),
            ResultRow::new("Installed cost", format_range(&self.cost, settings)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_feet_and_r_value() {
        let result = SprayFoam::derive(&SprayFoamInput::default());
        assert_eq!(result.area_sqft, 320.0);
        assert_eq!(result.board_feet, 1120.0);
        assert!((result.r_value - 12.95).abs() < 1e-9);
        assert_eq!(result.kits, 2);
        assert!((result.cost.low - 492.8).abs() < 1e-9);
        assert!((result.cost.high - 728.0).abs() < 1e-9);
    }

    #[test]
    fn test_application_cascade() {
        let mut input = SprayFoamInput::default();
        input.set_application("roof-deck").unwrap();
        assert_eq!(input.thickness.text(), "6");

        input.set_thickness_unit(LengthUnit::Centimeters);
        input.set_application("rim-joist").unwrap();
        assert_eq!(input.thickness.text(), "7.62");
        let result = SprayFoam::derive(&input);
        assert!((result.thickness_in - 3.0).abs() < 1e-9);
        assert_eq!(input.application, "rim-joist");
    }

    #[test]
    fn test_closed_cell_higher_r() {
        let mut input = SprayFoamInput::default();
        let open = SprayFoam::derive(&input);
        input.set_foam_type("closed-cell").unwrap();
        let closed = SprayFoam::derive(&input);
        assert!(closed.r_value > open.r_value);
        assert!(closed.cost.low > open.cost.high);
    }

    #[test]
    fn test_zero_thickness() {
        let mut input = SprayFoamInput::default();
        input.thickness.set("");
        let result = SprayFoam::derive(&input);
        assert_eq!(result.board_feet, 0.0);
        assert_eq!(result.r_value, 0.0);
        assert_eq!(result.kits, 0);
        assert!(result.cost.is_zero());
    }

    #[test]
    fn test_monotonic_in_length() {
        let mut previous = 0.0;
        for length in 0..60 {
            let mut input = SprayFoamInput::default();
            input.length.set(length.to_string());
            let result = SprayFoam::derive(&input);
            assert!(result.cost.high >= previous);
            previous = result.cost.high;
        }
    }

    #[test]
    fn test_huge_dimensions_stay_finite() {
        let mut input = SprayFoamInput::default();
        input.length.set("1e200");
        input.width.set("1e200");
        input.thickness.set("1e200");
        let result = SprayFoam::derive(&input);
        assert!(result.board_feet.is_finite());
        assert!(result.r_value.is_finite());
        assert!(result.cost.high.is_finite() && result.cost.high > 0.0);

        input.thickness.set("0");
        let result = SprayFoam::derive(&input);
        assert_eq!(result.board_feet, 0.0);
        assert!(result.cost.is_zero());
    }
}
