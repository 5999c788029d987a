//! # Gravel Calculator
//!
//! Gravel quantity and cost range for a rectangular area. Choosing a
//! project type fills in its recommended depth; the user may then edit the
//! depth freely without the project type changing.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::estimator::{CostRange, Tool, ToolCategory};
use crate::format::{format_percent, format_quantity, format_range, Breakdown, ResultRow};
use crate::input::NumericField;
use crate::settings::Settings;
use crate::table::CoefficientTable;
use crate::units::{CuYd, Feet, LengthUnit};

use super::dimension_ft;

/// Project presets
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectType {
    pub name: &'static str,
    /// Depth filled in when this project type is selected
    pub recommended_depth_in: f64,
}

/// Gravel products
#[derive(Debug, Clone, PartialEq)]
pub struct GravelType {
    pub name: &'static str,
    pub tons_per_cuyd: f64,
    pub price_per_ton: CostRange,
}

pub static PROJECT_TYPES: Lazy<CoefficientTable<ProjectType>> = Lazy::new(|| {
    let project = |name, recommended_depth_in| ProjectType {
        name,
        recommended_depth_in,
    };
    CoefficientTable::new(
        project("Driveway", 4.0),
        vec![
            ("driveway", project("Driveway", 4.0)),
            ("walkway", project("Walkway / Path", 2.0)),
            ("patio", project("Patio Base", 3.0)),
            ("drainage", project("French Drain / Drainage", 6.0)),
            ("landscape", project("Landscape Bed", 2.0)),
        ],
    )
});

pub static GRAVEL_TYPES: Lazy<CoefficientTable<GravelType>> = Lazy::new(|| {
    let gravel = |name, tons_per_cuyd, low, high| GravelType {
        name,
        tons_per_cuyd,
        price_per_ton: CostRange::new(low, high),
    };
    CoefficientTable::new(
        gravel("Crushed Stone #57", 1.4, 30.0, 65.0),
        vec![
            ("crushed-57", gravel("Crushed Stone #57", 1.4, 30.0, 65.0)),
            ("pea-gravel", gravel("Pea Gravel", 1.4, 30.0, 55.0)),
            ("item-4", gravel("Item #4 Base", 1.5, 25.0, 45.0)),
            ("decomposed-granite", gravel("Decomposed Granite", 1.3, 35.0, 70.0)),
            ("river-gravel", gravel("River Gravel", 1.35, 45.0, 90.0)),
        ],
    )
});

/// Input state for the gravel calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravelInput {
    pub length: NumericField,
    pub width: NumericField,
    pub length_unit: LengthUnit,
    /// Depth in inches
    pub depth: NumericField,
    pub project_type: String,
    pub gravel_type: String,
    /// Waste allowance percentage
    pub waste_pct: NumericField,
}

impl Default for GravelInput {
    fn default() -> Self {
        GravelInput {
            length: "50".into(),
            width: "12".into(),
            length_unit: LengthUnit::Feet,
            depth: "4".into(),
            project_type: "driveway".to_string(),
            gravel_type: "crushed-57".to_string(),
            waste_pct: "5".into(),
        }
    }
}

impl GravelInput {
    /// Select a project type and reset the depth to its recommendation.
    ///
    /// The depth is overwritten even if the user edited it; later depth
    /// edits never change the project type.
    pub fn set_project_type(&mut self, key: &str) -> CalcResult<()> {
        let key = PROJECT_TYPES.validate_key("project type", key)?;
        self.project_type = key.to_string();
        let recommended = PROJECT_TYPES.get_or_fallback(key).recommended_depth_in;
        self.depth.set_number(recommended);
        Ok(())
    }

    /// Select a gravel product; unknown keys are rejected
    pub fn set_gravel_type(&mut self, key: &str) -> CalcResult<()> {
        self.gravel_type = GRAVEL_TYPES.validate_key("gravel type", key)?.to_string();
        Ok(())
    }
}

/// Result bundle for the gravel calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GravelResult {
    pub project_name: String,
    pub gravel_name: String,
    pub recommended_depth_in: f64,
    pub area_sqft: f64,
    /// Cubic yards including waste
    pub cubic_yards: f64,
    /// Tons including waste
    pub tons: f64,
    pub waste_pct: f64,
    pub cost: CostRange,
}

/// Gravel estimator
pub struct Gravel;

impl Tool for Gravel {
    const ID: &'static str = "gravel";
    const NAME: &'static str = "Gravel Calculator";
    const CATEGORY: ToolCategory = ToolCategory::Materials;

    type Input = GravelInput;
    type Output = GravelResult;

    fn derive(input: &GravelInput) -> GravelResult {
        let project = PROJECT_TYPES.get_or_fallback(&input.project_type);
        let gravel = GRAVEL_TYPES.get_or_fallback(&input.gravel_type);

        let area = Feet(dimension_ft(&input.length, input.length_unit))
            .by(Feet(dimension_ft(&input.width, input.length_unit)));
        let depth = Feet(dimension_ft(&input.depth, LengthUnit::Inches));
        let waste_pct = input.waste_pct.positive();

        let yards: CuYd = area.at_depth(depth).into();
        let yards = yards.0 * (1.0 + waste_pct / 100.0);
        let tons = yards * gravel.tons_per_cuyd;

        GravelResult {
            project_name: project.name.to_string(),
            gravel_name: gravel.name.to_string(),
            recommended_depth_in: project.recommended_depth_in,
            area_sqft: area.0,
            cubic_yards: yards,
            tons,
            waste_pct,
            cost: gravel.price_per_ton.scale(tons),
        }
    }
}

impl Breakdown for GravelResult {
    fn rows(&self, settings: &Settings) -> Vec<ResultRow> {
        vec![
            ResultRow::new("Project", self.project_name.clone()),
            ResultRow::new("Gravel", self.gravel_name.clone()),
            ResultRow::new(
                "Recommended depth",
                format!("{} in", format_quantity(self.recommended_depth_in, settings)),
            ),
            ResultRow::new("Area", format!("{} sq ft", format_quantity(self.area_sqft, settings))),
            ResultRow::new(
                format!("Cubic yards (incl. {} waste)", format_percent(self.waste_pct)),
                format_quantity(self.cubic_yards, settings),
            ),
            ResultRow::new("Tons", format_quantity(self.tons, settings)),
            ResultRow::new("Estimated cost", format_range(&self.cost, settings)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_driveway() {
        let result = Gravel::derive(&GravelInput::default());
        // 50 x 12 x (4/12) = 200 cu ft = 7.407 cu yd, +5% = 7.778
        assert_eq!(result.area_sqft, 600.0);
        assert!((result.cubic_yards - 7.7778).abs() < 1e-3);
        assert!((result.tons - 10.8889).abs() < 1e-3);
        assert!((result.cost.low - 326.67).abs() < 0.01);
        assert!((result.cost.high - 707.78).abs() < 0.01);
    }

    #[test]
    fn test_project_type_cascades_depth() {
        let mut input = GravelInput::default();
        input.set_project_type("drainage").unwrap();
        assert_eq!(input.depth.text(), "6");

        // One-way: editing depth keeps the project type
        input.depth.set("8");
        assert_eq!(input.project_type, "drainage");
        let result = Gravel::derive(&input);
        assert_eq!(result.project_name, "French Drain / Drainage");
        assert_eq!(result.recommended_depth_in, 6.0);

        // Re-selecting resets the edited depth
        input.set_project_type("walkway").unwrap();
        assert_eq!(input.depth.text(), "2");
    }

    #[test]
    fn test_unknown_project_type_leaves_depth() {
        let mut input = GravelInput::default();
        input.depth.set("5");
        assert!(input.set_project_type("moat").is_err());
        assert_eq!(input.depth.text(), "5");
        assert_eq!(input.project_type, "driveway");
    }

    #[test]
    fn test_cost_monotonic_in_width() {
        let mut previous = CostRange::zero();
        for width in 0..30 {
            let mut input = GravelInput::default();
            input.width.set(width.to_string());
            let result = Gravel::derive(&input);
            assert!(result.cost.low >= previous.low);
            assert!(result.cost.high >= previous.high);
            previous = result.cost;
        }
    }

    #[test]
    fn test_empty_inputs_zero() {
        let mut input = GravelInput::default();
        input.length.set("");
        input.waste_pct.set("");
        let result = Gravel::derive(&input);
        assert_eq!(result.tons, 0.0);
        assert!(result.cost.is_zero());
    }

    #[test]
    fn test_huge_dimensions_stay_finite() {
        let mut input = GravelInput::default();
        input.length.set("1e200");
        input.width.set("1e200");
        input.waste_pct.set("1e200");
        let result = Gravel::derive(&input);
        assert!(result.tons.is_finite());
        assert!(result.cost.high.is_finite() && result.cost.high > 0.0);

        input.depth.set("0");
        let result = Gravel::derive(&input);
        assert_eq!(result.tons, 0.0);
        assert!(result.cost.is_zero());
    }
}
