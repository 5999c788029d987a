//! # Crusher Run Calculator
//!
//! Crusher run (crushed stone with fines) for driveway and patio bases.
//! Quarries sell by the ton or the cubic yard, so the price basis is a
//! toggle. An overage percentage covers compaction and spillage.
//!
//! ## Formula
//!
//! ```text
//! cubic yards = length × width × depth (ft) / 27
//! tons        = cubic yards × density (tons/cu yd) × (1 + overage)
//! cost        = tons × price/ton            (per-ton basis)
//!             = cubic yards × (1 + overage) × price/yd  (per-yard basis)
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::estimator::{Tool, ToolCategory};
use crate::format::{format_currency, format_percent, format_quantity, Breakdown, ResultRow};
use crate::input::NumericField;
use crate::settings::Settings;
use crate::table::CoefficientTable;
use crate::units::{CuFt, CuYd, Feet, LengthUnit};

use super::dimension_ft;

/// Coefficients for one base material grade
#[derive(Debug, Clone, PartialEq)]
pub struct BaseGrade {
    pub name: &'static str,
    /// Compacted density in tons per cubic yard
    pub tons_per_cuyd: f64,
}

/// Base grades in display order
pub static BASE_GRADES: Lazy<CoefficientTable<BaseGrade>> = Lazy::new(|| {
    let crusher_run = BaseGrade {
        name: "Crusher Run",
        tons_per_cuyd: 1.25,
    };
    CoefficientTable::new(
        crusher_run.clone(),
        vec![
            ("crusher-run", crusher_run),
            (
                "quarry-process",
                BaseGrade {
                    name: "Quarry Process (QP)",
                    tons_per_cuyd: 1.4,
                },
            ),
            (
                "recycled-concrete",
                BaseGrade {
                    name: "Recycled Concrete Base",
                    tons_per_cuyd: 1.1,
                },
            ),
        ],
    )
});

/// What the entered price is quoted per
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceBasis {
    #[default]
    PerTon,
    PerCubicYard,
}

/// Input state for the crusher run calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrusherRunInput {
    pub length: NumericField,
    pub width: NumericField,
    pub length_unit: LengthUnit,
    pub depth: NumericField,
    pub depth_unit: LengthUnit,
    /// Key into [`BASE_GRADES`]
    pub grade: String,
    /// Extra material as a percentage (empty means none)
    pub overage_pct: NumericField,
    pub price: NumericField,
    pub price_basis: PriceBasis,
}

impl Default for CrusherRunInput {
    fn default() -> Self {
        CrusherRunInput {
            length: "20".into(),
            width: "10".into(),
            length_unit: LengthUnit::Feet,
            depth: "4".into(),
            depth_unit: LengthUnit::Inches,
            grade: "crusher-run".to_string(),
            overage_pct: "10".into(),
            price: "35".into(),
            price_basis: PriceBasis::PerTon,
        }
    }
}

impl CrusherRunInput {
    /// Select a base grade; unknown keys are rejected
    pub fn set_grade(&mut self, key: &str) -> CalcResult<()> {
        self.grade = BASE_GRADES.validate_key("base grade", key)?.to_string();
        Ok(())
    }

    /// Switch the price basis. The entered price is re-read under the new basis.
    pub fn set_price_basis(&mut self, basis: PriceBasis) {
        self.price_basis = basis;
    }
}

/// Result bundle for the crusher run calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrusherRunResult {
    pub grade_name: String,
    pub area_sqft: f64,
    pub cubic_yards: f64,
    /// Cubic yards including overage
    pub cubic_yards_with_overage: f64,
    /// Tons before overage
    pub tons: f64,
    /// Tons including overage
    pub tons_with_overage: f64,
    pub overage_pct: f64,
    pub material_cost: f64,
}

/// Crusher run estimator
pub struct CrusherRun;

impl Tool for CrusherRun {
    const ID: &'static str = "crusher_run";
    const NAME: &'static str = "Crusher Run Calculator";
    const CATEGORY: ToolCategory = ToolCategory::Materials;

    type Input = CrusherRunInput;
    type Output = CrusherRunResult;

    fn derive(input: &CrusherRunInput) -> CrusherRunResult {
        let grade = BASE_GRADES.get_or_fallback(&input.grade);

        let area = Feet(dimension_ft(&input.length, input.length_unit))
            .by(Feet(dimension_ft(&input.width, input.length_unit)));
        let volume: CuFt = area.at_depth(Feet(dimension_ft(&input.depth, input.depth_unit)));
        let yards: CuYd = volume.into();

        let overage_pct = input.overage_pct.positive();
        let overage = 1.0 + overage_pct / 100.0;
        let tons = yards.0 * grade.tons_per_cuyd;
        let tons_with_overage = tons * overage;
        let yards_with_overage = yards.0 * overage;

        let price = input.price.positive();
        let material_cost = match input.price_basis {
            PriceBasis::PerTon => tons_with_overage * price,
            PriceBasis::PerCubicYard => yards_with_overage * price,
        };

        CrusherRunResult {
            grade_name: grade.name.to_string(),
            area_sqft: area.0,
            cubic_yards: yards.0,
            cubic_yards_with_overage: yards_with_overage,
            tons,
            tons_with_overage,
            overage_pct,
            material_cost,
        }
    }
}

impl Breakdown for CrusherRunResult {
    fn rows(&self, settings: &Settings) -> Vec<ResultRow> {
        vec![
            ResultRow::new("Material", self.grade_name.clone()),
            ResultRow::new("Area", format!("{} sq ft", format_quantity(self.area_sqft, settings))),
            ResultRow::new("Cubic yards", format_quantity(self.cubic_yards, settings)),
            ResultRow::new(
                format!("Tons (incl. {} extra)", format_percent(self.overage_pct)),
                format_quantity(self.tons_with_overage, settings),
            ),
            ResultRow::new("Material cost", format_currency(self.material_cost, settings)),
        ]
    }
}
