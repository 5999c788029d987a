//! # Water Softener Sizing
//!
//! Sizes a softener from household demand. Dissolved iron fouls resin, so
//! each ppm of iron is counted as extra hardness.
//!
//! ```text
//! compensated hardness (GPG) = hardness + 5 × iron (ppm)
//! daily grains  = people × gallons per person × compensated hardness
//! weekly grains = daily × 7
//! recommended   = weekly × 1.25 (reserve)
//! capacity      = smallest standard unit ≥ recommended
//! ```
//!
//! The hardness unit toggle *converts* the typed value, unlike the
//! dimension toggles elsewhere: a test strip result stays the same water
//! whichever unit it is shown in.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::estimator::{Tool, ToolCategory};
use crate::format::{format_number, Breakdown, ResultRow};
use crate::input::{safe_div, NumericField};
use crate::settings::Settings;
use crate::table::{next_tier_up, CoefficientTable};
use crate::units::HardnessUnit;

/// Hardness added per ppm of dissolved iron
pub const GPG_PER_PPM_IRON: f64 = 5.0;
/// Capacity reserve on top of a week of demand
pub const RESERVE_FACTOR: f64 = 1.25;
/// Grains removed per pound of salt at a typical efficiency setting
pub const GRAINS_PER_LB_SALT: f64 = 3000.0;

/// Standard residential softener capacities in grains
pub const STANDARD_CAPACITIES: [f64; 9] = [
    16_000.0, 24_000.0, 32_000.0, 40_000.0, 48_000.0, 64_000.0, 80_000.0, 96_000.0, 110_000.0,
];

#[derive(Debug, Clone, PartialEq)]
pub struct UsageLevel {
    pub name: &'static str,
    pub gallons_per_person: f64,
}

pub static USAGE_LEVELS: Lazy<CoefficientTable<UsageLevel>> = Lazy::new(|| {
    let usage = |name, gallons_per_person| UsageLevel {
        name,
        gallons_per_person,
    };
    CoefficientTable::new(
        usage("Average", 75.0),
        vec![
            ("low", usage("Low (50 gal/person)", 50.0)),
            ("average", usage("Average (75 gal/person)", 75.0)),
            ("high", usage("High (100 gal/person)", 100.0)),
        ],
    )
});

/// Input state for the water softener calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterSoftenerInput {
    pub people: NumericField,
    pub usage: String,
    pub hardness: NumericField,
    pub hardness_unit: HardnessUnit,
    pub iron_ppm: NumericField,
}

impl Default for WaterSoftenerInput {
    fn default() -> Self {
        WaterSoftenerInput {
            people: "4".into(),
            usage: "average".to_string(),
            hardness: "10".into(),
            hardness_unit: HardnessUnit::Gpg,
            iron_ppm: "0".into(),
        }
    }
}

impl WaterSoftenerInput {
    pub fn set_usage(&mut self, key: &str) -> CalcResult<()> {
        self.usage = USAGE_LEVELS.validate_key("usage level", key)?.to_string();
        Ok(())
    }

    /// Switch the hardness unit, converting the typed value so it still
    /// describes the same water. Unparseable text is left as typed.
    pub fn set_hardness_unit(&mut self, unit: HardnessUnit) {
        if unit == self.hardness_unit {
            return;
        }
        let from = self.hardness_unit;
        self.hardness.convert_with(|value| unit.from_gpg(from.to_gpg(value)));
        self.hardness_unit = unit;
    }
}

/// Result bundle for the water softener calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterSoftenerResult {
    pub usage_name: String,
    pub hardness_gpg: f64,
    pub compensated_hardness_gpg: f64,
    pub daily_gallons: f64,
    pub daily_grains: f64,
    pub weekly_grains: f64,
    pub recommended_grains: f64,
    /// Standard unit to buy; zero when there is no demand
    pub capacity_grains: f64,
    pub days_between_regenerations: f64,
    pub salt_lb_per_week: f64,
}

/// Water softener estimator
pub struct WaterSoftener;

impl Tool for WaterSoftener {
    const ID: &'static str = "water_softener";
    const NAME: &'static str = "Water Softener Size Calculator";
    const CATEGORY: ToolCategory = ToolCategory::Water;

    type Input = WaterSoftenerInput;
    type Output = WaterSoftenerResult;

    fn derive(input: &WaterSoftenerInput) -> WaterSoftenerResult {
        let usage = USAGE_LEVELS.get_or_fallback(&input.usage);

        let people = input.people.positive();
        let hardness_gpg = input.hardness_unit.to_gpg(input.hardness.positive());
        let compensated = hardness_gpg + GPG_PER_PPM_IRON * input.iron_ppm.positive();

        let daily_gallons = people * usage.gallons_per_person;
        let daily_grains = daily_gallons * compensated;
        let weekly_grains = daily_grains * 7.0;
        let recommended_grains = weekly_grains * RESERVE_FACTOR;
        let capacity_grains = if recommended_grains > 0.0 {
            next_tier_up(&STANDARD_CAPACITIES, recommended_grains).unwrap_or(0.0)
        } else {
            0.0
        };
        if recommended_grains > STANDARD_CAPACITIES[STANDARD_CAPACITIES.len() - 1] {
            tracing::debug!(recommended_grains, "demand exceeds largest standard softener");
        }

        WaterSoftenerResult {
            usage_name: usage.name.to_string(),
            hardness_gpg,
            compensated_hardness_gpg: compensated,
            daily_gallons,
            daily_grains,
            weekly_grains,
            recommended_grains,
            capacity_grains,
            days_between_regenerations: safe_div(capacity_grains, daily_grains),
            salt_lb_per_week: weekly_grains / GRAINS_PER_LB_SALT,
        }
    }
}

impl WaterSoftenerResult {
    /// True when even the largest standard unit is below the recommendation
    pub fn exceeds_standard_sizes(&self) -> bool {
        self.recommended_grains > self.capacity_grains
    }
}

impl Breakdown for WaterSoftenerResult {
    fn rows(&self, settings: &Settings) -> Vec<ResultRow> {
        let mut rows = vec![
            ResultRow::new("Usage", self.usage_name.clone()),
            ResultRow::new(
                "Compensated hardness",
                format!("{} GPG", format_number(self.compensated_hardness_gpg, 1, settings)),
            ),
            ResultRow::new("Daily grains", format_number(self.daily_grains, 0, settings)),
            ResultRow::new("Weekly grains", format_number(self.weekly_grains, 0, settings)),
            ResultRow::new(
                "Recommended (25% reserve)",
                format_number(self.recommended_grains, 0, settings),
            ),
            ResultRow::new(
                "Softener size",
                format!("{} grain", format_number(self.capacity_grains, 0, settings)),
            ),
            ResultRow::new(
                "Days between regenerations",
                format_number(self.days_between_regenerations, 1, settings),
            ),
            ResultRow::new(
                "Salt per week",
                format!("{} lb", format_number(self.salt_lb_per_week, 1, settings)),
            ),
        ];
        if self.exceeds_standard_sizes() {
            rows.push(ResultRow::new("Note", "Demand exceeds standard sizes; consider twin-tank units"));
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_of_four() {
        let result = WaterSoftener::derive(&WaterSoftenerInput::default());
        assert_eq!(result.daily_grains, 3000.0);
        assert_eq!(result.weekly_grains, 21000.0);
        assert_eq!(result.recommended_grains, 26250.0);
        assert_eq!(result.capacity_grains, 32000.0);
        assert!((result.days_between_regenerations - 32000.0 / 3000.0).abs() < 1e-9);
        assert_eq!(result.salt_lb_per_week, 7.0);
        assert!(!result.exceeds_standard_sizes());
    }

    #[test]
    fn test_iron_adds_hardness() {
        let mut input = WaterSoftenerInput::default();
        input.iron_ppm.set("2");
        let result = WaterSoftener::derive(&input);
        assert_eq!(result.compensated_hardness_gpg, 20.0);
        assert_eq!(result.daily_grains, 6000.0);
        // 6000 * 7 * 1.25 = 52500 -> 64k
        assert_eq!(result.capacity_grains, 64000.0);
    }

    #[test]
    fn test_hardness_toggle_converts() {
        let mut input = WaterSoftenerInput::default();
        input.set_hardness_unit(HardnessUnit::Ppm);
        assert_eq!(input.hardness.text(), "171");
        let result = WaterSoftener::derive(&input);
        assert!((result.hardness_gpg - 10.0).abs() < 1e-9);

        input.set_hardness_unit(HardnessUnit::Gpg);
        assert!((input.hardness.value() - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_oversized_demand_caps_at_largest() {
        let mut input = WaterSoftenerInput::default();
        input.people.set("12");
        input.set_usage("high").unwrap();
        input.hardness.set("25");
        let result = WaterSoftener::derive(&input);
        assert_eq!(result.capacity_grains, 110_000.0);
        assert!(result.exceeds_standard_sizes());
        let rows = result.rows(&Settings::default());
        assert_eq!(rows.last().unwrap().label, "Note");
    }

    #[test]
    fn test_zero_inputs() {
        for field in ["people", "hardness"] {
            let mut input = WaterSoftenerInput::default();
            match field {
                "people" => input.people.set(""),
                _ => input.hardness.set("0"),
            }
            let result = WaterSoftener::derive(&input);
            assert_eq!(result.daily_grains, 0.0);
            assert_eq!(result.capacity_grains, 0.0);
            assert_eq!(result.days_between_regenerations, 0.0);
            assert_eq!(result.salt_lb_per_week, 0.0);
        }
    }

    #[test]
    fn test_presented_size() {
        let rows = WaterSoftener::derive(&WaterSoftenerInput::default()).rows(&Settings::default());
        let size = rows.iter().find(|r| r.label == "Softener size").unwrap();
        assert_eq!(size.value, "32,000 grain");
    }

    #[test]
    fn test_huge_inputs_stay_finite() {
        let mut input = WaterSoftenerInput::default();
        input.people.set("1e200");
        input.hardness.set("1e200");
        input.iron_ppm.set("1e200");
        let result = WaterSoftener::derive(&input);
        assert!(result.daily_grains.is_finite());
        assert!(result.salt_lb_per_week.is_finite());
        assert_eq!(result.capacity_grains, 110_000.0);
        assert!(result.days_between_regenerations.is_finite());
    }
}
