//! # Gear Ratio Calculator
//!
//! Ratio, output speed and output torque for a simple two-gear pair, plus
//! road speed when a tire diameter is given.
//!
//! ```text
//! ratio         = driven teeth / driving teeth
//! output RPM    = input RPM / ratio
//! output torque = input torque × ratio × efficiency
//! mph           = output RPM × π × tire diameter (in) × 60 / 63,360
//! ```
//!
//! Toggling the torque unit converts the entered torque; toggling the tire
//! diameter unit re-reads the typed number.

use serde::{Deserialize, Serialize};

use crate::estimator::{Tool, ToolCategory};
use crate::format::{format_number, Breakdown, ResultRow};
use crate::input::{safe_div, NumericField};
use crate::settings::Settings;
use crate::units::{LengthUnit, TorqueUnit};

/// Inches in a mile
pub const INCHES_PER_MILE: f64 = 63_360.0;
pub const KM_PER_MILE: f64 = 1.609_344;

/// Input state for the gear ratio calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GearRatioInput {
    pub driving_teeth: NumericField,
    pub driven_teeth: NumericField,
    pub input_rpm: NumericField,
    pub input_torque: NumericField,
    pub torque_unit: TorqueUnit,
    /// Transmission efficiency in percent, capped at 100
    pub efficiency_pct: NumericField,
    /// Optional; leave empty to skip road speed
    pub tire_diameter: NumericField,
    pub tire_unit: LengthUnit,
}

impl Default for GearRatioInput {
    fn default() -> Self {
        GearRatioInput {
            driving_teeth: "20".into(),
            driven_teeth: "60".into(),
            input_rpm: "3000".into(),
            input_torque: "100".into(),
            torque_unit: TorqueUnit::NewtonMeters,
            efficiency_pct: "95".into(),
            tire_diameter: NumericField::default(),
            tire_unit: LengthUnit::Inches,
        }
    }
}

impl GearRatioInput {
    /// Switch the torque unit, converting the entered torque
    pub fn set_torque_unit(&mut self, unit: TorqueUnit) {
        if unit == self.torque_unit {
            return;
        }
        let from = self.torque_unit;
        self.input_torque.convert_with(|value| unit.from_nm(from.to_nm(value)));
        self.torque_unit = unit;
    }

    pub fn set_tire_unit(&mut self, unit: LengthUnit) {
        self.tire_unit = unit;
    }
}

/// Result bundle for the gear ratio calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GearRatioResult {
    /// Driven turns per driving turn; zero when either gear is missing
    pub ratio: f64,
    pub output_rpm: f64,
    pub output_torque_nm: f64,
    pub output_torque_lbft: f64,
    /// Torque in the unit the user entered
    pub torque_unit: TorqueUnit,
    pub speed_mph: Option<f64>,
    pub speed_kmh: Option<f64>,
}

impl GearRatioResult {
    /// Ratio as `3.00:1`
    pub fn ratio_label(&self) -> String {
        format!("{:.2}:1", self.ratio)
    }

    /// True when the output turns slower than the input
    pub fn is_reduction(&self) -> bool {
        self.ratio > 1.0
    }
}

/// Gear ratio estimator
pub struct GearRatio;

impl Tool for GearRatio {
    const ID: &'static str = "gear_ratio";
    const NAME: &'static str = "Gear Ratio Calculator";
    const CATEGORY: ToolCategory = ToolCategory::Conversion;

    type Input = GearRatioInput;
    type Output = GearRatioResult;

    fn derive(input: &GearRatioInput) -> GearRatioResult {
        let driving = input.driving_teeth.positive();
        let driven = input.driven_teeth.positive();
        let ratio = if driving > 0.0 && driven > 0.0 {
            safe_div(driven, driving)
        } else {
            0.0
        };

        let output_rpm = safe_div(input.input_rpm.positive(), ratio);
        let efficiency = input.efficiency_pct.clamped(0.0, 100.0) / 100.0;
        let torque_nm = input.torque_unit.to_nm(input.input_torque.positive());
        let output_torque_nm = torque_nm * ratio * efficiency;

        let tire_in = input.tire_unit.to_inches(input.tire_diameter.positive());
        let speed_mph = (tire_in > 0.0)
            .then(|| output_rpm * std::f64::consts::PI * tire_in * 60.0 / INCHES_PER_MILE);

        GearRatioResult {
            ratio,
            output_rpm,
            output_torque_nm,
            output_torque_lbft: TorqueUnit::PoundFeet.from_nm(output_torque_nm),
            torque_unit: input.torque_unit,
            speed_mph,
            speed_kmh: speed_mph.map(|mph| mph * KM_PER_MILE),
        }
    }
}

impl Breakdown for GearRatioResult {
    fn rows(&self, settings: &Settings) -> Vec<ResultRow> {
        let torque = self.torque_unit.from_nm(self.output_torque_nm);
        let mut rows = vec![
            ResultRow::new("Gear ratio", self.ratio_label()),
            ResultRow::new("Output speed", format!("{} RPM", format_number(self.output_rpm, 0, settings))),
            ResultRow::new(
                "Output torque",
                format!("{} {}", format_number(torque, 1, settings), self.torque_unit.symbol()),
            ),
        ];
        if let (Some(mph), Some(kmh)) = (self.speed_mph, self.speed_kmh) {
            rows.push(ResultRow::new(
                "Road speed",
                format!(
                    "{} mph ({} km/h)",
                    format_number(mph, 1, settings),
                    format_number(kmh, 1, settings)
                ),
            ));
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_to_one_reduction() {
        let result = GearRatio::derive(&GearRatioInput::default());
        assert_eq!(result.ratio, 3.0);
        assert_eq!(result.output_rpm, 1000.0);
        assert!((result.output_torque_nm - 285.0).abs() < 1e-9);
        assert!(result.is_reduction());
        assert_eq!(result.ratio_label(), "3.00:1");
        assert_eq!(result.speed_mph, None);
    }

    #[test]
    fn test_road_speed() {
        let mut input = GearRatioInput::default();
        input.tire_diameter.set("26");
        let result = GearRatio::derive(&input);
        let mph = result.speed_mph.unwrap();
        assert!((mph - 77.353).abs() < 0.01);
        assert!((result.speed_kmh.unwrap() - mph * 1.609344).abs() < 1e-9);

        // Same tire entered in centimeters
        input.set_tire_unit(LengthUnit::Centimeters);
        input.tire_diameter.set("66.04");
        let metric = GearRatio::derive(&input).speed_mph.unwrap();
        assert!((metric - mph).abs() < 1e-6);
    }

    #[test]
    fn test_torque_toggle_converts() {
        let mut input = GearRatioInput::default();
        let nm = GearRatio::derive(&input);
        input.set_torque_unit(TorqueUnit::PoundFeet);
        assert!((input.input_torque.value() - 100.0 / 1.355818).abs() < 1e-4);
        let lbft = GearRatio::derive(&input);
        assert!((lbft.output_torque_nm - nm.output_torque_nm).abs() < 1e-3);

        let rows = lbft.rows(&Settings::default());
        assert!(rows[2].value.ends_with("lb·ft"));
    }

    #[test]
    fn test_efficiency_capped() {
        let mut input = GearRatioInput::default();
        input.efficiency_pct.set("150");
        assert!((GearRatio::derive(&input).output_torque_nm - 300.0).abs() < 1e-9);
        input.efficiency_pct.set("");
        assert_eq!(GearRatio::derive(&input).output_torque_nm, 0.0);
    }

    #[test]
    fn test_missing_teeth_is_safe() {
        let mut input = GearRatioInput::default();
        input.driving_teeth.set("0");
        input.tire_diameter.set("26");
        let result = GearRatio::derive(&input);
        assert_eq!(result.ratio, 0.0);
        assert_eq!(result.output_rpm, 0.0);
        assert_eq!(result.output_torque_nm, 0.0);
        assert_eq!(result.speed_mph, Some(0.0));
        assert!(result.rows(&Settings::default()).iter().all(|r| !r.value.contains("NaN")));
    }

    #[test]
    fn test_huge_inputs_stay_finite() {
        let mut input = GearRatioInput::default();
        input.driving_teeth.set("1e200");
        input.input_rpm.set("1e200");
        input.input_torque.set("1e200");
        input.tire_diameter.set("1e200");
        let result = GearRatio::derive(&input);
        assert!(result.ratio > 0.0);
        assert!(result.output_rpm.is_finite());
        assert!(result.output_torque_nm.is_finite());
        assert!(result.speed_kmh.unwrap().is_finite());
    }
}
