//! # Unit Types
//!
//! Type-safe wrappers for estimator units plus the unit toggles offered by
//! each tool. The wrappers are plain f64 newtypes so JSON stays clean.
//!
//! ## US Customary Units (Primary)
//!
//! Estimators normalize to US customary base units before deriving anything:
//! - Length: feet (ft), with inches for depths and thicknesses
//! - Area: square feet (sq ft)
//! - Volume: cubic feet (cu ft) and cubic yards (cu yd, 27 cu ft)
//! - Weight: pounds (lb) and short tons (2000 lb)
//! - Water hardness: grains per gallon (GPG)
//!
//! ## Example
//!
//! ```rust
//! use calc_core::units::{CuFt, CuYd, Feet, Inches, LengthUnit};
//!
//! let depth = Inches(3.0);
//! let depth_ft: Feet = depth.into();
//! assert_eq!(depth_ft.0, 0.25);
//!
//! let volume: CuYd = CuFt(54.0).into();
//! assert_eq!(volume.0, 2.0);
//!
//! assert_eq!(LengthUnit::Yards.to_feet(2.0), 6.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

use crate::errors::{CalcError, CalcResult};

/// Inches per foot
pub const INCHES_PER_FOOT: f64 = 12.0;
/// Cubic feet per cubic yard
pub const CUBIC_FEET_PER_YARD: f64 = 27.0;
/// Pounds per short ton
pub const POUNDS_PER_TON: f64 = 2000.0;
/// Feet per meter (exact: 1 ft = 0.3048 m)
pub const FEET_PER_METER: f64 = 1.0 / 0.3048;
/// Square feet per acre
pub const SQFT_PER_ACRE: f64 = 43_560.0;
/// Parts per million (mg/L CaCO3) per grain per gallon
pub const PPM_PER_GPG: f64 = 17.1;
/// Newton-meters per pound-foot
pub const NM_PER_LBFT: f64 = 1.355_818;

// ============================================================================
// Length Units
// ============================================================================

/// Length in feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feet(pub f64);

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

impl From<Feet> for Inches {
    fn from(ft: Feet) -> Self {
        Inches(ft.0 * INCHES_PER_FOOT)
    }
}

impl From<Inches> for Feet {
    fn from(inches: Inches) -> Self {
        Feet(inches.0 / INCHES_PER_FOOT)
    }
}

// ============================================================================
// Area and Volume Units
// ============================================================================

/// Area in square feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqFt(pub f64);

/// Volume in cubic feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CuFt(pub f64);

/// Volume in cubic yards
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CuYd(pub f64);

impl From<CuFt> for CuYd {
    fn from(cuft: CuFt) -> Self {
        CuYd(cuft.0 / CUBIC_FEET_PER_YARD)
    }
}

impl From<CuYd> for CuFt {
    fn from(cuyd: CuYd) -> Self {
        CuFt(cuyd.0 * CUBIC_FEET_PER_YARD)
    }
}

impl Feet {
    /// Area of a rectangle with this length and the given width
    pub fn by(self, width: Feet) -> SqFt {
        SqFt(self.0 * width.0)
    }
}

impl SqFt {
    /// Volume of a slab of this area at the given depth
    pub fn at_depth(self, depth: Feet) -> CuFt {
        CuFt(self.0 * depth.0)
    }
}

// ============================================================================
// Weight Units
// ============================================================================

/// Weight in pounds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pounds(pub f64);

/// Weight in short tons (2000 lb)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tons(pub f64);

impl From<Pounds> for Tons {
    fn from(lb: Pounds) -> Self {
        Tons(lb.0 / POUNDS_PER_TON)
    }
}

impl From<Tons> for Pounds {
    fn from(t: Tons) -> Self {
        Pounds(t.0 * POUNDS_PER_TON)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Feet);
impl_arithmetic!(Inches);
impl_arithmetic!(SqFt);
impl_arithmetic!(CuFt);
impl_arithmetic!(CuYd);
impl_arithmetic!(Pounds);
impl_arithmetic!(Tons);

// ============================================================================
// Unit Toggles
// ============================================================================

/// Length unit offered by a dimension toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthUnit {
    #[default]
    Feet,
    Inches,
    Yards,
    Meters,
    Centimeters,
}

impl LengthUnit {
    /// All length units for UI selection
    pub const ALL: [LengthUnit; 5] = [
        LengthUnit::Feet,
        LengthUnit::Inches,
        LengthUnit::Yards,
        LengthUnit::Meters,
        LengthUnit::Centimeters,
    ];

    /// Normalize a value in this unit to feet
    pub fn to_feet(&self, value: f64) -> f64 {
        match self {
            LengthUnit::Feet => value,
            LengthUnit::Inches => value / INCHES_PER_FOOT,
            LengthUnit::Yards => value * 3.0,
            LengthUnit::Meters => value / 0.3048,
            LengthUnit::Centimeters => value / 30.48,
        }
    }

    /// Express a length in feet in this unit
    pub fn from_feet(&self, feet: f64) -> f64 {
        match self {
            LengthUnit::Feet => feet,
            LengthUnit::Inches => feet * INCHES_PER_FOOT,
            LengthUnit::Yards => feet / 3.0,
            LengthUnit::Meters => feet * 0.3048,
            LengthUnit::Centimeters => feet * 30.48,
        }
    }

    /// Normalize a value in this unit to inches
    pub fn to_inches(&self, value: f64) -> f64 {
        match self {
            LengthUnit::Inches => value,
            other => other.to_feet(value) * INCHES_PER_FOOT,
        }
    }

    /// Convert a value between two length units
    pub fn convert(value: f64, from: LengthUnit, to: LengthUnit) -> f64 {
        to.from_feet(from.to_feet(value))
    }

    /// Short unit label
    pub fn symbol(&self) -> &'static str {
        match self {
            LengthUnit::Feet => "ft",
            LengthUnit::Inches => "in",
            LengthUnit::Yards => "yd",
            LengthUnit::Meters => "m",
            LengthUnit::Centimeters => "cm",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "ft" | "feet" | "foot" | "'" => Ok(LengthUnit::Feet),
            "in" | "inch" | "inches" | "\"" => Ok(LengthUnit::Inches),
            "yd" | "yard" | "yards" => Ok(LengthUnit::Yards),
            "m" | "meter" | "meters" | "metre" | "metres" => Ok(LengthUnit::Meters),
            "cm" | "centimeter" | "centimeters" => Ok(LengthUnit::Centimeters),
            _ => Err(CalcError::unknown_category("length unit", s)),
        }
    }
}

impl std::fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Area unit for tools that take an area directly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaUnit {
    #[default]
    Acres,
    SquareFeet,
    SquareMeters,
}

impl AreaUnit {
    /// Normalize a value in this unit to square feet
    pub fn to_sqft(&self, value: f64) -> f64 {
        match self {
            AreaUnit::Acres => value * SQFT_PER_ACRE,
            AreaUnit::SquareFeet => value,
            AreaUnit::SquareMeters => value * FEET_PER_METER * FEET_PER_METER,
        }
    }

    /// Express an area in square feet in this unit
    pub fn from_sqft(&self, sqft: f64) -> f64 {
        match self {
            AreaUnit::Acres => sqft / SQFT_PER_ACRE,
            AreaUnit::SquareFeet => sqft,
            AreaUnit::SquareMeters => sqft / (FEET_PER_METER * FEET_PER_METER),
        }
    }

    /// Short unit label
    pub fn symbol(&self) -> &'static str {
        match self {
            AreaUnit::Acres => "ac",
            AreaUnit::SquareFeet => "sq ft",
            AreaUnit::SquareMeters => "m²",
        }
    }
}

/// Water hardness unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HardnessUnit {
    /// Grains per gallon
    #[default]
    Gpg,
    /// Parts per million (mg/L as CaCO3)
    Ppm,
}

impl HardnessUnit {
    /// Normalize a hardness reading to grains per gallon
    pub fn to_gpg(&self, value: f64) -> f64 {
        match self {
            HardnessUnit::Gpg => value,
            HardnessUnit::Ppm => value / PPM_PER_GPG,
        }
    }

    /// Express a hardness in GPG in this unit
    pub fn from_gpg(&self, gpg: f64) -> f64 {
        match self {
            HardnessUnit::Gpg => gpg,
            HardnessUnit::Ppm => gpg * PPM_PER_GPG,
        }
    }

    /// Short unit label
    pub fn symbol(&self) -> &'static str {
        match self {
            HardnessUnit::Gpg => "GPG",
            HardnessUnit::Ppm => "ppm",
        }
    }
}

/// Torque unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TorqueUnit {
    #[default]
    NewtonMeters,
    PoundFeet,
}

impl TorqueUnit {
    /// Normalize a torque to newton-meters
    pub fn to_nm(&self, value: f64) -> f64 {
        match self {
            TorqueUnit::NewtonMeters => value,
            TorqueUnit::PoundFeet => value * NM_PER_LBFT,
        }
    }

    /// Express a torque in N·m in this unit
    pub fn from_nm(&self, nm: f64) -> f64 {
        match self {
            TorqueUnit::NewtonMeters => nm,
            TorqueUnit::PoundFeet => nm / NM_PER_LBFT,
        }
    }

    /// Short unit label
    pub fn symbol(&self) -> &'static str {
        match self {
            TorqueUnit::NewtonMeters => "N·m",
            TorqueUnit::PoundFeet => "lb·ft",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feet_to_inches() {
        let ft = Feet(10.0);
        let inches: Inches = ft.into();
        assert_eq!(inches.0, 120.0);
    }

    #[test]
    fn test_cubic_conversions() {
        let yd: CuYd = CuFt(27.0).into();
        assert_eq!(yd.0, 1.0);
        let t: Tons = Pounds(2125.0).into();
        assert!((t.0 - 1.0625).abs() < 1e-12);
    }

    #[test]
    fn test_area_and_volume() {
        let area = Feet(10.0).by(Feet(10.0));
        assert_eq!(area, SqFt(100.0));
        let volume = area.at_depth(Inches(3.0).into());
        assert_eq!(volume, CuFt(25.0));
    }

    #[test]
    fn test_arithmetic() {
        let a = Feet(10.0);
        let b = Feet(5.0);
        assert_eq!((a + b).0, 15.0);
        assert_eq!((a - b).0, 5.0);
        assert_eq!((a * 2.0).0, 20.0);
        assert_eq!((a / 2.0).0, 5.0);
    }

    #[test]
    fn test_length_round_trip() {
        for &from in &LengthUnit::ALL {
            for &to in &LengthUnit::ALL {
                let value = 17.375;
                let there = LengthUnit::convert(value, from, to);
                let back = LengthUnit::convert(there, to, from);
                assert!((back - value).abs() < 1e-6, "{from:?} -> {to:?}");
            }
        }
    }

    #[test]
    fn test_area_round_trip() {
        for unit in [AreaUnit::Acres, AreaUnit::SquareFeet, AreaUnit::SquareMeters] {
            let back = unit.from_sqft(unit.to_sqft(2.5));
            assert!((back - 2.5).abs() < 1e-6);
        }
        assert_eq!(AreaUnit::Acres.to_sqft(1.0), 43_560.0);
    }

    #[test]
    fn test_hardness_and_torque_round_trip() {
        let ppm = HardnessUnit::Ppm.from_gpg(10.0);
        assert!((ppm - 171.0).abs() < 1e-9);
        assert!((HardnessUnit::Ppm.to_gpg(ppm) - 10.0).abs() < 1e-6);

        let lbft = TorqueUnit::PoundFeet.from_nm(250.0);
        assert!((TorqueUnit::PoundFeet.to_nm(lbft) - 250.0).abs() < 1e-6);
    }

    #[test]
    fn test_metric_lengths() {
        assert!((LengthUnit::Meters.to_feet(0.3048) - 1.0).abs() < 1e-12);
        assert!((LengthUnit::Centimeters.to_inches(2.54) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_parse_length_unit() {
        assert_eq!(LengthUnit::from_str_flexible("Yards").unwrap(), LengthUnit::Yards);
        assert_eq!(LengthUnit::from_str_flexible(" in ").unwrap(), LengthUnit::Inches);
        assert!(LengthUnit::from_str_flexible("furlong").is_err());
    }

    #[test]
    fn test_serialization() {
        let ft = Feet(12.5);
        let json = serde_json::to_string(&ft).unwrap();
        assert_eq!(json, "12.5");

        let roundtrip: Feet = serde_json::from_str(&json).unwrap();
        assert_eq!(ft, roundtrip);

        assert_eq!(serde_json::to_string(&LengthUnit::Centimeters).unwrap(), "\"centimeters\"");
    }
}
