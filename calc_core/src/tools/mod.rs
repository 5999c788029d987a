//! # Estimator Tools
//!
//! Each tool follows the pattern:
//!
//! - `*Input` - Input state: raw-text numbers, validated category keys, unit toggles
//! - `*Result` - Result bundle (JSON-serializable), derived fresh every time
//! - a unit struct implementing [`Tool`] whose `derive` is the pure formula
//!
//! ## Available Tools
//!
//! - [`river_rock`] - Decorative rock volume, weight and cost
//! - [`crusher_run`] - Crusher run base with overage, priced per ton or yard
//! - [`gravel`] - Gravel by project type with a cost range
//! - [`spray_foam`] - Spray foam board feet, R-value and cost range
//! - [`land_clearing`] - Clearing cost with terrain/region multipliers and services
//! - [`water_softener`] - Softener grain capacity sizing
//! - [`deck_joist`] - Maximum deck joist span and cantilever
//! - [`gear_ratio`] - Gear ratio, output speed/torque and unit conversions
//! - [`alliteration`] - Random alliterative phrases (not a [`Tool`]: it is randomized)

pub mod alliteration;
pub mod crusher_run;
pub mod deck_joist;
pub mod gear_ratio;
pub mod gravel;
pub mod land_clearing;
pub mod river_rock;
pub mod spray_foam;
pub mod water_softener;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::estimator::{Tool, ToolCategory};
use crate::format::{Breakdown, ResultRow};
use crate::input::NumericField;
use crate::settings::Settings;
use crate::units::LengthUnit;

pub use crusher_run::{CrusherRun, CrusherRunInput, CrusherRunResult};
pub use deck_joist::{DeckJoist, DeckJoistInput, DeckJoistResult};
pub use gear_ratio::{GearRatio, GearRatioInput, GearRatioResult};
pub use gravel::{Gravel, GravelInput, GravelResult};
pub use land_clearing::{LandClearing, LandClearingInput, LandClearingResult};
pub use river_rock::{RiverRock, RiverRockInput, RiverRockResult};
pub use spray_foam::{SprayFoam, SprayFoamInput, SprayFoamResult};
pub use water_softener::{WaterSoftener, WaterSoftenerInput, WaterSoftenerResult};

/// Read a dimension field and normalize it to feet.
///
/// Negative or unparseable entries read as zero.
pub(crate) fn dimension_ft(field: &NumericField, unit: LengthUnit) -> f64 {
    unit.to_feet(field.positive())
}

/// Read a dimension field and normalize it to inches.
pub(crate) fn dimension_in(field: &NumericField, unit: LengthUnit) -> f64 {
    unit.to_inches(field.positive())
}

/// Catalog entry describing one tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub category: ToolCategory,
}

impl ToolInfo {
    fn of<T: Tool>() -> Self {
        ToolInfo {
            id: T::ID,
            name: T::NAME,
            category: T::CATEGORY,
        }
    }
}

/// Every available tool, in display order
pub fn catalog() -> Vec<ToolInfo> {
    vec![
        ToolInfo::of::<RiverRock>(),
        ToolInfo::of::<CrusherRun>(),
        ToolInfo::of::<Gravel>(),
        ToolInfo::of::<SprayFoam>(),
        ToolInfo::of::<LandClearing>(),
        ToolInfo::of::<WaterSoftener>(),
        ToolInfo::of::<DeckJoist>(),
        ToolInfo::of::<GearRatio>(),
        ToolInfo {
            id: alliteration::TOOL_ID,
            name: alliteration::TOOL_NAME,
            category: ToolCategory::Text,
        },
    ]
}

/// A deterministic estimate request, tagged by tool id.
///
/// ## JSON Example
///
/// ```json
/// {
///   "tool": "river_rock",
///   "length": "10",
///   "width": "10",
///   "depth": "3",
///   "rock": "river-rock-1-3",
///   "price_per_ton": "50"
/// }
/// ```
///
/// Omitted fields take the tool's defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum EstimateRequest {
    RiverRock(RiverRockInput),
    CrusherRun(CrusherRunInput),
    Gravel(GravelInput),
    SprayFoam(SprayFoamInput),
    LandClearing(LandClearingInput),
    WaterSoftener(WaterSoftenerInput),
    DeckJoist(DeckJoistInput),
    GearRatio(GearRatioInput),
}

/// The result of evaluating an [`EstimateRequest`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateReport {
    pub tool: String,
    pub name: String,
    pub rows: Vec<ResultRow>,
    pub output: serde_json::Value,
}

impl EstimateRequest {
    /// Tool id for this request
    pub fn tool_id(&self) -> &'static str {
        match self {
            EstimateRequest::RiverRock(_) => RiverRock::ID,
            EstimateRequest::CrusherRun(_) => CrusherRun::ID,
            EstimateRequest::Gravel(_) => Gravel::ID,
            EstimateRequest::SprayFoam(_) => SprayFoam::ID,
            EstimateRequest::LandClearing(_) => LandClearing::ID,
            EstimateRequest::WaterSoftener(_) => WaterSoftener::ID,
            EstimateRequest::DeckJoist(_) => DeckJoist::ID,
            EstimateRequest::GearRatio(_) => GearRatio::ID,
        }
    }

    /// Default request for a tool id
    pub fn example(tool_id: &str) -> CalcResult<Self> {
        let request = match tool_id.trim() {
            id if id == RiverRock::ID => EstimateRequest::RiverRock(Default::default()),
            id if id == CrusherRun::ID => EstimateRequest::CrusherRun(Default::default()),
            id if id == Gravel::ID => EstimateRequest::Gravel(Default::default()),
            id if id == SprayFoam::ID => EstimateRequest::SprayFoam(Default::default()),
            id if id == LandClearing::ID => EstimateRequest::LandClearing(Default::default()),
            id if id == WaterSoftener::ID => EstimateRequest::WaterSoftener(Default::default()),
            id if id == DeckJoist::ID => EstimateRequest::DeckJoist(Default::default()),
            id if id == GearRatio::ID => EstimateRequest::GearRatio(Default::default()),
            other => return Err(CalcError::unknown_tool(other)),
        };
        Ok(request)
    }

    /// Derive and render the estimate
    pub fn evaluate(&self, settings: &Settings) -> CalcResult<EstimateReport> {
        match self {
            EstimateRequest::RiverRock(input) => report::<RiverRock>(input, settings),
            EstimateRequest::CrusherRun(input) => report::<CrusherRun>(input, settings),
            EstimateRequest::Gravel(input) => report::<Gravel>(input, settings),
            EstimateRequest::SprayFoam(input) => report::<SprayFoam>(input, settings),
            EstimateRequest::LandClearing(input) => report::<LandClearing>(input, settings),
            EstimateRequest::WaterSoftener(input) => report::<WaterSoftener>(input, settings),
            EstimateRequest::DeckJoist(input) => report::<DeckJoist>(input, settings),
            EstimateRequest::GearRatio(input) => report::<GearRatio>(input, settings),
        }
    }
}

fn report<T: Tool>(input: &T::Input, settings: &Settings) -> CalcResult<EstimateReport> {
    let output = T::derive(input);
    Ok(EstimateReport {
        tool: T::ID.to_string(),
        name: T::NAME.to_string(),
        rows: output.rows(settings),
        output: serde_json::to_value(&output)?,
    })
}

/// Parse one request or an array of requests from JSON
pub fn parse_requests(json: &str) -> CalcResult<Vec<EstimateRequest>> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<EstimateRequest>),
        One(Box<EstimateRequest>),
    }

    match serde_json::from_str::<OneOrMany>(json) {
        Ok(OneOrMany::Many(requests)) => Ok(requests),
        Ok(OneOrMany::One(request)) => Ok(vec![*request]),
        // Re-parse as a single request for a precise error message
        Err(_) => Ok(vec![serde_json::from_str::<EstimateRequest>(json)?]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_unique() {
        let tools = catalog();
        for (i, tool) in tools.iter().enumerate() {
            assert!(tools[..i].iter().all(|t| t.id != tool.id), "duplicate id {}", tool.id);
        }
        assert_eq!(tools.len(), 9);
    }

    #[test]
    fn test_every_example_evaluates() {
        let settings = Settings::default();
        for tool in catalog().iter().filter(|t| t.category != ToolCategory::Text) {
            let request = EstimateRequest::example(tool.id).unwrap();
            assert_eq!(request.tool_id(), tool.id);
            let report = request.evaluate(&settings).unwrap();
            assert!(!report.rows.is_empty());
        }
    }

    #[test]
    fn test_every_example_idempotent() {
        let settings = Settings::default();
        for tool in catalog().iter().filter(|t| t.category != ToolCategory::Text) {
            let request = EstimateRequest::example(tool.id).unwrap();
            let first = serde_json::to_string(&request.evaluate(&settings).unwrap()).unwrap();
            let second = serde_json::to_string(&request.evaluate(&settings).unwrap()).unwrap();
            assert_eq!(first, second, "{} is not repeatable", tool.id);
        }
    }

    #[test]
    fn test_unknown_tool() {
        let err = EstimateRequest::example("paint").unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_TOOL");
    }

    #[test]
    fn test_parse_single_and_many() {
        let one = parse_requests(r#"{"tool": "deck_joist", "species": "southern-pine"}"#).unwrap();
        assert_eq!(one.len(), 1);

        let many = parse_requests(
            r#"[{"tool": "gravel"}, {"tool": "river_rock", "length": 12, "width": "8"}]"#,
        )
        .unwrap();
        assert_eq!(many.len(), 2);
        assert_eq!(many[1].tool_id(), "river_rock");
    }

    #[test]
    fn test_parse_error() {
        let err = parse_requests(r#"{"tool": "paint"}"#).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_request_roundtrip() {
        let request = EstimateRequest::example("water_softener").unwrap();
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"tool\":\"water_softener\""));
        let parsed: EstimateRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, request);
    }
}
