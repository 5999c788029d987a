//! # calc_core - Quantity and Cost Estimation Engine
//!
//! `calc_core` is the computational heart of Yardstick: small, table-driven
//! estimators for landscaping materials, insulation, site work, water
//! treatment, framing and gearing. All inputs and outputs are
//! JSON-serializable so the same estimators can sit behind a CLI, a web form
//! or an assistant tool call.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: every estimate is a pure function of its input
//! - **Forgiving input**: numbers are kept as typed text and parsed on use;
//!   empty or garbage text reads as zero instead of failing
//! - **Validated categories**: dropdown keys are checked when set
//! - **Rich Errors**: structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use calc_core::tools::{RiverRock, RiverRockInput};
//! use calc_core::{Estimator, Settings};
//! use calc_core::format::Breakdown;
//!
//! let mut estimator = Estimator::<RiverRock>::new();
//! let result = estimator.update(|input: &mut RiverRockInput| {
//!     input.length.set("12");
//! });
//!
//! for row in result.rows(&Settings::default()) {
//!     println!("{}: {}", row.label, row.value);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`estimator`] - The [`Tool`] trait and generic [`Estimator`] state holder
//! - [`tools`] - Every estimator, plus JSON request dispatch
//! - [`input`] - Raw-text numeric fields
//! - [`table`] - Coefficient lookup tables and interpolation
//! - [`adjust`] - Ordered cost adjustments (multipliers, then additions)
//! - [`format`] - Result rows and number/currency formatting
//! - [`settings`] - Presentation settings loaded from TOML
//! - [`units`] - Type-safe unit wrappers and unit toggles
//! - [`errors`] - Structured error types

pub mod adjust;
pub mod errors;
pub mod estimator;
pub mod format;
pub mod input;
pub mod settings;
pub mod table;
pub mod tools;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use errors::{CalcError, CalcResult};
pub use estimator::{CostRange, Estimator, Tool, ToolCategory};
pub use input::NumericField;
pub use settings::Settings;
pub use table::CoefficientTable;
pub use tools::{catalog, parse_requests, EstimateReport, EstimateRequest};
