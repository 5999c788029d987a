//! # Deck Joist Span Calculator
//!
//! Maximum allowable joist span by species group, nominal size and
//! on-center spacing (40 psf live + 10 psf dead, L/360, No. 2 grade).
//! The tables list 12, 16 and 24 in spacing; 19.2 in spacing is
//! interpolated linearly between the 16 and 24 in values.
//!
//! Cantilever beyond the beam is limited to a quarter of the span.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::estimator::{Tool, ToolCategory};
use crate::format::{format_feet_inches, Breakdown, ResultRow};
use crate::input::NumericField;
use crate::settings::Settings;
use crate::table::{interpolate, CoefficientTable};
use crate::units::INCHES_PER_FOOT;

/// Spacings the span tables are published at
pub const TABULATED_SPACINGS: [f64; 3] = [12.0, 16.0, 24.0];

/// Maximum spans in inches at 12/16/24 in on center, per nominal size
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesSpans {
    pub name: &'static str,
    pub spans: [(&'static str, [f64; 3]); 4],
}

impl SpeciesSpans {
    fn spans_for(&self, size: &str) -> Option<&[f64; 3]> {
        self.spans.iter().find(|(s, _)| *s == size).map(|(_, spans)| spans)
    }
}

pub static SPECIES: Lazy<CoefficientTable<SpeciesSpans>> = Lazy::new(|| {
    let southern_pine = SpeciesSpans {
        name: "Southern Pine",
        spans: [
            ("2x6", [119.0, 108.0, 91.0]),
            ("2x8", [157.0, 142.0, 116.0]),
            ("2x10", [194.0, 168.0, 137.0]),
            ("2x12", [216.0, 198.0, 162.0]),
        ],
    };
    CoefficientTable::new(
        southern_pine.clone(),
        vec![
            ("southern-pine", southern_pine),
            (
                "douglas-fir-larch",
                SpeciesSpans {
                    name: "Douglas Fir-Larch",
                    spans: [
                        ("2x6", [114.0, 104.0, 86.0]),
                        ("2x8", [150.0, 133.0, 109.0]),
                        ("2x10", [188.0, 163.0, 133.0]),
                        ("2x12", [216.0, 189.0, 154.0]),
                    ],
                },
            ),
            (
                "hem-fir",
                SpeciesSpans {
                    name: "Hem-Fir",
                    spans: [
                        ("2x6", [110.0, 100.0, 84.0]),
                        ("2x8", [145.0, 130.0, 106.0]),
                        ("2x10", [184.0, 159.0, 130.0]),
                        ("2x12", [213.0, 184.0, 150.0]),
                    ],
                },
            ),
            (
                "spruce-pine-fir",
                SpeciesSpans {
                    name: "Spruce-Pine-Fir",
                    spans: [
                        ("2x6", [110.0, 100.0, 84.0]),
                        ("2x8", [145.0, 131.0, 107.0]),
                        ("2x10", [184.0, 160.0, 131.0]),
                        ("2x12", [214.0, 185.0, 151.0]),
                    ],
                },
            ),
            (
                "redwood-cedar",
                SpeciesSpans {
                    name: "Redwood / Western Cedar",
                    spans: [
                        ("2x6", [106.0, 96.0, 84.0]),
                        ("2x8", [140.0, 127.0, 104.0]),
                        ("2x10", [179.0, 156.0, 127.0]),
                        ("2x12", [209.0, 181.0, 148.0]),
                    ],
                },
            ),
        ],
    )
});

/// Nominal joist sizes
pub static SIZES: Lazy<CoefficientTable<&'static str>> = Lazy::new(|| {
    CoefficientTable::new(
        "2x8",
        vec![("2x6", "2x6"), ("2x8", "2x8"), ("2x10", "2x10"), ("2x12", "2x12")],
    )
});

/// On-center spacing options, in inches
pub static SPACINGS: Lazy<CoefficientTable<f64>> = Lazy::new(|| {
    CoefficientTable::new(16.0, vec![("12", 12.0), ("16", 16.0), ("19.2", 19.2), ("24", 24.0)])
});

/// Input state for the deck joist calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckJoistInput {
    pub species: String,
    pub size: String,
    pub spacing: String,
    /// Optional span the joists must cover, in feet
    pub required_span: NumericField,
}

impl Default for DeckJoistInput {
    fn default() -> Self {
        DeckJoistInput {
            species: "southern-pine".to_string(),
            size: "2x10".to_string(),
            spacing: "16".to_string(),
            required_span: NumericField::default(),
        }
    }
}

impl DeckJoistInput {
    pub fn set_species(&mut self, key: &str) -> CalcResult<()> {
        self.species = SPECIES.validate_key("species", key)?.to_string();
        Ok(())
    }

    pub fn set_size(&mut self, key: &str) -> CalcResult<()> {
        self.size = SIZES.validate_key("joist size", key)?.to_string();
        Ok(())
    }

    pub fn set_spacing(&mut self, key: &str) -> CalcResult<()> {
        self.spacing = SPACINGS.validate_key("joist spacing", key)?.to_string();
        Ok(())
    }
}

/// Result bundle for the deck joist calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckJoistResult {
    pub species_name: String,
    pub size: String,
    pub spacing_in: f64,
    /// Maximum span in whole inches
    pub max_span_in: f64,
    /// Maximum cantilever in whole inches
    pub max_cantilever_in: f64,
    /// Whether the joists cover the required span, when one was entered
    pub adequate: Option<bool>,
}

/// Deck joist span estimator
pub struct DeckJoist;

impl Tool for DeckJoist {
    const ID: &'static str = "deck_joist";
    const NAME: &'static str = "Deck Joist Span Calculator";
    const CATEGORY: ToolCategory = ToolCategory::Framing;

    type Input = DeckJoistInput;
    type Output = DeckJoistResult;

    fn derive(input: &DeckJoistInput) -> DeckJoistResult {
        let species = SPECIES.get_or_fallback(&input.species);
        let size = *SIZES.get_or_fallback(&input.size);
        let spacing_in = *SPACINGS.get_or_fallback(&input.spacing);

        let max_span_in = match species.spans_for(size) {
            Some(spans) => {
                let points: Vec<(f64, f64)> =
                    TABULATED_SPACINGS.iter().copied().zip(spans.iter().copied()).collect();
                interpolate(&points, spacing_in).floor()
            }
            None => {
                tracing::warn!(size, species = species.name, "no span data for joist size");
                0.0
            }
        };
        let max_cantilever_in = (max_span_in / 4.0).floor();

        let adequate = input
            .required_span
            .parse()
            .filter(|feet| *feet > 0.0)
            .map(|feet| feet * INCHES_PER_FOOT <= max_span_in);

        DeckJoistResult {
            species_name: species.name.to_string(),
            size: size.to_string(),
            spacing_in,
            max_span_in,
            max_cantilever_in,
            adequate,
        }
    }
}

impl Breakdown for DeckJoistResult {
    fn rows(&self, _settings: &Settings) -> Vec<ResultRow> {
        let mut rows = vec![
            ResultRow::new("Species", self.species_name.clone()),
            ResultRow::new("Joist", format!("{} @ {}\" o.c.", self.size, self.spacing_in)),
            ResultRow::new("Maximum span", format_feet_inches(self.max_span_in)),
            ResultRow::new("Maximum cantilever", format_feet_inches(self.max_cantilever_in)),
        ];
        if let Some(adequate) = self.adequate {
            let verdict = if adequate { "OK" } else { "Too long, upsize or reduce spacing" };
            rows.push(ResultRow::new("Required span", verdict));
        }
        rows
    }
}
