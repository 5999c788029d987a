//! # Alliteration Generator
//!
//! Random alliterative phrases for a letter and a style. This is the one
//! tool that is deliberately non-deterministic, so it does not implement
//! [`Tool`](crate::estimator::Tool); callers pass in the random source.
//!
//! Phrases within a batch are unique. Each phrase gets at most
//! [`MAX_ATTEMPTS_PER_PHRASE`] tries; when a letter's word list runs out
//! of fresh combinations the batch stops early and is marked `exhausted`.
//! A short batch is a normal outcome, not an error.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::tools::alliteration::{generate, PhraseRequest, PhraseStyle};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let request = PhraseRequest::new("b", PhraseStyle::General, 5);
//! let batch = generate(&request, &mut StdRng::seed_from_u64(7)).unwrap();
//! assert!(batch.phrases.len() <= 5);
//! assert!(batch.phrases.iter().all(|p| p.starts_with('B')));
//! ```

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::format::{Breakdown, ResultRow};
use crate::input::NumericField;
use crate::settings::{Settings, MAX_PHRASE_COUNT};

pub const TOOL_ID: &str = "alliteration";
pub const TOOL_NAME: &str = "Alliteration Generator";

/// Tries per phrase before the batch is cut short
pub const MAX_ATTEMPTS_PER_PHRASE: usize = 50;

const WORD_BANK_TOML: &str = include_str!("../../data/alliteration.toml");

static WORD_BANK: Lazy<CalcResult<WordBank>> = Lazy::new(|| WordBank::parse(WORD_BANK_TOML));

/// Phrase flavour; each maps to a set of templates in the word bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhraseStyle {
    #[default]
    General,
    Funny,
    Business,
    Kids,
}

impl PhraseStyle {
    pub const ALL: [PhraseStyle; 4] = [
        PhraseStyle::General,
        PhraseStyle::Funny,
        PhraseStyle::Business,
        PhraseStyle::Kids,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            PhraseStyle::General => "general",
            PhraseStyle::Funny => "funny",
            PhraseStyle::Business => "business",
            PhraseStyle::Kids => "kids",
        }
    }

    pub fn from_key(key: &str) -> CalcResult<Self> {
        let key = key.trim().to_lowercase();
        PhraseStyle::ALL
            .into_iter()
            .find(|style| style.key() == key)
            .ok_or_else(|| CalcError::unknown_category("phrase style", key))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct LetterWords {
    #[serde(default)]
    adjectives: Vec<String>,
    #[serde(default)]
    nouns: Vec<String>,
    #[serde(default)]
    verbs: Vec<String>,
    #[serde(default)]
    names: Vec<String>,
}

impl LetterWords {
    fn slot(&self, placeholder: &str) -> Option<&[String]> {
        match placeholder {
            "{adj}" => Some(&self.adjectives),
            "{noun}" => Some(&self.nouns),
            "{verb}" => Some(&self.verbs),
            "{name}" => Some(&self.names),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct WordBank {
    styles: BTreeMap<String, Vec<String>>,
    letters: BTreeMap<String, LetterWords>,
}

impl WordBank {
    fn parse(text: &str) -> CalcResult<Self> {
        let bank: WordBank =
            toml::from_str(text).map_err(|e| CalcError::config("word bank", e.to_string()))?;
        for style in PhraseStyle::ALL {
            match bank.styles.get(style.key()) {
                Some(templates) if !templates.is_empty() => {}
                _ => {
                    return Err(CalcError::config(
                        "word bank",
                        format!("no templates for style '{}'", style.key()),
                    ))
                }
            }
        }
        for (letter, words) in &bank.letters {
            if words.adjectives.is_empty() || words.nouns.is_empty() {
                return Err(CalcError::config(
                    "word bank",
                    format!("letter {} needs adjectives and nouns", letter),
                ));
            }
        }
        tracing::debug!(letters = bank.letters.len(), "parsed alliteration word bank");
        Ok(bank)
    }
}

/// The embedded bank ships with the crate, so a parse failure is a build defect
fn word_bank() -> CalcResult<&'static WordBank> {
    WORD_BANK
        .as_ref()
        .map_err(|e| CalcError::internal(format!("embedded word bank: {}", e)))
}

/// Letters the word bank covers, in order
pub fn available_letters() -> CalcResult<Vec<char>> {
    Ok(word_bank()?
        .letters
        .keys()
        .filter_map(|k| k.chars().next())
        .collect())
}

/// What to generate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhraseRequest {
    pub letter: String,
    pub style: PhraseStyle,
    /// Phrases wanted, clamped to `1..=50`
    pub count: NumericField,
}

impl Default for PhraseRequest {
    fn default() -> Self {
        PhraseRequest {
            letter: "A".to_string(),
            style: PhraseStyle::General,
            count: "10".into(),
        }
    }
}

impl PhraseRequest {
    pub fn new(letter: impl Into<String>, style: PhraseStyle, count: usize) -> Self {
        PhraseRequest {
            letter: letter.into(),
            style,
            count: NumericField::from(count as f64),
        }
    }

    /// Requested count after clamping; unreadable text means one phrase
    pub fn requested_count(&self) -> usize {
        self.count.clamped(1.0, MAX_PHRASE_COUNT as f64).round() as usize
    }

    /// Upper-case letter, if the field holds exactly one ASCII letter
    pub fn normalized_letter(&self) -> Option<char> {
        let mut chars = self.letter.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => Some(c.to_ascii_uppercase()),
            _ => None,
        }
    }
}

/// One generated batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseBatch {
    pub letter: String,
    pub style: PhraseStyle,
    pub requested: usize,
    pub phrases: Vec<String>,
    /// True when the batch stopped short because no fresh phrase was found
    pub exhausted: bool,
}

/// Generate a batch of unique phrases.
///
/// An invalid or uncovered letter yields an empty batch. Errors only come
/// from a malformed embedded word bank.
pub fn generate<R: Rng + ?Sized>(request: &PhraseRequest, rng: &mut R) -> CalcResult<PhraseBatch> {
    Ok(generate_from(word_bank()?, request, rng))
}

fn generate_from<R: Rng + ?Sized>(bank: &WordBank, request: &PhraseRequest, rng: &mut R) -> PhraseBatch {
    let requested = request.requested_count();
    let mut batch = PhraseBatch {
        letter: request.letter.trim().to_uppercase(),
        style: request.style,
        requested,
        phrases: Vec::with_capacity(requested),
        exhausted: false,
    };

    let words = match request
        .normalized_letter()
        .and_then(|c| bank.letters.get(c.to_string().as_str()))
    {
        Some(words) => words,
        None => {
            tracing::warn!(letter = %request.letter, "no words for letter");
            return batch;
        }
    };
    let templates = bank
        .styles
        .get(request.style.key())
        .map(Vec::as_slice)
        .unwrap_or_default();

    while batch.phrases.len() < requested {
        match next_unique(templates, words, &batch.phrases, rng) {
            Some(phrase) => batch.phrases.push(phrase),
            None => {
                tracing::debug!(
                    letter = %batch.letter,
                    produced = batch.phrases.len(),
                    requested,
                    "phrase combinations exhausted"
                );
                batch.exhausted = true;
                break;
            }
        }
    }
    batch
}

fn next_unique<R: Rng + ?Sized>(
    templates: &[String],
    words: &LetterWords,
    taken: &[String],
    rng: &mut R,
) -> Option<String> {
    for attempt in 1..=MAX_ATTEMPTS_PER_PHRASE {
        let Some(phrase) = templates.choose(rng).and_then(|t| fill_template(t, words, rng)) else {
            continue;
        };
        if taken.contains(&phrase) {
            tracing::trace!(attempt, %phrase, "duplicate phrase, retrying");
            continue;
        }
        return Some(phrase);
    }
    None
}

/// Fill a template, never using a word twice in one phrase.
///
/// `None` when a slot has no unused word left for the letter.
fn fill_template<R: Rng + ?Sized>(template: &str, words: &LetterWords, rng: &mut R) -> Option<String> {
    let mut used: Vec<&str> = Vec::new();
    let mut parts = Vec::new();
    for token in template.split_whitespace() {
        // "{name}'s" keeps its suffix
        let (slot, suffix) = match token.find('}') {
            Some(end) if token.starts_with('{') => token.split_at(end + 1),
            _ => ("", token),
        };
        let word = if slot.is_empty() {
            ""
        } else {
            let fresh: Vec<&str> = words
                .slot(slot)?
                .iter()
                .map(String::as_str)
                .filter(|w| !used.iter().any(|u| u.eq_ignore_ascii_case(w)))
                .collect();
            let word = *fresh.choose(rng)?;
            used.push(word);
            word
        };
        parts.push(title_case(&format!("{}{}", word, suffix)));
    }
    Some(parts.join(" "))
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl Breakdown for PhraseBatch {
    fn rows(&self, _settings: &Settings) -> Vec<ResultRow> {
        let mut rows: Vec<ResultRow> = self
            .phrases
            .iter()
            .enumerate()
            .map(|(i, phrase)| ResultRow::new(format!("{}", i + 1), phrase.clone()))
            .collect();
        if self.phrases.is_empty() {
            rows.push(ResultRow::new("Phrases", format!("No words for '{}'", self.letter)));
        } else if self.exhausted {
            rows.push(ResultRow::new(
                "Note",
                format!("Only {} of {} unique phrases found", self.phrases.len(), self.requested),
            ));
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_word_bank_covers_alphabet() {
        let letters = available_letters().unwrap();
        assert_eq!(letters.len(), 26);
        assert_eq!(letters.first(), Some(&'A'));
        assert_eq!(letters.last(), Some(&'Z'));
    }

    #[test]
    fn test_b_general_batch() {
        let request = PhraseRequest::new("B", PhraseStyle::General, 10);
        let batch = generate(&request, &mut StdRng::seed_from_u64(42)).unwrap();
        assert!(batch.phrases.len() <= 10);
        assert!(!batch.phrases.is_empty());
        for (i, phrase) in batch.phrases.iter().enumerate() {
            assert!(!batch.phrases[..i].contains(phrase), "duplicate {phrase}");
            for word in phrase.split_whitespace() {
                assert!(word.starts_with('B'), "{phrase}");
            }
        }
    }

    #[test]
    fn test_seeded_generation_repeats() {
        let request = PhraseRequest::new("m", PhraseStyle::Funny, 8);
        let first = generate(&request, &mut StdRng::seed_from_u64(9)).unwrap();
        let second = generate(&request, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.letter, "M");
    }

    const TINY_BANK: &str = r#"
        [styles]
        general = ["{adj} {noun}"]
        funny = ["{adj} {noun}"]
        business = ["{adj} {noun}"]
        kids = ["{adj} {noun}"]

        [letters.Q]
        adjectives = ["quick", "quiet"]
        nouns = ["quail", "quilt"]
    "#;

    #[test]
    fn test_small_bank_exhausts() {
        let bank = WordBank::parse(TINY_BANK).unwrap();
        let request = PhraseRequest::new("q", PhraseStyle::General, 10);
        let batch = generate_from(&bank, &request, &mut StdRng::seed_from_u64(1));
        // Only four combinations exist
        assert!(batch.exhausted);
        assert!(!batch.phrases.is_empty() && batch.phrases.len() <= 4);
        let rows = batch.rows(&Settings::default());
        assert_eq!(rows.last().unwrap().label, "Note");
        assert!(rows.last().unwrap().value.ends_with("of 10 unique phrases found"));
    }

    #[test]
    fn test_malformed_bank_rejected() {
        let err = WordBank::parse("[styles]\ngeneral = []\n[letters]\n").unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
        assert!(WordBank::parse("not toml = [").is_err());
    }

    #[test]
    fn test_invalid_letter_is_empty() {
        for letter in ["", "7", "ab", "é"] {
            let request = PhraseRequest::new(letter, PhraseStyle::Kids, 5);
            let batch = generate(&request, &mut StdRng::seed_from_u64(3)).unwrap();
            assert!(batch.phrases.is_empty());
            assert!(!batch.exhausted);
        }
    }

    #[test]
    fn test_count_clamped() {
        assert_eq!(PhraseRequest::new("a", PhraseStyle::General, 0).requested_count(), 1);
        assert_eq!(PhraseRequest::new("a", PhraseStyle::General, 500).requested_count(), 50);
        let mut request = PhraseRequest::default();
        request.count.set("lots");
        assert_eq!(request.requested_count(), 1);
    }

    #[test]
    fn test_style_keys() {
        assert_eq!(PhraseStyle::from_key(" Business ").unwrap(), PhraseStyle::Business);
        assert!(PhraseStyle::from_key("formal").is_err());
    }

    #[test]
    fn test_title_case_and_suffix() {
        let words = LetterWords {
            adjectives: vec!["bold".into()],
            nouns: vec!["bear".into()],
            verbs: vec![],
            names: vec!["Bob".into()],
        };
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(fill_template("{name}'s {adj} {noun}", &words, &mut rng).unwrap(), "Bob's Bold Bear");
        assert_eq!(fill_template("{name} the {noun}", &words, &mut rng).unwrap(), "Bob The Bear");
        assert_eq!(fill_template("{name} {verb}", &words, &mut rng), None);
        // One adjective cannot fill two slots
        assert_eq!(fill_template("{adj} {adj} {noun}", &words, &mut rng), None);
    }

    #[test]
    fn test_no_word_repeats_within_phrase() {
        let request = PhraseRequest::new("B", PhraseStyle::General, 10);
        for seed in 0..200 {
            let batch = generate(&request, &mut StdRng::seed_from_u64(seed)).unwrap();
            for phrase in &batch.phrases {
                let words: Vec<&str> = phrase.split_whitespace().collect();
                for (i, word) in words.iter().enumerate() {
                    assert!(!words[..i].contains(word), "repeated word in {phrase}");
                }
            }
        }
    }
}
