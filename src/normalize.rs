use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::config::{IndexConfig, DEFAULT_SANITIZE_PATTERN};
use crate::errors::LoadError;

// Compiled once; nearly every index is built with the default pattern.
static DEFAULT_SANITIZER: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_SANITIZE_PATTERN).expect("default pattern is valid"));

/// Applies the corpus normalization rules: accent stripping, case folding,
/// symbol removal and whitespace collapsing.
///
/// The same rules must be applied to identifiers at query time and to terms
/// at load time, so the `Normalizer` used to build an index is exposed
/// through [`TermIndex::normalizer`](crate::TermIndex::normalizer).
#[derive(Debug, Clone)]
pub struct Normalizer {
    fold_case: bool,
    strip_accents: bool,
    sanitizer: Regex,
}

impl Normalizer {
    pub fn from_config(config: &IndexConfig) -> Result<Self, LoadError> {
        let sanitizer = if config.sanitize_pattern == DEFAULT_SANITIZE_PATTERN {
            DEFAULT_SANITIZER.clone()
        } else {
            Regex::new(&config.sanitize_pattern).map_err(|source| LoadError::Pattern {
                pattern: config.sanitize_pattern.clone(),
                source,
            })?
        };
        Ok(Self {
            fold_case: config.fold_case,
            strip_accents: config.strip_accents,
            sanitizer,
        })
    }

    /// Normalize a raw term or identifier.
    pub fn normalize(&self, raw: &str) -> String {
        let stripped;
        let mut text = if self.strip_accents {
            stripped = remove_accents(raw);
            stripped.as_str()
        } else {
            raw
        };
        let folded;
        if self.fold_case {
            folded = text.to_lowercase();
            text = folded.as_str();
        }
        let sanitized = self.sanitizer.replace_all(text, "");
        collapse_whitespace(&sanitized)
    }
}

/// Replaces accented characters with their base form, e.g. "Flabébé"
/// becomes "Flabebe".
pub fn remove_accents(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
