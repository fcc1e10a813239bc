use serde::{Deserialize, Serialize};

/// Record field holding an item's term, unless configured otherwise.
pub const DEFAULT_TERM_FIELD: &str = "term";
/// Record field holding an item's category, unless configured otherwise.
pub const DEFAULT_CATEGORY_FIELD: &str = "type";
/// Characters removed from terms and identifiers during normalization.
pub const DEFAULT_SANITIZE_PATTERN: &str = "[^A-Za-z0-9 ]";
/// Maximum Damerau-Levenshtein distance considered by spelling correction.
pub const DEFAULT_MAX_EDIT_DISTANCE: usize = 3;

/// Configuration for building a [`TermIndex`](crate::TermIndex).
///
/// All fields have defaults, so a deployment can ship a partial JSON config
/// and override only what it needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Name of the record field holding the item's term.
    pub term_field: String,
    /// Name of the record field holding the item's category. Records
    /// without it land in the no-category bucket.
    pub category_field: String,
    /// Lowercase terms and identifiers during normalization.
    pub fold_case: bool,
    /// Strip combining accents, e.g. "Flabébé" becomes "Flabebe".
    pub strip_accents: bool,
    /// Regex of characters removed during normalization.
    pub sanitize_pattern: String,
    /// Maximum edit distance for word-level spelling correction.
    pub max_edit_distance: usize,
    /// When false, lookups degrade to exact normalized-term matches.
    pub spell_correction: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            term_field: DEFAULT_TERM_FIELD.to_string(),
            category_field: DEFAULT_CATEGORY_FIELD.to_string(),
            fold_case: true,
            strip_accents: true,
            sanitize_pattern: DEFAULT_SANITIZE_PATTERN.to_string(),
            max_edit_distance: DEFAULT_MAX_EDIT_DISTANCE,
            spell_correction: true,
        }
    }
}
