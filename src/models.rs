use serde_json::Value;

/// Result of a lookup: the matched item's payload, or an absent marker.
///
/// Entries are immutable snapshots taken from the index at build time; the
/// payload is the whole corpus record, passed through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    term: String,
    category: Option<String>,
    value: Option<Value>,
}

impl Entry {
    pub fn new(term: impl Into<String>, category: Option<String>, value: Value) -> Self {
        Self {
            term: term.into(),
            category,
            value: Some(value),
        }
    }

    /// The "not found" entry.
    pub fn absent() -> Self {
        Self {
            term: String::new(),
            category: None,
            value: None,
        }
    }

    pub fn present(&self) -> bool {
        self.value.is_some()
    }

    /// The item's payload, if the lookup found one.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Canonical normalized term the entry is indexed under. Empty for an
    /// absent entry.
    pub fn term(&self) -> &str {
        &self.term
    }
}

/// Which categories a lookup searches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Every top-level category, including the no-category bucket.
    All,
    /// Only items loaded without a category.
    Uncategorized,
    /// A single category, dispatched directly with no cross-category
    /// tie-break.
    One(String),
    /// Any of the listed categories; missing ones are skipped.
    Any(Vec<String>),
}

impl CategoryFilter {
    pub fn one(category: impl Into<String>) -> Self {
        CategoryFilter::One(category.into())
    }

    pub fn any<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CategoryFilter::Any(categories.into_iter().map(Into::into).collect())
    }
}
