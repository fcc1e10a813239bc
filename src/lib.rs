//! Fuzzy term lookup and correction for bot responders.
//!
//! Given a free-text identifier pulled out of a message, `termdex` finds
//! the best-matching known entity: typos are corrected through a
//! symmetric-delete spelling dictionary, multi-word terms are disambiguated
//! by token similarity, known synonyms are resolved per category, and
//! explicit confidence thresholds arbitrate when several categories could
//! match.
//!
//! The corpus is loaded once into a [`TermIndex`]; after that every lookup
//! is a pure read. Reloads build a replacement index and swap it in through
//! an [`IndexHandle`].

pub mod config;
pub mod errors;
pub mod handle;
pub mod index;
pub mod loader;
pub mod models;
pub mod normalize;

// Re-export commonly used types for convenience
pub use config::IndexConfig;
pub use errors::LoadError;
pub use handle::IndexHandle;
pub use index::term_index::TermIndex;
pub use models::{CategoryFilter, Entry};
pub use normalize::Normalizer;

// Tests are defined in their respective modules with #[cfg(test)]
