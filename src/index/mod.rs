pub mod cluster;
pub mod correction;
pub mod multi_search;
pub mod spell;
pub mod term_index;

// Public exports
pub use correction::{Correction, CorrectionIndex};
pub use spell::{damerau_levenshtein, SpellDictionary, Suggestion};
pub use term_index::TermIndex;
