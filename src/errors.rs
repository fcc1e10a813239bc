use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a [`TermIndex`](crate::TermIndex) from corpus
/// and synonym inputs.
///
/// A failed build never touches a currently serving index; callers keep the
/// old one. Lookup misses are not errors; they surface as absent
/// [`Entry`](crate::Entry) values.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("corpus file {path:?} must contain a top-level JSON array")]
    CorpusShape { path: PathBuf },

    #[error("synonym file {path:?} must contain a flat JSON object of word to word")]
    SynonymShape { path: PathBuf },

    #[error("corpus record {index} is not a JSON object")]
    RecordShape { index: usize },

    #[error("corpus record {index} is missing the term field `{field}`")]
    MissingTerm { index: usize, field: String },

    #[error("corpus record {index}: field `{field}` must be a JSON string")]
    FieldType { index: usize, field: String },

    #[error("corpus record {index}: term normalizes to an empty string")]
    EmptyTerm { index: usize },

    #[error("synonym `{word}` must map a single word to a single word")]
    MultiWordSynonym { word: String },

    #[error("invalid sanitize pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
