use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::errors::LoadError;

/// Read one corpus file: a top-level JSON array of item records.
///
/// Records are returned unparsed; field extraction and normalization happen
/// in [`TermIndex::build`](crate::TermIndex::build), which knows the
/// configured field names.
pub fn read_corpus_file(path: &Path) -> Result<Vec<Value>, LoadError> {
    let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: Value = serde_json::from_str(&contents).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    match parsed {
        Value::Array(records) => {
            debug!(path = %path.display(), records = records.len(), "corpus file read");
            Ok(records)
        }
        _ => Err(LoadError::CorpusShape {
            path: path.to_path_buf(),
        }),
    }
}

/// Read and concatenate several corpus files in order.
pub fn read_corpus_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Value>, LoadError> {
    let mut records = Vec::new();
    for path in paths {
        records.extend(read_corpus_file(path.as_ref())?);
    }
    Ok(records)
}

/// Read one synonym file: a flat JSON object mapping word to word.
pub fn read_synonym_file(path: &Path) -> Result<HashMap<String, String>, LoadError> {
    let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: Value = serde_json::from_str(&contents).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let Value::Object(pairs) = parsed else {
        return Err(LoadError::SynonymShape {
            path: path.to_path_buf(),
        });
    };
    let mut synonyms = HashMap::with_capacity(pairs.len());
    for (old, new) in pairs {
        let Value::String(new) = new else {
            return Err(LoadError::SynonymShape {
                path: path.to_path_buf(),
            });
        };
        synonyms.insert(old, new);
    }
    debug!(path = %path.display(), synonyms = synonyms.len(), "synonym file read");
    Ok(synonyms)
}

/// Merge several synonym files; later files win on conflicting words.
pub fn read_synonym_files<P: AsRef<Path>>(
    paths: &[P],
) -> Result<HashMap<String, String>, LoadError> {
    let mut merged = HashMap::new();
    for path in paths {
        merged.extend(read_synonym_file(path.as_ref())?);
    }
    Ok(merged)
}
