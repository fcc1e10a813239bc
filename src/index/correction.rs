use std::collections::{HashMap, HashSet};

use crate::index::spell::SpellDictionary;

/// A spelling suggestion below this similarity to the original word is
/// discarded and the original word is kept instead.
pub const WORD_ACCEPT_RATIO: f64 = 0.7;

/// Outcome of [`CorrectionIndex::correct_term`]: the closest known term in
/// the cluster, if any, and a 0..=1 confidence score.
#[derive(Debug, Clone, PartialEq)]
pub struct Correction {
    pub term: Option<String>,
    pub confidence: f64,
}

impl Correction {
    fn miss() -> Self {
        Self {
            term: None,
            confidence: 0.0,
        }
    }
}

/// Resolves a single word through the synonym tables in scope for a
/// cluster, nearest cluster first.
pub trait SynonymLookup {
    fn find_synonym(&self, word: &str) -> Option<&str>;
}

impl SynonymLookup for HashMap<String, String> {
    fn find_synonym(&self, word: &str) -> Option<&str> {
        self.get(word).map(String::as_str)
    }
}

/// How one query word was resolved during per-word correction.
enum WordFix {
    /// Replaced by a spelling suggestion, a synonym, or itself on an exact
    /// corpus hit.
    Corrected(String),
    /// A suggestion existed but was too dissimilar; the original is kept.
    Original,
    /// Nothing in the corpus or synonym tables comes close; dropped.
    Unknown,
}

/// Per-cluster term corrector: word-frequency statistics, an inverted
/// word-to-terms index, and the multi-word disambiguation logic on top of
/// the shared [`SpellDictionary`].
#[derive(Debug, Default)]
pub struct CorrectionIndex {
    /// Fully normalized terms known to this cluster, both spacing variants.
    terms: HashSet<String>,
    /// Word -> occurrences across all terms in the cluster.
    word_counts: HashMap<String, u32>,
    total_words: u64,
    /// Word -> terms containing it, in insertion order.
    postings: HashMap<String, Vec<String>>,
}

impl CorrectionIndex {
    /// Register a normalized term: split into words, update frequency
    /// statistics and postings, and feed each word to the dictionary.
    pub fn add_term(&mut self, term: &str, spell: &mut SpellDictionary) {
        if !self.terms.insert(term.to_string()) {
            return;
        }
        for word in term.split_whitespace() {
            *self.word_counts.entry(word.to_string()).or_insert(0) += 1;
            self.total_words += 1;
            self.postings
                .entry(word.to_string())
                .or_default()
                .push(term.to_string());
            spell.create_entry(word);
        }
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.terms.contains(term)
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Corpus-frequency prior for a word within this cluster.
    fn word_probability(&self, word: &str) -> f64 {
        if self.total_words == 0 {
            return 0.0;
        }
        self.word_counts.get(word).copied().unwrap_or(0) as f64 / self.total_words as f64
    }

    fn word_count(&self, word: &str) -> u32 {
        self.word_counts.get(word).copied().unwrap_or(0)
    }

    /// Correct a single word. Synonyms in scope take precedence over
    /// spelling suggestions when the corpus considers them at least as
    /// probable; spelling suggestions must also clear the similarity gate.
    /// Synonyms bypass the gate: a curated alias may be arbitrarily far
    /// from the word it replaces.
    fn correct_word(
        &self,
        word: &str,
        spell: &SpellDictionary,
        synonyms: &dyn SynonymLookup,
    ) -> WordFix {
        let synonym = synonyms.find_synonym(word).map(str::to_string);
        let suggestion = spell.best_word(word);

        match (synonym, suggestion) {
            (Some(synonym), Some(suggestion)) => {
                if self.word_probability(&synonym) >= self.word_probability(&suggestion.word) {
                    WordFix::Corrected(synonym)
                } else if similarity(word, &suggestion.word) > WORD_ACCEPT_RATIO {
                    WordFix::Corrected(suggestion.word)
                } else {
                    // a weak spelling suggestion loses to the curated alias
                    WordFix::Corrected(synonym)
                }
            }
            (Some(synonym), None) => WordFix::Corrected(synonym),
            (None, Some(suggestion)) => {
                if similarity(word, &suggestion.word) > WORD_ACCEPT_RATIO {
                    WordFix::Corrected(suggestion.word)
                } else {
                    WordFix::Original
                }
            }
            (None, None) => WordFix::Unknown,
        }
    }

    /// Find the closest known term for `query` in this cluster.
    ///
    /// Exact hits return immediately with confidence 1.0. Otherwise each
    /// query word is corrected independently, the least-frequent corrected
    /// word picks the candidate posting list, and candidates are scored by
    /// similarity between sorted word concatenations, once against the
    /// semi-corrected tokens (originals kept where correction was weak) and
    /// once against the fully-corrected tokens, keeping the better score.
    pub fn correct_term(
        &self,
        query: &str,
        spell: &SpellDictionary,
        synonyms: &dyn SynonymLookup,
    ) -> Correction {
        if self.terms.contains(query) {
            return Correction {
                term: Some(query.to_string()),
                confidence: 1.0,
            };
        }

        let mut semi: Vec<String> = Vec::new();
        let mut full: Vec<String> = Vec::new();
        // least-frequent corrected word and its count
        let mut pivot: Option<(String, u32)> = None;

        for word in query.split_whitespace() {
            match self.correct_word(word, spell, synonyms) {
                WordFix::Corrected(corrected) => {
                    let count = self.word_count(&corrected);
                    if count > 0 {
                        let replace = match &pivot {
                            Some((_, pivot_count)) => count < *pivot_count,
                            None => true,
                        };
                        if replace {
                            pivot = Some((corrected.clone(), count));
                        }
                    }
                    semi.push(corrected.clone());
                    full.push(corrected);
                }
                WordFix::Original => semi.push(word.to_string()),
                WordFix::Unknown => {}
            }
        }

        let Some((pivot_word, _)) = pivot else {
            // no query word maps to anything this cluster knows
            return Correction::miss();
        };

        let semi_key = sorted_concat(&semi);
        let full_key = sorted_concat(&full);

        let mut best: Option<(&String, f64)> = None;
        if let Some(candidates) = self.postings.get(&pivot_word) {
            for term in candidates {
                let words: Vec<String> = term.split_whitespace().map(str::to_string).collect();
                let term_key = sorted_concat(&words);
                let score =
                    similarity(&term_key, &semi_key).max(similarity(&term_key, &full_key));
                let better = match &best {
                    Some((_, best_score)) => score > *best_score,
                    None => true,
                };
                if better {
                    best = Some((term, score));
                }
            }
        }

        match best {
            Some((term, score)) if score > 0.0 => Correction {
                term: Some(term.clone()),
                confidence: score,
            },
            _ => Correction::miss(),
        }
    }
}

/// Sort words and join them back into one comparison key, so that word
/// order does not affect term similarity.
fn sorted_concat(words: &[String]) -> String {
    let mut sorted: Vec<&str> = words.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted.join(" ")
}

/// Normalized common-subsequence ratio in 0..=1: twice the longest common
/// subsequence length over the total length of both strings. 1.0 means
/// identical strings.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let mut prev: Vec<usize> = vec![0; b_chars.len() + 1];
    let mut curr: Vec<usize> = vec![0; b_chars.len() + 1];
    for &a_char in &a_chars {
        for (j, &b_char) in b_chars.iter().enumerate() {
            curr[j + 1] = if a_char == b_char {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    let lcs = prev[b_chars.len()];
    2.0 * lcs as f64 / (a_chars.len() + b_chars.len()) as f64
}
