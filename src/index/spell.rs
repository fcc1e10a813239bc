use std::collections::{HashMap, HashSet, VecDeque};
use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;

/// Capacity of the bounded best-word cache. The cache is rebuilt with the
/// dictionary on every reload, so this only bounds steady-state memory
/// between reloads.
const BEST_WORD_CACHE_SIZE: usize = 4096;

/// A single spelling suggestion: a real corpus word, its corpus frequency
/// and its true Damerau-Levenshtein distance from the queried word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub word: String,
    pub frequency: u32,
    pub distance: usize,
}

#[derive(Debug, Default)]
struct DictEntry {
    /// Real corpus words reachable from this key by re-inserting deleted
    /// characters.
    suggestions: Vec<String>,
    /// Occurrences in the corpus. 0 marks a derived delete key that never
    /// appeared as a real word.
    frequency: u32,
}

/// Word-level spelling corrector built on a symmetric-delete index.
///
/// Only deletions of dictionary words are generated at registration time;
/// transposes, replaces and inserts of a query are covered by matching its
/// own deletions against the precomputed delete keys, so lookup cost is
/// bounded by word length and the maximum edit distance rather than by
/// dictionary size.
pub struct SpellDictionary {
    max_edit_distance: usize,
    longest_word_len: usize,
    entries: HashMap<String, DictEntry>,
    best_cache: Mutex<LruCache<String, Option<Suggestion>>>,
}

impl SpellDictionary {
    pub fn new(max_edit_distance: usize) -> Self {
        let capacity = NonZeroUsize::new(BEST_WORD_CACHE_SIZE).expect("cache size is non-zero");
        Self {
            max_edit_distance,
            longest_word_len: 0,
            entries: HashMap::new(),
            best_cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn max_edit_distance(&self) -> usize {
        self.max_edit_distance
    }

    /// Register one occurrence of a corpus word.
    ///
    /// The first occurrence also registers every string reachable from the
    /// word by deleting 1..=max_edit_distance characters, each mapped back
    /// to the word as a correction candidate. Delete keys keep frequency 0
    /// unless they later show up as real corpus words themselves.
    pub fn create_entry(&mut self, word: &str) {
        let frequency = {
            let entry = self.entries.entry(word.to_string()).or_default();
            entry.frequency += 1;
            entry.frequency
        };
        // only the first appearance as a real word expands deletions; the
        // word may already exist as a delete key of another word
        if frequency > 1 {
            return;
        }
        self.longest_word_len = self.longest_word_len.max(word.chars().count());
        for deleted in self.deletions_of(word) {
            let slot = self.entries.entry(deleted).or_default();
            if !slot.suggestions.iter().any(|s| s == word) {
                slot.suggestions.push(word.to_string());
            }
        }
    }

    /// Every string reachable from `word` by deleting up to
    /// `max_edit_distance` characters, one level at a time.
    fn deletions_of(&self, word: &str) -> Vec<String> {
        let mut deletions = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut queue: Vec<String> = vec![word.to_string()];
        for _ in 0..self.max_edit_distance {
            let mut next = Vec::new();
            for current in &queue {
                let chars: Vec<char> = current.chars().collect();
                if chars.len() <= 1 {
                    continue;
                }
                for skip in 0..chars.len() {
                    let shorter: String = chars
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| *i != skip)
                        .map(|(_, c)| *c)
                        .collect();
                    if seen.insert(shorter.clone()) {
                        deletions.push(shorter.clone());
                        next.push(shorter);
                    }
                }
            }
            queue = next;
        }
        deletions
    }

    /// All candidate corrections for `word`, sorted by ascending edit
    /// distance and then by descending corpus frequency.
    ///
    /// The search expands successive deletions of `word` breadth-first,
    /// collecting dictionary hits, and stops as soon as deeper deletions can
    /// no longer beat the best distance found. Words longer than the longest
    /// known word plus the maximum edit distance cannot match anything.
    pub fn suggest(&self, word: &str) -> Vec<Suggestion> {
        let word_len = word.chars().count();
        if word_len.saturating_sub(self.longest_word_len) > self.max_edit_distance {
            return Vec::new();
        }

        // candidate word -> (frequency, distance)
        let mut found: HashMap<String, (u32, usize)> = HashMap::new();
        let mut min_distance = usize::MAX;
        let mut queue: VecDeque<String> = VecDeque::new();
        let mut queued: HashSet<String> = HashSet::new();
        queue.push_back(word.to_string());

        while let Some(item) = queue.pop_front() {
            let item_len = item.chars().count();
            let depth = word_len - item_len;

            // deeper deletions cannot beat an already-found candidate
            if !found.is_empty() && depth > min_distance {
                break;
            }

            if let Some(entry) = self.entries.get(&item) {
                if entry.frequency > 0 && !found.contains_key(&item) {
                    // the query (or one of its deletions) is itself a corpus
                    // word; its distance is the number of deleted characters
                    found.insert(item.clone(), (entry.frequency, depth));
                    if depth == 0 {
                        break;
                    }
                    min_distance = min_distance.min(depth);
                }

                for candidate in &entry.suggestions {
                    if found.contains_key(candidate) {
                        continue;
                    }
                    let distance = damerau_levenshtein(candidate, word);
                    if distance > min_distance || distance > self.max_edit_distance {
                        continue;
                    }
                    let frequency = self
                        .entries
                        .get(candidate)
                        .map(|e| e.frequency)
                        .unwrap_or(0);
                    found.insert(candidate.clone(), (frequency, distance));
                    min_distance = min_distance.min(distance);
                }

                // drop candidates that lost to a closer one
                found.retain(|_, (_, distance)| *distance <= min_distance);
            }

            if depth > min_distance {
                continue;
            }
            if depth < self.max_edit_distance && item_len > 1 {
                let chars: Vec<char> = item.chars().collect();
                for skip in 0..chars.len() {
                    let shorter: String = chars
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| *i != skip)
                        .map(|(_, c)| *c)
                        .collect();
                    if queued.insert(shorter.clone()) {
                        queue.push_back(shorter);
                    }
                }
            }
        }

        let mut suggestions: Vec<Suggestion> = found
            .into_iter()
            .map(|(word, (frequency, distance))| Suggestion {
                word,
                frequency,
                distance,
            })
            .collect();
        suggestions.sort_by(|a, b| {
            a.distance
                .cmp(&b.distance)
                .then(b.frequency.cmp(&a.frequency))
                .then(a.word.cmp(&b.word))
        });
        suggestions
    }

    /// The single best correction for `word`: lowest distance, ties broken
    /// by higher corpus frequency. `None` when nothing lies within the
    /// configured edit distance.
    pub fn best_word(&self, word: &str) -> Option<Suggestion> {
        if let Some(hit) = self.best_cache.lock().unwrap().get(word) {
            return hit.clone();
        }
        let best = self.suggest(word).into_iter().next();
        self.best_cache
            .lock()
            .unwrap()
            .put(word.to_string(), best.clone());
        best
    }
}

/// Damerau-Levenshtein distance (optimal string alignment): the minimum
/// number of insertions, deletions, substitutions and adjacent
/// transpositions turning `a` into `b`. Operates on chars, not bytes.
pub fn damerau_levenshtein(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let b_len = b_chars.len();
    let mut prev_two: Vec<usize> = vec![0; b_len + 1];
    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr: Vec<usize> = vec![0; b_len + 1];

    for (i, &a_char) in a_chars.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            curr[j + 1] = (curr[j] + 1)
                .min(prev[j + 1] + 1)
                .min(prev[j] + cost);
            if i > 0
                && j > 0
                && a_char != b_char
                && a_char == b_chars[j - 1]
                && b_char == a_chars[i - 1]
            {
                curr[j + 1] = curr[j + 1].min(prev_two[j - 1] + 1);
            }
        }
        std::mem::swap(&mut prev_two, &mut prev);
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b_len]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dictionary(words: &[&str]) -> SpellDictionary {
        let mut dict = SpellDictionary::new(3);
        for word in words {
            dict.create_entry(word);
        }
        dict
    }

    #[test]
    fn test_damerau_levenshtein() {
        assert_eq!(damerau_levenshtein("charizard", "charizard"), 0);
        assert_eq!(damerau_levenshtein("charzard", "charizard"), 1);
        assert_eq!(damerau_levenshtein("chairzard", "charizard"), 2);
        // adjacent transposition counts as one edit
        assert_eq!(damerau_levenshtein("chraizard", "charizard"), 1);
        assert_eq!(damerau_levenshtein("", "abc"), 3);
        assert_eq!(damerau_levenshtein("abc", ""), 3);
        assert_eq!(damerau_levenshtein("ba", "abc"), 2);
    }

    #[test]
    fn test_exact_word_has_distance_zero() {
        let dict = dictionary(&["charizard"]);
        let best = dict.best_word("charizard").unwrap();
        assert_eq!(best.word, "charizard");
        assert_eq!(best.distance, 0);
        assert_eq!(best.frequency, 1);
    }

    #[test]
    fn test_single_deletion_is_found() {
        let dict = dictionary(&["charizard"]);
        let best = dict.best_word("charzard").unwrap();
        assert_eq!(best.word, "charizard");
        assert_eq!(best.distance, 1);
    }

    #[test]
    fn test_insertion_and_transposition_are_found() {
        let dict = dictionary(&["charizard"]);
        // insertion in the query maps to a deletion of the query
        assert_eq!(dict.best_word("charrizard").unwrap().word, "charizard");
        // transposition
        let best = dict.best_word("chraizard").unwrap();
        assert_eq!(best.word, "charizard");
        assert_eq!(best.distance, 1);
    }

    #[test]
    fn test_beyond_max_edit_distance_is_none() {
        let dict = dictionary(&["charizard"]);
        assert_eq!(dict.best_word("foobarbaz"), None);
        assert_eq!(dict.best_word("char"), None);
    }

    #[test]
    fn test_overlong_word_short_circuits() {
        let dict = dictionary(&["mew"]);
        // 3 + max_edit_distance characters is the longest possible match
        assert!(dict.suggest("mewtwofoo").is_empty());
    }

    #[test]
    fn test_frequency_breaks_distance_ties() {
        let mut dict = SpellDictionary::new(3);
        dict.create_entry("sand");
        dict.create_entry("send");
        dict.create_entry("send");
        // "snd" is one edit from both; "send" is the more frequent word
        let best = dict.best_word("snd").unwrap();
        assert_eq!(best.word, "send");
        assert_eq!(best.frequency, 2);
    }

    #[test]
    fn test_delete_keys_keep_zero_frequency() {
        let dict = dictionary(&["mega"]);
        // "mga" exists only as a derived delete key
        let entry = dict.entries.get("mga").unwrap();
        assert_eq!(entry.frequency, 0);
        assert_eq!(entry.suggestions, vec!["mega".to_string()]);
        // registering it as a real word later gives it a frequency
        let mut dict = dict;
        dict.create_entry("mga");
        assert_eq!(dict.entries.get("mga").unwrap().frequency, 1);
    }

    #[test]
    fn test_repeat_registration_only_bumps_frequency() {
        let mut dict = SpellDictionary::new(3);
        dict.create_entry("mega");
        let keys_after_first = dict.entries.len();
        dict.create_entry("mega");
        assert_eq!(dict.entries.len(), keys_after_first);
        assert_eq!(dict.entries.get("mega").unwrap().frequency, 2);
    }

    #[test]
    fn test_single_character_words() {
        let dict = dictionary(&["m"]);
        // single characters are not deletable further; direct presence only
        let best = dict.best_word("m").unwrap();
        assert_eq!(best.word, "m");
        assert_eq!(best.distance, 0);
    }

    #[test]
    fn test_best_word_cache_is_consistent() {
        let dict = dictionary(&["charizard"]);
        let first = dict.best_word("charzard");
        let second = dict.best_word("charzard");
        assert_eq!(first, second);
    }
}
