use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::config::IndexConfig;
use crate::errors::LoadError;
use crate::index::cluster::{ClusterArena, ClusterId, SynonymChain};
use crate::index::correction::Correction;
use crate::index::multi_search;
use crate::index::spell::SpellDictionary;
use crate::models::{CategoryFilter, Entry};
use crate::normalize::Normalizer;

/// The top-level lookup registry: the cluster tree, the bulk loaders and
/// the category-aware search dispatcher.
///
/// One [`SpellDictionary`] is shared by every cluster of the index, so
/// word-correction data is pooled across categories for memory efficiency.
/// The dictionary has no lifecycle of its own: it is built with the index
/// and torn down with it on reload. Contents are immutable once built;
/// reloading means building a replacement index and swapping it in (see
/// [`IndexHandle`](crate::IndexHandle)).
pub struct TermIndex {
    config: IndexConfig,
    normalizer: Normalizer,
    arena: ClusterArena,
    spell: SpellDictionary,
}

impl TermIndex {
    /// Build an index from pre-parsed corpus records and a synonym map.
    ///
    /// Malformed records abort the build; nothing is dropped silently.
    pub fn build(
        config: IndexConfig,
        records: &[Value],
        synonyms: &HashMap<String, String>,
    ) -> Result<Self, LoadError> {
        let normalizer = Normalizer::from_config(&config)?;
        let mut index = Self {
            spell: SpellDictionary::new(config.max_edit_distance),
            normalizer,
            arena: ClusterArena::new(),
            config,
        };
        index.add_items(records)?;
        index.add_synonyms(synonyms)?;
        debug!(
            records = records.len(),
            synonyms = synonyms.len(),
            "term index built"
        );
        Ok(index)
    }

    /// An empty index; useful as the initial state of a serving handle.
    pub fn empty(config: IndexConfig) -> Result<Self, LoadError> {
        Self::build(config, &[], &HashMap::new())
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// The normalizer built from this index's config. Callers must run raw
    /// identifiers through it before `search`, mirroring what the loader
    /// does to corpus terms.
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    fn add_items(&mut self, records: &[Value]) -> Result<(), LoadError> {
        let root = self.arena.root();
        for (index, record) in records.iter().enumerate() {
            let object = record.as_object().ok_or(LoadError::RecordShape { index })?;

            let raw_term = match object.get(&self.config.term_field) {
                Some(Value::String(term)) => term,
                Some(_) => {
                    return Err(LoadError::FieldType {
                        index,
                        field: self.config.term_field.clone(),
                    })
                }
                None => {
                    return Err(LoadError::MissingTerm {
                        index,
                        field: self.config.term_field.clone(),
                    })
                }
            };
            let category = match object.get(&self.config.category_field) {
                Some(Value::String(category)) => Some(category.clone()),
                Some(Value::Null) | None => None,
                Some(_) => {
                    return Err(LoadError::FieldType {
                        index,
                        field: self.config.category_field.clone(),
                    })
                }
            };

            let term = self.normalizer.normalize(raw_term);
            if term.is_empty() {
                return Err(LoadError::EmptyTerm { index });
            }

            let entry = Entry::new(term, category.clone(), record.clone());
            let cluster = self.arena.require_cluster(root, category.as_deref());
            self.arena.get_mut(cluster).add_item(entry, &mut self.spell);
        }
        Ok(())
    }

    fn add_synonyms(&mut self, synonyms: &HashMap<String, String>) -> Result<(), LoadError> {
        let root = self.arena.root();
        self.add_synonyms_to(root, synonyms)
    }

    /// Register synonyms scoped to one category's cluster instead of the
    /// root, creating the cluster if needed. Strictly a load-time call.
    pub fn add_category_synonyms(
        &mut self,
        category: Option<&str>,
        synonyms: &HashMap<String, String>,
    ) -> Result<(), LoadError> {
        let root = self.arena.root();
        let cluster = self.arena.require_cluster(root, category);
        self.add_synonyms_to(cluster, synonyms)
    }

    fn add_synonyms_to(
        &mut self,
        cluster: ClusterId,
        synonyms: &HashMap<String, String>,
    ) -> Result<(), LoadError> {
        for (old, new) in synonyms {
            let old_word = self.normalizer.normalize(old);
            let new_word = self.normalizer.normalize(new);
            if old_word.split_whitespace().count() != 1
                || new_word.split_whitespace().count() != 1
            {
                return Err(LoadError::MultiWordSynonym { word: old.clone() });
            }
            self.arena.get_mut(cluster).add_synonym(old_word, new_word);
        }
        Ok(())
    }

    /// Resolve an identifier against the filtered categories.
    ///
    /// The identifier must already be normalized with this index's
    /// [`Normalizer`]; the loader applied the same rules to every term.
    pub fn search(&self, query: &str, filter: &CategoryFilter) -> Entry {
        let debug_mode = std::env::var("DEBUG").unwrap_or_default() == "1";
        if debug_mode {
            println!("DEBUG: Searching '{query}' with filter {filter:?}");
        }

        if !self.config.spell_correction {
            return self.search_exact(query, filter);
        }

        match filter {
            CategoryFilter::All | CategoryFilter::Any(_) => {
                let clusters = self.filtered_clusters(filter);
                multi_search::search_clusters(self, &clusters, query)
            }
            CategoryFilter::One(key) => {
                let root = self.arena.root();
                self.search_cluster(self.arena.find_cluster(root, &[Some(key.as_str())]), query)
            }
            CategoryFilter::Uncategorized => {
                let root = self.arena.root();
                self.search_cluster(self.arena.find_cluster(root, &[None]), query)
            }
        }
    }

    fn filtered_clusters(&self, filter: &CategoryFilter) -> Vec<ClusterId> {
        let root = self.arena.root();
        match filter {
            CategoryFilter::All => self.arena.get(root).children().collect(),
            CategoryFilter::Any(keys) => keys
                .iter()
                .map(|key| self.arena.find_cluster(root, &[Some(key.as_str())]))
                .collect(),
            CategoryFilter::One(key) => {
                vec![self.arena.find_cluster(root, &[Some(key.as_str())])]
            }
            CategoryFilter::Uncategorized => vec![self.arena.find_cluster(root, &[None])],
        }
    }

    /// Direct dispatch into one cluster: whatever its correction index
    /// returns wins, with no cross-cluster tie-break or thresholds.
    pub(crate) fn search_cluster(&self, id: ClusterId, query: &str) -> Entry {
        let cluster = self.arena.get(id);
        if !cluster.participating() {
            return Entry::absent();
        }
        let correction = self.correct_in_cluster(id, query);
        match correction.term {
            Some(term) => self.entry_for(id, &term),
            None => Entry::absent(),
        }
    }

    pub(crate) fn correct_in_cluster(&self, id: ClusterId, query: &str) -> Correction {
        let chain = SynonymChain::new(&self.arena, id);
        self.arena
            .get(id)
            .correction()
            .correct_term(query, &self.spell, &chain)
    }

    pub(crate) fn cluster_participates(&self, id: ClusterId) -> bool {
        self.arena.get(id).participating()
    }

    pub(crate) fn cluster_category(&self, id: ClusterId) -> Option<&str> {
        self.arena.get(id).category()
    }

    pub(crate) fn entry_for(&self, id: ClusterId, term: &str) -> Entry {
        self.arena
            .get(id)
            .get_item(term)
            .cloned()
            .unwrap_or_else(Entry::absent)
    }

    /// Exact normalized-term lookup, used when spell correction is
    /// disabled by configuration.
    fn search_exact(&self, query: &str, filter: &CategoryFilter) -> Entry {
        for id in self.filtered_clusters(filter) {
            let cluster = self.arena.get(id);
            if !cluster.participating() {
                continue;
            }
            if let Some(entry) = cluster.get_item(query) {
                return entry.clone();
            }
        }
        Entry::absent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(term: &str, category: Option<&str>, id: u64) -> Value {
        match category {
            Some(category) => json!({ "term": term, "type": category, "id": id }),
            None => json!({ "term": term, "id": id }),
        }
    }

    fn build(records: &[Value]) -> TermIndex {
        TermIndex::build(IndexConfig::default(), records, &HashMap::new()).unwrap()
    }

    #[test]
    fn test_terms_are_normalized_at_load() {
        let index = build(&[record("Mr. Mime", Some("pokemon"), 1)]);
        let entry = index.search("mr mime", &CategoryFilter::one("pokemon"));
        assert!(entry.present());
        assert_eq!(entry.term(), "mr mime");
        assert_eq!(entry.value().unwrap()["id"], 1);
    }

    #[test]
    fn test_no_space_variant_resolves() {
        let index = build(&[record("Mega Charizard", Some("pokemon"), 2)]);
        let spaced = index.search("mega charizard", &CategoryFilter::All);
        let fused = index.search("megacharizard", &CategoryFilter::All);
        assert!(spaced.present());
        assert_eq!(spaced, fused);
    }

    #[test]
    fn test_category_isolation() {
        let index = build(&[
            record("Charizard", Some("pokemon"), 1),
            record("Blaze", Some("ability"), 2),
        ]);
        assert!(!index
            .search("charizard", &CategoryFilter::one("ability"))
            .present());
        let hit = index.search("charizard", &CategoryFilter::All);
        assert!(hit.present());
        assert_eq!(hit.category(), Some("pokemon"));
    }

    #[test]
    fn test_uncategorized_bucket() {
        let index = build(&[record("Charizard", None, 1)]);
        assert!(index
            .search("charizard", &CategoryFilter::Uncategorized)
            .present());
        assert!(index.search("charizard", &CategoryFilter::All).present());
        assert!(!index
            .search("charizard", &CategoryFilter::one("pokemon"))
            .present());
    }

    #[test]
    fn test_any_filter_skips_missing_categories() {
        let index = build(&[record("Charizard", Some("pokemon"), 1)]);
        let entry = index.search(
            "charizard",
            &CategoryFilter::any(["item", "pokemon", "move"]),
        );
        assert!(entry.present());
        assert!(!index
            .search("charizard", &CategoryFilter::any(["item", "move"]))
            .present());
    }

    #[test]
    fn test_missing_term_field_fails_the_build() {
        let records = vec![json!({ "type": "pokemon", "id": 1 })];
        let result = TermIndex::build(IndexConfig::default(), &records, &HashMap::new());
        assert!(matches!(result, Err(LoadError::MissingTerm { index: 0, .. })));
    }

    #[test]
    fn test_non_object_record_fails_the_build() {
        let records = vec![json!(["charizard"])];
        let result = TermIndex::build(IndexConfig::default(), &records, &HashMap::new());
        assert!(matches!(result, Err(LoadError::RecordShape { index: 0 })));
    }

    #[test]
    fn test_multi_word_synonym_fails_the_build() {
        let mut synonyms = HashMap::new();
        synonyms.insert("mega evolution".to_string(), "mega".to_string());
        let result = TermIndex::build(
            IndexConfig::default(),
            &[record("Charizard", Some("pokemon"), 1)],
            &synonyms,
        );
        assert!(matches!(result, Err(LoadError::MultiWordSynonym { .. })));
    }

    #[test]
    fn test_root_synonym_applies_to_every_category() {
        let mut synonyms = HashMap::new();
        synonyms.insert("m".to_string(), "mega".to_string());
        let index = TermIndex::build(
            IndexConfig::default(),
            &[
                record("Venusaur", Some("pokemon"), 3),
                record("Venusaur Mega", Some("pokemon"), 4),
            ],
            &synonyms,
        )
        .unwrap();
        let entry = index.search("venusaur m", &CategoryFilter::one("pokemon"));
        assert!(entry.present());
        assert_eq!(entry.value().unwrap()["id"], 4);
    }

    #[test]
    fn test_category_synonym_overrides_root() {
        let mut root = HashMap::new();
        root.insert("z".to_string(), "zard".to_string());
        let mut index = TermIndex::build(
            IndexConfig::default(),
            &[
                record("Charizard X", Some("pokemon"), 1),
                record("Zard Slash", Some("move"), 2),
            ],
            &root,
        )
        .unwrap();
        let mut pokemon = HashMap::new();
        pokemon.insert("z".to_string(), "x".to_string());
        index
            .add_category_synonyms(Some("pokemon"), &pokemon)
            .unwrap();

        // within "pokemon" the local table wins
        let entry = index.search("charizard z", &CategoryFilter::one("pokemon"));
        assert_eq!(entry.value().unwrap()["id"], 1);
        // the sibling still sees the root mapping
        let entry = index.search("z slash", &CategoryFilter::one("move"));
        assert_eq!(entry.value().unwrap()["id"], 2);
    }

    #[test]
    fn test_spell_correction_disabled_means_exact_only() {
        let config = IndexConfig {
            spell_correction: false,
            ..IndexConfig::default()
        };
        let index = TermIndex::build(
            config,
            &[record("Charizard", Some("pokemon"), 1)],
            &HashMap::new(),
        )
        .unwrap();
        assert!(index.search("charizard", &CategoryFilter::All).present());
        assert!(!index.search("charzard", &CategoryFilter::All).present());
    }

    #[test]
    fn test_payload_passes_through_untouched() {
        let record = json!({
            "term": "Charizard",
            "type": "pokemon",
            "dex_no": 6,
            "evolutions": ["charmander", "charmeleon"],
        });
        let index = build(std::slice::from_ref(&record));
        let entry = index.search("charizard", &CategoryFilter::All);
        assert_eq!(entry.value(), Some(&record));
    }
}
