use std::collections::HashMap;

use crate::index::correction::{CorrectionIndex, SynonymLookup};
use crate::index::spell::SpellDictionary;
use crate::models::Entry;

/// Handle to a cluster inside a [`ClusterArena`]. Parent links and lookups
/// go through ids, so the tree carries no owning back-references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClusterId(usize);

const ROOT: ClusterId = ClusterId(0);
const SENTINEL: ClusterId = ClusterId(1);

/// One category's slice of the index: the item table, the correction index
/// over its terms, a local synonym table and the nested sub-clusters.
#[derive(Debug, Default)]
pub struct TermCluster {
    parent: Option<ClusterId>,
    category: Option<String>,
    /// Term (either spacing variant) -> entry.
    items: HashMap<String, Entry>,
    synonyms: HashMap<String, String>,
    /// Child clusters in insertion order; order decides multi-cluster
    /// iteration and its tie-breaks.
    children: Vec<(Option<String>, ClusterId)>,
    correction: CorrectionIndex,
    /// The sentinel cluster never participates in searches.
    participating: bool,
}

impl TermCluster {
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn participating(&self) -> bool {
        self.participating
    }

    pub fn correction(&self) -> &CorrectionIndex {
        &self.correction
    }

    pub fn children(&self) -> impl Iterator<Item = ClusterId> + '_ {
        self.children.iter().map(|(_, id)| *id)
    }

    pub fn get_item(&self, term: &str) -> Option<&Entry> {
        self.items.get(term)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn add_synonym(&mut self, old: String, new: String) {
        self.synonyms.insert(old, new);
    }

    /// Register an entry under its canonical term and the no-space variant
    /// ("mega charizard" and "megacharizard" resolve to the same entry). A
    /// term that is already present leaves the cluster unchanged.
    pub fn add_item(&mut self, entry: Entry, spell: &mut SpellDictionary) {
        let term = entry.term().to_string();
        if self.items.contains_key(&term) {
            return;
        }
        let no_space: String = term.chars().filter(|c| !c.is_whitespace()).collect();
        self.correction.add_term(&term, spell);
        if no_space != term {
            self.correction.add_term(&no_space, spell);
            self.items.insert(no_space, entry.clone());
        }
        self.items.insert(term, entry);
    }

    fn child(&self, category: Option<&str>) -> Option<ClusterId> {
        self.children
            .iter()
            .find(|(key, _)| key.as_deref() == category)
            .map(|(_, id)| *id)
    }
}

/// Arena holding every cluster of one index, rooted at a category-less root
/// cluster. Slot 1 is a permanent non-participating sentinel returned by
/// [`ClusterArena::find_cluster`] when nothing matches, so query paths never
/// special-case a missing cluster.
#[derive(Debug)]
pub struct ClusterArena {
    clusters: Vec<TermCluster>,
}

impl ClusterArena {
    pub fn new() -> Self {
        let root = TermCluster {
            participating: true,
            ..TermCluster::default()
        };
        let sentinel = TermCluster::default();
        Self {
            clusters: vec![root, sentinel],
        }
    }

    pub fn root(&self) -> ClusterId {
        ROOT
    }

    pub fn get(&self, id: ClusterId) -> &TermCluster {
        &self.clusters[id.0]
    }

    pub fn get_mut(&mut self, id: ClusterId) -> &mut TermCluster {
        &mut self.clusters[id.0]
    }

    /// The existing child of `parent` for `category`, or a freshly created
    /// empty cluster linked back to its parent.
    pub fn require_cluster(&mut self, parent: ClusterId, category: Option<&str>) -> ClusterId {
        if let Some(existing) = self.get(parent).child(category) {
            return existing;
        }
        let id = ClusterId(self.clusters.len());
        self.clusters.push(TermCluster {
            parent: Some(parent),
            category: category.map(str::to_string),
            participating: true,
            ..TermCluster::default()
        });
        self.get_mut(parent)
            .children
            .push((category.map(str::to_string), id));
        id
    }

    /// The first existing child of `parent` matching any of `categories`,
    /// or the sentinel when none match.
    pub fn find_cluster(&self, parent: ClusterId, categories: &[Option<&str>]) -> ClusterId {
        for category in categories {
            if let Some(id) = self.get(parent).child(*category) {
                return id;
            }
        }
        SENTINEL
    }

    /// Nearest synonym for `word` on the chain from `start` up to the root.
    pub fn find_synonym(&self, start: ClusterId, word: &str) -> Option<&str> {
        let mut current = Some(start);
        while let Some(id) = current {
            let cluster = self.get(id);
            if let Some(target) = cluster.synonyms.get(word) {
                return Some(target);
            }
            current = cluster.parent;
        }
        None
    }
}

impl Default for ClusterArena {
    fn default() -> Self {
        Self::new()
    }
}

/// View of one cluster's synonym chain, handed to the correction index so
/// per-word correction can consult cluster-scoped aliases.
pub struct SynonymChain<'a> {
    arena: &'a ClusterArena,
    start: ClusterId,
}

impl<'a> SynonymChain<'a> {
    pub fn new(arena: &'a ClusterArena, start: ClusterId) -> Self {
        Self { arena, start }
    }
}

impl SynonymLookup for SynonymChain<'_> {
    fn find_synonym(&self, word: &str) -> Option<&str> {
        self.arena.find_synonym(self.start, word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(term: &str) -> Entry {
        Entry::new(term, None, json!({ "term": term }))
    }

    #[test]
    fn test_require_cluster_is_get_or_create() {
        let mut arena = ClusterArena::new();
        let root = arena.root();
        let pokemon = arena.require_cluster(root, Some("pokemon"));
        assert_eq!(arena.require_cluster(root, Some("pokemon")), pokemon);
        let untyped = arena.require_cluster(root, None);
        assert_ne!(pokemon, untyped);
        assert_eq!(arena.get(pokemon).category(), Some("pokemon"));
        assert_eq!(arena.get(untyped).category(), None);
    }

    #[test]
    fn test_find_cluster_falls_back_to_sentinel() {
        let mut arena = ClusterArena::new();
        let root = arena.root();
        let moves = arena.require_cluster(root, Some("move"));
        assert_eq!(arena.find_cluster(root, &[Some("item"), Some("move")]), moves);
        let missing = arena.find_cluster(root, &[Some("item")]);
        assert!(!arena.get(missing).participating());
    }

    #[test]
    fn test_add_item_registers_no_space_variant() {
        let mut arena = ClusterArena::new();
        let mut spell = SpellDictionary::new(3);
        let root = arena.root();
        let id = arena.require_cluster(root, Some("pokemon"));
        arena
            .get_mut(id)
            .add_item(entry("mega charizard"), &mut spell);

        let cluster = arena.get(id);
        assert_eq!(cluster.item_count(), 2);
        let by_term = cluster.get_item("mega charizard").unwrap();
        let by_variant = cluster.get_item("megacharizard").unwrap();
        assert_eq!(by_term, by_variant);
    }

    #[test]
    fn test_add_item_is_idempotent() {
        let mut arena = ClusterArena::new();
        let mut spell = SpellDictionary::new(3);
        let root = arena.root();
        let id = arena.require_cluster(root, Some("pokemon"));
        arena.get_mut(id).add_item(entry("charizard"), &mut spell);
        arena.get_mut(id).add_item(entry("charizard"), &mut spell);
        assert_eq!(arena.get(id).item_count(), 1);
    }

    #[test]
    fn test_synonym_chain_prefers_nearest_cluster() {
        let mut arena = ClusterArena::new();
        let root = arena.root();
        let child = arena.require_cluster(root, Some("pokemon"));
        let sibling = arena.require_cluster(root, Some("move"));

        arena
            .get_mut(root)
            .add_synonym("m".to_string(), "mega".to_string());
        arena
            .get_mut(child)
            .add_synonym("m".to_string(), "mirror".to_string());

        // the child's own table wins; the sibling inherits the root's
        assert_eq!(arena.find_synonym(child, "m"), Some("mirror"));
        assert_eq!(arena.find_synonym(sibling, "m"), Some("mega"));
        assert_eq!(arena.find_synonym(root, "m"), Some("mega"));
        assert_eq!(arena.find_synonym(child, "unmapped"), None);
    }
}
