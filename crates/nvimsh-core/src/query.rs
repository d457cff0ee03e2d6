//! Read-only catalog queries.
//!
//! Every operation works on a single snapshot loaded once at the start of
//! the call. None of them can fail: an empty catalog simply yields an empty
//! result.

use std::{collections::HashSet, sync::Arc};

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::{debug, trace};

use crate::{
    ranking::{name_score, search_rank, sort_ranked, tag_score},
    store::{Snapshot, SnapshotStore},
    types::{CatalogStats, Ranked},
};

/// Every plugin at rank 0, most starred first.
pub fn list_all(snapshot: &Snapshot) -> Vec<Ranked> {
    let mut results: Vec<Ranked> = snapshot
        .plugins()
        .iter()
        .map(|plugin| Ranked::new(Arc::clone(plugin), 0))
        .collect();

    sort_ranked(&mut results);
    results
}

/// Plugins whose name fuzzy-matches `query` or that carry it as a tag.
pub fn search(snapshot: &Snapshot, query: &str) -> Vec<Ranked> {
    let query = query.to_lowercase();

    let mut results: Vec<Ranked> = snapshot
        .plugins()
        .par_iter()
        .filter_map(|plugin| {
            let name = name_score(&query, &plugin.name);
            let tag = tag_score(&query, plugin.tags.as_slice());
            let rank = search_rank(name, tag)?;
            trace!(id = plugin.id, ?name, ?tag, rank, "scored plugin");
            Some(Ranked::new(Arc::clone(plugin), rank))
        })
        .collect();

    sort_ranked(&mut results);
    results
}

/// Plugins tagged exactly `tag`, most starred first.
pub fn filter_by_tag(snapshot: &Snapshot, tag: &str) -> Vec<Ranked> {
    let tag = tag.to_lowercase();

    let mut results: Vec<Ranked> = snapshot
        .plugins()
        .iter()
        .filter(|plugin| tag_score(&tag, plugin.tags.as_slice()) == Some(0))
        .map(|plugin| Ranked::new(Arc::clone(plugin), 0))
        .collect();

    sort_ranked(&mut results);
    results
}

/// The distinct tags of the snapshot, in no particular order.
pub fn list_tags(snapshot: &Snapshot) -> HashSet<String> {
    snapshot.tags().clone()
}

pub fn stats(snapshot: &Snapshot) -> CatalogStats {
    CatalogStats {
        plugins: snapshot.len(),
        tags: snapshot.tags().len(),
        refreshed_at: snapshot.refreshed_at(),
    }
}

/// Query facade over a shared [`SnapshotStore`].
///
/// Cheap to clone; every clone reads the same store.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    store: Arc<SnapshotStore>,
}

impl Catalog {
    pub fn new(store: Arc<SnapshotStore>) -> Self {
        Self {
            store,
        }
    }

    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.store.snapshot()
    }

    pub fn list_all(&self) -> Vec<Ranked> {
        let snapshot = self.snapshot();
        debug!(plugins = snapshot.len(), "listing all plugins");
        list_all(&snapshot)
    }

    pub fn search(&self, query: &str) -> Vec<Ranked> {
        let snapshot = self.snapshot();
        let results = search(&snapshot, query);
        debug!(query, matches = results.len(), "searched plugins");
        results
    }

    pub fn filter_by_tag(&self, tag: &str) -> Vec<Ranked> {
        let snapshot = self.snapshot();
        let results = filter_by_tag(&snapshot, tag);
        debug!(tag, matches = results.len(), "filtered plugins by tag");
        results
    }

    pub fn list_tags(&self) -> HashSet<String> {
        list_tags(&self.snapshot())
    }

    pub fn stats(&self) -> CatalogStats {
        stats(&self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use nvimsh_registry::Plugin;

    use super::*;

    fn plugin(id: &str, name: &str, tags: &[&str], stars: i64) -> Plugin {
        Plugin {
            id: id.to_string(),
            name: name.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            stars,
            ..Default::default()
        }
    }

    fn telescope_catalog() -> Catalog {
        let catalog = Catalog::default();
        catalog.store().set_snapshot(Arc::new(Snapshot::new(
            vec![
                plugin("a", "telescope", &["fuzzy", "finder"], 500),
                plugin("b", "telescope-fzf", &["fuzzy"], 10),
            ],
            None,
        )));
        catalog
    }

    fn ids(results: &[Ranked]) -> Vec<&str> {
        results.iter().map(|r| r.plugin.id.as_str()).collect()
    }

    fn assert_ordered(results: &[Ranked]) {
        for pair in results.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(
                a.rank < b.rank || (a.rank == b.rank && a.plugin.stars >= b.plugin.stars),
                "{} ({}, {}) before {} ({}, {})",
                a.plugin.id,
                a.rank,
                a.plugin.stars,
                b.plugin.id,
                b.rank,
                b.plugin.stars
            );
        }
    }

    #[test]
    fn test_telescope_scenario() {
        let catalog = telescope_catalog();

        let results = catalog.search("telescope");
        assert_eq!(ids(&results), vec!["a", "b"]);
        assert_eq!(results[0].rank, 0);
        assert_eq!(results[1].rank, 1);

        assert_eq!(ids(&catalog.filter_by_tag("fuzzy")), vec!["a", "b"]);
        assert_eq!(ids(&catalog.filter_by_tag("finder")), vec!["a"]);
        assert_eq!(ids(&catalog.list_all()), vec!["a", "b"]);

        let expected: HashSet<String> = ["fuzzy", "finder"].into_iter().map(String::from).collect();
        assert_eq!(catalog.list_tags(), expected);
    }

    #[test]
    fn test_empty_catalog_yields_empty_results() {
        let catalog = Catalog::default();
        assert!(catalog.list_all().is_empty());
        assert!(catalog.search("telescope").is_empty());
        assert!(catalog.filter_by_tag("fuzzy").is_empty());
        assert!(catalog.list_tags().is_empty());
        assert_eq!(
            catalog.stats(),
            CatalogStats {
                plugins: 0,
                tags: 0,
                refreshed_at: None,
            }
        );
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let catalog = telescope_catalog();
        assert_eq!(ids(&catalog.search("TeleScope")), vec!["a", "b"]);
        assert_eq!(ids(&catalog.filter_by_tag("FUZZY")), vec!["a", "b"]);
    }

    #[test]
    fn test_search_admits_tag_only_matches() {
        let snapshot = Snapshot::new(
            vec![
                plugin("fzf-lua", "fzf-lua", &["finder"], 3),
                plugin("nvim-tree", "nvim-tree.lua", &["file-explorer"], 900),
            ],
            None,
        );

        let results = search(&snapshot, "finder");
        assert_eq!(ids(&results), vec!["fzf-lua"]);
        assert_eq!(results[0].rank, 0);

        assert!(search(&snapshot, "zzz").is_empty());
    }

    #[test]
    fn test_tag_filter_never_matches_partially() {
        let snapshot = Snapshot::new(
            vec![
                plugin("a", "a", &["fuzzy-finder"], 1),
                plugin("b", "b", &["fuzzy"], 1),
            ],
            None,
        );

        assert_eq!(ids(&filter_by_tag(&snapshot, "fuzzy")), vec!["b"]);
        assert_eq!(ids(&filter_by_tag(&snapshot, "finder")), Vec::<&str>::new());
        assert!(filter_by_tag(&snapshot, "fuzz").is_empty());
    }

    #[test]
    fn test_results_respect_ordering_law() {
        let snapshot = Snapshot::new(
            vec![
                plugin("1", "lualine.nvim", &["statusline"], 5000),
                plugin("2", "lsp-status.nvim", &["statusline", "lsp"], 600),
                plugin("3", "nvim-lspconfig", &["lsp"], 9000),
                plugin("4", "lsp_signature.nvim", &["lsp"], 1800),
                plugin("5", "lspsaga.nvim", &["lsp"], 3000),
                plugin("6", "lsp", &[], 1),
                plugin("7", "galaxyline.nvim", &["statusline"], 800),
            ],
            None,
        );

        for query in ["lsp", "line", "statusline", "nvim", ""] {
            let results = search(&snapshot, query);
            assert_ordered(&results);
        }
        for tag in ["lsp", "statusline"] {
            let results = filter_by_tag(&snapshot, tag);
            assert_ordered(&results);
            assert!(results.iter().all(|r| r.rank == 0));
        }

        let results = search(&snapshot, "lsp");
        assert_eq!(results[0].plugin.id, "6");
    }

    #[test]
    fn test_list_all_is_idempotent() {
        let catalog = telescope_catalog();
        assert_eq!(ids(&catalog.list_all()), ids(&catalog.list_all()));
        assert!(catalog.list_all().iter().all(|r| r.rank == 0));
    }

    #[test]
    fn test_query_pins_one_snapshot() {
        let catalog = telescope_catalog();
        let pinned = catalog.snapshot();

        catalog.store().set_snapshot(Arc::new(Snapshot::empty()));

        assert_eq!(ids(&list_all(&pinned)), vec!["a", "b"]);
        assert!(catalog.list_all().is_empty());
    }

    #[test]
    fn test_ranked_serializes_flat() {
        let catalog = telescope_catalog();
        let results = catalog.search("telescope");
        let value = serde_json::to_value(&results[0]).unwrap();

        assert_eq!(value["id"], "a");
        assert_eq!(value["rank"], 0);
        assert_eq!(value["stars"], 500);
        assert_eq!(value["openIssues"], 0);
    }
}
