//! The published catalog and the store holding it.

use std::{collections::HashSet, sync::Arc};

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use nvimsh_registry::Plugin;

/// One immutable view of the catalog.
///
/// The tag set is derived from the plugins when the snapshot is built and
/// never changes afterwards, so it always equals the union of the tags of
/// exactly these plugins.
#[derive(Debug, Default)]
pub struct Snapshot {
    plugins: Vec<Arc<Plugin>>,
    tags: HashSet<String>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// The catalog before the first successful refresh.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(plugins: Vec<Plugin>, refreshed_at: Option<DateTime<Utc>>) -> Self {
        let tags = plugins
            .iter()
            .flat_map(|plugin| plugin.tags.iter().cloned())
            .collect();

        Self {
            plugins: plugins.into_iter().map(Arc::new).collect(),
            tags,
            refreshed_at,
        }
    }

    pub fn plugins(&self) -> &[Arc<Plugin>] {
        &self.plugins
    }

    pub fn tags(&self) -> &HashSet<String> {
        &self.tags
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

/// Holder of the current [`Snapshot`].
///
/// Readers pin an `Arc<Snapshot>` and work against it for as long as they
/// like; the refresher publishes a whole new snapshot with a single pointer
/// swap. Published snapshots are never mutated.
#[derive(Debug)]
pub struct SnapshotStore {
    current: ArcSwap<Snapshot>,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(Snapshot::empty()),
        }
    }

    /// Returns the currently published snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Atomically replaces the published snapshot.
    pub fn set_snapshot(&self, snapshot: Arc<Snapshot>) {
        self.current.store(snapshot);
    }
}
