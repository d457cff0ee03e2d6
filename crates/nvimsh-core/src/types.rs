use std::sync::Arc;

use chrono::{DateTime, Utc};
use nvimsh_registry::Plugin;
use serde::Serialize;

// ---- Query ----

/// A plugin paired with the rank a query assigned it. Lower ranks sort
/// first.
#[derive(Clone, Debug, Serialize)]
pub struct Ranked {
    #[serde(flatten)]
    pub plugin: Arc<Plugin>,
    pub rank: i32,
}

impl Ranked {
    pub fn new(plugin: Arc<Plugin>, rank: i32) -> Self {
        Self {
            plugin,
            rank,
        }
    }
}

/// Counters describing the published snapshot.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct CatalogStats {
    pub plugins: usize,
    pub tags: usize,
    pub refreshed_at: Option<DateTime<Utc>>,
}

// ---- Refresh ----

/// What a successful refresh cycle published.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshSummary {
    pub plugins: usize,
    pub tags: usize,
}
