//! Decoding of the upstream plugin database document.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::trace;

use crate::{error::Result, plugin::Plugin};

/// Somewhere the raw plugin database can be fetched from.
///
/// Implementations perform blocking I/O; async callers should run
/// [`FeedSource::fetch`] on a blocking thread.
pub trait FeedSource: Send + Sync {
    /// Human readable location, used in logs.
    fn location(&self) -> &str;

    /// Returns the raw document bytes.
    fn fetch(&self) -> Result<Vec<u8>>;
}

/// The document shape: `{ "plugins": { "<id>": Plugin, ... } }`.
#[derive(Debug, Deserialize)]
pub struct Feed {
    pub plugins: HashMap<String, Plugin>,
}

impl Feed {
    /// Flattens the mapping into a list ordered by plugin id.
    ///
    /// A record without its own `id` takes the mapping key.
    pub fn into_plugins(self) -> Vec<Plugin> {
        let mut plugins: Vec<Plugin> = self
            .plugins
            .into_iter()
            .map(|(key, mut plugin)| {
                if plugin.id.is_empty() {
                    plugin.id = key;
                }
                plugin
            })
            .collect();

        plugins.sort_by(|a, b| a.id.cmp(&b.id));
        plugins
    }
}

/// Decodes raw feed bytes into plugins ordered by id.
///
/// # Errors
///
/// Returns [`crate::RegistryError::Json`] when the bytes are not JSON, the
/// `plugins` key is missing, or any record has a field of the wrong type.
pub fn decode_feed(content: &[u8]) -> Result<Vec<Plugin>> {
    let feed: Feed = serde_json::from_slice(content)?;
    trace!(count = feed.plugins.len(), "decoded plugin feed");
    Ok(feed.into_plugins())
}
