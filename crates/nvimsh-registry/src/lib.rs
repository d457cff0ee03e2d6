//! Plugin metadata for the nvimsh search service.
//!
//! This crate owns everything about the upstream plugin database:
//!
//! - [`Plugin`], the value type describing one catalog entry
//! - [`decode_feed`], turning the raw document into plugins
//! - [`FeedSource`], the seam the refresher fetches through, and
//!   [`HttpFeed`], its HTTP implementation
//!
//! # Example
//!
//! ```no_run
//! use nvimsh_registry::{decode_feed, ClientConfig, FeedSource, HttpFeed};
//!
//! fn load() -> nvimsh_registry::Result<()> {
//!     let feed = HttpFeed::new(
//!         "https://storage.googleapis.com/neovimcraft.com/db.json",
//!         ClientConfig::default(),
//!     )?;
//!     let plugins = decode_feed(&feed.fetch()?)?;
//!     println!("{} plugins", plugins.len());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod feed;
pub mod http_client;
pub mod plugin;

pub use error::{RegistryError, Result};
pub use feed::{decode_feed, Feed, FeedSource};
pub use http_client::{ClientConfig, HttpFeed};
pub use plugin::Plugin;
