//! Search engine core for nvimsh.
//!
//! The catalog lives in a [`SnapshotStore`]: one immutable [`Snapshot`]
//! published at a time, swapped atomically by the [`Refresher`] and read by
//! any number of concurrent queries through a [`Catalog`].

pub mod error;
pub mod query;
pub mod ranking;
pub mod refresh;
pub mod store;
pub mod types;

pub use error::{CoreError, CoreResult};
pub use query::Catalog;
pub use refresh::{RefreshConfig, RefreshHandle, Refresher};
pub use store::{Snapshot, SnapshotStore};
pub use types::*;
