//! Plugin metadata as published by the upstream database.

use serde::{Deserialize, Deserializer, Serialize};

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One catalog entry.
///
/// Absent keys and `null` values decode to their zero value so older or
/// partial records still load; a key holding the wrong JSON type fails the
/// whole document. The timestamps are kept verbatim.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Plugin {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(deserialize_with = "null_as_default")]
    pub repo: String,
    #[serde(deserialize_with = "null_as_default")]
    pub link: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub homepage: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub branch: String,
    #[serde(deserialize_with = "null_as_default")]
    pub open_issues: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub watcher: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub forks: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub stars: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub subscribers: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub network: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub updated_at: String,
}
