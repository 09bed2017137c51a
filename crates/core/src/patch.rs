//! Partial-update helpers for nullable fields.
//!
//! A PATCH body distinguishes three states for a nullable column: the key is
//! absent (keep), `null` (clear) or a value (set). Those map onto
//! `Option<Option<T>>` as `None`, `Some(None)` and `Some(Some(v))`.

use serde::{Deserialize, Deserializer};

/// `deserialize_with` target for `Option<Option<T>>` patch fields.
///
/// Pair with `#[serde(default)]` so an absent key stays `None`:
///
/// ```ignore
/// #[serde(default, deserialize_with = "yamdb_core::patch::nullable")]
/// pub bio: Option<Option<String>>,
/// ```
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
