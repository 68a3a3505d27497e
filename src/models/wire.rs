//! Field adapters for keys that may be left out of a payload.

use serde::{Deserialize, Deserializer};

/// A key that may be absent (`None`), explicitly `null` (`Some(None)`) or
/// set. Used with `#[serde(default, deserialize_with = "nullable")]` and
/// `skip_serializing_if = "Option::is_none"` so both forms survive a
/// re-encode.
pub type Nullable<T> = Option<Option<T>>;

pub fn nullable<'de, D, T>(deserializer: D) -> Result<Nullable<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// For keys that may be left out but are never `null`.
pub fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
