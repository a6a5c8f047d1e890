//! Tri-state optional fields for partial updates.
//!
//! A partial-update request distinguishes three states per field: the
//! field was not supplied at all (leave the stored value alone), the
//! field was supplied with an explicit "empty" sentinel (clear the stored
//! value), or the field was supplied with a new value (overwrite). Plain
//! `Option` cannot express the first two separately, so updates carry an
//! explicit tagged type instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// One field of a partial-update request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    /// The field was not supplied; the stored value is kept.
    #[default]
    Absent,

    /// The field was supplied as the empty sentinel; the stored value is
    /// removed.
    Clear,

    /// The field was supplied with a new value.
    Set(T),
}

impl<T> FieldUpdate<T> {
    /// Merge this update against the previously stored value.
    ///
    /// The same rule applies on create (old value absent for every field)
    /// and on update (old value from the stored record):
    ///
    /// - `Absent` keeps the old value unchanged,
    /// - `Clear` removes the field,
    /// - `Set(v)` overwrites with `v`.
    pub fn merge(&self, old: Option<&T>) -> Option<T>
    where
        T: Clone,
    {
        match self {
            FieldUpdate::Absent => old.cloned(),
            FieldUpdate::Clear => None,
            FieldUpdate::Set(value) => Some(value.clone()),
        }
    }

    /// Returns true if the field was supplied in the request, whether as
    /// a clear or as a new value.
    pub fn is_supplied(&self) -> bool {
        !matches!(self, FieldUpdate::Absent)
    }

    /// Returns the supplied value, if any.
    pub fn as_set(&self) -> Option<&T> {
        match self {
            FieldUpdate::Set(value) => Some(value),
            _ => None,
        }
    }
}

/// Deserializes a string field of an update request.
///
/// JSON `null` and the empty string both clear the field. Use with
/// `#[serde(default)]` so a missing field deserializes to `Absent`.
pub fn string_update<'de, D>(deserializer: D) -> Result<FieldUpdate<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(match value {
        None => FieldUpdate::Clear,
        Some(s) if s.is_empty() => FieldUpdate::Clear,
        Some(s) => FieldUpdate::Set(s),
    })
}

/// Deserializes a timestamp field of an update request.
///
/// JSON `null` clears the field. Use with `#[serde(default)]` so a
/// missing field deserializes to `Absent`.
pub fn time_update<'de, D>(deserializer: D) -> Result<FieldUpdate<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<DateTime<Utc>>::deserialize(deserializer)?;
    Ok(match value {
        None => FieldUpdate::Clear,
        Some(t) => FieldUpdate::Set(t),
    })
}
