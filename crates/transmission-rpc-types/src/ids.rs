//! Torrent identifier lists.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::args::ValueKind;

/// Error raised while building a [`TorrentIdList`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdListError {
    /// An element was not an integer.
    #[error(
        "the list of IDs can only contain integers, item of type {kind} given at the offset {offset}"
    )]
    NotAnInteger {
        /// Key or offset of the element in the input collection.
        offset: String,
        /// JSON type of the element.
        kind: ValueKind,
    },

    /// An element was a negative integer.
    #[error("torrent IDs cannot be negative, {value} given at the offset {offset}")]
    Negative {
        /// Key or offset of the element in the input collection.
        offset: String,
        /// The rejected value.
        value: i64,
    },

    /// The input was neither a JSON array nor a JSON object.
    #[error("a list of IDs must be built from an array or an object, {0} given")]
    NotACollection(ValueKind),
}

/// An immutable, dense, zero-based list of torrent ids.
///
/// The list is built from any keyed collection; keys are only used to report the offending element
/// when validation fails and are otherwise dropped, keeping the insertion order of the values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TorrentIdList(Vec<u64>);

impl TorrentIdList {
    /// Builds a list from ids that are already known to be valid.
    pub fn new(ids: impl IntoIterator<Item = u64>) -> Self {
        Self(ids.into_iter().collect())
    }

    /// Builds a list from `(key, value)` pairs, failing on the first value that is not a
    /// non-negative integer.
    pub fn from_keyed<K, I>(items: I) -> Result<Self, IdListError>
    where
        K: fmt::Display,
        I: IntoIterator<Item = (K, Value)>,
    {
        items
            .into_iter()
            .map(|(key, value)| parse_id(&key, &value))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Returns the ids as a slice.
    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    /// Returns an iterator over the ids.
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.0.iter().copied()
    }

    /// Number of ids in the list.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// An empty list means "all torrents" to the daemon.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn parse_id(key: &dyn fmt::Display, value: &Value) -> Result<u64, IdListError> {
    if let Some(id) = value.as_u64() {
        return Ok(id);
    }
    if let Some(negative) = value.as_i64() {
        return Err(IdListError::Negative {
            offset: key.to_string(),
            value: negative,
        });
    }
    Err(IdListError::NotAnInteger {
        offset: key.to_string(),
        kind: ValueKind::of(value),
    })
}

impl TryFrom<Value> for TorrentIdList {
    type Error = IdListError;

    /// Arrays are keyed by offset, objects by their keys.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Array(items) => Self::from_keyed(items.into_iter().enumerate()),
            Value::Object(map) => Self::from_keyed(map),
            other => Err(IdListError::NotACollection(ValueKind::of(&other))),
        }
    }
}

impl From<Vec<u64>> for TorrentIdList {
    fn from(ids: Vec<u64>) -> Self {
        Self(ids)
    }
}

impl FromIterator<u64> for TorrentIdList {
    fn from_iter<T: IntoIterator<Item = u64>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl<'a> IntoIterator for &'a TorrentIdList {
    type Item = &'a u64;
    type IntoIter = std::slice::Iter<'a, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<&TorrentIdList> for Value {
    fn from(ids: &TorrentIdList) -> Self {
        Value::Array(ids.iter().map(Value::from).collect())
    }
}
