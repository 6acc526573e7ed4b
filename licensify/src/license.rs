//! The license data model: an unordered set of string attributes.

use crate::canonical::{self, DIGEST_SIZE};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map;

/// An arbitrary set of key-value claims (product, expiry, customer id, ...).
///
/// Iteration order is unspecified; anything that needs a stable byte form
/// goes through [`canonical::digest`]. Attribute names are not validated,
/// but keys and values containing `:` or `,` make the canonical form
/// ambiguous (see [`canonical::has_reserved_chars`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct License {
    attributes: HashMap<String, String>,
}

impl License {
    /// Creates an empty license.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or updates an attribute, returning the previous value if any.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.attributes.insert(key.into(), value.into())
    }

    /// Returns the value of an attribute.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Removes an attribute, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.attributes.remove(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Iterates over `(key, value)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// SHA-256 digest of the canonical form. Independent of insertion order.
    #[must_use]
    pub fn digest(&self) -> [u8; DIGEST_SIZE] {
        canonical::digest(self)
    }
}

impl From<HashMap<String, String>> for License {
    fn from(attributes: HashMap<String, String>) -> Self {
        Self { attributes }
    }
}

impl<K, V> FromIterator<(K, V)> for License
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            attributes: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K, V> Extend<(K, V)> for License
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

impl IntoIterator for License {
    type Item = (String, String);
    type IntoIter = hash_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.into_iter()
    }
}
