//! AddressMap: a generic container keyed by canonical address serialization

use std::collections::BTreeMap;

use serde::de::{DeserializeOwned, Error as DeError};
use serde::ser::{Error as SerError, SerializeMap};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::address::{Address, Addressable};

/// A map from canonical address key to an address-bearing value.
///
/// Insertion is unconditional — conflict policy belongs to the caller (the
/// graph layer). Backed by a `BTreeMap` so enumeration and the JSON wire
/// format are byte-stable across runs for the same contents.
///
/// On the wire the map becomes a JSON object keyed by canonical key; the
/// redundant `address` member is stripped from each stored value and
/// reconstructed from the key on load.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressMap<V> {
    entries: BTreeMap<String, V>,
}

impl<V> AddressMap<V> {
    /// Create an empty map
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// All stored values, in ascending canonical-key order
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values()
    }

    /// Consume the map, yielding values in ascending canonical-key order
    pub fn into_values(self) -> impl Iterator<Item = V> {
        self.entries.into_values()
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the map holds no values
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Addressable> AddressMap<V> {
    /// Insert a value at its own address, returning any displaced value.
    ///
    /// Overwrites unconditionally; callers that need reject-on-conflict
    /// semantics must check with [`get`](Self::get) first.
    pub fn insert(&mut self, value: V) -> Option<V> {
        self.entries.insert(value.address().canonical_key(), value)
    }

    /// Look up the value stored at an address
    pub fn get(&self, address: &Address) -> Option<&V> {
        self.entries.get(&address.canonical_key())
    }

    pub(crate) fn get_mut(&mut self, address: &Address) -> Option<&mut V> {
        self.entries.get_mut(&address.canonical_key())
    }

    /// True if a value is stored at the address
    pub fn contains(&self, address: &Address) -> bool {
        self.entries.contains_key(&address.canonical_key())
    }
}

impl<V> Default for AddressMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Serialize for AddressMap<V>
where
    V: Addressable + Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            // Fresh snapshot per entry; the key already encodes the address.
            let mut json = serde_json::to_value(value).map_err(S::Error::custom)?;
            let Value::Object(fields) = &mut json else {
                return Err(S::Error::custom(
                    "addressable values must serialize to JSON objects",
                ));
            };
            fields.remove("address");
            map.serialize_entry(key, &json)?;
        }
        map.end()
    }
}

impl<'de, V> Deserialize<'de> for AddressMap<V>
where
    V: Addressable + DeserializeOwned,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        let mut entries = BTreeMap::new();
        for (key, mut json) in raw {
            let address = Address::parse_key(&key).map_err(D::Error::custom)?;
            let Value::Object(fields) = &mut json else {
                return Err(D::Error::custom(format!(
                    "entry at key {key:?} is not a JSON object"
                )));
            };
            fields.insert(
                "address".to_string(),
                serde_json::to_value(&address).map_err(D::Error::custom)?,
            );
            let value: V = serde_json::from_value(json).map_err(D::Error::custom)?;
            entries.insert(key, value);
        }
        Ok(Self { entries })
    }
}
