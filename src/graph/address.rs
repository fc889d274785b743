//! Address: the structured identifier every graph entity carries

use std::fmt;
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::store::GraphError;

/// A globally unique, structured identifier for a graph entity.
///
/// Four fields: the origin scope the entity belongs to (e.g. a repository),
/// the data source that produced it, an entity-type tag, and an id that is
/// opaque to the core — its interpretation belongs to the adapter that
/// minted it. Two addresses are equal iff all four fields are equal, which
/// is what lets graphs built independently by different sources be
/// deduplicated and merged.
///
/// Immutable once constructed; the fields are read through accessors.
/// Serializes as its canonical key (a plain string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    origin: String,
    source: String,
    kind: String,
    id: String,
}

impl Address {
    /// Create an address from its four fields
    pub fn new(
        origin: impl Into<String>,
        source: impl Into<String>,
        kind: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            origin: origin.into(),
            source: source.into(),
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Origin scope, e.g. "github.com/acme/widgets"
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Name of the data source that owns the entity
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Entity-type tag, e.g. "issue" or "author"
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Opaque id within (origin, source, kind)
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The canonical string form used as a map key.
    ///
    /// Fields are joined with `/` in a fixed order; `%` and `/` inside a
    /// field are percent-escaped, so the key is injective and invertible.
    /// Stable across runs for the same four field values.
    pub fn canonical_key(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            escape_field(&self.origin),
            escape_field(&self.source),
            escape_field(&self.kind),
            escape_field(&self.id),
        )
    }

    /// Reconstruct an address from its canonical key.
    ///
    /// Only canonical keys are accepted: a key that does not split into
    /// exactly four fields, or whose re-encoding differs from the input
    /// (escape sequences the encoder never emits, lowercase hex), fails
    /// with [`GraphError::MalformedKey`].
    pub fn parse_key(key: &str) -> Result<Self, GraphError> {
        let parts: Vec<&str> = key.split('/').collect();
        let &[origin, source, kind, id] = parts.as_slice() else {
            return Err(GraphError::MalformedKey(key.to_string()));
        };
        let address = Self {
            origin: unescape_field(origin),
            source: unescape_field(source),
            kind: unescape_field(kind),
            id: unescape_field(id),
        };
        // A non-canonical key would alias another address's key, leaving a
        // map entry unreachable through its own address.
        if address.canonical_key() != key {
            return Err(GraphError::MalformedKey(key.to_string()));
        }
        Ok(address)
    }
}

fn escape_field(field: &str) -> String {
    field.replace('%', "%25").replace('/', "%2F")
}

fn unescape_field(field: &str) -> String {
    field.replace("%2F", "/").replace("%25", "%")
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical_key())
    }
}

impl FromStr for Address {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_key(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        Self::parse_key(&key).map_err(D::Error::custom)
    }
}

/// Capability of carrying an address.
///
/// Generic containers operate over this capability rather than over concrete
/// entity types. Implementors must serialize to a JSON object with a
/// top-level `"address"` member — the wire format strips that member and
/// reconstructs it from the map key on load.
pub trait Addressable {
    /// The address identifying this value
    fn address(&self) -> &Address;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_iff_all_fields_equal() {
        let a = Address::new("origin", "src", "issue", "1");
        let b = Address::new("origin", "src", "issue", "1");
        let c = Address::new("origin", "src", "issue", "2");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn canonical_key_round_trips() {
        let a = Address::new("github.com/acme/widgets", "issues", "issue", "42");
        let key = a.canonical_key();
        assert_eq!(key, "github.com%2Facme%2Fwidgets/issues/issue/42");
        assert_eq!(Address::parse_key(&key).unwrap(), a);
    }

    #[test]
    fn canonical_key_escapes_percent_and_slash() {
        let a = Address::new("a/b", "100%", "%2F", "x");
        let key = a.canonical_key();
        // Exactly three unescaped separators remain
        assert_eq!(key.matches('/').count(), 3);
        assert_eq!(Address::parse_key(&key).unwrap(), a);
    }

    #[test]
    fn keys_are_injective() {
        // Without escaping these two would collide on "a/b/c/d/e"
        let a = Address::new("a/b", "c", "d", "e");
        let b = Address::new("a", "b/c", "d", "e");
        assert_ne!(a.canonical_key(), b.canonical_key());
    }

    #[test]
    fn malformed_key_is_rejected() {
        assert!(Address::parse_key("only/three/parts").is_err());
        assert!(Address::parse_key("one/too/many/parts/here").is_err());
    }

    #[test]
    fn noncanonical_keys_are_rejected() {
        // %41 unescapes to itself but re-encodes to %2541
        assert!(Address::parse_key("o/s/issue/%41").is_err());
        // Lowercase hex never appears in encoder output
        assert!(Address::parse_key("o%2fs/s/issue/1").is_err());
        // The canonical spelling of the same field parses fine
        let a = Address::parse_key("o/s/issue/%2541").unwrap();
        assert_eq!(a.id(), "%41");
    }

    #[test]
    fn fields_are_read_through_accessors() {
        let a = Address::new("o", "s", "issue", "1");
        assert_eq!(a.origin(), "o");
        assert_eq!(a.source(), "s");
        assert_eq!(a.kind(), "issue");
        assert_eq!(a.id(), "1");
    }

    #[test]
    fn ordering_is_consistent_with_equality() {
        let a = Address::new("o", "s", "issue", "1");
        let b = Address::new("o", "s", "issue", "2");
        assert!(a < b);
        assert_eq!(a.cmp(&a), std::cmp::Ordering::Equal);
    }

    #[test]
    fn serializes_as_canonical_string() {
        let a = Address::new("origin", "src", "issue", "1");
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, "\"origin/src/issue/1\"");
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);
    }
}
