//! Node representation in the aggregation graph

use serde::{Deserialize, Serialize};

use super::address::{Address, Addressable};

/// A node: an address plus an adapter-owned payload.
///
/// Identity is the address; for equality and conflict detection the content
/// is the full `{address, payload}` structure. The payload type is chosen by
/// the adapter layer and stays opaque to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node<P> {
    /// Globally unique identifier
    pub address: Address,
    /// Adapter-owned content
    pub payload: P,
}

impl<P> Node<P> {
    /// Create a node with the given address and payload
    pub fn new(address: Address, payload: P) -> Self {
        Self { address, payload }
    }
}

impl<P> Addressable for Node<P> {
    fn address(&self) -> &Address {
        &self.address
    }
}
