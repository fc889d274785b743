//! Edge representation in the aggregation graph

use serde::{Deserialize, Serialize};

use super::address::{Address, Addressable};

/// A directed edge between two nodes.
///
/// An edge is identified by its own address; `src` and `dst` are data, not
/// identity, and need not share the edge's type tag. Both endpoints must
/// already exist in a graph before the edge can be added to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge<P> {
    /// Globally unique identifier of the edge itself
    pub address: Address,
    /// Address of the source node
    pub src: Address,
    /// Address of the destination node
    pub dst: Address,
    /// Adapter-owned content
    pub payload: P,
}

impl<P> Edge<P> {
    /// Create an edge with the given address, endpoints, and payload
    pub fn new(address: Address, src: Address, dst: Address, payload: P) -> Self {
        Self {
            address,
            src,
            dst,
            payload,
        }
    }
}

impl<P> Addressable for Edge<P> {
    fn address(&self) -> &Address {
        &self.address
    }
}
