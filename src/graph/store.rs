//! Graph: node and edge storage with adjacency indices and validation

use std::fmt;

use serde::de::{DeserializeOwned, Error as DeError};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use tracing::debug;

use super::address::{Address, Addressable};
use super::edge::Edge;
use super::map::AddressMap;
use super::node::Node;

/// Whether a conflicting entry was a node or an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Node,
    Edge,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node => write!(f, "node"),
            Self::Edge => write!(f, "edge"),
        }
    }
}

/// Which endpoint of an edge failed to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointSide {
    Src,
    Dst,
}

impl fmt::Display for EndpointSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Src => write!(f, "src"),
            Self::Dst => write!(f, "dst"),
        }
    }
}

/// Errors that can occur in graph operations
#[derive(Debug, Error)]
pub enum GraphError {
    /// An entry exists at the same address with different content.
    /// Conflicting redefinition is always an error, never a silent overwrite.
    #[error("address conflict: {kind} at {address} already exists with different content")]
    AddressConflict { kind: EntryKind, address: Address },

    /// An edge endpoint does not resolve to a node in the graph
    #[error("edge {edge}: {side} endpoint {endpoint} is not a node in this graph")]
    MissingEndpoint {
        edge: Address,
        side: EndpointSide,
        endpoint: Address,
    },

    /// An adjacency query referenced an address with no node
    #[error("node not found: {0}")]
    NodeNotFound(Address),

    /// An address key was not in canonical four-field form
    #[error("malformed address key: {0:?}")]
    MalformedKey(String),

    /// A merge resolver returned a value under a different address
    #[error("merge resolver returned address {actual}, expected {expected}")]
    ResolverAddressMismatch { expected: Address, actual: Address },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

/// Per-node list of edge addresses, in insertion order
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Adjacency {
    address: Address,
    pub(crate) edges: Vec<Address>,
}

impl Adjacency {
    fn empty(address: Address) -> Self {
        Self {
            address,
            edges: Vec::new(),
        }
    }
}

impl Addressable for Adjacency {
    fn address(&self) -> &Address {
        &self.address
    }
}

/// An in-memory, content-addressed graph.
///
/// Nodes and edges are keyed by [`Address`]; two adjacency indices track the
/// out- and in-edges of every node. Invariants held after every successful
/// operation:
///
/// 1. the node map, out-index, and in-index share the same keyset;
/// 2. every edge appears exactly once in its src node's out-list and its
///    dst node's in-list;
/// 3. an insertion never silently overwrites different content at the same
///    address (idempotent for identical content, rejected otherwise);
/// 4. edge endpoints resolve to nodes already present in the graph.
///
/// Validation happens before any map is touched, so a failed operation
/// leaves the graph exactly as it was.
#[derive(Debug, Clone)]
pub struct Graph<N, E> {
    nodes: AddressMap<Node<N>>,
    edges: AddressMap<Edge<E>>,
    outgoing: AddressMap<Adjacency>,
    incoming: AddressMap<Adjacency>,
}

impl<N, E> Graph<N, E> {
    /// Create an empty graph
    pub fn new() -> Self {
        Self {
            nodes: AddressMap::new(),
            edges: AddressMap::new(),
            outgoing: AddressMap::new(),
            incoming: AddressMap::new(),
        }
    }

    /// Look up a node; absence is not an error
    pub fn node(&self, address: &Address) -> Option<&Node<N>> {
        self.nodes.get(address)
    }

    /// Look up an edge; absence is not an error
    pub fn edge(&self, address: &Address) -> Option<&Edge<E>> {
        self.edges.get(address)
    }

    /// True if a node exists at the address
    pub fn contains_node(&self, address: &Address) -> bool {
        self.nodes.contains(address)
    }

    /// True if an edge exists at the address
    pub fn contains_edge(&self, address: &Address) -> bool {
        self.edges.contains(address)
    }

    /// All nodes, in ascending canonical-key order
    pub fn nodes(&self) -> impl Iterator<Item = &Node<N>> {
        self.nodes.values()
    }

    /// All edges, in ascending canonical-key order
    pub fn edges(&self) -> impl Iterator<Item = &Edge<E>> {
        self.edges.values()
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// True if the graph holds no nodes (and therefore no edges)
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Edges leaving the node at `address`, in insertion order.
    ///
    /// Fails with [`GraphError::NodeNotFound`] if no node exists there.
    pub fn out_edges(&self, address: &Address) -> GraphResult<Vec<&Edge<E>>> {
        Self::resolve_adjacent(&self.edges, &self.outgoing, address)
    }

    /// Edges arriving at the node at `address`, in insertion order.
    ///
    /// Fails with [`GraphError::NodeNotFound`] if no node exists there.
    pub fn in_edges(&self, address: &Address) -> GraphResult<Vec<&Edge<E>>> {
        Self::resolve_adjacent(&self.edges, &self.incoming, address)
    }

    fn resolve_adjacent<'a>(
        edges: &'a AddressMap<Edge<E>>,
        index: &'a AddressMap<Adjacency>,
        address: &Address,
    ) -> GraphResult<Vec<&'a Edge<E>>> {
        let adjacency = index
            .get(address)
            .ok_or_else(|| GraphError::NodeNotFound(address.clone()))?;
        Ok(adjacency
            .edges
            .iter()
            .map(|a| {
                edges
                    .get(a)
                    .expect("adjacency entries resolve to stored edges")
            })
            .collect())
    }
}

impl<N: PartialEq, E: PartialEq> Graph<N, E> {
    /// Add a node to the graph.
    ///
    /// No-op if a deep-equal node already exists at the same address; fails
    /// with [`GraphError::AddressConflict`] if the existing content differs.
    pub fn add_node(&mut self, node: Node<N>) -> GraphResult<()> {
        if let Some(existing) = self.nodes.get(&node.address) {
            if *existing == node {
                return Ok(());
            }
            return Err(GraphError::AddressConflict {
                kind: EntryKind::Node,
                address: node.address,
            });
        }
        let address = node.address.clone();
        self.outgoing.insert(Adjacency::empty(address.clone()));
        self.incoming.insert(Adjacency::empty(address.clone()));
        self.nodes.insert(node);
        debug!(node = %address, total = self.nodes.len(), "node added");
        Ok(())
    }

    /// Add an edge between two existing nodes.
    ///
    /// Conflict semantics match [`add_node`](Self::add_node). Both endpoints
    /// are validated before any map is touched, so a rejected edge leaves
    /// the graph unchanged.
    pub fn add_edge(&mut self, edge: Edge<E>) -> GraphResult<()> {
        if let Some(existing) = self.edges.get(&edge.address) {
            if *existing == edge {
                return Ok(());
            }
            return Err(GraphError::AddressConflict {
                kind: EntryKind::Edge,
                address: edge.address,
            });
        }
        if !self.nodes.contains(&edge.src) {
            return Err(GraphError::MissingEndpoint {
                edge: edge.address,
                side: EndpointSide::Src,
                endpoint: edge.src,
            });
        }
        if !self.nodes.contains(&edge.dst) {
            return Err(GraphError::MissingEndpoint {
                edge: edge.address,
                side: EndpointSide::Dst,
                endpoint: edge.dst,
            });
        }
        let address = edge.address.clone();
        // Both endpoints passed the node check, so the adjacency rows exist
        self.outgoing
            .get_mut(&edge.src)
            .expect("every stored node has an out-adjacency row")
            .edges
            .push(address.clone());
        self.incoming
            .get_mut(&edge.dst)
            .expect("every stored node has an in-adjacency row")
            .edges
            .push(address.clone());
        self.edges.insert(edge);
        debug!(edge = %address, total = self.edges.len(), "edge added");
        Ok(())
    }
}

impl<N, E> Default for Graph<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: PartialEq, E: PartialEq> PartialEq for Graph<N, E> {
    fn eq(&self, other: &Self) -> bool {
        // Adjacency indices are derived from the edge map
        self.nodes == other.nodes && self.edges == other.edges
    }
}

impl<N, E> Serialize for Graph<N, E>
where
    N: Serialize,
    E: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Graph", 2)?;
        state.serialize_field("nodes", &self.nodes)?;
        state.serialize_field("edges", &self.edges)?;
        state.end()
    }
}

impl<'de, N, E> Deserialize<'de> for Graph<N, E>
where
    N: DeserializeOwned + PartialEq,
    E: DeserializeOwned + PartialEq,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(bound(deserialize = "N: DeserializeOwned, E: DeserializeOwned"))]
        struct Wire<N, E> {
            nodes: AddressMap<Node<N>>,
            edges: AddressMap<Edge<E>>,
        }

        let wire = Wire::<N, E>::deserialize(deserializer)?;
        // Replaying the insertions rebuilds the adjacency indices and
        // re-validates every invariant the wire data must satisfy.
        let mut graph = Graph::new();
        for node in wire.nodes.into_values() {
            graph.add_node(node).map_err(D::Error::custom)?;
        }
        for edge in wire.edges.into_values() {
            graph.add_edge(edge).map_err(D::Error::custom)?;
        }
        Ok(graph)
    }
}
