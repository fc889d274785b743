//! Tributary: content-addressed graph core
//!
//! An in-memory graph store in which every entity is identified by a
//! structured, globally unique [`Address`] rather than an opaque handle.
//! Independent data sources build graphs separately; because identity is
//! content-addressed, those graphs can be compared, deduplicated, and merged
//! deterministically into one combinable representation.
//!
//! # Core Concepts
//!
//! - **Address**: four-field composite identifier (origin scope, source
//!   name, type tag, id) acting as a global primary key
//! - **Nodes / Edges**: address-identified entities with adapter-owned
//!   payloads; edges carry `src`/`dst` endpoint addresses as data
//! - **Merge**: combine two graphs into a fresh one, either through
//!   caller-supplied resolvers or conservatively (divergence is an error)
//!
//! # Example
//!
//! ```
//! use tributary::{Address, Edge, Graph, Node};
//!
//! let mut graph: Graph<String, String> = Graph::new();
//! let alice = Address::new("github.com/acme/widgets", "issues", "author", "alice");
//! let issue = Address::new("github.com/acme/widgets", "issues", "issue", "42");
//!
//! graph.add_node(Node::new(alice.clone(), "Alice".to_string()))?;
//! graph.add_node(Node::new(issue.clone(), "Widget handle falls off".to_string()))?;
//! graph.add_edge(Edge::new(
//!     Address::new("github.com/acme/widgets", "issues", "authored", "alice-42"),
//!     alice.clone(),
//!     issue,
//!     "authored".to_string(),
//! ))?;
//!
//! assert_eq!(graph.out_edges(&alice)?.len(), 1);
//! # Ok::<(), tributary::GraphError>(())
//! ```

mod graph;

pub mod entity;

pub use graph::{
    Address, AddressMap, Addressable, Edge, EndpointSide, EntryKind, Graph, GraphError,
    GraphResult, Node,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
