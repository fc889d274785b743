//! Core graph data structures

mod address;
mod edge;
mod map;
mod merge;
mod node;
mod store;


pub use address::{Address, Addressable};
pub use edge::Edge;
pub use map::AddressMap;
pub use node::Node;
pub use store::{EndpointSide, EntryKind, Graph, GraphError, GraphResult};
