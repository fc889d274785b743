//! Combining independently built graphs
//!
//! Two algorithms: [`Graph::merge_with`] takes caller-supplied resolvers
//! that decide the combined content wherever the two inputs overlap, and
//! [`Graph::merge_conservative`] requires overlapping entries to agree.
//! Both read their inputs without mutating them and write only to a fresh
//! result graph.

use tracing::debug;

use super::edge::Edge;
use super::node::Node;
use super::store::{EntryKind, Graph, GraphError, GraphResult};

impl<N, E> Graph<N, E>
where
    N: Clone + PartialEq,
    E: Clone + PartialEq,
{
    /// Merge two graphs into a fresh one using caller-supplied conflict
    /// policies.
    ///
    /// For every address present in both inputs, the matching resolver is
    /// called with both values and its output is added to the result; its
    /// output must keep the shared address. Entries present on one side only
    /// are carried over unchanged. All nodes are merged before any edge, so
    /// edge endpoints always resolve in the result. Traversal is in
    /// canonical-key order, making the merge deterministic.
    pub fn merge_with<FN, FE>(
        &self,
        other: &Self,
        mut resolve_node: FN,
        mut resolve_edge: FE,
    ) -> GraphResult<Self>
    where
        FN: FnMut(&Node<N>, &Node<N>) -> GraphResult<Node<N>>,
        FE: FnMut(&Edge<E>, &Edge<E>) -> GraphResult<Edge<E>>,
    {
        let mut merged = Graph::new();

        for node in self.nodes() {
            match other.node(&node.address) {
                Some(theirs) => {
                    let resolved = resolve_node(node, theirs)?;
                    if resolved.address != node.address {
                        return Err(GraphError::ResolverAddressMismatch {
                            expected: node.address.clone(),
                            actual: resolved.address,
                        });
                    }
                    merged.add_node(resolved)?;
                }
                None => merged.add_node(node.clone())?,
            }
        }
        for node in other.nodes() {
            if !merged.contains_node(&node.address) {
                merged.add_node(node.clone())?;
            }
        }

        for edge in self.edges() {
            match other.edge(&edge.address) {
                Some(theirs) => {
                    let resolved = resolve_edge(edge, theirs)?;
                    if resolved.address != edge.address {
                        return Err(GraphError::ResolverAddressMismatch {
                            expected: edge.address.clone(),
                            actual: resolved.address,
                        });
                    }
                    merged.add_edge(resolved)?;
                }
                None => merged.add_edge(edge.clone())?,
            }
        }
        for edge in other.edges() {
            if !merged.contains_edge(&edge.address) {
                merged.add_edge(edge.clone())?;
            }
        }

        debug!(
            nodes = merged.node_count(),
            edges = merged.edge_count(),
            "graphs merged"
        );
        Ok(merged)
    }

    /// Merge two graphs that are expected to agree wherever they overlap.
    ///
    /// Any divergence between same-address entries fails with
    /// [`GraphError::AddressConflict`] naming the address and whether it was
    /// a node or an edge. Use this when the inputs should be consistent
    /// duplicates (e.g. re-fetches of the same source) and divergence
    /// indicates an upstream bug.
    pub fn merge_conservative(&self, other: &Self) -> GraphResult<Self> {
        self.merge_with(
            other,
            |ours, theirs| {
                if ours == theirs {
                    Ok(ours.clone())
                } else {
                    Err(GraphError::AddressConflict {
                        kind: EntryKind::Node,
                        address: ours.address.clone(),
                    })
                }
            },
            |ours, theirs| {
                if ours == theirs {
                    Ok(ours.clone())
                } else {
                    Err(GraphError::AddressConflict {
                        kind: EntryKind::Edge,
                        address: ours.address.clone(),
                    })
                }
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Address;

    fn addr(kind: &str, id: &str) -> Address {
        Address::new("origin", "src", kind, id)
    }

    fn node(id: &str, payload: &str) -> Node<String> {
        Node::new(addr("issue", id), payload.to_string())
    }

    fn edge(id: &str, src: &str, dst: &str, payload: &str) -> Edge<String> {
        Edge::new(
            addr("ref", id),
            addr("issue", src),
            addr("issue", dst),
            payload.to_string(),
        )
    }

    fn keep_ours<T: Clone>(ours: &T, _theirs: &T) -> GraphResult<T> {
        Ok(ours.clone())
    }

    #[test]
    fn merge_of_disjoint_graphs_is_their_union() {
        let mut g1: Graph<String, String> = Graph::new();
        g1.add_node(node("x", "left")).unwrap();
        let mut g2: Graph<String, String> = Graph::new();
        g2.add_node(node("y", "right")).unwrap();

        let merged = g1.merge_with(&g2, keep_ours, keep_ours).unwrap();
        assert_eq!(merged.node_count(), 2);
        assert!(merged.contains_node(&addr("issue", "x")));
        assert!(merged.contains_node(&addr("issue", "y")));
    }

    #[test]
    fn merge_resolves_overlapping_nodes() {
        let mut g1: Graph<String, String> = Graph::new();
        g1.add_node(node("1", "left")).unwrap();
        let mut g2: Graph<String, String> = Graph::new();
        g2.add_node(node("1", "right")).unwrap();

        let merged = g1
            .merge_with(
                &g2,
                |ours, theirs| {
                    Ok(Node::new(
                        ours.address.clone(),
                        format!("{}+{}", ours.payload, theirs.payload),
                    ))
                },
                keep_ours,
            )
            .unwrap();

        assert_eq!(merged.node_count(), 1);
        assert_eq!(merged.node(&addr("issue", "1")).unwrap().payload, "left+right");
    }

    #[test]
    fn merge_carries_edges_from_both_sides() {
        let mut g1: Graph<String, String> = Graph::new();
        g1.add_node(node("1", "a")).unwrap();
        g1.add_node(node("2", "b")).unwrap();
        g1.add_edge(edge("e1", "1", "2", "references")).unwrap();

        let mut g2: Graph<String, String> = Graph::new();
        g2.add_node(node("2", "b")).unwrap();
        g2.add_node(node("3", "c")).unwrap();
        g2.add_edge(edge("e2", "2", "3", "references")).unwrap();

        let merged = g1.merge_with(&g2, keep_ours, keep_ours).unwrap();
        assert_eq!(merged.node_count(), 3);
        assert_eq!(merged.edge_count(), 2);
        assert_eq!(merged.out_edges(&addr("issue", "2")).unwrap().len(), 1);
        assert_eq!(merged.in_edges(&addr("issue", "2")).unwrap().len(), 1);
    }

    #[test]
    fn merge_does_not_mutate_its_inputs() {
        let mut g1: Graph<String, String> = Graph::new();
        g1.add_node(node("1", "a")).unwrap();
        let mut g2: Graph<String, String> = Graph::new();
        g2.add_node(node("2", "b")).unwrap();
        let before1 = g1.clone();
        let before2 = g2.clone();

        let _ = g1.merge_with(&g2, keep_ours, keep_ours).unwrap();
        assert_eq!(g1, before1);
        assert_eq!(g2, before2);
    }

    #[test]
    fn resolver_must_keep_the_shared_address() {
        let mut g1: Graph<String, String> = Graph::new();
        g1.add_node(node("1", "a")).unwrap();
        let mut g2: Graph<String, String> = Graph::new();
        g2.add_node(node("1", "b")).unwrap();

        let err = g1
            .merge_with(
                &g2,
                |_, _| Ok(node("rehomed", "c")),
                keep_ours,
            )
            .unwrap_err();
        assert!(matches!(err, GraphError::ResolverAddressMismatch { .. }));
    }

    #[test]
    fn conservative_merge_deduplicates_identical_content() {
        let mut g1: Graph<String, String> = Graph::new();
        g1.add_node(node("1", "same")).unwrap();
        let mut g2: Graph<String, String> = Graph::new();
        g2.add_node(node("1", "same")).unwrap();
        g2.add_node(node("2", "extra")).unwrap();

        let merged = g1.merge_conservative(&g2).unwrap();
        assert_eq!(merged.node_count(), 2);
    }

    #[test]
    fn conservative_merge_fails_on_divergent_nodes() {
        let mut g1: Graph<String, String> = Graph::new();
        g1.add_node(node("1", "left")).unwrap();
        let mut g2: Graph<String, String> = Graph::new();
        g2.add_node(node("1", "right")).unwrap();

        let err = g1.merge_conservative(&g2).unwrap_err();
        match err {
            GraphError::AddressConflict { kind, address } => {
                assert_eq!(kind, EntryKind::Node);
                assert_eq!(address, addr("issue", "1"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn conservative_merge_fails_on_divergent_edges() {
        let mut g1: Graph<String, String> = Graph::new();
        g1.add_node(node("1", "a")).unwrap();
        g1.add_node(node("2", "b")).unwrap();
        g1.add_edge(edge("e1", "1", "2", "references")).unwrap();

        let mut g2 = g1.clone();
        g2.add_edge(edge("e2", "1", "2", "duplicates")).unwrap();
        let mut g3: Graph<String, String> = Graph::new();
        g3.add_node(node("1", "a")).unwrap();
        g3.add_node(node("2", "b")).unwrap();
        g3.add_edge(edge("e1", "1", "2", "duplicates")).unwrap();

        // Divergent edge content at e1
        let err = g1.merge_conservative(&g3).unwrap_err();
        match err {
            GraphError::AddressConflict { kind, address } => {
                assert_eq!(kind, EntryKind::Edge);
                assert_eq!(address, addr("ref", "e1"));
            }
            other => panic!("unexpected error: {other}"),
        }

        // Agreeing overlap plus one extra edge merges cleanly
        let merged = g1.merge_conservative(&g2).unwrap();
        assert_eq!(merged.edge_count(), 2);
    }
}
