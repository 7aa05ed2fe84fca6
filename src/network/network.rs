/*!

A `Graph` is the concrete type implementing the storage of adjacency lists. It is a list of
neighbor lists indexed by `NodeId`, plus a tombstone flag per slot. Each undirected edge is
stored twice, once in the list of each endpoint.

This structure is only concerned with storage of unique edges between live nodes. Feature
extraction and removal policies are the responsibility of higher level modules.

*/

use std::iter::Enumerate;
use std::slice;

use crate::error::NetSirError;
use crate::network::NodeId;

/// The underlying storage type representing the adjacency list
type AdjacencyList = Vec<NodeId>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Graph {
    /// The backing storage vector for the adjacency lists.
    adjacency_lists: Vec<AdjacencyList>,
    /// `false` once a node has been removed.
    present: Vec<bool>,
    node_count: usize,
    edge_count: usize,
}

impl Graph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a graph with `node_count` isolated nodes numbered `0..node_count`.
    #[must_use]
    pub fn with_nodes(node_count: usize) -> Self {
        Self {
            adjacency_lists: vec![AdjacencyList::new(); node_count],
            present: vec![true; node_count],
            node_count,
            edge_count: 0,
        }
    }

    /// Creates a graph with `node_count` nodes and the given undirected edges.
    ///
    /// # Errors
    /// Returns [`NetSirError`] if an edge is a self-loop, a duplicate or references a node
    /// outside `0..node_count`.
    pub fn from_edges(node_count: usize, edges: &[(usize, usize)]) -> Result<Self, NetSirError> {
        let mut graph = Self::with_nodes(node_count);
        for &(a, b) in edges {
            graph.add_edge(NodeId(a), NodeId(b))?;
        }
        Ok(graph)
    }

    pub fn add_node(&mut self) -> NodeId {
        let id = NodeId(self.adjacency_lists.len());
        self.adjacency_lists.push(AdjacencyList::new());
        self.present.push(true);
        self.node_count += 1;
        id
    }

    /// Number of node ids ever allocated, including removed ones.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.present.len()
    }

    /// Number of nodes currently in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.node_count == 0
    }

    #[must_use]
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.present.get(node.0).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn contains_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.neighbors(a).contains(&b)
    }

    /// Inserts the undirected edge `a`–`b`.
    ///
    /// # Errors
    /// Returns [`NetSirError`] if:
    ///
    /// * `a` and `b` are the same node
    /// * either endpoint is not in the graph
    /// * the edge already exists
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Result<(), NetSirError> {
        if a == b {
            return Err(NetSirError::CannotMakeEdgeToSelf);
        }
        for node in [a, b] {
            if !self.contains_node(node) {
                return Err(NetSirError::UnknownNode(node));
            }
        }
        // Enforce uniqueness by neighbor
        if self.contains_edge(a, b) {
            return Err(NetSirError::EdgeAlreadyExists);
        }

        self.adjacency_lists[a.0].push(b);
        self.adjacency_lists[b.0].push(a);
        self.edge_count += 1;
        Ok(())
    }

    /// Number of live neighbors of `node`, or 0 if the node is not in the graph.
    #[must_use]
    pub fn degree(&self, node: NodeId) -> usize {
        self.neighbors(node).len()
    }

    /// Returns the neighbors of `node`, or an empty slice if the node is not in the graph.
    #[must_use]
    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        self.adjacency_lists
            .get(node.0)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Iterates over the live nodes in increasing id order.
    #[must_use]
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes {
            slots: self.present.iter().enumerate(),
            remaining: self.node_count,
        }
    }

    /// Iterates over every edge once, as `(smaller id, larger id)`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.nodes().flat_map(move |node| {
            self.neighbors(node)
                .iter()
                .filter(move |&&neighbor| node < neighbor)
                .map(move |&neighbor| (node, neighbor))
        })
    }

    /// Deletes `node` and all of its incident edges.
    ///
    /// # Errors
    /// Returns [`NetSirError::UnknownNode`] if the node is not in the graph.
    pub fn remove_node(&mut self, node: NodeId) -> Result<(), NetSirError> {
        if !self.contains_node(node) {
            return Err(NetSirError::UnknownNode(node));
        }

        let neighbors = std::mem::take(&mut self.adjacency_lists[node.0]);
        for neighbor in &neighbors {
            let edges = &mut self.adjacency_lists[neighbor.0];
            if let Some(pos) = edges.iter().position(|&other| other == node) {
                edges.swap_remove(pos);
            }
        }
        self.edge_count -= neighbors.len();
        self.present[node.0] = false;
        self.node_count -= 1;
        Ok(())
    }
}

/// Iterator over the live nodes of a [`Graph`]. Knows its exact length, so it can be sampled
/// from without collecting.
#[derive(Clone, Debug)]
pub struct Nodes<'a> {
    slots: Enumerate<slice::Iter<'a, bool>>,
    remaining: usize,
}

impl Iterator for Nodes<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        for (index, &present) in self.slots.by_ref() {
            if present {
                self.remaining -= 1;
                return Some(NodeId(index));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Nodes<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(n: usize) -> Graph {
        let edges: Vec<(usize, usize)> = (1..n).map(|i| (i - 1, i)).collect();
        Graph::from_edges(n, &edges).unwrap()
    }

    #[test]
    fn add_edge_is_undirected() {
        let mut graph = Graph::with_nodes(3);
        graph.add_edge(NodeId(0), NodeId(2)).unwrap();
        assert!(graph.contains_edge(NodeId(0), NodeId(2)));
        assert!(graph.contains_edge(NodeId(2), NodeId(0)));
        assert_eq!(graph.degree(NodeId(0)), 1);
        assert_eq!(graph.degree(NodeId(1)), 0);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn add_edge_rejects_invalid_edges() {
        let mut graph = Graph::with_nodes(2);
        assert!(matches!(
            graph.add_edge(NodeId(0), NodeId(0)),
            Err(NetSirError::CannotMakeEdgeToSelf)
        ));
        assert!(matches!(
            graph.add_edge(NodeId(0), NodeId(5)),
            Err(NetSirError::UnknownNode(NodeId(5)))
        ));
        graph.add_edge(NodeId(0), NodeId(1)).unwrap();
        assert!(matches!(
            graph.add_edge(NodeId(1), NodeId(0)),
            Err(NetSirError::EdgeAlreadyExists)
        ));
    }

    #[test]
    fn remove_node_deletes_incident_edges() {
        let mut graph = path(4);
        graph.remove_node(NodeId(1)).unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.capacity(), 4);
        assert_eq!(graph.edge_count(), 1);
        assert!(!graph.contains_node(NodeId(1)));
        assert_eq!(graph.degree(NodeId(0)), 0);
        assert_eq!(graph.neighbors(NodeId(2)), &[NodeId(3)]);
        assert_eq!(
            graph.nodes().collect::<Vec<_>>(),
            vec![NodeId(0), NodeId(2), NodeId(3)]
        );
        assert!(matches!(
            graph.remove_node(NodeId(1)),
            Err(NetSirError::UnknownNode(_))
        ));
    }

    #[test]
    fn nodes_is_exact_size() {
        let mut graph = Graph::with_nodes(5);
        graph.remove_node(NodeId(3)).unwrap();
        let mut nodes = graph.nodes();
        assert_eq!(nodes.len(), 4);
        nodes.next();
        assert_eq!(nodes.len(), 3);
        assert_eq!(graph.nodes().nth(3), Some(NodeId(4)));
    }

    #[test]
    fn edges_are_listed_once() {
        let graph = Graph::from_edges(3, &[(0, 1), (1, 2), (2, 0)]).unwrap();
        let mut edges: Vec<_> = graph.edges().collect();
        edges.sort();
        assert_eq!(
            edges,
            vec![
                (NodeId(0), NodeId(1)),
                (NodeId(0), NodeId(2)),
                (NodeId(1), NodeId(2))
            ]
        );
    }
}
