//! A module for modeling undirected contact networks.
//!
//! A network is a simple undirected graph (no self-loops, no parallel edges) over an arena of
//! stable integer node ids. Removing a node tombstones its slot and deletes its incident edges;
//! ids of the remaining nodes never change, so features computed on successive states of the
//! same graph refer to the same nodes.
//!
//! The [`Graph`] type is the capability the rest of the crate relies on: degree queries,
//! neighbor iteration, node removal, connected-component enumeration and shortest-path
//! (breadth-first) distances.

mod network;
mod traversal;

use std::fmt::{self, Display};

pub use network::{Graph, Nodes};
pub(crate) use traversal::BreadthFirstSearch;
pub use traversal::{bfs_distances, connected_components, Component};

/// Identifier of a node. Ids are dense indices into the graph's arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for NodeId {
    fn from(value: usize) -> Self {
        NodeId(value)
    }
}
