//! Breadth-first traversals over a [`Graph`]: connected components and shortest-path
//! distances. Edges are unweighted, so BFS gives exact shortest paths.

use std::collections::VecDeque;

use crate::network::{Graph, NodeId};

const UNVISITED: usize = usize::MAX;

/// A connected component. Members are kept in increasing id order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Component {
    members: Vec<NodeId>,
}

impl Component {
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub fn members(&self) -> &[NodeId] {
        &self.members
    }

    /// The smallest node id in the component.
    #[must_use]
    pub fn min_member(&self) -> Option<NodeId> {
        self.members.first().copied()
    }
}

/// Enumerates the connected components of `graph`, ordered by their smallest member.
#[must_use]
pub fn connected_components(graph: &Graph) -> Vec<Component> {
    let mut visited = vec![false; graph.capacity()];
    let mut queue = VecDeque::new();
    let mut components = Vec::new();

    for start in graph.nodes() {
        if visited[start.0] {
            continue;
        }
        visited[start.0] = true;
        queue.push_back(start);
        let mut members = Vec::new();

        while let Some(node) = queue.pop_front() {
            members.push(node);
            for &neighbor in graph.neighbors(node) {
                if !visited[neighbor.0] {
                    visited[neighbor.0] = true;
                    queue.push_back(neighbor);
                }
            }
        }

        members.sort_unstable();
        components.push(Component { members });
    }

    components
}

/// Shortest-path distances (in hops) from `source` to every node id of the graph. Entries for
/// unreachable or removed nodes are `None`.
#[must_use]
pub fn bfs_distances(graph: &Graph, source: NodeId) -> Vec<Option<usize>> {
    let mut search = BreadthFirstSearch::new(graph.capacity());
    search.run(graph, source, |_, _| {});
    search
        .distances
        .into_iter()
        .map(|d| (d != UNVISITED).then_some(d))
        .collect()
}

/// Reusable buffers for repeated breadth-first searches over the same graph.
pub(crate) struct BreadthFirstSearch {
    distances: Vec<usize>,
    touched: Vec<NodeId>,
    queue: VecDeque<NodeId>,
}

impl BreadthFirstSearch {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            distances: vec![UNVISITED; capacity],
            touched: Vec::new(),
            queue: VecDeque::new(),
        }
    }

    /// Visits every node reachable from `source` (including `source` at distance 0) in
    /// non-decreasing distance order.
    pub(crate) fn run(
        &mut self,
        graph: &Graph,
        source: NodeId,
        mut visit: impl FnMut(NodeId, usize),
    ) {
        // Reset only what the previous search touched
        for node in self.touched.drain(..) {
            self.distances[node.0] = UNVISITED;
        }
        if !graph.contains_node(source) {
            return;
        }

        self.distances[source.0] = 0;
        self.touched.push(source);
        self.queue.push_back(source);

        while let Some(node) = self.queue.pop_front() {
            let distance = self.distances[node.0];
            visit(node, distance);
            for &neighbor in graph.neighbors(node) {
                if self.distances[neighbor.0] == UNVISITED {
                    self.distances[neighbor.0] = distance + 1;
                    self.touched.push(neighbor);
                    self.queue.push_back(neighbor);
                }
            }
        }
    }
}
