//! The removal process: deletes nodes one at a time according to an error or attack policy.

use std::fmt::{self, Display};

use log::trace;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};

use crate::error::NetSirError;
use crate::network::{Graph, NodeId};
use crate::rand::Rng;
use crate::random::sample_single_from_known_length;

/// How the next node to remove is chosen.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RemovalPolicy {
    /// A node chosen uniformly at random among the remaining ones.
    Error,
    /// The remaining node of highest current degree. Ties go to the lowest id.
    Attack,
}

impl RemovalPolicy {
    /// Whether the policy consumes random draws. Deterministic policies need a single
    /// repetition per sweep point.
    #[must_use]
    pub fn is_stochastic(self) -> bool {
        matches!(self, RemovalPolicy::Error)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl Display for RemovalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The remaining node with maximal degree, lowest id first among ties.
#[must_use]
pub fn highest_degree_node(graph: &Graph) -> Option<NodeId> {
    let mut best: Option<(NodeId, usize)> = None;
    for node in graph.nodes() {
        let degree = graph.degree(node);
        match best {
            Some((_, best_degree)) if degree <= best_degree => {}
            _ => best = Some((node, degree)),
        }
    }
    best.map(|(node, _)| node)
}

/// Picks the next node according to `policy`, deletes it together with its incident edges and
/// returns its id.
///
/// The error policy consumes exactly one draw from `rng`; the attack policy recomputes every
/// degree on each call and never touches `rng`.
///
/// # Errors
/// Returns [`NetSirError::EmptyGraph`] if the graph has no nodes left.
pub fn remove_next<R: Rng>(
    graph: &mut Graph,
    policy: RemovalPolicy,
    rng: &mut R,
) -> Result<NodeId, NetSirError> {
    let chosen = match policy {
        RemovalPolicy::Error => sample_single_from_known_length(rng, graph.nodes()),
        RemovalPolicy::Attack => highest_degree_node(graph),
    }
    .ok_or(NetSirError::EmptyGraph)?;

    trace!(
        "{policy}: removing node {chosen} (degree {})",
        graph.degree(chosen)
    );
    graph.remove_node(chosen)?;
    Ok(chosen)
}

/// Removes `count` nodes in sequence and returns them in removal order.
///
/// # Errors
/// Returns [`NetSirError::EmptyGraph`] if the graph runs out of nodes first. Nodes removed
/// before that point stay removed.
pub fn remove_nodes<R: Rng>(
    graph: &mut Graph,
    policy: RemovalPolicy,
    count: usize,
    rng: &mut R,
) -> Result<Vec<NodeId>, NetSirError> {
    let mut removed = Vec::with_capacity(count);
    for _ in 0..count {
        removed.push(remove_next(graph, policy, rng)?);
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;

    fn star_with_tail() -> Graph {
        // 0 is the hub of a star over 0..4, 4-5-6 hang off node 3
        Graph::from_edges(7, &[(0, 1), (0, 2), (0, 3), (3, 4), (4, 5), (5, 6)]).unwrap()
    }

    #[test]
    fn attack_takes_highest_degree_lowest_id() {
        let mut graph = star_with_tail();
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(
            remove_next(&mut graph, RemovalPolicy::Attack, &mut rng).unwrap(),
            NodeId(0)
        );
        // Degrees are now 3:1, 4:2, 5:2, 6:1
        assert_eq!(
            remove_next(&mut graph, RemovalPolicy::Attack, &mut rng).unwrap(),
            NodeId(4)
        );
    }

    #[test]
    fn attack_recomputes_degrees_every_call() {
        let mut graph = star_with_tail();
        let mut rng = SmallRng::seed_from_u64(0);
        let removed = remove_nodes(&mut graph, RemovalPolicy::Attack, 7, &mut rng).unwrap();
        assert_eq!(removed.len(), 7);
        assert!(graph.is_empty());
        assert_eq!(removed[..2], [NodeId(0), NodeId(4)]);
    }

    #[test]
    fn attack_only_picks_maximal_degree() {
        let edges: Vec<(usize, usize)> = (0..30)
            .flat_map(|i| [(i, (i * 7 + 3) % 30), (i, (i * 11 + 5) % 30)])
            .filter(|(a, b)| a < b)
            .collect();
        let mut graph = Graph::with_nodes(30);
        for (a, b) in edges {
            let _ = graph.add_edge(NodeId(a), NodeId(b));
        }
        let mut rng = SmallRng::seed_from_u64(0);
        while !graph.is_empty() {
            let max_degree = graph.nodes().map(|n| graph.degree(n)).max().unwrap();
            let before = graph.clone();
            let removed = remove_next(&mut graph, RemovalPolicy::Attack, &mut rng).unwrap();
            assert_eq!(before.degree(removed), max_degree);
        }
    }

    #[test]
    fn error_removal_is_reproducible() {
        let run = |seed| {
            let mut graph = star_with_tail();
            let mut rng = SmallRng::seed_from_u64(seed);
            remove_nodes(&mut graph, RemovalPolicy::Error, 5, &mut rng).unwrap()
        };
        assert_eq!(run(3), run(3));
    }

    #[test]
    fn removes_exactly_k_nodes() {
        let mut graph = star_with_tail();
        let mut rng = SmallRng::seed_from_u64(11);
        let removed = remove_nodes(&mut graph, RemovalPolicy::Error, 4, &mut rng).unwrap();
        assert_eq!(graph.node_count(), 3);
        for node in removed {
            assert!(!graph.contains_node(node));
        }
    }

    #[test]
    fn empty_graph_is_an_error() {
        let mut graph = Graph::with_nodes(1);
        let mut rng = SmallRng::seed_from_u64(0);
        for policy in [RemovalPolicy::Error, RemovalPolicy::Attack] {
            let mut graph = graph.clone();
            remove_next(&mut graph, policy, &mut rng).unwrap();
            assert!(matches!(
                remove_next(&mut graph, policy, &mut rng),
                Err(NetSirError::EmptyGraph)
            ));
        }
        assert!(matches!(
            remove_nodes(&mut graph, RemovalPolicy::Attack, 2, &mut rng),
            Err(NetSirError::EmptyGraph)
        ));
        assert!(graph.is_empty());
    }

    #[test]
    fn policy_names() {
        assert_eq!(RemovalPolicy::Error.to_string(), "error");
        assert_eq!("attack".parse::<RemovalPolicy>().unwrap(), RemovalPolicy::Attack);
        assert!(RemovalPolicy::Error.is_stochastic());
        assert!(!RemovalPolicy::Attack.is_stochastic());
    }
}
