//! Structural features of a graph state: how connected the network still is after a number of
//! removals.

use serde::Serialize;

use crate::network::{connected_components, BreadthFirstSearch, Graph};

/// Features of one graph state.
///
/// `diameter` is measured over the giant component only. `mean_path_length` averages the
/// shortest path length over every ordered pair of distinct nodes that can reach each other,
/// in any component.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct StructuralFeatures {
    pub diameter: usize,
    pub giant_size: usize,
    pub mean_other_size: f64,
    pub mean_path_length: f64,
}

/// Computes the [`StructuralFeatures`] of `graph`. The empty graph yields all zeros.
#[must_use]
pub fn structural_features(graph: &Graph) -> StructuralFeatures {
    let components = connected_components(graph);

    if components.is_empty() {
        return StructuralFeatures::default();
    }

    // Components come ordered by smallest member, so keeping the first of the largest ones
    // breaks size ties towards the lowest id.
    let mut giant_index = 0;
    for (index, component) in components.iter().enumerate() {
        if component.len() > components[giant_index].len() {
            giant_index = index;
        }
    }
    let giant = &components[giant_index];

    let others = components.len() - 1;
    let mean_other_size = if others == 0 {
        0.0
    } else {
        let total: usize = components
            .iter()
            .enumerate()
            .filter(|&(index, _)| index != giant_index)
            .map(|(_, component)| component.len())
            .sum();
        total as f64 / others as f64
    };

    let mut in_giant = vec![false; graph.capacity()];
    for node in giant.members() {
        in_giant[node.index()] = true;
    }

    let mut search = BreadthFirstSearch::new(graph.capacity());
    let mut diameter = 0;
    let mut path_length_sum: u64 = 0;
    let mut reachable_pairs: u64 = 0;
    for source in graph.nodes() {
        let mut eccentricity = 0;
        search.run(graph, source, |_, distance| {
            if distance > 0 {
                path_length_sum += distance as u64;
                reachable_pairs += 1;
            }
            eccentricity = distance;
        });
        if in_giant[source.index()] {
            diameter = diameter.max(eccentricity);
        }
    }

    let mean_path_length = if reachable_pairs == 0 {
        0.0
    } else {
        path_length_sum as f64 / reachable_pairs as f64
    };

    StructuralFeatures {
        diameter,
        giant_size: giant.len(),
        mean_other_size,
        mean_path_length,
    }
}

/// Fraction of live nodes having each degree; entry `k` is P(degree = k). Empty for the empty
/// graph.
#[must_use]
pub fn degree_distribution(graph: &Graph) -> Vec<f64> {
    let mut counts: Vec<usize> = Vec::new();
    for node in graph.nodes() {
        let degree = graph.degree(node);
        if degree >= counts.len() {
            counts.resize(degree + 1, 0);
        }
        counts[degree] += 1;
    }
    let total = graph.node_count() as f64;
    counts.into_iter().map(|count| count as f64 / total).collect()
}

/// Average degree over the live nodes, 0 for the empty graph.
#[must_use]
pub fn mean_degree(graph: &Graph) -> f64 {
    if graph.is_empty() {
        return 0.0;
    }
    (2 * graph.edge_count()) as f64 / graph.node_count() as f64
}
