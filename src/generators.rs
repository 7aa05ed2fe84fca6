//! Random network generators.
//!
//! * [`erdos_renyi`]: every pair of nodes is linked independently with probability `p`.
//! * [`barabasi_albert`]: preferential attachment, each new node bringing `m` edges.
//! * [`scale_free`]: Barabási–Albert with `m = floor(N p / 2)`, so that its mean degree is
//!   close to that of an Erdős–Rényi graph with the same `N` and `p`.
//!
//! [`generate`] dispatches on a [`NetworkKind`] and draws every graph from its own named random
//! stream, so the ER graph of an `ER_SF` comparison is the same graph `ER` alone would produce.

use std::fmt::{self, Display};

use indexmap::IndexSet;
use log::debug;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoStaticStr};

use crate::error::NetSirError;
use crate::network::{Graph, NodeId};
use crate::rand::Rng;
use crate::random::{GraphRng, RandomStreams};
use crate::structure::mean_degree;

/// The networks an experiment can run on.
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
    IntoStaticStr,
    clap::ValueEnum,
)]
pub enum NetworkKind {
    #[serde(rename = "ER")]
    #[strum(serialize = "ER")]
    #[value(name = "ER")]
    ErdosRenyi,
    #[serde(rename = "SF")]
    #[strum(serialize = "SF")]
    #[value(name = "SF")]
    ScaleFree,
    /// An Erdős–Rényi and a scale-free graph with the same parameters, compared side by side.
    #[serde(rename = "ER_SF")]
    #[strum(serialize = "ER_SF")]
    #[value(name = "ER_SF")]
    ErdosRenyiScaleFree,
    /// The airport route network, loaded from a dataset.
    #[serde(rename = "airports")]
    #[strum(serialize = "airports")]
    #[value(name = "airports")]
    Airports,
}

impl NetworkKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl Display for NetworkKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A graph together with the label it is reported under.
#[derive(Clone, Debug)]
pub struct LabeledNetwork {
    pub label: &'static str,
    pub graph: Graph,
}

/// Parameters shared by the random generators.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeneratorParams {
    pub nodes: usize,
    pub p: f64,
}

impl GeneratorParams {
    /// # Errors
    /// Returns [`NetSirError::ConfigError`] if `nodes` is 0 or `p` is outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), NetSirError> {
        if self.nodes == 0 {
            return Err(NetSirError::config("N must be positive"));
        }
        if !(0.0..=1.0).contains(&self.p) {
            return Err(NetSirError::config(format!(
                "p must be in [0, 1], got {}",
                self.p
            )));
        }
        Ok(())
    }

    /// Edges each new node brings in the scale-free model.
    #[must_use]
    pub fn attachment_count(&self) -> usize {
        // Truncation towards zero
        (self.nodes as f64 * self.p / 2.0) as usize
    }
}

/// Builds a G(N, p) random graph: each of the N(N-1)/2 pairs is linked independently with
/// probability `p`.
///
/// # Errors
/// Returns [`NetSirError::ConfigError`] if `p` is outside `[0, 1]`.
pub fn erdos_renyi<R: Rng>(nodes: usize, p: f64, rng: &mut R) -> Result<Graph, NetSirError> {
    if !(0.0..=1.0).contains(&p) {
        return Err(NetSirError::config(format!("p must be in [0, 1], got {p}")));
    }
    let mut graph = Graph::with_nodes(nodes);
    for a in 0..nodes {
        for b in a + 1..nodes {
            if rng.random_bool(p) {
                graph.add_edge(NodeId(a), NodeId(b))?;
            }
        }
    }
    Ok(graph)
}

/// Builds a Barabási–Albert preferential attachment graph.
///
/// The graph starts as a star over `m + 1` nodes. Every further node links to `m` distinct
/// existing nodes, each chosen with probability proportional to its current degree.
///
/// # Errors
/// Returns [`NetSirError::ConfigError`] unless `1 <= m < nodes`.
pub fn barabasi_albert<R: Rng>(nodes: usize, m: usize, rng: &mut R) -> Result<Graph, NetSirError> {
    if m < 1 || m >= nodes {
        return Err(NetSirError::config(format!(
            "scale-free attachment count must satisfy 1 <= m < N, got m = {m}, N = {nodes}"
        )));
    }

    let mut graph = Graph::with_nodes(nodes);
    // Every node appears here once per incident edge, so a uniform draw from this list picks
    // a node with probability proportional to its degree.
    let mut repeated_nodes: Vec<NodeId> = Vec::with_capacity(2 * m * nodes);
    for leaf in 1..=m {
        graph.add_edge(NodeId(0), NodeId(leaf))?;
        repeated_nodes.push(NodeId(0));
        repeated_nodes.push(NodeId(leaf));
    }

    let mut targets: IndexSet<NodeId> = IndexSet::with_capacity(m);
    for source in m + 1..nodes {
        targets.clear();
        while targets.len() < m {
            targets.insert(repeated_nodes[rng.random_range(0..repeated_nodes.len())]);
        }
        for &target in &targets {
            graph.add_edge(NodeId(source), target)?;
            repeated_nodes.push(target);
        }
        repeated_nodes.extend(std::iter::repeat(NodeId(source)).take(m));
    }

    Ok(graph)
}

/// Builds the scale-free counterpart of a G(N, p) graph.
///
/// # Errors
/// Returns [`NetSirError::ConfigError`] if the parameters are invalid or give an attachment
/// count below 1.
pub fn scale_free<R: Rng>(params: &GeneratorParams, rng: &mut R) -> Result<Graph, NetSirError> {
    params.validate()?;
    barabasi_albert(params.nodes, params.attachment_count(), rng)
}

/// Generates the networks for `kind`. `ER_SF` yields two networks, labelled `ER` and `SF`.
///
/// # Errors
/// Returns [`NetSirError::ConfigError`] for invalid parameters, and for
/// [`NetworkKind::Airports`], which is loaded with [`crate::airports`] rather than generated.
pub fn generate(
    kind: NetworkKind,
    params: &GeneratorParams,
    streams: &RandomStreams,
) -> Result<Vec<LabeledNetwork>, NetSirError> {
    params.validate()?;
    let networks = match kind {
        NetworkKind::ErdosRenyi => vec![generate_erdos_renyi(params, streams)?],
        NetworkKind::ScaleFree => vec![generate_scale_free(params, streams)?],
        NetworkKind::ErdosRenyiScaleFree => vec![
            generate_erdos_renyi(params, streams)?,
            generate_scale_free(params, streams)?,
        ],
        NetworkKind::Airports => {
            return Err(NetSirError::config(
                "the airports network is loaded from a route dataset, not generated",
            ))
        }
    };

    for network in &networks {
        debug!(
            "generated {} network: {} nodes, {} edges, mean degree {:.3}",
            network.label,
            network.graph.node_count(),
            network.graph.edge_count(),
            mean_degree(&network.graph)
        );
    }
    Ok(networks)
}

fn generate_erdos_renyi(
    params: &GeneratorParams,
    streams: &RandomStreams,
) -> Result<LabeledNetwork, NetSirError> {
    let mut rng = streams.stream(GraphRng, 0);
    Ok(LabeledNetwork {
        label: NetworkKind::ErdosRenyi.as_str(),
        graph: erdos_renyi(params.nodes, params.p, &mut rng)?,
    })
}

fn generate_scale_free(
    params: &GeneratorParams,
    streams: &RandomStreams,
) -> Result<LabeledNetwork, NetSirError> {
    let mut rng = streams.stream(GraphRng, 1);
    Ok(LabeledNetwork {
        label: NetworkKind::ScaleFree.as_str(),
        graph: scale_free(params, &mut rng)?,
    })
}
