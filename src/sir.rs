//! Discrete-time stochastic SIR epidemic on a contact network.
//!
//! Every step is a synchronous update computed from the state at the start of the step:
//!
//! 1. each infected node tries to infect each of its susceptible neighbors, independently with
//!    probability `mu` (one trial per edge; a node reached through several edges is infected
//!    once);
//! 2. each infected node recovers with probability `nu`;
//! 3. both sets of changes are applied together, so a node infected during a step cannot also
//!    recover or transmit during that step.
//!
//! The run stops as soon as nobody is infected or the step budget is spent.

use indexmap::IndexSet;
use log::trace;
use serde::{Deserialize, Serialize};

use crate::error::NetSirError;
use crate::network::{Graph, NodeId};
use crate::rand::Rng;
use crate::random::sample_multiple_from_known_length;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InfectionStatus {
    Susceptible,
    Infected,
    Recovered,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SirParameters {
    /// Per-step transmission probability along an edge.
    pub mu: f64,
    /// Per-step recovery probability.
    pub nu: f64,
    /// Step budget.
    pub steps: usize,
    /// Number of nodes infected at step 0.
    pub initial_infected: usize,
}

impl SirParameters {
    /// # Errors
    /// Returns [`NetSirError::ConfigError`] if a probability is outside `[0, 1]` or the step
    /// budget is 0.
    pub fn validate(&self) -> Result<(), NetSirError> {
        for (name, value) in [("mu", self.mu), ("nu", self.nu)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(NetSirError::config(format!(
                    "{name} must be in [0, 1], got {value}"
                )));
            }
        }
        if self.steps == 0 {
            return Err(NetSirError::config("steps must be positive"));
        }
        Ok(())
    }
}

/// Compartment counts at one step.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TrajectoryRow {
    pub step: usize,
    pub susceptible: usize,
    pub infected: usize,
    pub recovered: usize,
}

/// Compartment counts from step 0 (the initial condition) to the last step taken.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Trajectory {
    rows: Vec<TrajectoryRow>,
}

impl Trajectory {
    #[must_use]
    pub fn rows(&self) -> &[TrajectoryRow] {
        &self.rows
    }

    /// Number of recorded steps, including step 0.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&TrajectoryRow> {
        self.rows.last()
    }

    pub fn infected_counts(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.iter().map(|row| row.infected)
    }

    fn push(&mut self, row: TrajectoryRow) {
        self.rows.push(row);
    }
}

impl From<Vec<TrajectoryRow>> for Trajectory {
    fn from(rows: Vec<TrajectoryRow>) -> Self {
        Trajectory { rows }
    }
}

/// One epidemic run on a graph snapshot.
pub struct SirModel<'a, R> {
    graph: &'a Graph,
    parameters: SirParameters,
    rng: R,
    status: Vec<InfectionStatus>,
    infected: IndexSet<NodeId>,
    recovered: usize,
    step: usize,
}

impl<'a, R: Rng> SirModel<'a, R> {
    /// Sets up a run with `parameters.initial_infected` distinct nodes, drawn uniformly from the
    /// live nodes of `graph`, infected at step 0.
    ///
    /// # Errors
    /// Returns [`NetSirError::ConfigError`] if the parameters are invalid or more initial
    /// infections are requested than the graph has nodes.
    pub fn new(
        graph: &'a Graph,
        parameters: SirParameters,
        mut rng: R,
    ) -> Result<Self, NetSirError> {
        parameters.validate()?;
        if parameters.initial_infected > graph.node_count() {
            return Err(NetSirError::config(format!(
                "cannot infect {} nodes at step 0, the graph has only {}",
                parameters.initial_infected,
                graph.node_count()
            )));
        }

        let mut status = vec![InfectionStatus::Susceptible; graph.capacity()];
        let mut infected = IndexSet::with_capacity(graph.node_count());
        for node in
            sample_multiple_from_known_length(&mut rng, graph.nodes(), parameters.initial_infected)
        {
            status[node.index()] = InfectionStatus::Infected;
            infected.insert(node);
        }

        Ok(SirModel {
            graph,
            parameters,
            rng,
            status,
            infected,
            recovered: 0,
            step: 0,
        })
    }

    /// Status of a node in the current state. Nodes not in the graph report `Susceptible`.
    #[must_use]
    pub fn status(&self, node: NodeId) -> InfectionStatus {
        self.status
            .get(node.index())
            .copied()
            .unwrap_or(InfectionStatus::Susceptible)
    }

    #[must_use]
    pub fn current_step(&self) -> usize {
        self.step
    }

    #[must_use]
    pub fn counts(&self) -> TrajectoryRow {
        TrajectoryRow {
            step: self.step,
            susceptible: self.graph.node_count() - self.infected.len() - self.recovered,
            infected: self.infected.len(),
            recovered: self.recovered,
        }
    }

    /// Whether another step would be taken by [`SirModel::run`].
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.infected.is_empty() && self.step < self.parameters.steps
    }

    /// Advances the epidemic by one synchronous step and returns the new counts.
    pub fn step(&mut self) -> TrajectoryRow {
        let snapshot: Vec<NodeId> = self.infected.iter().copied().collect();

        let mut newly_infected: IndexSet<NodeId> = IndexSet::new();
        for &node in &snapshot {
            for &neighbor in self.graph.neighbors(node) {
                if self.status[neighbor.index()] == InfectionStatus::Susceptible
                    && self.rng.random_bool(self.parameters.mu)
                {
                    newly_infected.insert(neighbor);
                }
            }
        }

        let recovering: Vec<NodeId> = snapshot
            .into_iter()
            .filter(|_| self.rng.random_bool(self.parameters.nu))
            .collect();

        for node in recovering {
            self.status[node.index()] = InfectionStatus::Recovered;
            self.infected.swap_remove(&node);
            self.recovered += 1;
        }
        for node in newly_infected {
            self.status[node.index()] = InfectionStatus::Infected;
            self.infected.insert(node);
        }

        self.step += 1;
        let row = self.counts();
        trace!(
            "SIR step {}: S={} I={} R={}",
            row.step,
            row.susceptible,
            row.infected,
            row.recovered
        );
        row
    }

    /// Runs until no node is infected or the step budget is spent.
    pub fn run(mut self) -> Trajectory {
        let mut trajectory = Trajectory::default();
        trajectory.push(self.counts());
        while self.is_active() {
            let row = self.step();
            trajectory.push(row);
        }
        trajectory
    }
}

/// Runs one epidemic on `graph` and returns its trajectory.
///
/// # Errors
/// See [`SirModel::new`].
pub fn simulate<R: Rng>(
    graph: &Graph,
    parameters: SirParameters,
    rng: &mut R,
) -> Result<Trajectory, NetSirError> {
    Ok(SirModel::new(graph, parameters, rng)?.run())
}
