//! Error and attack tolerance of complex networks.
//!
//! `netsir` builds random networks (Erdős–Rényi, Barabási–Albert scale-free) or loads the
//! OpenFlights airport network, then removes nodes from them in two ways:
//! * *error*: a uniformly random surviving node at each step.
//! * *attack*: the surviving node of highest degree at each step.
//!
//! Along the removal sweep it measures either structural features of the remaining network
//! (diameter, mean shortest path length, giant component size, mean size of the other
//! components) or features of a discrete-time SIR epidemic spreading on it (peak prevalence,
//! time of the peak, duration, final size). Each point of a sweep is the mean and standard
//! deviation over independent repetitions, which run in parallel.
//!
//! The crate is organized as follows:
//! * [`network`] holds the undirected [`Graph`] and its traversals.
//! * [`generators`] and [`airports`] produce the networks.
//! * [`removal`], [`structure`], [`sir`] and [`epidemic`] are the building blocks of a sweep.
//! * [`sweep`] averages features along a removal schedule, and [`experiment`] runs the sweeps
//!   a [`SimulationConfig`] describes.
//! * [`report`] and [`runner`] write the results and drive everything from the command line.
//!
//! All randomness flows through [`random::RandomStreams`], so a run is fully determined by its
//! configuration and seed regardless of the number of worker threads.
pub mod airports;
pub mod config;
pub mod epidemic;
pub mod error;
pub mod experiment;
pub mod generators;
pub mod hashing;
pub mod log;
pub mod network;
pub mod random;
pub mod removal;
pub mod report;
pub mod runner;
pub mod sir;
pub mod structure;
pub mod sweep;

pub use config::{Feature, SimulationConfig};
pub use epidemic::{epidemic_features, EpidemicFeatures};
pub use error::NetSirError;
pub use experiment::run_experiment;
pub use generators::{generate, GeneratorParams, LabeledNetwork, NetworkKind};
pub use hashing::{HashMap, HashSet};
pub use network::{Graph, NodeId};
// Re-export for use in the define_rng! macro and by callers that sample directly.
pub use rand;
pub use random::RandomStreams;
pub use removal::RemovalPolicy;
pub use runner::run_with_args;
pub use sir::{simulate, SirParameters, Trajectory};
pub use structure::{structural_features, StructuralFeatures};
pub use sweep::{run_sweep, Curve, Metric, Mode, SweepSettings};
