//! The sweep/averaging driver.
//!
//! A sweep samples `num_points` evenly spaced removal fractions in `[0, max_rate]`. For each
//! repetition it clones the network once and removes nodes incrementally, stopping at every
//! sampled removal count to measure the requested metrics: structural features of the current
//! state, or the features of one SIR run on it. Results are aggregated per point over the
//! repetitions as a mean and a (population) standard deviation.
//!
//! Repetition `r` draws its removals from stream `(RemovalRng, r)` and the epidemic at point
//! `k` from stream `(EpidemicRng, k << 32 | r)`. Because every repetition owns its streams,
//! repetitions run in parallel on the current rayon pool and results do not depend on the
//! number of threads.

use std::fmt::{self, Display};

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoStaticStr};

use crate::epidemic::{epidemic_features, EpidemicFeatures};
use crate::error::NetSirError;
use crate::network::Graph;
use crate::random::{EpidemicRng, RandomStreams, RemovalRng};
use crate::removal::{remove_nodes, RemovalPolicy};
use crate::sir::{simulate, SirParameters};
use crate::structure::{structural_features, StructuralFeatures};

/// Whether a sweep measures the network itself or an epidemic spreading on it.
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    Structural,
    Epidemic,
}

impl Mode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scalar measured at every sweep point.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Metric {
    Diameter,
    GiantSize,
    MeanOtherSize,
    MeanPathLength,
    Peak,
    TPeak,
    Duration,
    TotalInfected,
}

impl Metric {
    #[must_use]
    pub fn mode(self) -> Mode {
        match self {
            Metric::Diameter
            | Metric::GiantSize
            | Metric::MeanOtherSize
            | Metric::MeanPathLength => Mode::Structural,
            Metric::Peak | Metric::TPeak | Metric::Duration | Metric::TotalInfected => {
                Mode::Epidemic
            }
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Human-readable name used in reports.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Metric::Diameter => "Diameter",
            Metric::GiantSize => "S (giant component size)",
            Metric::MeanOtherSize => "<s> (mean size of the other components)",
            Metric::MeanPathLength => "Mean shortest path length",
            Metric::Peak => "Infection peak",
            Metric::TPeak => "t_peak",
            Metric::Duration => "Epidemic duration",
            Metric::TotalInfected => "Total infected cases",
        }
    }

    /// Reads this metric from a measurement, or `None` if the measurement is of the other mode.
    fn value(self, measurement: &Measurement) -> Option<f64> {
        match (self, measurement) {
            (Metric::Diameter, Measurement::Structure(f)) => Some(f.diameter as f64),
            (Metric::GiantSize, Measurement::Structure(f)) => Some(f.giant_size as f64),
            (Metric::MeanOtherSize, Measurement::Structure(f)) => Some(f.mean_other_size),
            (Metric::MeanPathLength, Measurement::Structure(f)) => Some(f.mean_path_length),
            (Metric::Peak, Measurement::Epidemic(f)) => Some(f.peak as f64),
            (Metric::TPeak, Measurement::Epidemic(f)) => Some(f.t_peak as f64),
            (Metric::Duration, Measurement::Epidemic(f)) => Some(f.duration as f64),
            (Metric::TotalInfected, Measurement::Epidemic(f)) => Some(f.total_infected as f64),
            (
                Metric::Diameter
                | Metric::GiantSize
                | Metric::MeanOtherSize
                | Metric::MeanPathLength,
                Measurement::Epidemic(_),
            )
            | (
                Metric::Peak | Metric::TPeak | Metric::Duration | Metric::TotalInfected,
                Measurement::Structure(_),
            ) => None,
        }
    }
}

/// What is measured at one sweep point of one repetition.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Measurement {
    Structure(StructuralFeatures),
    Epidemic(EpidemicFeatures),
}

impl Measurement {
    fn mode(&self) -> Mode {
        match self {
            Measurement::Structure(_) => Mode::Structural,
            Measurement::Epidemic(_) => Mode::Epidemic,
        }
    }

    /// Reads every metric in order.
    ///
    /// # Errors
    /// Returns [`NetSirError::ConfigError`] if a metric belongs to the other mode.
    fn read(&self, metrics: &[Metric]) -> Result<Vec<f64>, NetSirError> {
        metrics
            .iter()
            .map(|&metric| {
                metric.value(self).ok_or_else(|| {
                    NetSirError::config(format!(
                        "metric {metric} is not available in {} mode",
                        self.mode()
                    ))
                })
            })
            .collect()
    }
}

impl Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Products like 0.3 * 5 land just below the half in binary; halves must still round up.
const ROUNDING_TOLERANCE: f64 = 1e-9;

/// The number of removed nodes at each sweep point.
#[derive(Clone, Debug, PartialEq)]
pub struct RemovalSchedule {
    nodes: usize,
    counts: Vec<usize>,
}

impl RemovalSchedule {
    /// Samples `num_points` evenly spaced fractions from 0 to `max_rate` inclusive (a single
    /// point sits at 0) and converts each to a node count, rounding halves up. Counts never
    /// decrease along the schedule; equal neighbouring counts are kept, so the schedule always
    /// has `num_points` entries.
    ///
    /// # Errors
    /// Returns [`NetSirError::ConfigError`] if `max_rate` is outside `[0, 1]` or `num_points`
    /// is 0.
    pub fn new(nodes: usize, max_rate: f64, num_points: usize) -> Result<Self, NetSirError> {
        if !(0.0..=1.0).contains(&max_rate) {
            return Err(NetSirError::config(format!(
                "max_rate must be in [0, 1], got {max_rate}"
            )));
        }
        if num_points == 0 {
            return Err(NetSirError::config("num_points must be positive"));
        }

        // Largest removal, in nodes, before rounding
        let span = max_rate * nodes as f64;
        let counts = (0..num_points)
            .map(|i| {
                let exact = if num_points == 1 {
                    0.0
                } else {
                    span * i as f64 / (num_points - 1) as f64
                };
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let count = (exact + 0.5 + ROUNDING_TOLERANCE).floor() as usize;
                count.min(nodes)
            })
            .collect();
        Ok(RemovalSchedule { nodes, counts })
    }

    #[must_use]
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    #[must_use]
    pub fn max_removed(&self) -> usize {
        self.counts.last().copied().unwrap_or(0)
    }

    /// Fraction of the original nodes actually removed at point `index`, or `None` past the
    /// last point.
    #[must_use]
    pub fn fraction(&self, index: usize) -> Option<f64> {
        self.counts.get(index).map(|&count| self.realized(count))
    }

    /// Realized removal fractions, one per point.
    pub fn fractions(&self) -> impl Iterator<Item = f64> + '_ {
        self.counts.iter().map(|&count| self.realized(count))
    }

    fn realized(&self, count: usize) -> f64 {
        if self.nodes == 0 {
            0.0
        } else {
            count as f64 / self.nodes as f64
        }
    }
}

/// Mean and population standard deviation of a set of samples.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct Summary {
    pub mean: f64,
    pub std: f64,
}

impl Summary {
    /// Summarizes `samples`. No samples give a zero summary.
    #[must_use]
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Summary::default();
        }
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        Summary {
            mean,
            std: variance.sqrt(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct CurvePoint {
    pub fraction: f64,
    pub removed: usize,
    pub value: Summary,
}

/// One metric along the removal axis for one network and policy.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Curve {
    pub network: String,
    pub policy: RemovalPolicy,
    pub metric: Metric,
    pub points: Vec<CurvePoint>,
}

/// What a sweep measures and how often.
#[derive(Clone, Debug, PartialEq)]
pub struct SweepSettings {
    pub mode: Mode,
    pub metrics: Vec<Metric>,
    pub max_rate: f64,
    pub num_points: usize,
    /// Repetitions per point for stochastic sweeps.
    pub repetitions: usize,
    /// Required in epidemic mode.
    pub sir: Option<SirParameters>,
}

impl SweepSettings {
    /// Repetitions actually needed for `policy`. A structural sweep under a deterministic
    /// policy gives the same result every time, so it runs once.
    #[must_use]
    pub fn repetitions_for(&self, policy: RemovalPolicy) -> usize {
        match self.mode {
            Mode::Structural if !policy.is_stochastic() => 1,
            _ => self.repetitions,
        }
    }

    /// Checks the settings against the network they will run on.
    ///
    /// # Errors
    /// Returns [`NetSirError::ConfigError`] describing the first problem found.
    pub fn validate_for(&self, graph: &Graph) -> Result<(), NetSirError> {
        let schedule = RemovalSchedule::new(graph.node_count(), self.max_rate, self.num_points)?;
        self.validate(graph, &schedule)
    }

    fn validate(&self, graph: &Graph, schedule: &RemovalSchedule) -> Result<(), NetSirError> {
        if self.repetitions == 0 {
            return Err(NetSirError::config("num_sim must be positive"));
        }
        if self.metrics.is_empty() {
            return Err(NetSirError::config("no metric requested"));
        }
        if let Some(metric) = self.metrics.iter().find(|m| m.mode() != self.mode) {
            return Err(NetSirError::config(format!(
                "metric {metric} is not available in {} mode",
                self.mode
            )));
        }
        if self.mode == Mode::Epidemic {
            let Some(sir) = self.sir else {
                return Err(NetSirError::config(
                    "epidemic sweeps need SIR parameters",
                ));
            };
            sir.validate()?;
            let smallest = graph.node_count() - schedule.max_removed();
            if sir.initial_infected > smallest {
                return Err(NetSirError::config(format!(
                    "cannot infect {} nodes at step 0: only {smallest} nodes remain at the last \
                     sweep point",
                    sir.initial_infected
                )));
            }
        }
        Ok(())
    }
}

/// Runs one sweep of `graph` under `policy` and returns one curve per requested metric, in
/// the order the metrics were requested.
///
/// # Errors
/// Returns [`NetSirError::ConfigError`] if the settings are invalid for this graph. Nothing
/// is simulated in that case.
pub fn run_sweep(
    label: &str,
    graph: &Graph,
    policy: RemovalPolicy,
    settings: &SweepSettings,
    streams: &RandomStreams,
) -> Result<Vec<Curve>, NetSirError> {
    let schedule =
        RemovalSchedule::new(graph.node_count(), settings.max_rate, settings.num_points)?;
    settings.validate(graph, &schedule)?;

    let repetitions = settings.repetitions_for(policy);
    debug!(
        "{label}/{policy}: {} points, {repetitions} repetitions, removal counts {:?}",
        schedule.len(),
        schedule.counts()
    );

    // samples[r][k][m]: repetition r, point k, metric m
    let samples: Vec<Vec<Vec<f64>>> = (0..repetitions)
        .into_par_iter()
        .map(|repetition| run_repetition(graph, policy, settings, &schedule, streams, repetition))
        .collect::<Result<_, _>>()?;

    let curves = settings
        .metrics
        .iter()
        .enumerate()
        .map(|(m, &metric)| {
            let points = schedule
                .counts()
                .iter()
                .zip(schedule.fractions())
                .enumerate()
                .map(|(k, (&removed, fraction))| {
                    let values: Vec<f64> = samples.iter().map(|rep| rep[k][m]).collect();
                    CurvePoint {
                        fraction,
                        removed,
                        value: Summary::from_samples(&values),
                    }
                })
                .collect();
            Curve {
                network: label.to_string(),
                policy,
                metric,
                points,
            }
        })
        .collect();

    Ok(curves)
}

fn run_repetition(
    graph: &Graph,
    policy: RemovalPolicy,
    settings: &SweepSettings,
    schedule: &RemovalSchedule,
    streams: &RandomStreams,
    repetition: usize,
) -> Result<Vec<Vec<f64>>, NetSirError> {
    let mut graph = graph.clone();
    let mut removal_rng = streams.stream(RemovalRng, repetition as u64);
    let mut removed = 0;
    let mut values = Vec::with_capacity(schedule.len());

    for (point, &target) in schedule.counts().iter().enumerate() {
        remove_nodes(&mut graph, policy, target - removed, &mut removal_rng)?;
        removed = target;

        let measurement = match (settings.mode, settings.sir) {
            (Mode::Structural, _) => Measurement::Structure(structural_features(&graph)),
            (Mode::Epidemic, Some(sir)) => {
                let index = ((point as u64) << 32) | repetition as u64;
                let mut rng = streams.stream(EpidemicRng, index);
                Measurement::Epidemic(epidemic_features(&simulate(&graph, sir, &mut rng)?))
            }
            (Mode::Epidemic, None) => {
                return Err(NetSirError::config("epidemic sweeps need SIR parameters"))
            }
        };
        let row = measurement.read(&settings.metrics)?;
        values.push(row);
    }

    Ok(values)
}
