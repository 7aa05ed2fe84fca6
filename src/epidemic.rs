//! Scalar summaries of an epidemic trajectory.

use serde::Serialize;

use crate::sir::Trajectory;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EpidemicFeatures {
    /// Largest number of simultaneously infected nodes.
    pub peak: usize,
    /// First step at which `peak` is reached.
    pub t_peak: usize,
    /// Last step with at least one infected node, 0 if there is none.
    pub duration: usize,
    /// Nodes ever infected: final infected plus final recovered.
    pub total_infected: usize,
}

/// Reduces `trajectory` to its [`EpidemicFeatures`]. An empty trajectory yields all zeros.
#[must_use]
pub fn epidemic_features(trajectory: &Trajectory) -> EpidemicFeatures {
    let mut features = EpidemicFeatures::default();
    for row in trajectory.rows() {
        if row.infected > features.peak {
            features.peak = row.infected;
            features.t_peak = row.step;
        }
        if row.infected > 0 {
            features.duration = row.step;
        }
    }
    if let Some(last) = trajectory.last() {
        features.total_infected = last.infected + last.recovered;
    }
    features
}
