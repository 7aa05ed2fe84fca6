//! Simulation configuration: defaults, JSON loading and validation.
//!
//! Every field has a default, so a JSON configuration file only needs the fields it changes:
//!
//! ```json
//! { "network": "ER_SF", "mode": "epidemic", "feature": "peak", "num_sim": 20 }
//! ```

use std::fmt::{self, Display};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoStaticStr};

use crate::error::NetSirError;
use crate::generators::{GeneratorParams, NetworkKind};
use crate::sir::SirParameters;
use crate::sweep::{Metric, Mode, SweepSettings};

/// What an experiment reports. Composite features expand to several metrics.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum Feature {
    /// Diameter of the giant component and mean shortest path length.
    Connectivity,
    /// Giant component size and mean size of the other components.
    Fragmentation,
    Diameter,
    GiantSize,
    MeanOtherSize,
    MeanPathLength,
    Peak,
    TPeak,
    Duration,
    TotalInfected,
}

impl Feature {
    #[must_use]
    pub fn metrics(self) -> Vec<Metric> {
        match self {
            Feature::Connectivity => vec![Metric::Diameter, Metric::MeanPathLength],
            Feature::Fragmentation => vec![Metric::GiantSize, Metric::MeanOtherSize],
            Feature::Diameter => vec![Metric::Diameter],
            Feature::GiantSize => vec![Metric::GiantSize],
            Feature::MeanOtherSize => vec![Metric::MeanOtherSize],
            Feature::MeanPathLength => vec![Metric::MeanPathLength],
            Feature::Peak => vec![Metric::Peak],
            Feature::TPeak => vec![Metric::TPeak],
            Feature::Duration => vec![Metric::Duration],
            Feature::TotalInfected => vec![Metric::TotalInfected],
        }
    }

    #[must_use]
    pub fn mode(self) -> Mode {
        match self {
            Feature::Connectivity | Feature::Fragmentation => Mode::Structural,
            // Every other feature is a single metric
            single => single.metrics()[0].mode(),
        }
    }

    /// Feature used when none is configured.
    #[must_use]
    pub fn default_for(mode: Mode) -> Self {
        match mode {
            Mode::Structural => Feature::Connectivity,
            Mode::Epidemic => Feature::Peak,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub network: NetworkKind,
    pub mode: Mode,
    /// Defaults to `connectivity` in structural mode and `peak` in epidemic mode.
    pub feature: Option<Feature>,
    /// Number of nodes of generated networks.
    #[serde(rename = "N")]
    pub nodes: usize,
    /// Connection probability of generated networks.
    pub p: f64,
    pub seed: u64,
    /// Largest fraction of nodes removed.
    pub max_rate: f64,
    pub mu: f64,
    pub nu: f64,
    pub steps: usize,
    /// Nodes infected at step 0.
    pub infected: usize,
    /// Repetitions per sweep point.
    pub num_sim: usize,
    /// Sampled removal fractions.
    pub num_points: usize,
    /// `routes.csv` of the airport network.
    pub airports: Option<PathBuf>,
    /// Optional `airports.csv` listing valid airport ids.
    pub airport_list: Option<PathBuf>,
    /// CSV file receiving every curve.
    pub output: Option<PathBuf>,
    /// CSV file receiving the degree distribution of each network before removal.
    pub degree_distribution: Option<PathBuf>,
    /// Worker threads for the repetitions. Defaults to one per core.
    pub threads: Option<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            network: NetworkKind::ErdosRenyi,
            mode: Mode::Structural,
            feature: None,
            nodes: 100,
            p: 0.04,
            seed: 102,
            max_rate: 0.5,
            mu: 0.2,
            nu: 0.05,
            steps: 50,
            infected: 1,
            num_sim: 100,
            num_points: 15,
            airports: None,
            airport_list: None,
            output: None,
            degree_distribution: None,
            threads: None,
        }
    }
}

impl SimulationConfig {
    /// Parses a configuration from JSON. Missing fields take their default value.
    ///
    /// # Errors
    /// Returns [`NetSirError::JsonError`] if the text is not a valid configuration.
    pub fn from_json_str(text: &str) -> Result<Self, NetSirError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    /// Returns [`NetSirError::IoError`] if the file cannot be read and
    /// [`NetSirError::JsonError`] if it is not a valid configuration.
    pub fn from_json_file(path: &Path) -> Result<Self, NetSirError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    #[must_use]
    pub fn feature(&self) -> Feature {
        self.feature.unwrap_or_else(|| Feature::default_for(self.mode))
    }

    #[must_use]
    pub fn generator_params(&self) -> GeneratorParams {
        GeneratorParams {
            nodes: self.nodes,
            p: self.p,
        }
    }

    #[must_use]
    pub fn sir_parameters(&self) -> SirParameters {
        SirParameters {
            mu: self.mu,
            nu: self.nu,
            steps: self.steps,
            initial_infected: self.infected,
        }
    }

    #[must_use]
    pub fn sweep_settings(&self) -> SweepSettings {
        SweepSettings {
            mode: self.mode,
            metrics: self.feature().metrics(),
            max_rate: self.max_rate,
            num_points: self.num_points,
            repetitions: self.num_sim,
            sir: (self.mode == Mode::Epidemic).then(|| self.sir_parameters()),
        }
    }

    /// Checks every setting before any work is done.
    ///
    /// # Errors
    /// Returns [`NetSirError::ConfigError`] describing the first invalid setting.
    pub fn validate(&self) -> Result<(), NetSirError> {
        let feature = self.feature();
        if feature.mode() != self.mode {
            return Err(NetSirError::config(format!(
                "feature {feature} is not available in {} mode",
                self.mode
            )));
        }

        for (name, value) in [("p", self.p), ("mu", self.mu), ("nu", self.nu)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(NetSirError::config(format!(
                    "{name} must be in [0, 1], got {value}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.max_rate) {
            return Err(NetSirError::config(format!(
                "max_rate must be in [0, 1], got {}",
                self.max_rate
            )));
        }
        for (name, value) in [
            ("N", self.nodes),
            ("steps", self.steps),
            ("num_sim", self.num_sim),
            ("num_points", self.num_points),
        ] {
            if value == 0 {
                return Err(NetSirError::config(format!("{name} must be positive")));
            }
        }
        if self.threads == Some(0) {
            return Err(NetSirError::config("threads must be positive"));
        }

        if self.network == NetworkKind::Airports {
            if self.airports.is_none() {
                return Err(NetSirError::config(
                    "the airports network needs a routes file (--airports)",
                ));
            }
        } else {
            if self.mode == Mode::Epidemic && self.infected > self.nodes {
                return Err(NetSirError::config(format!(
                    "cannot infect {} nodes at step 0 in a network of {}",
                    self.infected, self.nodes
                )));
            }
            if self.network != NetworkKind::ErdosRenyi
                && self.generator_params().attachment_count() < 1
            {
                return Err(NetSirError::config(format!(
                    "N * p / 2 must be at least 1 for the scale-free network, got {}",
                    self.nodes as f64 * self.p / 2.0
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.nodes, 100);
        assert_eq!(config.seed, 102);
        assert_eq!(config.num_points, 15);
        assert_eq!(config.feature(), Feature::Connectivity);
        config.validate().unwrap();
    }

    #[test]
    fn json_overrides_some_fields() {
        let config = SimulationConfig::from_json_str(
            r#"{ "network": "ER_SF", "mode": "epidemic", "N": 200, "mu": 0.3 }"#,
        )
        .unwrap();
        assert_eq!(config.network, NetworkKind::ErdosRenyiScaleFree);
        assert_eq!(config.mode, Mode::Epidemic);
        assert_eq!(config.nodes, 200);
        assert_eq!(config.feature(), Feature::Peak);
        assert_eq!(config.num_sim, 100);
        config.validate().unwrap();
    }

    #[test]
    fn json_rejects_unknown_fields_and_values() {
        assert!(matches!(
            SimulationConfig::from_json_str(r#"{ "nodes_count": 3 }"#),
            Err(NetSirError::JsonError(_))
        ));
        assert!(matches!(
            SimulationConfig::from_json_str(r#"{ "network": "lattice" }"#),
            Err(NetSirError::JsonError(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "feature": "fragmentation", "seed": 7 }}"#).unwrap();
        let config = SimulationConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.feature(), Feature::Fragmentation);
        assert_eq!(config.seed, 7);

        let missing = SimulationConfig::from_json_file(Path::new("does/not/exist.json"));
        assert!(matches!(missing, Err(NetSirError::IoError(_))));
    }

    #[test]
    fn feature_must_match_mode() {
        let config = SimulationConfig {
            feature: Some(Feature::Peak),
            ..SimulationConfig::default()
        };
        assert!(config.validate().unwrap_err().is_config_error());
    }

    #[test]
    fn numeric_ranges() {
        let cases = [
            SimulationConfig {
                p: 1.2,
                ..SimulationConfig::default()
            },
            SimulationConfig {
                mu: -0.5,
                ..SimulationConfig::default()
            },
            SimulationConfig {
                max_rate: 1.5,
                ..SimulationConfig::default()
            },
            SimulationConfig {
                nodes: 0,
                ..SimulationConfig::default()
            },
            SimulationConfig {
                steps: 0,
                ..SimulationConfig::default()
            },
            SimulationConfig {
                num_sim: 0,
                ..SimulationConfig::default()
            },
            SimulationConfig {
                num_points: 0,
                ..SimulationConfig::default()
            },
            SimulationConfig {
                threads: Some(0),
                ..SimulationConfig::default()
            },
            SimulationConfig {
                mode: Mode::Epidemic,
                infected: 101,
                ..SimulationConfig::default()
            },
            SimulationConfig {
                network: NetworkKind::ScaleFree,
                p: 0.01,
                ..SimulationConfig::default()
            },
            SimulationConfig {
                network: NetworkKind::Airports,
                ..SimulationConfig::default()
            },
        ];
        for config in cases {
            assert!(
                config.validate().unwrap_err().is_config_error(),
                "{config:?}"
            );
        }

        let zero_rate = SimulationConfig {
            max_rate: 0.0,
            num_points: 1,
            ..SimulationConfig::default()
        };
        zero_rate.validate().unwrap();
    }

    #[test]
    fn feature_expansion() {
        assert_eq!(
            Feature::Fragmentation.metrics(),
            vec![Metric::GiantSize, Metric::MeanOtherSize]
        );
        assert_eq!(Feature::TPeak.mode(), Mode::Epidemic);
        assert_eq!(Feature::MeanPathLength.mode(), Mode::Structural);
        assert_eq!(Feature::TotalInfected.to_string(), "total_infected");

        let config = SimulationConfig {
            mode: Mode::Epidemic,
            feature: Some(Feature::Duration),
            ..SimulationConfig::default()
        };
        let settings = config.sweep_settings();
        assert_eq!(settings.metrics, vec![Metric::Duration]);
        assert_eq!(settings.sir.unwrap().steps, 50);
        assert!(SimulationConfig::default().sweep_settings().sir.is_none());
    }
}
