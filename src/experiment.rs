//! A complete experiment: build or load the networks, then sweep each of them under both removal
//! policies.

use log::info;
use strum::IntoEnumIterator;

use crate::airports::load_airport_network;
use crate::config::SimulationConfig;
use crate::error::NetSirError;
use crate::generators::{generate, LabeledNetwork, NetworkKind};
use crate::random::RandomStreams;
use crate::removal::RemovalPolicy;
use crate::report::write_degree_distributions_to_path;
use crate::sweep::{run_sweep, Curve};

/// Generates (or loads) the networks named by `config`.
///
/// # Errors
/// Returns [`NetSirError`] if generation parameters are invalid or the dataset cannot be read.
pub fn build_networks(
    config: &SimulationConfig,
    streams: &RandomStreams,
) -> Result<Vec<LabeledNetwork>, NetSirError> {
    match config.network {
        NetworkKind::Airports => {
            let routes = config.airports.as_deref().ok_or_else(|| {
                NetSirError::config("the airports network needs a routes file (--airports)")
            })?;
            let network = load_airport_network(routes, config.airport_list.as_deref())?;
            Ok(vec![LabeledNetwork {
                label: NetworkKind::Airports.as_str(),
                graph: network.graph,
            }])
        }
        kind => generate(kind, &config.generator_params(), streams),
    }
}

/// Runs the experiment described by `config` and returns its curves: for each network, the
/// error curves then the attack curves, one per metric.
///
/// Every setting is checked against every network before the first sweep starts, so a
/// configuration error never leaves a partial result behind.
///
/// # Errors
/// Returns [`NetSirError`] on invalid configuration or unreadable input.
pub fn run_experiment(config: &SimulationConfig) -> Result<Vec<Curve>, NetSirError> {
    config.validate()?;
    let streams = RandomStreams::new(config.seed);
    let networks = build_networks(config, &streams)?;
    let settings = config.sweep_settings();
    for network in &networks {
        settings.validate_for(&network.graph)?;
    }
    if let Some(path) = &config.degree_distribution {
        write_degree_distributions_to_path(path, &networks)?;
        info!("wrote degree distributions to {}", path.display());
    }

    let run = || -> Result<Vec<Curve>, NetSirError> {
        let mut curves = Vec::new();
        for network in &networks {
            for policy in RemovalPolicy::iter() {
                info!(
                    "{} network ({} nodes): {} sweep of {} under {policy}",
                    network.label,
                    network.graph.node_count(),
                    settings.mode,
                    config.feature()
                );
                curves.extend(run_sweep(
                    network.label,
                    &network.graph,
                    policy,
                    &settings,
                    &streams,
                )?);
            }
        }
        Ok(curves)
    };

    match config.threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| {
                NetSirError::config(format!("cannot start {threads} worker threads: {e}"))
            })?
            .install(run),
        None => run(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Feature;
    use crate::sweep::{Metric, Mode};

    fn small() -> SimulationConfig {
        SimulationConfig {
            nodes: 40,
            p: 0.1,
            num_sim: 3,
            num_points: 4,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn runs_both_policies() {
        let curves = run_experiment(&small()).unwrap();
        // connectivity: diameter and mean path length, for error then attack
        let keys: Vec<_> = curves.iter().map(|c| (c.policy, c.metric)).collect();
        assert_eq!(
            keys,
            vec![
                (RemovalPolicy::Error, Metric::Diameter),
                (RemovalPolicy::Error, Metric::MeanPathLength),
                (RemovalPolicy::Attack, Metric::Diameter),
                (RemovalPolicy::Attack, Metric::MeanPathLength),
            ]
        );
    }

    #[test]
    fn composite_runs_both_networks() {
        let config = SimulationConfig {
            network: NetworkKind::ErdosRenyiScaleFree,
            feature: Some(Feature::GiantSize),
            ..small()
        };
        let curves = run_experiment(&config).unwrap();
        let networks: Vec<_> = curves.iter().map(|c| c.network.as_str()).collect();
        assert_eq!(networks, vec!["ER", "ER", "SF", "SF"]);
    }

    #[test]
    fn thread_count_does_not_change_results() {
        let config = SimulationConfig {
            mode: Mode::Epidemic,
            feature: Some(Feature::TotalInfected),
            ..small()
        };
        let single = run_experiment(&SimulationConfig {
            threads: Some(1),
            ..config.clone()
        })
        .unwrap();
        let several = run_experiment(&SimulationConfig {
            threads: Some(3),
            ..config
        })
        .unwrap();
        assert_eq!(single, several);
    }

    #[test]
    fn writes_degree_distributions_of_every_network() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("degrees.csv");
        let config = SimulationConfig {
            network: NetworkKind::ErdosRenyiScaleFree,
            degree_distribution: Some(path.clone()),
            ..small()
        };
        run_experiment(&config).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        for label in ["ER", "SF"] {
            let total: f64 = rows
                .iter()
                .filter(|row| &row[0] == label)
                .map(|row| row[2].parse::<f64>().unwrap())
                .sum();
            approx::assert_relative_eq!(total, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn configuration_errors_abort_early() {
        let config = SimulationConfig {
            network: NetworkKind::Airports,
            ..small()
        };
        assert!(run_experiment(&config).unwrap_err().is_config_error());

        let config = SimulationConfig {
            mode: Mode::Epidemic,
            feature: Some(Feature::Peak),
            infected: 30,
            max_rate: 0.5,
            ..small()
        };
        // 40 nodes, 20 removed at the last point
        assert!(run_experiment(&config).unwrap_err().is_config_error());
    }
}
