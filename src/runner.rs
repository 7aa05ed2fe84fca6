use std::path::PathBuf;

use clap::{Args, Command, FromArgMatches as _};
use log::{info, LevelFilter};

use crate::config::{Feature, SimulationConfig};
use crate::error::NetSirError;
use crate::experiment::run_experiment;
use crate::generators::NetworkKind;
use crate::log::set_log_level;
use crate::report::{format_summary, write_curves_to_path};
use crate::sweep::{Curve, Mode};

/// Command line arguments. Values given here override the configuration file, which overrides
/// the defaults.
#[derive(Args, Debug, Default)]
pub struct BaseArgs {
    /// Network to study
    #[arg(short = 'n', long, value_enum)]
    pub network: Option<NetworkKind>,

    /// Study the network structure or an epidemic spreading on it
    #[arg(short = 'm', long, value_enum)]
    pub mode: Option<Mode>,

    /// Feature to measure along the removal sweep
    #[arg(short = 'f', long, value_enum)]
    pub feature: Option<Feature>,

    /// Number of nodes of generated networks [default: 100]
    #[arg(short = 'N', long = "nodes")]
    pub nodes: Option<usize>,

    /// Connection probability of generated networks [default: 0.04]
    #[arg(short = 'p', long)]
    pub p: Option<f64>,

    /// Random seed [default: 102]
    #[arg(short = 's', long)]
    pub seed: Option<u64>,

    /// Largest fraction of nodes removed [default: 0.5]
    #[arg(long)]
    pub max_rate: Option<f64>,

    /// Transmission probability per step [default: 0.2]
    #[arg(long)]
    pub mu: Option<f64>,

    /// Recovery probability per step [default: 0.05]
    #[arg(long)]
    pub nu: Option<f64>,

    /// Step budget of each epidemic [default: 50]
    #[arg(long)]
    pub steps: Option<usize>,

    /// Nodes infected at step 0 [default: 1]
    #[arg(long)]
    pub infected: Option<usize>,

    /// Repetitions per sweep point [default: 100]
    #[arg(long)]
    pub num_sim: Option<usize>,

    /// Number of sampled removal fractions [default: 15]
    #[arg(long)]
    pub num_points: Option<usize>,

    /// Optional path for a JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// routes.csv of the airport network
    #[arg(long)]
    pub airports: Option<PathBuf>,

    /// airports.csv used to discard routes to unknown airports
    #[arg(long)]
    pub airport_list: Option<PathBuf>,

    /// Optional path for the CSV report
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Optional path for a CSV of the degree distribution of each network
    #[arg(long)]
    pub degree_distribution: Option<PathBuf>,

    /// Worker threads [default: one per core]
    #[arg(long)]
    pub threads: Option<usize>,

    /// Enable logging at the given level (error, warn, info, debug, trace)
    #[arg(long)]
    pub log_level: Option<LevelFilter>,
}

impl BaseArgs {
    /// Overrides the fields of `config` given on the command line.
    pub fn apply_to(&self, config: &mut SimulationConfig) {
        override_with(&mut config.network, self.network);
        override_with(&mut config.mode, self.mode);
        override_with(&mut config.nodes, self.nodes);
        override_with(&mut config.p, self.p);
        override_with(&mut config.seed, self.seed);
        override_with(&mut config.max_rate, self.max_rate);
        override_with(&mut config.mu, self.mu);
        override_with(&mut config.nu, self.nu);
        override_with(&mut config.steps, self.steps);
        override_with(&mut config.infected, self.infected);
        override_with(&mut config.num_sim, self.num_sim);
        override_with(&mut config.num_points, self.num_points);

        override_optional(&mut config.feature, &self.feature);
        override_optional(&mut config.airports, &self.airports);
        override_optional(&mut config.airport_list, &self.airport_list);
        override_optional(&mut config.output, &self.output);
        override_optional(&mut config.degree_distribution, &self.degree_distribution);
        override_optional(&mut config.threads, &self.threads);
    }

    /// The configuration file (if any) with the command line applied on top.
    ///
    /// # Errors
    /// Returns [`NetSirError`] if the configuration file cannot be read or parsed.
    pub fn resolve_config(&self) -> Result<SimulationConfig, NetSirError> {
        let mut config = match &self.config {
            Some(path) => {
                info!("loading configuration from {}", path.display());
                SimulationConfig::from_json_file(path)?
            }
            None => SimulationConfig::default(),
        };
        self.apply_to(&mut config);
        Ok(config)
    }
}

fn override_with<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

fn override_optional<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
    if value.is_some() {
        target.clone_from(value);
    }
}

fn create_netsir_cli() -> Command {
    let cli = Command::new("netsir")
        .about("Error and attack tolerance of networks and of SIR epidemics spreading on them");
    BaseArgs::augment_args(cli)
}

/// Parses the process arguments and runs the experiment they describe.
///
/// # Errors
/// Returns an error if argument parsing, configuration or the experiment fails.
pub fn run_with_args() -> Result<Vec<Curve>, Box<dyn std::error::Error>> {
    let matches = create_netsir_cli().get_matches();
    let args = BaseArgs::from_arg_matches(&matches)?;
    run_with_args_internal(&args)
}

fn describe(config: &SimulationConfig) -> String {
    let mut lines = Vec::new();
    match config.network {
        NetworkKind::Airports => lines.push("Network: airports".to_string()),
        kind => lines.push(format!(
            "Network parameters for {kind}: N = {}, p = {}",
            config.nodes, config.p
        )),
    }
    if config.mode == Mode::Epidemic {
        lines.push(format!(
            "Epidemic parameters: mu = {}, nu = {}, steps = {}, initial infected = {}",
            config.mu, config.nu, config.steps, config.infected
        ));
    }
    lines.push(format!(
        "Sweep: {} of {} up to a removal rate of {} ({} points, {} repetitions, seed {})",
        config.mode,
        config.feature(),
        config.max_rate,
        config.num_points,
        config.num_sim,
        config.seed
    ));
    lines.join("\n")
}

fn run_with_args_internal(args: &BaseArgs) -> Result<Vec<Curve>, Box<dyn std::error::Error>> {
    if let Some(level) = args.log_level {
        set_log_level(level);
    }

    let config = args.resolve_config()?;
    config.validate()?;
    println!("{}\n", describe(&config));

    let curves = run_experiment(&config)?;

    if let Some(path) = &config.output {
        write_curves_to_path(path, &curves)?;
        info!("wrote {} curves to {}", curves.len(), path.display());
    }
    print!("{}", format_summary(&curves));
    Ok(curves)
}
