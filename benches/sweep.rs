use criterion::{criterion_group, criterion_main, Criterion};
use netsir::sweep::{run_sweep, Metric, Mode, SweepSettings};
use netsir::{generate, GeneratorParams, NetworkKind, RandomStreams, RemovalPolicy, SirParameters};

static NODES: usize = 500;
static P: f64 = 0.01;
static SEED: u64 = 123;

fn networks(streams: &RandomStreams) -> Vec<netsir::LabeledNetwork> {
    let params = GeneratorParams { nodes: NODES, p: P };
    generate(NetworkKind::ErdosRenyiScaleFree, &params, streams)
        .expect("failed to generate networks")
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let streams = RandomStreams::new(SEED);
    let networks = networks(&streams);

    let structural = SweepSettings {
        mode: Mode::Structural,
        metrics: vec![Metric::Diameter, Metric::MeanPathLength],
        max_rate: 0.05,
        num_points: 5,
        repetitions: 4,
        sir: None,
    };
    let epidemic = SweepSettings {
        mode: Mode::Epidemic,
        metrics: vec![Metric::Peak, Metric::TotalInfected],
        max_rate: 0.5,
        num_points: 15,
        repetitions: 20,
        sir: Some(SirParameters {
            mu: 0.2,
            nu: 0.05,
            steps: 50,
            initial_infected: 1,
        }),
    };

    for network in &networks {
        c.bench_function(&format!("structural sweep {}", network.label), |bencher| {
            bencher.iter(|| {
                run_sweep(
                    network.label,
                    &network.graph,
                    RemovalPolicy::Error,
                    &structural,
                    &streams,
                )
                .expect("sweep failed")
            });
        });
        c.bench_function(&format!("epidemic sweep {}", network.label), |bencher| {
            bencher.iter(|| {
                run_sweep(
                    network.label,
                    &network.graph,
                    RemovalPolicy::Attack,
                    &epidemic,
                    &streams,
                )
                .expect("sweep failed")
            });
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
