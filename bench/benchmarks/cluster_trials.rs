use cluster_r0::{estimate_r0, ClusterInfectionSimulator, Params, PolicyVersion};
use criterion::Criterion;
use ixa::{Context, ContextRandomExt};
use std::hint::black_box;

pub fn cluster_trial_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("cluster_simulator::run_trial");
    let mut context = Context::new();
    context.init_random(42);

    for cluster_size in [1, 5, 20] {
        let simulator = ClusterInfectionSimulator::new(&Params {
            cluster_size,
            ..Params::default()
        });
        group.bench_function(format!("cluster_size_{cluster_size}"), |b| {
            b.iter(|| {
                black_box(simulator.run_trial(&mut context));
            });
        });
    }

    let simulator = ClusterInfectionSimulator::new(&Params {
        policy: PolicyVersion::V2,
        ..Params::default()
    });
    group.bench_function("partial_quarantine", |b| {
        b.iter(|| {
            black_box(simulator.run_trial(&mut context));
        });
    });

    group.finish();
}

pub fn r0_estimate_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("r0_estimator::estimate_r0");
    group.sample_size(10);
    let mut context = Context::new();
    context.init_random(42);
    let parameters = Params::default();

    group.bench_function("default_parameters", |b| {
        b.iter(|| {
            black_box(estimate_r0(black_box(&parameters), &mut context).unwrap());
        });
    });

    group.finish();
}
