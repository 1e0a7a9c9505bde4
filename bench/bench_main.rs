use criterion::{criterion_group, criterion_main};

mod benchmarks;
use benchmarks::cluster_trials::{cluster_trial_benchmarks, r0_estimate_benchmarks};

criterion_group!(cluster_benches, cluster_trial_benchmarks, r0_estimate_benchmarks,);

criterion_main!(cluster_benches);
