//! Compare sequential vs parallel Monte Carlo run times.
//!
//! Run with: `cargo bench --bench monte_carlo_parallel`

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use skirmish::combat::Team;
use skirmish::data::resolve_creature;
use skirmish::parallel::WorkerPool;
use skirmish::sim::{run_trials, run_trials_sequential, ScenarioConfig};

fn bench_monte_carlo_sequential_vs_parallel(c: &mut Criterion) {
    let roster = vec![
        resolve_creature("orc").expect("builtin creature").spawn(Team::A),
        resolve_creature("troll").expect("builtin creature").spawn(Team::B),
    ];
    let config = ScenarioConfig {
        iterations: 500,
        seed: 42,
        turn_cap: 300,
    };
    let pool = WorkerPool::default_workers();

    let mut group = c.benchmark_group("monte_carlo");
    group.sample_size(20);
    group.measurement_time(std::time::Duration::from_secs(10));

    group.bench_function("sequential", |b| {
        b.iter(|| black_box(run_trials_sequential(&roster, &config)));
    });

    group.bench_function("parallel", |b| {
        b.iter(|| black_box(run_trials(&roster, &config, &pool)));
    });

    group.finish();
}

criterion_group!(benches, bench_monte_carlo_sequential_vs_parallel);
criterion_main!(benches);
