//! Loss model throughput on a 125-name pool.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use credit_models::loss::{tranche_survival_probability, LossModel};

fn bench_tranche_models(c: &mut Criterion) {
    let n = 125;
    let survival = vec![0.96; n];
    let recovery = vec![0.4; n];
    let loadings = vec![0.5; n];

    let mut group = c.benchmark_group("tranche_survival");
    for model in [
        LossModel::Recursion,
        LossModel::AdjustedBinomial,
        LossModel::Gaussian,
        LossModel::LargeHomogeneousPool,
    ] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{model:?}")),
            &model,
            |b, &model| {
                b.iter(|| {
                    tranche_survival_probability(
                        model,
                        0.03,
                        0.07,
                        &survival,
                        &recovery,
                        &loadings,
                        50,
                    )
                    .unwrap()
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_tranche_models);
criterion_main!(benches);
