use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use linfa::traits::Fit;
use linfa::Dataset;
use linfa_elm::Elm;
use ndarray::{Array1, Array2, Ix1};
use ndarray_rand::{rand_distr::Uniform, RandomExt};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

fn generate_data(nsamples: usize, nfeatures: usize) -> Dataset<f64, bool, Ix1> {
    let mut rng = Xoshiro256Plus::seed_from_u64(42);
    let records = Array2::random_using((nsamples, nfeatures), Uniform::new(-1., 1.), &mut rng);
    let targets: Array1<bool> = records.map_axis(ndarray::Axis(1), |row| row.sum() > 0.0);
    Dataset::new(records, targets)
}

fn fit_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("ELM fit");
    group.sample_size(10);
    for nsamples in [1_000, 5_000] {
        for hidden_nodes in [16, 64, 256] {
            let dataset = generate_data(nsamples, 20);
            let params = Elm::params().hidden_nodes(hidden_nodes);
            group.bench_with_input(
                BenchmarkId::new("fit", format!("{}x{}", nsamples, hidden_nodes)),
                &dataset,
                |b, dataset| b.iter(|| params.fit(dataset).unwrap()),
            );
        }
    }
    group.finish();
}

fn predict_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("ELM predict");
    let dataset = generate_data(10_000, 20);
    let model = Elm::params().hidden_nodes(64).fit(&dataset).unwrap();

    group.bench_function("batch", |b| {
        b.iter(|| model.predict_raw(dataset.records()).unwrap())
    });
    group.bench_function("rows", |b| {
        b.iter(|| {
            dataset
                .records()
                .rows()
                .into_iter()
                .map(|row| model.predict_raw_row(&row).unwrap())
                .sum::<f64>()
        })
    });
    group.finish();
}

criterion_group!(benches, fit_bench, predict_bench);
criterion_main!(benches);
