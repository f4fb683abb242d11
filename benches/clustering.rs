use criterion::{black_box, criterion_group, criterion_main, Criterion};
use modus::{Clustering, Config, InitMethod, KModes, KPrototypes};
use ndarray::Array2;
use rand::prelude::*;

fn bench_kmodes(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmodes");

    let mut rng = StdRng::seed_from_u64(42);
    let n = 1000;
    let d = 12;
    let k = 8;
    let data = Array2::from_shape_fn((n, d), |_| rng.random_range(0..6) as f64);

    for init in [InitMethod::Huang, InitMethod::Cao] {
        group.bench_function(format!("fit_n1000_d12_k8_{init:?}"), |b| {
            b.iter(|| {
                let mut model =
                    KModes::new(Config::new(k).with_init(init).with_max_iter(10).with_seed(42));
                model.fit(black_box(data.view())).unwrap();
            })
        });
    }

    group.finish();
}

fn bench_kprototypes(c: &mut Criterion) {
    let mut group = c.benchmark_group("kprototypes");

    let mut rng = StdRng::seed_from_u64(7);
    let n = 1000;
    let data = Array2::from_shape_fn((n, 8), |(_, j)| {
        if j < 4 {
            rng.random_range(0..5) as f64
        } else {
            rng.random::<f64>() * 100.0
        }
    });

    group.bench_function("fit_n1000_4cat_4num_k8", |b| {
        b.iter(|| {
            let mut model = KPrototypes::new(
                Config::new(8)
                    .with_categorical(vec![0, 1, 2, 3])
                    .with_max_iter(10)
                    .with_seed(42),
            );
            model.fit(black_box(data.view())).unwrap();
        })
    });

    group.finish();
}

criterion_group!(benches, bench_kmodes, bench_kprototypes);
criterion_main!(benches);
