use modus::{compute_weights, Clustering, Config, InitMethod, KModes, Metric};
use ndarray::array;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Survey answers coded as integers: (colour, size, shape).
    let data = array![
        [0., 1., 2.],
        [0., 1., 2.],
        [0., 1., 1.],
        [3., 0., 0.],
        [3., 0., 0.],
        [3., 2., 0.],
        [1., 1., 2.],
    ];

    let weights = compute_weights(data.view(), 1.0);
    println!("derived weights: {weights:?}");

    for (name, config) in [
        ("hamming", Config::new(2).with_init(InitMethod::Cao)),
        (
            "weighted",
            Config::new(2)
                .with_init(InitMethod::Cao)
                .with_metric(Metric::WeightedHamming)
                .with_weights(weights.clone()),
        ),
    ] {
        let mut km = KModes::new(config);
        let labels = km.fit_predict(data.view())?;
        println!("{name}: labels={labels:?}");
        println!("{name}: modes=\n{}", km.centroids());
        println!(
            "{name}: iterations={} converged={} cost={}",
            km.stats().iterations,
            km.stats().converged,
            km.stats().cost
        );
    }

    Ok(())
}
