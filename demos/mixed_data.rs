use modus::{Clustering, Config, KPrototypes};
use ndarray::array;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // (plan, region, monthly_spend, tenure_months); plan and region are categorical.
    let data = array![
        [0., 1., 20.0, 3.0],
        [0., 1., 25.0, 5.0],
        [0., 2., 22.0, 4.0],
        [1., 0., 180.0, 40.0],
        [1., 0., 210.0, 36.0],
        [1., 2., 190.0, 48.0],
    ];

    let mut kp = KPrototypes::new(
        Config::new(2)
            .with_categorical(vec![0, 1])
            .with_gamma(0.5)
            .with_seed(7),
    );
    let labels = kp.fit_predict(data.view())?;

    println!("labels={labels:?}");
    println!("prototypes (numeric columns scaled)=\n{}", kp.centroids());
    println!("rows per cluster={:?}", kp.labels_counter());

    let new_customers = array![[0., 2., 30.0, 2.0], [1., 1., 200.0, 30.0]];
    println!("predicted={:?}", kp.predict(new_customers.view())?);
    Ok(())
}
