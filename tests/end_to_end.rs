use modus::{
    compute_weights, euclidean, hamming, weighted_hamming, Clustering, Config, Error, InitMethod,
    KModes, KPrototypes, Metric,
};
use ndarray::{array, s, Array2};

/// Half `[1, 1]`, half `[1, 2]`.
fn two_patterns(per_pattern: usize) -> Array2<f64> {
    let mut rows = Vec::new();
    for _ in 0..per_pattern {
        rows.extend([1.0, 1.0]);
    }
    for _ in 0..per_pattern {
        rows.extend([1.0, 2.0]);
    }
    Array2::from_shape_vec((2 * per_pattern, 2), rows).unwrap()
}

fn sorted_rows(centroids: &Array2<f64>) -> Vec<Vec<f64>> {
    let mut rows: Vec<Vec<f64>> = centroids.rows().into_iter().map(|r| r.to_vec()).collect();
    rows.sort_by(|a, b| a.partial_cmp(b).unwrap());
    rows
}

#[test]
fn distance_reference_values() {
    let a = array![1.0, 2.0, 3.0, 4.0];
    let b = array![1.0, 1.0, 3.0, 3.0];
    assert_eq!(hamming(a.view(), b.view()).unwrap(), 2.0);
    assert!((euclidean(a.view(), b.view()).unwrap() - 1.41421).abs() < 1e-5);
    assert_eq!(
        weighted_hamming(a.view(), b.view(), &[1.0, 1.0, 1.0, 2.0]).unwrap(),
        3.0
    );
    assert_eq!(hamming(a.view(), a.view()).unwrap(), 0.0);
    assert_eq!(euclidean(b.view(), b.view()).unwrap(), 0.0);
}

#[test]
fn derived_weights_feed_weighted_hamming() {
    // Column 0 is constant and should not influence the partition.
    let x = array![[1., 1., 5.], [1., 1., 5.], [1., 2., 6.], [1., 2., 6.]];
    let weights = compute_weights(x.view(), 2.0);
    assert_eq!(weights, vec![0.0, 2.0, 2.0]);

    let mut km = KModes::new(
        Config::new(2)
            .with_metric(Metric::WeightedHamming)
            .with_weights(weights)
            .with_init(InitMethod::Cao),
    );
    let labels = km.fit_predict(x.view()).unwrap();
    assert_eq!(labels[0], labels[1]);
    assert_eq!(labels[2], labels[3]);
    assert_ne!(labels[0], labels[2]);
    assert_eq!(km.stats().cost, 0.0);
}

#[test]
fn kmodes_every_init_separates_two_patterns() {
    let x = two_patterns(5);
    for init in [InitMethod::Huang, InitMethod::Cao, InitMethod::Random] {
        let mut km = KModes::new(Config::new(2).with_init(init).with_seed(17));
        let labels = km.fit_predict(x.view()).unwrap();

        assert!(km.is_fitted(), "{init:?}");
        assert_eq!(
            sorted_rows(km.centroids()),
            vec![vec![1.0, 1.0], vec![1.0, 2.0]],
            "{init:?}"
        );
        assert_eq!(km.predict(x.view()).unwrap(), labels, "{init:?}");
        assert_eq!(km.labels_counter().iter().sum::<usize>(), x.nrows());
    }
}

#[test]
fn predict_does_not_change_fitted_state() {
    let x = two_patterns(3);
    let mut km = KModes::new(Config::new(2).with_init(InitMethod::Cao));
    km.fit(x.view()).unwrap();
    let before = km.snapshot();

    let other = array![[1.0, 2.0], [9.0, 9.0]];
    km.predict(other.view()).unwrap();
    assert_eq!(km.snapshot(), before);
}

#[test]
fn failed_fits_report_the_right_kind() {
    let x = two_patterns(3);

    let mut km = KModes::new(Config::new(2).with_n_runs(0));
    assert!(km.fit(x.view()).unwrap_err().is_configuration());
    assert_eq!(km.predict(x.view()), Err(Error::NotFitted));

    let mut km = KModes::new(
        Config::new(2)
            .with_metric(Metric::WeightedHamming)
            .with_weights(vec![1.0]),
    );
    assert!(km.fit(x.view()).unwrap_err().is_dimension());

    let mut km = KModes::new(Config::new(2));
    let empty = Array2::<f64>::zeros((0, 2));
    assert_eq!(km.fit(empty.view()), Err(Error::EmptyInput));
}

#[test]
fn refit_replaces_previous_state() {
    let mut km = KModes::new(Config::new(2).with_init(InitMethod::Cao));
    km.fit(two_patterns(3).view()).unwrap();
    assert_eq!(km.labels().len(), 6);

    let other = array![[5.0, 5.0, 5.0], [6.0, 6.0, 6.0], [5.0, 5.0, 5.0]];
    km.fit(other.view()).unwrap();
    assert_eq!(km.labels().len(), 3);
    assert_eq!(km.centroids().ncols(), 3);
    assert_eq!(km.labels()[0], km.labels()[2]);
}

#[test]
fn kprototypes_categorical_half_behaves_like_kmodes() {
    let x = array![
        [1., 1.0],
        [1., 1.5],
        [1., 2.0],
        [1., 2.5],
        [2., 8.0],
        [2., 9.0],
        [2., 10.0],
    ];
    let mut kp = KPrototypes::new(
        Config::new(2)
            .with_categorical(vec![0])
            .with_gamma(1.0)
            .with_seed(21),
    );
    kp.fit(x.view()).unwrap();

    let mut km = KModes::new(Config::new(2));
    km.fit(x.slice(s![.., 0..1])).unwrap();
    assert_eq!(kp.centroids_cat(), km.centroids());
    assert_eq!(kp.labels(), km.labels());

    let scaled: Vec<f64> = x.column(1).iter().map(|v| v / 10.0).collect();
    for c in 0..2 {
        let members: Vec<usize> = (0..x.nrows()).filter(|&i| kp.labels()[i] == c).collect();
        let mean = members.iter().map(|&i| scaled[i]).sum::<f64>() / members.len() as f64;
        assert!((kp.centroids_num()[[c, 0]] - mean).abs() < 1e-12);
    }
}

#[test]
fn kprototypes_large_gamma_follows_numerics() {
    // Categories disagree with the numeric split; a large gamma lets numerics win.
    let x = array![
        [1., 1.0],
        [2., 1.2],
        [1., 1.1],
        [2., 9.8],
        [1., 10.0],
        [2., 9.9],
    ];
    let mut kp = KPrototypes::new(
        Config::new(2)
            .with_categorical(vec![0])
            .with_gamma(50.0)
            .with_init(InitMethod::Cao)
            .with_max_iter(50)
            .with_seed(13),
    );
    let labels = kp.fit_predict(x.view()).unwrap();
    assert_eq!(labels[0], labels[1]);
    assert_eq!(labels[1], labels[2]);
    assert_eq!(labels[3], labels[4]);
    assert_eq!(labels[4], labels[5]);
    assert_ne!(labels[0], labels[3]);
}
