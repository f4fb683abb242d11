use modus::{Clustering, Config, InitMethod, KModes, KPrototypes};
use ndarray::Array2;
use proptest::prelude::*;

fn categorical_matrix() -> impl Strategy<Value = Array2<f64>> {
    (1usize..25, 1usize..4).prop_flat_map(|(n, m)| {
        prop::collection::vec(0u8..4, n * m).prop_map(move |v| {
            Array2::from_shape_vec((n, m), v.into_iter().map(f64::from).collect()).unwrap()
        })
    })
}

fn mixed_matrix() -> impl Strategy<Value = Array2<f64>> {
    prop::collection::vec((0u8..3, 0.0f64..100.0), 1..25).prop_map(|rows| {
        let n = rows.len();
        let flat = rows
            .into_iter()
            .flat_map(|(cat, num)| [f64::from(cat), num])
            .collect();
        Array2::from_shape_vec((n, 2), flat).unwrap()
    })
}

fn init_method() -> impl Strategy<Value = InitMethod> {
    prop_oneof![
        Just(InitMethod::Huang),
        Just(InitMethod::Cao),
        Just(InitMethod::Random),
    ]
}

proptest! {
    #[test]
    fn prop_kmodes_bookkeeping_is_consistent(
        data in categorical_matrix(),
        k in 1usize..5,
        init in init_method(),
        seed in 0u64..1000,
    ) {
        let mut km = KModes::new(Config::new(k).with_init(init).with_max_iter(20).with_seed(seed));
        km.fit(data.view()).unwrap();

        let n = data.nrows();
        prop_assert_eq!(km.labels().len(), n);
        prop_assert!(km.labels().iter().all(|&l| l < k));
        prop_assert_eq!(km.labels_counter().iter().sum::<usize>(), n);

        let table = km.frequency_table();
        for c in 0..k {
            prop_assert_eq!(
                km.labels().iter().filter(|&&l| l == c).count(),
                km.labels_counter()[c]
            );
            for j in 0..data.ncols() {
                prop_assert_eq!(table.column_total(c, j), km.labels_counter()[c]);
            }
        }
    }

    #[test]
    fn prop_kmodes_predict_matches_labels_when_converged(
        data in categorical_matrix(),
        k in 1usize..4,
        init in init_method(),
        seed in 0u64..1000,
    ) {
        let mut km = KModes::new(Config::new(k).with_init(init).with_seed(seed));
        km.fit(data.view()).unwrap();
        if km.stats().converged {
            prop_assert_eq!(km.predict(data.view()).unwrap(), km.labels().to_vec());
        }
    }

    #[test]
    fn prop_kprototypes_numeric_centroids_are_means(
        data in mixed_matrix(),
        k in 1usize..4,
        seed in 0u64..1000,
    ) {
        let mut kp = KPrototypes::new(
            Config::new(k).with_categorical(vec![0]).with_seed(seed),
        );
        kp.fit(data.view()).unwrap();

        let n = data.nrows();
        prop_assert_eq!(kp.labels_counter().iter().sum::<usize>(), n);
        for c in 0..k {
            prop_assert_eq!(kp.membership()[c].len(), kp.labels_counter()[c]);
            prop_assert_eq!(kp.frequency_table().column_total(c, 0), kp.labels_counter()[c]);
        }

        if kp.stats().converged {
            let max = data.column(1).fold(0.0f64, |m, &v| m.max(v));
            let scale = if max > 0.0 { max } else { 1.0 };
            for c in 0..k {
                let members = &kp.membership()[c];
                if members.is_empty() {
                    continue;
                }
                let mean = members.iter().map(|&i| data[[i, 1]] / scale).sum::<f64>()
                    / members.len() as f64;
                prop_assert!((kp.centroids_num()[[c, 0]] - mean).abs() < 1e-9);
            }
        }
    }
}
