use corral::cluster::Kmeans;
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_kmeans_labels_complete_and_in_range(
        data in prop::collection::vec(prop::collection::vec(-10.0f32..10.0, 4), 1..24),
        k in 1usize..6
    ) {
        // Skip if k > n
        if k <= data.len() {
            let model = Kmeans::new(k).with_seed(42);
            let labels = model.fit_predict(&data).unwrap();

            prop_assert_eq!(labels.len(), data.len());
            for &l in &labels {
                prop_assert!(l < k);
            }
        }
    }

    #[test]
    fn prop_kmeans_is_deterministic(
        data in prop::collection::vec(prop::collection::vec(-10.0f32..10.0, 3), 2..16),
        seed in any::<u64>()
    ) {
        let model = Kmeans::new(2).with_seed(seed).with_n_init(3);
        let first = model.fit_predict(&data).unwrap();
        let second = model.fit_predict(&data).unwrap();
        prop_assert_eq!(first, second);
    }
}
