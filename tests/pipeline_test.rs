mod helpers;

use corral::config::ClusteringConfig;
use corral::error::Error;
use corral::pipeline;

use helpers::{record, StubEmbedder};

fn params(clusters: usize) -> ClusteringConfig {
    ClusteringConfig {
        clusters,
        seed: 43,
        init_trials: 10,
        max_iterations: 300,
    }
}

#[test]
fn output_preserves_order_and_ids() {
    let provider = StubEmbedder::new();
    let records: Vec<_> = (0..10)
        .map(|i| record(100 + i, &format!("topic{} some words", i % 3)))
        .collect();

    let out = pipeline::run(&provider, &records, &params(3)).unwrap();

    assert_eq!(out.len(), records.len());
    for (input, output) in records.iter().zip(&out) {
        assert_eq!(input.id, output.record.id);
        assert_eq!(input.text, output.record.text);
    }
}

#[test]
fn labels_lie_in_cluster_range() {
    let provider = StubEmbedder::new();
    let records: Vec<_> = (0..12)
        .map(|i| record(i, &format!("word{i} trailing text")))
        .collect();

    for k in [1, 2, 5, 12] {
        let out = pipeline::run(&provider, &records, &params(k)).unwrap();
        assert!(
            out.iter().all(|r| r.cluster_id < k),
            "k={k}: cluster_id out of range"
        );
    }
}

#[test]
fn identical_runs_produce_identical_labels() {
    let provider = StubEmbedder::new();
    let records: Vec<_> = (0..20)
        .map(|i| record(i, &format!("subject{} body", i % 4)))
        .collect();

    let first = pipeline::run(&provider, &records, &params(4)).unwrap();
    let second = pipeline::run(&provider, &records, &params(4)).unwrap();

    let first_labels: Vec<_> = first.iter().map(|r| r.cluster_id).collect();
    let second_labels: Vec<_> = second.iter().map(|r| r.cluster_id).collect();
    assert_eq!(first_labels, second_labels);
}

#[test]
fn empty_text_is_clustered_not_rejected() {
    let provider = StubEmbedder::new();
    let records = vec![
        record(1, "refund request"),
        record(2, ""),
        record(3, "meeting tomorrow"),
    ];

    let out = pipeline::run(&provider, &records, &params(2)).unwrap();
    assert_eq!(out.len(), 3);
    assert!(out[1].cluster_id < 2);
}

#[test]
fn related_subjects_share_a_cluster() {
    let provider = StubEmbedder::new();
    let records = vec![
        record(1, "refund request"),
        record(2, "refund please"),
        record(3, "meeting tomorrow at 10am"),
    ];

    let out = pipeline::run(&provider, &records, &params(2)).unwrap();

    assert_eq!(out.len(), 3);
    assert_eq!(out[0].record.id, 1);
    assert_eq!(out[1].record.id, 2);
    assert_eq!(out[2].record.id, 3);
    assert_eq!(out[0].cluster_id, out[1].cluster_id);
    assert_ne!(out[0].cluster_id, out[2].cluster_id);
}

#[test]
fn zero_clusters_fails_before_any_work() {
    let provider = StubEmbedder::new();
    let records = vec![record(1, "a"), record(2, "b")];

    let err = pipeline::run(&provider, &records, &params(0)).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidClusterCount {
            requested: 0,
            n_items: 2
        }
    ));
}

#[test]
fn more_clusters_than_records_fails() {
    let provider = StubEmbedder::new();
    let records = vec![record(1, "a"), record(2, "b")];

    let err = pipeline::run(&provider, &records, &params(3)).unwrap_err();
    assert!(matches!(err, Error::InvalidClusterCount { requested: 3, .. }));
}

#[test]
fn empty_batch_fails() {
    let provider = StubEmbedder::new();
    let err = pipeline::run(&provider, &[], &params(2)).unwrap_err();
    assert!(matches!(err, Error::EmptyInput));
}

#[test]
fn one_cluster_per_record_at_the_boundary() {
    let provider = StubEmbedder::new();
    let records: Vec<_> = (0..5)
        .map(|i| record(i, &format!("alpha{i} beta gamma")))
        .collect();

    let out = pipeline::run(&provider, &records, &params(5)).unwrap();
    assert_eq!(out.len(), 5);
    assert!(out.iter().all(|r| r.cluster_id < 5));
}

#[test]
fn assembly_rejects_label_count_mismatch() {
    let records = vec![record(1, "a"), record(2, "b"), record(3, "c")];
    let err = pipeline::assemble(&records, &[0, 1]).unwrap_err();
    assert!(matches!(
        err,
        Error::LengthMismatch {
            expected: 3,
            found: 2
        }
    ));
}

#[test]
fn batching_does_not_disturb_order() {
    // More records than one embedding batch holds.
    let provider = StubEmbedder::new();
    let records: Vec<_> = (0..100)
        .map(|i| record(i, &format!("bucket{} filler", i % 5)))
        .collect();

    let out = pipeline::run(&provider, &records, &params(5)).unwrap();
    assert_eq!(out.len(), 100);
    for (i, clustered) in out.iter().enumerate() {
        assert_eq!(clustered.record.id, i as i64);
    }
    // Records sharing a stub bucket must share a label.
    for pair in out.chunks(5).collect::<Vec<_>>().windows(2) {
        for (a, b) in pair[0].iter().zip(pair[1]) {
            assert_eq!(a.cluster_id, b.cluster_id);
        }
    }
}
