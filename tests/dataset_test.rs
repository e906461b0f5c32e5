mod helpers;

use corral::dataset::{self, ClusteredEmail};

use helpers::record;

#[test]
fn sink_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("data/processed/emails_clustered.jsonl");

    let clustered: Vec<ClusteredEmail> = (0..3)
        .map(|i| ClusteredEmail {
            record: record(i, &format!("text {i}")),
            cluster_id: (i % 2) as usize,
        })
        .collect();

    dataset::save_clustered(&out_path, &clustered).unwrap();

    assert!(out_path.exists());
    let contents = std::fs::read_to_string(&out_path).unwrap();
    assert_eq!(contents.lines().count(), 3);
    // No stray temp file left behind.
    assert!(!out_path.with_extension("tmp").exists());
}

#[test]
fn clustered_output_round_trips_through_the_sample_loader() {
    let dir = tempfile::tempdir().unwrap();
    let sample_path = dir.path().join("emails_sample.jsonl");

    let records = vec![record(1, "refund request"), record(2, "")];
    dataset::save_records(&sample_path, &records).unwrap();

    let loaded = dataset::load_records(&sample_path).unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].id, 1);
    assert_eq!(loaded[0].text, "refund request");
    assert_eq!(loaded[1].id, 2);
    assert_eq!(loaded[1].text, "");
}

#[test]
fn cluster_id_lands_in_the_serialized_row() {
    let clustered = ClusteredEmail {
        record: record(7, "invoice overdue"),
        cluster_id: 3,
    };

    let json = serde_json::to_value(&clustered).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["cluster_id"], 3);
    assert_eq!(json["text"], "invoice overdue");
}

#[test]
fn loading_a_malformed_dataset_fails_with_line_context() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.jsonl");
    std::fs::write(&path, "{\"not\": \"an email record\"}\n").unwrap();

    let err = dataset::load_records(&path).unwrap_err();
    assert!(err.to_string().contains(":1"));
}
