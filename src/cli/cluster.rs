//! CLI `cluster` command — embed the sampled emails and write cluster
//! assignments.

use anyhow::{Context, Result};

use crate::config::{expand_tilde, CorralConfig};
use crate::dataset;
use crate::embedding;
use crate::pipeline;

/// Load the sampled dataset, run the embed → cluster → assemble pipeline,
/// and persist the labeled records. Nothing is written on failure.
pub fn cluster(config: &CorralConfig) -> Result<()> {
    let sample_path = expand_tilde(&config.dataset.sample_path);
    let records = dataset::load_records(&sample_path)?;

    let provider = embedding::create_provider(&config.embedding)
        .context("failed to create embedding provider")?;

    println!(
        "Embedding {} emails with model '{}'...",
        records.len(),
        config.embedding.model
    );

    let clustered = pipeline::run(provider.as_ref(), &records, &config.clustering)
        .context("clustering pipeline failed")?;

    let out_path = expand_tilde(&config.dataset.clustered_path);
    dataset::save_clustered(&out_path, &clustered)?;

    println!(
        "Clustered {} emails into {} clusters",
        clustered.len(),
        config.clustering.clusters
    );
    println!("Saved result to {}", out_path.display());
    Ok(())
}
