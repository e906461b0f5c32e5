//! The embed → cluster → assemble pipeline.
//!
//! [`run`] is the single entry point. It validates the batch up front, embeds
//! every record's text, partitions the vectors with seeded k-means, and zips
//! the labels back onto the records by position. Any stage error propagates
//! before output exists, so a failed run never produces a partial result.

use crate::cluster::Kmeans;
use crate::config::ClusteringConfig;
use crate::dataset::{ClusteredEmail, EmailRecord};
use crate::embedding::EmbeddingProvider;
use crate::error::{Error, Result};

/// Texts are embedded in fixed-size batches so tokenizer padding cost is
/// amortized without holding every encoding alive at once.
pub const EMBED_BATCH_SIZE: usize = 32;

/// Run the full pipeline: validate → embed → cluster → assemble.
///
/// The cluster count is checked against the batch size before any embedding
/// work happens. Given identical records, model, and configuration, two runs
/// produce identical output.
pub fn run(
    provider: &dyn EmbeddingProvider,
    records: &[EmailRecord],
    params: &ClusteringConfig,
) -> Result<Vec<ClusteredEmail>> {
    if records.is_empty() {
        return Err(Error::EmptyInput);
    }
    if params.clusters < 1 || params.clusters > records.len() {
        return Err(Error::InvalidClusterCount {
            requested: params.clusters,
            n_items: records.len(),
        });
    }

    let texts: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
    let embeddings = embed_texts(provider, &texts)?;

    let labels = Kmeans::new(params.clusters)
        .with_seed(params.seed)
        .with_n_init(params.init_trials)
        .with_max_iter(params.max_iterations)
        .fit_predict(&embeddings)?;

    assemble(records, &labels)
}

/// Embed texts in order, in batches of [`EMBED_BATCH_SIZE`].
pub fn embed_texts(
    provider: &dyn EmbeddingProvider,
    texts: &[&str],
) -> Result<Vec<Vec<f32>>> {
    let mut embeddings = Vec::with_capacity(texts.len());
    for chunk in texts.chunks(EMBED_BATCH_SIZE) {
        embeddings.extend(provider.embed_batch(chunk)?);
        tracing::debug!(embedded = embeddings.len(), total = texts.len(), "embedding batch done");
    }

    if embeddings.len() != texts.len() {
        return Err(Error::LengthMismatch {
            expected: texts.len(),
            found: embeddings.len(),
        });
    }
    Ok(embeddings)
}

/// Zip labels back onto the records by position. No re-keying, no
/// re-sorting: position `i` in is position `i` out.
pub fn assemble(records: &[EmailRecord], labels: &[usize]) -> Result<Vec<ClusteredEmail>> {
    if records.len() != labels.len() {
        return Err(Error::LengthMismatch {
            expected: records.len(),
            found: labels.len(),
        });
    }

    Ok(records
        .iter()
        .zip(labels)
        .map(|(record, &cluster_id)| ClusteredEmail {
            record: record.clone(),
            cluster_id,
        })
        .collect())
}
