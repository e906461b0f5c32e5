//! Semantic email clustering.
//!
//! `corral` samples email subject/snippet pairs out of a read-only message
//! vault, embeds each one with a local sentence-embedding model, partitions
//! the vectors into a fixed number of clusters, and writes every record back
//! out with its `cluster_id`. One linear pass per run:
//!
//! ```text
//! row source → embedder → clusterer → assembler → sink
//! ```
//!
//! Runs are reproducible: the embedding model is deterministic for fixed
//! input, and all clustering randomness flows from one configured seed.
//!
//! # Architecture
//!
//! - **Embeddings**: local ONNX Runtime with all-MiniLM-L6-v2
//!   (384 dimensions, L2-normalized)
//! - **Clustering**: seeded k-means (k-means++ init, multiple trials,
//!   lowest inertia wins)
//! - **Persistence**: JSON Lines in, JSON Lines out, whole-batch atomic
//!   writes
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`dataset`] — Email records, text preparation, and JSONL persistence
//! - [`embedding`] — Text-to-vector embedding via ONNX Runtime
//! - [`cluster`] — Seeded k-means over dense vectors
//! - [`pipeline`] — The embed → cluster → assemble pass
//! - [`error`] — The pipeline error taxonomy

pub mod cluster;
pub mod config;
pub mod dataset;
pub mod embedding;
pub mod error;
pub mod pipeline;
