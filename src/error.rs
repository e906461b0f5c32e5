use thiserror::Error;

/// Errors surfaced by the embedding and clustering pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// The batch contains no records.
    #[error("empty input: batch contains no records")]
    EmptyInput,

    /// The embedding model could not be loaded.
    #[error("embedding model unavailable: {reason}")]
    ModelUnavailable {
        /// Why the model could not be loaded.
        reason: String,
    },

    /// Vectorization failed on well-formed input.
    #[error("embedding failed: {reason}")]
    EmbeddingFailure {
        /// What went wrong during tokenization or inference.
        reason: String,
    },

    /// Requested cluster count is incompatible with the batch.
    #[error("invalid cluster count: requested {requested}, but batch has {n_items} records")]
    InvalidClusterCount {
        /// Requested number of clusters.
        requested: usize,
        /// Number of records in the batch.
        n_items: usize,
    },

    /// Vectors in a batch have inconsistent dimensionality.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Two pipeline stages produced sequences of different lengths.
    /// This is an internal invariant breach, not a recoverable condition.
    #[error("length mismatch between pipeline stages: expected {expected}, found {found}")]
    LengthMismatch {
        /// Length of the upstream sequence.
        expected: usize,
        /// Length of the downstream sequence.
        found: usize,
    },
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
