//! Local ONNX Runtime embedding provider.
//!
//! Implements [`EmbeddingProvider`] using the all-MiniLM-L6-v2 model via
//! `ort`: tokenization, inference, attention-mask mean pooling, and L2
//! normalization. Pooling runs over `ndarray` views of the output tensor.

use std::sync::Mutex;

use ndarray::{Array1, ArrayView3};
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;

use super::{EmbeddingProvider, EMBEDDING_DIM};
use crate::config::EmbeddingConfig;
use crate::error::{Error, Result};

/// Maximum sequence length for all-MiniLM-L6-v2 (trained at 256).
const MAX_SEQ_LEN: usize = 256;

/// Local ONNX-based embedding provider using all-MiniLM-L6-v2.
pub struct LocalEmbeddingProvider {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
}

// Safety: Tokenizer is Send+Sync. Session is behind a Mutex.
// The Mutex guarantees exclusive access during run().
unsafe impl Send for LocalEmbeddingProvider {}
unsafe impl Sync for LocalEmbeddingProvider {}

fn model_unavailable(reason: impl std::fmt::Display) -> Error {
    Error::ModelUnavailable {
        reason: reason.to_string(),
    }
}

fn embedding_failure(reason: impl std::fmt::Display) -> Error {
    Error::EmbeddingFailure {
        reason: reason.to_string(),
    }
}

impl LocalEmbeddingProvider {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let cache_dir = crate::config::expand_tilde(&config.cache_dir);
        let model_path = cache_dir.join("model.onnx");
        let tokenizer_path = cache_dir.join("tokenizer.json");

        if !model_path.exists() {
            return Err(model_unavailable(format!(
                "ONNX model not found at {}. Run `corral model download` first.",
                model_path.display()
            )));
        }
        if !tokenizer_path.exists() {
            return Err(model_unavailable(format!(
                "tokenizer not found at {}. Run `corral model download` first.",
                tokenizer_path.display()
            )));
        }

        let session = Session::builder()
            .and_then(|b| {
                b.with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)
            })
            .and_then(|b| b.with_intra_threads(4))
            .and_then(|b| b.commit_from_file(&model_path))
            .map_err(model_unavailable)?;

        tracing::info!(model = %model_path.display(), "ONNX model loaded");

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| model_unavailable(format!("failed to load tokenizer: {e}")))?;

        tokenizer
            .with_truncation(Some(tokenizers::TruncationParams {
                max_length: MAX_SEQ_LEN,
                ..Default::default()
            }))
            .map_err(|e| model_unavailable(format!("failed to set truncation: {e}")))?;

        tokenizer.with_padding(Some(tokenizers::PaddingParams {
            strategy: tokenizers::PaddingStrategy::BatchLongest,
            ..Default::default()
        }));

        tracing::info!(tokenizer = %tokenizer_path.display(), "tokenizer loaded");

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
        })
    }
}

impl EmbeddingProvider for LocalEmbeddingProvider {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut results = self.embed_batch(&[text])?;
        match results.pop() {
            Some(v) if results.is_empty() => Ok(v),
            _ => Err(embedding_failure("single-input batch produced wrong count")),
        }
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        // Tokenize. Empty strings still encode to [CLS][SEP] with a live
        // attention mask, so pooling always has support.
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| embedding_failure(format!("tokenization failed: {e}")))?;

        let batch_size = encodings.len();
        let seq_len = encodings[0].get_ids().len();

        // Flat i64 input tensors, one row per text.
        let mut input_ids_flat = Vec::with_capacity(batch_size * seq_len);
        let mut attention_mask_flat = Vec::with_capacity(batch_size * seq_len);

        for encoding in &encodings {
            for &id in encoding.get_ids() {
                input_ids_flat.push(id as i64);
            }
            for &mask in encoding.get_attention_mask() {
                attention_mask_flat.push(mask as i64);
            }
        }

        let shape = vec![batch_size as i64, seq_len as i64];
        let input_ids_tensor =
            Tensor::from_array((shape.clone(), input_ids_flat.into_boxed_slice()))
                .map_err(embedding_failure)?;
        let attention_mask_tensor =
            Tensor::from_array((shape.clone(), attention_mask_flat.into_boxed_slice()))
                .map_err(embedding_failure)?;
        // token_type_ids: all zeros (single sentence, no segment B)
        let token_type_ids = vec![0i64; batch_size * seq_len];
        let token_type_ids_tensor = Tensor::from_array((shape, token_type_ids.into_boxed_slice()))
            .map_err(embedding_failure)?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| embedding_failure(format!("session lock poisoned: {e}")))?;

        let outputs = session
            .run(ort::inputs! {
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor,
                "token_type_ids" => token_type_ids_tensor,
            })
            .map_err(embedding_failure)?;

        // Token embeddings, shape [batch, seq_len, 384]. The output name
        // varies by ONNX export; try common names, fall back to index 0.
        let token_emb_value = outputs
            .get("token_embeddings")
            .or_else(|| outputs.get("last_hidden_state"))
            .unwrap_or_else(|| &outputs[0]);

        let (out_shape, data) = token_emb_value
            .try_extract_tensor::<f32>()
            .map_err(|e| embedding_failure(format!("failed to extract token embeddings: {e}")))?;

        let dims: &[i64] = &out_shape;
        if dims.len() != 3 || dims[2] != EMBEDDING_DIM as i64 {
            return Err(embedding_failure(format!(
                "unexpected token embeddings shape: {dims:?}, expected [batch, seq, {EMBEDDING_DIM}]"
            )));
        }
        let actual_seq_len = dims[1] as usize;
        let hidden_dim = dims[2] as usize;

        let token_emb = ArrayView3::from_shape((batch_size, actual_seq_len, hidden_dim), data)
            .map_err(|e| embedding_failure(format!("token embeddings not contiguous: {e}")))?;

        // Mean pooling over unmasked tokens, then L2 normalization.
        let mut results = Vec::with_capacity(batch_size);
        for (row, encoding) in token_emb.outer_iter().zip(&encodings) {
            let mut pooled = Array1::<f32>::zeros(hidden_dim);
            let mut count = 0.0f32;

            for (token, &mask) in row.outer_iter().zip(encoding.get_attention_mask()) {
                if mask == 0 {
                    continue;
                }
                pooled += &token;
                count += 1.0;
            }

            if count > 0.0 {
                pooled /= count;
            }
            l2_normalize(&mut pooled);
            results.push(pooled.to_vec());
        }

        Ok(results)
    }
}

/// L2-normalize in place. A zero vector is left untouched.
fn l2_normalize(v: &mut Array1<f32>) {
    let norm = v.dot(v).sqrt();
    if norm > 0.0 {
        *v /= norm;
    }
}
