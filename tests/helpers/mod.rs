#![allow(dead_code)]

use std::hash::{DefaultHasher, Hash, Hasher};

use corral::dataset::EmailRecord;
use corral::embedding::EmbeddingProvider;
use corral::error::Result;

/// Stub embedding dimensionality (one byte of key hash per component).
pub const STUB_DIM: usize = 8;

/// Deterministic stub provider for pipeline tests.
///
/// Derives a unit vector from the hash of a text's first
/// whitespace-separated token, so texts opening with the same word map to
/// the identical point while different words map to different directions.
/// `DefaultHasher::new()` is keyed deterministically, so the mapping is
/// stable across runs.
pub struct StubEmbedder;

impl StubEmbedder {
    pub fn new() -> Self {
        Self
    }
}

impl EmbeddingProvider for StubEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let key = text.split_whitespace().next().unwrap_or("");
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);

        // Spread the hash bytes over the components; the +1 offset keeps
        // every component positive so no direction degenerates to zero.
        let mut v: Vec<f32> = hasher
            .finish()
            .to_le_bytes()
            .iter()
            .map(|&b| f32::from(b) + 1.0)
            .collect();

        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        for x in &mut v {
            *x /= norm;
        }
        Ok(v)
    }

    fn dimensions(&self) -> usize {
        STUB_DIM
    }
}

/// Build a minimal email record with the given id and text.
pub fn record(id: i64, text: &str) -> EmailRecord {
    EmailRecord {
        id,
        conversation_id: None,
        sent_at: None,
        subject: None,
        snippet: None,
        is_from_me: false,
        text: text.into(),
    }
}
