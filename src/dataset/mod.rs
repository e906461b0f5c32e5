//! Email dataset records and JSON Lines persistence.
//!
//! Defines [`EmailRecord`] (one sampled email with its embedding-ready `text`
//! field) and [`ClusteredEmail`] (the same record with a `cluster_id`
//! attached), plus load/save helpers for the JSONL files that connect the
//! `extract` and `cluster` commands.

pub mod text;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// One email sampled from the message vault.
///
/// `text` is always present: built from subject and snippet at extraction
/// time, empty string when both are missing. Every
/// other field carries through to the output untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRecord {
    /// Stable row id from the source database.
    pub id: i64,
    pub conversation_id: Option<i64>,
    pub sent_at: Option<DateTime<Utc>>,
    pub subject: Option<String>,
    pub snippet: Option<String>,
    pub is_from_me: bool,
    /// Cleaned subject+snippet text used for embedding. May be empty.
    pub text: String,
}

/// An [`EmailRecord`] with its cluster assignment. Built once at assembly
/// time, written exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteredEmail {
    #[serde(flatten)]
    pub record: EmailRecord,
    /// Cluster label in `[0, K)`.
    pub cluster_id: usize,
}

/// Load email records from a JSONL file, one record per line.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<EmailRecord>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset at {}", path.display()))?;

    let mut records = Vec::new();
    for (lineno, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: EmailRecord = serde_json::from_str(line)
            .with_context(|| format!("malformed record at {}:{}", path.display(), lineno + 1))?;
        records.push(record);
    }
    Ok(records)
}

/// Write sampled records to a JSONL file.
pub fn save_records(path: impl AsRef<Path>, records: &[EmailRecord]) -> Result<()> {
    write_jsonl(path.as_ref(), records)
}

/// Write clustered records to a JSONL file.
pub fn save_clustered(path: impl AsRef<Path>, records: &[ClusteredEmail]) -> Result<()> {
    write_jsonl(path.as_ref(), records)
}

/// Whole-batch JSONL write: create the parent directory if absent, serialize
/// everything to a temp file, then rename into place. A failed run never
/// leaves a truncated output behind.
fn write_jsonl<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }

    let tmp_path = path.with_extension("tmp");
    let mut file = std::fs::File::create(&tmp_path)
        .with_context(|| format!("failed to create temp file: {}", tmp_path.display()))?;

    for record in records {
        let line = serde_json::to_string(record).context("failed to serialize record")?;
        file.write_all(line.as_bytes())
            .and_then(|()| file.write_all(b"\n"))
            .with_context(|| format!("failed to write {}", tmp_path.display()))?;
    }
    file.flush()?;
    drop(file);

    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("failed to rename temp file to {}", path.display()))?;

    tracing::info!(path = %path.display(), records = records.len(), "dataset written");
    Ok(())
}
