//! CLI `extract` command — sample emails from the message vault into a
//! JSONL dataset.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{Connection, OpenFlags};

use crate::config::{expand_tilde, CorralConfig};
use crate::dataset::text::build_text;
use crate::dataset::{self, EmailRecord};

/// Newest-first sample of non-deleted emails that have at least one of
/// subject/snippet. Clustering runs on subject + snippet rather than full
/// bodies.
const SAMPLE_QUERY: &str = "\
SELECT id, conversation_id, sent_at, subject, snippet, is_from_me
FROM messages
WHERE message_type = 'email'
  AND deleted_at IS NULL
  AND (subject IS NOT NULL OR snippet IS NOT NULL)
ORDER BY sent_at DESC
LIMIT ?1";

/// Extract a bounded sample of emails from the vault into the dataset file.
/// The vault is opened read-only.
pub fn extract(config: &CorralConfig) -> Result<()> {
    let db_path = config.resolved_db_path();
    anyhow::ensure!(
        db_path.exists(),
        "database not found at {}",
        db_path.display()
    );

    let conn = Connection::open_with_flags(
        &db_path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .with_context(|| format!("failed to open database at {}", db_path.display()))?;

    let mut stmt = conn
        .prepare(SAMPLE_QUERY)
        .context("failed to prepare sample query")?;

    let records: Vec<EmailRecord> = stmt
        .query_map([config.source.limit as i64], |row| {
            let subject: Option<String> = row.get(3)?;
            let snippet: Option<String> = row.get(4)?;
            let text = build_text(subject.as_deref(), snippet.as_deref());
            Ok(EmailRecord {
                id: row.get(0)?,
                conversation_id: row.get(1)?,
                sent_at: parse_sent_at(row.get::<_, Option<String>>(2)?.as_deref()),
                subject,
                snippet,
                is_from_me: row.get::<_, Option<bool>>(5)?.unwrap_or(false),
                text,
            })
        })?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to read email rows")?;

    anyhow::ensure!(
        !records.is_empty(),
        "query returned no rows — check the vault contents or filters"
    );

    tracing::info!(rows = records.len(), db = %db_path.display(), "emails sampled");

    let out_path = expand_tilde(&config.dataset.sample_path);
    dataset::save_records(&out_path, &records)?;

    println!("Extracted {} emails to {}", records.len(), out_path.display());
    Ok(())
}

/// The vault does not pin a timestamp format; accept RFC 3339 or
/// `YYYY-MM-DD HH:MM:SS` (taken as UTC), carrying `None` otherwise.
fn parse_sent_at(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}
