//! Subject/snippet preparation for embedding.
//!
//! Email subjects and snippets arrive with NULLs, soft line breaks, and the
//! occasional invisible control character. [`build_text`] folds both fields
//! into the single `text` string the embedder sees.

/// Combine subject and snippet into one embedding input, treating NULL as
/// the empty string.
pub fn build_text(subject: Option<&str>, snippet: Option<&str>) -> String {
    let subject = subject.unwrap_or("");
    let snippet = snippet.unwrap_or("");
    clean_text(&format!("Subject: {subject}\n\n{snippet}"))
}

/// Strip non-printable characters and collapse whitespace runs to a single
/// space, trimming the ends.
pub fn clean_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for ch in text.chars() {
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if ch.is_control() {
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(ch);
    }

    out
}
