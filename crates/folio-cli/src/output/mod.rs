use std::fmt::Write as _;

use folio_core::entities::{Session, Turn};
use folio_core::enums::Speaker;
use serde::Serialize;

const EXCERPT_CHARS: usize = 100;

/// Print a serializable response as pretty JSON.
pub fn output_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One transcript turn, with numbered source excerpts under answers.
#[must_use]
pub fn render_turn(turn: &Turn) -> String {
    let label = match turn.speaker {
        Speaker::User => "you",
        Speaker::Assistant => "folio",
    };
    let mut out = format!("{label}> {}", turn.text);
    for (index, source) in turn.sources.iter().enumerate() {
        let _ = write!(
            out,
            "\n  [{}] {:>3.0}%  {}",
            index + 1,
            source.similarity * 100.0,
            excerpt(&source.text, EXCERPT_CHARS)
        );
    }
    out
}

/// Short status block for `:state`.
#[must_use]
pub fn render_session(session: &Session) -> String {
    let mut out = format!("phase:        {}", session.phase);
    let _ = write!(out, "\nconnectivity: {}", session.connectivity);
    match &session.document {
        Some(document) => {
            let _ = write!(
                out,
                "\ndocument:     {} ({}, id {})",
                document.display_name,
                document.display_size(),
                document.id
            );
            if let Some(pages) = document.page_count {
                let _ = write!(out, "\npages:        {pages}");
            }
            if let Some(words) = document.word_count {
                let _ = write!(out, "\nwords:        {words}");
            }
        }
        None => out.push_str("\ndocument:     none"),
    }
    let _ = write!(out, "\nturns:        {}", session.transcript.len());
    if let Some(error) = &session.last_error {
        let _ = write!(out, "\nlast error:   {error}");
    }
    out
}

/// Collapse whitespace and cut `text` to at most `max_chars` characters.
fn excerpt(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }
    let mut cut = collapsed
        .chars()
        .take(max_chars.saturating_sub(3))
        .collect::<String>();
    cut.push_str("...");
    cut
}
