//! Reader for plain-text decklists, one `COUNT CARD_NAME` per line.
//!
//! This is only the thin adapter the CLI needs to feed [`Deck::load`];
//! it understands the common export format and nothing more.

use crate::deck::{Deck, DeckError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecklistError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid deck format at line {line}: {reason}")]
    InvalidFormat { line: usize, reason: String },
    #[error("Invalid deck: {0}")]
    InvalidDeck(#[from] DeckError),
}

/// Parse decklist text into `(name, quantity)` pairs in first-seen order
///
/// Accepts `4 Card Name` and `4x Card Name`. Blank lines, `#` and `//`
/// comments and a `Deck` header are skipped; reading stops at `Sideboard`.
/// Repeated names are merged into one entry.
pub fn parse_decklist(content: &str) -> Result<Vec<(String, i64)>, DecklistError> {
    let mut entries: Vec<(String, i64)> = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//") {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("deck") {
            continue;
        }
        if trimmed.to_ascii_lowercase().starts_with("sideboard") {
            break;
        }

        let parts: Vec<&str> = trimmed.splitn(2, char::is_whitespace).collect();
        if parts.len() != 2 || parts[1].trim().is_empty() {
            return Err(DecklistError::InvalidFormat {
                line: line_num + 1,
                reason: "Expected format: 'COUNT CARD_NAME'".to_string(),
            });
        }

        let count_str = parts[0].trim_end_matches(['x', 'X']);
        let card_name = parts[1].trim();

        let count: i64 = count_str.parse().map_err(|_| DecklistError::InvalidFormat {
            line: line_num + 1,
            reason: format!("'{}' is not a valid number", parts[0]),
        })?;

        match entries.iter_mut().find(|(name, _)| name == card_name) {
            Some((_, existing)) => {
                *existing = existing.checked_add(count).ok_or_else(|| DecklistError::InvalidFormat {
                    line: line_num + 1,
                    reason: "card count too large".to_string(),
                })?;
            }
            None => entries.push((card_name.to_string(), count)),
        }
    }

    Ok(entries)
}

/// Read a decklist file and build a [`Deck`] from it
pub fn load_deck_file(path: &str) -> Result<Deck, DecklistError> {
    let content = std::fs::read_to_string(path)?;
    let entries = parse_decklist(&content)?;
    log::debug!("parsed {} decklist entries from {}", entries.len(), path);
    Ok(Deck::load(entries)?)
}
