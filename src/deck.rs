use std::collections::HashSet;
use thiserror::Error;

/// Fewest physical cards a deck may hold: enough for a seven-card hand
pub const MIN_DECK_SIZE: usize = 7;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeckError {
    #[error("Deck has no card entries")]
    Empty,
    #[error("Card '{name}' has negative quantity {quantity}")]
    NegativeQuantity { name: String, quantity: i64 },
    #[error("Card '{name}' has {quantity} copies, more than a deck can hold")]
    QuantityTooLarge { name: String, quantity: i64 },
    #[error("Card '{0}' is listed more than once")]
    DuplicateCard(String),
    #[error("Card name must not be blank")]
    BlankName,
    #[error("Deck has {size} cards, at least {required} are required")]
    TooSmall { size: usize, required: usize },
}

/// One line of a decklist: a card name and how many copies are in the deck
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardEntry {
    pub name: String,
    pub quantity: u32,
}

/// Immutable multiset of card names
///
/// Entry order is preserved exactly as loaded; [`Deck::expand`] relies on it
/// so that a seed always maps to the same physical copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    entries: Vec<CardEntry>,
    size: usize,
}

impl Deck {
    /// Build a deck from `(name, quantity)` pairs
    pub fn load<I, S>(entries: I) -> Result<Self, DeckError>
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut cards = Vec::new();
        let mut size = 0usize;

        for (name, quantity) in entries {
            let name: String = name.into();
            if name.trim().is_empty() {
                return Err(DeckError::BlankName);
            }
            if quantity < 0 {
                return Err(DeckError::NegativeQuantity { name, quantity });
            }
            let quantity = u32::try_from(quantity)
                .map_err(|_| DeckError::QuantityTooLarge { name: name.clone(), quantity })?;
            if !seen.insert(name.clone()) {
                return Err(DeckError::DuplicateCard(name));
            }
            size += quantity as usize;
            cards.push(CardEntry { name, quantity });
        }

        if cards.is_empty() {
            return Err(DeckError::Empty);
        }
        if size < MIN_DECK_SIZE {
            return Err(DeckError::TooSmall { size, required: MIN_DECK_SIZE });
        }

        Ok(Deck { entries: cards, size })
    }

    /// One name per physical copy, in entry order then copy index
    pub fn expand(&self) -> Vec<&str> {
        let mut cards = Vec::with_capacity(self.size);
        for entry in &self.entries {
            for _ in 0..entry.quantity {
                cards.push(entry.name.as_str());
            }
        }
        cards
    }

    /// Total number of physical cards
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn entries(&self) -> &[CardEntry] {
        &self.entries
    }

    /// Copies of `name` in the deck, 0 if absent
    pub fn count_of(&self, name: &str) -> u32 {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.quantity)
            .unwrap_or(0)
    }
}
