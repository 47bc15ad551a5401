use crate::simulation::draw::{HandDraw, MulliganDepth, PlayOrDraw};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Kept cards that are not an ordered sub-selection of the hand
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Cards to keep {kept:?} are not a subsequence of the hand {hand:?}")]
    NotSubsequence { kept: Vec<String>, hand: Vec<String> },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Hand numbers start at 1")]
    ZeroHandNumber,
    #[error("Hand {expected} expected next, got hand {got}")]
    OutOfSequence { expected: u32, got: u32 },
    #[error("Run already holds all {total_hands} hands")]
    RunFull { total_hands: u32 },
    #[error("Hand {hand_number}: cards to keep are only recorded for a mulligan")]
    KeptWithoutMulligan { hand_number: u32 },
    #[error("Hand {hand_number}: unknown mulligan number {mulligan_number}")]
    UnknownMulliganNumber { hand_number: u32, mulligan_number: u8 },
    #[error("Hand {hand_number}: {cards} cards listed but cards_in_hand is {cards_in_hand}")]
    CardCountMismatch { hand_number: u32, cards: usize, cards_in_hand: usize },
    #[error("Hand {hand_number}: mulligan number {mulligan_number} deals {expected} cards, not {cards_in_hand}")]
    DepthMismatch { hand_number: u32, mulligan_number: u8, expected: usize, cards_in_hand: usize },
    #[error(transparent)]
    Selection(#[from] SelectionError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Keep,
    Mulligan,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Keep => write!(f, "keep"),
            Decision::Mulligan => write!(f, "mulligan"),
        }
    }
}

/// True if `kept` can be obtained from `hand` by deleting cards without reordering
pub fn is_subsequence(kept: &[String], hand: &[String]) -> bool {
    let mut remaining = hand.iter();
    kept.iter().all(|card| remaining.any(|h| h == card))
}

/// Outcome of one simulated hand; immutable once built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    hand_number: u32,
    seed: u64,
    cards_in_hand: usize,
    cards: Vec<String>,
    play_or_draw: PlayOrDraw,
    mulligan_number: u8,
    user_decision: Decision,
    cards_to_keep: Option<Vec<String>>,
    timestamp: DateTime<Utc>,
}

impl ResultRecord {
    pub fn new(
        hand_number: u32,
        hand: &HandDraw,
        decision: Decision,
        cards_to_keep: Option<Vec<String>>,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, RecordError> {
        let record = ResultRecord {
            hand_number,
            seed: hand.seed,
            cards_in_hand: hand.cards.len(),
            cards: hand.cards.clone(),
            play_or_draw: hand.play_or_draw,
            mulligan_number: hand.mulligan_number(),
            user_decision: decision,
            cards_to_keep,
            timestamp,
        };
        record.validate()?;
        Ok(record)
    }

    /// Check the invariants that hold for every record
    pub fn validate(&self) -> Result<(), RecordError> {
        let hand_number = self.hand_number;
        if hand_number == 0 {
            return Err(RecordError::ZeroHandNumber);
        }
        let depth = MulliganDepth::from_mulligan_number(self.mulligan_number).ok_or(
            RecordError::UnknownMulliganNumber { hand_number, mulligan_number: self.mulligan_number },
        )?;
        if self.cards_in_hand != depth.card_count() {
            return Err(RecordError::DepthMismatch {
                hand_number,
                mulligan_number: self.mulligan_number,
                expected: depth.card_count(),
                cards_in_hand: self.cards_in_hand,
            });
        }
        if self.cards.len() != self.cards_in_hand {
            return Err(RecordError::CardCountMismatch {
                hand_number,
                cards: self.cards.len(),
                cards_in_hand: self.cards_in_hand,
            });
        }
        if let Some(kept) = &self.cards_to_keep {
            if self.user_decision != Decision::Mulligan {
                return Err(RecordError::KeptWithoutMulligan { hand_number });
            }
            if !is_subsequence(kept, &self.cards) {
                return Err(SelectionError::NotSubsequence {
                    kept: kept.clone(),
                    hand: self.cards.clone(),
                }
                .into());
            }
        }
        Ok(())
    }

    pub fn hand_number(&self) -> u32 {
        self.hand_number
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn cards_in_hand(&self) -> usize {
        self.cards_in_hand
    }

    pub fn cards(&self) -> &[String] {
        &self.cards
    }

    pub fn play_or_draw(&self) -> PlayOrDraw {
        self.play_or_draw
    }

    pub fn mulligan_number(&self) -> u8 {
        self.mulligan_number
    }

    pub fn user_decision(&self) -> Decision {
        self.user_decision
    }

    pub fn cards_to_keep(&self) -> Option<&[String]> {
        self.cards_to_keep.as_deref()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// An in-progress simulation session; grows by append only
#[derive(Debug, Clone)]
pub struct Run {
    deck_name: String,
    created_at: DateTime<Utc>,
    total_hands: u32,
    results: Vec<ResultRecord>,
}

impl Run {
    pub fn new(deck_name: impl Into<String>, total_hands: u32) -> Self {
        Run {
            deck_name: deck_name.into(),
            created_at: Utc::now(),
            total_hands,
            results: Vec::new(),
        }
    }

    /// Append the next record; hand numbers must run 1, 2, 3, ...
    pub fn push(&mut self, record: ResultRecord) -> Result<(), RecordError> {
        if self.is_complete() {
            return Err(RecordError::RunFull { total_hands: self.total_hands });
        }
        let expected = self.next_hand_number();
        if record.hand_number != expected {
            return Err(RecordError::OutOfSequence { expected, got: record.hand_number });
        }
        self.results.push(record);
        Ok(())
    }

    pub fn next_hand_number(&self) -> u32 {
        self.results.len() as u32 + 1
    }

    pub fn is_complete(&self) -> bool {
        self.results.len() as u32 >= self.total_hands
    }

    pub fn deck_name(&self) -> &str {
        &self.deck_name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn total_hands(&self) -> u32 {
        self.total_hands
    }

    pub fn results(&self) -> &[ResultRecord] {
        &self.results
    }

    /// Close the run and hand out its export shape
    pub fn close(self) -> RunSnapshot {
        RunSnapshot {
            timestamp: self.created_at,
            total_hands: self.total_hands,
            results: self.results,
        }
    }
}

/// A closed run as exporters see it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub timestamp: DateTime<Utc>,
    pub total_hands: u32,
    pub results: Vec<ResultRecord>,
}

impl RunSnapshot {
    /// Re-check run-level invariants, e.g. after loading from disk
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.results.len() as u32 > self.total_hands {
            return Err(RecordError::RunFull { total_hands: self.total_hands });
        }
        for (i, record) in self.results.iter().enumerate() {
            let expected = i as u32 + 1;
            if record.hand_number != expected {
                return Err(RecordError::OutOfSequence { expected, got: record.hand_number });
            }
            record.validate()?;
        }
        Ok(())
    }

    pub fn keep_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.user_decision == Decision::Keep)
            .count()
    }
}
