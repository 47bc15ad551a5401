use crate::deck::Deck;
use crate::rng::HandRng;
use rand::distributions::WeightedIndex;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SamplingError {
    #[error("Cannot draw {requested} cards from a deck of {available}")]
    NotEnoughCards { requested: usize, available: usize },
    #[error("Mulligan depth weights must not all be zero")]
    NoWeight,
}

/// How many cards the hand is dealt with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MulliganDepth {
    Seven,
    Six,
    Five,
}

impl MulliganDepth {
    /// Categories in weight order
    pub const ALL: [MulliganDepth; 3] = [MulliganDepth::Seven, MulliganDepth::Six, MulliganDepth::Five];

    pub fn card_count(&self) -> usize {
        match self {
            MulliganDepth::Seven => 7,
            MulliganDepth::Six => 6,
            MulliganDepth::Five => 5,
        }
    }

    /// 1 for a seven-card hand, 2 for six, 3 for five
    pub fn mulligan_number(&self) -> u8 {
        match self {
            MulliganDepth::Seven => 1,
            MulliganDepth::Six => 2,
            MulliganDepth::Five => 3,
        }
    }

    pub fn from_mulligan_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(MulliganDepth::Seven),
            2 => Some(MulliganDepth::Six),
            3 => Some(MulliganDepth::Five),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayOrDraw {
    Play,
    Draw,
}

impl fmt::Display for PlayOrDraw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayOrDraw::Play => write!(f, "play"),
            PlayOrDraw::Draw => write!(f, "draw"),
        }
    }
}

/// Integer weights for the 7/6/5 card categories
///
/// Integers keep the categories exact: 60/30/10 is sampled as 60, 30 and 10
/// parts of 100 with no float rounding between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthWeights {
    pub seven: u32,
    pub six: u32,
    pub five: u32,
}

impl Default for DepthWeights {
    fn default() -> Self {
        DepthWeights { seven: 60, six: 30, five: 10 }
    }
}

impl DepthWeights {
    /// Distribution that always yields `depth`
    pub fn fixed(depth: MulliganDepth) -> Self {
        let mut weights = DepthWeights { seven: 0, six: 0, five: 0 };
        match depth {
            MulliganDepth::Seven => weights.seven = 1,
            MulliganDepth::Six => weights.six = 1,
            MulliganDepth::Five => weights.five = 1,
        }
        weights
    }

    fn distribution(&self) -> Result<WeightedIndex<u32>, SamplingError> {
        WeightedIndex::new([self.seven, self.six, self.five]).map_err(|_| SamplingError::NoWeight)
    }
}

/// Everything randomized for one hand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandDraw {
    pub seed: u64,
    pub depth: MulliganDepth,
    pub play_or_draw: PlayOrDraw,
    /// Card names in draw order
    pub cards: Vec<String>,
}

impl HandDraw {
    pub fn mulligan_number(&self) -> u8 {
        self.depth.mulligan_number()
    }
}

/// Deal one hand from `deck`, fully determined by `seed`
///
/// Draw order within the seeded stream is fixed: mulligan depth, then
/// play/draw, then the card sample.
pub fn draw_hand(deck: &Deck, seed: u64, weights: &DepthWeights) -> Result<HandDraw, SamplingError> {
    let dist = weights.distribution()?;
    let mut rng = HandRng::new(seed);

    let depth = MulliganDepth::ALL[rng.weighted(&dist)];
    let play_or_draw = if rng.random() < 0.5 { PlayOrDraw::Play } else { PlayOrDraw::Draw };

    let library = deck.expand();
    let requested = depth.card_count();
    if requested > library.len() {
        return Err(SamplingError::NotEnoughCards { requested, available: library.len() });
    }

    let cards = rng
        .sample_indices(library.len(), requested)
        .into_iter()
        .map(|i| library[i].to_string())
        .collect();

    Ok(HandDraw { seed: rng.seed(), depth, play_or_draw, cards })
}
