pub mod deck;
pub mod decklist;
pub mod export;
pub mod prompt;
pub mod rng;
pub mod simulation;
