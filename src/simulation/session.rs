use crate::deck::Deck;
use crate::rng::SeedSource;
use crate::simulation::draw::{draw_hand, DepthWeights, HandDraw, SamplingError};
use crate::simulation::record::{
    is_subsequence, Decision, RecordError, ResultRecord, Run, SelectionError,
};
use chrono::Utc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("Sampling failed: {0}")]
    Sampling(#[from] SamplingError),
    #[error("Could not record hand: {0}")]
    Record(#[from] RecordError),
}

/// Answer from a decision source, or a request to stop the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply<T> {
    Answer(T),
    Abort,
}

/// What a decision source is shown for one hand
#[derive(Debug, Clone, Copy)]
pub struct HandPrompt<'a> {
    pub hand_number: u32,
    pub total_hands: u32,
    pub hand: &'a HandDraw,
}

impl HandPrompt<'_> {
    pub fn cards(&self) -> &[String] {
        &self.hand.cards
    }
}

/// The user (or a program) deciding on each hand
pub trait DecisionSource {
    /// Keep or mulligan the presented hand
    fn present(&mut self, prompt: &HandPrompt<'_>) -> Reply<Decision>;

    /// After a mulligan, the cards of the hand that would have been kept,
    /// in hand order
    fn select_keep(&mut self, prompt: &HandPrompt<'_>) -> Reply<Vec<String>>;

    /// Called when a selection is rejected; return false to stop asking
    fn retry_selection(&mut self, _error: &SelectionError) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Ready,
    Drawing,
    AwaitingDecision,
    AwaitingKeepSelection,
    Recording,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub total_hands: u32,
    pub weights: DepthWeights,
}

impl SessionConfig {
    pub fn new(total_hands: u32) -> Self {
        SessionConfig { total_hands, weights: DepthWeights::default() }
    }
}

/// Drives one run: deal, ask, record, repeat
pub struct Simulator {
    deck: Deck,
    config: SessionConfig,
    seeds: SeedSource,
    run: Run,
    state: SessionState,
}

impl Simulator {
    pub fn new(deck: Deck, deck_name: impl Into<String>, config: SessionConfig, seeds: SeedSource) -> Self {
        let run = Run::new(deck_name, config.total_hands);
        let state = if run.is_complete() { SessionState::Done } else { SessionState::Ready };
        Simulator { deck, config, seeds, run, state }
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn run(&self) -> &Run {
        &self.run
    }

    /// Deal, decide and record a single hand
    ///
    /// Returns the state reached afterwards: `Drawing` if more hands remain,
    /// `Done` once the run is complete or the source aborted. An error also
    /// ends the run; the simulator is left `Done`.
    pub fn play_hand(&mut self, source: &mut dyn DecisionSource) -> Result<SessionState, SimulationError> {
        if self.state == SessionState::Done {
            return Ok(SessionState::Done);
        }
        let result = self.deal_and_record(source);
        if result.is_err() {
            self.finish();
        }
        result
    }

    fn deal_and_record(&mut self, source: &mut dyn DecisionSource) -> Result<SessionState, SimulationError> {
        self.state = SessionState::Drawing;
        let seed = self.seeds.next_seed();
        let hand = draw_hand(&self.deck, seed, &self.config.weights)?;

        let prompt = HandPrompt {
            hand_number: self.run.next_hand_number(),
            total_hands: self.config.total_hands,
            hand: &hand,
        };

        self.state = SessionState::AwaitingDecision;
        let decision = match source.present(&prompt) {
            Reply::Answer(decision) => decision,
            Reply::Abort => return Ok(self.finish()),
        };

        let cards_to_keep = match decision {
            Decision::Keep => None,
            Decision::Mulligan => {
                self.state = SessionState::AwaitingKeepSelection;
                match Self::collect_keep(source, &prompt) {
                    Reply::Answer(kept) => Some(kept),
                    Reply::Abort => return Ok(self.finish()),
                }
            }
        };

        self.state = SessionState::Recording;
        let record = ResultRecord::new(prompt.hand_number, &hand, decision, cards_to_keep, Utc::now())?;
        self.run.push(record)?;

        self.state = if self.run.is_complete() { SessionState::Done } else { SessionState::Drawing };
        Ok(self.state)
    }

    /// Play hands until the run is complete or the source aborts
    pub fn run_to_completion(mut self, source: &mut dyn DecisionSource) -> Result<Run, SimulationError> {
        while self.play_hand(source)? != SessionState::Done {}
        Ok(self.run)
    }

    fn collect_keep(source: &mut dyn DecisionSource, prompt: &HandPrompt<'_>) -> Reply<Vec<String>> {
        loop {
            let kept = match source.select_keep(prompt) {
                Reply::Answer(kept) => kept,
                Reply::Abort => return Reply::Abort,
            };
            if is_subsequence(&kept, prompt.cards()) {
                return Reply::Answer(kept);
            }
            let error = SelectionError::NotSubsequence { kept, hand: prompt.cards().to_vec() };
            if !source.retry_selection(&error) {
                return Reply::Abort;
            }
        }
    }

    fn finish(&mut self) -> SessionState {
        self.state = SessionState::Done;
        self.state
    }
}
