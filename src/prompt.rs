//! Interactive decision source reading answers from a terminal.

use crate::simulation::{Decision, DecisionSource, HandPrompt, Reply, SelectionError};
use std::io::{BufRead, Write};

/// Asks keep/mulligan questions over any line-based reader and writer
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        ConsolePrompt { input, output }
    }

    /// Next trimmed line, or None on end of input or a read error
    fn read_line(&mut self, question: &str) -> Option<String> {
        self.say(format_args!("{}", question));
        let _ = self.output.flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(e) => {
                log::warn!("failed to read answer: {}", e);
                None
            }
        }
    }

    fn say(&mut self, args: std::fmt::Arguments<'_>) {
        if let Err(e) = self.output.write_fmt(args) {
            log::warn!("failed to write prompt: {}", e);
        }
    }

    fn show_hand(&mut self, prompt: &HandPrompt<'_>) {
        let hand = prompt.hand;
        self.say(format_args!("\nHand #{} of {}\n", prompt.hand_number, prompt.total_hands));
        self.say(format_args!("Seed: {}\n", hand.seed));
        self.say(format_args!("On the: {}\n", hand.play_or_draw.to_string().to_uppercase()));
        self.say(format_args!(
            "Mulligan: #{} ({} cards)\n",
            hand.mulligan_number(),
            hand.cards.len()
        ));
        for (i, card) in hand.cards.iter().enumerate() {
            self.say(format_args!("  {}. {}\n", i + 1, card));
        }
    }
}

fn parse_decision(answer: &str) -> Option<Decision> {
    match answer.to_lowercase().as_str() {
        "keep" | "k" => Some(Decision::Keep),
        "mulligan" | "m" => Some(Decision::Mulligan),
        _ => None,
    }
}

fn is_quit(answer: &str) -> bool {
    matches!(answer.to_lowercase().as_str(), "quit" | "q")
}

/// Turn `"1 3 4"` into hand positions 0, 2, 3
fn parse_positions(answer: &str, hand_size: usize) -> Result<Vec<usize>, String> {
    let mut positions = Vec::new();
    for token in answer.split_whitespace() {
        let n: usize = token
            .parse()
            .map_err(|_| format!("'{}' is not a card number", token))?;
        if n == 0 || n > hand_size {
            return Err(format!("{} is not between 1 and {}", n, hand_size));
        }
        if positions.contains(&(n - 1)) {
            return Err(format!("card {} listed twice", n));
        }
        positions.push(n - 1);
    }
    Ok(positions)
}

impl<R: BufRead, W: Write> DecisionSource for ConsolePrompt<R, W> {
    fn present(&mut self, prompt: &HandPrompt<'_>) -> Reply<Decision> {
        self.show_hand(prompt);
        loop {
            let Some(answer) = self.read_line("\nDecision (keep/mulligan, q to quit): ") else {
                return Reply::Abort;
            };
            if is_quit(&answer) {
                return Reply::Abort;
            }
            match parse_decision(&answer) {
                Some(decision) => {
                    self.say(format_args!("Recorded: {}\n", decision.to_string().to_uppercase()));
                    return Reply::Answer(decision);
                }
                None => self.say(format_args!("Please enter 'keep' or 'mulligan'\n")),
            }
        }
    }

    fn select_keep(&mut self, prompt: &HandPrompt<'_>) -> Reply<Vec<String>> {
        self.say(format_args!(
            "Which cards would you have kept? Enter card numbers in hand order, separated by spaces (blank for none)\n"
        ));
        loop {
            let Some(answer) = self.read_line("Cards to keep: ") else {
                return Reply::Abort;
            };
            if is_quit(&answer) {
                return Reply::Abort;
            }
            match parse_positions(&answer, prompt.cards().len()) {
                Ok(positions) => {
                    return Reply::Answer(positions.iter().map(|&i| prompt.cards()[i].clone()).collect());
                }
                Err(reason) => self.say(format_args!("Invalid input: {}\n", reason)),
            }
        }
    }

    fn retry_selection(&mut self, error: &SelectionError) -> bool {
        log::debug!("keep selection rejected: {}", error);
        self.say(format_args!("Cards must be listed in the order they appear in the hand\n"));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{HandDraw, MulliganDepth, PlayOrDraw};
    use std::io::Cursor;

    fn hand() -> HandDraw {
        HandDraw {
            seed: 42,
            depth: MulliganDepth::Seven,
            play_or_draw: PlayOrDraw::Draw,
            cards: [
                "Lightning Bolt",
                "Mountain",
                "Goblin Guide",
                "Mountain",
                "Lightning Bolt",
                "Mountain",
                "Goblin Guide",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }

    fn console(input: &str) -> ConsolePrompt<Cursor<Vec<u8>>, Vec<u8>> {
        ConsolePrompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_decision_shortcuts() {
        let hand = hand();
        let prompt = HandPrompt { hand_number: 1, total_hands: 3, hand: &hand };

        let mut c = console("k\nMULLIGAN\nm\nkeep\n");
        assert_eq!(c.present(&prompt), Reply::Answer(Decision::Keep));
        assert_eq!(c.present(&prompt), Reply::Answer(Decision::Mulligan));
        assert_eq!(c.present(&prompt), Reply::Answer(Decision::Mulligan));
        assert_eq!(c.present(&prompt), Reply::Answer(Decision::Keep));
    }

    #[test]
    fn test_invalid_decision_reprompts() {
        let hand = hand();
        let prompt = HandPrompt { hand_number: 1, total_hands: 1, hand: &hand };

        let mut c = console("maybe\nkeep\n");
        assert_eq!(c.present(&prompt), Reply::Answer(Decision::Keep));
        let shown = String::from_utf8(c.output).unwrap();
        assert!(shown.contains("Please enter 'keep' or 'mulligan'"));
        assert!(shown.contains("1. Lightning Bolt"));
        assert!(shown.contains("On the: DRAW"));
    }

    #[test]
    fn test_end_of_input_aborts() {
        let hand = hand();
        let prompt = HandPrompt { hand_number: 1, total_hands: 1, hand: &hand };

        assert_eq!(console("").present(&prompt), Reply::Abort);
        assert_eq!(console("q\n").present(&prompt), Reply::Abort);
        assert_eq!(console("").select_keep(&prompt), Reply::Abort);
    }

    #[test]
    fn test_select_keep_by_position() {
        let hand = hand();
        let prompt = HandPrompt { hand_number: 1, total_hands: 1, hand: &hand };

        let mut c = console("2 4\n");
        assert_eq!(
            c.select_keep(&prompt),
            Reply::Answer(vec!["Mountain".to_string(), "Mountain".to_string()])
        );
    }

    #[test]
    fn test_select_keep_rejects_bad_numbers() {
        let hand = hand();
        let prompt = HandPrompt { hand_number: 1, total_hands: 1, hand: &hand };

        let mut c = console("0\n8\n1 1\nabc\n1 3\n");
        assert_eq!(
            c.select_keep(&prompt),
            Reply::Answer(vec!["Lightning Bolt".to_string(), "Goblin Guide".to_string()])
        );
        let shown = String::from_utf8(c.output).unwrap();
        assert_eq!(shown.matches("Invalid input").count(), 4);
    }

    #[test]
    fn test_blank_selection_keeps_nothing() {
        let hand = hand();
        let prompt = HandPrompt { hand_number: 1, total_hands: 1, hand: &hand };
        assert_eq!(console("\n").select_keep(&prompt), Reply::Answer(vec![]));
    }
}
