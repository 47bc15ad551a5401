use clap::{Parser, Subcommand};
use mulligan_sim::decklist::load_deck_file;
use mulligan_sim::deck::Deck;
use mulligan_sim::export::{read_json, write_json};
use mulligan_sim::prompt::ConsolePrompt;
use mulligan_sim::rng::SeedSource;
use mulligan_sim::simulation::{
    draw_hand, DepthWeights, RunSnapshot, SessionConfig, Simulator,
};
use std::io;

#[derive(Parser)]
#[command(name = "mulligan-sim")]
#[command(about = "MTG opening hand mulligan simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deal hands and record keep/mulligan decisions
    Run {
        /// Decklist file, one "COUNT CARD_NAME" per line
        #[arg(short, long)]
        file: String,

        /// Number of hands to simulate
        #[arg(short = 'n', long, default_value = "10")]
        hands: u32,

        /// Save results to this JSON file
        #[arg(short, long)]
        save: Option<String>,

        /// Name for the deck
        #[arg(long)]
        deck_name: Option<String>,

        /// Seed for the first hand; later hands use the following seeds
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Re-deal the hand a recorded seed produced
    Replay {
        /// Decklist file the seed was recorded with
        #[arg(short, long)]
        file: String,

        /// Recorded seed
        #[arg(long)]
        seed: u64,
    },

    /// Print a saved results file
    Show {
        /// JSON file written by `run --save`
        path: String,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { file, hands, save, deck_name, seed } => {
            run_session(&file, hands, save.as_deref(), deck_name, seed);
        }
        Commands::Replay { file, seed } => replay(&file, seed),
        Commands::Show { path } => show(&path),
    }
}

fn load_deck(file: &str) -> Deck {
    match load_deck_file(file) {
        Ok(deck) => {
            eprintln!("✓ Loaded deck with {} cards", deck.len());
            deck
        }
        Err(e) => {
            eprintln!("✗ Failed to load deck file '{}': {}", file, e);
            std::process::exit(1);
        }
    }
}

fn run_session(file: &str, hands: u32, save: Option<&str>, deck_name: Option<String>, seed: Option<u64>) {
    let deck = load_deck(file);
    let deck_name = deck_name
        .unwrap_or_else(|| format!("Deck {}", chrono::Local::now().format("%Y-%m-%d %H:%M")));

    println!("\n=== Mulligan Simulation: {} ===\n", deck_name);
    println!("Hands: {}", hands);
    if let Some(s) = seed {
        println!("Seed: {}", s);
    }

    let simulator = Simulator::new(deck, deck_name, SessionConfig::new(hands), SeedSource::from_base(seed));
    log::debug!("dealing {} hands from {} cards", hands, simulator.deck().len());
    let stdin = io::stdin();
    let mut console = ConsolePrompt::new(stdin.lock(), io::stdout());

    let run = match simulator.run_to_completion(&mut console) {
        Ok(run) => run,
        Err(e) => {
            eprintln!("✗ Simulation failed: {}", e);
            std::process::exit(1);
        }
    };
    log::info!(
        "run '{}' started {} finished with {} of {} hands",
        run.deck_name(),
        run.created_at().to_rfc3339(),
        run.results().len(),
        run.total_hands()
    );

    let snapshot = run.close();
    print_summary(&snapshot);

    if let Some(path) = save {
        match write_json(&snapshot, path) {
            Ok(()) => println!("\nResults saved to {}", path),
            Err(e) => {
                eprintln!("✗ Failed to save results to '{}': {}", path, e);
                std::process::exit(1);
            }
        }
    }
}

fn print_summary(snapshot: &RunSnapshot) {
    let recorded = snapshot.results.len();
    println!("\n=== Results ===\n");
    if recorded < snapshot.total_hands as usize {
        println!("Stopped early: {} of {} hands recorded", recorded, snapshot.total_hands);
    }
    let kept = snapshot.keep_count();
    println!("Kept: {}  Mulliganed: {}", kept, recorded - kept);
}

fn replay(file: &str, seed: u64) {
    let deck = load_deck(file);
    let hand = match draw_hand(&deck, seed, &DepthWeights::default()) {
        Ok(hand) => hand,
        Err(e) => {
            eprintln!("✗ Could not deal seed {}: {}", seed, e);
            std::process::exit(1);
        }
    };

    println!("Seed: {}", hand.seed);
    println!("On the: {}", hand.play_or_draw.to_string().to_uppercase());
    println!("Mulligan: #{} ({} cards)", hand.mulligan_number(), hand.cards.len());
    for (i, card) in hand.cards.iter().enumerate() {
        println!("  {}. {}", i + 1, card);
    }
}

fn show(path: &str) {
    let snapshot = match read_json(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("✗ Failed to read '{}': {}", path, e);
            std::process::exit(1);
        }
    };

    println!("\n=== Run from {} ===\n", snapshot.timestamp.format("%Y-%m-%d %H:%M"));
    println!("{:>5} {:>10} {:>6} {:>9} {:>9}  Kept", "Hand", "Seed", "Cards", "On the", "Decision");
    println!("{:-<60}", "");
    for r in &snapshot.results {
        let kept = r
            .cards_to_keep()
            .map(|cards| cards.join(", "))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>5} {:>10} {:>6} {:>9} {:>9}  {}",
            r.hand_number(),
            r.seed(),
            r.cards_in_hand(),
            r.play_or_draw().to_string(),
            r.user_decision().to_string(),
            kept
        );
    }
    print_summary(&snapshot);
}
