//! Command-line front-end for the flashdecks application.

use clap::{Parser, Subcommand};
use flashdecks::export::json;
use flashdecks::{App, AppError, Card};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "flashdecks", about = "Flashcard decks: create, study, share")]
struct Cli {
    /// Path to the SQLite database file.
    #[arg(long, default_value = "flashcards.db")]
    db: PathBuf,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List decks, optionally filtered by a name substring.
    Decks {
        #[arg(long)]
        filter: Option<String>,
    },
    /// Create a new empty deck.
    CreateDeck { name: String },
    /// Show a deck with its cards and progress.
    Show { deck_id: i64 },
    /// Add a card to a deck.
    AddCard {
        deck_id: i64,
        question: String,
        answer: String,
    },
    /// Replace a card's question and answer.
    EditCard {
        card_id: i64,
        question: String,
        answer: String,
    },
    /// Flip a card's mastered flag.
    ToggleMastered { card_id: i64 },
    /// Delete a deck and all of its cards.
    DeleteDeck { deck_id: i64 },
    /// Delete a single card.
    DeleteCard { card_id: i64 },
    /// Print the card sequence for a study session.
    Study {
        deck_id: i64,
        /// Present the cards in random order.
        #[arg(long)]
        shuffle: bool,
        /// Only include cards not yet mastered.
        #[arg(long)]
        unmastered: bool,
    },
    /// Export a deck to a JSON file.
    Export {
        deck_id: i64,
        /// Output path; defaults to the deck name with underscores.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Import a deck from a JSON file.
    Import { path: PathBuf },
}

fn init_logger(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("flashdecks=debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("flashdecks=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .compact(),
        )
        .init();
}

fn print_card(card: &Card) {
    let marker = if card.mastered { "[x]" } else { "[ ]" };
    println!("  {} #{} {} -> {}", marker, card.id, card.question, card.answer);
}

fn run(cli: Cli) -> flashdecks::Result<()> {
    let mut app = App::open(&cli.db)?;

    match cli.command {
        Command::Decks { filter } => {
            let decks = app.list_decks(filter.as_deref())?;
            if decks.is_empty() {
                println!("No decks.");
            }
            for deck in decks {
                println!("#{} {} ({} cards)", deck.id, deck.name, deck.card_count);
            }
        }
        Command::CreateDeck { name } => {
            let deck = app.create_deck(&name)?;
            println!("Deck '{}' created with id {}.", deck.name, deck.id);
        }
        Command::Show { deck_id } => {
            let detail = app.deck_detail(deck_id)?;
            println!(
                "#{} {}: {}/{} mastered",
                detail.deck.id,
                detail.deck.name,
                detail.mastered_count,
                detail.deck.cards.len()
            );
            for card in &detail.deck.cards {
                print_card(card);
            }
        }
        Command::AddCard {
            deck_id,
            question,
            answer,
        } => {
            let card = app.add_card(deck_id, &question, &answer)?;
            println!("Card {} added to deck {}.", card.id, deck_id);
        }
        Command::EditCard {
            card_id,
            question,
            answer,
        } => {
            let card = app.edit_card(card_id, &question, &answer)?;
            print_card(&card);
        }
        Command::ToggleMastered { card_id } => {
            let card = app.toggle_mastered(card_id)?;
            print_card(&card);
        }
        Command::DeleteDeck { deck_id } => {
            app.delete_deck(deck_id)?;
            println!("Deck {deck_id} deleted.");
        }
        Command::DeleteCard { card_id } => {
            app.delete_card(card_id)?;
            println!("Card {card_id} deleted.");
        }
        Command::Study {
            deck_id,
            shuffle,
            unmastered,
        } => {
            let sequence = app.study_sequence(deck_id, shuffle, unmastered)?;
            if sequence.is_empty() {
                println!("Nothing to study.");
            }
            for card in &sequence {
                print_card(card);
            }
        }
        Command::Export { deck_id, output } => {
            let (filename, json) = app.export_deck(deck_id)?;
            let path = output.unwrap_or_else(|| PathBuf::from(&filename));
            std::fs::write(&path, json)?;
            println!("Deck exported to '{}'.", path.display());
        }
        Command::Import { path } => {
            let document = json::read_document(&path)?;
            let deck = app.import_document(&document)?;
            println!(
                "Deck '{}' imported with id {} ({} cards).",
                deck.name,
                deck.id,
                deck.cards.len()
            );
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        let code = match error {
            e if e.is_not_found() => 2,
            AppError::Validation(_) | AppError::MalformedDocument(_) => 3,
            _ => 1,
        };
        std::process::exit(code);
    }
}
