//! Application service: one method per externally visible operation.
//!
//! Owns the database connection and wires the store, the study selector and
//! the serializer together. No business rules live here beyond dispatch and
//! the import transaction; errors from the components bubble up unchanged
//! for the caller to translate.

use crate::database::db;
use crate::error::Result;
use crate::export::json::{self, DeckDocument};
use crate::models::{Card, Deck, DeckSummary};
use crate::study;
use rusqlite::Connection;
use std::path::Path;

/// Deck with its progress counter, as shown on the deck page.
#[derive(Clone, Debug)]
pub struct DeckDetail {
    pub deck: Deck,
    pub mastered_count: usize,
}

pub struct App {
    conn: Connection,
}

impl App {
    /// Opens the application against a database file, creating it if needed.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = db::open_database(path)?;
        Ok(Self { conn })
    }

    /// In-memory instance for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = db::open_in_memory()?;
        Ok(Self { conn })
    }

    pub fn list_decks(&self, filter: Option<&str>) -> Result<Vec<DeckSummary>> {
        db::list_decks(&self.conn, filter)
    }

    pub fn create_deck(&self, name: &str) -> Result<Deck> {
        let deck = db::create_deck(&self.conn, name)?;
        tracing::info!(deck_id = deck.id, name = %deck.name, "deck created");
        Ok(deck)
    }

    pub fn deck_detail(&self, deck_id: i64) -> Result<DeckDetail> {
        let deck = db::get_deck(&self.conn, deck_id)?;
        let mastered_count = study::mastered_count(&deck);
        Ok(DeckDetail {
            deck,
            mastered_count,
        })
    }

    pub fn delete_deck(&self, deck_id: i64) -> Result<()> {
        db::delete_deck(&self.conn, deck_id)?;
        tracing::info!(deck_id, "deck deleted");
        Ok(())
    }

    pub fn add_card(&self, deck_id: i64, question: &str, answer: &str) -> Result<Card> {
        let card = db::add_card(&self.conn, deck_id, question, answer)?;
        tracing::debug!(card_id = card.id, deck_id, "card added");
        Ok(card)
    }

    pub fn edit_card(&self, card_id: i64, question: &str, answer: &str) -> Result<Card> {
        db::edit_card(&self.conn, card_id, question, answer)
    }

    pub fn toggle_mastered(&self, card_id: i64) -> Result<Card> {
        db::toggle_mastered(&self.conn, card_id)
    }

    pub fn delete_card(&self, card_id: i64) -> Result<()> {
        db::delete_card(&self.conn, card_id)
    }

    /// Cards to present for a study session over the given deck.
    pub fn study_sequence(
        &self,
        deck_id: i64,
        shuffle: bool,
        only_unmastered: bool,
    ) -> Result<Vec<Card>> {
        let deck = db::get_deck(&self.conn, deck_id)?;
        Ok(study::select_study_sequence(
            &deck,
            shuffle,
            only_unmastered,
            &mut rand::thread_rng(),
        ))
    }

    /// Returns the suggested filename and the JSON text for a deck export.
    pub fn export_deck(&self, deck_id: i64) -> Result<(String, String)> {
        let deck = db::get_deck(&self.conn, deck_id)?;
        let json = json::to_json(&json::export_document(&deck))?;
        Ok((json::export_filename(&deck.name), json))
    }

    /// Imports a deck document, creating a fresh deck and fresh cards.
    ///
    /// Parsing and validation run before any write. The writes happen in a
    /// single transaction, so a failure part-way persists nothing.
    pub fn import_deck(&mut self, input: &str) -> Result<Deck> {
        let document = json::parse_document(input)?;
        self.import_document(&document)
    }

    /// Transactional tail of the import, also used for documents read from a
    /// file by the CLI.
    pub fn import_document(&mut self, document: &DeckDocument) -> Result<Deck> {
        let tx = self.conn.transaction()?;

        let deck = db::create_deck(&tx, &document.deck_name)?;
        let mut cards = Vec::with_capacity(document.cards.len());
        for entry in &document.cards {
            cards.push(db::insert_card(
                &tx,
                deck.id,
                &entry.question,
                &entry.answer,
                entry.mastered,
            )?);
        }

        tx.commit()?;
        tracing::info!(
            deck_id = deck.id,
            name = %document.deck_name,
            cards = cards.len(),
            "deck imported"
        );

        Ok(Deck { cards, ..deck })
    }
}
