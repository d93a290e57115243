//! JSON import/export module for flashcard decks.
//!
//! A deck travels as a small interchange document: the deck name plus its
//! cards in order. Identities never leave the database; importing always
//! creates a fresh deck and fresh cards. Input that is not JSON at all is a
//! `MalformedDocument` error; JSON with missing or blank required fields is a
//! `Validation` error naming the first failure.

use crate::error::{AppError, Result};
use crate::models::Deck;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Portable representation of a deck. This is the on-disk export format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeckDocument {
    pub deck_name: String,
    pub cards: Vec<CardEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardEntry {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub mastered: bool,
}

// Loose mirror of the document used during import, so that a missing field
// is a validation failure with a usable message instead of a serde error.
#[derive(Deserialize)]
struct RawDocument {
    deck_name: Option<String>,
    cards: Option<Vec<RawCard>>,
}

#[derive(Deserialize)]
struct RawCard {
    question: Option<String>,
    answer: Option<String>,
    #[serde(default)]
    mastered: bool,
}

/// Builds the interchange document for a deck, cards in current order.
pub fn export_document(deck: &Deck) -> DeckDocument {
    DeckDocument {
        deck_name: deck.name.clone(),
        cards: deck
            .cards
            .iter()
            .map(|card| CardEntry {
                question: card.question.clone(),
                answer: card.answer.clone(),
                mastered: card.mastered,
            })
            .collect(),
    }
}

/// Suggested download filename: whitespace becomes underscores, `.json` added.
pub fn export_filename(deck_name: &str) -> String {
    let stem: String = deck_name
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    format!("{stem}.json")
}

pub fn to_json(document: &DeckDocument) -> Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Parses and validates an uploaded document.
pub fn parse_document(input: &str) -> Result<DeckDocument> {
    let raw: RawDocument = serde_json::from_str(input)?;
    validate(raw)
}

fn validate(raw: RawDocument) -> Result<DeckDocument> {
    let deck_name = raw
        .deck_name
        .ok_or_else(|| AppError::Validation("deck_name is missing".into()))?;
    if deck_name.trim().is_empty() {
        return Err(AppError::Validation("deck_name must not be empty".into()));
    }

    let raw_cards = raw
        .cards
        .ok_or_else(|| AppError::Validation("cards is missing".into()))?;

    let mut cards = Vec::with_capacity(raw_cards.len());
    for (index, entry) in raw_cards.into_iter().enumerate() {
        let position = index + 1;
        let question = entry.question.ok_or_else(|| {
            AppError::Validation(format!("card {position}: question is missing"))
        })?;
        if question.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "card {position}: question must not be empty"
            )));
        }
        let answer = entry
            .answer
            .ok_or_else(|| AppError::Validation(format!("card {position}: answer is missing")))?;
        if answer.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "card {position}: answer must not be empty"
            )));
        }

        cards.push(CardEntry {
            question,
            answer,
            mastered: entry.mastered,
        });
    }

    Ok(DeckDocument { deck_name, cards })
}

/// Exports a deck as JSON to the given path.
pub fn export_to_path(deck: &Deck, path: &Path) -> Result<()> {
    let json = to_json(&export_document(deck))?;
    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Reads and validates a deck document from a file.
pub fn read_document(path: &Path) -> Result<DeckDocument> {
    let mut contents = String::new();
    File::open(path)?.read_to_string(&mut contents)?;
    parse_document(&contents)
}
