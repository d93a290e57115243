//! Database operations for the flashdecks application
//!
//! Handles SQLite database initialization and CRUD operations for decks and
//! cards. Decks own their cards: the schema declares ON DELETE CASCADE, so
//! deleting a deck can never leave orphan cards behind.

use crate::error::{AppError, Result};
use crate::models::{Card, Deck, DeckSummary};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;

/// Opens (or creates) the database file and applies the schema.
pub fn open_database(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    init_schema(&conn)?;
    Ok(conn)
}

/// In-memory database with the same schema, used by tests.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}

fn init_schema(conn: &Connection) -> Result<()> {
    // Cascade only fires with the pragma enabled; SQLite defaults to off.
    conn.execute_batch("PRAGMA foreign_keys = ON")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS decks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        )",
        (),
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS cards (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            deck_id INTEGER NOT NULL REFERENCES decks(id) ON DELETE CASCADE,
            question TEXT NOT NULL,
            answer TEXT NOT NULL,
            mastered INTEGER NOT NULL DEFAULT 0
        )",
        (),
    )?;

    Ok(())
}

/// Creates a new deck with no cards. The name must not be blank.
pub fn create_deck(conn: &Connection, name: &str) -> Result<Deck> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("deck name must not be empty".into()));
    }

    conn.execute("INSERT INTO decks (name) VALUES (?1)", params![name])?;
    let id = conn.last_insert_rowid();

    Ok(Deck {
        id,
        name: name.to_string(),
        cards: Vec::new(),
    })
}

/// Retrieves a deck with its cards in insertion order.
pub fn get_deck(conn: &Connection, deck_id: i64) -> Result<Deck> {
    let name: String = conn
        .query_row(
            "SELECT name FROM decks WHERE id = ?1",
            params![deck_id],
            |row| row.get(0),
        )
        .optional()?
        .ok_or(AppError::DeckNotFound(deck_id))?;

    let mut stmt = conn.prepare(
        "SELECT id, question, answer, mastered FROM cards WHERE deck_id = ?1 ORDER BY id",
    )?;
    let cards = stmt
        .query_map(params![deck_id], |row| {
            Ok(Card {
                id: row.get(0)?,
                deck_id,
                question: row.get(1)?,
                answer: row.get(2)?,
                mastered: row.get(3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<Card>>>()?;

    Ok(Deck {
        id: deck_id,
        name,
        cards,
    })
}

/// Lists all decks with their card counts, oldest first.
///
/// An optional filter restricts the result to decks whose name contains the
/// given text, matched case-insensitively.
pub fn list_decks(conn: &Connection, filter: Option<&str>) -> Result<Vec<DeckSummary>> {
    let base = "SELECT d.id, d.name, COUNT(c.id)
         FROM decks d LEFT JOIN cards c ON c.deck_id = d.id";

    let map_row = |row: &rusqlite::Row<'_>| {
        Ok(DeckSummary {
            id: row.get(0)?,
            name: row.get(1)?,
            card_count: row.get::<_, i64>(2)? as usize,
        })
    };

    let decks = match filter {
        Some(pattern) => {
            let sql = format!(
                "{base} WHERE instr(lower(d.name), lower(?1)) > 0
                 GROUP BY d.id, d.name ORDER BY d.id"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![pattern], map_row)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        }
        None => {
            let sql = format!("{base} GROUP BY d.id, d.name ORDER BY d.id");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], map_row)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        }
    };

    Ok(decks)
}

/// Deletes a deck; the schema cascade removes its cards in the same statement.
pub fn delete_deck(conn: &Connection, deck_id: i64) -> Result<()> {
    let affected = conn.execute("DELETE FROM decks WHERE id = ?1", params![deck_id])?;
    if affected == 0 {
        return Err(AppError::DeckNotFound(deck_id));
    }
    Ok(())
}

/// Adds a card to a deck, unmastered.
pub fn add_card(conn: &Connection, deck_id: i64, question: &str, answer: &str) -> Result<Card> {
    insert_card(conn, deck_id, question, answer, false)
}

/// Inserts a card with an explicit mastered flag. Used by deck import, which
/// preserves the flag from the document.
pub fn insert_card(
    conn: &Connection,
    deck_id: i64,
    question: &str,
    answer: &str,
    mastered: bool,
) -> Result<Card> {
    if question.trim().is_empty() {
        return Err(AppError::Validation("card question must not be empty".into()));
    }
    if answer.trim().is_empty() {
        return Err(AppError::Validation("card answer must not be empty".into()));
    }

    let deck_exists: Option<i64> = conn
        .query_row(
            "SELECT id FROM decks WHERE id = ?1",
            params![deck_id],
            |row| row.get(0),
        )
        .optional()?;
    if deck_exists.is_none() {
        return Err(AppError::DeckNotFound(deck_id));
    }

    conn.execute(
        "INSERT INTO cards (deck_id, question, answer, mastered) VALUES (?1, ?2, ?3, ?4)",
        params![deck_id, question, answer, mastered],
    )?;

    Ok(Card {
        id: conn.last_insert_rowid(),
        deck_id,
        question: question.to_string(),
        answer: answer.to_string(),
        mastered,
    })
}

/// Retrieves a single card by id.
pub fn get_card(conn: &Connection, card_id: i64) -> Result<Card> {
    conn.query_row(
        "SELECT id, deck_id, question, answer, mastered FROM cards WHERE id = ?1",
        params![card_id],
        |row| {
            Ok(Card {
                id: row.get(0)?,
                deck_id: row.get(1)?,
                question: row.get(2)?,
                answer: row.get(3)?,
                mastered: row.get(4)?,
            })
        },
    )
    .optional()?
    .ok_or(AppError::CardNotFound(card_id))
}

/// Replaces a card's question and answer, leaving the mastered flag as is.
pub fn edit_card(conn: &Connection, card_id: i64, question: &str, answer: &str) -> Result<Card> {
    if question.trim().is_empty() {
        return Err(AppError::Validation("card question must not be empty".into()));
    }
    if answer.trim().is_empty() {
        return Err(AppError::Validation("card answer must not be empty".into()));
    }

    let affected = conn.execute(
        "UPDATE cards SET question = ?1, answer = ?2 WHERE id = ?3",
        params![question, answer, card_id],
    )?;
    if affected == 0 {
        return Err(AppError::CardNotFound(card_id));
    }

    get_card(conn, card_id)
}

/// Flips a card's mastered flag. No other state changes.
pub fn toggle_mastered(conn: &Connection, card_id: i64) -> Result<Card> {
    let affected = conn.execute(
        "UPDATE cards SET mastered = NOT mastered WHERE id = ?1",
        params![card_id],
    )?;
    if affected == 0 {
        return Err(AppError::CardNotFound(card_id));
    }

    get_card(conn, card_id)
}

/// Deletes a single card without touching its deck.
pub fn delete_card(conn: &Connection, card_id: i64) -> Result<()> {
    let affected = conn.execute("DELETE FROM cards WHERE id = ?1", params![card_id])?;
    if affected == 0 {
        return Err(AppError::CardNotFound(card_id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_get_deck() {
        let conn = open_in_memory().unwrap();

        let deck = create_deck(&conn, "Spanish").unwrap();
        let loaded = get_deck(&conn, deck.id).unwrap();

        assert_eq!(loaded.name, "Spanish");
        assert!(loaded.cards.is_empty());
    }

    #[test]
    fn test_create_deck_rejects_blank_name() {
        let conn = open_in_memory().unwrap();

        let result = create_deck(&conn, "   ");
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_get_deck_not_found() {
        let conn = open_in_memory().unwrap();

        let result = get_deck(&conn, 42);
        assert!(matches!(result, Err(AppError::DeckNotFound(42))));
    }

    #[test]
    fn test_cards_kept_in_insertion_order() {
        let conn = open_in_memory().unwrap();
        let deck = create_deck(&conn, "Order").unwrap();

        add_card(&conn, deck.id, "q1", "a1").unwrap();
        add_card(&conn, deck.id, "q2", "a2").unwrap();
        add_card(&conn, deck.id, "q3", "a3").unwrap();

        let loaded = get_deck(&conn, deck.id).unwrap();
        let questions: Vec<&str> = loaded.cards.iter().map(|c| c.question.as_str()).collect();
        assert_eq!(questions, vec!["q1", "q2", "q3"]);
    }

    #[test]
    fn test_list_decks_with_counts() {
        let conn = open_in_memory().unwrap();
        let spanish = create_deck(&conn, "Spanish").unwrap();
        create_deck(&conn, "French").unwrap();
        add_card(&conn, spanish.id, "hola", "hello").unwrap();

        let decks = list_decks(&conn, None).unwrap();
        assert_eq!(decks.len(), 2);
        assert_eq!(decks[0].name, "Spanish");
        assert_eq!(decks[0].card_count, 1);
        assert_eq!(decks[1].card_count, 0);
    }

    #[test]
    fn test_list_decks_filter_is_case_insensitive() {
        let conn = open_in_memory().unwrap();
        create_deck(&conn, "Spanish Vocabulary").unwrap();
        create_deck(&conn, "French Vocabulary").unwrap();
        create_deck(&conn, "Geography").unwrap();

        let hits = list_decks(&conn, Some("VOCAB")).unwrap();
        assert_eq!(hits.len(), 2);

        let hits = list_decks(&conn, Some("span")).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Spanish Vocabulary");

        let hits = list_decks(&conn, Some("no such deck")).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_delete_deck_cascades_to_cards() {
        let conn = open_in_memory().unwrap();
        let deck = create_deck(&conn, "Doomed").unwrap();
        let card = add_card(&conn, deck.id, "q", "a").unwrap();

        delete_deck(&conn, deck.id).unwrap();

        assert!(matches!(
            get_deck(&conn, deck.id),
            Err(AppError::DeckNotFound(_))
        ));
        assert!(matches!(
            get_card(&conn, card.id),
            Err(AppError::CardNotFound(_))
        ));
    }

    #[test]
    fn test_add_card_to_missing_deck() {
        let conn = open_in_memory().unwrap();

        let result = add_card(&conn, 99, "q", "a");
        assert!(matches!(result, Err(AppError::DeckNotFound(99))));
    }

    #[test]
    fn test_add_card_rejects_blank_fields() {
        let conn = open_in_memory().unwrap();
        let deck = create_deck(&conn, "Deck").unwrap();

        assert!(matches!(
            add_card(&conn, deck.id, "", "a"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            add_card(&conn, deck.id, "q", "  "),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_edit_card() {
        let conn = open_in_memory().unwrap();
        let deck = create_deck(&conn, "Deck").unwrap();
        let card = add_card(&conn, deck.id, "old q", "old a").unwrap();

        let updated = edit_card(&conn, card.id, "new q", "new a").unwrap();
        assert_eq!(updated.question, "new q");
        assert_eq!(updated.answer, "new a");
        assert!(!updated.mastered);
    }

    #[test]
    fn test_toggle_mastered_flips_and_flips_back() {
        let conn = open_in_memory().unwrap();
        let deck = create_deck(&conn, "Deck").unwrap();
        let card = add_card(&conn, deck.id, "q", "a").unwrap();

        let toggled = toggle_mastered(&conn, card.id).unwrap();
        assert!(toggled.mastered);

        let toggled = toggle_mastered(&conn, card.id).unwrap();
        assert!(!toggled.mastered);
    }

    #[test]
    fn test_card_operations_not_found() {
        let conn = open_in_memory().unwrap();

        assert!(matches!(
            edit_card(&conn, 7, "q", "a"),
            Err(AppError::CardNotFound(7))
        ));
        assert!(matches!(
            toggle_mastered(&conn, 7),
            Err(AppError::CardNotFound(7))
        ));
        assert!(matches!(
            delete_card(&conn, 7),
            Err(AppError::CardNotFound(7))
        ));
    }

    #[test]
    fn test_delete_card_leaves_deck_intact() {
        let conn = open_in_memory().unwrap();
        let deck = create_deck(&conn, "Deck").unwrap();
        let keep = add_card(&conn, deck.id, "keep", "a").unwrap();
        let gone = add_card(&conn, deck.id, "drop", "a").unwrap();

        delete_card(&conn, gone.id).unwrap();

        let loaded = get_deck(&conn, deck.id).unwrap();
        assert_eq!(loaded.cards.len(), 1);
        assert_eq!(loaded.cards[0].id, keep.id);
    }
}
