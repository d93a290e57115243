//! Deck is a named set of cards owned by the store
use super::Card;

#[derive(Clone, Debug, PartialEq)]
pub struct Deck {
    pub id: i64,
    pub name: String,
    /// Cards in insertion order.
    pub cards: Vec<Card>,
}

/// Listing shape: one row per deck, no card bodies.
#[derive(Clone, Debug, PartialEq)]
pub struct DeckSummary {
    pub id: i64,
    pub name: String,
    pub card_count: usize,
}
