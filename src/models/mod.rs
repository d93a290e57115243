pub mod card;
pub mod deck;

pub use card::Card;
pub use deck::{Deck, DeckSummary};
