pub mod app;
pub mod database;
pub mod error;
pub mod export;
pub mod models;
pub mod study;

pub use app::{App, DeckDetail};
pub use error::{AppError, Result};
pub use models::{Card, Deck, DeckSummary};
