//! Card is a question/answer pair with a mastery flag. Belongs to exactly one deck.

#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    pub id: i64,
    pub deck_id: i64,
    pub question: String,
    pub answer: String,
    pub mastered: bool,
}
