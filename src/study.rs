//! Study-sequence selection.
//!
//! Pure functions over an in-memory deck: filter out mastered cards if asked,
//! then optionally shuffle. Filtering runs before shuffling, so the shuffle
//! flag never changes which cards are eligible. The random source is passed
//! in by the caller, which lets tests drive selection with a fixed seed.

use crate::models::{Card, Deck};
use rand::Rng;
use rand::seq::SliceRandom;

/// Builds the ordered sequence of cards for a study session.
///
/// Without flags this is the deck's cards in insertion order. With
/// `only_unmastered` the mastered cards are dropped, keeping the relative
/// order of the rest. With `shuffle` the (possibly filtered) sequence gets a
/// uniform random permutation. An empty result is a valid outcome.
pub fn select_study_sequence<R: Rng>(
    deck: &Deck,
    shuffle: bool,
    only_unmastered: bool,
    rng: &mut R,
) -> Vec<Card> {
    let mut cards: Vec<Card> = deck
        .cards
        .iter()
        .filter(|card| !only_unmastered || !card.mastered)
        .cloned()
        .collect();

    if shuffle {
        cards.shuffle(rng);
    }

    cards
}

/// Number of mastered cards in the deck, for progress display.
pub fn mastered_count(deck: &Deck) -> usize {
    deck.cards.iter().filter(|card| card.mastered).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn card(id: i64, mastered: bool) -> Card {
        Card {
            id,
            deck_id: 1,
            question: format!("q{id}"),
            answer: format!("a{id}"),
            mastered,
        }
    }

    fn deck(cards: Vec<Card>) -> Deck {
        Deck {
            id: 1,
            name: "Test".to_string(),
            cards,
        }
    }

    fn ids(cards: &[Card]) -> Vec<i64> {
        cards.iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_no_flags_returns_cards_in_original_order() {
        let deck = deck(vec![card(1, false), card(2, true), card(3, false)]);
        let mut rng = StdRng::seed_from_u64(0);

        let sequence = select_study_sequence(&deck, false, false, &mut rng);
        assert_eq!(ids(&sequence), vec![1, 2, 3]);
    }

    #[test]
    fn test_unmastered_filter_keeps_relative_order() {
        let deck = deck(vec![
            card(1, true),
            card(2, false),
            card(3, true),
            card(4, false),
            card(5, false),
        ]);
        let mut rng = StdRng::seed_from_u64(0);

        let sequence = select_study_sequence(&deck, false, true, &mut rng);
        assert_eq!(ids(&sequence), vec![2, 4, 5]);
    }

    #[test]
    fn test_shuffle_is_a_permutation_of_the_filtered_set() {
        let deck = deck(vec![
            card(1, true),
            card(2, false),
            card(3, false),
            card(4, true),
            card(5, false),
        ]);

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let sequence = select_study_sequence(&deck, true, true, &mut rng);

            let mut got = ids(&sequence);
            got.sort_unstable();
            assert_eq!(got, vec![2, 3, 5]);
        }
    }

    #[test]
    fn test_shuffle_preserves_length_without_filter() {
        let deck = deck((1..=10).map(|id| card(id, id % 2 == 0)).collect());
        let mut rng = StdRng::seed_from_u64(7);

        let sequence = select_study_sequence(&deck, true, false, &mut rng);
        assert_eq!(sequence.len(), 10);

        let mut got = ids(&sequence);
        got.sort_unstable();
        assert_eq!(got, (1..=10).collect::<Vec<i64>>());
    }

    #[test]
    fn test_empty_results_are_valid() {
        let empty = deck(Vec::new());
        let all_mastered = deck(vec![card(1, true), card(2, true)]);
        let mut rng = StdRng::seed_from_u64(0);

        assert!(select_study_sequence(&empty, true, false, &mut rng).is_empty());
        assert!(select_study_sequence(&all_mastered, false, true, &mut rng).is_empty());
    }

    #[test]
    fn test_mastered_count_matches_flags() {
        let deck = deck(vec![
            card(1, true),
            card(2, false),
            card(3, true),
            card(4, false),
        ]);

        assert_eq!(mastered_count(&deck), 2);
        assert_eq!(mastered_count(&Deck { cards: Vec::new(), ..deck }), 0);
    }
}
