use proptest::prelude::*;

use crate::domain::{card_points, test_gens, test_prelude, Card};

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: index -> card -> index is lossless for every card in the deck.
    #[test]
    fn prop_card_index_round_trip(card in test_gens::card()) {
        let idx = i32::from(card.index());
        prop_assert_eq!(Card::from_index(idx), Some(card));
    }

    /// Property: any index outside the deck never produces a card.
    #[test]
    fn prop_non_deck_indices_have_no_card(idx in any::<i32>()) {
        if let Some(card) = Card::from_index(idx) {
            prop_assert_eq!(i32::from(card.index()), idx);
            prop_assert!((idx % 13) >= 5);
        }
    }

    /// Property: however the deck is split into tricks, points sum to the deck total.
    #[test]
    fn prop_round_card_points_sum_to_deck_total(
        tricks in test_gens::round_tricks(),
        mode in test_gens::mode(),
        trump in test_gens::suit(),
    ) {
        let trump = mode.has_trump().then_some(trump);
        let total: u32 = tricks
            .iter()
            .flat_map(|(cards, _)| cards.iter())
            .map(|&c| card_points(c, mode, trump))
            .sum();
        prop_assert_eq!(total, mode.deck_total());
    }
}
