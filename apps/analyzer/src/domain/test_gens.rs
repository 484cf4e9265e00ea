// Proptest generators for domain types.
// Deals are generated by shuffling the real 32-card deck, so cards are unique by construction.

use proptest::prelude::*;

use crate::domain::{Card, Mode, Rank, Seat, Suit};

/// Generate a random Suit
pub fn suit() -> impl Strategy<Value = Suit> {
    prop_oneof![
        Just(Suit::Spades),
        Just(Suit::Hearts),
        Just(Suit::Clubs),
        Just(Suit::Diamonds),
    ]
}

/// Generate a random Rank from the 8-rank deck
pub fn rank() -> impl Strategy<Value = Rank> {
    prop::sample::select(Rank::ALL.to_vec())
}

pub fn card() -> impl Strategy<Value = Card> {
    (suit(), rank()).prop_map(|(suit, rank)| Card { suit, rank })
}

pub fn mode() -> impl Strategy<Value = Mode> {
    prop_oneof![Just(Mode::Sun), Just(Mode::Hokum)]
}

pub fn seat() -> impl Strategy<Value = Seat> {
    0u8..4
}

/// A shuffled full deck.
pub fn shuffled_deck() -> impl Strategy<Value = Vec<Card>> {
    Just(Card::deck()).prop_shuffle()
}

/// Four distinct cards, indexed by seat.
pub fn trick_cards() -> impl Strategy<Value = [Card; 4]> {
    shuffled_deck().prop_map(|deck| [deck[0], deck[1], deck[2], deck[3]])
}

/// A full round worth of tricks: 8 tricks × 4 seats, plus a winner per trick.
pub fn round_tricks() -> impl Strategy<Value = Vec<([Card; 4], Seat)>> {
    (shuffled_deck(), prop::collection::vec(seat(), 8)).prop_map(|(deck, winners)| {
        deck.chunks(4)
            .zip(winners)
            .map(|(chunk, w)| ([chunk[0], chunk[1], chunk[2], chunk[3]], w))
            .collect()
    })
}
