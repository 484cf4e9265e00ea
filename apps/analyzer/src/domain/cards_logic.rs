use crate::domain::rules::Mode;
use crate::domain::{Card, Rank, Suit};

/// Flat point table, used in Sun and for every non-trump card in Hokum.
pub const fn flat_points(rank: Rank) -> u32 {
    match rank {
        Rank::Ace => 11,
        Rank::Ten => 10,
        Rank::King => 4,
        Rank::Queen => 3,
        Rank::Jack => 2,
        Rank::Nine | Rank::Eight | Rank::Seven => 0,
    }
}

/// Inflated point table for trump cards in Hokum.
pub const fn trump_points(rank: Rank) -> u32 {
    match rank {
        Rank::Jack => 20,
        Rank::Nine => 14,
        Rank::Ace => 11,
        Rank::Ten => 10,
        Rank::King => 4,
        Rank::Queen => 3,
        Rank::Eight | Rank::Seven => 0,
    }
}

#[inline]
pub fn is_trump(card: Card, mode: Mode, trump: Option<Suit>) -> bool {
    mode.has_trump() && trump == Some(card.suit)
}

pub fn card_points(card: Card, mode: Mode, trump: Option<Suit>) -> u32 {
    if is_trump(card, mode, trump) {
        trump_points(card.rank)
    } else {
        flat_points(card.rank)
    }
}

/// Card points of a set of card indices; indices that are not cards count zero.
pub fn trick_points(cards: &[i32], mode: Mode, trump: Option<Suit>) -> u32 {
    cards
        .iter()
        .filter_map(|&idx| Card::from_index(idx))
        .map(|c| card_points(c, mode, trump))
        .sum()
}
