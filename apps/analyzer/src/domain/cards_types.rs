//! Core card-related types: Card, Rank, Suit
//!
//! The wire protocol addresses cards by a 0..=51 index (`suit * 13 + rank`,
//! rank 0 = Two). Only the 32 cards from Seven upwards exist in this game.

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

pub const CARD_INDEX_SPAN: i32 = 52;
const RANKS_PER_SUIT: i32 = 13;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Spades,
    Hearts,
    Clubs,
    Diamonds,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Clubs, Suit::Diamonds];

    /// Position of the suit in the wire index (`suit * 13 + rank`).
    pub const fn wire_index(self) -> u8 {
        match self {
            Suit::Spades => 0,
            Suit::Hearts => 1,
            Suit::Clubs => 2,
            Suit::Diamonds => 3,
        }
    }

    pub fn from_wire_index(idx: i64) -> Option<Suit> {
        match idx {
            0 => Some(Suit::Spades),
            1 => Some(Suit::Hearts),
            2 => Some(Suit::Clubs),
            3 => Some(Suit::Diamonds),
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Rank {
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 8] = [
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Rank position within a 13-card suit block (Two = 0 .. Ace = 12).
    pub const fn wire_index(self) -> u8 {
        match self {
            Rank::Seven => 5,
            Rank::Eight => 6,
            Rank::Nine => 7,
            Rank::Ten => 8,
            Rank::Jack => 9,
            Rank::Queen => 10,
            Rank::King => 11,
            Rank::Ace => 12,
        }
    }

    /// Ranks Two..=Six are not part of the deck and map to `None`.
    pub fn from_wire_index(idx: i32) -> Option<Rank> {
        match idx {
            5 => Some(Rank::Seven),
            6 => Some(Rank::Eight),
            7 => Some(Rank::Nine),
            8 => Some(Rank::Ten),
            9 => Some(Rank::Jack),
            10 => Some(Rank::Queen),
            11 => Some(Rank::King),
            12 => Some(Rank::Ace),
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub const fn new(suit: Suit, rank: Rank) -> Self {
        Self { suit, rank }
    }

    /// Decode a wire card index. Out-of-range indices and excluded ranks yield `None`.
    pub fn from_index(index: i32) -> Option<Card> {
        if !(0..CARD_INDEX_SPAN).contains(&index) {
            return None;
        }
        let suit = Suit::from_wire_index(i64::from(index / RANKS_PER_SUIT))?;
        let rank = Rank::from_wire_index(index % RANKS_PER_SUIT)?;
        Some(Card { suit, rank })
    }

    pub const fn index(self) -> u8 {
        self.suit.wire_index() * 13 + self.rank.wire_index()
    }

    /// Strict variant of [`Card::from_index`] for callers that want an error value.
    pub fn try_from_index(index: i32) -> Result<Card, DomainError> {
        Card::from_index(index).ok_or(DomainError::InvalidCardIndex(index))
    }

    /// The full 32-card deck in suit-then-rank order.
    pub fn deck() -> Vec<Card> {
        Suit::ALL
            .iter()
            .flat_map(|&suit| Rank::ALL.iter().map(move |&rank| Card { suit, rank }))
            .collect()
    }
}

// Note: Ord on Card is only for stable sorting: suit order S<H<C<D then rank order.
// Do not use for trick resolution; strength depends on mode, trump and lead.
impl Ord for Card {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.suit.cmp(&other.suit) {
            std::cmp::Ordering::Equal => self.rank.cmp(&other.rank),
            ord => ord,
        }
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
