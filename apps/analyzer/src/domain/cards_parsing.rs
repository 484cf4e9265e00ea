//! Card parsing from string representations (e.g., "AS", "TD", "7H")

use std::str::FromStr;

use super::cards_types::{Card, Rank, Suit};
use crate::domain::errors::DomainError;

impl FromStr for Card {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(rank_ch), Some(suit_ch), None) = (chars.next(), chars.next(), chars.next())
        else {
            return Err(DomainError::ParseCard(s.to_string()));
        };
        let rank = match rank_ch {
            '7' => Rank::Seven,
            '8' => Rank::Eight,
            '9' => Rank::Nine,
            'T' => Rank::Ten,
            'J' => Rank::Jack,
            'Q' => Rank::Queen,
            'K' => Rank::King,
            'A' => Rank::Ace,
            _ => return Err(DomainError::ParseCard(s.to_string())),
        };
        let suit = Suit::from_char(suit_ch).ok_or_else(|| DomainError::ParseCard(s.to_string()))?;
        Ok(Card { suit, rank })
    }
}

impl Suit {
    pub fn from_char(ch: char) -> Option<Suit> {
        match ch {
            'S' | '♠' => Some(Suit::Spades),
            'H' | '♥' => Some(Suit::Hearts),
            'C' | '♣' => Some(Suit::Clubs),
            'D' | '♦' => Some(Suit::Diamonds),
            _ => None,
        }
    }

    pub const fn to_char(self) -> char {
        match self {
            Suit::Spades => 'S',
            Suit::Hearts => 'H',
            Suit::Clubs => 'C',
            Suit::Diamonds => 'D',
        }
    }
}

impl Rank {
    pub const fn to_char(self) -> char {
        match self {
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }
}

/// Suits arrive as single letters, symbols, English names or wire indices.
impl FromStr for Suit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            if let Some(suit) = Suit::from_char(ch.to_ascii_uppercase()) {
                return Ok(suit);
            }
            if let Some(suit) = ch.to_digit(10).and_then(|d| Suit::from_wire_index(i64::from(d))) {
                return Ok(suit);
            }
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "spades" | "spade" => Ok(Suit::Spades),
            "hearts" | "heart" => Ok(Suit::Hearts),
            "clubs" | "club" => Ok(Suit::Clubs),
            "diamonds" | "diamond" => Ok(Suit::Diamonds),
            _ => Err(DomainError::ParseSuit(s.to_string())),
        }
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.rank.to_char(), self.suit.to_char())
    }
}
