//! Independent trick resolution.

use crate::domain::{is_trump, seat_offset, Card, Mode, Rank, Seat, Suit, PLAYERS};

/// Flat order: A > 10 > K > Q > J > 9 > 8 > 7.
const fn flat_order(rank: Rank) -> u8 {
    match rank {
        Rank::Ace => 8,
        Rank::Ten => 7,
        Rank::King => 6,
        Rank::Queen => 5,
        Rank::Jack => 4,
        Rank::Nine => 3,
        Rank::Eight => 2,
        Rank::Seven => 1,
    }
}

/// Trump order: J > 9 > A > 10 > K > Q > 8 > 7.
const fn trump_order(rank: Rank) -> u8 {
    match rank {
        Rank::Jack => 8,
        Rank::Nine => 7,
        Rank::Ace => 6,
        Rank::Ten => 5,
        Rank::King => 4,
        Rank::Queen => 3,
        Rank::Eight => 2,
        Rank::Seven => 1,
    }
}

/// Strength of a card in a trick; zero cannot win.
pub fn card_strength(card: Card, lead: Suit, mode: Mode, trump: Option<Suit>) -> u8 {
    if is_trump(card, mode, trump) {
        100 + trump_order(card.rank)
    } else if card.suit == lead {
        flat_order(card.rank)
    } else {
        0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unresolvable {
    NoLeader,
    InvalidCard { seat: Seat, index: i32 },
}

impl std::fmt::Display for Unresolvable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unresolvable::NoLeader => write!(f, "leader unknown"),
            Unresolvable::InvalidCard { seat, index } => {
                write!(f, "seat {seat} holds non-deck index {index}")
            }
        }
    }
}

/// Winner of a trick with cards by absolute seat. Plays are walked from the
/// leader clockwise; the earlier play keeps a tie.
pub fn recompute_winner(
    cards: &[i32; PLAYERS],
    leader: Option<Seat>,
    mode: Mode,
    trump: Option<Suit>,
) -> Result<Seat, Unresolvable> {
    let leader = leader.ok_or(Unresolvable::NoLeader)?;
    let mut parsed = [None; PLAYERS];
    for (seat, &index) in cards.iter().enumerate() {
        parsed[seat] = Some(Card::from_index(index).ok_or(Unresolvable::InvalidCard {
            seat: seat as Seat,
            index,
        })?);
    }
    let lead = parsed
        .get(leader as usize)
        .copied()
        .flatten()
        .map(|c| c.suit)
        .ok_or(Unresolvable::NoLeader)?;

    let mut best = (leader, 0u8);
    for offset in 0..PLAYERS as i8 {
        let seat = seat_offset(leader, offset);
        let Some(card) = parsed[seat as usize] else {
            continue;
        };
        let strength = card_strength(card, lead, mode, trump);
        if strength > best.1 {
            best = (seat, strength);
        }
    }
    Ok(best.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(tokens: [&str; 4]) -> [i32; 4] {
        tokens.map(|t| i32::from(t.parse::<Card>().unwrap().index()))
    }

    #[test]
    fn sun_highest_of_lead_suit() {
        let c = cards(["AS", "KS", "QS", "JS"]);
        assert_eq!(recompute_winner(&c, Some(0), Mode::Sun, None), Ok(0));
        let c = cards(["9S", "TS", "AH", "7S"]);
        assert_eq!(recompute_winner(&c, Some(0), Mode::Sun, None), Ok(1));
    }

    #[test]
    fn hokum_trump_overrides_lead() {
        for rank in ["7", "8", "Q"] {
            let c = cards(["AH", &format!("{rank}D"), "KH", "TH"]);
            assert_eq!(
                recompute_winner(&c, Some(0), Mode::Hokum, Some(Suit::Diamonds)),
                Ok(1)
            );
        }
    }

    #[test]
    fn trump_ranking_puts_jack_and_nine_on_top() {
        let c = cards(["AD", "9D", "JD", "TD"]);
        assert_eq!(
            recompute_winner(&c, Some(0), Mode::Hokum, Some(Suit::Diamonds)),
            Ok(2)
        );
        // In Sun the same cards follow the flat order.
        assert_eq!(recompute_winner(&c, Some(0), Mode::Sun, None), Ok(0));
    }

    #[test]
    fn off_suit_never_wins_and_leader_matters() {
        let c = cards(["7C", "AS", "8C", "AH"]);
        assert_eq!(recompute_winner(&c, Some(0), Mode::Sun, None), Ok(2));
        assert_eq!(recompute_winner(&c, Some(1), Mode::Sun, None), Ok(1));
    }

    #[test]
    fn unresolvable_inputs() {
        let c = cards(["7C", "AS", "8C", "AH"]);
        assert_eq!(
            recompute_winner(&c, None, Mode::Sun, None),
            Err(Unresolvable::NoLeader)
        );
        assert_eq!(
            recompute_winner(&c, Some(4), Mode::Sun, None),
            Err(Unresolvable::NoLeader)
        );
        assert_eq!(
            recompute_winner(&c, Some(Seat::MAX), Mode::Hokum, Some(Suit::Clubs)),
            Err(Unresolvable::NoLeader)
        );
        let bad = [2, 12, 25, 38];
        assert_eq!(
            recompute_winner(&bad, Some(1), Mode::Sun, None),
            Err(Unresolvable::InvalidCard { seat: 0, index: 2 })
        );
    }
}
