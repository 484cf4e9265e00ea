//! Bid normalization and contract resolution.

use serde::{Deserialize, Serialize};

use crate::domain::{team_of, Mode, Seat, Suit, TeamId};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BidAction {
    Pass,
    Sun,
    /// Sun bought for the partner; still a Sun contract.
    Ashkal,
    Hokum,
    /// Hokum bought in the second bidding sub-round.
    SecondHokum,
    SuitSelect(Suit),
    Double,
    Triple,
    Four,
    Gahwa,
    /// Everyone passed twice: the deal is void.
    AllPass,
    Unknown,
}

impl BidAction {
    /// Map a raw bid string from either ingestion path onto the closed vocabulary.
    pub fn normalize(raw: &str) -> BidAction {
        let norm = raw.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match norm.as_str() {
            "pass" | "wala" | "bass" | "thany" => BidAction::Pass,
            "sun" | "san" => BidAction::Sun,
            "ashkal" | "ashkel" => BidAction::Ashkal,
            "hokum" | "hokom" | "hakam" => BidAction::Hokum,
            "hokum2" | "hokum_2" | "second_hokum" | "hokum_second" => BidAction::SecondHokum,
            "double" | "dbl" | "x2" | "bel" => BidAction::Double,
            "triple" | "x3" | "three" => BidAction::Triple,
            "four" | "x4" => BidAction::Four,
            "gahwa" | "qahwa" | "coffee" => BidAction::Gahwa,
            "all_pass" | "allpass" | "redeal" => BidAction::AllPass,
            other => other
                .parse::<Suit>()
                .map(BidAction::SuitSelect)
                .unwrap_or(BidAction::Unknown),
        }
    }

    /// Wire doubling level (`2` double through `5` gahwa).
    pub fn from_doubling_level(level: i64) -> BidAction {
        match level {
            2 => BidAction::Double,
            3 => BidAction::Triple,
            4 => BidAction::Four,
            5 => BidAction::Gahwa,
            _ => BidAction::Unknown,
        }
    }

    pub fn escalation(self) -> Option<Escalation> {
        match self {
            BidAction::Double => Some(Escalation::Double),
            BidAction::Triple => Some(Escalation::Triple),
            BidAction::Four => Some(Escalation::Four),
            BidAction::Gahwa => Some(Escalation::Gahwa),
            _ => None,
        }
    }
}

/// Doubling escalation of a contract.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Escalation {
    #[default]
    None,
    Double,
    Triple,
    Four,
    /// Maximum level: the round collapses to a flat award.
    Gahwa,
}

impl Escalation {
    /// Multiplier for the intermediate levels; `None` for gahwa, which is not multiplicative.
    pub const fn factor(self) -> Option<i32> {
        match self {
            Escalation::None => Some(1),
            Escalation::Double => Some(2),
            Escalation::Triple => Some(3),
            Escalation::Four => Some(4),
            Escalation::Gahwa => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub seat: Seat,
    pub action: BidAction,
    /// Source string as seen on the wire or in the archive.
    pub raw: String,
    /// Bidding sub-round, 1 or 2.
    pub sub_round: u8,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct BidResolution {
    pub mode: Option<Mode>,
    pub trump: Option<Suit>,
    pub caller: Option<Seat>,
    pub escalation: Escalation,
    /// Seat of the highest escalation bid.
    pub doubler: Option<Seat>,
    pub void: bool,
}

impl BidResolution {
    pub fn bidding_team(&self) -> Option<TeamId> {
        self.caller.map(team_of)
    }

    pub fn doubling_team(&self) -> Option<TeamId> {
        self.doubler.map(team_of)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BidSequence {
    bids: Vec<Bid>,
}

impl BidSequence {
    pub fn push(&mut self, bid: Bid) {
        self.bids.push(bid);
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bids.len()
    }

    pub fn bids(&self) -> &[Bid] {
        &self.bids
    }

    /// Replay the sequence into a contract.
    pub fn resolve(&self) -> BidResolution {
        let mut res = BidResolution::default();
        let mut candidate_trump = None;

        for bid in &self.bids {
            match bid.action {
                BidAction::Sun | BidAction::Ashkal => {
                    res.mode = Some(Mode::Sun);
                    res.trump = None;
                    res.caller = Some(bid.seat);
                }
                BidAction::Hokum | BidAction::SecondHokum => {
                    // Sun outranks Hokum once established.
                    if res.mode != Some(Mode::Sun) {
                        res.mode = Some(Mode::Hokum);
                        res.caller = Some(bid.seat);
                        if candidate_trump.is_some() {
                            res.trump = candidate_trump;
                        }
                    }
                }
                BidAction::SuitSelect(suit) => {
                    candidate_trump = Some(suit);
                    if res.mode == Some(Mode::Hokum) {
                        res.trump = Some(suit);
                    }
                }
                BidAction::Double | BidAction::Triple | BidAction::Four | BidAction::Gahwa => {
                    if let Some(level) = bid.action.escalation() {
                        if level >= res.escalation {
                            res.escalation = level;
                            res.doubler = Some(bid.seat);
                        }
                    }
                }
                BidAction::AllPass => res.void = true,
                BidAction::Pass | BidAction::Unknown => {}
            }
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(bids: &[(Seat, &str)]) -> BidSequence {
        let mut s = BidSequence::default();
        for &(seat, raw) in bids {
            s.push(Bid {
                seat,
                action: BidAction::normalize(raw),
                raw: raw.to_string(),
                sub_round: 1,
            });
        }
        s
    }

    #[test]
    fn normalizes_spellings() {
        assert_eq!(BidAction::normalize(" Hokom "), BidAction::Hokum);
        assert_eq!(BidAction::normalize("second-hokum"), BidAction::SecondHokum);
        assert_eq!(BidAction::normalize("♦"), BidAction::SuitSelect(Suit::Diamonds));
        assert_eq!(BidAction::normalize("hearts"), BidAction::SuitSelect(Suit::Hearts));
        assert_eq!(BidAction::normalize("redeal"), BidAction::AllPass);
        assert_eq!(BidAction::normalize("banana"), BidAction::Unknown);
        assert_eq!(BidAction::from_doubling_level(5), BidAction::Gahwa);
    }

    #[test]
    fn hokum_with_suit() {
        let r = seq(&[(1, "pass"), (2, "hokum"), (2, "spades"), (3, "pass")]).resolve();
        assert_eq!(r.mode, Some(Mode::Hokum));
        assert_eq!(r.trump, Some(Suit::Spades));
        assert_eq!(r.caller, Some(2));
        assert_eq!(r.bidding_team(), Some(0));
        assert!(!r.void);
    }

    #[test]
    fn suit_before_hokum_becomes_trump() {
        let r = seq(&[(1, "clubs"), (1, "hokum2")]).resolve();
        assert_eq!(r.mode, Some(Mode::Hokum));
        assert_eq!(r.trump, Some(Suit::Clubs));
    }

    #[test]
    fn hokum_does_not_displace_sun() {
        let r = seq(&[(0, "hokum"), (1, "sun"), (2, "hokum")]).resolve();
        assert_eq!(r.mode, Some(Mode::Sun));
        assert_eq!(r.caller, Some(1));
        assert_eq!(r.trump, None);
    }

    #[test]
    fn escalation_tracks_highest_level_and_side() {
        let r = seq(&[(0, "hokum"), (0, "h"), (1, "double"), (0, "triple")]).resolve();
        assert_eq!(r.escalation, Escalation::Triple);
        assert_eq!(r.doubler, Some(0));
        assert_eq!(r.doubling_team(), Some(0));
    }

    #[test]
    fn all_pass_voids() {
        let r = seq(&[(0, "pass"), (1, "pass"), (2, "pass"), (3, "all_pass")]).resolve();
        assert!(r.void);
        assert_eq!(r.mode, None);
    }
}
