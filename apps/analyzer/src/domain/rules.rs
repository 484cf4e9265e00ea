use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

pub const PLAYERS: usize = 4;
pub const TEAMS: usize = 2;
pub const HAND_SIZE: u8 = 8;
pub const TRICKS_PER_ROUND: usize = 8;

/// Bonus added to the team that takes the final trick of a complete round.
pub const LAST_TRICK_BONUS: u32 = 10;

/// Fixed flat result of the maximum doubling escalation (gahwa).
pub const GAHWA_GP: i32 = 152;

/// Fixed value of the trump K+Q pair, never doubled or transferred.
pub const BALOOT_GP: i32 = 2;

/// Contract mode of a round.
///
/// Sun is the flat no-trump mode; Hokum elevates one suit to trump with
/// inflated card values and an override ranking.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Sun,
    Hokum,
}

impl Mode {
    /// Sum of card points in a full deck under this mode (last-trick bonus excluded).
    pub const fn deck_total(self) -> u32 {
        match self {
            Mode::Sun => 120,
            Mode::Hokum => 152,
        }
    }

    /// Game points both teams share in a complete, undoubled round.
    pub const fn gp_target(self) -> i32 {
        match self {
            Mode::Sun => 26,
            Mode::Hokum => 16,
        }
    }

    /// Flat award for a folded (kaboot) round.
    pub const fn kaboot_gp(self) -> i32 {
        match self {
            Mode::Sun => 44,
            Mode::Hokum => 25,
        }
    }

    /// Truncating divisor converting declaration values into game points.
    pub const fn declaration_divisor(self) -> u32 {
        match self {
            Mode::Sun => 5,
            Mode::Hokum => 10,
        }
    }

    pub const fn has_trump(self) -> bool {
        matches!(self, Mode::Hokum)
    }
}

impl FromStr for Mode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sun" | "san" | "ashkal" | "s" | "1" => Ok(Mode::Sun),
            "hokum" | "hokom" | "hakam" | "h" | "2" => Ok(Mode::Hokum),
            _ => Err(DomainError::ParseMode(s.to_string())),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Sun => write!(f, "sun"),
            Mode::Hokum => write!(f, "hokum"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_constants() {
        assert_eq!(Mode::Sun.deck_total(), 120);
        assert_eq!(Mode::Hokum.deck_total(), 152);
        assert_eq!(Mode::Sun.gp_target(), 26);
        assert_eq!(Mode::Hokum.gp_target(), 16);
        // deck + last trick, divided per mode, lands on the target
        assert_eq!((Mode::Sun.deck_total() + LAST_TRICK_BONUS) / 5, 26);
        assert_eq!((Mode::Hokum.deck_total() + LAST_TRICK_BONUS) / 10, 16);
    }

    #[test]
    fn mode_spellings() {
        assert_eq!("Hokom".parse::<Mode>().unwrap(), Mode::Hokum);
        assert_eq!("ashkal".parse::<Mode>().unwrap(), Mode::Sun);
        assert!("trump".parse::<Mode>().is_err());
    }
}
