use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Melds a player may announce during the first trick.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    /// Three in sequence.
    Sira,
    /// Four in sequence.
    Fifty,
    /// Five in sequence, or four of a kind (T, K, Q, J).
    Hundred,
    /// Four aces (Sun only; counts as a hundred in Hokum).
    FourHundred,
    /// K+Q of trump held by one player.
    Baloot,
}

impl DeclarationKind {
    /// Abnat value before conversion to game points. The baloot pair is scored
    /// separately and carries no abnat.
    pub const fn raw_value(self) -> u32 {
        match self {
            DeclarationKind::Sira => 20,
            DeclarationKind::Fifty => 50,
            DeclarationKind::Hundred => 100,
            DeclarationKind::FourHundred => 400,
            DeclarationKind::Baloot => 0,
        }
    }
}

impl FromStr for DeclarationKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match norm.as_str() {
            "sira" | "sra" | "seq3" | "20" => Ok(DeclarationKind::Sira),
            "fifty" | "khamsin" | "seq4" | "50" => Ok(DeclarationKind::Fifty),
            "hundred" | "miya" | "seq5" | "100" => Ok(DeclarationKind::Hundred),
            "four_hundred" | "fourhundred" | "400" => Ok(DeclarationKind::FourHundred),
            "baloot" | "balot" => Ok(DeclarationKind::Baloot),
            _ => Err(DomainError::ParseDeclaration(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spellings() {
        assert_eq!("Four-Hundred".parse(), Ok(DeclarationKind::FourHundred));
        assert_eq!("50".parse(), Ok(DeclarationKind::Fifty));
        assert_eq!("balot".parse(), Ok(DeclarationKind::Baloot));
        assert!("carre".parse::<DeclarationKind>().is_err());
    }
}
