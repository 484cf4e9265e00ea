//! Domain layer: pure game vocabulary shared by extraction, scoring and comparison.

pub mod cards_logic;
pub mod cards_parsing;
pub mod cards_serde;
pub mod cards_types;
pub mod declarations;
pub mod errors;
pub mod rules;
pub mod state;

#[cfg(test)]
pub(crate) mod test_gens;
#[cfg(test)]
pub(crate) mod test_prelude;
#[cfg(test)]
mod tests_props_cards;

// Re-exports for ergonomics
pub use cards_logic::{card_points, is_trump, trick_points};
pub use cards_types::{Card, Rank, Suit};
pub use declarations::DeclarationKind;
pub use errors::DomainError;
pub use rules::{
    Mode, BALOOT_GP, GAHWA_GP, HAND_SIZE, LAST_TRICK_BONUS, PLAYERS, TEAMS, TRICKS_PER_ROUND,
};
pub use state::{
    next_player, other_team, partner, relative_seat, round_start_seat, seat_from_i64, seat_offset,
    team_of, Seat, TeamId,
};
