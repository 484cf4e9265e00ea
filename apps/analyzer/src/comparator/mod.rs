//! Independent trick recomputation against the extracted ground truth.

pub mod divergence;
pub mod report;
pub mod scorecard;
pub mod trick_winner;

pub use divergence::{divergence_id, Divergence, DivergenceKind, DivergenceLog, Severity};
pub use report::{compare_session, ComparisonReport, RoundPointCheck, TrickComparison};
pub use scorecard::{CategoryScore, Grade, Scorecard};
pub use trick_winner::{card_strength, recompute_winner, Unresolvable};
