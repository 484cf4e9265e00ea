//! Scoring engine: tricks and declarations into per-team game points.

pub mod declarations;
pub mod rounding;
pub mod round_score;

#[cfg(test)]
mod tests_props_scoring;

use serde::Serialize;

pub use declarations::declaration_gp;
pub use round_score::{score_round, PointAnalysis};
pub use rounding::{card_gp, hokum_pair_gp, hokum_side_gp, sun_gp};

use crate::extraction::ExtractedRound;

/// Per-round analyses plus the running match total.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionScore {
    pub rounds: Vec<PointAnalysis>,
    pub totals: [i32; 2],
}

pub fn score_session(rounds: &[ExtractedRound]) -> SessionScore {
    let rounds: Vec<PointAnalysis> = rounds.iter().map(score_round).collect();
    let totals = rounds.iter().fold([0, 0], |acc, pa| {
        [acc[0] + pa.final_gp[0], acc[1] + pa.final_gp[1]]
    });
    SessionScore { rounds, totals }
}
