use serde::Serialize;
use tracing::debug;

use crate::domain::{
    other_team, team_of, trick_points, DeclarationKind, Mode, Suit, TeamId, BALOOT_GP, GAHWA_GP,
    LAST_TRICK_BONUS,
};
use crate::extraction::{Escalation, ExtractedRound};
use crate::scoring::declarations::declaration_gp;
use crate::scoring::rounding::card_gp;

/// Everything the engine derived for one round.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PointAnalysis {
    pub round_no: usize,
    pub mode: Option<Mode>,
    pub trump: Option<Suit>,
    pub bidding_team: Option<TeamId>,
    pub complete: bool,
    pub folded: bool,
    pub void: bool,
    /// Card points (abnat) per team, without the last-trick bonus.
    pub card_points: [u32; 2],
    pub last_trick_team: Option<TeamId>,
    /// Card points plus the last-trick bonus.
    pub raw_totals: [u32; 2],
    pub card_gp: [i32; 2],
    pub declaration_gp: [i32; 2],
    pub baloot_gp: [i32; 2],
    pub pre_transfer_gp: [i32; 2],
    pub transferred: bool,
    pub escalation: Escalation,
    pub final_gp: [i32; 2],
    /// Complete rounds only: card points equal the deck total.
    pub card_points_consistent: Option<bool>,
    /// Complete, non-folded rounds only: card GP sums to the mode's target.
    pub gp_sum_consistent: Option<bool>,
    pub recorded_gp: Option<[i32; 2]>,
    pub matches_recorded: Option<bool>,
}

impl PointAnalysis {
    /// Mode was known, so the numbers mean something.
    pub fn is_scored(&self) -> bool {
        self.mode.is_some() || self.void
    }
}

/// Score one extracted round.
pub fn score_round(round: &ExtractedRound) -> PointAnalysis {
    let resolution = round.bids.resolve();
    let mut pa = PointAnalysis {
        round_no: round.round_no,
        mode: round.effective_mode(),
        trump: round.effective_trump(),
        bidding_team: resolution.bidding_team(),
        complete: round.is_complete(),
        folded: round.fold.is_some(),
        void: round.void || resolution.void,
        escalation: resolution.escalation,
        recorded_gp: round.recorded_gp,
        ..PointAnalysis::default()
    };

    let finish = |mut pa: PointAnalysis| {
        pa.matches_recorded = pa.recorded_gp.map(|r| r == pa.final_gp);
        pa
    };

    if pa.void {
        pa.escalation = Escalation::None;
        return finish(pa);
    }
    let Some(mode) = pa.mode else {
        return finish(pa);
    };

    for trick in &round.tricks {
        pa.card_points[team_of(trick.winner)] += trick_points(&trick.cards, mode, pa.trump);
    }
    pa.raw_totals = pa.card_points;
    if pa.complete {
        if let Some(last) = round.tricks.last() {
            let team = team_of(last.winner);
            pa.last_trick_team = Some(team);
            pa.raw_totals[team] += LAST_TRICK_BONUS;
        }
        let total = pa.card_points[0] + pa.card_points[1];
        pa.card_points_consistent = Some(total == mode.deck_total());
    }

    for decl in &round.declarations {
        let team = team_of(decl.seat);
        pa.declaration_gp[team] += declaration_gp(decl.kind, mode);
        if decl.kind == DeclarationKind::Baloot && mode == Mode::Hokum {
            pa.baloot_gp[team] += BALOOT_GP;
        }
    }

    if let Some(fold) = round.fold {
        pa.escalation = Escalation::None;
        let mut gp = pa.declaration_gp;
        gp[fold.winning_team] += mode.kaboot_gp();
        pa.pre_transfer_gp = gp;
        pa.final_gp = [gp[0] + pa.baloot_gp[0], gp[1] + pa.baloot_gp[1]];
        debug!(round_no = pa.round_no, final_gp = ?pa.final_gp, "folded round scored");
        return finish(pa);
    }

    pa.card_gp = card_gp(mode, pa.raw_totals, pa.complete);
    if pa.complete {
        pa.gp_sum_consistent = Some(pa.card_gp[0] + pa.card_gp[1] == mode.gp_target());
    }
    let pre = [
        pa.card_gp[0] + pa.declaration_gp[0],
        pa.card_gp[1] + pa.declaration_gp[1],
    ];
    pa.pre_transfer_gp = pre;

    let mut adjusted = pre;
    if let Some(bt) = pa.bidding_team {
        let opp = other_team(bt);
        let failed = if pre[bt] != pre[opp] {
            pre[bt] < pre[opp]
        } else {
            match mode {
                Mode::Sun => pa.raw_totals[bt] < pa.raw_totals[opp],
                Mode::Hokum => {
                    pa.escalation != Escalation::None && resolution.doubling_team() == Some(bt)
                }
            }
        };
        if failed {
            adjusted[opp] = pre[bt] + pre[opp];
            adjusted[bt] = 0;
            pa.transferred = true;
        }
    }

    pa.final_gp = if pa.escalation == Escalation::None {
        [
            adjusted[0] + pa.baloot_gp[0],
            adjusted[1] + pa.baloot_gp[1],
        ]
    } else {
        // An escalated round leaves one nonzero side: the winner takes the pot.
        let winner = if adjusted[0] != adjusted[1] {
            usize::from(adjusted[1] > adjusted[0])
        } else {
            pa.bidding_team.unwrap_or(0)
        };
        let mut gp = [0, 0];
        match pa.escalation.factor() {
            Some(factor) => {
                gp[winner] = (adjusted[0] + adjusted[1]) * factor;
                gp[0] += pa.baloot_gp[0];
                gp[1] += pa.baloot_gp[1];
            }
            None => gp[winner] = GAHWA_GP,
        }
        gp
    };
    debug!(
        round_no = pa.round_no,
        ?mode,
        raw = ?pa.raw_totals,
        final_gp = ?pa.final_gp,
        transferred = pa.transferred,
        "round scored"
    );
    finish(pa)
}
