use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::comparator::divergence::{divergence_id, Divergence, DivergenceKind, Severity};
use crate::comparator::trick_winner::recompute_winner;
use crate::config::ComparatorConfig;
use crate::domain::{is_trump, trick_points, Mode, Seat, LAST_TRICK_BONUS, TRICKS_PER_ROUND};
use crate::extraction::{ExtractedRound, ExtractedTrick, ExtractionResult};
use crate::scoring::{score_round, PointAnalysis};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrickComparison {
    pub round_no: usize,
    pub trick_no: usize,
    pub mode: Option<Mode>,
    pub recorded_winner: Seat,
    pub computed_winner: Option<Seat>,
    /// Card points of the trick, last-trick bonus included on trick 8.
    pub points: u32,
    pub agrees: bool,
    /// Weight of the trick, graded whether or not the winners agree.
    pub severity: Severity,
    pub kind: Option<DivergenceKind>,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundPointCheck {
    pub round_no: usize,
    pub mode: Option<Mode>,
    pub complete: bool,
    pub card_points_total: u32,
    pub expected_total: Option<u32>,
    pub gp_sum: i32,
    pub gp_target: Option<i32>,
    /// Complete rounds only.
    pub consistent: Option<bool>,
    pub engine_gp: [i32; 2],
    pub recorded_gp: Option<[i32; 2]>,
    pub recorded_matches: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub session: String,
    pub rounds_compared: usize,
    pub total_tricks: usize,
    pub agreed_tricks: usize,
    pub agreement_pct: f64,
    pub divergence_breakdown: BTreeMap<DivergenceKind, usize>,
    pub point_consistency_pct: f64,
    pub round_checks: Vec<RoundPointCheck>,
    pub comparisons: Vec<TrickComparison>,
    pub divergences: Vec<Divergence>,
}

/// Percentage with an empty denominator counted as full agreement.
pub(crate) fn pct(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        100.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

fn classify(trick: &ExtractedTrick, computed: Seat, mode: Mode) -> DivergenceKind {
    let recorded_card = trick.card_at(trick.winner);
    let computed_card = trick.card_at(computed);
    let any_trump = [recorded_card, computed_card]
        .into_iter()
        .flatten()
        .any(|c| is_trump(c, mode, trick.trump));
    let recorded_follows = recorded_card.is_some_and(|c| Some(c.suit) == trick.lead_suit);

    if any_trump {
        DivergenceKind::TrumpOverride
    } else if !recorded_follows {
        DivergenceKind::OffSuitWinner
    } else {
        DivergenceKind::RankOrder
    }
}

pub(crate) fn compare_trick(
    session: &str,
    round: &ExtractedRound,
    trick: &ExtractedTrick,
    config: &ComparatorConfig,
) -> (TrickComparison, Option<Divergence>) {
    let mode = trick.mode.or(round.mode);
    let trump = trick.trump.or(round.trump);
    let mut points = mode.map_or(0, |m| trick_points(&trick.cards, m, trump));
    if trick.trick_no == TRICKS_PER_ROUND {
        points += LAST_TRICK_BONUS;
    }
    let severity = Severity::classify(points, mode, config.high_severity_points);
    let mut cmp = TrickComparison {
        round_no: round.round_no,
        trick_no: trick.trick_no,
        mode,
        recorded_winner: trick.winner,
        computed_winner: None,
        points,
        agrees: false,
        severity,
        kind: None,
        notes: Vec::new(),
    };

    let outcome = mode
        .ok_or_else(|| "mode unknown".to_string())
        .and_then(|m| {
            recompute_winner(&trick.cards, trick.leader, m, trump)
                .map(|w| (m, w))
                .map_err(|e| e.to_string())
        });
    let kind = match outcome {
        Ok((m, computed)) => {
            cmp.computed_winner = Some(computed);
            if computed == trick.winner {
                cmp.agrees = true;
                return (cmp, None);
            }
            let kind = classify(trick, computed, m);
            cmp.notes.push(format!(
                "recorded seat {} but seat {computed} wins under {m}",
                trick.winner
            ));
            kind
        }
        Err(reason) => {
            cmp.notes.push(reason);
            DivergenceKind::Unresolvable
        }
    };
    cmp.kind = Some(kind);
    debug!(
        round_no = cmp.round_no,
        trick_no = cmp.trick_no,
        kind = kind.label(),
        ?severity,
        "trick divergence"
    );

    let divergence = Divergence {
        id: divergence_id(session, round.round_no, Some(trick.trick_no), kind),
        session: session.to_string(),
        round_no: round.round_no,
        trick_no: Some(trick.trick_no),
        kind,
        severity,
        recorded: trick.winner.to_string(),
        computed: cmp
            .computed_winner
            .map_or_else(|| "?".to_string(), |s| s.to_string()),
        notes: cmp.notes.clone(),
    };
    (cmp, Some(divergence))
}

fn check_round(pa: &PointAnalysis) -> RoundPointCheck {
    let (expected_total, gp_target) = match (pa.mode, pa.complete && !pa.folded) {
        (Some(m), true) => (Some(m.deck_total()), Some(m.gp_target())),
        _ => (None, None),
    };
    let consistent = match (pa.card_points_consistent, pa.gp_sum_consistent) {
        (Some(a), Some(b)) if !pa.folded => Some(a && b),
        _ => None,
    };
    RoundPointCheck {
        round_no: pa.round_no,
        mode: pa.mode,
        complete: pa.complete,
        card_points_total: pa.card_points[0] + pa.card_points[1],
        expected_total,
        gp_sum: pa.card_gp[0] + pa.card_gp[1],
        gp_target,
        consistent,
        engine_gp: pa.final_gp,
        recorded_gp: pa.recorded_gp,
        recorded_matches: pa.matches_recorded,
    }
}

/// Compare every extracted trick and round of one session.
pub fn compare_session(
    session: &str,
    extraction: &ExtractionResult,
    config: &ComparatorConfig,
) -> ComparisonReport {
    let mut comparisons = Vec::new();
    let mut divergences = Vec::new();
    let mut round_checks = Vec::new();
    let mut rounds_compared = 0;

    for round in &extraction.rounds {
        if round.void {
            continue;
        }
        rounds_compared += 1;
        for trick in &round.tricks {
            let (cmp, divergence) = compare_trick(session, round, trick, config);
            comparisons.push(cmp);
            divergences.extend(divergence);
        }

        let pa = score_round(round);
        let check = check_round(&pa);
        if check.recorded_matches == Some(false) {
            let kind = DivergenceKind::RecordedScore;
            divergences.push(Divergence {
                id: divergence_id(session, round.round_no, None, kind),
                session: session.to_string(),
                round_no: round.round_no,
                trick_no: None,
                kind,
                severity: Severity::High,
                recorded: format!("{:?}", check.recorded_gp.unwrap_or_default()),
                computed: format!("{:?}", check.engine_gp),
                notes: vec!["recorded game points differ from the engine".to_string()],
            });
        }
        round_checks.push(check);
    }

    let total_tricks = comparisons.len();
    let agreed_tricks = comparisons.iter().filter(|c| c.agrees).count();
    let mut divergence_breakdown = BTreeMap::new();
    for d in &divergences {
        *divergence_breakdown.entry(d.kind).or_insert(0) += 1;
    }
    let checked: Vec<bool> = round_checks.iter().filter_map(|c| c.consistent).collect();
    let point_consistency_pct = pct(checked.iter().filter(|&&ok| ok).count(), checked.len());

    let report = ComparisonReport {
        session: session.to_string(),
        rounds_compared,
        total_tricks,
        agreed_tricks,
        agreement_pct: pct(agreed_tricks, total_tricks),
        divergence_breakdown,
        point_consistency_pct,
        round_checks,
        comparisons,
        divergences,
    };
    info!(
        session,
        rounds = report.rounds_compared,
        tricks = report.total_tricks,
        agreement_pct = report.agreement_pct,
        divergences = report.divergences.len(),
        "session compared"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Card, Suit};

    fn trick(tokens: [&str; 4], trick_no: usize, winner: Seat) -> ExtractedTrick {
        ExtractedTrick {
            trick_no,
            round_no: 1,
            cards: tokens.map(|t| i32::from(t.parse::<Card>().unwrap().index())),
            winner,
            leader: Some(0),
            lead_suit: Some(Suit::Spades),
            mode: None,
            trump: None,
            score: None,
            timestamp: 0,
        }
    }

    #[test]
    fn agreeing_tricks_still_carry_severity() {
        let round = ExtractedRound::new(1, Some(3), Some(Mode::Sun), None);
        let config = ComparatorConfig::default();

        let heavy = trick(["AS", "TS", "7S", "8S"], 1, 0);
        let (cmp, divergence) = compare_trick("s", &round, &heavy, &config);
        assert!(cmp.agrees);
        assert!(divergence.is_none());
        assert_eq!(cmp.points, 21);
        assert_eq!(cmp.severity, Severity::High);
        assert_eq!(cmp.kind, None);

        let light = trick(["9S", "7S", "8S", "QS"], 2, 3);
        let (cmp, _) = compare_trick("s", &round, &light, &config);
        assert!(cmp.agrees);
        assert_eq!(cmp.severity, Severity::Low);
    }

    #[test]
    fn last_trick_bonus_feeds_severity_of_a_divergence() {
        let round = ExtractedRound::new(1, Some(3), Some(Mode::Sun), None);
        let last = trick(["9S", "7S", "8S", "QS"], TRICKS_PER_ROUND, 1);
        let (cmp, divergence) = compare_trick("s", &round, &last, &ComparatorConfig::default());
        assert!(!cmp.agrees);
        assert_eq!(cmp.points, 13);
        assert_eq!(cmp.computed_winner, Some(3));
        assert_eq!(cmp.kind, Some(DivergenceKind::RankOrder));
        let divergence = divergence.unwrap();
        assert_eq!(divergence.severity, cmp.severity);
    }
}
