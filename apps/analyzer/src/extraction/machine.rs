//! Round/trick/bid reconstruction state machine.
//!
//! All mutation goes through [`RoundStateMachine::apply_event`]. The trick
//! winner is always the next-acting seat reported with the cards-collected
//! event; the embedded result field on that same event is never trusted.

use tracing::{debug, info, warn};

use crate::config::ExtractionConfig;
use crate::domain::{next_player, round_start_seat, team_of, Card, Seat, PLAYERS};
use crate::extraction::bidding::{Bid, BidAction};
use crate::extraction::boundary::{Boundary, BoundaryDetector};
use crate::extraction::types::{
    DeclarationRecord, ExtractedRound, ExtractedTrick, ExtractionResult, ExtractionWarning,
    FoldInfo, RoundFlag, TableEvent, TableSnapshot, WarningKind,
};

const EMPTY: i32 = -1;

/// Four filled slots captured before the collect event arrives.
#[derive(Debug, Clone, Copy)]
struct CompletedTable {
    cards: [i32; PLAYERS],
    leader: Option<Seat>,
}

#[derive(Debug)]
pub struct RoundStateMachine<D: BoundaryDetector> {
    detector: D,
    config: ExtractionConfig,
    rounds: Vec<ExtractedRound>,
    current: Option<ExtractedRound>,
    table: [i32; PLAYERS],
    first_player: Option<Seat>,
    completed: Option<CompletedTable>,
    last_winner: Option<Seat>,
    bidding_open: Option<bool>,
    latest_scores: Option<[i32; 2]>,
    warnings: Vec<ExtractionWarning>,
    events_scanned: usize,
}

impl<D: BoundaryDetector> RoundStateMachine<D> {
    pub fn new(detector: D, config: ExtractionConfig) -> Self {
        Self {
            detector,
            config,
            rounds: Vec::new(),
            current: None,
            table: [EMPTY; PLAYERS],
            first_player: None,
            completed: None,
            last_winner: None,
            bidding_open: None,
            latest_scores: None,
            warnings: Vec::new(),
            events_scanned: 0,
        }
    }

    pub fn rounds(&self) -> &[ExtractedRound] {
        &self.rounds
    }

    pub fn current_round(&self) -> Option<&ExtractedRound> {
        self.current.as_ref()
    }

    pub fn table(&self) -> [i32; PLAYERS] {
        self.table
    }

    pub fn warnings(&self) -> &[ExtractionWarning] {
        &self.warnings
    }

    /// Single mutation entry point.
    pub fn apply_event(&mut self, timestamp: i64, event: TableEvent) {
        self.events_scanned += 1;

        if let Some(boundary) = self.detector.observe(&event) {
            self.start_round(boundary);
        }

        match event {
            TableEvent::Snapshot(snap) => self.on_snapshot(snap),
            TableEvent::Bid {
                seat,
                raw,
                sub_round,
            } => self.on_bid(seat, raw, sub_round),
            TableEvent::Doubling { seat, level } => {
                let action = BidAction::normalize(&level);
                self.open_round().bids.push(Bid {
                    seat,
                    action,
                    raw: level,
                    sub_round: 0,
                });
            }
            TableEvent::CardPlayed { seat, card } => self.on_play(seat, card),
            TableEvent::CardsCollected {
                next_seat,
                embedded_winner,
                table,
                scores,
            } => self.on_collect(timestamp, next_seat, embedded_winner, table, scores),
            // Handled by the detector; a marker without one changes nothing.
            TableEvent::RoundStart { .. } => {}
            TableEvent::Declaration { seat, kind } => {
                self.open_round()
                    .declarations
                    .push(DeclarationRecord { seat, kind });
            }
            TableEvent::Fold { winning_team } => {
                let round = self.open_round();
                let after_tricks = round.tricks.len();
                round.fold = Some(FoldInfo {
                    winning_team,
                    after_tricks,
                });
                round.flag(RoundFlag::Folded);
                debug!(round_no = round.round_no, winning_team, "round folded");
            }
            TableEvent::RoundResult { gp } => {
                self.open_round().recorded_gp = Some(gp);
            }
            TableEvent::Passthrough(action) => {
                debug!(%action, "passthrough event");
            }
        }
    }

    /// Close the open round and hand back everything extracted.
    pub fn finish(mut self) -> ExtractionResult {
        let filled = self.table.iter().filter(|&&c| c != EMPTY).count();
        if self.completed.is_some() || filled > 0 {
            let round_no = self.current_round_no();
            self.warn(
                round_no,
                WarningKind::LeftoverPlays,
                format!("stream ended with {filled} card(s) on the table"),
            );
        }
        self.close_round();

        let total_tricks = self.rounds.iter().map(|r| r.tricks.len()).sum();
        info!(
            rounds = self.rounds.len(),
            total_tricks,
            events = self.events_scanned,
            warnings = self.warnings.len(),
            "extraction finished"
        );
        ExtractionResult {
            rounds: self.rounds,
            total_tricks,
            events_scanned: self.events_scanned,
            warnings: self.warnings,
        }
    }

    fn current_round_no(&self) -> usize {
        self.current
            .as_ref()
            .map(|r| r.round_no)
            .unwrap_or(self.rounds.len() + 1)
    }

    fn warn(&mut self, round_no: usize, kind: WarningKind, message: String) {
        warn!(round_no, ?kind, "{message}");
        self.warnings.push(ExtractionWarning {
            round_no,
            kind,
            message,
        });
    }

    /// The open round, creating an implicit one when no boundary fired yet.
    fn open_round(&mut self) -> &mut ExtractedRound {
        let round_no = self.rounds.len() + 1;
        let scores = self.latest_scores;
        self.current.get_or_insert_with(|| {
            let mut round = ExtractedRound::new(round_no, None, None, None);
            round.score_before = scores;
            round
        })
    }

    fn start_round(&mut self, boundary: Boundary) {
        self.close_round();
        let round_no = self.rounds.len() + 1;
        let mut round = ExtractedRound::new(round_no, boundary.dealer, boundary.mode, boundary.trump);
        round.score_before = self.latest_scores;
        debug!(round_no, dealer = ?boundary.dealer, mode = ?boundary.mode, "round opened");
        self.current = Some(round);
        self.reset_table();
        self.last_winner = None;
        self.bidding_open = None;
    }

    fn reset_table(&mut self) {
        self.table = [EMPTY; PLAYERS];
        self.first_player = None;
        self.completed = None;
    }

    fn close_round(&mut self) {
        let Some(mut round) = self.current.take() else {
            return;
        };
        if round.is_empty() {
            return;
        }
        let round_no = round.round_no;
        let resolution = round.bids.resolve();

        if round.mode.is_none() {
            round.mode = resolution.mode;
        }
        round.trump = round.effective_trump();
        if resolution.void {
            round.void = true;
            round.flag(RoundFlag::Void);
        }
        if round.tricks.is_empty() && !round.bids.is_empty() {
            round.flag(RoundFlag::BidsWithoutTricks);
            if !round.void {
                self.warn(
                    round_no,
                    WarningKind::BidsWithoutTricks,
                    format!("round closed with {} bid(s) and no tricks", round.bids.len()),
                );
            }
        }
        if round.mode.is_none() && !round.void && !round.tricks.is_empty() {
            round.flag(RoundFlag::UnresolvedMode);
            self.warn(
                round_no,
                WarningKind::UnresolvedMode,
                "mode unresolved at round close".to_string(),
            );
        }
        let (mode, trump) = (round.mode, round.trump);
        for trick in round.tricks.iter_mut().filter(|t| t.mode.is_none()) {
            trick.mode = mode;
            trick.trump = trump;
        }
        round.score_after = self.latest_scores;

        debug!(
            round_no,
            tricks = round.tricks.len(),
            mode = ?round.mode,
            "round closed"
        );
        self.rounds.push(round);
    }

    fn on_snapshot(&mut self, snap: TableSnapshot) {
        if let Some(bidding) = snap.bidding {
            self.bidding_open = Some(bidding);
        }
        if let Some(scores) = snap.scores {
            self.latest_scores = Some(scores);
        }
        if snap.dealer.is_some() || snap.mode.is_some() || snap.trump.is_some() {
            let round = self.open_round();
            if round.dealer.is_none() {
                round.dealer = snap.dealer;
            }
            if snap.mode.is_some() {
                round.mode = snap.mode;
            }
            if snap.trump.is_some() {
                round.trump = snap.trump;
            }
        }
        if let Some(slots) = snap.table {
            self.on_table(slots);
        }
    }

    fn on_bid(&mut self, seat: Seat, raw: String, sub_round: u8) {
        let action = BidAction::normalize(&raw);
        if self.bidding_open == Some(false) && action.escalation().is_none() {
            debug!(seat, raw = %raw, "bid outside bidding stage ignored");
            return;
        }
        debug!(seat, ?action, "bid");
        self.open_round().bids.push(Bid {
            seat,
            action,
            raw,
            sub_round,
        });
    }

    fn on_table(&mut self, slots: [i32; PLAYERS]) {
        if slots.iter().all(|&c| c == EMPTY) {
            self.table = slots;
            self.first_player = None;
            return;
        }
        let was_empty = self.table.iter().all(|&c| c == EMPTY);
        let newly: Vec<Seat> = (0..PLAYERS)
            .filter(|&s| self.table[s] == EMPTY && slots[s] != EMPTY)
            .map(|s| s as Seat)
            .collect();
        if was_empty && newly.len() == 1 {
            self.first_player = newly.first().copied();
        }
        self.table = slots;
        self.capture_if_full();
    }

    fn on_play(&mut self, seat: Seat, card: i32) {
        let Some(slot) = self.table.get(seat as usize).copied() else {
            return;
        };
        if slot == card {
            return;
        }
        if Card::from_index(card).is_none() {
            let round_no = self.current_round_no();
            self.warn(
                round_no,
                WarningKind::InvalidCard,
                format!("seat {seat} played non-deck index {card}"),
            );
        }
        if self.table.iter().all(|&c| c != EMPTY) {
            // A new lead on a full table: the previous trick never got collected.
            let round_no = self.current_round_no();
            self.warn(
                round_no,
                WarningKind::UncollectedTrick,
                format!("table {:?} replaced without a collect event", self.table),
            );
            self.reset_table();
        }
        if self.table.iter().all(|&c| c == EMPTY) {
            self.first_player = Some(seat);
        }
        self.open_round();
        self.table[seat as usize] = card;
        self.capture_if_full();
    }

    fn capture_if_full(&mut self) {
        if self.table.iter().all(|&c| c != EMPTY) {
            self.completed = Some(CompletedTable {
                cards: self.table,
                leader: self.first_player,
            });
        }
    }

    fn on_collect(
        &mut self,
        timestamp: i64,
        next_seat: Option<Seat>,
        embedded_winner: Option<Seat>,
        table: Option<[i32; PLAYERS]>,
        scores: Option<[i32; 2]>,
    ) {
        if let Some(scores) = scores {
            self.latest_scores = Some(scores);
        }
        let round_no = self.current_round_no();

        let completed = self.completed.take().or_else(|| {
            table
                .filter(|t| t.iter().all(|&c| c != EMPTY))
                .map(|cards| CompletedTable {
                    cards,
                    leader: None,
                })
        });
        let Some(completed) = completed else {
            let filled = self.table.iter().filter(|&&c| c != EMPTY).count();
            self.warn(
                round_no,
                WarningKind::IncompleteTrick,
                format!("collect with {filled}/4 seats filled; trick dropped"),
            );
            self.reset_table();
            return;
        };
        let Some(winner) = next_seat else {
            self.warn(
                round_no,
                WarningKind::MissingWinner,
                "collect without a next-acting seat; trick dropped".to_string(),
            );
            self.reset_table();
            return;
        };
        if embedded_winner.is_some_and(|e| e != winner) {
            debug!(winner, ?embedded_winner, "embedded result disagrees with next seat");
        }

        let over_limit = self
            .current
            .as_ref()
            .is_some_and(|r| r.tricks.len() >= self.config.max_tricks_per_round);
        if over_limit {
            self.force_split(round_no);
        }

        let last_winner = self.last_winner;
        let latest_scores = self.latest_scores;
        let round = self.open_round();
        let leader = completed.leader.or(last_winner).or_else(|| {
            if round.tricks.is_empty() {
                round.dealer.map(round_start_seat)
            } else {
                None
            }
        });
        let lead_suit = leader
            .and_then(|s| completed.cards.get(s as usize).copied())
            .and_then(Card::from_index)
            .map(|c| c.suit);
        let trick = ExtractedTrick {
            trick_no: round.tricks.len() + 1,
            round_no: round.round_no,
            cards: completed.cards,
            winner,
            leader,
            lead_suit,
            mode: round.effective_mode(),
            trump: round.effective_trump(),
            score: latest_scores,
            timestamp,
        };
        debug!(
            round_no = trick.round_no,
            trick_no = trick.trick_no,
            winner,
            team = team_of(winner),
            "trick finalized"
        );
        round.tricks.push(trick);

        self.last_winner = Some(winner);
        self.reset_table();
    }

    fn force_split(&mut self, round_no: usize) {
        self.warn(
            round_no,
            WarningKind::TooManyTricks,
            format!(
                "more than {} tricks without a boundary; round split",
                self.config.max_tricks_per_round
            ),
        );
        let dealer = self
            .current
            .as_mut()
            .and_then(|r| {
                r.flag(RoundFlag::ForcedSplit);
                r.dealer
            });
        let completed = self.completed.take();
        self.start_round(Boundary {
            dealer: dealer.map(next_player),
            mode: None,
            trump: None,
        });
        self.completed = completed;
    }
}
