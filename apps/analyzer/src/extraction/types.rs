use serde::Serialize;

use crate::domain::{Card, DeclarationKind, Mode, Seat, Suit, TeamId, TRICKS_PER_ROUND};
use crate::extraction::bidding::BidSequence;
use crate::protocol::ActionKind;

/// Normalized input of the round state machine. Both ingestion paths
/// produce these.
#[derive(Debug, Clone, PartialEq)]
pub enum TableEvent {
    Snapshot(TableSnapshot),
    Bid {
        seat: Seat,
        raw: String,
        sub_round: u8,
    },
    /// A doubling-level bid that arrived outside the bid field.
    Doubling {
        seat: Seat,
        level: String,
    },
    CardPlayed {
        seat: Seat,
        card: i32,
    },
    /// Trick resolved. `next_seat` is the winner.
    CardsCollected {
        next_seat: Option<Seat>,
        /// Server's own result field, kept only for diagnostics.
        embedded_winner: Option<Seat>,
        table: Option<[i32; 4]>,
        scores: Option<[i32; 2]>,
    },
    RoundStart {
        dealer: Option<Seat>,
        mode: Option<Mode>,
        trump: Option<Suit>,
    },
    Declaration {
        seat: Seat,
        kind: DeclarationKind,
    },
    Fold {
        winning_team: TeamId,
    },
    RoundResult {
        gp: [i32; 2],
    },
    Passthrough(ActionKind),
}

/// Full or partial table state as broadcast by the server.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TableSnapshot {
    pub table: Option<[i32; 4]>,
    pub counts: Option<[u8; 4]>,
    pub dealer: Option<Seat>,
    pub mover: Option<Seat>,
    /// `Some(true)` while bidding is open; `None` when the stage is not reported.
    pub bidding: Option<bool>,
    pub mode: Option<Mode>,
    pub trump: Option<Suit>,
    pub scores: Option<[i32; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedTrick {
    /// 1-based within the round.
    pub trick_no: usize,
    pub round_no: usize,
    /// Card index per absolute seat.
    pub cards: [i32; 4],
    pub winner: Seat,
    pub leader: Option<Seat>,
    pub lead_suit: Option<Suit>,
    pub mode: Option<Mode>,
    pub trump: Option<Suit>,
    pub score: Option<[i32; 2]>,
    pub timestamp: i64,
}

impl ExtractedTrick {
    pub fn card_at(&self, seat: Seat) -> Option<Card> {
        self.cards
            .get(seat as usize)
            .and_then(|&idx| Card::from_index(idx))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct DeclarationRecord {
    pub seat: Seat,
    pub kind: DeclarationKind,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct FoldInfo {
    pub winning_team: TeamId,
    /// Tricks played before the fold.
    pub after_tricks: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundFlag {
    BidsWithoutTricks,
    ForcedSplit,
    UnresolvedMode,
    Void,
    Folded,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedRound {
    /// 1-based within the session.
    pub round_no: usize,
    pub mode: Option<Mode>,
    pub trump: Option<Suit>,
    pub dealer: Option<Seat>,
    pub tricks: Vec<ExtractedTrick>,
    pub bids: BidSequence,
    pub declarations: Vec<DeclarationRecord>,
    pub fold: Option<FoldInfo>,
    pub void: bool,
    pub score_before: Option<[i32; 2]>,
    pub score_after: Option<[i32; 2]>,
    /// Game points the source recorded for this round.
    pub recorded_gp: Option<[i32; 2]>,
    pub flags: Vec<RoundFlag>,
}

impl ExtractedRound {
    pub fn new(round_no: usize, dealer: Option<Seat>, mode: Option<Mode>, trump: Option<Suit>) -> Self {
        Self {
            round_no,
            mode,
            trump,
            dealer,
            tricks: Vec::new(),
            bids: BidSequence::default(),
            declarations: Vec::new(),
            fold: None,
            void: false,
            score_before: None,
            score_after: None,
            recorded_gp: None,
            flags: Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.tricks.len() == TRICKS_PER_ROUND
    }

    pub fn is_empty(&self) -> bool {
        self.tricks.is_empty()
            && self.bids.is_empty()
            && self.declarations.is_empty()
            && self.fold.is_none()
            && self.recorded_gp.is_none()
    }

    /// Explicit mode when known, otherwise the bid sequence's contract.
    pub fn effective_mode(&self) -> Option<Mode> {
        self.mode.or_else(|| self.bids.resolve().mode)
    }

    pub fn effective_trump(&self) -> Option<Suit> {
        match self.effective_mode() {
            Some(Mode::Hokum) => self.trump.or_else(|| self.bids.resolve().trump),
            _ => None,
        }
    }

    pub fn flag(&mut self, flag: RoundFlag) {
        if !self.flags.contains(&flag) {
            self.flags.push(flag);
        }
    }

    pub fn has_flag(&self, flag: RoundFlag) -> bool {
        self.flags.contains(&flag)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    IncompleteTrick,
    MissingWinner,
    UncollectedTrick,
    LeftoverPlays,
    BidsWithoutTricks,
    TooManyTricks,
    UnresolvedMode,
    MalformedRecord,
    InvalidCard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionWarning {
    pub round_no: usize,
    pub kind: WarningKind,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractionResult {
    pub rounds: Vec<ExtractedRound>,
    pub total_tricks: usize,
    pub events_scanned: usize,
    pub warnings: Vec<ExtractionWarning>,
}

impl ExtractionResult {
    pub fn warnings_of(&self, kind: WarningKind) -> impl Iterator<Item = &ExtractionWarning> {
        self.warnings.iter().filter(move |w| w.kind == kind)
    }
}
