//! Divergence records and the cross-session log.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use xxhash_rust::xxh3::xxh3_64;

use crate::domain::Mode;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DivergenceKind {
    /// A trump card was involved and the winners differ.
    TrumpOverride,
    /// The recorded winner played neither the lead suit nor trump.
    OffSuitWinner,
    /// Both candidates followed suit; the rank order disagrees.
    RankOrder,
    /// The trick could not be recomputed.
    Unresolvable,
    /// Recorded round game points differ from the engine's.
    RecordedScore,
}

impl DivergenceKind {
    pub const fn label(self) -> &'static str {
        match self {
            DivergenceKind::TrumpOverride => "trump_override",
            DivergenceKind::OffSuitWinner => "off_suit_winner",
            DivergenceKind::RankOrder => "rank_order",
            DivergenceKind::Unresolvable => "unresolvable",
            DivergenceKind::RecordedScore => "recorded_score",
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn classify(points: u32, mode: Option<Mode>, high_threshold: u32) -> Severity {
        if points >= high_threshold {
            Severity::High
        } else if mode == Some(Mode::Hokum) {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Divergence {
    /// 16 hex digits, stable across runs.
    pub id: String,
    pub session: String,
    pub round_no: usize,
    /// `None` for round-level divergences.
    pub trick_no: Option<usize>,
    pub kind: DivergenceKind,
    pub severity: Severity,
    pub recorded: String,
    pub computed: String,
    pub notes: Vec<String>,
}

pub fn divergence_id(
    session: &str,
    round_no: usize,
    trick_no: Option<usize>,
    kind: DivergenceKind,
) -> String {
    let trick = trick_no.map(|t| t.to_string()).unwrap_or_default();
    let key = format!("{session}|{round_no}|{trick}|{}", kind.label());
    format!("{:016x}", xxh3_64(key.as_bytes()))
}

/// Divergences across sessions, deduplicated by id.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DivergenceLog {
    entries: Vec<Divergence>,
    #[serde(skip)]
    seen: HashSet<String>,
}

impl DivergenceLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// `false` when the id was already logged.
    pub fn record(&mut self, divergence: Divergence) -> bool {
        if !self.seen.insert(divergence.id.clone()) {
            return false;
        }
        self.entries.push(divergence);
        true
    }

    pub fn extend<I: IntoIterator<Item = Divergence>>(&mut self, items: I) -> usize {
        items.into_iter().filter(|d| self.record(d.clone())).count()
    }

    pub fn entries(&self) -> &[Divergence] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn counts_by_kind(&self) -> BTreeMap<DivergenceKind, usize> {
        let mut out = BTreeMap::new();
        for d in &self.entries {
            *out.entry(d.kind).or_insert(0) += 1;
        }
        out
    }

    pub fn counts_by_severity(&self) -> BTreeMap<Severity, usize> {
        let mut out = BTreeMap::new();
        for d in &self.entries {
            *out.entry(d.severity).or_insert(0) += 1;
        }
        out
    }
}
