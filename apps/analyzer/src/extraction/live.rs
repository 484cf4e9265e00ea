//! Live ingestion: classified wire events into [`TableEvent`]s.

use crate::config::FieldNames;
use crate::domain::{seat_from_i64, team_of, DeclarationKind, Mode, Seat, Suit, PLAYERS};
use crate::extraction::types::{TableEvent, TableSnapshot};
use crate::protocol::{ActionKind, DecodedValue, GameEvent};

/// Deepest parameter object: `root.p.p`, then `root.p`, then `root`.
pub fn payload<'a>(root: &'a DecodedValue, fields: &FieldNames) -> &'a DecodedValue {
    let params = |v: &'a DecodedValue| v.get(&fields.params).filter(|p| p.is_object());
    match params(root) {
        Some(p) => params(p).unwrap_or(p),
        None => root,
    }
}

/// Integers and strings both render; anything else is absent.
pub(crate) fn scalar_string(v: &DecodedValue) -> Option<String> {
    v.as_str()
        .map(str::to_string)
        .or_else(|| v.as_i64().map(|n| n.to_string()))
}

pub(crate) fn seat_field(p: &DecodedValue, key: &str) -> Option<Seat> {
    p.get(key)?.as_i64().and_then(seat_from_i64)
}

pub(crate) fn table_field(p: &DecodedValue, key: &str) -> Option<[i32; PLAYERS]> {
    let v = p.get(key)?.as_i64_vec()?;
    let slots: Vec<i32> = v.iter().map(|&x| i32::try_from(x).unwrap_or(-1)).collect();
    slots.try_into().ok()
}

pub(crate) fn counts_field(p: &DecodedValue, key: &str) -> Option<[u8; PLAYERS]> {
    let v = p.get(key)?.as_i64_vec()?;
    let counts: Option<Vec<u8>> = v.iter().map(|&x| u8::try_from(x).ok()).collect();
    counts?.try_into().ok()
}

pub(crate) fn scores_field(p: &DecodedValue, key: &str) -> Option<[i32; 2]> {
    let v = p.get(key)?.as_i64_vec()?;
    match v.as_slice() {
        [a, b, ..] => Some([i32::try_from(*a).ok()?, i32::try_from(*b).ok()?]),
        _ => None,
    }
}

pub(crate) fn mode_field(p: &DecodedValue, key: &str) -> Option<Mode> {
    scalar_string(p.get(key)?)?.parse().ok()
}

pub(crate) fn suit_field(p: &DecodedValue, key: &str) -> Option<Suit> {
    scalar_string(p.get(key)?)?.parse().ok()
}

/// Turns classified [`GameEvent`]s into state machine input.
#[derive(Debug, Clone, Default)]
pub struct LiveNormalizer {
    fields: FieldNames,
}

impl LiveNormalizer {
    pub fn new(fields: FieldNames) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &FieldNames {
        &self.fields
    }

    pub fn snapshot(&self, p: &DecodedValue) -> Option<TableSnapshot> {
        let f = &self.fields;
        let snap = TableSnapshot {
            table: table_field(p, &f.table),
            counts: counts_field(p, &f.counts),
            dealer: seat_field(p, &f.dealer),
            mover: seat_field(p, &f.mover),
            bidding: p
                .get(&f.stage)
                .and_then(scalar_string)
                .map(|st| f.bidding_stages.iter().any(|b| b.eq_ignore_ascii_case(&st))),
            mode: mode_field(p, &f.mode),
            trump: suit_field(p, &f.trump),
            scores: scores_field(p, &f.scores),
        };
        (snap != TableSnapshot::default()).then_some(snap)
    }

    /// Zero or more table events per wire event, in application order.
    pub fn normalize(&self, event: &GameEvent) -> Vec<TableEvent> {
        let f = &self.fields;
        let p = payload(&event.fields, f);
        let mut out = Vec::new();

        match event.action {
            ActionKind::StateSnapshot => out.extend(self.snapshot(p).map(TableEvent::Snapshot)),
            ActionKind::Bid => {
                out.extend(self.snapshot(p).map(TableEvent::Snapshot));
                let seat = seat_field(p, &f.bid_seat).or_else(|| seat_field(p, &f.mover));
                let raw = p.get(&f.bid).and_then(scalar_string);
                if let (Some(seat), Some(raw)) = (seat, raw) {
                    let sub_round = p
                        .get(&f.bid_round)
                        .and_then(DecodedValue::as_i64)
                        .and_then(|r| u8::try_from(r).ok())
                        .unwrap_or(1);
                    out.push(TableEvent::Bid {
                        seat,
                        raw,
                        sub_round,
                    });
                }
            }
            ActionKind::Doubling => {
                let seat = seat_field(p, &f.bid_seat).or_else(|| seat_field(p, &f.mover));
                let level = p.get(&f.doubling).and_then(|v| match v.as_str() {
                    Some(s) => Some(s.to_string()),
                    None => v.as_i64().map(doubling_level_name),
                });
                if let (Some(seat), Some(level)) = (seat, level) {
                    out.push(TableEvent::Doubling { seat, level });
                }
            }
            ActionKind::CardPlayed => {
                out.extend(self.snapshot(p).map(TableEvent::Snapshot));
                let seat = seat_field(p, &f.play_seat);
                let card = p
                    .get(&f.card)
                    .and_then(DecodedValue::as_i64)
                    .and_then(|c| i32::try_from(c).ok());
                if let (Some(seat), Some(card)) = (seat, card) {
                    out.push(TableEvent::CardPlayed { seat, card });
                }
            }
            ActionKind::CardsCollected => out.push(TableEvent::CardsCollected {
                next_seat: seat_field(p, &f.mover),
                embedded_winner: seat_field(p, &f.embedded_result),
                table: table_field(p, &f.table),
                scores: scores_field(p, &f.scores),
            }),
            ActionKind::Declaration => {
                let seat = seat_field(p, &f.play_seat).or_else(|| seat_field(p, &f.mover));
                let kind = p
                    .get(&f.declaration)
                    .and_then(scalar_string)
                    .and_then(|k| k.parse::<DeclarationKind>().ok());
                if let (Some(seat), Some(kind)) = (seat, kind) {
                    out.push(TableEvent::Declaration { seat, kind });
                }
            }
            ActionKind::Fold => {
                if let Some(seat) = seat_field(p, &f.fold) {
                    out.push(TableEvent::Fold {
                        winning_team: team_of(seat),
                    });
                }
            }
            ActionKind::RoundOver => {
                out.extend(self.snapshot(p).map(TableEvent::Snapshot));
                if let Some(gp) = scores_field(p, &f.round_result) {
                    out.push(TableEvent::RoundResult { gp });
                }
            }
            other => out.push(TableEvent::Passthrough(other)),
        }
        out
    }
}

fn doubling_level_name(level: i64) -> String {
    match level {
        2 => "double",
        3 => "triple",
        4 => "four",
        5 => "gahwa",
        _ => "unknown",
    }
    .to_string()
}
