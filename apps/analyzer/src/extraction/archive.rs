//! Archive ingestion: JSON session documents with explicit per-event markers.
//!
//! ```json
//! {"session": "s1", "events": [
//!   {"e": "round_start", "dealer": 3, "mode": "sun", "t": 1000},
//!   {"e": "bid", "seat": 0, "action": "sun", "round": 1},
//!   {"e": "play", "seat": 0, "card": "AS"},
//!   {"e": "trick", "next": 0, "winner": 0},
//!   {"e": "round_result", "gp": [20, 6]}
//! ]}
//! ```

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::domain::{seat_from_i64, team_of, Card, DeclarationKind, Mode, Seat, Suit, TEAMS};
use crate::error::AnalyzerError;
use crate::extraction::types::{ExtractionWarning, TableEvent, WarningKind};

const EVENTS_KEY: &str = "events";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CardRef {
    Index(i32),
    Token(String),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "e", rename_all = "snake_case")]
enum ArchiveRecord {
    RoundStart {
        dealer: Option<i64>,
        mode: Option<String>,
        trump: Option<String>,
    },
    Bid {
        seat: i64,
        action: String,
        #[serde(default = "first_sub_round")]
        round: u8,
    },
    Play {
        seat: i64,
        card: CardRef,
    },
    Trick {
        next: Option<i64>,
        winner: Option<i64>,
    },
    Fold {
        team: Option<usize>,
        seat: Option<i64>,
    },
    Declaration {
        seat: i64,
        kind: String,
    },
    RoundResult {
        gp: [i32; 2],
    },
    #[serde(other)]
    Other,
}

fn first_sub_round() -> u8 {
    1
}

/// A parsed archive document, ready for the marker-driven state machine.
#[derive(Debug, Clone, Default)]
pub struct ArchiveSession {
    pub session: Option<String>,
    /// `(timestamp, event)` in document order.
    pub events: Vec<(i64, TableEvent)>,
    pub warnings: Vec<ExtractionWarning>,
    pub records_scanned: usize,
}

impl ArchiveSession {
    pub fn from_json_str(text: &str) -> Result<Self, AnalyzerError> {
        let doc: Value = serde_json::from_str(text)?;
        Self::from_value(&doc)
    }

    /// Only a missing `events` array is fatal; bad records become warnings.
    pub fn from_value(doc: &Value) -> Result<Self, AnalyzerError> {
        let records = doc
            .get(EVENTS_KEY)
            .and_then(Value::as_array)
            .ok_or(AnalyzerError::MissingContainer {
                container: EVENTS_KEY,
            })?;

        let mut out = ArchiveSession {
            session: doc.get("session").and_then(Value::as_str).map(str::to_string),
            ..ArchiveSession::default()
        };
        // Round numbers in warnings follow round_start markers.
        let mut round_no = 0usize;

        for (ordinal, record) in records.iter().enumerate() {
            out.records_scanned += 1;
            let timestamp = record
                .get("t")
                .and_then(Value::as_i64)
                .unwrap_or(ordinal as i64);
            let parsed = serde_json::from_value::<ArchiveRecord>(record.clone())
                .map_err(|e| e.to_string())
                .and_then(to_table_event);
            match parsed {
                Ok(Some(event)) => {
                    if matches!(event, TableEvent::RoundStart { .. }) {
                        round_no += 1;
                    }
                    out.events.push((timestamp, event));
                }
                Ok(None) => {}
                Err(reason) => {
                    let message = format!("record {ordinal} skipped: {reason}");
                    warn!(round_no = round_no.max(1), "{message}");
                    out.warnings.push(ExtractionWarning {
                        round_no: round_no.max(1),
                        kind: WarningKind::MalformedRecord,
                        message,
                    });
                }
            }
        }
        Ok(out)
    }
}

fn seat(v: i64) -> Result<Seat, String> {
    seat_from_i64(v).ok_or_else(|| format!("seat {v} out of range"))
}

fn opt_seat(v: Option<i64>) -> Result<Option<Seat>, String> {
    v.map(seat).transpose()
}

fn to_table_event(record: ArchiveRecord) -> Result<Option<TableEvent>, String> {
    let event = match record {
        ArchiveRecord::RoundStart {
            dealer,
            mode,
            trump,
        } => TableEvent::RoundStart {
            dealer: opt_seat(dealer)?,
            mode: mode
                .map(|m| m.parse::<Mode>())
                .transpose()
                .map_err(|e| e.to_string())?,
            trump: trump
                .map(|t| t.parse::<Suit>())
                .transpose()
                .map_err(|e| e.to_string())?,
        },
        ArchiveRecord::Bid {
            seat: s,
            action,
            round,
        } => TableEvent::Bid {
            seat: seat(s)?,
            raw: action,
            sub_round: round,
        },
        ArchiveRecord::Play { seat: s, card } => {
            let card = match card {
                CardRef::Index(i) => Card::try_from_index(i),
                CardRef::Token(t) => t.parse::<Card>(),
            }
            .map_err(|e| e.to_string())?;
            TableEvent::CardPlayed {
                seat: seat(s)?,
                card: i32::from(card.index()),
            }
        }
        ArchiveRecord::Trick { next, winner } => TableEvent::CardsCollected {
            next_seat: opt_seat(next)?,
            embedded_winner: opt_seat(winner)?,
            table: None,
            scores: None,
        },
        ArchiveRecord::Fold { team, seat: s } => {
            let winning_team = match (team, opt_seat(s)?) {
                (Some(t), _) if t < TEAMS => t,
                (Some(t), _) => return Err(format!("team {t} out of range")),
                (None, Some(s)) => team_of(s),
                (None, None) => return Err("fold without team or seat".to_string()),
            };
            TableEvent::Fold { winning_team }
        }
        ArchiveRecord::Declaration { seat: s, kind } => TableEvent::Declaration {
            seat: seat(s)?,
            kind: kind
                .parse::<DeclarationKind>()
                .map_err(|e| e.to_string())?,
        },
        ArchiveRecord::RoundResult { gp } => TableEvent::RoundResult { gp },
        ArchiveRecord::Other => return Ok(None),
    };
    Ok(Some(event))
}
