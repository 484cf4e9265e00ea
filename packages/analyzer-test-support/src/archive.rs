//! Builder for archive session documents.

use serde_json::{json, Value};

/// Accumulates archive records in order; each record gets an increasing `t`.
#[derive(Debug, Clone)]
pub struct ArchiveBuilder {
    session: String,
    events: Vec<Value>,
    clock: i64,
}

impl ArchiveBuilder {
    pub fn new(session: &str) -> Self {
        Self {
            session: session.to_string(),
            events: Vec::new(),
            clock: 1_000,
        }
    }

    fn push(mut self, mut record: Value) -> Self {
        self.clock += 10;
        if let Some(obj) = record.as_object_mut() {
            obj.insert("t".to_string(), json!(self.clock));
        }
        self.events.push(record);
        self
    }

    pub fn round_start(self, dealer: u8, mode: Option<&str>, trump: Option<&str>) -> Self {
        self.push(json!({"e": "round_start", "dealer": dealer, "mode": mode, "trump": trump}))
    }

    pub fn bid(self, seat: u8, action: &str) -> Self {
        self.push(json!({"e": "bid", "seat": seat, "action": action}))
    }

    /// Four plays clockwise from `leader`, then the trick record.
    pub fn trick(mut self, leader: u8, cards: [&str; 4], next: u8) -> Self {
        for (offset, card) in cards.iter().enumerate() {
            let seat = (leader as usize + offset) % 4;
            self = self.push(json!({"e": "play", "seat": seat, "card": card}));
        }
        self.push(json!({"e": "trick", "next": next}))
    }

    /// Same as [`Self::trick`] with a server result field that may disagree.
    pub fn trick_with_result(mut self, leader: u8, cards: [&str; 4], next: u8, winner: u8) -> Self {
        for (offset, card) in cards.iter().enumerate() {
            let seat = (leader as usize + offset) % 4;
            self = self.push(json!({"e": "play", "seat": seat, "card": card}));
        }
        self.push(json!({"e": "trick", "next": next, "winner": winner}))
    }

    pub fn declaration(self, seat: u8, kind: &str) -> Self {
        self.push(json!({"e": "declaration", "seat": seat, "kind": kind}))
    }

    pub fn fold_team(self, team: u8) -> Self {
        self.push(json!({"e": "fold", "team": team}))
    }

    pub fn round_result(self, gp: [i32; 2]) -> Self {
        self.push(json!({"e": "round_result", "gp": gp}))
    }

    pub fn raw(self, record: Value) -> Self {
        self.push(record)
    }

    pub fn build(self) -> Value {
        json!({"session": self.session, "events": self.events})
    }
}

/// The 32-card deck as tokens, suit by suit from seven to ace.
pub fn deck_tokens() -> Vec<String> {
    let mut out = Vec::with_capacity(32);
    for suit in ['S', 'H', 'C', 'D'] {
        for rank in ['7', '8', '9', 'T', 'J', 'Q', 'K', 'A'] {
            out.push(format!("{rank}{suit}"));
        }
    }
    out
}
