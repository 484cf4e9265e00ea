//! Seat-relative live view for one consumer at the table.
//!
//! Position 0 is always the consumer, 2 the partner, 1 and 3 the opponents.
//! Until the consumer's seat is identified, absolute seats are reported.

use serde::Serialize;
use tracing::debug;

use crate::config::FieldNames;
use crate::domain::{relative_seat, team_of, Card, DeclarationKind, Mode, Seat, Suit, PLAYERS};
use crate::extraction::live::{
    counts_field, mode_field, payload, scalar_string, scores_field, seat_field, suit_field,
    table_field,
};
use crate::protocol::{ActionKind, DecodedValue, GameEvent};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LiveView {
    /// Absolute seat of the consumer once identified.
    pub my_seat: Option<Seat>,
    pub dealer: Option<Seat>,
    pub turn: Option<Seat>,
    pub hand: Vec<Card>,
    /// Remaining cards per seat, by relative position.
    pub hand_counts: [Option<u8>; PLAYERS],
    /// Cards on the table by relative position.
    pub table: [Option<Card>; PLAYERS],
    /// `[us, them]`.
    pub scores: Option<[i32; 2]>,
    pub mode: Option<Mode>,
    pub trump: Option<Suit>,
    pub declarations: Vec<(Seat, DeclarationKind)>,
}

#[derive(Debug, Clone)]
pub struct LiveStateTracker {
    fields: FieldNames,
    my_name: String,
    my_seat: Option<Seat>,
    view: LiveView,
}

impl LiveStateTracker {
    pub fn new(my_name: impl Into<String>, fields: FieldNames) -> Self {
        Self {
            fields,
            my_name: my_name.into(),
            my_seat: None,
            view: LiveView::default(),
        }
    }

    pub fn view(&self) -> &LiveView {
        &self.view
    }

    pub fn my_seat(&self) -> Option<Seat> {
        self.my_seat
    }

    fn rel(&self, seat: Seat) -> Seat {
        relative_seat(seat, self.my_seat.unwrap_or(0))
    }

    pub fn observe(&mut self, event: &GameEvent) {
        let p = payload(&event.fields, &self.fields);
        if self.my_seat.is_none() {
            self.identify(p);
        }
        let f = &self.fields;

        let dealer = seat_field(p, &f.dealer);
        let mover = seat_field(p, &f.mover);
        let table = table_field(p, &f.table);
        let counts = counts_field(p, &f.counts);
        let scores = scores_field(p, &f.scores);
        let mode = mode_field(p, &f.mode);
        let trump = suit_field(p, &f.trump);
        let hand = p.get(&f.hand).and_then(DecodedValue::as_i64_vec);
        let declaration = (event.action == ActionKind::Declaration)
            .then(|| {
                let seat = seat_field(p, &f.play_seat).or(mover)?;
                let kind = scalar_string(p.get(&f.declaration)?)?.parse().ok()?;
                Some((seat, kind))
            })
            .flatten();

        if let Some(d) = dealer {
            self.view.dealer = Some(self.rel(d));
        }
        if let Some(m) = mover {
            self.view.turn = Some(self.rel(m));
        }
        if let Some(slots) = table {
            let mut rotated = [None; PLAYERS];
            for (abs, &idx) in slots.iter().enumerate() {
                rotated[self.rel(abs as Seat) as usize] = Card::from_index(idx);
            }
            self.view.table = rotated;
        }
        if let Some(counts) = counts {
            let mut rotated = [None; PLAYERS];
            for (abs, &n) in counts.iter().enumerate() {
                rotated[self.rel(abs as Seat) as usize] = Some(n);
            }
            self.view.hand_counts = rotated;
        }
        if let Some([t0, t1]) = scores {
            self.view.scores = Some(match self.my_seat.map(team_of) {
                Some(1) => [t1, t0],
                _ => [t0, t1],
            });
        }
        if mode.is_some() {
            self.view.mode = mode;
            self.view.trump = trump;
        } else if trump.is_some() {
            self.view.trump = trump;
        }
        if let Some(hand) = hand {
            self.view.hand = hand
                .into_iter()
                .filter_map(|i| i32::try_from(i).ok().and_then(Card::from_index))
                .collect();
        }
        if let Some((seat, kind)) = declaration {
            let rel = self.rel(seat);
            self.view.declarations.push((rel, kind));
        }
    }

    /// Match the consumer's name against the players array or positional names.
    fn identify(&mut self, p: &DecodedValue) {
        let f = &self.fields;
        let wanted = self.my_name.trim();
        let by_array = p.get(&f.players).and_then(DecodedValue::as_array).and_then(|players| {
            players.iter().find_map(|pl| {
                let name = pl.get(&f.player_name)?.as_str()?;
                name.trim()
                    .eq_ignore_ascii_case(wanted)
                    .then(|| seat_field(pl, &f.player_seat))
                    .flatten()
            })
        });
        let by_position = || {
            let names = p.get(&f.positional_names)?.as_str_vec()?;
            names
                .iter()
                .position(|n| n.trim().eq_ignore_ascii_case(wanted))
                .and_then(|i| u8::try_from(i).ok())
                .filter(|&s| (s as usize) < PLAYERS)
        };
        if let Some(seat) = by_array.or_else(by_position) {
            debug!(seat, "consumer seat identified");
            self.my_seat = Some(seat);
            self.view.my_seat = Some(seat);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Direction;

    fn obj(fields: Vec<(&str, DecodedValue)>) -> DecodedValue {
        DecodedValue::Object(
            fields
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    fn ev(action: ActionKind, fields: DecodedValue) -> GameEvent {
        GameEvent {
            timestamp: 0,
            direction: Direction::Inbound,
            action,
            fields,
            raw_size: 0,
            decode_errors: Vec::new(),
            raw_preview: None,
        }
    }

    fn card(token: &str) -> Card {
        token.parse().unwrap()
    }

    #[test]
    fn rotates_after_identification_by_players_array() {
        let mut t = LiveStateTracker::new("Noura", FieldNames::default());
        let players = DecodedValue::Array(
            ["a", "noura ", "c", "d"]
                .iter()
                .enumerate()
                .map(|(i, n)| {
                    obj(vec![
                        ("n", DecodedValue::Str(n.to_string())),
                        ("i", DecodedValue::Int(i as i32)),
                    ])
                })
                .collect(),
        );
        let kh = i32::from(card("KH").index());
        t.observe(&ev(
            ActionKind::StateSnapshot,
            obj(vec![
                ("pl", players),
                ("dl", DecodedValue::Int(0)),
                ("mv", DecodedValue::Int(1)),
                ("tc", DecodedValue::IntArray(vec![kh, -1, -1, -1])),
                ("hc", DecodedValue::IntArray(vec![7, 8, 6, 5])),
                ("sc", DecodedValue::IntArray(vec![30, 12])),
            ]),
        ));
        assert_eq!(t.my_seat(), Some(1));
        let v = t.view();
        assert_eq!(v.dealer, Some(3));
        assert_eq!(v.turn, Some(0));
        assert_eq!(v.table[3], Some(card("KH")));
        assert_eq!(v.hand_counts, [Some(8), Some(6), Some(5), Some(7)]);
        assert_eq!(v.scores, Some([12, 30]));
    }

    #[test]
    fn identifies_by_positional_names_and_rotates_declarations() {
        let mut t = LiveStateTracker::new("me", FieldNames::default());
        let names = DecodedValue::StrArray(vec!["x".into(), "y".into(), "me".into(), "z".into()]);
        t.observe(&ev(
            ActionKind::StateSnapshot,
            obj(vec![
                ("pn", names),
                ("hd", DecodedValue::ByteArray(vec![12, 25, 2])),
                ("gm", DecodedValue::Str("hokum".into())),
                ("tr", DecodedValue::Str("S".into())),
            ]),
        ));
        assert_eq!(t.my_seat(), Some(2));
        assert_eq!(t.view().hand, vec![card("AS"), card("AH")]);
        assert_eq!(t.view().mode, Some(Mode::Hokum));
        assert_eq!(t.view().trump, Some(Suit::Spades));

        t.observe(&ev(
            ActionKind::Declaration,
            obj(vec![
                ("prj", DecodedValue::Str("hundred".into())),
                ("ps", DecodedValue::Int(0)),
            ]),
        ));
        assert_eq!(t.view().declarations, vec![(2, DeclarationKind::Hundred)]);
        assert_eq!(t.view().scores, None);
    }

    #[test]
    fn unidentified_consumer_keeps_absolute_seats() {
        let mut t = LiveStateTracker::new("ghost", FieldNames::default());
        t.observe(&ev(
            ActionKind::StateSnapshot,
            obj(vec![("dl", DecodedValue::Int(2)), ("sc", DecodedValue::IntArray(vec![1, 2]))]),
        ));
        assert_eq!(t.my_seat(), None);
        assert_eq!(t.view().dealer, Some(2));
        assert_eq!(t.view().scores, Some([1, 2]));
    }
}
