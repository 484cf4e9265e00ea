//! Round boundary detection.

use crate::domain::{Mode, Seat, Suit, HAND_SIZE, PLAYERS};
use crate::extraction::types::TableEvent;

/// A new round begins; the fields seed it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Boundary {
    pub dealer: Option<Seat>,
    pub mode: Option<Mode>,
    pub trump: Option<Suit>,
}

/// Decides, per event, whether a new round starts before the event is applied.
pub trait BoundaryDetector {
    fn observe(&mut self, event: &TableEvent) -> Option<Boundary>;
}

/// Live heuristic: remaining-card counts jump back up to a full hand, or the
/// dealer moves while hands are full.
#[derive(Debug, Clone)]
pub struct HandCountResetDetector {
    full_hand: u8,
    prev_counts: Option<[u8; PLAYERS]>,
    prev_dealer: Option<Seat>,
}

impl Default for HandCountResetDetector {
    fn default() -> Self {
        Self::new(HAND_SIZE)
    }
}

impl HandCountResetDetector {
    pub fn new(full_hand: u8) -> Self {
        Self {
            full_hand,
            prev_counts: None,
            prev_dealer: None,
        }
    }
}

impl BoundaryDetector for HandCountResetDetector {
    fn observe(&mut self, event: &TableEvent) -> Option<Boundary> {
        let TableEvent::Snapshot(snap) = event else {
            return None;
        };

        let dealer_changed = matches!(
            (self.prev_dealer, snap.dealer),
            (Some(prev), Some(now)) if prev != now
        );
        if snap.dealer.is_some() {
            self.prev_dealer = snap.dealer;
        }

        let counts = snap.counts?;
        let full = counts.iter().all(|&c| c == self.full_hand);
        let rose = match self.prev_counts {
            None => true,
            Some(prev) => counts.iter().zip(prev.iter()).any(|(now, before)| now > before),
        };
        self.prev_counts = Some(counts);

        (full && (rose || dealer_changed)).then_some(Boundary {
            dealer: snap.dealer,
            mode: snap.mode,
            trump: snap.trump,
        })
    }
}

/// Archive path: explicit round-start markers.
#[derive(Debug, Clone, Default)]
pub struct MarkerBoundaryDetector;

impl BoundaryDetector for MarkerBoundaryDetector {
    fn observe(&mut self, event: &TableEvent) -> Option<Boundary> {
        match *event {
            TableEvent::RoundStart {
                dealer,
                mode,
                trump,
            } => Some(Boundary {
                dealer,
                mode,
                trump,
            }),
            _ => None,
        }
    }
}
