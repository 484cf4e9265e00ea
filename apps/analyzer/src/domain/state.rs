use crate::domain::rules::{PLAYERS, TEAMS};

pub type Seat = u8; // 0..=3
pub type TeamId = usize; // 0 = seats 0 & 2, 1 = seats 1 & 3

/// Seat / turn math helpers (4 fixed seats: 0..=3).
///
/// Clockwise direction is positive (+1).
/// Counter-clockwise direction is negative (-1).
#[inline]
pub fn seat_offset(seat: Seat, delta: i8) -> Seat {
    let seat_i = seat as i16;
    let delta_i = delta as i16;
    ((seat_i + delta_i).rem_euclid(PLAYERS as i16)) as Seat
}

/// Returns the next player clockwise (0 → 1 → 2 → 3 → 0).
#[inline]
pub fn next_player(p: Seat) -> Seat {
    seat_offset(p, 1)
}

/// Round-start seat (player to the left of the dealer).
#[inline]
pub fn round_start_seat(dealer: Seat) -> Seat {
    next_player(dealer)
}

#[inline]
pub fn partner(p: Seat) -> Seat {
    seat_offset(p, 2)
}

#[inline]
pub fn team_of(p: Seat) -> TeamId {
    (p as usize) % TEAMS
}

#[inline]
pub fn other_team(t: TeamId) -> TeamId {
    (t + 1) % TEAMS
}

/// Position of `seat` as seen from `viewer`: viewer is 0, partner 2, opponents 1 and 3.
#[inline]
pub fn relative_seat(seat: Seat, viewer: Seat) -> Seat {
    seat_offset(seat, -(viewer as i8))
}

/// Parse a seat number from loosely typed wire data.
pub fn seat_from_i64(v: i64) -> Option<Seat> {
    (0..PLAYERS as i64).contains(&v).then_some(v as Seat)
}
