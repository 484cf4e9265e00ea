//! Abnat to game-point rounding. Sun and Hokum use different rules.

use crate::domain::Mode;

/// Sun: divide by five; an odd quotient with a remainder rounds up.
pub fn sun_gp(raw: u32) -> i32 {
    let (q, r) = (raw / 5, raw % 5);
    let gp = if q % 2 == 1 && r > 0 { q + 1 } else { q };
    gp as i32
}

/// Hokum, one side: nearest ten, an exact five rounds down.
pub fn hokum_side_gp(raw: u32) -> i32 {
    let (q, r) = (raw / 10, raw % 10);
    let gp = if r > 5 { q + 1 } else { q };
    gp as i32
}

/// Hokum pair. For complete rounds a pair that misses the target by one is
/// nudged back: the side with the larger remainder moves, and on equal
/// remainders the raw totals break the tie.
pub fn hokum_pair_gp(raw: [u32; 2], complete: bool) -> [i32; 2] {
    let mut gp = [hokum_side_gp(raw[0]), hokum_side_gp(raw[1])];
    if !complete {
        return gp;
    }
    let target = Mode::Hokum.gp_target();
    let diff = gp[0] + gp[1] - target;
    if diff.abs() != 1 {
        return gp;
    }
    let rem = [raw[0] % 10, raw[1] % 10];
    let mut side = if rem[0] != rem[1] {
        usize::from(rem[1] > rem[0])
    } else if diff > 0 {
        // Over: the lower raw total gives up the point.
        usize::from(raw[1] < raw[0])
    } else {
        // Under: the higher raw total gains it.
        usize::from(raw[1] > raw[0])
    };
    if diff > 0 && gp[side] == 0 {
        side = 1 - side;
    }
    gp[side] -= diff;
    gp
}

/// Card game points per team for a mode.
pub fn card_gp(mode: Mode, raw: [u32; 2], complete: bool) -> [i32; 2] {
    match mode {
        Mode::Sun => [sun_gp(raw[0]), sun_gp(raw[1])],
        Mode::Hokum => hokum_pair_gp(raw, complete),
    }
}
