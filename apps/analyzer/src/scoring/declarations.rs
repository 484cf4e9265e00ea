use crate::domain::{DeclarationKind, Mode};

/// Game points of one declaration. The baloot pair is scored on its own and
/// yields zero here.
pub fn declaration_gp(kind: DeclarationKind, mode: Mode) -> i32 {
    match (kind, mode) {
        (DeclarationKind::Baloot, _) => 0,
        (DeclarationKind::FourHundred, Mode::Sun) => 40,
        (DeclarationKind::FourHundred, Mode::Hokum) => {
            (DeclarationKind::Hundred.raw_value() / mode.declaration_divisor()) as i32
        }
        (k, m) => (k.raw_value() / m.declaration_divisor()) as i32,
    }
}
