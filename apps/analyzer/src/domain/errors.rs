use thiserror::Error;

/// Errors raised while interpreting game-level values (cards, suits, modes).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("parse card: {0}")]
    ParseCard(String),
    #[error("card index not in deck: {0}")]
    InvalidCardIndex(i32),
    #[error("parse suit: {0}")]
    ParseSuit(String),
    #[error("parse mode: {0}")]
    ParseMode(String),
    #[error("parse declaration: {0}")]
    ParseDeclaration(String),
}
