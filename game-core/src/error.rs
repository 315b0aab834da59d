use crate::cards::Card;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum IllegalMove {
    #[error("the first hand of the game must contain the three of Diamonds")]
    MissingOpener,
    #[error("hand must have the same number of cards as the last hand")]
    SizeMismatch,
    #[error("hand does not beat the last hand")]
    DoesNotBeat,
    #[error("cannot pass while leading a round")]
    PassOnFreshRound,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("not a legal move: selected cards do not form a hand")]
    InvalidSelection,
    #[error("not a legal move: {0}")]
    Illegal(IllegalMove),
    #[error("not your turn")]
    OutOfTurn,
    #[error("game is over")]
    GameOver,
    #[error("game has not started")]
    NotStarted,
}

impl From<IllegalMove> for MoveError {
    fn from(err: IllegalMove) -> Self {
        MoveError::Illegal(err)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("deck must hold 52 cards, got {0}")]
    WrongSize(usize),
    #[error("deck contains {0} more than once")]
    Duplicate(Card),
    #[error("unknown card code {0:?}")]
    UnknownCard(String),
}
