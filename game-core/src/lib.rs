pub mod cards;
pub mod error;
pub mod game;
pub mod hand;
pub mod table;

pub use cards::{sort_hand, Card, Deck, PlayerHand, Rank, Suit, DECK_SIZE, OPENER};
pub use error::{DeckError, IllegalMove, MoveError};
pub use game::{GameEvent, GameSession, MoveOutcome, Standing, HAND_SIZE};
pub use hand::{beats, classify, Category, Hand};
pub use table::{PlayOutcome, Table, PLAYER_COUNT};
