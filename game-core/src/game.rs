use crate::cards::{Card, Deck, PlayerHand, OPENER};
use crate::error::{DeckError, MoveError};
use crate::hand::Category;
use crate::table::{PlayOutcome, Table, PLAYER_COUNT};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub const HAND_SIZE: usize = 13;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Standing {
    Winner,
    Cards(usize),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Dealt {
        first: usize,
    },
    Rejected {
        player: usize,
        reason: String,
    },
    HandPlayed {
        player: usize,
        category: Category,
        cards: Vec<Card>,
    },
    Passed {
        player: usize,
    },
    TurnAdvanced {
        cursor: usize,
    },
    GameOver {
        standings: Vec<Standing>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Played(PlayOutcome),
    Passed { next_turn: usize },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameSession {
    players: [PlayerHand; PLAYER_COUNT],
    deck: Option<Deck>,
    table: Option<Table>,
    events: Vec<GameEvent>,
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deals cards 0..13 to seat 0, 13..26 to seat 1 and so on, and returns
    /// the seat holding the three of Diamonds, which moves first. Anything
    /// left from an earlier game is discarded.
    pub fn deal(&mut self, deck: Deck) -> usize {
        let mut first = 0;
        for (seat, chunk) in deck.cards().chunks(HAND_SIZE).enumerate() {
            let hand = &mut self.players[seat];
            hand.clear();
            hand.add_cards(chunk);
            if hand.contains(&OPENER) {
                first = seat;
            }
        }
        self.deck = Some(deck);
        self.table = Some(Table::new(first));
        info!(first, "cards dealt");
        self.events.push(GameEvent::Dealt { first });
        self.events.push(GameEvent::TurnAdvanced { cursor: first });
        first
    }

    pub fn on_deal_request(&mut self, cards: Vec<Card>) -> Result<usize, DeckError> {
        let deck = Deck::from_cards(cards).map_err(|err| {
            warn!(%err, "refusing to deal malformed deck");
            err
        })?;
        Ok(self.deal(deck))
    }

    /// A move from `player`. An empty selection is a pass.
    pub fn on_play(&mut self, player: usize, indices: &[usize]) -> Result<MoveOutcome, MoveError> {
        if indices.is_empty() {
            return self
                .on_pass(player)
                .map(|next_turn| MoveOutcome::Passed { next_turn });
        }
        let result = self.apply_play(player, indices);
        self.record(player, result)
    }

    pub fn on_pass(&mut self, player: usize) -> Result<usize, MoveError> {
        let result = match self.table.as_mut() {
            None => Err(MoveError::NotStarted),
            Some(table) => table.pass(player),
        };
        match result {
            Ok(next_turn) => {
                debug!(player, next_turn, "pass");
                self.events.push(GameEvent::Passed { player });
                self.events.push(GameEvent::TurnAdvanced { cursor: next_turn });
                Ok(next_turn)
            }
            Err(err) => Err(self.reject(player, err)),
        }
    }

    fn apply_play(&mut self, player: usize, indices: &[usize]) -> Result<PlayOutcome, MoveError> {
        let table = self.table.as_mut().ok_or(MoveError::NotStarted)?;
        let holding = self
            .players
            .get_mut(player)
            .ok_or(MoveError::OutOfTurn)?;
        table.play(player, holding, indices)
    }

    fn record(
        &mut self,
        player: usize,
        result: Result<PlayOutcome, MoveError>,
    ) -> Result<MoveOutcome, MoveError> {
        let outcome = result.map_err(|err| self.reject(player, err))?;
        debug!(player, hand = %outcome.hand, "hand played");
        self.events.push(GameEvent::HandPlayed {
            player,
            category: outcome.hand.category,
            cards: outcome.hand.cards.clone(),
        });
        if outcome.winner.is_some() {
            let standings = self.standings();
            info!(winner = player, ?standings, "game over");
            self.events.push(GameEvent::GameOver { standings });
        } else {
            self.events.push(GameEvent::TurnAdvanced {
                cursor: outcome.next_turn,
            });
        }
        Ok(MoveOutcome::Played(outcome))
    }

    fn reject(&mut self, player: usize, err: MoveError) -> MoveError {
        if err == MoveError::OutOfTurn {
            warn!(player, cursor = ?self.cursor(), "move received out of turn");
        } else {
            debug!(player, %err, "move rejected");
        }
        self.events.push(GameEvent::Rejected {
            player,
            reason: err.to_string(),
        });
        err
    }

    pub fn is_started(&self) -> bool {
        self.table.is_some()
    }

    pub fn is_game_over(&self) -> bool {
        self.table
            .as_ref()
            .and_then(|table| table.last_hand())
            .map_or(false, |hand| self.players[hand.owner].is_empty())
    }

    pub fn standings(&self) -> Vec<Standing> {
        self.players
            .iter()
            .map(|hand| match hand.len() {
                0 => Standing::Winner,
                n => Standing::Cards(n),
            })
            .collect()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.table.as_ref().map(|table| table.cursor())
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn deck(&self) -> Option<&Deck> {
        self.deck.as_ref()
    }

    pub fn player_hand(&self, player: usize) -> Option<&PlayerHand> {
        self.players.get(player)
    }

    pub fn player_hands(&self) -> &[PlayerHand; PLAYER_COUNT] {
        &self.players
    }

    pub fn abandon(&mut self) {
        for hand in self.players.iter_mut() {
            hand.clear();
        }
        self.deck = None;
        self.table = None;
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
