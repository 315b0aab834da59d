use crate::protocol::{HandView, PlayerInfo, ServerMessage, StandingView, TableSnapshot};
use bigtwo_core::{
    Card, Deck, DeckError, GameEvent, GameSession, MoveError, MoveOutcome, Standing, PLAYER_COUNT,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

#[derive(Clone, Debug)]
pub struct PlayerConn {
    pub id: u64,
    pub tx: Option<UnboundedSender<ServerMessage>>,
}

#[derive(Clone, Debug)]
struct Seat {
    conn: PlayerConn,
    name: Option<String>,
    ready: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("table is full")]
    Full,
    #[error("seat {0} is empty")]
    NotSeated(usize),
    #[error("join with a name first")]
    NotJoined,
    #[error("name must not be empty")]
    EmptyName,
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error(transparent)]
    Deck(#[from] DeckError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recipient {
    All,
    Seat(usize),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outgoing {
    pub to: Recipient,
    pub message: ServerMessage,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisconnectResult {
    pub game_interrupted: bool,
    pub player_count: usize,
}

#[derive(Debug)]
pub struct TableManager {
    seats: [Option<Seat>; PLAYER_COUNT],
    session: GameSession,
    rng: StdRng,
}

impl Default for TableManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TableManager {
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            seats: Default::default(),
            session: GameSession::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn connect(&mut self, conn: PlayerConn) -> Result<usize, TableError> {
        let seat = self
            .seats
            .iter()
            .position(|seat| seat.is_none())
            .ok_or(TableError::Full)?;
        info!(seat, conn = conn.id, "player connected");
        self.seats[seat] = Some(Seat {
            conn,
            name: None,
            ready: false,
        });
        Ok(seat)
    }

    pub fn disconnect(&mut self, seat: usize) -> Option<DisconnectResult> {
        self.seats.get_mut(seat)?.take()?;
        let game_interrupted = self.in_progress();
        if game_interrupted {
            warn!(seat, "player left mid-game, abandoning it");
            self.session.abandon();
            self.session.drain_events();
        }
        for other in self.seats.iter_mut().flatten() {
            other.ready = false;
        }
        Some(DisconnectResult {
            game_interrupted,
            player_count: self.player_count(),
        })
    }

    pub fn join(&mut self, seat: usize, name: &str) -> Result<(), TableError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TableError::EmptyName);
        }
        let slot = self.seat_mut(seat)?;
        slot.name = Some(name.to_string());
        Ok(())
    }

    pub fn ready(&mut self, seat: usize) -> Result<(), TableError> {
        let slot = self.seat_mut(seat)?;
        if slot.name.is_none() {
            return Err(TableError::NotJoined);
        }
        slot.ready = true;
        Ok(())
    }

    pub fn start_if_ready(&mut self) -> Option<Deck> {
        let all_ready = self
            .seats
            .iter()
            .all(|seat| seat.as_ref().map_or(false, |s| s.ready && s.name.is_some()));
        if !all_ready || self.in_progress() {
            return None;
        }
        let deck = Deck::shuffled(self.rng.gen());
        match self.start_with(deck.cards().to_vec()) {
            Ok(_) => Some(deck),
            Err(err) => {
                warn!(%err, "could not start game");
                None
            }
        }
    }

    pub fn start_with(&mut self, cards: Vec<Card>) -> Result<usize, TableError> {
        let first = self.session.on_deal_request(cards)?;
        for seat in self.seats.iter_mut().flatten() {
            seat.ready = false;
        }
        info!(first, "game started");
        Ok(first)
    }

    pub fn apply_move(
        &mut self,
        seat: usize,
        indices: &[usize],
    ) -> Result<MoveOutcome, TableError> {
        self.seat_mut(seat)?;
        Ok(self.session.on_play(seat, indices)?)
    }

    pub fn drain_messages(&mut self) -> Vec<Outgoing> {
        self.session
            .drain_events()
            .into_iter()
            .filter_map(|event| self.event_to_outgoing(event))
            .collect()
    }

    fn event_to_outgoing(&self, event: GameEvent) -> Option<Outgoing> {
        let (to, message) = match event {
            GameEvent::Dealt { .. } => return None,
            GameEvent::Rejected { player, reason } => {
                (Recipient::Seat(player), ServerMessage::Rejected { reason })
            }
            GameEvent::HandPlayed {
                player,
                category,
                cards,
            } => (
                Recipient::All,
                ServerMessage::HandPlayed {
                    player,
                    category: category.to_string(),
                    cards: cards.iter().map(|card| card.code()).collect(),
                },
            ),
            GameEvent::Passed { player } => (Recipient::All, ServerMessage::Passed { player }),
            GameEvent::TurnAdvanced { cursor } => {
                (Recipient::All, ServerMessage::TurnAdvanced { cursor })
            }
            GameEvent::GameOver { standings } => (
                Recipient::All,
                ServerMessage::GameOver {
                    standings: self.standing_views(&standings),
                },
            ),
        };
        Some(Outgoing { to, message })
    }

    fn standing_views(&self, standings: &[Standing]) -> Vec<StandingView> {
        standings
            .iter()
            .enumerate()
            .map(|(seat, standing)| StandingView {
                seat,
                name: self.name_of(seat),
                winner: *standing == Standing::Winner,
                cards_left: match standing {
                    Standing::Winner => 0,
                    Standing::Cards(n) => *n,
                },
            })
            .collect()
    }

    pub fn snapshot_for(&self, seat: usize) -> Option<TableSnapshot> {
        self.seats.get(seat)?.as_ref()?;
        let players = (0..PLAYER_COUNT)
            .map(|idx| PlayerInfo {
                seat: idx,
                name: self.name_of(idx),
                hand_count: self.session.player_hand(idx).map_or(0, |hand| hand.len()),
                ready: self.seats[idx].as_ref().map_or(false, |s| s.ready),
            })
            .collect();
        let table = self.session.table();
        let last_hand = table.and_then(|table| table.last_hand()).map(|hand| HandView {
            owner: hand.owner,
            category: hand.category.to_string(),
            cards: hand.cards.iter().map(|card| card.code()).collect(),
        });
        let your_hand = self
            .session
            .player_hand(seat)
            .map(|hand| hand.cards().iter().map(|card| card.code()).collect())
            .unwrap_or_default();
        Some(TableSnapshot {
            players,
            cursor: self.session.cursor(),
            last_hand,
            hands_played: table.map_or(0, |table| table.hands().len()),
            game_over: self.session.is_game_over(),
            your_hand,
        })
    }

    pub fn connections(&self) -> Vec<(usize, PlayerConn)> {
        self.seats
            .iter()
            .enumerate()
            .filter_map(|(idx, seat)| seat.as_ref().map(|s| (idx, s.conn.clone())))
            .collect()
    }

    pub fn names(&self) -> Vec<Option<String>> {
        (0..PLAYER_COUNT).map(|seat| self.name_of(seat)).collect()
    }

    pub fn name_of(&self, seat: usize) -> Option<String> {
        self.seats.get(seat)?.as_ref()?.name.clone()
    }

    pub fn player_count(&self) -> usize {
        self.seats.iter().flatten().count()
    }

    pub fn in_progress(&self) -> bool {
        self.session.is_started() && !self.session.is_game_over()
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    fn seat_mut(&mut self, seat: usize) -> Result<&mut Seat, TableError> {
        self.seats
            .get_mut(seat)
            .and_then(|slot| slot.as_mut())
            .ok_or(TableError::NotSeated(seat))
    }
}
