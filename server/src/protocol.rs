use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    Join { name: String },
    Ready,
    /// Positions into the sender's sorted hand. Empty means pass.
    Move { indices: Vec<usize> },
    Msg { text: String },
    Quit,
    Ping,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    PlayerList {
        you: usize,
        names: Vec<Option<String>>,
    },
    Full,
    Join {
        player: usize,
        name: String,
    },
    Ready {
        player: usize,
    },
    Start {
        deck: Vec<String>,
    },
    Move {
        player: usize,
        indices: Vec<usize>,
    },
    HandPlayed {
        player: usize,
        category: String,
        cards: Vec<String>,
    },
    Passed {
        player: usize,
    },
    TurnAdvanced {
        cursor: usize,
    },
    Rejected {
        reason: String,
    },
    GameOver {
        standings: Vec<StandingView>,
    },
    Quit {
        player: usize,
    },
    Msg {
        text: String,
    },
    TableState(TableSnapshot),
    Error {
        message: String,
    },
    Pong,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub seat: usize,
    pub name: Option<String>,
    pub hand_count: usize,
    pub ready: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandView {
    pub owner: usize,
    pub category: String,
    pub cards: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingView {
    pub seat: usize,
    pub name: Option<String>,
    pub winner: bool,
    pub cards_left: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub players: Vec<PlayerInfo>,
    pub cursor: Option<usize>,
    pub last_hand: Option<HandView>,
    pub hands_played: usize,
    pub game_over: bool,
    pub your_hand: Vec<String>,
}
