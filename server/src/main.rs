use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use bigtwo_server::config::Config;
use bigtwo_server::protocol::{ClientMessage, ServerMessage};
use bigtwo_server::table::{Outgoing, PlayerConn, Recipient, TableError, TableManager};
use futures_util::{SinkExt, StreamExt};
use rand::Rng;
use std::error::Error;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{info, warn};

#[derive(Clone)]
struct AppState {
    table: Arc<Mutex<TableManager>>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(config.log_filter.as_str())
        .init();

    let state = AppState {
        table: Arc::new(Mutex::new(TableManager::new())),
    };

    let mut app = Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(|| async { "ok" }));
    if let Some(dir) = config.assets_dir.as_ref() {
        app = app.nest_service("/assets", ServeDir::new(dir));
    }
    let app = app
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any));

    info!(addr = %config.addr, "listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let conn_id = rand::thread_rng().gen::<u64>();
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(text) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
        }
    });

    let connected = {
        let mut table = state.table.lock().await;
        table
            .connect(PlayerConn {
                id: conn_id,
                tx: Some(tx.clone()),
            })
            .map(|seat| (seat, table.names()))
    };
    let seat = match connected {
        Ok((seat, names)) => {
            let _ = tx.send(ServerMessage::PlayerList { you: seat, names });
            seat
        }
        Err(_) => {
            info!(conn = conn_id, "table full, turning connection away");
            let _ = tx.send(ServerMessage::Full);
            return;
        }
    };

    while let Some(Ok(msg)) = ws_receiver.next().await {
        if let Message::Text(text) = msg {
            match serde_json::from_str::<ClientMessage>(&text) {
                Ok(ClientMessage::Quit) => break,
                Ok(client) => {
                    if let Err(err) = handle_client_message(&state, seat, &tx, client).await {
                        let _ = tx.send(ServerMessage::Error {
                            message: err.to_string(),
                        });
                    }
                }
                Err(_) => {
                    let _ = tx.send(ServerMessage::Error {
                        message: "invalid message".to_string(),
                    });
                }
            }
        }
    }

    leave_table(&state, seat).await;
}

async fn handle_client_message(
    state: &AppState,
    seat: usize,
    tx: &mpsc::UnboundedSender<ServerMessage>,
    client: ClientMessage,
) -> Result<(), TableError> {
    match client {
        ClientMessage::Ping => {
            let _ = tx.send(ServerMessage::Pong);
        }
        ClientMessage::Join { name } => {
            let mut table = state.table.lock().await;
            table.join(seat, &name)?;
            let name = table.name_of(seat).unwrap_or_default();
            broadcast(&table, ServerMessage::Join { player: seat, name });
        }
        ClientMessage::Ready => {
            let mut table = state.table.lock().await;
            table.ready(seat)?;
            broadcast(&table, ServerMessage::Ready { player: seat });
            if let Some(deck) = table.start_if_ready() {
                broadcast(&table, ServerMessage::Start { deck: deck.codes() });
                let outgoing = table.drain_messages();
                deliver(&table, outgoing);
                broadcast_table_state(&table);
            }
        }
        ClientMessage::Move { indices } => {
            let mut table = state.table.lock().await;
            let result = table.apply_move(seat, &indices);
            if result.is_ok() {
                broadcast(
                    &table,
                    ServerMessage::Move {
                        player: seat,
                        indices,
                    },
                );
            }
            let outgoing = table.drain_messages();
            deliver(&table, outgoing);
            if result.is_ok() {
                broadcast_table_state(&table);
            }
        }
        ClientMessage::Msg { text } => {
            let table = state.table.lock().await;
            let name = table
                .name_of(seat)
                .unwrap_or_else(|| format!("Player {}", seat));
            broadcast(
                &table,
                ServerMessage::Msg {
                    text: format!("{}: {}", name, text),
                },
            );
        }
        ClientMessage::Quit => {}
    }
    Ok(())
}

async fn leave_table(state: &AppState, seat: usize) {
    let mut table = state.table.lock().await;
    if let Some(result) = table.disconnect(seat) {
        if result.game_interrupted {
            warn!(seat, players = result.player_count, "game interrupted");
        }
        broadcast(&table, ServerMessage::Quit { player: seat });
        broadcast_table_state(&table);
    }
}

fn deliver(table: &TableManager, outgoing: Vec<Outgoing>) {
    for item in outgoing {
        match item.to {
            Recipient::All => broadcast(table, item.message),
            Recipient::Seat(seat) => send_to(table, seat, item.message),
        }
    }
}

fn broadcast(table: &TableManager, message: ServerMessage) {
    for (_, conn) in table.connections() {
        if let Some(tx) = conn.tx {
            let _ = tx.send(message.clone());
        }
    }
}

fn send_to(table: &TableManager, seat: usize, message: ServerMessage) {
    if let Some((_, conn)) = table.connections().into_iter().find(|(idx, _)| *idx == seat) {
        if let Some(tx) = conn.tx {
            let _ = tx.send(message);
        }
    }
}

fn broadcast_table_state(table: &TableManager) {
    for (seat, conn) in table.connections() {
        if let (Some(snapshot), Some(tx)) = (table.snapshot_for(seat), conn.tx) {
            let _ = tx.send(ServerMessage::TableState(snapshot));
        }
    }
}
