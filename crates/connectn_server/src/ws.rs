//! WebSocket transport.
//!
//! ```text
//! socket task ──┐                         ┌──> outbox ──> socket writer
//! socket task ──┼──> hub channel ──> hub ─┼──> outbox ──> socket writer
//! socket task ──┘    (HubEvent)    (GameServer)
//! ```
//!
//! Each socket parses frames and forwards them to a single hub task, which
//! owns the [`GameServer`] and handles events strictly in arrival order.
//! Replies travel back through per-connection unbounded outboxes; a send to
//! a closed outbox is dropped.

use crate::code::RandomCodes;
use crate::config::ServerConfig;
use crate::protocol::{ClientMessage, Outbound, ServerMessage};
use crate::registry::SessionRegistry;
use crate::server::GameServer;
use crate::session::ConnectionId;
use axum::{
    Json, Router,
    body::Body,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::Request,
    response::IntoResponse,
    routing::get,
};
use futures::{SinkExt, StreamExt};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tracing::{debug, error, info, instrument, warn};

/// Events consumed by the hub.
#[derive(Debug)]
pub enum HubEvent {
    /// A socket opened.
    Connected {
        /// New connection.
        id: ConnectionId,
        /// Where to deliver this connection's messages.
        outbox: mpsc::UnboundedSender<ServerMessage>,
    },
    /// A well-formed request arrived.
    Message {
        /// Sender.
        id: ConnectionId,
        /// Parsed request.
        message: ClientMessage,
    },
    /// A frame failed to parse.
    Malformed {
        /// Sender.
        id: ConnectionId,
        /// Parser error text.
        error: String,
    },
    /// A socket closed.
    Disconnected {
        /// Closed connection.
        id: ConnectionId,
    },
}

/// Runs the hub until every event sender is dropped.
#[instrument(skip_all)]
pub async fn run_hub(mut server: GameServer, mut events: mpsc::UnboundedReceiver<HubEvent>) {
    let mut outboxes: HashMap<ConnectionId, mpsc::UnboundedSender<ServerMessage>> =
        HashMap::new();

    info!("Hub started");
    while let Some(event) = events.recv().await {
        let outbound = match event {
            HubEvent::Connected { id, outbox } => {
                debug!(%id, connections = outboxes.len() + 1, "Connection registered");
                outboxes.insert(id, outbox);
                continue;
            }
            HubEvent::Message { id, message } => server.handle(id, message),
            HubEvent::Malformed { id, error } => {
                warn!(%id, %error, "Malformed message");
                vec![Outbound::new(
                    id,
                    ServerMessage::Error {
                        message: format!("Malformed message: {}", error),
                    },
                )]
            }
            HubEvent::Disconnected { id } => {
                outboxes.remove(&id);
                server.disconnect(id)
            }
        };
        deliver(&outboxes, outbound);
    }
    info!("Hub stopped");
}

fn deliver(
    outboxes: &HashMap<ConnectionId, mpsc::UnboundedSender<ServerMessage>>,
    outbound: Vec<Outbound>,
) {
    for Outbound { to, message } in outbound {
        match outboxes.get(&to) {
            Some(outbox) => {
                if outbox.send(message).is_err() {
                    debug!(%to, "Outbox closed, message dropped");
                }
            }
            None => debug!(%to, "No outbox for connection, message dropped"),
        }
    }
}

/// Spawns the hub on the current runtime.
pub fn spawn_hub(server: GameServer) -> (mpsc::UnboundedSender<HubEvent>, JoinHandle<()>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(run_hub(server, rx));
    (tx, handle)
}

/// Shared state for the HTTP handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    hub: mpsc::UnboundedSender<HubEvent>,
    next_id: Arc<AtomicU64>,
}

impl AppState {
    /// Wraps a hub sender.
    pub fn new(hub: mpsc::UnboundedSender<HubEvent>) -> Self {
        Self {
            hub,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    fn allocate_id(&self) -> ConnectionId {
        ConnectionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

/// Builds the HTTP router: `/ws` for play, `/health` for probes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            debug!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

#[instrument(skip_all)]
async fn handle_socket(socket: WebSocket, state: AppState) {
    let id = state.allocate_id();
    let (outbox_tx, mut outbox_rx) = mpsc::unbounded_channel::<ServerMessage>();
    if state
        .hub
        .send(HubEvent::Connected {
            id,
            outbox: outbox_tx,
        })
        .is_err()
    {
        warn!(%id, "Hub stopped, refusing connection");
        return;
    }
    info!(%id, "Client connected");

    let (mut sink, mut stream) = socket.split();

    let writer = tokio::spawn(async move {
        while let Some(message) = outbox_rx.recv().await {
            let json = match serde_json::to_string(&message) {
                Ok(json) => json,
                Err(e) => {
                    error!(%id, error = %e, "Failed to serialize message");
                    continue;
                }
            };
            if let Err(e) = sink.send(Message::Text(json.into())).await {
                debug!(%id, error = %e, "Socket closed while sending");
                break;
            }
        }
    });

    while let Some(frame) = stream.next().await {
        let event = match frame {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(text.as_str()) {
                Ok(message) => HubEvent::Message { id, message },
                Err(e) => HubEvent::Malformed {
                    id,
                    error: e.to_string(),
                },
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                warn!(%id, error = %e, "WebSocket error");
                break;
            }
        };
        if state.hub.send(event).is_err() {
            warn!(%id, "Hub stopped");
            break;
        }
    }

    if state.hub.send(HubEvent::Disconnected { id }).is_err() {
        debug!(%id, "Hub already stopped");
    }
    writer.abort();
    info!(%id, "Client disconnected");
}

/// Binds the configured address and serves until the listener fails.
#[instrument(skip(config), fields(address = %config.bind_address()))]
pub async fn serve(config: &ServerConfig) -> std::io::Result<()> {
    let registry = SessionRegistry::new(
        RandomCodes::new(*config.code_length()),
        *config.max_dimension(),
    );
    let (hub, _hub_task) = spawn_hub(GameServer::new(registry));
    let app = router(AppState::new(hub));

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!(address = %listener.local_addr()?, "Server ready");
    axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::SequenceCodes;
    use crate::code::SessionCode;
    use connectn_engine::{GameMode, Seat};
    use tower::ServiceExt;

    fn server() -> GameServer {
        GameServer::new(SessionRegistry::new(SequenceCodes::new(["ROOM01"]), 20))
    }

    #[tokio::test]
    async fn test_hub_routes_replies_to_requester() {
        let (hub, handle) = spawn_hub(server());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = ConnectionId::new(1);
        hub.send(HubEvent::Connected { id, outbox: tx }).unwrap();
        hub.send(HubEvent::Message {
            id,
            message: ClientMessage::CreateSession {
                rows: 6,
                cols: 7,
                connect_n: 4,
                game_mode: GameMode::Classic,
                player_name: "alice".into(),
            },
        })
        .unwrap();

        assert_eq!(
            rx.recv().await.unwrap(),
            ServerMessage::SessionCreated {
                session_code: SessionCode::new("ROOM01"),
                seat_number: Seat::One,
            }
        );
        drop(hub);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_goes_to_sender_only() {
        let (hub, handle) = spawn_hub(server());
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        let a = ConnectionId::new(1);
        let b = ConnectionId::new(2);
        hub.send(HubEvent::Connected { id: a, outbox: tx_a }).unwrap();
        hub.send(HubEvent::Connected { id: b, outbox: tx_b }).unwrap();
        hub.send(HubEvent::Malformed {
            id: a,
            error: "expected value".into(),
        })
        .unwrap();
        drop(hub);
        handle.await.unwrap();

        assert!(matches!(rx_a.recv().await, Some(ServerMessage::Error { .. })));
        assert!(rx_a.recv().await.is_none());
        assert!(rx_b.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_health() {
        let (hub, _handle) = spawn_hub(server());
        let response = router(AppState::new(hub))
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }
}
