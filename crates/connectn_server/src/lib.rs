//! Connect-N server library - authoritative sessions over WebSocket
//!
//! The server owns every board. Clients send column choices; the server
//! validates, applies captures, detects wins and broadcasts the result.
//!
//! # Architecture
//!
//! - **Session**: one game, its two-seat roster and lifecycle
//! - **Registry**: live sessions keyed by code
//! - **Protocol**: JSON messages tagged by `type`
//! - **Server**: turns one request into replies and broadcasts
//! - **WebSocket**: hub task serialising all events, per-socket outboxes
//! - **Replica**: client-side board rebuilt from broadcasts
//!
//! # Example
//!
//! ```
//! use connectn_server::{ClientMessage, ConnectionId, GameServer, ServerMessage};
//! use connectn_engine::GameMode;
//!
//! let mut server = GameServer::default();
//! let replies = server.handle(
//!     ConnectionId::new(1),
//!     ClientMessage::CreateSession {
//!         rows: 6,
//!         cols: 7,
//!         connect_n: 4,
//!         game_mode: GameMode::Classic,
//!         player_name: "alice".to_string(),
//!     },
//! );
//! assert!(matches!(replies[0].message, ServerMessage::SessionCreated { .. }));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod code;
mod config;
mod error;
mod local;
mod protocol;
mod registry;
mod replica;
mod server;
mod session;
mod ws;

// Crate-level exports - Session codes
pub use code::{CodeSource, DEFAULT_CODE_LENGTH, RandomCodes, SequenceCodes, SessionCode};

// Crate-level exports - Configuration
pub use config::{
    ENV_CODE_LENGTH, ENV_HOST, ENV_MAX_DIMENSION, ENV_PORT, ServerConfig, ServerConfigError,
};

// Crate-level exports - Errors
pub use error::{InvalidConfigReason, SessionError};

// Crate-level exports - Local play
pub use local::play_local;

// Crate-level exports - Protocol
pub use protocol::{ClientMessage, Outbound, PlayerInfo, ServerMessage};

// Crate-level exports - Sessions
pub use registry::{Abandoned, DEFAULT_MAX_DIMENSION, SessionRegistry};
pub use session::{ConnectionId, Participant, Session, SessionStatus};

// Crate-level exports - Server
pub use replica::{BoardReplica, ReplicaError};
pub use server::GameServer;
pub use ws::{AppState, HubEvent, router, run_hub, serve, spawn_hub};
