//! Message dispatcher.
//!
//! [`GameServer`] turns one inbound request into the replies and broadcasts
//! it causes. It is synchronous and owns the registry outright, so the
//! caller serialises events simply by calling it from one task.

use crate::code::SessionCode;
use crate::error::SessionError;
use crate::protocol::{ClientMessage, Outbound, ServerMessage};
use crate::registry::SessionRegistry;
use crate::session::ConnectionId;
use connectn_engine::{GameConfig, Seat};
use tracing::{debug, info, instrument, warn};

/// Authoritative connect-N server core.
#[derive(Debug, Default)]
pub struct GameServer {
    registry: SessionRegistry,
}

impl GameServer {
    /// Creates a server around an existing registry.
    pub fn new(registry: SessionRegistry) -> Self {
        Self { registry }
    }

    /// Read access to live sessions.
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Handles one request from `from`.
    ///
    /// A rejected request yields exactly one `error` message to `from` and
    /// changes nothing.
    #[instrument(skip(self, message))]
    pub fn handle(&mut self, from: ConnectionId, message: ClientMessage) -> Vec<Outbound> {
        let result = match message {
            ClientMessage::CreateSession {
                rows,
                cols,
                connect_n,
                game_mode,
                player_name,
            } => GameConfig::new(rows, cols, connect_n, game_mode)
                .map_err(SessionError::from)
                .and_then(|config| self.create(from, config, player_name)),
            ClientMessage::JoinSession {
                session_code,
                player_name,
            } => self.join(from, &session_code, player_name),
            ClientMessage::MakeMove {
                session_code,
                column,
            } => self.make_move(from, &session_code, column),
            ClientMessage::ResetSession { session_code } => self.reset(from, &session_code),
        };

        result.unwrap_or_else(|err| {
            warn!(%from, error = %err, "Request rejected");
            vec![Outbound::new(from, ServerMessage::error(&err))]
        })
    }

    fn create(
        &mut self,
        from: ConnectionId,
        config: GameConfig,
        player_name: String,
    ) -> Result<Vec<Outbound>, SessionError> {
        let session = self.registry.create(config, from, player_name)?;
        Ok(vec![Outbound::new(
            from,
            ServerMessage::SessionCreated {
                session_code: session.code().clone(),
                seat_number: Seat::One,
            },
        )])
    }

    fn join(
        &mut self,
        from: ConnectionId,
        code: &SessionCode,
        player_name: String,
    ) -> Result<Vec<Outbound>, SessionError> {
        let (session, seat) = self.registry.join(code, from, player_name)?;
        let mut out = vec![Outbound::new(
            from,
            ServerMessage::SessionJoined {
                session_code: session.code().clone(),
                seat_number: seat,
                config: *session.config(),
            },
        )];
        out.extend(Outbound::broadcast(
            &session.participant_ids(),
            &ServerMessage::session_start(session),
        ));
        Ok(out)
    }

    fn make_move(
        &mut self,
        from: ConnectionId,
        code: &SessionCode,
        column: usize,
    ) -> Result<Vec<Outbound>, SessionError> {
        let (session, outcome) = self.registry.make_move(code, from, column)?;
        debug!(
            session_code = %code,
            row = outcome.row,
            column,
            captured = outcome.captured.len(),
            "Broadcasting move"
        );
        Ok(Outbound::broadcast(
            &session.participant_ids(),
            &ServerMessage::move_applied(&outcome),
        ))
    }

    fn reset(
        &mut self,
        from: ConnectionId,
        code: &SessionCode,
    ) -> Result<Vec<Outbound>, SessionError> {
        let session = self.registry.reset(code, from)?;
        Ok(Outbound::broadcast(
            &session.participant_ids(),
            &ServerMessage::session_reset(session),
        ))
    }

    /// Handles a closed connection.
    ///
    /// Every session seating `id` is abandoned and removed; the other
    /// participant of each receives `participant-disconnected`.
    #[instrument(skip(self))]
    pub fn disconnect(&mut self, id: ConnectionId) -> Vec<Outbound> {
        let abandoned = self.registry.disconnect(id);
        if !abandoned.is_empty() {
            info!(%id, sessions = abandoned.len(), "Connection left active sessions");
        }
        abandoned
            .into_iter()
            .flat_map(|a| {
                Outbound::broadcast(
                    &a.remaining,
                    &ServerMessage::ParticipantDisconnected { name: a.departed },
                )
            })
            .collect()
    }
}
