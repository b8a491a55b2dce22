//! Process-wide session store.
//!
//! The registry is an explicit value owned by the dispatcher, not a global.
//! Every structural change (insert on create, removal on abandonment)
//! happens inside the call that triggered it.

use crate::code::{CodeSource, RandomCodes, SessionCode};
use crate::error::{InvalidConfigReason, SessionError};
use crate::session::{ConnectionId, Session};
use connectn_engine::{GameConfig, MoveOutcome, Seat};
use std::collections::HashMap;
use tracing::{info, instrument, warn};

/// Attempts at drawing an unused code before giving up.
const CODE_ATTEMPTS: usize = 64;

/// Default limit on either board dimension.
pub const DEFAULT_MAX_DIMENSION: usize = 20;

/// A session ended by a disconnect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Abandoned {
    /// Code of the removed session.
    pub code: SessionCode,
    /// Name of the participant who left.
    pub departed: String,
    /// Connections still attached to the session.
    pub remaining: Vec<ConnectionId>,
}

/// All live sessions keyed by code.
pub struct SessionRegistry {
    sessions: HashMap<SessionCode, Session>,
    codes: Box<dyn CodeSource + Send>,
    max_dimension: usize,
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("sessions", &self.sessions.len())
            .field("max_dimension", &self.max_dimension)
            .finish()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(RandomCodes::default(), DEFAULT_MAX_DIMENSION)
    }
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new(codes: impl CodeSource + Send + 'static, max_dimension: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            codes: Box::new(codes),
            max_dimension,
        }
    }

    /// Creates a session and seats `creator` in seat one.
    ///
    /// # Errors
    ///
    /// Fails with [`SessionError::InvalidConfig`] for a rejected or oversized
    /// board, or [`SessionError::CodeSpaceExhausted`] if no unused code turns up.
    #[instrument(skip(self, creator_name))]
    pub fn create(
        &mut self,
        config: GameConfig,
        creator: ConnectionId,
        creator_name: String,
    ) -> Result<&Session, SessionError> {
        if config.rows() > self.max_dimension || config.cols() > self.max_dimension {
            warn!(max = self.max_dimension, "Board too large");
            return Err(SessionError::InvalidConfig {
                reason: InvalidConfigReason::TooLarge {
                    rows: config.rows(),
                    cols: config.cols(),
                    max: self.max_dimension,
                },
            });
        }
        config.validate()?;

        let code = self.fresh_code()?;
        let session = Session::create(code.clone(), config, creator, creator_name)?;
        info!(session_code = %code, live = self.sessions.len() + 1, "Session registered");
        Ok(&*self.sessions.entry(code).or_insert(session))
    }

    fn fresh_code(&mut self) -> Result<SessionCode, SessionError> {
        for _ in 0..CODE_ATTEMPTS {
            let code = self.codes.next_code();
            if !self.sessions.contains_key(&code) {
                return Ok(code);
            }
        }
        warn!(attempts = CODE_ATTEMPTS, "No unused session code found");
        Err(SessionError::CodeSpaceExhausted)
    }

    /// Seats `id` in the second seat of session `code`.
    #[instrument(skip(self, name))]
    pub fn join(
        &mut self,
        code: &SessionCode,
        id: ConnectionId,
        name: String,
    ) -> Result<(&Session, Seat), SessionError> {
        let session = self.session_mut(code)?;
        let seat = session.join(id, name)?;
        Ok((&*session, seat))
    }

    /// Applies a move in session `code`.
    #[instrument(skip(self))]
    pub fn make_move(
        &mut self,
        code: &SessionCode,
        id: ConnectionId,
        column: usize,
    ) -> Result<(&Session, MoveOutcome), SessionError> {
        let session = self.session_mut(code)?;
        let outcome = session.make_move(id, column)?;
        Ok((&*session, outcome))
    }

    /// Resets session `code` to a fresh board.
    #[instrument(skip(self))]
    pub fn reset(&mut self, code: &SessionCode, id: ConnectionId) -> Result<&Session, SessionError> {
        let session = self.session_mut(code)?;
        session.reset(id)?;
        Ok(&*session)
    }

    /// Abandons and removes every session seating `id`.
    ///
    /// Returns one entry per removed session naming who still needs to be
    /// told.
    #[instrument(skip(self))]
    pub fn disconnect(&mut self, id: ConnectionId) -> Vec<Abandoned> {
        let mut affected: Vec<SessionCode> = self
            .sessions
            .iter()
            .filter(|(_, s)| s.is_participant(id))
            .map(|(code, _)| code.clone())
            .collect();
        affected.sort();

        let mut abandoned = Vec::with_capacity(affected.len());
        for code in affected {
            let Some(mut session) = self.sessions.remove(&code) else {
                continue;
            };
            session.abandon();
            let departed = session
                .participant(id)
                .map(|p| p.name().clone())
                .unwrap_or_default();
            let remaining: Vec<ConnectionId> = session
                .participant_ids()
                .into_iter()
                .filter(|&other| other != id)
                .collect();
            info!(session_code = %code, %departed, "Session abandoned after disconnect");
            abandoned.push(Abandoned {
                code,
                departed,
                remaining,
            });
        }
        abandoned
    }

    /// Looks up a live session.
    pub fn get(&self, code: &SessionCode) -> Option<&Session> {
        self.sessions.get(code)
    }

    fn session_mut(&mut self, code: &SessionCode) -> Result<&mut Session, SessionError> {
        self.sessions
            .get_mut(code)
            .ok_or_else(|| SessionError::SessionNotFound { code: code.clone() })
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Checks if no session is live.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Codes of live sessions, sorted.
    pub fn codes(&self) -> Vec<SessionCode> {
        let mut codes: Vec<_> = self.sessions.keys().cloned().collect();
        codes.sort();
        codes
    }

    /// Largest accepted board dimension.
    pub fn max_dimension(&self) -> usize {
        self.max_dimension
    }
}
