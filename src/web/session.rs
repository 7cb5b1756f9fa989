use log::info;
use std::collections::HashMap;
use std::mem;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use thiserror::Error;
use uuid::Uuid;

use crate::chat::{transition, ChatState, Effect, Event, Transition};
use crate::i18n::Language;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("unknown session {0}")]
    NotFound(Uuid),
    #[error("session store lock poisoned")]
    Poisoned,
}

/// One browser page's conversation.
pub struct Session {
    state: ChatState,
    last_seen: Instant,
}

impl Session {
    fn new(language: Language) -> Self {
        Self {
            state: ChatState::new(language),
            last_seen: Instant::now(),
        }
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    pub fn apply(&mut self, event: Event) -> Vec<Effect> {
        self.last_seen = Instant::now();
        let Transition { state, effects } = transition(mem::take(&mut self.state), event);
        self.state = state;
        effects
    }
}

/// In-memory sessions. Nothing here outlives the process.
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, Session>>,
    idle_limit: Duration,
}

impl SessionStore {
    pub fn new(idle_limit: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_limit,
        }
    }

    /// Starts a fresh conversation, dropping any that have sat idle past the
    /// limit. A session waiting on a completion is never idle.
    pub fn create(&self, language: Language) -> Result<Uuid, SessionError> {
        let mut sessions = self.sessions.lock().map_err(|_| SessionError::Poisoned)?;

        let before = sessions.len();
        let idle_limit = self.idle_limit;
        sessions.retain(|_, session| {
            session.state.is_loading() || session.last_seen.elapsed() < idle_limit
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Evicted {} idle sessions", evicted);
        }

        let id = Uuid::new_v4();
        sessions.insert(id, Session::new(language));
        info!("Created session {} ({} active)", id, sessions.len());
        Ok(id)
    }

    /// Runs `f` against the session while holding the store lock. Keep `f`
    /// short; never await inside it.
    pub fn with_session<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Session) -> R,
    ) -> Result<R, SessionError> {
        let mut sessions = self.sessions.lock().map_err(|_| SessionError::Poisoned)?;
        let session = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
        Ok(f(session))
    }
}
