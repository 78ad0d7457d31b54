use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::config::{DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_IDLE_TTL};
use crate::errors::AppError;
use crate::session::state_machine::{SessionState, Transition, TransitionError};

#[derive(Debug, Clone)]
struct SessionEntry {
    state: SessionState,
    touched: Instant,
}

impl SessionEntry {
    fn new(state: SessionState) -> Self {
        Self {
            state,
            touched: Instant::now(),
        }
    }

    fn is_idle(&self, ttl: Duration) -> bool {
        self.touched.elapsed() > ttl
    }
}

/// In-memory session map. Nothing here outlives the process.
///
/// Bounded two ways: sessions idle for longer than `idle_ttl` are evicted,
/// and creating a session beyond `max_sessions` evicts the least recently
/// touched one.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
    idle_ttl: Duration,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(DEFAULT_SESSION_IDLE_TTL, DEFAULT_MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(idle_ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    pub async fn create(&self) -> (Uuid, SessionState) {
        let id = Uuid::new_v4();
        let state = SessionState::default();

        let mut sessions = self.sessions.write().await;
        let ttl = self.idle_ttl;
        sessions.retain(|_, entry| !entry.is_idle(ttl));
        while sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.touched)
                .map(|(id, _)| *id);
            match oldest {
                Some(oldest) => {
                    sessions.remove(&oldest);
                    info!(session_id = %oldest, "session evicted to stay under the cap");
                }
                None => break,
            }
        }
        sessions.insert(id, SessionEntry::new(state.clone()));
        (id, state)
    }

    pub async fn get(&self, id: Uuid) -> Result<SessionState, AppError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .map(|entry| entry.state.clone())
            .ok_or_else(|| not_found(id))
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }

    /// Runs `step` against the current state and stores the new state if it
    /// succeeds. The write lock is held only for the synchronous step.
    pub async fn apply<F>(&self, id: Uuid, step: F) -> Result<Transition, AppError>
    where
        F: FnOnce(&SessionState) -> Result<Transition, TransitionError>,
    {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        let transition = step(&entry.state)?;
        entry.state = transition.state.clone();
        entry.touched = Instant::now();
        Ok(transition)
    }

    /// Drops every session idle for longer than the TTL. Returns how many went.
    pub async fn evict_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        let ttl = self.idle_ttl;
        sessions.retain(|_, entry| !entry.is_idle(ttl));
        before - sessions.len()
    }

    /// Periodically evicts idle sessions for as long as the runtime lives.
    pub fn spawn_idle_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let evicted = store.evict_idle().await;
                if evicted > 0 {
                    info!(evicted, "evicted idle sessions");
                }
            }
        })
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}
