//! In-memory form sessions and their captcha timers.
//!
//! Sessions never leave process memory. Captcha timers are plain tokio
//! sleeps; when one wakes it re-enters the session through the store, and the
//! captcha ignores it if its generation is no longer current.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::Rng;
use redtape_common::RedTapeError;
use tokio::sync::RwLock;

use crate::captcha::{Effect, Ticket, Timings};
use crate::form::{FormSession, PendingTimer};

/// Settings every new session is created with
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub timings: Timings,
    pub birth_color: String,
    pub outbox_capacity: usize,
}

/// Shared handle to all live sessions
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, FormSession>>>,
    settings: Arc<SessionSettings>,
}

impl SessionStore {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            settings: Arc::new(settings),
        }
    }

    /// Start a new session and return its token
    pub async fn create(&self) -> String {
        let id = generate_session_id();
        let session = FormSession::new(
            self.settings.timings,
            &self.settings.birth_color,
            self.settings.outbox_capacity,
        );

        self.sessions.write().await.insert(id.clone(), session);
        tracing::debug!(session = %id, "Form session created");

        id
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Run `f` against a live session
    pub async fn with_session<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut FormSession) -> T,
    ) -> Result<T, RedTapeError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| RedTapeError::SessionNotFound(id.to_string()))?;

        session.touch();
        Ok(f(session))
    }

    /// Read a live session without counting it as activity
    pub async fn read_session<T>(
        &self,
        id: &str,
        f: impl FnOnce(&FormSession) -> T,
    ) -> Result<T, RedTapeError> {
        let sessions = self.sessions.read().await;
        let session = sessions
            .get(id)
            .ok_or_else(|| RedTapeError::SessionNotFound(id.to_string()))?;

        Ok(f(session))
    }

    /// Run a captcha transition and carry out whatever it asks for
    pub async fn drive(
        &self,
        id: &str,
        transition: impl FnOnce(&mut FormSession) -> Result<Vec<Effect>, RedTapeError>,
    ) -> Result<(), RedTapeError> {
        let timers = self
            .with_session(id, |session| {
                let effects = transition(session)?;
                Ok::<_, RedTapeError>(session.apply(effects))
            })
            .await??;

        self.arm(id, timers);
        Ok(())
    }

    /// Arm timers; each one fires back into the session when it wakes
    fn arm(&self, id: &str, timers: Vec<PendingTimer>) {
        for timer in timers {
            let store = self.clone();
            let id = id.to_string();

            tokio::spawn(async move {
                tokio::time::sleep(timer.delay).await;
                let follow_up = store.fire(&id, timer.ticket).await;
                store.arm(&id, follow_up);
            });
        }
    }

    async fn fire(&self, id: &str, ticket: Ticket) -> Vec<PendingTimer> {
        let mut sessions = self.sessions.write().await;

        match sessions.get_mut(id) {
            Some(session) => {
                let effects = session.captcha.fire(ticket);
                session.apply(effects)
            }
            None => {
                tracing::trace!(session = %id, timer = ?ticket.timer, "Timer for a discarded session");
                Vec::new()
            }
        }
    }

    /// Drop sessions idle for longer than `ttl`
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.idle_for() <= ttl);
        before - sessions.len()
    }
}

/// Background worker that sweeps idle sessions
pub async fn session_sweeper(
    store: SessionStore,
    ttl: Duration,
    interval: Duration,
    mut shutdown: tokio::sync::broadcast::Receiver<()>,
) {
    tracing::info!(ttl_secs = ttl.as_secs(), "🧹 Session sweeper started");

    loop {
        tokio::select! {
            _ = tokio::time::sleep(interval) => {
                let evicted = store.evict_idle(ttl).await;
                if evicted > 0 {
                    tracing::debug!(evicted, "Idle sessions swept");
                }
            }
            _ = shutdown.recv() => {
                tracing::info!("🧹 Session sweeper shutting down...");
                break;
            }
        }
    }
}

/// Generate a random, URL-safe session token
fn generate_session_id() -> String {
    let mut bytes = [0u8; 16];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
