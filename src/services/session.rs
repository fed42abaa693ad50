//! Session service: create, look up, drop, and drive layout sessions.
//!
//! DESIGN
//! ======
//! The session map lock is held only long enough to find or insert a
//! session handle. Commands then run under that session's own mutex, so a
//! slow command on one session never blocks another.
//!
//! EVICTION
//! ========
//! Every command or view marks its session used. A background reaper drops
//! sessions idle past `AppState::idle_timeout` that nobody holds a handle to,
//! and creation evicts the same way before refusing at the session limit.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use layout::command::Command;
use layout::engine::{Action, ImageFrame, View};
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};
use uuid::Uuid;

use crate::state::{AppState, LiveSession, Session};

/// Upper bound on how often the reaper wakes.
const MAX_REAP_INTERVAL: Duration = Duration::from_secs(60);

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session not found: {0}")]
    NotFound(Uuid),
    #[error("session limit reached: {0}")]
    LimitReached(usize),
}

/// What one command did, and the session as it stands afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct CommandReply {
    pub actions: Vec<Action>,
    pub view: View,
}

// =============================================================================
// LIFECYCLE
// =============================================================================

/// Start a new session, optionally with its roof image already attached.
///
/// # Errors
///
/// Returns [`SessionError::LimitReached`] when the server already holds
/// `max_sessions` sessions.
pub async fn create_session(state: &AppState, image: Option<ImageFrame>) -> Result<(Uuid, View), SessionError> {
    let mut engine = state.new_engine();
    if let Some(image) = image {
        engine.set_image(image);
    }
    let view = engine.view();

    let id = Uuid::new_v4();
    let mut sessions = state.sessions.write().await;
    if sessions.len() >= state.max_sessions {
        evict_idle(&mut sessions, state.idle_timeout, Instant::now());
    }
    if sessions.len() >= state.max_sessions {
        return Err(SessionError::LimitReached(state.max_sessions));
    }
    sessions.insert(id, Session::new(tokio::sync::Mutex::new(LiveSession::new(engine))));
    info!(%id, live = sessions.len(), "session: created");
    Ok((id, view))
}

/// Look up a live session handle.
///
/// # Errors
///
/// Returns [`SessionError::NotFound`] for an unknown id.
pub async fn get_session(state: &AppState, id: Uuid) -> Result<Session, SessionError> {
    state.sessions.read().await.get(&id).cloned().ok_or(SessionError::NotFound(id))
}

/// Drop a session. Clients still holding its handle finish their command.
///
/// # Errors
///
/// Returns [`SessionError::NotFound`] for an unknown id.
pub async fn delete_session(state: &AppState, id: Uuid) -> Result<(), SessionError> {
    let mut sessions = state.sessions.write().await;
    if sessions.remove(&id).is_none() {
        return Err(SessionError::NotFound(id));
    }
    info!(%id, live = sessions.len(), "session: deleted");
    Ok(())
}

// =============================================================================
// COMMANDS
// =============================================================================

/// Apply one command to a session and return its actions and new view.
///
/// # Errors
///
/// Returns [`SessionError::NotFound`] for an unknown id.
pub async fn execute(state: &AppState, id: Uuid, command: Command) -> Result<CommandReply, SessionError> {
    let session = get_session(state, id).await?;
    let mut live = session.lock().await;
    let engine = live.touch();
    let op = command.op();
    let actions = engine.execute(command);
    debug!(%id, op, actions = actions.len(), "session: command applied");
    Ok(CommandReply { actions, view: engine.view() })
}

/// Current read model of a session.
///
/// # Errors
///
/// Returns [`SessionError::NotFound`] for an unknown id.
pub async fn view(state: &AppState, id: Uuid) -> Result<View, SessionError> {
    let session = get_session(state, id).await?;
    let mut live = session.lock().await;
    Ok(live.touch().view())
}

// =============================================================================
// EVICTION
// =============================================================================

/// Drop sessions idle for at least `idle_timeout` as of `now`. Returns how
/// many were dropped.
pub async fn reap_idle(state: &AppState, now: Instant) -> usize {
    let mut sessions = state.sessions.write().await;
    let reaped = evict_idle(&mut sessions, state.idle_timeout, now);
    if reaped > 0 {
        info!(reaped, live = sessions.len(), "session: idle sessions evicted");
    }
    reaped
}

/// Spawn the background reaper. Returns a handle for shutdown.
pub fn spawn_session_reaper(state: AppState) -> JoinHandle<()> {
    let period = (state.idle_timeout / 4).clamp(Duration::from_secs(1), MAX_REAP_INTERVAL);
    info!(idle_secs = state.idle_timeout.as_secs(), period_secs = period.as_secs(), "session reaper configured");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            reap_idle(&state, Instant::now()).await;
        }
    })
}

/// A session is kept while anyone besides the map holds its handle, or while
/// its mutex is taken.
fn evict_idle(sessions: &mut HashMap<Uuid, Session>, idle_timeout: Duration, now: Instant) -> usize {
    let before = sessions.len();
    sessions.retain(|id, session| {
        if Arc::strong_count(session) > 1 {
            return true;
        }
        let Ok(live) = session.try_lock() else {
            return true;
        };
        let keep = now.saturating_duration_since(live.last_used) < idle_timeout;
        if !keep {
            debug!(%id, "session: idle");
        }
        keep
    });
    before - sessions.len()
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
