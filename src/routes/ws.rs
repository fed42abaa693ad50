//! WebSocket handler: command relay for one layout session.
//!
//! DESIGN
//! ======
//! A socket is bound to a single session at upgrade time. Each inbound text
//! frame is one JSON `Command`; the reply frame carries the actions it
//! produced and the session view afterwards. Malformed frames get an
//! `{error}` reply and the connection stays open.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → 404 if the session is unknown
//! 2. Client sends command frames → session service → reply frame
//! 3. Close → connection ends; the session lives on until deleted or reaped
//!
//! The connection holds the session handle while open, which keeps the
//! reaper away from it however long the client stays quiet.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use layout::command::Command;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::services::session::{self, CommandReply};
use crate::state::{AppState, Session};

/// One outbound frame.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum Reply {
    Applied(CommandReply),
    Error { error: String },
}

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(State(state): State<AppState>, Path(id): Path<Uuid>, ws: WebSocketUpgrade) -> Response {
    let Ok(session) = session::get_session(&state, id).await else {
        return (StatusCode::NOT_FOUND, "session not found").into_response();
    };
    ws.on_upgrade(move |socket| run_ws(socket, state, id, session))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState, id: Uuid, held: Session) {
    let client_id = Uuid::new_v4();
    info!(%client_id, session = %id, "ws: client connected");

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => {
                let reply = process_inbound_text(&state, id, &text).await;
                if send_reply(&mut socket, &reply).await.is_err() {
                    break;
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    drop(held);
    info!(%client_id, session = %id, "ws: client disconnected");
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Parse one inbound text frame, apply it, and build the reply frame.
pub(crate) async fn process_inbound_text(state: &AppState, id: Uuid, text: &str) -> Reply {
    let command: Command = match serde_json::from_str(text) {
        Ok(c) => c,
        Err(e) => {
            warn!(session = %id, error = %e, "ws: invalid inbound frame");
            return Reply::Error { error: format!("invalid command: {e}") };
        }
    };

    match session::execute(state, id, command).await {
        Ok(reply) => Reply::Applied(reply),
        Err(e) => {
            warn!(session = %id, error = %e, "ws: command failed");
            Reply::Error { error: e.to_string() }
        }
    }
}

async fn send_reply(socket: &mut WebSocket, reply: &Reply) -> Result<(), axum::Error> {
    let json = match serde_json::to_string(reply) {
        Ok(j) => j,
        Err(e) => {
            warn!(error = %e, "ws: failed to serialize reply");
            return Ok(());
        }
    };
    socket.send(Message::Text(json.into())).await
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
