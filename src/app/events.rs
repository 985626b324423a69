// ABOUTME: Events consumed by the reducer and the async command dispatcher
//
// Commands are fire-and-forget: each one runs on a background task and its
// result re-enters the event queue as an AppEvent. There is no cancellation
// and no timeout; a hung tmux process hangs that command indefinitely, which
// is acceptable for this tool's scope.

use crate::models::TmuxSession;
use crate::tmux::TmuxClient;
use crossterm::event::KeyEvent;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

/// Everything the reducer can consume: terminal input, window changes, and
/// completed backend command results.
#[derive(Debug, Clone)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    /// A fresh snapshot from the tmux server
    SessionsRefreshed(Vec<TmuxSession>),
    /// The attach target was verified; the host attaches after loop exit
    AttachReady { name: String },
    AttachFailed { error: String },
    CreateFinished { name: String, error: Option<String> },
    DetachFinished { name: String, error: Option<String> },
    KillFinished { name: String, error: Option<String> },
}

/// Backend operations emitted by the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    RefreshSessions,
    /// Verify the target exists and report it for the deferred attach.
    /// The actual attach would seize the terminal, so it never runs here.
    AttachTo(String),
    DetachFrom(String),
    Create(String),
    KillSession(String),
}

/// Run one command on a background task, funneling the result back into the
/// event queue.
pub fn dispatch(command: Command, client: Arc<TmuxClient>, tx: UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let event = execute(command, &client).await;
        if tx.send(event).is_err() {
            // Loop already exited; nothing left to notify.
            warn!("dropping command result: event channel closed");
        }
    });
}

async fn execute(command: Command, client: &TmuxClient) -> AppEvent {
    match command {
        Command::RefreshSessions => {
            // Listing failures degrade to an empty snapshot: an empty list
            // is always a valid, renderable state.
            let sessions = match client.list_sessions().await {
                Ok(sessions) => sessions,
                Err(e) => {
                    warn!("failed to list sessions: {e}");
                    Vec::new()
                }
            };
            AppEvent::SessionsRefreshed(sessions)
        }
        Command::AttachTo(name) => {
            if client.has_session(&name).await {
                AppEvent::AttachReady { name }
            } else {
                AppEvent::AttachFailed {
                    error: format!("session '{name}' no longer exists"),
                }
            }
        }
        Command::DetachFrom(name) => {
            let error = client.detach(&name).await.err().map(|e| e.to_string());
            AppEvent::DetachFinished { name, error }
        }
        Command::Create(name) => {
            let error = client.create(&name).await.err().map(|e| e.to_string());
            AppEvent::CreateFinished { name, error }
        }
        Command::KillSession(name) => {
            let error = client.kill(&name).await.err().map(|e| e.to_string());
            AppEvent::KillFinished { name, error }
        }
    }
}
