// ABOUTME: Backend gateway issuing session operations against the tmux server
//
// Every operation shells out to tmux and waits for it to exit. None of these
// may be called on the render path; the command dispatcher in app::events
// runs them on background tasks and feeds results back as events. The one
// exception is `attach`, which takes over the controlling terminal and is
// only invoked after the event loop has exited.

use crate::models::TmuxSession;
use chrono::{DateTime, Local, TimeZone};
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

/// Listing format requested from tmux: one line per session,
/// colon-delimited fields.
const LIST_FORMAT: &str = "#{session_name}:#{session_created}:#{session_windows}:#{session_attached}";

/// Errors from tmux invocations.
#[derive(Debug, Error)]
pub enum TmuxError {
    #[error("failed to run tmux: {0}")]
    Io(#[from] std::io::Error),

    #[error("tmux {command} failed{}", format_stderr(.stderr))]
    CommandFailed {
        command: &'static str,
        stderr: String,
    },
}

fn format_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

/// Returns true when the current process runs inside a tmux session.
pub fn inside_tmux() -> bool {
    std::env::var("TMUX").map(|v| !v.is_empty()).unwrap_or(false)
}

/// Client for the external tmux server.
///
/// Constructed once at startup and passed explicitly to whatever needs it;
/// there is no process-wide manager handle.
#[derive(Debug, Clone, Default)]
pub struct TmuxClient;

impl TmuxClient {
    pub fn new() -> Self {
        Self
    }

    /// List all sessions known to the tmux server, in server order.
    ///
    /// Exit status 1 means no server is running or no sessions exist; that
    /// is an empty listing, not an error. Malformed lines are skipped so a
    /// single bad line never poisons the whole snapshot.
    pub async fn list_sessions(&self) -> Result<Vec<TmuxSession>, TmuxError> {
        let output = Command::new("tmux")
            .args(["list-sessions", "-F", LIST_FORMAT])
            .output()
            .await?;

        if !output.status.success() {
            if output.status.code() == Some(1) {
                debug!("tmux reports no server or no sessions");
                return Ok(Vec::new());
            }
            return Err(TmuxError::CommandFailed {
                command: "list-sessions",
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_listing(&stdout, Local::now()))
    }

    /// Attach the controlling terminal to `name`.
    ///
    /// Inside tmux this is a client switch and returns immediately; outside
    /// it execs a blocking attach, so it must only run after the event loop
    /// has released the terminal.
    pub async fn attach(&self, name: &str) -> Result<(), TmuxError> {
        if inside_tmux() {
            self.run("switch-client", &["switch-client", "-t", name]).await
        } else {
            self.run("attach-session", &["attach-session", "-t", name]).await
        }
    }

    /// Detach any client attached to `name`. A no-op if nothing is attached.
    pub async fn detach(&self, name: &str) -> Result<(), TmuxError> {
        self.run("detach-session", &["detach-session", "-t", name]).await
    }

    /// Create a new detached session named `name`.
    /// Fails if the name is already taken.
    pub async fn create(&self, name: &str) -> Result<(), TmuxError> {
        self.run("new-session", &["new-session", "-d", "-s", name]).await
    }

    /// Destroy the session named `name`.
    pub async fn kill(&self, name: &str) -> Result<(), TmuxError> {
        self.run("kill-session", &["kill-session", "-t", name]).await
    }

    /// Type `keys` followed by Enter into the session named `name`.
    /// Used by the bootstrap path to start tmx inside a fresh session.
    pub async fn send_keys(&self, name: &str, keys: &str) -> Result<(), TmuxError> {
        self.run("send-keys", &["send-keys", "-t", name, keys, "C-m"]).await
    }

    /// Check whether a session named `name` exists.
    pub async fn has_session(&self, name: &str) -> bool {
        let output = Command::new("tmux")
            .args(["has-session", "-t", name])
            .output()
            .await;

        matches!(output, Ok(output) if output.status.success())
    }

    /// True when the tmux server is up and has at least one session.
    /// Used only at startup to decide whether to offer the bootstrap prompt.
    pub async fn is_running(&self) -> bool {
        match self.list_sessions().await {
            Ok(sessions) => !sessions.is_empty(),
            Err(e) => {
                warn!("failed to probe tmux server: {e}");
                false
            }
        }
    }

    async fn run(&self, command: &'static str, args: &[&str]) -> Result<(), TmuxError> {
        let output = Command::new("tmux").args(args).output().await?;

        if !output.status.success() {
            return Err(TmuxError::CommandFailed {
                command,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(())
    }
}

/// Parse the output of `tmux list-sessions -F` into session records.
///
/// One record per well-formed line, in input order. Lines with fewer than
/// four fields are dropped; numeric fields parse permissively (bad text
/// yields 0, a bad timestamp yields `now`).
pub fn parse_listing(output: &str, now: DateTime<Local>) -> Vec<TmuxSession> {
    output
        .lines()
        .filter(|line| !line.is_empty())
        .filter_map(|line| parse_session_line(line, now))
        .collect()
}

fn parse_session_line(line: &str, now: DateTime<Local>) -> Option<TmuxSession> {
    let parts: Vec<&str> = line.split(':').collect();
    if parts.len() < 4 {
        warn!("skipping malformed list-sessions line: {line:?}");
        return None;
    }

    let name = parts[0].to_string();
    let created = parse_timestamp(parts[1]).unwrap_or(now);
    let windows = parse_count(parts[2]);
    let attached = parse_count(parts[3]) > 0;

    Some(TmuxSession::new(name, created, windows, attached))
}

/// Parse a tmux creation timestamp.
///
/// tmux reports Unix seconds, but some builds emit microseconds; anything
/// longer than 10 decimal digits is reduced by 1e6 first. A stray leading
/// `;` from the format expansion is tolerated.
fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    let raw = raw.strip_prefix(';').unwrap_or(raw);
    let value: i64 = raw.parse().ok()?;
    let seconds = if raw.len() > 10 {
        value / 1_000_000
    } else {
        value
    };
    Local.timestamp_opt(seconds, 0).single()
}

fn parse_count(raw: &str) -> usize {
    raw.trim().parse().unwrap_or(0)
}
