// ABOUTME: Model for a tmux session as reported by the tmux server

use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};

/// A single tmux session, as reported by `tmux list-sessions`.
///
/// The tmux server is the sole source of truth for these fields; a
/// `TmuxSession` is a point-in-time snapshot and is replaced wholesale on
/// every refresh rather than updated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TmuxSession {
    /// The tmux session name (unique, immutable for the session's lifetime)
    pub name: String,
    /// Creation time reported by the server
    pub created: DateTime<Local>,
    /// Number of windows in the session
    pub windows: usize,
    /// Whether any client is currently attached to this session
    pub attached: bool,
}

impl TmuxSession {
    pub fn new(name: String, created: DateTime<Local>, windows: usize, attached: bool) -> Self {
        Self {
            name,
            created,
            windows,
            attached,
        }
    }

    /// Indicator glyph shown before the session name in the list view.
    pub fn status_indicator(&self) -> &'static str {
        if self.attached {
            "▶ "
        } else {
            "  "
        }
    }

    /// Human-readable age of the session relative to `now`.
    pub fn relative_age(&self, now: DateTime<Local>) -> String {
        format_relative_age(now.signed_duration_since(self.created), &self.created)
    }
}

fn format_relative_age(age: Duration, created: &DateTime<Local>) -> String {
    if age < Duration::minutes(1) {
        "just now".to_string()
    } else if age < Duration::hours(1) {
        format!("{} minutes ago", age.num_minutes())
    } else if age < Duration::days(1) {
        format!("{} hours ago", age.num_hours())
    } else if age < Duration::days(30) {
        format!("{} days ago", age.num_days())
    } else {
        created.format("%Y-%m-%d").to_string()
    }
}
