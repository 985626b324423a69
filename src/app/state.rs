// ABOUTME: Application state and the pure reducer driving the interactive loop
//
// One event is reduced at a time: the reducer mutates the state and returns
// the backend commands to dispatch. No reducer invocation ever runs
// concurrently with another, so the state needs no locking.

use crate::app::events::{AppEvent, Command};
use crate::models::TmuxSession;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashSet;
use tracing::{debug, info};

/// Input handling mode of the interactive loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// List navigation and single-key actions
    #[default]
    Normal,
    /// Accumulating a new session name
    TextEntry,
}

/// How the event loop should terminate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitRequest {
    /// Plain quit
    Quit,
    /// Quit, then have the host attach to this session once the loop has
    /// released the terminal
    QuitAndAttach(String),
}

/// Mutable state of the interactive loop.
///
/// Created once at startup and never persisted; the tmux server owns the
/// durable session table.
#[derive(Debug, Default)]
pub struct AppState {
    /// Last-fetched snapshot, in server order. Replaced wholesale on refresh.
    pub sessions: Vec<TmuxSession>,
    /// Cursor into `sessions`; clamped to `[0, len-1]` whenever non-empty.
    pub selected_index: usize,
    pub mode: InputMode,
    /// Text accumulated while in `TextEntry` mode.
    pub entry_buffer: String,
    /// Name of a just-created session, so the cursor can follow it once the
    /// refreshed snapshot arrives. Cleared on the next refresh pass.
    pub pending_new_session: Option<String>,
    /// Session names with a mutating command in flight. A repeated detach or
    /// kill on the same name is ignored until the result releases it.
    pub pending_ops: HashSet<String>,
    /// Transient error banner, dismissed by the next keypress.
    pub status_message: Option<String>,
    /// Set when the loop should terminate.
    pub exit_request: Option<ExitRequest>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The session under the cursor, if any.
    pub fn selected_session(&self) -> Option<&TmuxSession> {
        self.sessions.get(self.selected_index)
    }

    /// Reduce one event into state changes plus backend commands.
    pub fn handle_event(&mut self, event: AppEvent) -> Vec<Command> {
        match event {
            AppEvent::Key(key) => match self.mode {
                InputMode::Normal => self.handle_normal_key(key),
                InputMode::TextEntry => self.handle_entry_key(key),
            },
            // Components take their area from the frame, so a resize only
            // needs to trigger the redraw that follows every event.
            AppEvent::Resize(_, _) => Vec::new(),
            AppEvent::SessionsRefreshed(sessions) => {
                self.apply_refresh(sessions);
                Vec::new()
            }
            AppEvent::AttachReady { name } => {
                info!("attach target ready: {name}");
                self.exit_request = Some(ExitRequest::QuitAndAttach(name));
                Vec::new()
            }
            AppEvent::AttachFailed { error } => {
                self.status_message = Some(format!("attach failed: {error}"));
                Vec::new()
            }
            AppEvent::CreateFinished { name, error } => match error {
                None => {
                    self.pending_new_session = Some(name);
                    vec![Command::RefreshSessions]
                }
                Some(error) => {
                    self.status_message = Some(format!("could not create '{name}': {error}"));
                    Vec::new()
                }
            },
            AppEvent::DetachFinished { name, error } => {
                self.pending_ops.remove(&name);
                if let Some(error) = error {
                    self.status_message = Some(format!("could not detach '{name}': {error}"));
                }
                vec![Command::RefreshSessions]
            }
            AppEvent::KillFinished { name, error } => {
                self.pending_ops.remove(&name);
                if let Some(error) = error {
                    self.status_message = Some(format!("could not kill '{name}': {error}"));
                }
                vec![Command::RefreshSessions]
            }
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Vec<Command> {
        // Any keypress dismisses the error banner.
        self.status_message = None;

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.exit_request = Some(ExitRequest::Quit);
            return Vec::new();
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.exit_request = Some(ExitRequest::Quit);
                Vec::new()
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_index = self.selected_index.saturating_sub(1);
                Vec::new()
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected_index + 1 < self.sessions.len() {
                    self.selected_index += 1;
                }
                Vec::new()
            }
            KeyCode::Enter => match self.selected_session() {
                Some(session) => vec![Command::AttachTo(session.name.clone())],
                None => Vec::new(),
            },
            KeyCode::Char('n') => {
                self.mode = InputMode::TextEntry;
                self.entry_buffer.clear();
                Vec::new()
            }
            KeyCode::Char('d') => self.mutate_selected(Command::DetachFrom),
            KeyCode::Char('x') => self.mutate_selected(Command::KillSession),
            KeyCode::Char('r') => vec![Command::RefreshSessions],
            _ => Vec::new(),
        }
    }

    fn handle_entry_key(&mut self, key: KeyEvent) -> Vec<Command> {
        // An interrupt quits from either mode, before the char-append arm
        // can swallow the 'c'.
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.exit_request = Some(ExitRequest::Quit);
            return Vec::new();
        }

        match key.code {
            KeyCode::Enter => {
                self.mode = InputMode::Normal;
                if self.entry_buffer.is_empty() {
                    Vec::new()
                } else {
                    let name = std::mem::take(&mut self.entry_buffer);
                    vec![Command::Create(name)]
                }
            }
            KeyCode::Esc => {
                self.mode = InputMode::Normal;
                self.entry_buffer.clear();
                Vec::new()
            }
            KeyCode::Backspace => {
                self.entry_buffer.pop();
                Vec::new()
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.entry_buffer.push(c);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    /// Emit a mutating command for the selected session, unless one is
    /// already in flight for that name.
    fn mutate_selected(&mut self, make: impl Fn(String) -> Command) -> Vec<Command> {
        let Some(session) = self.selected_session() else {
            return Vec::new();
        };
        let name = session.name.clone();

        if self.pending_ops.contains(&name) {
            debug!("ignoring repeat command for '{name}' while one is in flight");
            return Vec::new();
        }
        self.pending_ops.insert(name.clone());
        vec![make(name)]
    }

    /// Replace the snapshot and reconcile the cursor.
    fn apply_refresh(&mut self, sessions: Vec<TmuxSession>) {
        self.sessions = sessions;

        // The marker is cleared whether or not the new session shows up, so
        // a failed refresh can never pin the cursor forever.
        if let Some(wanted) = self.pending_new_session.take() {
            if let Some(position) = self.sessions.iter().position(|s| s.name == wanted) {
                self.selected_index = position;
            }
        }

        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        if self.sessions.is_empty() {
            self.selected_index = 0;
        } else if self.selected_index >= self.sessions.len() {
            self.selected_index = self.sessions.len() - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn sessions(names: &[&str]) -> Vec<TmuxSession> {
        names
            .iter()
            .map(|n| TmuxSession::new(n.to_string(), Local::now(), 1, false))
            .collect()
    }

    fn state_with(names: &[&str]) -> AppState {
        let mut state = AppState::new();
        state.handle_event(AppEvent::SessionsRefreshed(sessions(names)));
        state
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut state = state_with(&["a", "b", "c"]);

        state.handle_event(key(KeyCode::Up));
        assert_eq!(state.selected_index, 0);

        for _ in 0..10 {
            state.handle_event(key(KeyCode::Char('j')));
        }
        assert_eq!(state.selected_index, 2);

        for _ in 0..10 {
            state.handle_event(key(KeyCode::Char('k')));
        }
        assert_eq!(state.selected_index, 0);
    }

    #[test]
    fn test_enter_emits_attach_for_selected() {
        let mut state = state_with(&["a", "b"]);
        state.handle_event(key(KeyCode::Down));

        let commands = state.handle_event(key(KeyCode::Enter));
        assert_eq!(commands, vec![Command::AttachTo("b".to_string())]);
    }

    #[test]
    fn test_enter_on_empty_list_is_noop() {
        let mut state = AppState::new();
        let commands = state.handle_event(key(KeyCode::Enter));
        assert!(commands.is_empty());
        assert!(state.exit_request.is_none());
    }

    #[test]
    fn test_text_entry_flow() {
        let mut state = AppState::new();

        state.handle_event(key(KeyCode::Char('n')));
        assert_eq!(state.mode, InputMode::TextEntry);

        for c in "work".chars() {
            state.handle_event(key(KeyCode::Char(c)));
        }
        assert_eq!(state.entry_buffer, "work");

        state.handle_event(key(KeyCode::Backspace));
        assert_eq!(state.entry_buffer, "wor");
        state.handle_event(key(KeyCode::Char('k')));

        let commands = state.handle_event(key(KeyCode::Enter));
        assert_eq!(commands, vec![Command::Create("work".to_string())]);
        assert_eq!(state.mode, InputMode::Normal);
        assert!(state.entry_buffer.is_empty());
    }

    #[test]
    fn test_text_entry_escape_discards() {
        let mut state = AppState::new();
        state.handle_event(key(KeyCode::Char('n')));
        state.handle_event(key(KeyCode::Char('x')));

        state.handle_event(key(KeyCode::Esc));
        assert_eq!(state.mode, InputMode::Normal);
        assert!(state.entry_buffer.is_empty());
        assert!(state.exit_request.is_none());
    }

    #[test]
    fn test_empty_entry_enter_returns_to_normal() {
        let mut state = AppState::new();
        state.handle_event(key(KeyCode::Char('n')));

        let commands = state.handle_event(key(KeyCode::Enter));
        assert!(commands.is_empty());
        assert_eq!(state.mode, InputMode::Normal);
    }

    #[test]
    fn test_refresh_follows_created_session() {
        let mut state = state_with(&["a"]);

        let commands = state.handle_event(AppEvent::CreateFinished {
            name: "work".to_string(),
            error: None,
        });
        assert_eq!(commands, vec![Command::RefreshSessions]);

        state.handle_event(AppEvent::SessionsRefreshed(sessions(&["a", "work", "z"])));
        assert_eq!(state.selected_index, 1);
        assert!(state.pending_new_session.is_none());
    }

    #[test]
    fn test_refresh_clears_marker_when_session_missing() {
        let mut state = state_with(&["a", "b", "c"]);
        state.selected_index = 2;
        state.pending_new_session = Some("ghost".to_string());

        state.handle_event(AppEvent::SessionsRefreshed(sessions(&["a"])));
        assert!(state.pending_new_session.is_none());
        assert_eq!(state.selected_index, 0);
    }

    #[test]
    fn test_refresh_of_empty_backend_resets_cursor() {
        let mut state = state_with(&["a", "b"]);
        state.selected_index = 1;

        state.handle_event(AppEvent::SessionsRefreshed(Vec::new()));
        assert_eq!(state.selected_index, 0);
        assert!(state.sessions.is_empty());
    }

    #[test]
    fn test_pending_guard_ignores_repeat_mutations() {
        let mut state = state_with(&["a"]);

        let first = state.handle_event(key(KeyCode::Char('d')));
        assert_eq!(first, vec![Command::DetachFrom("a".to_string())]);

        // Mashing d (or x) on the same target queues nothing more.
        assert!(state.handle_event(key(KeyCode::Char('d'))).is_empty());
        assert!(state.handle_event(key(KeyCode::Char('x'))).is_empty());

        let commands = state.handle_event(AppEvent::DetachFinished {
            name: "a".to_string(),
            error: None,
        });
        assert_eq!(commands, vec![Command::RefreshSessions]);

        // Released: the next kill goes through.
        let next = state.handle_event(key(KeyCode::Char('x')));
        assert_eq!(next, vec![Command::KillSession("a".to_string())]);
    }

    #[test]
    fn test_attach_ready_requests_exit_with_target() {
        let mut state = state_with(&["work"]);
        state.handle_event(AppEvent::AttachReady {
            name: "work".to_string(),
        });
        assert_eq!(
            state.exit_request,
            Some(ExitRequest::QuitAndAttach("work".to_string()))
        );
    }

    #[test]
    fn test_backend_errors_surface_as_status_not_exit() {
        let mut state = state_with(&["a"]);

        state.handle_event(AppEvent::AttachFailed {
            error: "no such session".to_string(),
        });
        assert!(state.status_message.is_some());
        assert!(state.exit_request.is_none());

        state.handle_event(AppEvent::CreateFinished {
            name: "dup".to_string(),
            error: Some("duplicate session: dup".to_string()),
        });
        assert!(state
            .status_message
            .as_deref()
            .unwrap()
            .contains("could not create 'dup'"));
        assert!(state.exit_request.is_none());

        // The next keypress dismisses the banner.
        state.handle_event(key(KeyCode::Char('j')));
        assert!(state.status_message.is_none());
    }

    #[test]
    fn test_resize_emits_nothing_and_disturbs_nothing() {
        let mut state = state_with(&["a", "b"]);
        state.handle_event(key(KeyCode::Char('j')));

        let commands = state.handle_event(AppEvent::Resize(120, 40));
        assert!(commands.is_empty());
        assert_eq!(state.selected_index, 1);
        assert_eq!(state.mode, InputMode::Normal);
        assert!(state.exit_request.is_none());
    }

    #[test]
    fn test_ctrl_c_quits_from_text_entry() {
        let mut state = AppState::new();
        state.handle_event(key(KeyCode::Char('n')));
        state.handle_event(key(KeyCode::Char('w')));
        assert_eq!(state.entry_buffer, "w");

        state.handle_event(AppEvent::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        assert_eq!(state.exit_request, Some(ExitRequest::Quit));
        // The interrupt was not appended to the buffer.
        assert_eq!(state.entry_buffer, "w");
    }

    #[test]
    fn test_quit_keys() {
        for code in [KeyCode::Char('q'), KeyCode::Esc] {
            let mut state = state_with(&["a"]);
            state.handle_event(key(code));
            assert_eq!(state.exit_request, Some(ExitRequest::Quit));
        }

        let mut state = state_with(&["a"]);
        state.handle_event(AppEvent::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        assert_eq!(state.exit_request, Some(ExitRequest::Quit));
    }
}
