// ABOUTME: Rendering components for the two mutually exclusive views

pub mod new_session;
pub mod session_list;

use ratatui::prelude::*;

use crate::app::{AppState, InputMode};
use new_session::NewSessionComponent;
use session_list::SessionListComponent;

/// Top-level renderer: picks the view for the current input mode.
///
/// Rendering is a pure function of the state; no component mutates
/// application state.
#[derive(Default)]
pub struct LayoutComponent {
    session_list: SessionListComponent,
    new_session: NewSessionComponent,
}

impl LayoutComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, frame: &mut Frame, state: &AppState) {
        let area = frame.size();
        match state.mode {
            InputMode::Normal => self.session_list.render(frame, area, state),
            InputMode::TextEntry => self.new_session.render(frame, area, state),
        }
    }
}
