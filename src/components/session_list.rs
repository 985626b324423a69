// ABOUTME: Normal-mode view: the scrollable session list with legend and tip

use chrono::Local;
use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::AppState;

// Palette (TUI style guide)
const CORNFLOWER_BLUE: Color = Color::Rgb(100, 149, 237);
const GOLD: Color = Color::Rgb(255, 215, 0);
const SELECTION_GREEN: Color = Color::Rgb(100, 200, 100);
const WARNING_ORANGE: Color = Color::Rgb(255, 165, 0);
const DARK_BG: Color = Color::Rgb(25, 25, 35);
const LIST_HIGHLIGHT_BG: Color = Color::Rgb(40, 40, 60);
const SOFT_WHITE: Color = Color::Rgb(220, 220, 230);
const MUTED_GRAY: Color = Color::Rgb(120, 120, 140);
const SUBDUED_BORDER: Color = Color::Rgb(60, 60, 80);

/// Column the relative-age text starts at, so ages line up across rows.
const NAME_COLUMN_WIDTH: usize = 32;

pub struct SessionListComponent {
    list_state: ListState,
}

impl Default for SessionListComponent {
    fn default() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self { list_state }
    }
}

impl SessionListComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        self.list_state.select(if state.sessions.is_empty() {
            None
        } else {
            Some(state.selected_index)
        });

        let [list_area, status_area, tip_area] = Layout::vertical([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let items = build_list_items(state);

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(SUBDUED_BORDER))
                    .style(Style::default().bg(DARK_BG))
                    .title(Line::from(vec![
                        Span::styled(" tmux sessions ", Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
                        Span::styled(
                            format!("({}) ", state.sessions.len()),
                            Style::default().fg(CORNFLOWER_BLUE),
                        ),
                    ]))
                    .title_bottom(legend()),
            )
            .highlight_style(
                Style::default()
                    .bg(LIST_HIGHLIGHT_BG)
                    .add_modifier(Modifier::BOLD),
            );

        frame.render_stateful_widget(list, list_area, &mut self.list_state);

        if let Some(message) = &state.status_message {
            let status = Paragraph::new(Line::from(vec![
                Span::styled(" ✗ ", Style::default().fg(WARNING_ORANGE)),
                Span::styled(message.clone(), Style::default().fg(WARNING_ORANGE)),
                Span::styled("  (any key to dismiss)", Style::default().fg(MUTED_GRAY)),
            ]));
            frame.render_widget(status, status_area);
        }

        let tip = Paragraph::new(Line::from(Span::styled(
            " Tip: inside a session, Ctrl+b d detaches and keeps it running",
            Style::default().fg(MUTED_GRAY),
        )));
        frame.render_widget(tip, tip_area);
    }
}

fn build_list_items(state: &AppState) -> Vec<ListItem<'static>> {
    if state.sessions.is_empty() {
        return vec![ListItem::new(Line::from(Span::styled(
            " No sessions — press n to create one",
            Style::default().fg(MUTED_GRAY).add_modifier(Modifier::ITALIC),
        )))];
    }

    let now = Local::now();
    state
        .sessions
        .iter()
        .map(|session| {
            let indicator_color = if session.attached {
                SELECTION_GREEN
            } else {
                MUTED_GRAY
            };

            let windows_text = if session.windows > 1 {
                format!(" ({}w)", session.windows)
            } else {
                String::new()
            };

            ListItem::new(Line::from(vec![
                Span::styled(
                    session.status_indicator().to_string(),
                    Style::default().fg(indicator_color),
                ),
                Span::styled(
                    format!("{:<width$}", session.name, width = NAME_COLUMN_WIDTH),
                    Style::default().fg(SOFT_WHITE),
                ),
                Span::styled(
                    format!("({})", session.relative_age(now)),
                    Style::default().fg(MUTED_GRAY),
                ),
                Span::styled(windows_text, Style::default().fg(MUTED_GRAY)),
            ]))
        })
        .collect()
}

fn legend() -> Line<'static> {
    let mut spans = Vec::new();
    let pairs = [
        ("j/k", "nav"),
        ("Enter", "attach"),
        ("n", "new"),
        ("d", "detach"),
        ("x", "kill"),
        ("r", "refresh"),
        ("q", "quit"),
    ];

    for (i, (keys, action)) in pairs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("│", Style::default().fg(SUBDUED_BORDER)));
        }
        spans.push(Span::styled(
            format!(" {keys}"),
            Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!(" {action} "),
            Style::default().fg(MUTED_GRAY),
        ));
    }

    Line::from(spans)
}
