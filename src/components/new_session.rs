// ABOUTME: TextEntry view: prompt for naming a new session

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::app::AppState;

const GOLD: Color = Color::Rgb(255, 215, 0);
const DARK_BG: Color = Color::Rgb(25, 25, 35);
const INPUT_BG: Color = Color::Rgb(40, 40, 60);
const SOFT_WHITE: Color = Color::Rgb(220, 220, 230);
const MUTED_GRAY: Color = Color::Rgb(120, 120, 140);
const SUBDUED_BORDER: Color = Color::Rgb(60, 60, 80);

#[derive(Default)]
pub struct NewSessionComponent;

impl NewSessionComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(SUBDUED_BORDER))
            .style(Style::default().bg(DARK_BG))
            .title(Line::from(Span::styled(
                " New session ",
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
            )))
            .title_bottom(Line::from(vec![
                Span::styled(" Enter", Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
                Span::styled(" confirm ", Style::default().fg(MUTED_GRAY)),
                Span::styled("│", Style::default().fg(SUBDUED_BORDER)),
                Span::styled(" Esc", Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
                Span::styled(" cancel ", Style::default().fg(MUTED_GRAY)),
            ]));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [prompt_area, input_area] =
            Layout::vertical([Constraint::Length(2), Constraint::Length(1)]).areas(inner);

        let prompt = Paragraph::new(Line::from(Span::styled(
            " Session name:",
            Style::default().fg(SOFT_WHITE),
        )));
        frame.render_widget(prompt, prompt_area);

        // Trailing underscore stands in for the cursor.
        let input = Paragraph::new(Line::from(vec![
            Span::styled(" > ", Style::default().fg(GOLD)),
            Span::styled(
                format!("{}_", state.entry_buffer),
                Style::default()
                    .fg(SOFT_WHITE)
                    .bg(INPUT_BG)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
        frame.render_widget(input, input_area);
    }
}
