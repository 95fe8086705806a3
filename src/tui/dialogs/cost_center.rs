//! New cost center dialog

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::tui::app::App;
use crate::tui::layout::centered_rect_fixed;
use crate::tui::widgets::FieldInput;

pub fn render(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(50, 8, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" New Cost Center ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1), // Input
            Constraint::Length(1), // Error
            Constraint::Length(1),
            Constraint::Length(1), // Instructions
            Constraint::Min(0),
        ])
        .split(inner);

    frame.render_widget(
        FieldInput::new("Label", &app.text_input)
            .label_width(7)
            .focused(true),
        chunks[1],
    );

    if let Some(ref error) = app.dialog_error {
        frame.render_widget(
            Paragraph::new(Span::styled(error.as_str(), Style::default().fg(Color::Red))),
            chunks[2],
        );
    }

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("[Enter]", Style::default().fg(Color::Green)),
            Span::raw(" Add  "),
            Span::styled("[Esc]", Style::default().fg(Color::Yellow)),
            Span::raw(" Back to form"),
        ])),
        chunks[4],
    );
}

pub fn handle_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_dialog(),
        KeyCode::Enter => app.add_cost_center(),
        KeyCode::Backspace => {
            app.text_input.pop();
        }
        KeyCode::Char(c) => {
            app.text_input.push(c);
            app.dialog_error = None;
        }
        _ => {}
    }
}
