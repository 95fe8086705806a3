//! Edit expense dialog
//!
//! Edits a copy of the selected expense; nothing changes until it saves.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::services::EditField;
use crate::tui::app::App;
use crate::tui::layout::centered_rect_fixed;
use crate::tui::widgets::FieldInput;

const FIELDS: [(EditField, &str); 5] = [
    (EditField::Description, "Description"),
    (EditField::CostCenter, "Cost center"),
    (EditField::Amount, "Amount"),
    (EditField::Date, "Date"),
    (EditField::DdiCode, "DDI code"),
];

/// Render the edit expense dialog
pub fn render(frame: &mut Frame, app: &App) {
    let Some(draft) = app.list.edit() else {
        return;
    };

    let area = centered_rect_fixed(60, 13, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Edit Expense ")
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
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Description
            Constraint::Length(1), // Cost center
            Constraint::Length(1), // Amount
            Constraint::Length(1), // Date
            Constraint::Length(1), // DDI
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Error
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Instructions
            Constraint::Min(0),
        ])
        .split(inner);

    for (row, (field, label)) in FIELDS.iter().enumerate() {
        frame.render_widget(
            FieldInput::new(label, draft.value(*field)).focused(draft.focus == *field),
            chunks[row + 1],
        );
    }

    if let Some(ref error) = draft.error {
        frame.render_widget(
            Paragraph::new(Span::styled(error.as_str(), Style::default().fg(Color::Red))),
            chunks[7],
        );
    }

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("[Enter]", Style::default().fg(Color::Green)),
            Span::raw(" Save  "),
            Span::styled("[Tab]", Style::default().fg(Color::Cyan)),
            Span::raw(" Next field  "),
            Span::styled("[Esc]", Style::default().fg(Color::Yellow)),
            Span::raw(" Cancel"),
        ])),
        chunks[9],
    );
}

/// Handle key events for the edit expense dialog
pub fn handle_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_dialog(),
        KeyCode::Enter => app.save_edit(),
        _ => {
            let Some(draft) = app.list.edit_mut() else {
                return;
            };
            match key.code {
                KeyCode::Tab | KeyCode::Down => draft.focus = draft.focus.next(),
                KeyCode::BackTab | KeyCode::Up => draft.focus = draft.focus.prev(),
                KeyCode::Backspace => draft.pop_char(),
                KeyCode::Char(c) => {
                    draft.push_char(c);
                    draft.error = None;
                }
                _ => {}
            }
        }
    }
}
