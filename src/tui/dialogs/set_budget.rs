//! Set budget dialog
//!
//! Dialog to set the budget of the selected month. Zero closes expense
//! entry for the month.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::tui::app::App;
use crate::tui::layout::centered_rect_fixed;

/// Render the set budget dialog
pub fn render(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(50, 11, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Monthly Budget ")
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
            Constraint::Length(1), // Month
            Constraint::Length(1), // Current
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Amount input
            Constraint::Length(1), // Error
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Instructions
            Constraint::Min(0),
        ])
        .split(inner);

    let month_line = Line::from(vec![
        Span::styled("Month:    ", Style::default().fg(Color::Yellow)),
        Span::styled(
            app.store.month().long_name(),
            Style::default().fg(Color::White),
        ),
    ]);
    frame.render_widget(Paragraph::new(month_line), chunks[1]);

    let current_line = Line::from(vec![
        Span::styled("Current:  ", Style::default().fg(Color::Yellow)),
        Span::styled(app.gate.to_string(), Style::default().fg(Color::White)),
    ]);
    frame.render_widget(Paragraph::new(current_line), chunks[2]);

    let input_line = Line::from(vec![
        Span::styled("Amount:   ", Style::default().fg(Color::Cyan)),
        Span::raw(app.options.currency_symbol.as_str()),
        Span::styled(app.text_input.as_str(), Style::default().fg(Color::White)),
        Span::styled(" ", Style::default().fg(Color::Black).bg(Color::Cyan)),
    ]);
    frame.render_widget(Paragraph::new(input_line), chunks[4]);

    if let Some(ref error) = app.dialog_error {
        let error_line = Line::from(Span::styled(error.as_str(), Style::default().fg(Color::Red)));
        frame.render_widget(Paragraph::new(error_line), chunks[5]);
    }

    let instructions = Line::from(vec![
        Span::styled("[Enter]", Style::default().fg(Color::Green)),
        Span::raw(" Save  "),
        Span::styled("[Esc]", Style::default().fg(Color::Yellow)),
        Span::raw(" Cancel  "),
        Span::styled("[Ctrl+U]", Style::default().fg(Color::Cyan)),
        Span::raw(" Clear"),
    ]);
    frame.render_widget(Paragraph::new(instructions), chunks[7]);
}

/// Handle key events for the set budget dialog
pub fn handle_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_dialog(),
        KeyCode::Enter => app.set_budget(),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.text_input.clear();
        }
        KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
            app.text_input.push(c);
            app.dialog_error = None;
        }
        KeyCode::Backspace => {
            app.text_input.pop();
        }
        _ => {}
    }
}
