//! Add expense dialog
//!
//! Renders the new-expense form. The cost center is chosen from the known
//! labels with Left/Right; Ctrl+N adds a new one.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::services::FormField;
use crate::tui::app::{ActiveDialog, App};
use crate::tui::layout::centered_rect_fixed;
use crate::tui::widgets::FieldInput;

/// Render the add expense dialog
pub fn render(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(64, 16, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" New Expense - {} ", app.store.month().long_name()))
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
            Constraint::Length(1), // Receipt
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Error
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Instructions
            Constraint::Length(1), // Instructions
            Constraint::Min(0),
        ])
        .split(inner);

    let form = &app.form;
    let focused = |field: FormField| !app.receipt_focused && form.focus() == field;

    frame.render_widget(
        FieldInput::new("Description", &form.description).focused(focused(FormField::Description)),
        chunks[1],
    );

    let center_value = format!("< {} >", form.cost_center);
    frame.render_widget(
        FieldInput::new("Cost center", &center_value).focused(focused(FormField::CostCenter)),
        chunks[2],
    );

    frame.render_widget(
        FieldInput::new("Amount", form.amount())
            .placeholder("0.00")
            .focused(focused(FormField::Amount)),
        chunks[3],
    );

    frame.render_widget(
        FieldInput::new("Date", &form.date)
            .placeholder("YYYY-MM-DD")
            .focused(focused(FormField::Date)),
        chunks[4],
    );

    render_ddi(frame, app, chunks[5]);

    frame.render_widget(
        FieldInput::new("Receipt", &app.receipt_path)
            .placeholder("path to a .jpg (optional)")
            .focused(app.receipt_focused),
        chunks[6],
    );

    if let Some(ref error) = app.form_error {
        frame.render_widget(
            Paragraph::new(Span::styled(error.as_str(), Style::default().fg(Color::Red))),
            chunks[8],
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
        chunks[10],
    );
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("[←/→]", Style::default().fg(Color::Cyan)),
            Span::raw(" Pick cost center  "),
            Span::styled("[Ctrl+N]", Style::default().fg(Color::Cyan)),
            Span::raw(" New cost center"),
        ])),
        chunks[11],
    );
}

/// The three DDI segments, each padded to its width
fn render_ddi(frame: &mut Frame, app: &App, area: Rect) {
    let ddi = app.form.ddi();
    let mut spans = vec![Span::styled(
        format!("{:<14}", "DDI code:"),
        Style::default().fg(Color::Cyan),
    )];
    spans.push(Span::raw("DDI"));

    for index in 0..3 {
        spans.push(Span::raw("-"));
        let focused = !app.receipt_focused && app.form.focus() == FormField::Ddi(index);
        let style = if focused {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!("{:_<3}", ddi.segment(index)), style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Handle key events for the add expense dialog
pub fn handle_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_dialog(),
        KeyCode::Enter => app.submit_form(),
        KeyCode::Tab | KeyCode::Down => app.form_focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.form_focus_prev(),

        KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.open_dialog(ActiveDialog::NewCostCenter);
        }

        KeyCode::Left | KeyCode::Right
            if !app.receipt_focused && app.form.focus() == FormField::CostCenter =>
        {
            app.cycle_cost_center(key.code == KeyCode::Right);
        }

        KeyCode::Backspace => {
            if app.receipt_focused {
                app.receipt_path.pop();
            } else if app.form.focus() != FormField::CostCenter {
                app.form.pop_char();
            }
        }

        KeyCode::Char(c) => {
            if app.receipt_focused {
                app.receipt_path.push(c);
            } else if app.form.focus() != FormField::CostCenter {
                app.form.push_char(c);
            }
            app.form_error = None;
        }

        _ => {}
    }
}
