//! Expense details dialog
//!
//! Shows every field of an expense and the state of its receipt.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::services::{DetailsState, ReceiptView};
use crate::tui::app::App;
use crate::tui::layout::centered_rect_fixed;

fn field_line<'a>(label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:<13}", label), Style::default().fg(Color::Yellow)),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

/// Render the details dialog
pub fn render(frame: &mut Frame, app: &App) {
    let DetailsState::Open { expense, receipt } = app.list.details() else {
        return;
    };

    let area = centered_rect_fixed(70, 15, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Expense Details ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let mut lines = vec![
        Line::from(""),
        field_line("Description", expense.description.clone()),
        field_line("Amount", app.options.money(expense.amount)),
        field_line("Date", app.options.date(expense.date)),
        field_line("Cost center", expense.cost_center.clone()),
        field_line("DDI code", expense.ddi_display().to_string()),
        Line::from(""),
    ];

    let receipt_line = match receipt {
        ReceiptView::Loading => Span::styled("Loading receipt...", Style::default().fg(Color::DarkGray)),
        ReceiptView::NoReceipt => Span::styled("No receipt", Style::default().fg(Color::DarkGray)),
        ReceiptView::Ready(url) => Span::styled(url.clone(), Style::default().fg(Color::Green)),
        ReceiptView::Error(message) => Span::styled(
            format!("Receipt unavailable: {}", message),
            Style::default().fg(Color::Red),
        ),
    };
    lines.push(Line::from(vec![
        Span::styled(format!("{:<13}", "Receipt"), Style::default().fg(Color::Yellow)),
        receipt_line,
    ]));

    lines.push(Line::from(""));
    let mut hints = vec![];
    if matches!(receipt, ReceiptView::Ready(_)) {
        hints.push(Span::styled("[s]", Style::default().fg(Color::Green)));
        hints.push(Span::raw(" Save receipt  "));
    }
    hints.push(Span::styled("[Esc]", Style::default().fg(Color::Yellow)));
    hints.push(Span::raw(" Close"));
    lines.push(Line::from(hints));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Handle key events for the details dialog
pub fn handle_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => app.close_dialog(),
        KeyCode::Char('s') => app.save_receipt(),
        _ => {}
    }
}
