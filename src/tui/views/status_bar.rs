//! Status bar view
//!
//! Shows the entry state of the month and key hints

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::models::BudgetGate;
use crate::tui::app::App;

/// Render the status bar
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let (entry, color) = match app.gate {
        BudgetGate::Open(_) => (" Entry open ", Color::Green),
        BudgetGate::Closed => (" Entry closed ", Color::Yellow),
        BudgetGate::Unset => (" No budget ", Color::Red),
    };

    let mut spans = vec![Span::styled(entry, Style::default().fg(color))];
    if app.list_open() {
        spans.push(Span::raw("│ "));
        spans.push(Span::styled(
            format!("{} shown", app.visible().len()),
            Style::default().fg(Color::Cyan),
        ));
    }

    let hints = " a:Add  e:Edit  d:Delete  f:Filter  b:Budget  ?:Help  q:Quit ";

    let left_len: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let padding_len = (area.width as usize).saturating_sub(left_len + hints.len());
    spans.push(Span::raw(" ".repeat(padding_len.max(1))));
    spans.push(Span::styled(hints, Style::default().fg(Color::White)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
