//! Month selector header

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::app::App;

/// Render the month selector and the active filter
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" gastos ")
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let mut spans = vec![
        Span::styled("◀ ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.store.month().long_name(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ▶", Style::default().fg(Color::DarkGray)),
        Span::raw("   "),
        Span::styled("Cost center: ", Style::default().fg(Color::Yellow)),
        Span::styled(
            app.list.filter().label().to_string(),
            Style::default().fg(Color::White),
        ),
    ];

    if app.is_loading() {
        spans.push(Span::raw("   "));
        spans.push(Span::styled("Loading...", Style::default().fg(Color::DarkGray)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
