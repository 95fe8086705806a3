//! Budget metrics bar
//!
//! Shows the month's spending against its budget, or asks for a budget
//! when none is set.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::models::BudgetGate;
use crate::tui::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Budget ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let metrics = app.metrics();
    let label = Style::default().fg(Color::Yellow);
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);

    let summary = match metrics.gate {
        BudgetGate::Unset => {
            let prompt = Line::from(vec![
                Span::styled(
                    format!("No budget set for {}. ", metrics.month.long_name()),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw("Press "),
                Span::styled("b", Style::default().fg(Color::Cyan)),
                Span::raw(" to set one before adding expenses."),
            ]);
            frame.render_widget(Paragraph::new(prompt), inner);
            return;
        }
        BudgetGate::Closed => Line::from(vec![
            Span::styled("Spent ", label),
            Span::styled(app.options.money(metrics.total), value),
            Span::styled("   Budget ", label),
            Span::styled("closed", Style::default().fg(Color::DarkGray)),
            Span::styled("   Expenses ", label),
            Span::styled(metrics.count.to_string(), value),
        ]),
        BudgetGate::Open(budget) => {
            let remaining_color = if metrics.is_over_budget() {
                Color::Red
            } else {
                Color::Green
            };
            Line::from(vec![
                Span::styled("Spent ", label),
                Span::styled(app.options.money(metrics.total), value),
                Span::styled("   Budget ", label),
                Span::styled(app.options.money(budget), value),
                Span::styled("   Remaining ", label),
                Span::styled(
                    app.options.money(metrics.remaining()),
                    Style::default()
                        .fg(remaining_color)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("   Expenses ", label),
                Span::styled(metrics.count.to_string(), value),
            ])
        }
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    frame.render_widget(Paragraph::new(summary), rows[0]);

    if let Some(pct) = metrics.percent_used() {
        let color = if pct > 100.0 { Color::Red } else { Color::Green };
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(color).bg(Color::Black))
            .ratio((pct / 100.0).clamp(0.0, 1.0))
            .label(format!("{:.1}% used", pct));
        frame.render_widget(gauge, rows[1]);
    }
}
