//! Toast notification widget
//!
//! Displays service notices as temporary toasts.

use std::time::{Duration, Instant};

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::services::{Notice, NoticeKind};

fn color(kind: NoticeKind) -> Color {
    match kind {
        NoticeKind::Info => Color::Blue,
        NoticeKind::Success => Color::Green,
        NoticeKind::Warning => Color::Yellow,
        NoticeKind::Error => Color::Red,
    }
}

fn icon(kind: NoticeKind) -> &'static str {
    match kind {
        NoticeKind::Info => "i",
        NoticeKind::Success => "+",
        NoticeKind::Warning => "!",
        NoticeKind::Error => "x",
    }
}

/// A notice with its display deadline
#[derive(Debug, Clone)]
pub struct Notification {
    pub notice: Notice,
    created_at: Instant,
    duration: Duration,
}

impl Notification {
    pub fn new(notice: Notice) -> Self {
        // Problems stay up longer than confirmations
        let secs = match notice.kind {
            NoticeKind::Warning | NoticeKind::Error => 5,
            _ => 3,
        };
        Self {
            notice,
            created_at: Instant::now(),
            duration: Duration::from_secs(secs),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.duration
    }
}

/// Widget for rendering a notification
pub struct NotificationWidget<'a> {
    notification: &'a Notification,
}

impl<'a> NotificationWidget<'a> {
    pub fn new(notification: &'a Notification) -> Self {
        Self { notification }
    }
}

impl<'a> Widget for NotificationWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let notice = &self.notification.notice;
        let color = color(notice.kind);

        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(format!(" {} {} ", icon(notice.kind), notice.title))
            .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD));

        Paragraph::new(notice.message.as_str())
            .style(Style::default().fg(Color::White))
            .wrap(Wrap { trim: true })
            .block(block)
            .render(area, buf);
    }
}

/// Toasts waiting to be shown, oldest first
#[derive(Debug, Default)]
pub struct NotificationQueue {
    notifications: Vec<Notification>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notice: Notice) {
        self.notifications.push(Notification::new(notice));
    }

    /// Drop the expired toasts
    pub fn remove_expired(&mut self) {
        self.notifications.retain(|n| !n.is_expired());
    }

    pub fn current(&self) -> Option<&Notification> {
        self.notifications.first()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }
}
