//! Labelled text field widget
//!
//! Dialog inputs are edited at the end only, so the cursor is drawn after
//! the last character.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// One labelled input line
#[derive(Debug, Clone)]
pub struct FieldInput<'a> {
    label: &'a str,
    value: &'a str,
    placeholder: &'a str,
    focused: bool,
    label_width: usize,
}

impl<'a> FieldInput<'a> {
    pub fn new(label: &'a str, value: &'a str) -> Self {
        Self {
            label,
            value,
            placeholder: "",
            focused: false,
            label_width: 14,
        }
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Pad labels to this width so values line up
    pub fn label_width(mut self, width: usize) -> Self {
        self.label_width = width;
        self
    }

    fn spans(&self) -> Vec<Span<'a>> {
        let label_style = if self.focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };

        let mut spans = vec![Span::styled(
            format!("{:<width$}", format!("{}:", self.label), width = self.label_width),
            label_style,
        )];

        if self.value.is_empty() && !self.focused {
            spans.push(Span::styled(
                self.placeholder,
                Style::default().fg(Color::DarkGray),
            ));
        } else {
            spans.push(Span::styled(self.value, Style::default().fg(Color::White)));
        }

        if self.focused {
            spans.push(Span::styled(
                " ",
                Style::default().fg(Color::Black).bg(Color::Cyan),
            ));
        }
        spans
    }
}

impl<'a> Widget for FieldInput<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = Line::from(self.spans());
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
