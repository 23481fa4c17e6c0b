use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::toast::{Toast, ToastKind};

/// A small notification box pinned to the top-right corner.
pub struct ToastView<'a> {
    toast: &'a Toast,
}

impl<'a> ToastView<'a> {
    pub fn new(toast: &'a Toast) -> Self {
        Self { toast }
    }
}

impl Widget for ToastView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 6 || area.height < 3 {
            return;
        }

        let color = match self.toast.kind {
            ToastKind::Success => Color::Green,
            ToastKind::Error => Color::Red,
        };

        // +4 for borders and padding.
        let max_width = 48u16.min(area.width.saturating_sub(2));
        let width = (self.toast.message.width() as u16 + 4).min(max_width);
        let inner_width = width.saturating_sub(2).max(1) as usize;
        let lines = self.toast.message.width().div_ceil(inner_width).max(1) as u16;
        let height = (lines + 2).min(area.height);

        let x = area.x + area.width - width - 1;
        let panel = Rect::new(x, area.y, width, height);

        Clear.render(panel, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));

        Paragraph::new(self.toast.message.as_str())
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .wrap(Wrap { trim: true })
            .block(block)
            .render(panel, buf);
    }
}
