use crossterm::event::{KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap};

use crate::api::types::TweetSnapshot;

/// Requests the modal sends back to the card that opened it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalRequest {
    Close,
}

/// Comment modal. Built on first use and reused afterwards.
#[derive(Debug)]
pub struct CommentModal {
    scroll: u16,
}

impl CommentModal {
    pub fn new() -> Self {
        tracing::debug!("comment modal constructed");
        Self { scroll: 0 }
    }

    /// Route a key press while the modal is open.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ModalRequest> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.scroll = 0;
                Some(ModalRequest::Close)
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll = self.scroll.saturating_add(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll = self.scroll.saturating_sub(1);
                None
            }
            _ => None,
        }
    }

    pub fn view<'a>(&'a self, tweet: &'a TweetSnapshot, open: bool) -> CommentModalView<'a> {
        CommentModalView {
            modal: self,
            tweet,
            open,
        }
    }
}

impl Default for CommentModal {
    fn default() -> Self {
        Self::new()
    }
}

/// Centered popup over the feed. Draws nothing while closed.
pub struct CommentModalView<'a> {
    modal: &'a CommentModal,
    tweet: &'a TweetSnapshot,
    open: bool,
}

impl Widget for CommentModalView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.open {
            return;
        }

        let width = 64u16.min(area.width.saturating_sub(4));
        let height = 14u16.min(area.height.saturating_sub(2));
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        let panel = Rect::new(x, y, width, height);

        Clear.render(panel, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Comments ({}) ", self.tweet.counts.comments))
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .border_style(Style::default().fg(Color::Cyan));

        let inner = block.inner(panel);
        block.render(panel, buf);

        if inner.height < 2 {
            return;
        }
        let body_area = Rect::new(inner.x, inner.y, inner.width, inner.height - 1);
        let hint_area = Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1);

        let author = self.tweet.author.name.as_deref().unwrap_or("Unknown");
        let body = vec![
            Line::from(Span::styled(
                author,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(self.tweet.text.as_str()),
        ];
        Paragraph::new(body)
            .wrap(Wrap { trim: true })
            .scroll((self.modal.scroll, 0))
            .render(body_area, buf);

        let hint = Line::from(Span::styled(
            " Press Esc to close ",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ));
        Paragraph::new(hint).render(hint_area, buf);
    }
}
