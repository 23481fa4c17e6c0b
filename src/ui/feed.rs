use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Widget};

use crate::api::types::TweetSnapshot;
use crate::app::App;
use crate::delete::DeleteTrigger;
use crate::ui::tweet::{CardModel, TweetCard, tweet_card_height};

/// A scrollable list of tweet cards with selection highlight.
pub struct FeedView<'a> {
    pub title: &'a str,
    pub tweets: &'a [TweetSnapshot],
    pub selected_index: usize,
    pub app: &'a App,
    pub loading: bool,
}

impl<'a> FeedView<'a> {
    pub fn new(title: &'a str, tweets: &'a [TweetSnapshot], app: &'a App) -> Self {
        Self {
            title,
            tweets,
            selected_index: app.selected_index(),
            app,
            loading: false,
        }
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }
}

impl Widget for FeedView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", self.title))
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(area);
        block.render(area, buf);

        if self.tweets.is_empty() {
            let msg = if self.loading {
                "Loading..."
            } else {
                "No tweets to display"
            };
            buf.set_string(
                inner.x + 1,
                inner.y,
                msg,
                Style::default().fg(Color::DarkGray),
            );
            return;
        }

        let content_width = inner.width.saturating_sub(2); // 1 char margin each side
        let available_height = inner.height;

        // Card heights including the separator line.
        let heights: Vec<u16> = self
            .tweets
            .iter()
            .map(|t| tweet_card_height(t, content_width).saturating_add(1))
            .collect();

        let scroll_start = compute_scroll_start(&heights, self.selected_index, available_height);

        let viewer = self.app.viewer.as_ref();
        let default_avatar = self.app.config.default_avatar_url.as_str();

        let mut y = inner.y;
        let mut idx = scroll_start;
        while idx < self.tweets.len() && y < inner.y + inner.height {
            let tweet = &self.tweets[idx];
            let remaining = inner.y + inner.height - y;
            let render_h = heights[idx].min(remaining);

            let card_area = Rect::new(inner.x + 1, y, content_width, render_h.saturating_sub(1));
            let model = CardModel::derive(
                tweet,
                viewer,
                self.app.deleter.in_flight(&tweet.id),
                default_avatar,
            );
            TweetCard::new(model)
                .selected(idx == self.selected_index)
                .spinner_tick(self.app.tick_count)
                .render(card_area, buf);

            y += render_h;

            if y < inner.y + inner.height && idx + 1 < self.tweets.len() {
                let sep = "\u{2500}".repeat(content_width as usize);
                buf.set_string(
                    inner.x + 1,
                    y.saturating_sub(1),
                    &sep,
                    Style::default().fg(Color::DarkGray),
                );
            }

            idx += 1;
        }
    }
}

/// Find the smallest scroll start index so that the selected item fits
/// within the available height.
fn compute_scroll_start(heights: &[u16], selected: usize, available: u16) -> usize {
    if heights.is_empty() {
        return 0;
    }

    let selected = selected.min(heights.len() - 1);
    if available == 0 {
        return selected;
    }

    // Keep the selected card visible and pack as many earlier ones above it
    // as fit.
    let mut start = selected;
    let mut used = heights[selected];

    while start > 0 {
        let next = used.saturating_add(heights[start - 1]);
        if next > available {
            break;
        }
        start -= 1;
        used = next;
    }

    start
}
