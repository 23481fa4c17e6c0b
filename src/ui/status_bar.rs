use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::cache::FeedKey;
use crate::event::ViewKind;

/// Bottom status bar showing the current view, loading state, and viewer.
pub struct StatusBar<'a> {
    pub app: &'a App,
}

impl<'a> StatusBar<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let bg_style = Style::default().bg(Color::DarkGray).fg(Color::White);
        for x in area.x..area.x + area.width {
            buf[(x, area.y)].set_style(bg_style);
        }

        let mut spans = vec![
            Span::styled(
                " tweetcard ",
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
        ];

        let view_name = match self.app.current_view() {
            Some(ViewKind::Feed(FeedKey::Home)) => "Home".to_string(),
            Some(ViewKind::Feed(FeedKey::Profile(user_id))) => {
                format!("Profile: {}", self.app.display_name(user_id))
            }
            Some(ViewKind::Help) => "Help".to_string(),
            None => String::new(),
        };
        spans.push(Span::styled(view_name, bg_style));

        if self.app.is_loading() {
            spans.push(Span::styled(
                " [loading...]",
                Style::default().bg(Color::DarkGray).fg(Color::Yellow),
            ));
        }

        // Viewer identity (right-aligned).
        let viewer = match self.app.viewer {
            Some(ref v) => format!("@{} ", v.name.as_deref().unwrap_or(&v.user_id)),
            None => "not signed in ".to_string(),
        };
        let left_width: usize = spans.iter().map(|s| s.width()).sum();
        let padding = (area.width as usize).saturating_sub(left_width + viewer.width());
        if padding > 0 {
            spans.push(Span::styled(" ".repeat(padding), bg_style));
            spans.push(Span::styled(viewer, bg_style.fg(Color::Cyan)));
        }

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::ViewerSession;
    use crate::config::AppConfig;

    #[tokio::test]
    async fn viewer_label_is_right_aligned_by_display_width() {
        let mut viewer = ViewerSession::new("u1");
        viewer.name = Some("\u{5C0F}\u{660E}".into());
        let app = App::new(AppConfig::default(), None, Some(viewer));

        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new(&app).render(area, &mut buf);

        // "@" + two double-width glyphs + trailing space fill the last 6 cells.
        assert_eq!(buf[(34, 0)].symbol(), "@");
        assert_eq!(buf[(35, 0)].symbol(), "\u{5C0F}");
        assert_eq!(buf[(37, 0)].symbol(), "\u{660E}");
        assert_eq!(buf[(39, 0)].symbol(), " ");
    }
}
