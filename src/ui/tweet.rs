use chrono::{DateTime, Utc};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::api::types::{Engagement, EngagementCounts, TweetSnapshot, ViewerSession};
use crate::card::DeleteAffordance;

const SPINNER_FRAMES: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

const UNKNOWN_AUTHOR: &str = "Unknown";

// ---------------------------------------------------------------------------
// Card model
// ---------------------------------------------------------------------------

/// Everything a card displays, derived from a snapshot and the viewer.
#[derive(Debug, Clone, Serialize)]
pub struct CardModel<'a> {
    pub id: &'a str,
    pub author_name: &'a str,
    pub avatar_url: &'a str,
    pub created_at: Option<DateTime<Utc>>,
    pub text: &'a str,
    pub image: Option<&'a str>,
    pub counts: &'a EngagementCounts,
    #[serde(serialize_with = "serialize_affordance")]
    pub delete: DeleteAffordance,
    pub retweeted: bool,
    pub liked: bool,
    pub bookmarked: bool,
}

fn serialize_affordance<S: serde::Serializer>(
    affordance: &DeleteAffordance,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(match affordance {
        DeleteAffordance::Hidden => "hidden",
        DeleteAffordance::Idle => "idle",
        DeleteAffordance::Pending => "pending",
    })
}

impl<'a> CardModel<'a> {
    pub fn derive(
        tweet: &'a TweetSnapshot,
        viewer: Option<&ViewerSession>,
        in_flight: bool,
        default_avatar: &'a str,
    ) -> Self {
        Self {
            id: &tweet.id,
            author_name: tweet
                .author
                .name
                .as_deref()
                .filter(|n| !n.is_empty())
                .unwrap_or(UNKNOWN_AUTHOR),
            avatar_url: tweet
                .author
                .image
                .as_deref()
                .filter(|url| !url.is_empty())
                .unwrap_or(default_avatar),
            created_at: tweet.created_at,
            text: &tweet.text,
            image: tweet.image.as_deref().filter(|url| !url.is_empty()),
            counts: &tweet.counts,
            delete: DeleteAffordance::derive(tweet, viewer, in_flight),
            retweeted: tweet.viewer_did(Engagement::Retweet),
            liked: tweet.viewer_did(Engagement::Like),
            bookmarked: tweet.viewer_did(Engagement::Bookmark),
        }
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

/// Renders a single tweet as a card.
///
/// Layout:
///   [A] Alice · 2h                                  ⋯ Delete
///   Tweet text (may wrap) ...
///   ▣ https://cdn.example/image.png
///               2 Comments  1 Retweets  0 Saved  5 Liked
///     Comments     ↻ Retweets      ♥ Like      Bookmark
///
/// The engagement buttons only reflect what the viewer already did; they
/// carry no action.
pub struct TweetCard<'a> {
    pub model: CardModel<'a>,
    pub selected: bool,
    pub spinner_tick: usize,
}

impl<'a> TweetCard<'a> {
    pub fn new(model: CardModel<'a>) -> Self {
        Self {
            model,
            selected: false,
            spinner_tick: 0,
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn spinner_tick(mut self, tick: usize) -> Self {
        self.spinner_tick = tick;
        self
    }

    fn delete_span(&self) -> Option<Span<'static>> {
        match self.model.delete {
            DeleteAffordance::Hidden => None,
            DeleteAffordance::Idle => Some(Span::styled(
                "\u{22EF} Delete",
                Style::default().fg(Color::Yellow),
            )),
            DeleteAffordance::Pending => {
                let frame = SPINNER_FRAMES[self.spinner_tick % SPINNER_FRAMES.len()];
                Some(Span::styled(
                    format!("\u{22EF} {frame}"),
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::DIM),
                ))
            }
        }
    }
}

impl Widget for TweetCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let bottom = area.y + area.height;
        let mut y = area.y;
        let model = &self.model;

        // -- Header: avatar badge, author, time, delete control --
        let name_style = if self.selected {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        let initial: String = model
            .author_name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default();

        let mut header_spans = vec![
            Span::styled(format!("[{initial}] "), Style::default().fg(Color::Magenta)),
            Span::styled(model.author_name, name_style),
        ];
        if let Some(created_at) = model.created_at {
            header_spans.push(Span::styled(
                format!(" \u{00B7} {}", format_time_ago(created_at, Utc::now())),
                Style::default().fg(Color::DarkGray),
            ));
        }
        buf.set_line(area.x, y, &Line::from(header_spans), area.width);

        if let Some(span) = self.delete_span() {
            let line = Line::from(span);
            let width = (line.width() as u16).min(area.width);
            buf.set_line(area.x + area.width - width, y, &line, width);
        }
        y += 1;

        // -- Body text --
        let text_style = if self.selected {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::Gray)
        };
        for line_text in wrap_text(model.text, area.width as usize) {
            if y >= bottom {
                return;
            }
            buf.set_stringn(area.x, y, &line_text, area.width as usize, text_style);
            y += 1;
        }

        // -- Image --
        if let Some(image) = model.image {
            if y >= bottom {
                return;
            }
            buf.set_stringn(
                area.x,
                y,
                format!("\u{25A3} {image}"),
                area.width as usize,
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::UNDERLINED),
            );
            y += 1;
        }

        // -- Counts (right-aligned) --
        if y >= bottom {
            return;
        }
        let counts = model.counts;
        let counts_line = Line::from(format!(
            "{} Comments  {} Retweets  {} Saved  {} Liked",
            format_count(counts.comments),
            format_count(counts.retweets),
            format_count(counts.bookmarks),
            format_count(counts.likes),
        ))
        .style(Style::default().fg(Color::DarkGray));
        let width = (counts_line.width() as u16).min(area.width);
        buf.set_line(area.x + area.width - width, y, &counts_line, width);
        y += 1;

        // -- Action buttons --
        if y >= bottom {
            return;
        }
        let buttons = [
            ("Comments", false, Color::Gray),
            ("\u{21BB} Retweets", model.retweeted, Color::Green),
            ("\u{2665} Like", model.liked, Color::Red),
            ("Bookmark", model.bookmarked, Color::Blue),
        ];
        let column = area.width / buttons.len() as u16;
        for (i, (label, highlighted, color)) in buttons.into_iter().enumerate() {
            let style = if highlighted {
                Style::default().fg(color).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let label_width = (label.width() as u16).min(column);
            let x = area.x + column * i as u16 + (column - label_width) / 2;
            buf.set_stringn(x, y, label, label_width as usize, style);
        }
    }
}

/// Height in lines needed for a tweet card.
pub fn tweet_card_height(tweet: &TweetSnapshot, width: u16) -> u16 {
    let text_lines = u16::try_from(wrap_text(&tweet.text, width as usize).len()).unwrap_or(u16::MAX);
    let image_line = u16::from(tweet.image.as_deref().is_some_and(|url| !url.is_empty()));
    // header + text + image + counts + actions
    text_lines.saturating_add(image_line).saturating_add(3)
}

fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![];
    }
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        if paragraph.is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current = word.to_string();
            } else if current.width() + 1 + word.width() <= width {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(current);
                current = word.to_string();
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn format_time_ago(dt: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(dt);

    if diff.num_seconds() < 60 {
        format!("{}s", diff.num_seconds().max(0))
    } else if diff.num_minutes() < 60 {
        format!("{}m", diff.num_minutes())
    } else if diff.num_hours() < 24 {
        format!("{}h", diff.num_hours())
    } else if diff.num_days() < 30 {
        format!("{}d", diff.num_days())
    } else {
        dt.format("%b %d, %Y").to_string()
    }
}

fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::ViewerMark;
    use crate::cache::tests::tweet;

    const AVATAR: &str = "https://example.com/default.png";

    fn render(card: TweetCard<'_>, width: u16, height: u16) -> Buffer {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        card.render(area, &mut buf);
        buf
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol())
            .collect()
    }

    fn text(buf: &Buffer) -> String {
        (0..buf.area.height)
            .map(|y| row(buf, y))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Position of the first cell of `label`, matching cell by cell.
    fn find(buf: &Buffer, label: &str) -> Option<(u16, u16)> {
        let chars: Vec<String> = label.chars().map(|c| c.to_string()).collect();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                let fits = chars.iter().enumerate().all(|(i, c)| {
                    let cx = x + i as u16;
                    cx < buf.area.width && buf[(cx, y)].symbol() == c
                });
                if fits {
                    return Some((x, y));
                }
            }
        }
        None
    }

    fn fg_at(buf: &Buffer, label: &str) -> Color {
        let (x, y) = find(buf, label).unwrap();
        buf[(x, y)].fg
    }

    fn marked() -> Vec<ViewerMark> {
        vec![ViewerMark {
            user_id: Some("u1".into()),
        }]
    }

    #[test]
    fn model_uses_fallbacks() {
        let mut t = tweet("t1", "u1");
        t.author.name = None;
        t.image = Some(String::new());
        let model = CardModel::derive(&t, None, false, AVATAR);
        assert_eq!(model.author_name, "Unknown");
        assert_eq!(model.avatar_url, AVATAR);
        assert_eq!(model.image, None);
    }

    #[test]
    fn model_keeps_author_avatar() {
        let mut t = tweet("t1", "u1");
        t.author.image = Some("https://example.com/alice.png".into());
        let model = CardModel::derive(&t, None, false, AVATAR);
        assert_eq!(model.avatar_url, "https://example.com/alice.png");
    }

    #[test]
    fn no_delete_for_other_viewers() {
        let t = tweet("t1", "u1");
        for viewer in [None, Some(ViewerSession::new("u2"))] {
            let buf = render(
                TweetCard::new(CardModel::derive(&t, viewer.as_ref(), false, AVATAR)),
                60,
                6,
            );
            assert!(!text(&buf).contains("Delete"));
            assert!(find(&buf, "\u{22EF}").is_none());
        }
    }

    #[test]
    fn owner_sees_delete_then_spinner() {
        let t = tweet("t1", "u1");
        let owner = ViewerSession::new("u1");

        let idle = render(
            TweetCard::new(CardModel::derive(&t, Some(&owner), false, AVATAR)),
            60,
            6,
        );
        assert!(row(&idle, 0).contains("Delete"));

        let pending = render(
            TweetCard::new(CardModel::derive(&t, Some(&owner), true, AVATAR)).spinner_tick(1),
            60,
            6,
        );
        assert!(!row(&pending, 0).contains("Delete"));
        assert!(row(&pending, 0).contains(SPINNER_FRAMES[1]));
    }

    // Counts use the same words, so buttons are matched with their icons.
    const RETWEET: &str = "\u{21BB} Retweets";
    const LIKE: &str = "\u{2665} Like";

    #[test]
    fn highlights_follow_viewer_lists_independently() {
        let plain = tweet("t1", "u1");
        let buf = render(TweetCard::new(CardModel::derive(&plain, None, false, AVATAR)), 80, 6);
        assert_eq!(fg_at(&buf, RETWEET), Color::Gray);
        assert_eq!(fg_at(&buf, LIKE), Color::Gray);
        assert_eq!(fg_at(&buf, "Bookmark"), Color::Gray);

        let mut liked = tweet("t1", "u1");
        liked.likes = marked();
        let buf = render(TweetCard::new(CardModel::derive(&liked, None, false, AVATAR)), 80, 6);
        assert_eq!(fg_at(&buf, LIKE), Color::Red);
        assert_eq!(fg_at(&buf, RETWEET), Color::Gray);
        assert_eq!(fg_at(&buf, "Bookmark"), Color::Gray);

        let mut other = tweet("t1", "u1");
        other.retweets = marked();
        other.bookmarks = marked();
        let buf = render(TweetCard::new(CardModel::derive(&other, None, false, AVATAR)), 80, 6);
        assert_eq!(find(&buf, RETWEET).map(|(_, y)| y), Some(3));
        assert_eq!(fg_at(&buf, RETWEET), Color::Green);
        assert_eq!(fg_at(&buf, "Bookmark"), Color::Blue);
        assert_eq!(fg_at(&buf, LIKE), Color::Gray);
    }

    #[test]
    fn renders_counts_and_image() {
        let mut t = tweet("t1", "u1");
        t.image = Some("https://cdn.example/pic.png".into());
        t.counts.comments = 3;
        t.counts.likes = 1_500;
        let buf = render(
            TweetCard::new(CardModel::derive(&t, None, false, AVATAR)),
            80,
            tweet_card_height(&t, 80),
        );
        let out = text(&buf);
        assert!(out.contains("https://cdn.example/pic.png"));
        assert!(out.contains("3 Comments"));
        assert!(out.contains("1.5K Liked"));
    }

    #[test]
    fn card_height_counts_image_line() {
        let mut t = tweet("t1", "u1");
        assert_eq!(tweet_card_height(&t, 40), 4);
        t.image = Some("https://cdn.example/pic.png".into());
        assert_eq!(tweet_card_height(&t, 40), 5);
    }

    #[test]
    fn card_height_saturates_on_huge_body() {
        let mut t = tweet("t1", "u1");
        t.text = "\n".repeat(65_534);
        assert_eq!(tweet_card_height(&t, 40), u16::MAX);
        t.text = "\n".repeat(200_000);
        assert_eq!(tweet_card_height(&t, 40), u16::MAX);
    }

    #[test]
    fn wraps_on_display_width() {
        assert_eq!(wrap_text("aaa bbb ccc", 7), vec!["aaa bbb", "ccc"]);
        assert_eq!(wrap_text("", 10), vec![String::new()]);
        assert!(wrap_text("anything", 0).is_empty());
    }

    #[test]
    fn time_ago_buckets() {
        let now = Utc::now();
        assert_eq!(format_time_ago(now - chrono::Duration::seconds(5), now), "5s");
        assert_eq!(format_time_ago(now - chrono::Duration::minutes(3), now), "3m");
        assert_eq!(format_time_ago(now - chrono::Duration::hours(2), now), "2h");
        assert_eq!(format_time_ago(now - chrono::Duration::days(4), now), "4d");
    }
}
