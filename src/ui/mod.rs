pub mod comment_modal;
pub mod feed;
pub mod help;
pub mod status_bar;
pub mod toast;
pub mod tweet;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::app::App;
use crate::cache::FeedKey;
use crate::event::ViewKind;

use feed::FeedView;
use help::HelpView;
use status_bar::StatusBar;
use toast::ToastView;

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let [main_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

    frame.render_widget(StatusBar::new(app), status_area);

    match app.current_view() {
        Some(ViewKind::Feed(feed)) => render_feed(frame, app, feed, main_area),
        Some(ViewKind::Help) => {
            // Render the view underneath first, then overlay help.
            if let Some(feed) = app.previous_feed() {
                render_feed(frame, app, feed, main_area);
            }
            frame.render_widget(HelpView::new(), main_area);
        }
        None => {
            frame.render_widget(FeedView::new("tweetcard", &[], app), main_area);
        }
    }

    // Comment modal; nothing is drawn until a card has asked for it.
    if let Some(tweet_id) = app.cards.open_modal()
        && let Some(ref modal) = app.comment_modal
        && let Some(tweet) = app.cache.find(tweet_id)
    {
        let open = app.cards.state(tweet_id).is_modal_open();
        frame.render_widget(modal.view(tweet, open), main_area);
    }

    if let Some(ref toast) = app.toast {
        frame.render_widget(ToastView::new(toast), main_area);
    }
}

fn render_feed(frame: &mut Frame, app: &App, feed: &FeedKey, area: Rect) {
    let title = match feed {
        FeedKey::Home => "Home".to_string(),
        FeedKey::Profile(user_id) => app.display_name(user_id).to_string(),
    };
    frame.render_widget(
        FeedView::new(&title, app.cache.tweets(feed), app).loading(app.cache.is_loading(feed)),
        area,
    );
}
