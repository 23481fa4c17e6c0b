use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::DefaultTerminal;

use crate::api::FeedClient;
use crate::api::types::ViewerSession;
use crate::cache::{FeedCache, FeedKey};
use crate::card::{self, CardRegistry};
use crate::config::{AppConfig, DefaultView};
use crate::delete::DeleteCoordinator;
use crate::event::{ApiResult, AppEvent, Event, EventHandler, ViewKind};
use crate::toast::Toast;
use crate::ui;
use crate::ui::comment_modal::{CommentModal, ModalRequest};

// ---------------------------------------------------------------------------
// View state
// ---------------------------------------------------------------------------

pub struct ViewState {
    pub kind: ViewKind,
    pub selected_index: usize,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    pub running: bool,
    pub events: EventHandler,
    pub config: AppConfig,
    pub viewer: Option<ViewerSession>,

    // View system
    pub view_stack: Vec<ViewState>,

    // Data state
    pub cache: FeedCache,
    pub cards: CardRegistry,
    pub deleter: DeleteCoordinator,
    pub comment_modal: Option<CommentModal>,

    pub client: Option<Arc<FeedClient>>,

    // Status
    pub toast: Option<Toast>,
    pub tick_count: usize,
}

impl App {
    pub fn new(config: AppConfig, client: Option<FeedClient>, viewer: Option<ViewerSession>) -> Self {
        let initial = match (&config.default_view, &viewer) {
            (DefaultView::Profile, Some(v)) => FeedKey::Profile(v.user_id.clone()),
            _ => FeedKey::Home,
        };

        let events = EventHandler::new(config.tick_rate_fps);
        let client = client.map(Arc::new);
        let deleter = DeleteCoordinator::new(client.clone(), events.sender());

        Self {
            running: true,
            events,
            config,
            viewer,
            view_stack: vec![ViewState {
                kind: ViewKind::Feed(initial),
                selected_index: 0,
            }],
            cache: FeedCache::new(),
            cards: CardRegistry::new(),
            deleter,
            comment_modal: None,
            client,
            toast: None,
            tick_count: 0,
        }
    }

    // -- Main event loop ----------------------------------------------------

    pub async fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        if let Some(feed) = self.current_feed().cloned() {
            self.events.send(AppEvent::FetchFeed(feed));
        }

        while self.running {
            terminal.draw(|frame| self.draw(frame))?;
            match self.events.next().await? {
                Event::Tick => self.tick(),
                Event::Crossterm(event) => {
                    if let crossterm::event::Event::Key(key) = event
                        && key.kind == crossterm::event::KeyEventKind::Press
                    {
                        self.handle_key_event(key);
                    }
                }
                Event::App(app_event) => self.handle_app_event(*app_event),
            }
        }
        Ok(())
    }

    fn draw(&self, frame: &mut ratatui::Frame) {
        ui::draw(frame, self);
    }

    fn tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
        let ttl = self.config.toast_duration();
        if self
            .toast
            .as_ref()
            .is_some_and(|t| t.is_expired(Instant::now(), ttl))
        {
            self.toast = None;
        }
    }

    // -- View stack ---------------------------------------------------------

    pub fn current_view(&self) -> Option<&ViewKind> {
        self.view_stack.last().map(|vs| &vs.kind)
    }

    pub fn current_feed(&self) -> Option<&FeedKey> {
        match self.current_view() {
            Some(ViewKind::Feed(feed)) => Some(feed),
            _ => None,
        }
    }

    /// The feed under an overlay view such as Help.
    pub fn previous_feed(&self) -> Option<&FeedKey> {
        let len = self.view_stack.len();
        if len < 2 {
            return None;
        }
        match &self.view_stack[len - 2].kind {
            ViewKind::Feed(feed) => Some(feed),
            ViewKind::Help => None,
        }
    }

    pub fn push_view(&mut self, kind: ViewKind) {
        self.view_stack.push(ViewState {
            kind,
            selected_index: 0,
        });
    }

    pub fn pop_view(&mut self) {
        if self.view_stack.len() > 1 {
            self.view_stack.pop();
        }
    }

    pub fn selected_index(&self) -> usize {
        self.view_stack.last().map_or(0, |vs| vs.selected_index)
    }

    pub fn is_loading(&self) -> bool {
        self.current_feed()
            .is_some_and(|feed| self.cache.is_loading(feed))
    }

    /// Best display name for a user id.
    pub fn display_name<'a>(&'a self, user_id: &'a str) -> &'a str {
        if let Some(ref viewer) = self.viewer
            && viewer.user_id == user_id
            && let Some(ref name) = viewer.name
        {
            return name;
        }
        self.cache
            .author(user_id)
            .and_then(|a| a.name.as_deref())
            .unwrap_or(user_id)
    }

    fn selected_tweet_id(&self) -> Option<&str> {
        let feed = self.current_feed()?;
        self.cache
            .tweets(feed)
            .get(self.selected_index())
            .map(|t| t.id.as_str())
    }

    // -- Key event routing --------------------------------------------------

    fn handle_key_event(&mut self, key: KeyEvent) {
        // Ctrl-C always quits.
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c' | 'C'))
        {
            self.events.send(AppEvent::Quit);
            return;
        }

        // An open comment modal takes every key until it asks to close.
        if let Some(tweet_id) = self.cards.open_modal().map(str::to_owned) {
            let modal = self.comment_modal.get_or_insert_with(CommentModal::new);
            if modal.handle_key(key) == Some(ModalRequest::Close) {
                self.cards.state_mut(&tweet_id).close_modal();
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                if self.view_stack.len() > 1 {
                    self.events.send(AppEvent::PopView);
                } else {
                    self.events.send(AppEvent::Quit);
                }
            }
            KeyCode::Char('j') | KeyCode::Down => self.move_selection_down(),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection_up(),
            KeyCode::Char('c') => self.open_comments(),
            KeyCode::Char('d') => self.delete_selected(),
            KeyCode::Char('u') => self.open_author_feed(),
            KeyCode::Char('r') => {
                if let Some(feed) = self.current_feed().cloned() {
                    self.events.send(AppEvent::FetchFeed(feed));
                }
            }
            KeyCode::Char('?') => {
                if self.current_view() != Some(&ViewKind::Help) {
                    self.events.send(AppEvent::PushView(ViewKind::Help));
                }
            }
            _ => {}
        }
    }

    // -- Card actions -------------------------------------------------------

    fn open_comments(&mut self) {
        let Some(tweet_id) = self.selected_tweet_id().map(str::to_owned) else {
            return;
        };
        // Built on first use only.
        self.comment_modal.get_or_insert_with(CommentModal::new);
        self.cards.state_mut(&tweet_id).open_comments();
    }

    fn delete_selected(&mut self) {
        let Some(ViewKind::Feed(feed)) = self.view_stack.last().map(|vs| &vs.kind) else {
            return;
        };
        let Some(tweet) = self.cache.tweets(feed).get(self.selected_index()) else {
            return;
        };
        if !card::request_delete(tweet, self.viewer.as_ref(), &mut self.deleter) {
            tracing::debug!(tweet_id = %tweet.id, "delete intent ignored");
        }
    }

    fn open_author_feed(&mut self) {
        let Some(feed) = self.current_feed() else {
            return;
        };
        let Some(author_id) = self
            .cache
            .tweets(feed)
            .get(self.selected_index())
            .map(|t| t.author.id.clone())
        else {
            return;
        };
        let target = FeedKey::Profile(author_id);
        if feed != &target {
            self.events.send(AppEvent::PushView(ViewKind::Feed(target)));
        }
    }

    // -- Selection helpers --------------------------------------------------

    fn move_selection_down(&mut self) {
        let count = self.current_feed().map_or(0, |f| self.cache.tweets(f).len());
        if let Some(vs) = self.view_stack.last_mut()
            && vs.selected_index + 1 < count
        {
            vs.selected_index += 1;
        }
    }

    fn move_selection_up(&mut self) {
        if let Some(vs) = self.view_stack.last_mut() {
            vs.selected_index = vs.selected_index.saturating_sub(1);
        }
    }

    /// Keep every view's selection inside its (possibly shrunk) feed.
    fn clamp_selections(&mut self) {
        for vs in &mut self.view_stack {
            if let ViewKind::Feed(ref feed) = vs.kind {
                vs.selected_index = clamp_index(vs.selected_index, self.cache.tweets(feed).len());
            }
        }
    }

    /// Mount card state for new tweets, unmount the rest.
    fn sync_cards(&mut self) {
        let live = self.cache.ids();
        self.cards.sync(&live);
    }

    // -- App event handling -------------------------------------------------

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Quit => {
                self.running = false;
            }
            AppEvent::PushView(kind) => {
                self.fetch_for_view(&kind);
                self.push_view(kind);
            }
            AppEvent::PopView => {
                self.pop_view();
            }
            AppEvent::FetchFeed(feed) => {
                self.cache.set_loading(&feed, true);
                self.dispatch_fetch(feed);
            }
            AppEvent::FeedLoaded { feed, result } => match result {
                Ok(tweets) => {
                    tracing::debug!(?feed, count = tweets.len(), "feed loaded");
                    self.cache.replace(feed, tweets);
                    self.clamp_selections();
                    self.sync_cards();
                }
                Err(e) => {
                    self.cache.set_loading(&feed, false);
                    self.toast = Some(Toast::error(format!("Error loading feed: {e}")));
                }
            },
            AppEvent::TweetDeleted { tweet_id, result } => {
                self.complete_delete(&tweet_id, result);
            }
        }
    }

    fn complete_delete(&mut self, tweet_id: &str, result: ApiResult<()>) {
        self.toast = Some(self.deleter.complete(tweet_id, result, &mut self.cache));
        self.clamp_selections();
        self.sync_cards();
    }

    // -- API dispatch -------------------------------------------------------

    fn dispatch_fetch(&self, feed: FeedKey) {
        let sender = self.events.sender();
        let Some(ref client) = self.client else {
            let result = Err(Arc::new("not connected to the feed service".to_string()));
            let _ = sender.send(Event::App(Box::new(AppEvent::FeedLoaded { feed, result })));
            return;
        };
        let client = Arc::clone(client);

        tokio::spawn(async move {
            let result: ApiResult<_> = client
                .get_tweets(&feed)
                .await
                .map_err(|e| Arc::new(e.to_string()));
            let _ = sender.send(Event::App(Box::new(AppEvent::FeedLoaded { feed, result })));
        });
    }

    fn fetch_for_view(&mut self, kind: &ViewKind) {
        if let ViewKind::Feed(feed) = kind
            && self.cache.is_empty(feed)
        {
            self.events.send(AppEvent::FetchFeed(feed.clone()));
        }
    }
}

fn clamp_index(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}
