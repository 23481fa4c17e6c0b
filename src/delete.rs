//! Delete-tweet mutation and its in-flight bookkeeping.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::api::FeedClient;
use crate::cache::FeedCache;
use crate::event::{ApiResult, AppEvent, Event};
use crate::toast::Toast;

/// What a tweet card needs from the delete mutation.
pub trait DeleteTrigger {
    /// Whether a delete for `tweet_id` has been requested but not resolved.
    fn in_flight(&self, tweet_id: &str) -> bool;

    /// Start deleting a tweet. Ignored if one is already in flight for it.
    fn trigger(&mut self, tweet_id: &str, image_id: Option<&str>);
}

/// Runs delete requests in the background and reports completion through the
/// event channel as [`AppEvent::TweetDeleted`].
pub struct DeleteCoordinator {
    client: Option<Arc<FeedClient>>,
    sender: mpsc::UnboundedSender<Event>,
    in_flight: HashSet<String>,
}

impl DeleteCoordinator {
    pub fn new(client: Option<Arc<FeedClient>>, sender: mpsc::UnboundedSender<Event>) -> Self {
        Self {
            client,
            sender,
            in_flight: HashSet::new(),
        }
    }

    /// Resolve a delete. Clears the in-flight flag on both outcomes; on
    /// success the tweet is pruned from every cached feed.
    ///
    /// A completion for a tweet that is no longer cached is harmless.
    pub fn complete(&mut self, tweet_id: &str, result: ApiResult<()>, cache: &mut FeedCache) -> Toast {
        self.in_flight.remove(tweet_id);
        match result {
            Ok(()) => {
                let removed = cache.remove_tweet(tweet_id);
                tracing::info!(tweet_id, removed, "tweet deleted");
                Toast::success("Tweet deleted")
            }
            Err(e) => {
                tracing::warn!(tweet_id, "delete failed: {e}");
                Toast::error(format!("Could not delete tweet: {e}"))
            }
        }
    }

    fn send_completion(sender: &mpsc::UnboundedSender<Event>, tweet_id: String, result: ApiResult<()>) {
        let _ = sender.send(Event::App(Box::new(AppEvent::TweetDeleted { tweet_id, result })));
    }
}

impl DeleteTrigger for DeleteCoordinator {
    fn in_flight(&self, tweet_id: &str) -> bool {
        self.in_flight.contains(tweet_id)
    }

    fn trigger(&mut self, tweet_id: &str, image_id: Option<&str>) {
        if !self.in_flight.insert(tweet_id.to_owned()) {
            tracing::debug!(tweet_id, "delete already in flight");
            return;
        }

        let tweet_id = tweet_id.to_owned();
        let Some(ref client) = self.client else {
            Self::send_completion(
                &self.sender,
                tweet_id,
                Err(Arc::new("not connected to the feed service".to_string())),
            );
            return;
        };

        let client = Arc::clone(client);
        let sender = self.sender.clone();
        let image_id = image_id.map(str::to_owned);
        tracing::debug!(%tweet_id, ?image_id, "dispatching delete");

        tokio::spawn(async move {
            let result = client
                .delete_tweet(&tweet_id, image_id.as_deref())
                .await
                .map_err(|e| Arc::new(e.to_string()));
            Self::send_completion(&sender, tweet_id, result);
        });
    }
}
