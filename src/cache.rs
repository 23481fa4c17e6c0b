use std::collections::{HashMap, HashSet};

use crate::api::types::{AuthorSummary, TweetSnapshot};

/// Identifies a cached tweet list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FeedKey {
    Home,
    Profile(String), // author user_id
}

#[derive(Debug, Default)]
pub struct FeedEntry {
    pub tweets: Vec<TweetSnapshot>,
    pub loading: bool,
}

/// Tweet lists shared by every view. A successful delete prunes the tweet
/// from all of them at once.
#[derive(Debug, Default)]
pub struct FeedCache {
    feeds: HashMap<FeedKey, FeedEntry>,
}

impl FeedCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tweets(&self, feed: &FeedKey) -> &[TweetSnapshot] {
        self.feeds
            .get(feed)
            .map(|entry| entry.tweets.as_slice())
            .unwrap_or_default()
    }

    pub fn is_loading(&self, feed: &FeedKey) -> bool {
        self.feeds.get(feed).is_some_and(|entry| entry.loading)
    }

    pub fn is_empty(&self, feed: &FeedKey) -> bool {
        self.tweets(feed).is_empty()
    }

    pub fn set_loading(&mut self, feed: &FeedKey, loading: bool) {
        self.feeds.entry(feed.clone()).or_default().loading = loading;
    }

    /// Store a fresh load, replacing whatever the feed held before.
    pub fn replace(&mut self, feed: FeedKey, tweets: Vec<TweetSnapshot>) {
        for tweet in &tweets {
            for (engagement, len) in tweet.oversized_marks() {
                tracing::warn!(
                    tweet_id = %tweet.id,
                    list = engagement.label(),
                    len,
                    "per-viewer relationship list has more than one entry"
                );
            }
        }
        let entry = self.feeds.entry(feed).or_default();
        entry.tweets = tweets;
        entry.loading = false;
    }

    /// Drop a tweet from every feed. Returns how many entries were removed.
    pub fn remove_tweet(&mut self, tweet_id: &str) -> usize {
        let mut removed = 0;
        for entry in self.feeds.values_mut() {
            let before = entry.tweets.len();
            entry.tweets.retain(|t| t.id != tweet_id);
            removed += before - entry.tweets.len();
        }
        removed
    }

    pub fn find(&self, tweet_id: &str) -> Option<&TweetSnapshot> {
        self.feeds
            .values()
            .flat_map(|entry| entry.tweets.iter())
            .find(|t| t.id == tweet_id)
    }

    pub fn contains(&self, tweet_id: &str) -> bool {
        self.find(tweet_id).is_some()
    }

    /// Author summary for a user id, taken from any cached tweet.
    pub fn author(&self, user_id: &str) -> Option<&AuthorSummary> {
        self.feeds
            .values()
            .flat_map(|entry| entry.tweets.iter())
            .map(|t| &t.author)
            .find(|a| a.id == user_id)
    }

    /// Ids of every tweet in any feed.
    pub fn ids(&self) -> HashSet<&str> {
        self.feeds
            .values()
            .flat_map(|entry| entry.tweets.iter().map(|t| t.id.as_str()))
            .collect()
    }
}
