use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::api::types::TweetSnapshot;
use crate::api::{ApiClientError, FeedClient};
use crate::cache::FeedKey;

/// Percent-encoding set for URL query values (encode everything except unreserved chars).
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn encode_query(s: &str) -> String {
    utf8_percent_encode(s, QUERY_ENCODE_SET).to_string()
}

/// Relative path for a feed listing.
fn feed_path(feed: &FeedKey) -> String {
    match feed {
        FeedKey::Home => "tweets".to_string(),
        FeedKey::Profile(user_id) => format!("tweets?userId={}", encode_query(user_id)),
    }
}

/// Relative path for deleting a tweet and, if present, its stored image.
fn delete_path(tweet_id: &str, image_id: Option<&str>) -> String {
    let mut path = format!("tweets/{}", encode_query(tweet_id));
    if let Some(image_id) = image_id {
        path.push_str(&format!("?imageId={}", encode_query(image_id)));
    }
    path
}

impl FeedClient {
    /// Fetch the tweets of a feed, newest first.
    pub async fn get_tweets(&self, feed: &FeedKey) -> Result<Vec<TweetSnapshot>, ApiClientError> {
        let url = self.url(&feed_path(feed))?;
        self.get_json(url).await
    }

    /// Delete a tweet. The image id lets the server drop the stored upload too.
    pub async fn delete_tweet(
        &self,
        tweet_id: &str,
        image_id: Option<&str>,
    ) -> Result<(), ApiClientError> {
        let url = self.url(&delete_path(tweet_id, image_id))?;
        self.delete(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_paths() {
        assert_eq!(feed_path(&FeedKey::Home), "tweets");
        assert_eq!(
            feed_path(&FeedKey::Profile("u 1".into())),
            "tweets?userId=u%201"
        );
    }

    #[test]
    fn delete_path_with_and_without_image() {
        assert_eq!(delete_path("t1", None), "tweets/t1");
        assert_eq!(delete_path("t1", Some("img/1")), "tweets/t1?imageId=img%2F1");
    }
}
