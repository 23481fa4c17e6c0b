use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Tweet snapshot
// ---------------------------------------------------------------------------

/// Point-in-time projection of a tweet record as delivered by the feed service.
///
/// The `retweets`, `likes` and `bookmarks` lists are scoped to the current
/// viewer: an entry means the viewer performed that action.
#[derive(Debug, Clone, Deserialize)]
pub struct TweetSnapshot {
    pub id: String,
    pub text: String,
    #[serde(rename = "user")]
    pub author: AuthorSummary,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(rename = "imageID", default)]
    pub image_id: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "_count", default)]
    pub counts: EngagementCounts,
    #[serde(default)]
    pub retweets: Vec<ViewerMark>,
    #[serde(default)]
    pub likes: Vec<ViewerMark>,
    #[serde(rename = "Bookmark", default)]
    pub bookmarks: Vec<ViewerMark>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthorSummary {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementCounts {
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub retweets: u64,
    #[serde(rename = "Bookmark", default)]
    pub bookmarks: u64,
    #[serde(default)]
    pub likes: u64,
}

/// Marker that the viewer has retweeted, liked or bookmarked a tweet.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewerMark {
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
}

/// The three engagement actions that carry a per-viewer relationship list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engagement {
    Retweet,
    Like,
    Bookmark,
}

impl Engagement {
    pub const ALL: [Engagement; 3] = [Engagement::Retweet, Engagement::Like, Engagement::Bookmark];

    pub fn label(self) -> &'static str {
        match self {
            Engagement::Retweet => "retweets",
            Engagement::Like => "likes",
            Engagement::Bookmark => "Bookmark",
        }
    }
}

impl TweetSnapshot {
    pub fn viewer_marks(&self, engagement: Engagement) -> &[ViewerMark] {
        match engagement {
            Engagement::Retweet => &self.retweets,
            Engagement::Like => &self.likes,
            Engagement::Bookmark => &self.bookmarks,
        }
    }

    /// Whether the viewer performed `engagement`. Only a list of exactly one
    /// entry counts; anything longer is not a per-viewer list.
    pub fn viewer_did(&self, engagement: Engagement) -> bool {
        self.viewer_marks(engagement).len() == 1
    }

    /// Relationship lists holding more than one entry.
    pub fn oversized_marks(&self) -> impl Iterator<Item = (Engagement, usize)> + '_ {
        Engagement::ALL
            .into_iter()
            .map(|e| (e, self.viewer_marks(e).len()))
            .filter(|(_, len)| *len > 1)
    }
}

// ---------------------------------------------------------------------------
// Viewer session
// ---------------------------------------------------------------------------

/// Identity of the authenticated viewer. Absence is modelled as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerSession {
    pub user_id: String,
    pub name: Option<String>,
    pub token: Option<String>,
}

impl ViewerSession {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: None,
            token: None,
        }
    }

    pub fn owns(&self, tweet: &TweetSnapshot) -> bool {
        self.user_id == tweet.author.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "id": "t1",
        "text": "hello",
        "image": "https://cdn.example/a.png",
        "imageID": "img-1",
        "createdAt": "2024-03-01T10:00:00.000Z",
        "userId": "u1",
        "user": { "id": "u1", "name": "alice", "image": null },
        "_count": { "comments": 2, "retweets": 1, "Bookmark": 0, "likes": 5 },
        "retweets": [],
        "likes": [{ "userId": "u2" }],
        "Bookmark": []
    }"#;

    #[test]
    fn deserializes_server_shape() {
        let tweet: TweetSnapshot = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(tweet.author.id, "u1");
        assert_eq!(tweet.author.image, None);
        assert_eq!(tweet.image_id.as_deref(), Some("img-1"));
        assert_eq!(
            tweet.counts,
            EngagementCounts {
                comments: 2,
                retweets: 1,
                bookmarks: 0,
                likes: 5,
            }
        );
        assert!(tweet.viewer_did(Engagement::Like));
        assert!(!tweet.viewer_did(Engagement::Retweet));
        assert!(!tweet.viewer_did(Engagement::Bookmark));
    }

    #[test]
    fn missing_optional_fields_default() {
        let tweet: TweetSnapshot =
            serde_json::from_str(r#"{ "id": "t2", "text": "", "user": { "id": "u9" } }"#).unwrap();
        assert!(tweet.image.is_none());
        assert!(tweet.created_at.is_none());
        assert_eq!(tweet.counts, EngagementCounts::default());
        assert!(tweet.likes.is_empty());
    }

    #[test]
    fn oversized_list_does_not_count_as_viewer_action() {
        let mut tweet: TweetSnapshot = serde_json::from_str(SAMPLE).unwrap();
        tweet.bookmarks = vec![ViewerMark::default(), ViewerMark::default()];
        assert!(!tweet.viewer_did(Engagement::Bookmark));
        let oversized: Vec<_> = tweet.oversized_marks().collect();
        assert_eq!(oversized, vec![(Engagement::Bookmark, 2)]);
    }

    #[test]
    fn session_ownership() {
        let tweet: TweetSnapshot = serde_json::from_str(SAMPLE).unwrap();
        assert!(ViewerSession::new("u1").owns(&tweet));
        assert!(!ViewerSession::new("u2").owns(&tweet));
    }
}
