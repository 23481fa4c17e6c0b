//! Per-card interaction state.
//!
//! A card owns exactly one piece of state, the visibility of its comment
//! modal. Whether a delete is pending is read from the [`DeleteTrigger`] on
//! every render and never copied here.
//!
//! The delete affordance is only shown to the author. That is a display
//! decision; the feed service performs the real authorization check.

use std::collections::{HashMap, HashSet};

use crate::api::types::{TweetSnapshot, ViewerSession};
use crate::delete::DeleteTrigger;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModalVisibility {
    #[default]
    Closed,
    Open,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CardState {
    modal: ModalVisibility,
}

impl CardState {
    pub fn modal(&self) -> ModalVisibility {
        self.modal
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal == ModalVisibility::Open
    }

    /// The "Comments" action.
    pub fn open_comments(&mut self) {
        self.modal = ModalVisibility::Open;
    }

    /// Close callback handed to the comment modal.
    pub fn close_modal(&mut self) {
        self.modal = ModalVisibility::Closed;
    }
}

/// State of the owner-only delete control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteAffordance {
    /// Viewer is anonymous or not the author.
    Hidden,
    Idle,
    /// A delete is in flight; the control is inert and shows a spinner.
    Pending,
}

impl DeleteAffordance {
    pub fn derive(tweet: &TweetSnapshot, viewer: Option<&ViewerSession>, in_flight: bool) -> Self {
        match viewer {
            Some(viewer) if viewer.owns(tweet) => {
                if in_flight {
                    DeleteAffordance::Pending
                } else {
                    DeleteAffordance::Idle
                }
            }
            _ => DeleteAffordance::Hidden,
        }
    }

    pub fn is_visible(self) -> bool {
        self != DeleteAffordance::Hidden
    }
}

/// Handle a delete intent on a card. Returns `true` if the trigger fired.
pub fn request_delete(
    tweet: &TweetSnapshot,
    viewer: Option<&ViewerSession>,
    deleter: &mut impl DeleteTrigger,
) -> bool {
    match DeleteAffordance::derive(tweet, viewer, deleter.in_flight(&tweet.id)) {
        DeleteAffordance::Idle => {
            deleter.trigger(&tweet.id, tweet.image_id.as_deref());
            true
        }
        DeleteAffordance::Pending | DeleteAffordance::Hidden => false,
    }
}

/// Card states keyed by tweet id.
///
/// An entry exists while its tweet is present in some cached feed; [`sync`]
/// drops the rest.
///
/// [`sync`]: CardRegistry::sync
#[derive(Debug, Default)]
pub struct CardRegistry {
    cards: HashMap<String, CardState>,
}

impl CardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, tweet_id: &str) -> CardState {
        self.cards.get(tweet_id).copied().unwrap_or_default()
    }

    pub fn state_mut(&mut self, tweet_id: &str) -> &mut CardState {
        self.cards.entry(tweet_id.to_owned()).or_default()
    }

    /// Mount cards for new tweets and drop those no longer displayed.
    pub fn sync(&mut self, live: &HashSet<&str>) {
        self.cards.retain(|id, _| live.contains(id.as_str()));
        for id in live {
            self.cards.entry((*id).to_owned()).or_default();
        }
    }

    /// The tweet whose comment modal is currently open, if any.
    pub fn open_modal(&self) -> Option<&str> {
        self.cards
            .iter()
            .find(|(_, state)| state.is_modal_open())
            .map(|(id, _)| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::tests::tweet;

    /// Records every trigger call; in-flight is driven by the test.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<(String, Option<String>)>,
        busy: HashSet<String>,
    }

    impl DeleteTrigger for Recorder {
        fn in_flight(&self, tweet_id: &str) -> bool {
            self.busy.contains(tweet_id)
        }

        fn trigger(&mut self, tweet_id: &str, image_id: Option<&str>) {
            self.calls.push((tweet_id.into(), image_id.map(Into::into)));
            self.busy.insert(tweet_id.into());
        }
    }

    #[test]
    fn hidden_for_anonymous_and_other_viewers() {
        let t = tweet("t1", "u1");
        assert_eq!(DeleteAffordance::derive(&t, None, false), DeleteAffordance::Hidden);
        let other = ViewerSession::new("u2");
        assert_eq!(
            DeleteAffordance::derive(&t, Some(&other), false),
            DeleteAffordance::Hidden
        );
        assert_eq!(
            DeleteAffordance::derive(&t, Some(&other), true),
            DeleteAffordance::Hidden
        );
    }

    #[test]
    fn owner_sees_idle_then_pending() {
        let t = tweet("t1", "u1");
        let owner = ViewerSession::new("u1");
        assert_eq!(DeleteAffordance::derive(&t, Some(&owner), false), DeleteAffordance::Idle);
        assert_eq!(
            DeleteAffordance::derive(&t, Some(&owner), true),
            DeleteAffordance::Pending
        );
    }

    #[test]
    fn owner_delete_triggers_once_with_ids() {
        let mut t = tweet("t1", "u1");
        t.image_id = Some("img-9".into());
        let owner = ViewerSession::new("u1");
        let mut recorder = Recorder::default();

        assert!(request_delete(&t, Some(&owner), &mut recorder));
        assert!(!request_delete(&t, Some(&owner), &mut recorder));
        assert!(!request_delete(&t, Some(&owner), &mut recorder));

        assert_eq!(recorder.calls, vec![("t1".to_string(), Some("img-9".to_string()))]);
    }

    #[test]
    fn delete_reopens_after_completion() {
        let t = tweet("t1", "u1");
        let owner = ViewerSession::new("u1");
        let mut recorder = Recorder::default();

        assert!(request_delete(&t, Some(&owner), &mut recorder));
        recorder.busy.clear();
        assert_eq!(
            DeleteAffordance::derive(&t, Some(&owner), recorder.in_flight("t1")),
            DeleteAffordance::Idle
        );
        assert!(request_delete(&t, Some(&owner), &mut recorder));
        assert_eq!(recorder.calls.len(), 2);
    }

    #[test]
    fn non_owner_cannot_trigger() {
        let t = tweet("t1", "u1");
        let mut recorder = Recorder::default();
        assert!(!request_delete(&t, None, &mut recorder));
        assert!(!request_delete(&t, Some(&ViewerSession::new("u2")), &mut recorder));
        assert!(recorder.calls.is_empty());
    }

    #[test]
    fn scenario_owner_with_no_engagement() {
        let t = tweet("t1", "u1");
        let owner = ViewerSession::new("u1");
        let mut recorder = Recorder::default();

        assert!(DeleteAffordance::derive(&t, Some(&owner), false).is_visible());
        assert!(request_delete(&t, Some(&owner), &mut recorder));
        assert_eq!(recorder.calls, vec![("t1".to_string(), None)]);
        assert_eq!(
            DeleteAffordance::derive(&t, Some(&owner), recorder.in_flight("t1")),
            DeleteAffordance::Pending
        );
    }

    #[test]
    fn modal_opens_and_closes_only_on_request() {
        let mut state = CardState::default();
        assert_eq!(state.modal(), ModalVisibility::Closed);
        state.open_comments();
        assert_eq!(state.modal(), ModalVisibility::Open);
        state.open_comments();
        assert_eq!(state.modal(), ModalVisibility::Open);
        state.close_modal();
        assert_eq!(state.modal(), ModalVisibility::Closed);
    }

    #[test]
    fn delete_does_not_touch_modal() {
        let t = tweet("t1", "u1");
        let owner = ViewerSession::new("u1");
        let mut registry = CardRegistry::new();
        let mut recorder = Recorder::default();

        registry.state_mut("t1").open_comments();
        request_delete(&t, Some(&owner), &mut recorder);
        assert!(registry.state("t1").is_modal_open());
    }

    #[test]
    fn sync_mounts_and_unmounts() {
        let mut registry = CardRegistry::new();
        registry.state_mut("t1").open_comments();
        registry.sync(&HashSet::from(["t1", "t2"]));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.open_modal(), Some("t1"));

        registry.sync(&HashSet::from(["t2"]));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.open_modal(), None);
        assert_eq!(registry.state("t1"), CardState::default());
    }
}
