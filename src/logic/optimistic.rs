//! Optimistic reactions on announcements
//!
//! A like or comment is applied to the local counters immediately, before the
//! server answers. If the request fails, the inverse reaction is applied to
//! put the counters back.

use crate::api::{Announcement, LikeOutcome};

/// Counters of one announcement that reactions touch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReactionState {
    pub liked: bool,
    pub likes: u32,
    pub comments: u32,
}

impl ReactionState {
    pub fn of(announcement: &Announcement) -> Self {
        Self {
            liked: announcement.is_liked,
            likes: announcement.likes_count,
            comments: announcement.comments_count,
        }
    }

    pub fn write_to(&self, announcement: &mut Announcement) {
        announcement.is_liked = self.liked;
        announcement.likes_count = self.likes;
        announcement.comments_count = self.comments;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    ToggleLike,
    AddComment,
    RemoveComment,
}

impl Reaction {
    /// Reaction that undoes this one
    ///
    /// # Examples
    /// ```
    /// use wargatui::logic::optimistic::{Reaction, ReactionState};
    ///
    /// let before = ReactionState { liked: false, likes: 4, comments: 2 };
    /// let after = Reaction::ToggleLike.apply(before);
    /// assert_eq!(after, ReactionState { liked: true, likes: 5, comments: 2 });
    /// assert_eq!(Reaction::ToggleLike.inverse().apply(after), before);
    ///
    /// let after = Reaction::AddComment.apply(before);
    /// assert_eq!(after.comments, 3);
    /// assert_eq!(Reaction::AddComment.inverse().apply(after), before);
    /// ```
    pub fn inverse(&self) -> Reaction {
        match self {
            Reaction::ToggleLike => Reaction::ToggleLike,
            Reaction::AddComment => Reaction::RemoveComment,
            Reaction::RemoveComment => Reaction::AddComment,
        }
    }

    pub fn apply(&self, state: ReactionState) -> ReactionState {
        match self {
            Reaction::ToggleLike => {
                let liked = !state.liked;
                let likes = if liked {
                    state.likes.saturating_add(1)
                } else {
                    state.likes.saturating_sub(1)
                };
                ReactionState {
                    liked,
                    likes,
                    ..state
                }
            }
            Reaction::AddComment => ReactionState {
                comments: state.comments.saturating_add(1),
                ..state
            },
            Reaction::RemoveComment => ReactionState {
                comments: state.comments.saturating_sub(1),
                ..state
            },
        }
    }
}

/// Replace the optimistic like counters with whatever the server confirmed
pub fn reconcile_like(state: ReactionState, outcome: &LikeOutcome) -> ReactionState {
    ReactionState {
        liked: outcome.is_liked.unwrap_or(state.liked),
        likes: outcome.likes_count.unwrap_or(state.likes),
        ..state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlike_decrements() {
        let state = ReactionState {
            liked: true,
            likes: 1,
            comments: 0,
        };
        let after = Reaction::ToggleLike.apply(state);
        assert!(!after.liked);
        assert_eq!(after.likes, 0);
    }

    #[test]
    fn test_counters_never_underflow() {
        let state = ReactionState::default();
        assert_eq!(Reaction::RemoveComment.apply(state).comments, 0);

        let inconsistent = ReactionState {
            liked: true,
            likes: 0,
            comments: 0,
        };
        assert_eq!(Reaction::ToggleLike.apply(inconsistent).likes, 0);
    }

    #[test]
    fn test_inverse_of_inverse() {
        for reaction in [
            Reaction::ToggleLike,
            Reaction::AddComment,
            Reaction::RemoveComment,
        ] {
            assert_eq!(reaction.inverse().inverse(), reaction);
        }
    }

    #[test]
    fn test_reconcile_prefers_server_values() {
        let optimistic = ReactionState {
            liked: true,
            likes: 6,
            comments: 2,
        };
        let outcome = LikeOutcome {
            is_liked: Some(true),
            likes_count: Some(9),
        };
        assert_eq!(
            reconcile_like(optimistic, &outcome),
            ReactionState {
                liked: true,
                likes: 9,
                comments: 2
            }
        );

        // Server sent no data: keep the optimistic values
        assert_eq!(reconcile_like(optimistic, &LikeOutcome::default()), optimistic);
    }
}
