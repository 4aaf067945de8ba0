use serde::{Deserialize, Serialize};

use super::bookmark::BookmarkRecord;
use super::consent::ConsentPreferences;
use super::vote::CommentVoteState;

/// What happened to the bookmark collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Add,
    Remove,
    Clear,
}

/// Detail carried by a `bookmarkChanged` notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmarkChange {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<BookmarkRecord>,
}

/// Detail carried by a `commentVoteChanged` notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteChange {
    pub comment_id: String,
    #[serde(flatten)]
    pub state: CommentVoteState,
}

/// Every payload that travels over the in-process event bus.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    Bookmark(BookmarkChange),
    CommentVote(VoteChange),
    /// `None` after the decision was withdrawn.
    Consent(Option<ConsentPreferences>),
}
