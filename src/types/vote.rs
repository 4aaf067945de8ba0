use serde::{Deserialize, Serialize};

/// A direction a reader can vote in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    Up,
    Down,
}

/// The reader's last-known vote on a comment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteStatus {
    Up,
    Down,
    #[default]
    None,
}

impl From<VoteType> for VoteStatus {
    fn from(v: VoteType) -> Self {
        match v {
            VoteType::Up => VoteStatus::Up,
            VoteType::Down => VoteStatus::Down,
        }
    }
}

impl VoteStatus {
    /// Status to request when the reader clicks `clicked`: clicking the
    /// direction already held retracts the vote.
    pub fn after_click(self, clicked: VoteType) -> VoteStatus {
        let clicked = VoteStatus::from(clicked);
        if self == clicked {
            VoteStatus::None
        } else {
            clicked
        }
    }
}

/// Last-known vote state for one comment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentVoteState {
    pub vote_status: VoteStatus,
    pub vote_count: i64,
}

/// Body of `PUT /vote`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub comment_id: String,
    pub vote_type: VoteStatus,
}

/// Response of `PUT /vote`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub success: bool,
    #[serde(default)]
    pub vote_type: VoteStatus,
    #[serde(default)]
    pub vote_count: i64,
}

/// Response of `GET /vote-status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteStatusResponse {
    #[serde(default)]
    pub vote_status: VoteStatus,
    #[serde(default)]
    pub vote_count: Option<i64>,
}
