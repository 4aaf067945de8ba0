//! Vote Tracker for blogsync.
//!
//! Client side of comment voting. Counting happens server-side; the tracker
//! only remembers the last-known status and count per comment id and talks
//! to the vote handlers through a [`VoteEndpoint`].

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::events::EventBus;
use crate::types::errors::VoteError;
use crate::types::events::{SyncEvent, VoteChange};
use crate::types::vote::{
    CommentVoteState, VoteRequest, VoteResponse, VoteStatusResponse, VoteType,
};

/// The server-side vote handlers.
#[async_trait]
pub trait VoteEndpoint: Send + Sync {
    /// `PUT /vote`
    async fn cast_vote(&self, request: &VoteRequest) -> Result<VoteResponse, VoteError>;
    /// `GET /vote-status?commentId=`
    async fn fetch_status(&self, comment_id: &str) -> Result<VoteStatusResponse, VoteError>;
}

/// [`VoteEndpoint`] over HTTP.
pub struct HttpVoteEndpoint {
    client: reqwest::Client,
    base_url: String,
}

impl HttpVoteEndpoint {
    /// `base_url` is the prefix of the handlers, e.g. `https://blog.example/api`.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl VoteEndpoint for HttpVoteEndpoint {
    async fn cast_vote(&self, request: &VoteRequest) -> Result<VoteResponse, VoteError> {
        let response = self
            .client
            .put(format!("{}/vote", self.base_url))
            .json(request)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn fetch_status(&self, comment_id: &str) -> Result<VoteStatusResponse, VoteError> {
        let response = self
            .client
            .get(format!("{}/vote-status", self.base_url))
            .query(&[("commentId", comment_id)])
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

/// Last-known vote state per comment, kept in step with the endpoint.
pub struct VoteTracker<E> {
    endpoint: E,
    cache: Mutex<HashMap<String, CommentVoteState>>,
    bus: EventBus<SyncEvent>,
    vote_event: String,
}

impl<E: VoteEndpoint> VoteTracker<E> {
    pub fn new(endpoint: E, bus: EventBus<SyncEvent>, vote_event: &str) -> Self {
        Self {
            endpoint,
            cache: Mutex::new(HashMap::new()),
            bus,
            vote_event: vote_event.to_string(),
        }
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    fn cache(&self) -> MutexGuard<'_, HashMap<String, CommentVoteState>> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Last-known state, without asking the endpoint.
    pub fn cached(&self, comment_id: &str) -> Option<CommentVoteState> {
        self.cache().get(comment_id).copied()
    }

    fn record(&self, comment_id: &str, state: CommentVoteState) {
        let previous = self.cache().insert(comment_id.to_string(), state);
        if previous != Some(state) {
            self.bus.publish(
                &self.vote_event,
                &SyncEvent::CommentVote(VoteChange {
                    comment_id: comment_id.to_string(),
                    state,
                }),
            );
        }
    }

    /// Fetches the reader's status for `comment_id` and caches it.
    ///
    /// The status endpoint may omit the count; the cached count is kept then.
    pub async fn refresh(&self, comment_id: &str) -> Result<CommentVoteState, VoteError> {
        let response = self.endpoint.fetch_status(comment_id).await?;
        let known_count = self.cached(comment_id).map(|s| s.vote_count).unwrap_or(0);
        let state = CommentVoteState {
            vote_status: response.vote_status,
            vote_count: response.vote_count.unwrap_or(known_count),
        };
        self.record(comment_id, state);
        Ok(state)
    }

    /// Casts a click on `direction`. Clicking the direction already held
    /// retracts the vote. Unknown comments are treated as not voted yet.
    ///
    /// # Errors
    /// Endpoint failures, including `success: false`, leave the cache untouched.
    pub async fn vote(
        &self,
        comment_id: &str,
        direction: VoteType,
    ) -> Result<CommentVoteState, VoteError> {
        let current = self
            .cached(comment_id)
            .map(|s| s.vote_status)
            .unwrap_or_default();
        let request = VoteRequest {
            comment_id: comment_id.to_string(),
            vote_type: current.after_click(direction),
        };
        debug!(comment_id, from = ?current, to = ?request.vote_type, "casting vote");

        let response = self.endpoint.cast_vote(&request).await?;
        if !response.success {
            warn!(comment_id, "vote rejected by endpoint");
            return Err(VoteError::Endpoint(format!("vote on {} rejected", comment_id)));
        }

        let state = CommentVoteState {
            vote_status: response.vote_type,
            vote_count: response.vote_count,
        };
        self.record(comment_id, state);
        Ok(state)
    }
}
