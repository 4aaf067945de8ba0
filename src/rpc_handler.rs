//! RPC method handler for the blogsync JSON-RPC protocol.
//!
//! Kept apart from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_method` dispatches a method call to the managers and services of
//! one [`App`] (one tab).

use serde::Serialize;
use serde_json::{json, Value};

use crate::app::App;
use crate::managers::bookmark_manager::BookmarkManagerTrait;
use crate::services::consent_manager::ConsentManagerTrait;
use crate::services::view_engine;
use crate::services::vote_tracker::{HttpVoteEndpoint, VoteTracker};
use crate::types::bookmark::Post;
use crate::types::consent::ConsentPreferences;
use crate::types::errors::VoteError;
use crate::types::view::ViewQuery;
use crate::types::vote::VoteType;

fn str_param<'a>(params: &'a Value, name: &str) -> Result<&'a str, String> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", name))
}

fn post_param(params: &Value) -> Result<Post, String> {
    let raw = params.get("post").cloned().ok_or("missing post")?;
    serde_json::from_value(raw).map_err(|e| format!("invalid post: {}", e))
}

fn vote_tracker(app: &App) -> Result<&VoteTracker<HttpVoteEndpoint>, String> {
    app.votes.as_ref().ok_or_else(|| VoteError::Unavailable.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| e.to_string())
}

/// Dispatch a JSON-RPC method call.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method(app: &App, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Bookmarks ───
        "bookmark.add" => {
            let post = post_param(params)?;
            let items = app.bookmarks.add(&post);
            Ok(json!({"count": items.len(), "items": to_json(&items)?}))
        }
        "bookmark.remove" => {
            let id = str_param(params, "id")?;
            let items = app.bookmarks.remove(id);
            Ok(json!({"count": items.len(), "items": to_json(&items)?}))
        }
        "bookmark.toggle" => {
            let post = post_param(params)?;
            let bookmarked = app.bookmarks.toggle(&post);
            Ok(json!({"id": post.id, "bookmarked": bookmarked}))
        }
        "bookmark.clear" => {
            app.bookmarks.clear();
            Ok(json!({"ok": true}))
        }
        "bookmark.list" => {
            let items = app.bookmarks.list();
            Ok(json!({"count": items.len(), "items": to_json(&items)?}))
        }
        "bookmark.contains" => {
            let id = str_param(params, "id")?;
            Ok(json!({"id": id, "bookmarked": app.bookmarks.is_member(id)}))
        }
        "bookmark.count" => Ok(json!({"count": app.bookmarks.count()})),
        "bookmark.view" => {
            let query: ViewQuery = match params.get("query") {
                Some(raw) => serde_json::from_value(raw.clone())
                    .map_err(|e| format!("invalid query: {}", e))?,
                None => ViewQuery::default(),
            };
            let view = view_engine::project(&app.bookmarks.list(), &query);
            to_json(&view)
        }
        "bookmark.categories" => to_json(&app.bookmarks.categories()),

        // ─── Cookie consent ───
        "consent.get" => to_json(&app.consent.current()),
        "consent.accept_all" => to_json(&app.consent.accept_all()),
        "consent.reject" => to_json(&app.consent.reject_non_essential()),
        "consent.save" => {
            let raw = params.get("preferences").cloned().ok_or("missing preferences")?;
            let preferences: ConsentPreferences = serde_json::from_value(raw)
                .map_err(|e| format!("invalid preferences: {}", e))?;
            to_json(&app.consent.save(preferences))
        }
        "consent.reset" => {
            app.consent.reset();
            Ok(json!({"ok": true}))
        }

        // ─── Comment votes ───
        "vote.cached" => {
            let votes = vote_tracker(app)?;
            let comment_id = str_param(params, "commentId")?;
            to_json(&votes.cached(comment_id))
        }
        "vote.status" => {
            let votes = vote_tracker(app)?;
            let comment_id = str_param(params, "commentId")?;
            let state = votes.refresh(comment_id).await.map_err(|e| e.to_string())?;
            to_json(&state)
        }
        "vote.cast" => {
            let votes = vote_tracker(app)?;
            let comment_id = str_param(params, "commentId")?;
            let raw = params.get("voteType").cloned().ok_or("missing voteType")?;
            let direction: VoteType = serde_json::from_value(raw)
                .map_err(|e| format!("invalid voteType: {}", e))?;
            let state = votes
                .vote(comment_id, direction)
                .await
                .map_err(|e| e.to_string())?;
            to_json(&state)
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
