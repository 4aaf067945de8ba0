//! Change notification: the same-tab event bus and the cross-tab storage signal.

pub mod bus;
pub mod cross_tab;
pub mod subscription;

pub use bus::EventBus;
pub use cross_tab::{CrossTabSignal, StorageEvent, StorageOrigin, TabStorage};
pub use subscription::Subscription;

/// Event name published after the bookmark collection changes.
pub const BOOKMARK_CHANGED: &str = "bookmarkChanged";
/// Event name published after a comment vote changes.
pub const COMMENT_VOTE_CHANGED: &str = "commentVoteChanged";
/// Event name published after the cookie-consent decision changes.
pub const COOKIE_CONSENT_CHANGED: &str = "cookieConsentChanged";
