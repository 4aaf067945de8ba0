// Blogsync services
// Services build on the managers: derived views, live sync, cookie consent, comment votes.

pub mod consent_manager;
pub mod sync_coordinator;
pub mod view_engine;
pub mod vote_tracker;
