// Blogsync state managers
// Managers own a persisted collection and are its only writer.

pub mod bookmark_manager;
