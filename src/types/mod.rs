// Blogsync shared type definitions
// Each submodule defines types used across the engine.

pub mod bookmark;
pub mod consent;
pub mod errors;
pub mod events;
pub mod view;
pub mod vote;
