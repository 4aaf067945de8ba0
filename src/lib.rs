//! Blogsync: local bookmark, comment-vote and cookie-consent sync for a
//! headless-CMS blog frontend.
//!
//! This library crate exposes all modules for use by the RPC binary and integration tests.

pub mod app;
pub mod config;
pub mod database;
pub mod events;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod storage;
pub mod types;
