//! Client for xAI's Grok chat-completions API.
//!
//! Library crate exposing the client and its supporting modules for use by
//! integration tests and the `grok` / `check-credits` binaries.

pub mod config;
pub mod types;
pub mod error;
pub mod transport;
pub mod client;
pub mod repl;
pub mod logging;

pub use client::GrokClient;
pub use config::ClientConfig;
pub use error::GrokError;
pub use types::{ChatParams, Completion, Message, Role, TokenUsage};
