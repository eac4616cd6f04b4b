//! Gemini REST provider.
//!
//! Talks to the `generateContent` endpoint of the Gemini API. Every call sends
//! the document inline as base64 together with the prompt; conversation
//! history is sent as role-tagged turns.
//!
//! # Example
//!
//! ```rust,ignore
//! use docflow_assistant::gemini::{GeminiClient, GeminiConfig};
//!
//! let config = GeminiConfig::default().with_api_key("...");
//! let service = GeminiClient::new(config)?.into_service();
//! ```

mod api;
mod client;
mod config;
mod error;

pub use client::GeminiClient;
pub use config::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS, GeminiConfig};
pub use error::{Error, Result};

/// Tracing target for Gemini client operations.
pub const TRACING_TARGET: &str = "docflow_assistant::gemini";
