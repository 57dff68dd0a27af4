//! Completion-API client and reply generation for GPT Feedback.
//!
//! This crate owns everything between a finished prompt and a usable
//! reply string: the HTTP chat-completions client, the retry loop with
//! its quality floor and fixed fallback, and word-boundary truncation
//! to the marketplace's reply-length limit.

pub mod client;
pub mod error;
pub mod generator;
pub mod text;

pub use client::{ChatMessage, ChatRequest, ChatResponse, CompletionBackend, CompletionClient, DEFAULT_BASE_URL};
pub use error::{CompletionError, Result};
pub use generator::{ReplyGenerator, RetryPolicy, FALLBACK_REPLY, MAX_ATTEMPTS, MAX_REPLY_CHARS, MIN_REPLY_CHARS};
pub use text::truncate_at_word;
