//! Retrying reply generation with a fixed fallback.
//!
//! Generation is never allowed to fail the caller: transport errors and
//! too-short responses burn an attempt, and an exhausted budget yields
//! the fixed fallback text instead of an error.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::client::CompletionBackend;
use crate::text::truncate_at_word;

/// Reply used when every generation attempt fails.
pub const FALLBACK_REPLY: &str = "Thank you for the review!";

/// Default number of generation attempts.
pub const MAX_ATTEMPTS: u32 = 3;

/// Replies shorter than this are discarded as low-quality.
pub const MIN_REPLY_CHARS: usize = 30;

/// Hard ceiling on reply length, as enforced by the marketplace.
pub const MAX_REPLY_CHARS: usize = 700;

/// Pause after a failed request before the next attempt.
const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// Knobs for the generation loop.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// How many attempts before giving up.
    pub attempts: u32,

    /// Minimum acceptable reply length in characters.
    pub min_chars: usize,

    /// Maximum reply length in characters.
    pub max_chars: usize,

    /// Sleep between attempts after a request failure. Too-short
    /// replies retry immediately.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: MAX_ATTEMPTS,
            min_chars: MIN_REPLY_CHARS,
            max_chars: MAX_REPLY_CHARS,
            backoff: RETRY_BACKOFF,
        }
    }
}

/// Generates review replies over a completion backend.
#[derive(Clone)]
pub struct ReplyGenerator {
    backend: Arc<dyn CompletionBackend>,
    policy: RetryPolicy,
}

impl ReplyGenerator {
    /// Creates a generator with the default retry policy.
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self::with_policy(backend, RetryPolicy::default())
    }

    /// Creates a generator with a custom retry policy.
    pub fn with_policy(backend: Arc<dyn CompletionBackend>, policy: RetryPolicy) -> Self {
        Self { backend, policy }
    }

    /// The configured reply-length ceiling.
    pub fn max_chars(&self) -> usize {
        self.policy.max_chars
    }

    /// Generates a reply for the prompt.
    ///
    /// Always returns usable text: a trimmed, truncated completion, or
    /// [`FALLBACK_REPLY`] once the attempt budget is exhausted.
    pub async fn generate(&self, prompt: &str, model: &str, api_key: &str) -> String {
        for attempt in 1..=self.policy.attempts {
            match self.backend.complete(prompt, model, api_key).await {
                Ok(content) => {
                    let content = content.trim();
                    let length = content.chars().count();
                    if length < self.policy.min_chars {
                        warn!(attempt, length, "Completion too short, retrying");
                        continue;
                    }
                    return truncate_at_word(content, self.policy.max_chars);
                }
                Err(e) => {
                    warn!(attempt, error = %e, "Completion request failed");
                    if attempt < self.policy.attempts {
                        tokio::time::sleep(self.policy.backoff).await;
                    }
                }
            }
        }

        warn!("Generation attempts exhausted, using fallback reply");
        FALLBACK_REPLY.to_string()
    }
}
