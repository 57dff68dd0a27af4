//! Per-order review state.
//!
//! One entry exists for an order exactly while the plugin believes a
//! reply it generated is live on that order. The stored fingerprint
//! makes repeated notifications for unchanged review content no-ops.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record of the last review this plugin replied to on one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewState {
    /// Digest of the `(stars, text)` the reply was generated for.
    pub review_fingerprint: String,

    /// Star rating that was replied to.
    pub stars: u8,

    /// When this entry was last written.
    pub updated_at: DateTime<Utc>,
}

impl ReviewState {
    /// Creates an entry stamped with the current time.
    pub fn new(review_fingerprint: impl Into<String>, stars: u8) -> Self {
        Self {
            review_fingerprint: review_fingerprint.into(),
            stars,
            updated_at: Utc::now(),
        }
    }

    /// Returns true when the given fingerprint matches the stored one,
    /// i.e. the review content has not changed since the last reply.
    pub fn matches(&self, fingerprint: &str) -> bool {
        self.review_fingerprint == fingerprint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_compares_fingerprints() {
        let state = ReviewState::new("abc123", 5);
        assert!(state.matches("abc123"));
        assert!(!state.matches("def456"));
    }

    #[test]
    fn serde_round_trip() {
        let state = ReviewState::new("abc123", 4);
        let json = serde_json::to_string(&state).unwrap();
        let back: ReviewState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
