//! The feedback reply synchronizer.
//!
//! One instance handles all inbound events sequentially. Each pass
//! re-reads configuration from disk, decides whether the order's review
//! needs a reply created, refreshed, or retracted, and records what it
//! did in the per-order state store.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use feedback_completion::ReplyGenerator;
use feedback_models::{
    review_fingerprint, FeedbackEvent, Order, OrderId, PluginConfig, ReviewState,
};
use feedback_persistence::{ConfigStore, ReviewStateStore};

use crate::error::Result;
use crate::host::{OperatorNotifier, OrderStore, ReviewChannel};
use crate::prompt::build_prompt;

/// Why an event pass ended without touching the remote reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Event kind is not one of the feedback kinds.
    NotFeedback,
    /// The event message carried no recognizable order reference.
    MissingOrderId,
    /// The plugin is switched off.
    Disabled,
    /// No API key is configured.
    MissingCredentials,
    /// The order fetch failed or the order is unknown.
    OrderUnavailable,
    /// A retraction was requested for an order with no tracked reply.
    NotTracked,
    /// Review content is unchanged since the last reply.
    UnchangedReview,
    /// The rating is outside the allowed set and no reply is tracked.
    RatingNotAllowed,
}

/// Result of one event pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The event required no remote action.
    Skipped(SkipReason),
    /// A reply was generated and submitted; the state entry was written.
    ReplySubmitted,
    /// The tracked reply was retracted and the state entry removed.
    ReplyDeleted,
    /// A reply was generated but submission failed; no state written.
    SubmissionFailed,
    /// A storage fault aborted the pass.
    Aborted,
}

/// Reacts to feedback events by generating, submitting, and retracting
/// review replies.
#[derive(Clone)]
pub struct FeedbackSynchronizer {
    config: ConfigStore,
    state: ReviewStateStore,
    orders: Arc<dyn OrderStore>,
    replies: Arc<dyn ReviewChannel>,
    notifier: Arc<dyn OperatorNotifier>,
    generator: ReplyGenerator,
}

impl FeedbackSynchronizer {
    /// Wires the synchronizer to its stores and collaborators.
    pub fn new(
        config: ConfigStore,
        state: ReviewStateStore,
        orders: Arc<dyn OrderStore>,
        replies: Arc<dyn ReviewChannel>,
        notifier: Arc<dyn OperatorNotifier>,
        generator: ReplyGenerator,
    ) -> Self {
        Self {
            config,
            state,
            orders,
            replies,
            notifier,
            generator,
        }
    }

    /// Handles one inbound event to completion.
    ///
    /// Collaborator failures are absorbed inside the pass; a storage
    /// fault is reported to the operators and yields
    /// [`SyncOutcome::Aborted`]. This method never panics the event
    /// pipeline.
    pub async fn handle_event(&self, event: &FeedbackEvent) -> SyncOutcome {
        match self.run(event).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(kind = ?event.kind, error = %e, "Feedback pass aborted");
                self.notifier
                    .notify(&format!("❌ GPT Feedback crashed: {e}"))
                    .await;
                SyncOutcome::Aborted
            }
        }
    }

    async fn run(&self, event: &FeedbackEvent) -> Result<SyncOutcome> {
        if !event.kind.is_feedback() {
            debug!(kind = ?event.kind, "Ignoring non-feedback event");
            return Ok(SyncOutcome::Skipped(SkipReason::NotFeedback));
        }

        let Some(order_id) = event.order_id() else {
            warn!(message = %event.message, "No order reference in feedback event");
            return Ok(SyncOutcome::Skipped(SkipReason::MissingOrderId));
        };

        // Read fresh so settings edits apply from the next event on.
        let config = self.config.load()?;
        if !config.enabled {
            debug!(order_id = %order_id, "Plugin disabled");
            return Ok(SyncOutcome::Skipped(SkipReason::Disabled));
        }

        let Some(api_key) = config.api_key().map(str::to_string) else {
            warn!(order_id = %order_id, "No API key configured");
            self.notifier
                .notify("❌ GPT Feedback: no API key configured. Open the settings menu and set one.")
                .await;
            return Ok(SyncOutcome::Skipped(SkipReason::MissingCredentials));
        };

        let order = match self.orders.get_order(&order_id).await {
            Ok(Some(order)) => order,
            Ok(None) => {
                warn!(order_id = %order_id, "Order not found");
                return Ok(SyncOutcome::Skipped(SkipReason::OrderUnavailable));
            }
            Err(e) => {
                warn!(order_id = %order_id, error = %e, "Order fetch failed");
                return Ok(SyncOutcome::Skipped(SkipReason::OrderUnavailable));
            }
        };

        let prior = self.state.get(&order_id)?;

        if event.kind.is_deletion() {
            return self.retract_reply(&order_id, prior).await;
        }

        // A review stripped of all content is a retraction even when
        // the host delivered it as a change event.
        if !order.has_review_content() {
            return self.retract_reply(&order_id, prior).await;
        }

        let stars = order.review.as_ref().and_then(|r| r.stars);
        let text = order.review.as_ref().and_then(|r| r.text.as_deref());
        let fingerprint = review_fingerprint(stars, text);

        if let Some(prior) = &prior {
            if prior.matches(&fingerprint) {
                debug!(order_id = %order_id, "Review content unchanged");
                return Ok(SyncOutcome::Skipped(SkipReason::UnchangedReview));
            }
        }

        let stars = match stars {
            Some(s) if config.allows_stars(s) => s,
            _ => {
                if prior.is_some() {
                    info!(order_id = %order_id, stars = ?stars, "Rating no longer allowed, retracting reply");
                    return self.retract_reply(&order_id, prior).await;
                }
                debug!(order_id = %order_id, stars = ?stars, "Rating not in allowed set");
                return Ok(SyncOutcome::Skipped(SkipReason::RatingNotAllowed));
            }
        };

        self.submit_reply(&order_id, &order, &config, &api_key, stars, fingerprint)
            .await
    }

    /// Shared tail of explicit deletion and disqualification: delete
    /// the remote reply if one is tracked, then drop the local entry.
    async fn retract_reply(
        &self,
        order_id: &OrderId,
        prior: Option<ReviewState>,
    ) -> Result<SyncOutcome> {
        if prior.is_none() {
            debug!(order_id = %order_id, "No tracked reply to retract");
            return Ok(SyncOutcome::Skipped(SkipReason::NotTracked));
        }

        if let Err(e) = self.replies.delete_reply(order_id).await {
            warn!(order_id = %order_id, error = %e, "Reply deletion failed");
            self.notifier
                .notify(&format!(
                    "❌ GPT Feedback: failed to delete the reply for order #{order_id}: {e}"
                ))
                .await;
        }

        // The entry goes even when the remote deletion failed: a stale
        // entry would block a future reply on the same order.
        self.state.remove(order_id)?;
        info!(order_id = %order_id, "Reply retracted");
        Ok(SyncOutcome::ReplyDeleted)
    }

    async fn submit_reply(
        &self,
        order_id: &OrderId,
        order: &Order,
        config: &PluginConfig,
        api_key: &str,
        stars: u8,
        fingerprint: String,
    ) -> Result<SyncOutcome> {
        let prompt = build_prompt(&config.fields, order);
        let reply = self
            .generator
            .generate(&prompt, &config.model, api_key)
            .await;

        if let Err(e) = self.replies.submit_reply(order_id, stars, &reply).await {
            warn!(order_id = %order_id, error = %e, "Reply submission failed");
            self.notifier
                .notify(&format!(
                    "❌ GPT Feedback: failed to submit the reply for order #{order_id}: {e}"
                ))
                .await;
            return Ok(SyncOutcome::SubmissionFailed);
        }

        self.state
            .upsert(order_id.clone(), ReviewState::new(fingerprint, stars))?;
        info!(order_id = %order_id, stars, chars = reply.chars().count(), "Reply submitted");
        Ok(SyncOutcome::ReplySubmitted)
    }
}
