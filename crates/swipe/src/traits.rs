//! Collaborator traits the swipe controller drives.
//!
//! The controller never talks to the network or the screen directly; it goes
//! through these seams so tests can substitute counting fakes and the CLI
//! can substitute terminal output.

use api_client::{ApiClient, DecisionAck};
use async_trait::async_trait;
use model::Decision;
use std::time::Duration;

/// Sends a decision about a profile to the server.
///
/// ## Contract
/// - Exactly one request per call, no retries
/// - `Ok` only when the server acknowledged the decision
#[async_trait]
pub trait DecisionDispatch: Send + Sync {
    async fn post_decision(
        &self,
        profile_id: &str,
        decision: Decision,
    ) -> api_client::Result<DecisionAck>;
}

#[async_trait]
impl DecisionDispatch for ApiClient {
    async fn post_decision(
        &self,
        profile_id: &str,
        decision: Decision,
    ) -> api_client::Result<DecisionAck> {
        ApiClient::post_decision(self, profile_id, decision).await
    }
}

/// Moves the active card on screen.
///
/// Both methods resolve when the animation has finished.
#[async_trait]
pub trait CardAnimator: Send + Sync {
    /// Slide the card off screen to `to_offset`
    async fn exit(&self, to_offset: f32, duration: Duration);

    /// Return the card from `from_offset` to the resting position
    async fn spring_back(&self, from_offset: f32);
}

/// Animator for headless use: every animation completes immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantAnimator;

#[async_trait]
impl CardAnimator for InstantAnimator {
    async fn exit(&self, _to_offset: f32, _duration: Duration) {}

    async fn spring_back(&self, _from_offset: f32) {}
}

/// Animator that waits out the exit duration without drawing anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct PacedAnimator;

#[async_trait]
impl CardAnimator for PacedAnimator {
    async fn exit(&self, _to_offset: f32, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    async fn spring_back(&self, _from_offset: f32) {}
}
