//! The swipe state machine for the card at the head of the feed.
//!
//! ## Lifecycle
//! ```text
//! Idle ──drag_to──▶ Dragging ──release──▶ Idle                (below thresholds)
//!   │                  │
//!   └──press──┬────────┴──release──▶ Deciding ──▶ Exiting ──▶ settle ──▶ Idle
//! ```
//!
//! At most one decision is in flight. The `exiting` flag is claimed by
//! [`SwipeController::begin`] and cleared by [`SwipeController::settle`], or
//! when the [`PendingDecision`] is dropped unsettled (a cancelled `run`).
//! Everything in between (drags, presses, releases) is rejected.
//!
//! The head card is only removed from the feed once the server has
//! acknowledged the decision. A failed decision leaves it where it was.

use crate::gesture::{DragVisuals, ReleaseOutcome, SwipeThresholds};
use crate::notify::{Notice, Notifier};
use crate::traits::{CardAnimator, DecisionDispatch, InstantAnimator};
use api_client::{ApiError, DecisionAck};
use model::{CandidateProfile, Decision, ProfileId};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use store::Store;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Bound on a single decision request
pub const DEFAULT_DISPATCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipePhase {
    Idle,
    Dragging,
    /// A decision has been claimed but the card has not started leaving
    Deciding(Decision),
    /// The exit animation and the request are under way
    Exiting(Decision),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwipeError {
    #[error("A decision is already in flight")]
    InFlight,

    #[error("No profile to decide on")]
    NoActiveCard,

    #[error("Pending decision is no longer current")]
    Stale,
}

/// A claimed decision waiting to be animated and dispatched.
///
/// Obtained from [`SwipeController::begin`]; consumed by `run` or `settle`.
/// Dropping it unsettled puts the card back at rest without a notice.
#[derive(Debug)]
pub struct PendingDecision {
    state: Arc<Mutex<ControllerState>>,
    token: u64,
    profile: CandidateProfile,
    decision: Decision,
}

impl PendingDecision {
    pub fn profile(&self) -> &CandidateProfile {
        &self.profile
    }

    pub fn profile_id(&self) -> &str {
        &self.profile.id
    }

    pub fn decision(&self) -> Decision {
        self.decision
    }
}

impl Drop for PendingDecision {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        if state.exiting && state.token == self.token {
            debug!("Decision for {} abandoned before settling", self.profile.id);
            state.rest();
        }
    }
}

/// How a release, a press or a dispatched decision ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Settlement {
    /// The server recorded the decision and the card left the feed
    Accepted {
        profile_id: ProfileId,
        decision: Decision,
        ack: DecisionAck,
    },
    /// The request failed; the card is back at rest
    Reverted {
        profile_id: ProfileId,
        decision: Decision,
        error: ApiError,
    },
    /// Released below both thresholds
    Cancelled,
    /// Another decision was in flight, or the pending decision was stale
    Rejected,
    /// The feed is empty
    NoActiveCard,
}

impl Settlement {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Settlement::Accepted { .. })
    }
}

#[derive(Debug)]
struct ControllerState {
    phase: SwipePhase,
    offset: f32,
    exiting: bool,
    /// Identifies the decision currently in flight
    token: u64,
}

impl ControllerState {
    fn rest(&mut self) {
        self.phase = SwipePhase::Idle;
        self.offset = 0.0;
        self.exiting = false;
    }
}

/// Drives decisions about the head of the feed.
///
/// ## Usage
/// ```ignore
/// let controller = SwipeController::new(store.clone(), Arc::new(client), notifier)
///     .with_animator(Arc::new(PacedAnimator));
///
/// controller.drag_to(80.0);
/// let settlement = controller.release(150.0, 0.0).await;
/// ```
pub struct SwipeController {
    store: Arc<Store>,
    dispatch: Arc<dyn DecisionDispatch>,
    notifier: Arc<dyn Notifier>,
    animator: Arc<dyn CardAnimator>,
    thresholds: SwipeThresholds,
    dispatch_timeout: Duration,
    state: Arc<Mutex<ControllerState>>,
}

impl SwipeController {
    pub fn new(
        store: Arc<Store>,
        dispatch: Arc<dyn DecisionDispatch>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            dispatch,
            notifier,
            animator: Arc::new(InstantAnimator),
            thresholds: SwipeThresholds::default(),
            dispatch_timeout: DEFAULT_DISPATCH_TIMEOUT,
            state: Arc::new(Mutex::new(ControllerState {
                phase: SwipePhase::Idle,
                offset: 0.0,
                exiting: false,
                token: 0,
            })),
        }
    }

    pub fn with_animator(mut self, animator: Arc<dyn CardAnimator>) -> Self {
        self.animator = animator;
        self
    }

    pub fn with_thresholds(mut self, thresholds: SwipeThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_dispatch_timeout(mut self, timeout: Duration) -> Self {
        self.dispatch_timeout = timeout;
        self
    }

    pub fn thresholds(&self) -> &SwipeThresholds {
        &self.thresholds
    }

    /// The profile decisions apply to: the head of the feed
    pub fn active_card(&self) -> Option<CandidateProfile> {
        self.store.feed().head()
    }

    pub fn phase(&self) -> SwipePhase {
        self.state.lock().phase
    }

    pub fn offset(&self) -> f32 {
        self.state.lock().offset
    }

    pub fn is_exiting(&self) -> bool {
        self.state.lock().exiting
    }

    /// Follow the pointer. Returns the visuals for the new offset, or `None`
    /// when there is no card or a decision is in flight.
    pub fn drag_to(&self, offset: f32) -> Option<DragVisuals> {
        if self.store.feed().is_empty() {
            return None;
        }
        let mut state = self.state.lock();
        if state.exiting {
            return None;
        }
        state.phase = SwipePhase::Dragging;
        state.offset = offset;
        Some(DragVisuals::at(offset))
    }

    /// Visuals for the current offset
    pub fn visuals(&self) -> DragVisuals {
        DragVisuals::at(self.offset())
    }

    /// End a drag. Commits or springs back depending on the thresholds.
    #[instrument(skip(self))]
    pub async fn release(&self, offset: f32, velocity: f32) -> Settlement {
        if self.is_exiting() {
            debug!("Release ignored, decision in flight");
            return Settlement::Rejected;
        }

        match self.thresholds.evaluate_release(offset, velocity) {
            ReleaseOutcome::Commit(decision) => self.commit(decision, Some(offset)).await,
            ReleaseOutcome::Cancel => {
                self.animator.spring_back(offset).await;
                let mut state = self.state.lock();
                if !state.exiting {
                    state.rest();
                }
                Settlement::Cancelled
            }
        }
    }

    /// Button press: commit `decision` without a drag.
    #[instrument(skip(self))]
    pub async fn press(&self, decision: Decision) -> Settlement {
        self.commit(decision, None).await
    }

    async fn commit(&self, decision: Decision, release_offset: Option<f32>) -> Settlement {
        match self.claim(decision, release_offset) {
            Ok(pending) => self.run(pending).await,
            Err(SwipeError::NoActiveCard) => Settlement::NoActiveCard,
            Err(e) => {
                debug!("Decision {} rejected: {}", decision, e);
                Settlement::Rejected
            }
        }
    }

    /// Claim the head card for `decision`.
    ///
    /// Fails with `InFlight` while another decision is unsettled and with
    /// `NoActiveCard` when the feed is empty. No request is made here.
    pub fn begin(&self, decision: Decision) -> Result<PendingDecision, SwipeError> {
        self.claim(decision, None)
    }

    /// `begin`, pinning the card at the release offset once it is claimed
    fn claim(
        &self,
        decision: Decision,
        release_offset: Option<f32>,
    ) -> Result<PendingDecision, SwipeError> {
        let mut state = self.state.lock();
        if state.exiting {
            return Err(SwipeError::InFlight);
        }
        let profile = self.store.feed().head().ok_or(SwipeError::NoActiveCard)?;

        state.exiting = true;
        state.token += 1;
        state.phase = SwipePhase::Deciding(decision);
        if let Some(offset) = release_offset {
            state.offset = offset;
        }
        debug!("Claimed {} for {} (token {})", profile.id, decision, state.token);

        Ok(PendingDecision {
            state: Arc::clone(&self.state),
            token: state.token,
            profile,
            decision,
        })
    }

    /// Animate the card out, send the decision, then settle.
    #[instrument(skip(self, pending), fields(profile = %pending.profile.id, decision = %pending.decision))]
    pub async fn run(&self, pending: PendingDecision) -> Settlement {
        let target = self.thresholds.exit_target(pending.decision);
        {
            let mut state = self.state.lock();
            if !state.exiting || state.token != pending.token {
                warn!("Ignoring stale decision for {}", pending.profile.id);
                return Settlement::Rejected;
            }
            state.phase = SwipePhase::Exiting(pending.decision);
        }

        self.animator
            .exit(target, self.thresholds.exit_duration)
            .await;
        self.state.lock().offset = target;

        let result = match tokio::time::timeout(
            self.dispatch_timeout,
            self.dispatch
                .post_decision(&pending.profile.id, pending.decision),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(ApiError::Timeout(self.dispatch_timeout)),
        };

        self.settle(pending, result)
    }

    /// Apply the outcome of a dispatched decision.
    ///
    /// Success removes the card from the feed; failure puts it back at rest.
    /// Either way exactly one notice is emitted and the controller returns
    /// to `Idle`. A stale `pending` changes nothing.
    pub fn settle(
        &self,
        pending: PendingDecision,
        result: api_client::Result<DecisionAck>,
    ) -> Settlement {
        {
            let mut state = self.state.lock();
            if !state.exiting || state.token != pending.token {
                warn!("Ignoring stale settlement for {}", pending.profile.id);
                return Settlement::Rejected;
            }
            state.rest();
        }

        let profile = pending.profile.clone();
        let decision = pending.decision;
        drop(pending);

        match result {
            Ok(ack) => {
                self.store.feed().remove_by_id(&profile.id);
                info!("{} recorded for {}", decision, profile.id);
                self.notifier.notify(success_notice(decision, &ack));
                Settlement::Accepted {
                    profile_id: profile.id,
                    decision,
                    ack,
                }
            }
            Err(error) => {
                warn!("{} for {} failed: {}", decision, profile.id, error);
                self.notifier.notify(failure_notice(decision, &error));
                Settlement::Reverted {
                    profile_id: profile.id,
                    decision,
                    error,
                }
            }
        }
    }
}

fn success_notice(decision: Decision, ack: &DecisionAck) -> Notice {
    let (title, fallback) = match decision {
        Decision::Interested => ("Request sent", "You're interested! They'll see it soon."),
        Decision::Ignored => ("Passed", "Moving on."),
    };
    let description = ack.message.clone().unwrap_or_else(|| fallback.to_string());
    Notice::success(title, description)
}

fn failure_notice(decision: Decision, error: &ApiError) -> Notice {
    let title = match decision {
        Decision::Interested => "Couldn't send",
        Decision::Ignored => "Couldn't pass",
    };
    Notice::error(title, error.user_message())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{NoticeKind, NoticeLog};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct AlwaysOk {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DecisionDispatch for AlwaysOk {
        async fn post_decision(
            &self,
            _profile_id: &str,
            _decision: Decision,
        ) -> api_client::Result<DecisionAck> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(DecisionAck::default())
        }
    }

    fn setup(ids: &[&str]) -> (Arc<Store>, Arc<AlwaysOk>, Arc<NoticeLog>, SwipeController) {
        let store = Arc::new(Store::new());
        store
            .feed()
            .load(ids.iter().map(|id| CandidateProfile::new(*id)).collect());
        let dispatch = Arc::new(AlwaysOk {
            calls: AtomicUsize::new(0),
        });
        let notices = Arc::new(NoticeLog::new());
        let controller = SwipeController::new(store.clone(), dispatch.clone(), notices.clone());
        (store, dispatch, notices, controller)
    }

    #[test]
    fn test_begin_claims_guard() {
        let (_, dispatch, _, controller) = setup(&["a", "b"]);

        let pending = controller.begin(Decision::Interested).unwrap();
        assert_eq!(pending.profile_id(), "a");
        assert_eq!(controller.phase(), SwipePhase::Deciding(Decision::Interested));
        assert!(controller.is_exiting());

        assert_eq!(
            controller.begin(Decision::Ignored).unwrap_err(),
            SwipeError::InFlight
        );
        assert!(controller.drag_to(40.0).is_none());
        assert_eq!(dispatch.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_begin_on_empty_feed() {
        let (_, _, _, controller) = setup(&[]);
        assert_eq!(
            controller.begin(Decision::Interested).unwrap_err(),
            SwipeError::NoActiveCard
        );
        assert!(!controller.is_exiting());
        assert!(controller.drag_to(10.0).is_none());
    }

    #[test]
    fn test_dropped_pending_releases_guard() {
        let (store, dispatch, notices, controller) = setup(&["a", "b"]);
        controller.drag_to(90.0);

        let pending = controller.begin(Decision::Interested).unwrap();
        drop(pending);

        assert!(!controller.is_exiting());
        assert_eq!(controller.phase(), SwipePhase::Idle);
        assert_eq!(controller.offset(), 0.0);
        assert_eq!(store.feed().ids(), vec!["a", "b"]);
        assert!(notices.is_empty());
        assert_eq!(dispatch.calls.load(Ordering::SeqCst), 0);
        assert!(controller.begin(Decision::Ignored).is_ok());
    }

    #[test]
    fn test_dropping_stale_pending_keeps_current_claim() {
        let (_, _, _, controller) = setup(&["a", "b"]);

        let first = controller.begin(Decision::Interested).unwrap();
        let _ = controller.settle(first, Ok(DecisionAck::default()));
        let current = controller.begin(Decision::Ignored).unwrap();
        drop(PendingDecision {
            state: Arc::clone(&controller.state),
            token: 1,
            profile: CandidateProfile::new("a"),
            decision: Decision::Interested,
        });

        assert!(controller.is_exiting());
        assert_eq!(controller.phase(), SwipePhase::Deciding(Decision::Ignored));
        drop(current);
    }

    #[tokio::test]
    async fn test_release_on_empty_feed_keeps_card_at_rest() {
        let (_, dispatch, _, controller) = setup(&[]);

        let settlement = controller.release(150.0, 0.0).await;

        assert_eq!(settlement, Settlement::NoActiveCard);
        assert_eq!(controller.offset(), 0.0);
        assert_eq!(controller.phase(), SwipePhase::Idle);
        assert_eq!(dispatch.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_settle_failure_reverts() {
        let (store, _, notices, controller) = setup(&["a", "b"]);
        controller.drag_to(-150.0);

        let pending = controller.begin(Decision::Ignored).unwrap();
        let settlement = controller.settle(pending, Err(ApiError::from_response(500, "{}")));

        assert!(matches!(settlement, Settlement::Reverted { .. }));
        assert_eq!(controller.phase(), SwipePhase::Idle);
        assert_eq!(controller.offset(), 0.0);
        assert!(!controller.is_exiting());
        assert_eq!(store.feed().ids(), vec!["a", "b"]);

        let notice = notices.last().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.title, "Couldn't pass");
        assert_eq!(
            notice.description,
            "Something went wrong on our side. Please try again."
        );
    }

    #[test]
    fn test_stale_settlement_is_ignored() {
        let (store, _, notices, controller) = setup(&["a", "b"]);

        let first = controller.begin(Decision::Interested).unwrap();
        let _ = controller.settle(first, Ok(DecisionAck::default()));
        let stale = PendingDecision {
            state: Arc::clone(&controller.state),
            token: 1,
            profile: CandidateProfile::new("b"),
            decision: Decision::Interested,
        };

        assert_eq!(
            controller.settle(stale, Ok(DecisionAck::default())),
            Settlement::Rejected
        );
        assert_eq!(store.feed().ids(), vec!["b"]);
        assert_eq!(notices.len(), 1);
    }

    #[test]
    fn test_success_notice_prefers_server_message() {
        let ack = DecisionAck {
            message: Some("Ada will see your request".to_string()),
            request_id: None,
        };
        let notice = success_notice(Decision::Interested, &ack);
        assert_eq!(notice.title, "Request sent");
        assert_eq!(notice.description, "Ada will see your request");

        let notice = success_notice(Decision::Ignored, &DecisionAck::default());
        assert_eq!(notice.title, "Passed");
        assert_eq!(notice.description, "Moving on.");
    }

    #[tokio::test]
    async fn test_release_below_threshold_springs_back() {
        let (store, dispatch, notices, controller) = setup(&["a"]);
        controller.drag_to(119.0);

        let settlement = controller.release(119.0, 0.0).await;

        assert_eq!(settlement, Settlement::Cancelled);
        assert_eq!(controller.phase(), SwipePhase::Idle);
        assert_eq!(controller.offset(), 0.0);
        assert_eq!(store.feed().len(), 1);
        assert_eq!(dispatch.calls.load(Ordering::SeqCst), 0);
        assert!(notices.is_empty());
    }
}
