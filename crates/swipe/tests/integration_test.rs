//! Integration tests for the swipe flow.
//!
//! These drive the controller against a shared store, a counting fake
//! dispatcher and (for the end-to-end cases) a real `ApiClient` talking to
//! the in-process mock server.

use api_client::mock::{MockResponse, MockServer};
use api_client::{ApiClient, ApiError, DecisionAck};
use async_trait::async_trait;
use model::{CandidateProfile, Decision};
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use store::Store;
use swipe::*;

/// Dispatcher that records calls and answers from a script.
struct ScriptedDispatch {
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, Decision)>>,
    delay: Duration,
    fail_with: Option<ApiError>,
}

impl ScriptedDispatch {
    fn ok() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
            fail_with: None,
        }
    }

    fn failing(error: ApiError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::ok()
        }
    }

    fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::ok()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DecisionDispatch for ScriptedDispatch {
    async fn post_decision(
        &self,
        profile_id: &str,
        decision: Decision,
    ) -> api_client::Result<DecisionAck> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().push((profile_id.to_string(), decision));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.fail_with {
            Some(error) => Err(error.clone()),
            None => Ok(DecisionAck::default()),
        }
    }
}

fn feed(ids: &[&str]) -> Arc<Store> {
    let store = Arc::new(Store::new());
    store.feed().load(
        ids.iter()
            .map(|id| CandidateProfile::new(*id).with_name("Dev", *id))
            .collect(),
    );
    store
}

fn controller(
    store: &Arc<Store>,
    dispatch: Arc<dyn DecisionDispatch>,
    notices: &Arc<NoticeLog>,
) -> SwipeController {
    SwipeController::new(store.clone(), dispatch, notices.clone())
}

#[test]
fn test_remove_twice_equals_remove_once() {
    let store = feed(&["a", "b", "c"]);

    assert!(store.feed().remove_by_id("b"));
    let after_first = store.feed().snapshot();
    assert!(!store.feed().remove_by_id("b"));

    assert_eq!(store.feed().snapshot(), after_first);
    assert_eq!(store.feed().ids(), vec!["a", "c"]);
}

#[tokio::test]
async fn test_second_press_while_in_flight_is_rejected() {
    let store = feed(&["a", "b"]);
    let dispatch = Arc::new(ScriptedDispatch::slow(Duration::from_millis(50)));
    let notices = Arc::new(NoticeLog::new());
    let controller = controller(&store, dispatch.clone(), &notices);

    let (first, second) = tokio::join!(
        controller.press(Decision::Interested),
        controller.press(Decision::Interested)
    );

    assert!(first.is_accepted());
    assert_eq!(second, Settlement::Rejected);
    assert_eq!(dispatch.calls(), 1);
    assert_eq!(store.feed().ids(), vec!["b"]);
    assert_eq!(notices.len(), 1);
}

#[tokio::test]
async fn test_drag_and_release_ignored_while_deciding() {
    let store = feed(&["a", "b"]);
    let dispatch = Arc::new(ScriptedDispatch::ok());
    let notices = Arc::new(NoticeLog::new());
    let controller = controller(&store, dispatch.clone(), &notices);

    let pending = controller.begin(Decision::Ignored).unwrap();

    assert!(controller.drag_to(300.0).is_none());
    assert_eq!(controller.release(300.0, 0.0).await, Settlement::Rejected);
    assert_eq!(controller.press(Decision::Interested).await, Settlement::Rejected);
    assert_eq!(dispatch.calls(), 0);

    let settlement = controller.run(pending).await;
    assert!(settlement.is_accepted());
    assert_eq!(dispatch.calls(), 1);
    assert_eq!(dispatch.seen.lock().clone(), vec![("a".to_string(), Decision::Ignored)]);
}

#[tokio::test]
async fn test_threshold_boundaries() {
    let store = feed(&["a", "b", "c"]);
    let dispatch = Arc::new(ScriptedDispatch::ok());
    let notices = Arc::new(NoticeLog::new());
    let controller = controller(&store, dispatch.clone(), &notices);

    controller.drag_to(119.0);
    assert_eq!(controller.release(119.0, 0.0).await, Settlement::Cancelled);
    assert_eq!(dispatch.calls(), 0);
    assert_eq!(controller.offset(), 0.0);

    controller.drag_to(121.0);
    let settlement = controller.release(121.0, 0.0).await;
    assert!(matches!(
        settlement,
        Settlement::Accepted {
            decision: Decision::Interested,
            ..
        }
    ));

    controller.drag_to(-121.0);
    let settlement = controller.release(-121.0, 0.0).await;
    assert!(matches!(
        settlement,
        Settlement::Accepted {
            decision: Decision::Ignored,
            ..
        }
    ));

    assert_eq!(dispatch.calls(), 2);
    assert_eq!(store.feed().ids(), vec!["c"]);
}

#[tokio::test]
async fn test_fast_flick_commits_in_velocity_direction() {
    let store = feed(&["a"]);
    let dispatch = Arc::new(ScriptedDispatch::ok());
    let notices = Arc::new(NoticeLog::new());
    let controller = controller(&store, dispatch.clone(), &notices);

    let settlement = controller.release(40.0, -650.0).await;

    assert!(matches!(
        settlement,
        Settlement::Accepted {
            decision: Decision::Ignored,
            ..
        }
    ));
}

#[tokio::test]
async fn test_failure_reverts_card() {
    let store = feed(&["a", "b"]);
    let dispatch = Arc::new(ScriptedDispatch::failing(ApiError::Transport(
        "connection refused".to_string(),
    )));
    let notices = Arc::new(NoticeLog::new());
    let controller = controller(&store, dispatch.clone(), &notices);

    controller.drag_to(-200.0);
    let settlement = controller.release(-200.0, 0.0).await;

    assert!(matches!(settlement, Settlement::Reverted { .. }));
    assert_eq!(controller.offset(), 0.0);
    assert_eq!(controller.phase(), SwipePhase::Idle);
    assert_eq!(store.feed().ids(), vec!["a", "b"]);
    assert_eq!(controller.active_card().map(|p| p.id), Some("a".to_string()));

    let notice = notices.last().unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(notice.description, "Check your connection and try again.");
}

#[tokio::test]
async fn test_success_promotes_next_card() {
    let store = feed(&["P123", "P456"]);
    let dispatch = Arc::new(ScriptedDispatch::ok());
    let notices = Arc::new(NoticeLog::new());
    let controller = controller(&store, dispatch.clone(), &notices);

    let settlement = controller.press(Decision::Interested).await;

    assert!(settlement.is_accepted());
    assert!(!store.feed().contains("P123"));
    assert_eq!(controller.active_card().map(|p| p.id), Some("P456".to_string()));
    assert_eq!(controller.phase(), SwipePhase::Idle);
}

/// Records how many decisions had been dispatched when each exit started.
struct RecordingAnimator {
    dispatch: Arc<ScriptedDispatch>,
    exits: Mutex<Vec<(f32, usize)>>,
}

#[async_trait]
impl CardAnimator for RecordingAnimator {
    async fn exit(&self, to_offset: f32, _duration: Duration) {
        self.exits.lock().push((to_offset, self.dispatch.calls()));
    }

    async fn spring_back(&self, _from_offset: f32) {}
}

#[tokio::test]
async fn test_exit_animation_runs_before_dispatch() {
    let store = feed(&["a", "b"]);
    let dispatch = Arc::new(ScriptedDispatch::ok());
    let notices = Arc::new(NoticeLog::new());
    let animator = Arc::new(RecordingAnimator {
        dispatch: dispatch.clone(),
        exits: Mutex::new(Vec::new()),
    });
    let controller = controller(&store, dispatch.clone(), &notices).with_animator(animator.clone());

    controller.press(Decision::Ignored).await;

    assert_eq!(*animator.exits.lock(), vec![(-500.0, 0)]);
    assert_eq!(dispatch.calls(), 1);
}

#[tokio::test]
async fn test_slow_dispatch_times_out_and_reverts() {
    let store = feed(&["a"]);
    let dispatch = Arc::new(ScriptedDispatch::slow(Duration::from_secs(5)));
    let notices = Arc::new(NoticeLog::new());
    let controller = controller(&store, dispatch.clone(), &notices)
        .with_dispatch_timeout(Duration::from_millis(50));

    let settlement = controller.press(Decision::Interested).await;

    match settlement {
        Settlement::Reverted { error, .. } => assert!(error.is_transport()),
        other => panic!("expected reverted, got {:?}", other),
    }
    assert!(store.feed().contains("a"));
    assert!(!controller.is_exiting());
    assert_eq!(notices.count(NoticeKind::Error), 1);
}

#[tokio::test]
async fn test_empty_feed_has_no_active_card() {
    let store = feed(&[]);
    let dispatch = Arc::new(ScriptedDispatch::ok());
    let notices = Arc::new(NoticeLog::new());
    let controller = controller(&store, dispatch.clone(), &notices);

    assert_eq!(
        controller.press(Decision::Interested).await,
        Settlement::NoActiveCard
    );
    assert_eq!(dispatch.calls(), 0);
}

#[tokio::test]
async fn test_end_to_end_drag_success() {
    let server = MockServer::builder()
        .route(
            "POST",
            "/request/status/interested/A",
            MockResponse::json(200, json!({"message": "Connection request sent", "data": {"_id": "r1"}})),
        )
        .start()
        .await;
    let client = Arc::new(ApiClient::new(&server.url()).unwrap());
    let store = feed(&["A", "B", "C"]);
    let notices = Arc::new(NoticeLog::new());
    let controller = controller(&store, client, &notices);

    controller.drag_to(150.0);
    let settlement = controller.release(150.0, 0.0).await;

    assert!(settlement.is_accepted());
    assert_eq!(store.feed().ids(), vec!["B", "C"]);
    assert_eq!(controller.active_card().map(|p| p.id), Some("B".to_string()));
    assert_eq!(server.hits("POST", "/request/status/interested/A"), 1);

    let all = notices.notices();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].kind, NoticeKind::Success);
    assert_eq!(all[0].title, "Request sent");
    assert_eq!(all[0].description, "Connection request sent");
}

#[tokio::test]
async fn test_end_to_end_pass_failure() {
    let server = MockServer::builder()
        .route(
            "POST",
            "/request/status/ignored/A",
            MockResponse::json(500, json!({"message": "Internal error"})),
        )
        .start()
        .await;
    let client = Arc::new(ApiClient::new(&server.url()).unwrap());
    let store = feed(&["A", "B"]);
    let notices = Arc::new(NoticeLog::new());
    let controller = controller(&store, client, &notices);

    let settlement = controller.press(Decision::Ignored).await;

    assert!(matches!(settlement, Settlement::Reverted { .. }));
    assert_eq!(store.feed().ids(), vec!["A", "B"]);
    assert_eq!(controller.active_card().map(|p| p.id), Some("A".to_string()));
    assert_eq!(controller.offset(), 0.0);

    let all = notices.notices();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].kind, NoticeKind::Error);
    assert_eq!(all[0].title, "Couldn't pass");
    assert_eq!(all[0].description, "Internal error");
}

#[tokio::test]
async fn test_cancelled_press_releases_card() {
    let store = feed(&["a", "b"]);
    let dispatch = Arc::new(ScriptedDispatch::slow(Duration::from_secs(5)));
    let notices = Arc::new(NoticeLog::new());
    let controller = controller(&store, dispatch.clone(), &notices);

    let outcome =
        tokio::time::timeout(Duration::from_millis(20), controller.press(Decision::Interested))
            .await;

    assert!(outcome.is_err());
    assert_eq!(dispatch.calls(), 1);
    assert!(!controller.is_exiting());
    assert_eq!(controller.phase(), SwipePhase::Idle);
    assert_eq!(controller.offset(), 0.0);
    assert_eq!(store.feed().ids(), vec!["a", "b"]);
    assert!(notices.is_empty());
    assert!(controller.drag_to(40.0).is_some());
    assert!(controller.begin(Decision::Ignored).is_ok());
}

#[tokio::test]
async fn test_failed_card_can_be_swiped_again() {
    let server = MockServer::builder()
        .route_times(
            "POST",
            "/request/status/interested/A",
            1,
            MockResponse::json(500, json!({"message": "Internal error"})),
        )
        .route(
            "POST",
            "/request/status/interested/A",
            MockResponse::json(200, json!({"message": "Connection request sent", "data": {"_id": "r1"}})),
        )
        .start()
        .await;
    let client = Arc::new(ApiClient::new(&server.url()).unwrap());
    let store = feed(&["A", "B"]);
    let notices = Arc::new(NoticeLog::new());
    let controller = controller(&store, client, &notices);

    controller.drag_to(150.0);
    let first = controller.release(150.0, 0.0).await;
    assert!(matches!(first, Settlement::Reverted { .. }));
    assert_eq!(controller.phase(), SwipePhase::Idle);
    assert_eq!(store.feed().ids(), vec!["A", "B"]);

    controller.drag_to(150.0);
    let second = controller.release(150.0, 0.0).await;

    assert!(second.is_accepted());
    assert_eq!(store.feed().ids(), vec!["B"]);
    assert_eq!(server.hits("POST", "/request/status/interested/A"), 2);
    assert_eq!(notices.count(NoticeKind::Error), 1);
    assert_eq!(notices.count(NoticeKind::Success), 1);
}

#[tokio::test]
async fn test_ack_without_identifier_reverts_card() {
    let server = MockServer::builder()
        .route(
            "POST",
            "/request/status/interested/A",
            MockResponse::json(200, json!({"data": {"status": "interested"}})),
        )
        .start()
        .await;
    let client = Arc::new(ApiClient::new(&server.url()).unwrap());
    let store = feed(&["A", "B"]);
    let notices = Arc::new(NoticeLog::new());
    let controller = controller(&store, client, &notices);

    controller.drag_to(150.0);
    let settlement = controller.release(150.0, 0.0).await;

    match settlement {
        Settlement::Reverted { error, .. } => {
            assert!(matches!(error, ApiError::Malformed(_)))
        }
        other => panic!("expected reverted, got {:?}", other),
    }
    assert_eq!(store.feed().ids(), vec!["A", "B"]);
    assert_eq!(controller.offset(), 0.0);
    assert_eq!(controller.phase(), SwipePhase::Idle);
    assert_eq!(notices.count(NoticeKind::Error), 1);
    assert_eq!(server.hits("POST", "/request/status/interested/A"), 1);
}
