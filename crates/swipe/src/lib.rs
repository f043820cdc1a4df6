//! Swipe decisions for the DevFinder feed.
//!
//! This crate provides:
//! - Release thresholds and drag visuals (`gesture`)
//! - The `SwipeController` state machine that turns a drag or a button press
//!   into a decision about the head of the feed
//! - Collaborator traits for dispatching decisions, animating the card and
//!   showing notices
//!
//! ## Architecture
//! A decision moves through three stages:
//! 1. `begin` claims the head card and sets the re-entrancy guard
//! 2. `run` awaits the exit animation, then sends the decision
//! 3. `settle` removes the card on success or reverts it on failure
//!
//! ## Example Usage
//! ```ignore
//! use swipe::{SwipeController, NoticeLog};
//!
//! let controller = SwipeController::new(store.clone(), Arc::new(client), Arc::new(NoticeLog::new()));
//!
//! controller.drag_to(150.0);
//! match controller.release(150.0, 0.0).await {
//!     Settlement::Accepted { profile_id, .. } => println!("sent to {profile_id}"),
//!     other => println!("{other:?}"),
//! }
//! ```

pub mod controller;
pub mod gesture;
pub mod notify;
pub mod traits;

// Re-export main types
pub use controller::{
    DEFAULT_DISPATCH_TIMEOUT, PendingDecision, Settlement, SwipeController, SwipeError, SwipePhase,
};
pub use gesture::{DragVisuals, ReleaseOutcome, SwipeThresholds, interpolate};
pub use notify::{Notice, NoticeKind, NoticeLog, Notifier};
pub use traits::{CardAnimator, DecisionDispatch, InstantAnimator, PacedAnimator};
