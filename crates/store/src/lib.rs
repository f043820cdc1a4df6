//! # Store Crate
//!
//! The client's global state container, made explicit.
//!
//! Instead of a process-wide singleton, a [`Store`] is created once per
//! session and handed to every component as an `Arc<Store>`. Tests build
//! their own store and inspect it directly.
//!
//! ## Components
//!
//! - **slice**: `Slice<T>`, a typed get/set/subscribe cell
//! - **keyed**: `KeyedSlice<T>`, an ordered duplicate-free list with
//!   `load` and `remove_by_id` (the Feed Cache and the request inbox)
//!
//! ## Example Usage
//!
//! ```ignore
//! use store::Store;
//! use std::sync::Arc;
//!
//! let store = Arc::new(Store::new());
//! store.feed().load(profiles);
//!
//! let mut changes = store.feed().subscribe();
//! store.feed().remove_by_id("p1");
//! changes.changed().await?;
//! ```

pub mod keyed;
pub mod slice;

pub use keyed::{FeedCache, KeyedSlice, RequestInbox};
pub use slice::Slice;

use model::{CandidateProfile, SessionUser};
use tracing::info;

/// All client-side state for one session.
#[derive(Debug, Default)]
pub struct Store {
    user: Slice<Option<SessionUser>>,
    feed: FeedCache,
    requests: RequestInbox,
    connections: Slice<Vec<CandidateProfile>>,
    /// `None` until premium status has been checked
    premium: Slice<Option<bool>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self) -> &Slice<Option<SessionUser>> {
        &self.user
    }

    pub fn feed(&self) -> &FeedCache {
        &self.feed
    }

    pub fn requests(&self) -> &RequestInbox {
        &self.requests
    }

    pub fn connections(&self) -> &Slice<Vec<CandidateProfile>> {
        &self.connections
    }

    pub fn premium(&self) -> &Slice<Option<bool>> {
        &self.premium
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.read(Option::is_some)
    }

    /// Forget everything tied to the current session (logout)
    pub fn reset(&self) {
        info!("Resetting session state");
        self.user.set(None);
        self.feed.clear();
        self.requests.clear();
        self.connections.set(Vec::new());
        self.premium.set(None);
    }
}
