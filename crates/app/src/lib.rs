//! Client flows for DevFinder.
//!
//! This crate contains the orchestrator that wires the API client, the
//! session store and the swipe controller together, plus the flows around
//! the feed: session, requests inbox, connections, profile editing, premium
//! and routing.

pub mod config;
pub mod connections;
pub mod context;
pub mod feed;
pub mod forms;
pub mod orchestrator;
pub mod premium;
pub mod profile;
pub mod requests;
pub mod router;
pub mod session;

pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use connections::ConnectionsFlow;
pub use context::AppContext;
pub use feed::FeedLoader;
pub use forms::{FieldErrors, FormError, ProfileForm, SignupForm};
pub use orchestrator::ClientOrchestrator;
pub use premium::{
    CheckoutOptions, CheckoutOutcome, CheckoutPrefill, CheckoutWidget, PremiumFlow,
    PurchaseOutcome,
};
pub use profile::ProfileEditor;
pub use requests::{RequestsFlow, ReviewError};
pub use router::{NavigationLog, Navigator, Route, RouteMeta, meta_for_path};
pub use session::SessionFlow;
