//! # Model Crate
//!
//! Domain types shared by every part of the DevFinder client.
//!
//! ## Main Components
//!
//! - **types**: CandidateProfile, Decision, ConnectionRequest, SessionUser
//! - **plans**: Premium membership plans and their prices
//! - **parser**: Turn API response envelopes into domain types
//! - **error**: Error types for malformed or invalid data
//!
//! ## Example Usage
//!
//! ```ignore
//! use model::{parser, CandidateProfile};
//!
//! let body: serde_json::Value = serde_json::from_str(text)?;
//! let feed: Vec<CandidateProfile> = parser::parse_list(&body, "feed")?;
//!
//! for profile in &feed {
//!     println!("{} - {}", profile.full_name(), profile.about);
//! }
//! ```

// Public modules
pub mod error;
pub mod parser;
pub mod plans;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{ModelError, Result};
pub use plans::MembershipPlan;
pub use types::{
    // Type aliases
    ProfileId,
    RequestId,
    // Core types
    CandidateProfile,
    ConnectionRequest,
    SessionUser,
    SkillBadges,
    // Enums
    Decision,
    Gender,
    ReviewStatus,
    // Traits
    Identified,
    // Constants
    DEFAULT_ABOUT,
    DEFAULT_DISPLAY_NAME,
};
