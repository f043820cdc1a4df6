//! Core domain types for the DevFinder client.
//!
//! This module defines the data structures shared by every other crate:
//! - Type aliases for identifiers (ProfileId, RequestId)
//! - CandidateProfile, the unit of the swipe feed
//! - Decision and ReviewStatus, the two binary choices a user makes
//! - ConnectionRequest and SessionUser
//!
//! The server is loose about identifiers (`_id` or `id`) and optional fields
//! (missing, `null`, blank strings, skills as plain strings or `{ "name": ... }`
//! tokens). All of that is resolved once, at deserialization time, so render
//! sites never need fallback chains.

use crate::error::ModelError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Type Aliases
// =============================================================================

/// Opaque server identifier of a user profile (`_id` on the wire)
pub type ProfileId = String;

/// Opaque server identifier of a connection request
pub type RequestId = String;

/// Placeholder shown when a candidate has not written a bio
pub const DEFAULT_ABOUT: &str = "No bio yet.";

/// Display name used when neither first nor last name is known
pub const DEFAULT_DISPLAY_NAME: &str = "Developer";

/// Anything that lives in a keyed list and can be removed by identifier.
pub trait Identified {
    fn id(&self) -> &str;
}

// =============================================================================
// Candidate Profiles
// =============================================================================

/// One person shown in the swipe feed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(remote = "Self")]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    #[serde(rename = "_id")]
    pub id: ProfileId,
    #[serde(default, deserialize_with = "non_blank")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "non_blank")]
    pub last_name: Option<String>,
    /// Always populated; [`DEFAULT_ABOUT`] when the server sent nothing useful
    #[serde(default = "default_about", deserialize_with = "about_or_placeholder")]
    pub about: String,
    /// Skill labels in display order
    #[serde(default, deserialize_with = "skill_labels")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "non_blank")]
    pub photo_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_age")]
    pub age: Option<u8>,
    #[serde(default, deserialize_with = "lenient_gender")]
    pub gender: Option<Gender>,
}

impl CandidateProfile {
    /// Create a bare profile with only an identifier
    pub fn new(id: impl Into<ProfileId>) -> Self {
        Self {
            id: id.into(),
            first_name: None,
            last_name: None,
            about: default_about(),
            skills: Vec::new(),
            photo_url: None,
            age: None,
            gender: None,
        }
    }

    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = Some(first.into()).filter(|s| !s.trim().is_empty());
        self.last_name = Some(last.into()).filter(|s| !s.trim().is_empty());
        self
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    /// "First Last", trimmed, or [`DEFAULT_DISPLAY_NAME`]
    pub fn full_name(&self) -> String {
        display_name(self.first_name.as_deref(), self.last_name.as_deref())
    }

    /// Uppercase initials for avatar placeholders, `?` when unnamed
    pub fn initials(&self) -> String {
        let first = self
            .first_name
            .as_deref()
            .and_then(|s| s.chars().next())
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_else(|| "?".to_string());
        let last = self
            .last_name
            .as_deref()
            .and_then(|s| s.chars().next())
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_default();
        format!("{first}{last}")
    }

    /// The first `limit` skills plus how many were left out
    pub fn skill_badges(&self, limit: usize) -> SkillBadges<'_> {
        let shown = &self.skills[..self.skills.len().min(limit)];
        SkillBadges {
            shown,
            overflow: self.skills.len() - shown.len(),
        }
    }
}

impl Identified for CandidateProfile {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Skills as a card renders them: a few badges and a "+N" counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillBadges<'a> {
    pub shown: &'a [String],
    pub overflow: usize,
}

// =============================================================================
// Decisions
// =============================================================================

/// The user's choice about a candidate profile.
///
/// Interested maps to a rightward swipe, Ignored to a leftward one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Interested,
    Ignored,
}

impl Decision {
    /// Path segment used by `POST /request/status/{decision}/{id}`
    pub fn as_str(self) -> &'static str {
        match self {
            Decision::Interested => "interested",
            Decision::Ignored => "ignored",
        }
    }

    /// +1.0 for rightward, -1.0 for leftward
    pub fn direction(self) -> f32 {
        match self {
            Decision::Interested => 1.0,
            Decision::Ignored => -1.0,
        }
    }

    /// Pick the decision a signed drag quantity points at. Zero counts as rightward.
    pub fn from_direction(signed: f32) -> Self {
        if signed < 0.0 {
            Decision::Ignored
        } else {
            Decision::Interested
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Decision {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "interested" | "connect" | "like" => Ok(Decision::Interested),
            "ignored" | "ignore" | "pass" => Ok(Decision::Ignored),
            _ => Err(ModelError::InvalidValue {
                field: "decision".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// The answer to a connection request someone else sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Accepted,
    Rejected,
}

impl ReviewStatus {
    /// Path segment used by `POST /request/review/{status}/{id}`
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewStatus::Accepted => "accepted",
            ReviewStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Requests and Session
// =============================================================================

/// A pending connection request received by the current user.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(remote = "Self")]
pub struct ConnectionRequest {
    #[serde(rename = "_id")]
    pub id: RequestId,
    /// The sender; absent when the server did not populate the reference
    #[serde(rename = "fromUserId", default, deserialize_with = "populated_profile")]
    pub from_user: Option<CandidateProfile>,
}

impl ConnectionRequest {
    pub fn sender_name(&self) -> String {
        self.from_user
            .as_ref()
            .map(CandidateProfile::full_name)
            .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string())
    }
}

impl Identified for ConnectionRequest {
    fn id(&self) -> &str {
        &self.id
    }
}

/// The logged-in user, as returned by login, signup and `/profile/view`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(remote = "Self")]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(rename = "_id")]
    pub id: ProfileId,
    #[serde(default, deserialize_with = "non_blank")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "non_blank")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "non_blank")]
    pub email_id: Option<String>,
    #[serde(default, deserialize_with = "non_blank")]
    pub photo_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_gender")]
    pub gender: Option<Gender>,
    #[serde(default, deserialize_with = "lenient_age")]
    pub age: Option<u8>,
    #[serde(default, deserialize_with = "non_blank")]
    pub about: Option<String>,
    #[serde(default, deserialize_with = "skill_labels")]
    pub skills: Vec<String>,
}

impl SessionUser {
    pub fn full_name(&self) -> String {
        display_name(self.first_name.as_deref(), self.last_name.as_deref())
    }
}

/// Gender as accepted by the signup and profile forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(ModelError::InvalidValue {
                field: "gender".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

// =============================================================================
// Deserialization helpers
// =============================================================================

fn display_name(first: Option<&str>, last: Option<&str>) -> String {
    let joined = format!("{} {}", first.unwrap_or(""), last.unwrap_or(""));
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        DEFAULT_DISPLAY_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

fn default_about() -> String {
    DEFAULT_ABOUT.to_string()
}

fn non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

fn about_or_placeholder<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(non_blank(deserializer)?.unwrap_or_else(default_about))
}

/// Skills arrive as plain strings, `{ "name": ... }` tokens, or junk.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSkill {
    Label(String),
    Named { name: String },
    Number(f64),
    Other(Value),
}

fn skill_labels<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<RawSkill>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|skill| match skill {
            RawSkill::Label(label) | RawSkill::Named { name: label } => Some(label),
            RawSkill::Number(n) => Some(n.to_string()),
            RawSkill::Other(_) => None,
        })
        .map(|label| label.trim().to_string())
        .filter(|label| !label.is_empty())
        .collect())
}

fn lenient_age<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u8::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse::<u8>().ok(),
        _ => None,
    })
}

fn lenient_gender<'de, D>(deserializer: D) -> Result<Option<Gender>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

fn populated_profile<'de, D>(deserializer: D) -> Result<Option<CandidateProfile>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| serde_json::from_value(value).ok()))
}

/// Buffer a record and settle its identifier: `_id` wins, `id` fills in
/// when `_id` is missing, null or empty.
fn with_resolved_id<'de, D>(deserializer: D) -> Result<Value, D::Error>
where
    D: Deserializer<'de>,
{
    let mut value = Value::deserialize(deserializer)?;
    if let Value::Object(map) = &mut value {
        if let Some(fallback) = map.remove("id") {
            let has_primary = match map.get("_id") {
                None | Some(Value::Null) => false,
                Some(Value::String(s)) => !s.is_empty(),
                Some(_) => true,
            };
            if !has_primary {
                map.insert("_id".to_string(), fallback);
            }
        }
    }
    Ok(value)
}

macro_rules! deserialize_with_resolved_id {
    ($($ty:ty),+ $(,)?) => {$(
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let value = with_resolved_id(deserializer)?;
                <$ty>::deserialize(value).map_err(serde::de::Error::custom)
            }
        }
    )+};
}

deserialize_with_resolved_id!(CandidateProfile, ConnectionRequest, SessionUser);
