//! Local validation for the signup and profile forms.
//!
//! Field errors are keyed by the wire name of the field (`firstName`,
//! `emailId`, ...) so errors reported by the server land on the same keys.

use api_client::{ApiError, ProfileUpdate, SignupRequest};
use model::{Gender, SessionUser};
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Validation messages per form field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Field errors the server attached to a 400/422 response
    pub fn from_api_error(error: &ApiError) -> Option<Self> {
        match error.status() {
            Some(400) | Some(422) => error.field_errors().map(|fields| Self(fields.clone())),
            _ => None,
        }
    }

    fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Why a form submission did not go through
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("Invalid form: {0}")]
    Invalid(FieldErrors),

    /// The server rejected the submission; `fields` carries any per-field errors
    #[error("{source}")]
    Rejected {
        source: ApiError,
        fields: FieldErrors,
    },

    #[error("Nothing to update")]
    Empty,
}

impl From<ApiError> for FormError {
    fn from(source: ApiError) -> Self {
        let fields = FieldErrors::from_api_error(&source).unwrap_or_default();
        FormError::Rejected { source, fields }
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

// =============================================================================
// Signup
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub email_id: String,
    pub password: String,
    pub gender: String,
}

impl SignupForm {
    /// Check every field. On success returns the trimmed request body.
    pub fn validate(&self) -> Result<SignupRequest, FieldErrors> {
        let mut errors = FieldErrors::new();

        let first_name = self.first_name.trim();
        if first_name.is_empty() {
            errors.insert("firstName", "First name is required");
        } else if first_name.chars().count() < 2 {
            errors.insert("firstName", "At least 2 characters");
        }

        let last_name = self.last_name.trim();
        if last_name.is_empty() {
            errors.insert("lastName", "Last name is required");
        }

        let email_id = self.email_id.trim();
        if email_id.is_empty() {
            errors.insert("emailId", "Email is required");
        } else if !is_valid_email(&self.email_id) {
            errors.insert("emailId", "Valid email required");
        }

        if self.password.is_empty() {
            errors.insert("password", "Password is required");
        } else if self.password.chars().count() < 6 {
            errors.insert("password", "At least 6 characters");
        }

        let gender = if self.gender.is_empty() {
            errors.insert("gender", "Gender is required");
            None
        } else {
            match self.gender.parse::<Gender>() {
                Ok(gender) => Some(gender),
                Err(_) => {
                    errors.insert("gender", "Select male, female, or other");
                    None
                }
            }
        };

        match gender {
            Some(gender) if errors.is_empty() => Ok(SignupRequest {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email_id: email_id.to_string(),
                password: self.password.clone(),
                gender,
            }),
            _ => Err(errors),
        }
    }
}

// =============================================================================
// Profile editing
// =============================================================================

/// Editable profile fields as typed by the user.
///
/// Blank fields are left out of the update entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub email_id: String,
    pub photo_url: String,
    pub gender: String,
    pub age: String,
    pub about: String,
    pub skills: Vec<String>,
}

impl ProfileForm {
    /// Prefill the form from the stored user
    pub fn from_user(user: &SessionUser) -> Self {
        Self {
            first_name: user.first_name.clone().unwrap_or_default(),
            last_name: user.last_name.clone().unwrap_or_default(),
            email_id: user.email_id.clone().unwrap_or_default(),
            photo_url: user.photo_url.clone().unwrap_or_default(),
            gender: user.gender.map(|g| g.to_string()).unwrap_or_default(),
            age: user.age.map(|a| a.to_string()).unwrap_or_default(),
            about: user.about.clone().unwrap_or_default(),
            skills: user.skills.clone(),
        }
    }

    /// Add a skill; blanks and duplicates are ignored
    pub fn add_skill(&mut self, skill: &str) -> bool {
        let skill = skill.trim();
        if skill.is_empty() || self.skills.iter().any(|s| s == skill) {
            return false;
        }
        self.skills.push(skill.to_string());
        true
    }

    pub fn remove_skill(&mut self, skill: &str) -> bool {
        let before = self.skills.len();
        self.skills.retain(|s| s != skill);
        self.skills.len() != before
    }

    /// Check the provided fields and build the update payload.
    pub fn validate(&self) -> Result<ProfileUpdate, FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut update = ProfileUpdate::default();

        if let Some(first_name) = provided(&self.first_name) {
            if first_name.chars().count() < 3 {
                errors.insert("firstName", "First name must be at least 3 characters");
            }
            update.first_name = Some(first_name.to_string());
        }

        update.last_name = provided(&self.last_name).map(str::to_string);

        if let Some(email_id) = provided(&self.email_id) {
            if !is_valid_email(&self.email_id) {
                errors.insert("emailId", "Please enter a valid email address");
            }
            update.email_id = Some(email_id.to_string());
        }

        if let Some(photo_url) = provided(&self.photo_url) {
            if url::Url::parse(&self.photo_url).is_err() {
                errors.insert("photoUrl", "Please enter a valid URL");
            }
            update.photo_url = Some(photo_url.to_string());
        }

        if let Some(age) = provided(&self.age) {
            match age.parse::<u8>() {
                Ok(age) if age >= 18 => update.age = Some(age),
                _ => errors.insert("age", "Age must be at least 18"),
            }
        }

        if let Some(gender) = provided(&self.gender) {
            match gender.parse::<Gender>() {
                Ok(gender) => update.gender = Some(gender),
                Err(_) => errors.insert("gender", "Gender must be male, female, or other"),
            }
        }

        update.about = provided(&self.about).map(str::to_string);
        update.skills = self.skills.clone();

        errors.into_result(update)
    }
}

fn provided(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
