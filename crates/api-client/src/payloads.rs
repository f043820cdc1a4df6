//! Request and response bodies that are specific to one endpoint.
//!
//! Shared domain types (profiles, users, requests) live in the `model`
//! crate; the types here only describe what goes over the wire.

use model::{Gender, SessionUser};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email_id: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email_id: String,
    pub password: String,
    pub gender: Gender,
}

/// Partial profile update: only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self == &ProfileUpdate::default()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOrderRequest {
    pub amount: u64,
    pub membership_type: String,
}

/// Order created by `POST /payment/create`, before the checkout opens.
///
/// Every field is optional on the wire; the premium flow decides what is
/// required.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOrder {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub amount: Option<u64>,
    #[serde(default)]
    pub currency: Option<String>,
    /// Checkout key; also looked up on the outer envelope
    #[serde(default, alias = "razorpayKeyId")]
    pub key_id: Option<String>,
    #[serde(default)]
    pub notes: OrderNotes,
}

/// Customer details echoed back with the order, used to prefill checkout
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderNotes {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email_id: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// Generic acknowledgement carrying an optional message
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ack {
    pub message: Option<String>,
}

/// Acknowledgement of `POST /request/status/{decision}/{id}`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecisionAck {
    pub message: Option<String>,
    /// Identifier of the connection request the server recorded
    pub request_id: Option<String>,
}

/// Result of login or signup
#[derive(Debug, Clone, PartialEq)]
pub struct SessionResponse {
    pub user: SessionUser,
    pub message: Option<String>,
}

/// Result of `PATCH /profile/edit`
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdated {
    pub user: Option<SessionUser>,
    pub message: Option<String>,
}
