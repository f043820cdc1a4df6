//! HTTP client for the DevFinder API.
//!
//! This crate is the transport collaborator of the client. It handles:
//! - Session credentials (cookies set by login/signup are replayed on every call)
//! - A bounded timeout on every request (10 seconds by default)
//! - Converting response envelopes into `model` types
//! - Classifying failures into [`ApiError`]
//!
//! It performs no retries; callers decide whether and how a user can try again.

pub mod error;
pub mod payloads;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::{ApiError, Result};
pub use payloads::{
    Ack, DecisionAck, LoginRequest, OrderNotes, PaymentOrder, PaymentOrderRequest,
    ProfileUpdate, ProfileUpdated, SessionResponse, SignupRequest,
};

use model::{
    CandidateProfile, ConnectionRequest, Decision, MembershipPlan, ReviewStatus, SessionUser,
    parser,
};
use reqwest::{Method, Url};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, error, info, instrument};

/// Default bound on every request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the DevFinder REST API.
///
/// Cloning is cheap and clones share the cookie jar, so one login
/// authenticates every clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl ApiClient {
    /// Create a client for `base_url` with the default timeout.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidRequest(format!("base url {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidRequest(format!(
                "base url {base_url} cannot carry paths"
            )));
        }

        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

        info!("API client configured for {} (timeout {:?})", base_url, timeout);
        Ok(Self {
            http,
            base_url,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    // =========================================================================
    // Feed and decisions
    // =========================================================================

    /// `GET /user/feed`
    #[instrument(skip(self))]
    pub async fn fetch_feed(&self) -> Result<Vec<CandidateProfile>> {
        let body = self.execute(Method::GET, &["user", "feed"], None, "feed").await?;
        let feed = parser::parse_list(&body, "feed")?;
        debug!("Fetched {} feed profiles", feed.len());
        Ok(feed)
    }

    /// `POST /request/status/{interested|ignored}/{profile_id}`
    ///
    /// The acknowledgement must be a JSON object; when it carries a `data`
    /// payload that payload must identify the recorded request.
    #[instrument(skip(self))]
    pub async fn post_decision(&self, profile_id: &str, decision: Decision) -> Result<DecisionAck> {
        let empty = json!({});
        let body = self
            .execute(
                Method::POST,
                &["request", "status", decision.as_str(), profile_id],
                Some(&empty),
                "decision acknowledgement",
            )
            .await?;

        if !body.is_object() {
            return Err(ApiError::Malformed(
                "decision acknowledgement is not an object".to_string(),
            ));
        }
        let request_id = match body.get("data") {
            None | Some(Value::Null) => None,
            Some(data) => Some(
                data.get("_id")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| {
                        ApiError::Malformed(
                            "decision acknowledgement is missing the request id".to_string(),
                        )
                    })?,
            ),
        };

        Ok(DecisionAck {
            message: parser::message(&body),
            request_id,
        })
    }

    // =========================================================================
    // Requests and connections
    // =========================================================================

    /// `GET /user/request/recieved` (the path is spelled this way server-side)
    #[instrument(skip(self))]
    pub async fn fetch_requests(&self) -> Result<Vec<ConnectionRequest>> {
        let body = self
            .execute(Method::GET, &["user", "request", "recieved"], None, "requests")
            .await?;
        Ok(parser::parse_list(&body, "requests")?)
    }

    /// `POST /request/review/{accepted|rejected}/{request_id}`
    #[instrument(skip(self))]
    pub async fn review_request(&self, request_id: &str, status: ReviewStatus) -> Result<Ack> {
        let empty = json!({});
        let body = self
            .execute(
                Method::POST,
                &["request", "review", status.as_str(), request_id],
                Some(&empty),
                "review acknowledgement",
            )
            .await?;
        Ok(Ack {
            message: parser::message(&body),
        })
    }

    /// `GET /user/connections`
    #[instrument(skip(self))]
    pub async fn fetch_connections(&self) -> Result<Vec<CandidateProfile>> {
        let body = self
            .execute(Method::GET, &["user", "connections"], None, "connections")
            .await?;
        Ok(parser::parse_list(&body, "connections")?)
    }

    // =========================================================================
    // Session and profile
    // =========================================================================

    /// `POST /login`
    #[instrument(skip(self, password))]
    pub async fn login(&self, email_id: &str, password: &str) -> Result<SessionResponse> {
        let request = LoginRequest {
            email_id: email_id.to_string(),
            password: password.to_string(),
        };
        let body = self
            .execute(Method::POST, &["login"], Some(&to_json(&request)?), "login")
            .await?;
        Ok(SessionResponse {
            user: parser::parse_entity(&body, "session user")?,
            message: parser::message(&body),
        })
    }

    /// `POST /singup` (the path is spelled this way server-side)
    #[instrument(skip(self, request), fields(email = %request.email_id))]
    pub async fn signup(&self, request: &SignupRequest) -> Result<SessionResponse> {
        let body = self
            .execute(Method::POST, &["singup"], Some(&to_json(request)?), "signup")
            .await?;
        Ok(SessionResponse {
            user: parser::parse_entity(&body, "session user")?,
            message: parser::message(&body),
        })
    }

    /// `POST /logout`
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<Ack> {
        let empty = json!({});
        let body = self
            .execute(Method::POST, &["logout"], Some(&empty), "logout")
            .await?;
        Ok(Ack {
            message: parser::message(&body),
        })
    }

    /// `GET /profile/view`
    #[instrument(skip(self))]
    pub async fn view_profile(&self) -> Result<SessionUser> {
        let body = self
            .execute(Method::GET, &["profile", "view"], None, "profile")
            .await?;
        Ok(parser::parse_entity(&body, "profile")?)
    }

    /// `PATCH /profile/edit`
    #[instrument(skip(self, update))]
    pub async fn edit_profile(&self, update: &ProfileUpdate) -> Result<ProfileUpdated> {
        let body = self
            .execute(
                Method::PATCH,
                &["profile", "edit"],
                Some(&to_json(update)?),
                "profile update",
            )
            .await?;
        let user = match body.get("data") {
            Some(data) if data.is_object() => Some(parser::parse_entity(&body, "profile")?),
            _ => None,
        };
        Ok(ProfileUpdated {
            user,
            message: parser::message(&body),
        })
    }

    // =========================================================================
    // Premium
    // =========================================================================

    /// `GET /premium/verify`: 200 means premium, 401 means not premium.
    #[instrument(skip(self))]
    pub async fn verify_premium(&self) -> Result<bool> {
        match self
            .execute(Method::GET, &["premium", "verify"], None, "premium status")
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.is_unauthorized() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// `POST /payment/create`
    #[instrument(skip(self))]
    pub async fn create_payment_order(&self, plan: MembershipPlan) -> Result<PaymentOrder> {
        let request = PaymentOrderRequest {
            amount: plan.amount(),
            membership_type: plan.membership_type().to_string(),
        };
        let body = self
            .execute(
                Method::POST,
                &["payment", "create"],
                Some(&to_json(&request)?),
                "payment order",
            )
            .await?;

        let mut order: PaymentOrder = parser::parse_entity(&body, "payment order")?;
        if order.key_id.is_none() {
            order.key_id = ["keyId", "razorpayKeyId"]
                .iter()
                .find_map(|key| body.get(*key).and_then(Value::as_str))
                .map(str::to_string);
        }
        Ok(order)
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidRequest(format!("base url {} cannot carry paths", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send one request and return the parsed JSON body of a 2xx response.
    async fn execute(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&Value>,
        what: &str,
    ) -> Result<Value> {
        let url = self.endpoint(segments)?;
        debug!("{} {}", method, url);

        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            error!("{} {} failed: {}", method, url, e);
            ApiError::from_reqwest(e, self.timeout)
        })?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::from_reqwest(e, self.timeout))?;

        if !status.is_success() {
            let error = ApiError::from_response(status.as_u16(), &text);
            debug!("{} {} -> {}", method, url, error);
            return Err(error);
        }

        Ok(parser::parse_body(&text, what)?)
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| ApiError::InvalidRequest(e.to_string()))
}
