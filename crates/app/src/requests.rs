//! The received connection requests inbox.
//!
//! Each request can be accepted or rejected once. While a review is in
//! flight the same request id cannot be reviewed again; other requests are
//! unaffected.

use crate::context::AppContext;
use api_client::{Ack, ApiError};
use model::{RequestId, ReviewStatus};
use parking_lot::Mutex;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{info, instrument, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReviewError {
    #[error("Request {0} is already being reviewed")]
    InProgress(RequestId),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug)]
pub struct RequestsFlow {
    ctx: AppContext,
    processing: Mutex<HashSet<RequestId>>,
}

/// Releases a processing slot when the review finishes, however it ends
struct ProcessingGuard<'a> {
    processing: &'a Mutex<HashSet<RequestId>>,
    id: RequestId,
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.processing.lock().remove(&self.id);
    }
}

impl RequestsFlow {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            processing: Mutex::new(HashSet::new()),
        }
    }

    /// Replace the inbox with the server's list
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<usize, ApiError> {
        match self.ctx.client.fetch_requests().await {
            Ok(requests) => {
                self.ctx.store.requests().load(requests);
                let count = self.ctx.store.requests().len();
                info!("Loaded {} connection requests", count);
                Ok(count)
            }
            Err(e) => {
                warn!("Failed to load requests: {}", e);
                self.ctx.error("Couldn't load requests", "Please try again later.");
                Err(e)
            }
        }
    }

    pub fn is_processing(&self, id: &str) -> bool {
        self.processing.lock().contains(id)
    }

    pub async fn accept(&self, id: &str) -> Result<Ack, ReviewError> {
        self.review(id, ReviewStatus::Accepted).await
    }

    pub async fn reject(&self, id: &str) -> Result<Ack, ReviewError> {
        self.review(id, ReviewStatus::Rejected).await
    }

    #[instrument(skip(self))]
    async fn review(&self, id: &str, status: ReviewStatus) -> Result<Ack, ReviewError> {
        let _guard = self.claim(id)?;

        match self.ctx.client.review_request(id, status).await {
            Ok(ack) => {
                self.ctx.store.requests().remove_by_id(id);
                info!("Request {} {}", id, status);
                match status {
                    ReviewStatus::Accepted => self.ctx.success(
                        "Accepted",
                        ack.message
                            .clone()
                            .unwrap_or_else(|| "You're now connected!".to_string()),
                    ),
                    ReviewStatus::Rejected => self.ctx.success("Rejected", "Request declined."),
                }
                Ok(ack)
            }
            Err(e) => {
                warn!("Reviewing request {} failed: {}", id, e);
                let title = match status {
                    ReviewStatus::Accepted => "Couldn't accept",
                    ReviewStatus::Rejected => "Couldn't reject",
                };
                self.ctx.api_error(title, &e);
                Err(ReviewError::Api(e))
            }
        }
    }

    fn claim(&self, id: &str) -> Result<ProcessingGuard<'_>, ReviewError> {
        if !self.processing.lock().insert(id.to_string()) {
            warn!("Request {} is already being reviewed", id);
            return Err(ReviewError::InProgress(id.to_string()));
        }
        Ok(ProcessingGuard {
            processing: &self.processing,
            id: id.to_string(),
        })
    }
}
