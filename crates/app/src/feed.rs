//! Loading the swipe feed into the store.

use crate::context::AppContext;
use api_client::ApiError;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

pub const FEED_ERROR_TITLE: &str = "Feed Error";
pub const FEED_ERROR_MESSAGE: &str = "Failed to load feed. Please try again later.";

#[derive(Debug)]
pub struct FeedLoader {
    ctx: AppContext,
    /// Serializes fetches so concurrent callers share one request
    loading: Mutex<()>,
}

impl FeedLoader {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            loading: Mutex::new(()),
        }
    }

    /// Fetch the feed unless the cache already holds profiles.
    ///
    /// Returns the number of cached profiles.
    #[instrument(skip(self))]
    pub async fn ensure_loaded(&self) -> Result<usize, ApiError> {
        let _loading = self.loading.lock().await;
        let cached = self.ctx.store.feed().len();
        if cached > 0 {
            debug!("Feed already cached ({} profiles)", cached);
            return Ok(cached);
        }
        self.fetch().await
    }

    /// Fetch the feed even when profiles are cached.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<usize, ApiError> {
        let _loading = self.loading.lock().await;
        self.fetch().await
    }

    async fn fetch(&self) -> Result<usize, ApiError> {
        match self.ctx.client.fetch_feed().await {
            Ok(profiles) => {
                let dropped = self.ctx.store.feed().load(profiles);
                if dropped > 0 {
                    warn!("Dropped {} duplicate feed profiles", dropped);
                }
                let loaded = self.ctx.store.feed().len();
                info!("Loaded {} feed profiles", loaded);
                Ok(loaded)
            }
            Err(e) => {
                warn!("Failed to load feed: {}", e);
                self.ctx.error(FEED_ERROR_TITLE, FEED_ERROR_MESSAGE);
                Err(e)
            }
        }
    }
}
