//! # Client Orchestrator
//!
//! Wires one client session together:
//! 1. Build the API client from the configuration
//! 2. Create the session store
//! 3. Hand both, with the notifier and navigator, to every flow
//! 4. Build the swipe controller on top of the feed cache
//!
//! `start` and `login` only establish the session. The feed is fetched by
//! whoever shows it (`orchestrator.feed().ensure_loaded()`), then driven
//! through `orchestrator.swipe()`.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use model::SessionUser;
use store::Store;
use swipe::{CardAnimator, Notifier, SwipeController};

use crate::config::ClientConfig;
use crate::connections::ConnectionsFlow;
use crate::context::AppContext;
use crate::feed::FeedLoader;
use crate::premium::PremiumFlow;
use crate::profile::ProfileEditor;
use crate::requests::RequestsFlow;
use crate::router::Navigator;
use crate::session::SessionFlow;

pub struct ClientOrchestrator {
    config: ClientConfig,
    ctx: AppContext,
    session: SessionFlow,
    feed: FeedLoader,
    requests: RequestsFlow,
    connections: ConnectionsFlow,
    profile: ProfileEditor,
    premium: PremiumFlow,
    swipe: SwipeController,
}

impl ClientOrchestrator {
    pub fn new(
        config: ClientConfig,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let client = config
            .build_client()
            .with_context(|| format!("Failed to configure API client for {}", config.base_url))?;
        let store = Arc::new(Store::new());
        let ctx = AppContext::new(client, store, notifier, navigator);

        let swipe = SwipeController::new(
            ctx.store.clone(),
            Arc::new(ctx.client.clone()),
            ctx.notifier.clone(),
        )
        .with_thresholds(config.thresholds)
        .with_dispatch_timeout(config.request_timeout);

        let premium = PremiumFlow::new(ctx.clone())
            .with_checkout_key(config.checkout_key.clone())
            .with_polling(config.premium_poll_interval, config.premium_poll_attempts);

        info!("Client ready for {}", config.base_url);
        Ok(Self {
            session: SessionFlow::new(ctx.clone()),
            feed: FeedLoader::new(ctx.clone()),
            requests: RequestsFlow::new(ctx.clone()),
            connections: ConnectionsFlow::new(ctx.clone()),
            profile: ProfileEditor::new(ctx.clone(), config.profile_timeout),
            premium,
            swipe,
            ctx,
            config,
        })
    }

    /// Replace the card animator (instant by default)
    pub fn with_animator(mut self, animator: Arc<dyn CardAnimator>) -> Self {
        self.swipe = self.swipe.with_animator(animator);
        self
    }

    /// Restore the session. `None` when nobody is logged in.
    pub async fn start(&self) -> Result<Option<SessionUser>> {
        let user = self.session.bootstrap().await;
        if let Some(user) = &user {
            info!("Session restored for {}", user.id);
        }
        Ok(user)
    }

    /// Log in with credentials
    pub async fn login(&self, email_id: &str, password: &str) -> Result<SessionUser> {
        self.session
            .login(email_id, password)
            .await
            .with_context(|| format!("Login failed for {email_id}"))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.ctx.store
    }

    pub fn session(&self) -> &SessionFlow {
        &self.session
    }

    pub fn feed(&self) -> &FeedLoader {
        &self.feed
    }

    pub fn requests(&self) -> &RequestsFlow {
        &self.requests
    }

    pub fn connections(&self) -> &ConnectionsFlow {
        &self.connections
    }

    pub fn profile(&self) -> &ProfileEditor {
        &self.profile
    }

    pub fn premium(&self) -> &PremiumFlow {
        &self.premium
    }

    pub fn swipe(&self) -> &SwipeController {
        &self.swipe
    }
}
