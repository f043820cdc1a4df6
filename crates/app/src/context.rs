//! Shared handles every client flow needs.

use crate::router::{Navigator, Route};
use api_client::{ApiClient, ApiError};
use std::sync::Arc;
use store::Store;
use swipe::{Notice, Notifier};

/// Cheap to clone: every field is a shared handle.
#[derive(Clone)]
pub struct AppContext {
    pub client: ApiClient,
    pub store: Arc<Store>,
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
}

impl AppContext {
    pub fn new(
        client: ApiClient,
        store: Arc<Store>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            client,
            store,
            notifier,
            navigator,
        }
    }

    pub(crate) fn success(&self, title: &str, description: impl Into<String>) {
        self.notifier.notify(Notice::success(title, description));
    }

    pub(crate) fn info(&self, title: &str, description: impl Into<String>) {
        self.notifier.notify(Notice::info(title, description));
    }

    pub(crate) fn error(&self, title: &str, description: impl Into<String>) {
        self.notifier.notify(Notice::error(title, description));
    }

    /// Error notice describing `error` the way the user should see it
    pub(crate) fn api_error(&self, title: &str, error: &ApiError) {
        self.error(title, error.user_message());
    }

    pub(crate) fn navigate(&self, route: Route) {
        self.navigator.navigate(route);
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("client", &self.client)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}
