//! Session lifecycle: bootstrap, login, signup and logout.

use crate::context::AppContext;
use crate::forms::{FormError, SignupForm};
use crate::router::Route;
use api_client::ApiError;
use model::SessionUser;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone)]
pub struct SessionFlow {
    ctx: AppContext,
}

impl SessionFlow {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    /// Make sure the store knows who is logged in.
    ///
    /// Asks the server only when no user is stored. A 401 sends the user to
    /// the login page; other failures are logged and leave the store as is.
    #[instrument(skip(self))]
    pub async fn bootstrap(&self) -> Option<SessionUser> {
        if let Some(user) = self.ctx.store.user().get() {
            return Some(user);
        }

        match self.ctx.client.view_profile().await {
            Ok(user) => {
                info!("Restored session for {}", user.id);
                self.ctx.store.user().set(Some(user.clone()));
                Some(user)
            }
            Err(e) if e.is_unauthorized() => {
                info!("No active session");
                self.ctx.navigate(Route::Login);
                None
            }
            Err(e) => {
                warn!("Failed to restore session: {}", e);
                None
            }
        }
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email_id: &str, password: &str) -> Result<SessionUser, ApiError> {
        match self.ctx.client.login(email_id.trim(), password).await {
            Ok(session) => {
                info!("Logged in as {}", session.user.id);
                self.ctx.store.user().set(Some(session.user.clone()));
                self.ctx.navigate(Route::Feed);
                Ok(session.user)
            }
            Err(e) => {
                warn!("Login failed: {}", e);
                self.ctx.api_error("Login failed", &e);
                Err(e)
            }
        }
    }

    /// Validate locally, then create the account.
    ///
    /// Local validation failures produce no notice; the field errors are
    /// returned for display next to the form.
    #[instrument(skip(self, form))]
    pub async fn signup(&self, form: &SignupForm) -> Result<SessionUser, FormError> {
        let request = form.validate().map_err(FormError::Invalid)?;

        match self.ctx.client.signup(&request).await {
            Ok(session) => {
                info!("Account created for {}", session.user.id);
                self.ctx.store.user().set(Some(session.user.clone()));
                self.ctx.success(
                    "Account created",
                    session
                        .message
                        .unwrap_or_else(|| "Welcome to DevFinder!".to_string()),
                );
                self.ctx.navigate(Route::Feed);
                Ok(session.user)
            }
            Err(e) => {
                warn!("Signup failed: {}", e);
                self.ctx.api_error("Signup failed", &e);
                Err(FormError::from(e))
            }
        }
    }

    /// End the session. A 401 means it already ended and counts as success.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        match self.ctx.client.logout().await {
            Ok(_) => {}
            Err(e) if e.is_unauthorized() => info!("Session already expired"),
            Err(e) => {
                warn!("Logout failed: {}", e);
                return Err(e);
            }
        }
        self.ctx.store.reset();
        self.ctx.navigate(Route::Login);
        Ok(())
    }
}
