//! Editing the logged-in user's profile.

use crate::context::AppContext;
use crate::forms::{FormError, ProfileForm};
use api_client::{ApiError, ProfileUpdated};
use std::time::Duration;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone)]
pub struct ProfileEditor {
    ctx: AppContext,
    timeout: Duration,
}

impl ProfileEditor {
    pub fn new(ctx: AppContext, timeout: Duration) -> Self {
        Self { ctx, timeout }
    }

    /// A form prefilled from the stored user, if anyone is logged in
    pub fn form(&self) -> Option<ProfileForm> {
        self.ctx.store.user().read(|user| user.as_ref().map(ProfileForm::from_user))
    }

    /// Validate and send only the provided fields.
    ///
    /// The user returned by the server replaces the stored one.
    #[instrument(skip(self, form))]
    pub async fn submit(&self, form: &ProfileForm) -> Result<ProfileUpdated, FormError> {
        let update = form.validate().map_err(FormError::Invalid)?;
        if update.is_empty() {
            return Err(FormError::Empty);
        }

        let result = match tokio::time::timeout(self.timeout, self.ctx.client.edit_profile(&update))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(ApiError::Timeout(self.timeout)),
        };

        match result {
            Ok(updated) => {
                if let Some(user) = &updated.user {
                    info!("Profile updated for {}", user.id);
                    self.ctx.store.user().set(Some(user.clone()));
                }
                self.ctx.success(
                    "Profile Updated",
                    updated
                        .message
                        .clone()
                        .unwrap_or_else(|| "Profile updated successfully!".to_string()),
                );
                Ok(updated)
            }
            Err(e) => {
                warn!("Profile update failed: {}", e);
                self.ctx.api_error("Update Failed", &e);
                Err(FormError::from(e))
            }
        }
    }
}
