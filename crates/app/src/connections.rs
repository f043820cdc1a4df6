use crate::context::AppContext;
use api_client::ApiError;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone)]
pub struct ConnectionsFlow {
    ctx: AppContext,
}

impl ConnectionsFlow {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    /// Replace the stored connections with the server's list
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<usize, ApiError> {
        match self.ctx.client.fetch_connections().await {
            Ok(connections) => {
                let count = connections.len();
                self.ctx.store.connections().set(connections);
                info!("Loaded {} connections", count);
                Ok(count)
            }
            Err(e) => {
                warn!("Failed to load connections: {}", e);
                self.ctx.error(
                    "Connection Error",
                    "Failed to load connections. Please try again later.",
                );
                Err(e)
            }
        }
    }
}
