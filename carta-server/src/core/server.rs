//! Server startup and lifecycle

use crate::core::{Config, ServerState};
use crate::utils::AppError;

/// HTTP server plus the background sync feed.
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state (tests share an in-memory instance).
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> Result<(), AppError> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await,
        };

        // Sync feed runs alongside the HTTP API until shutdown
        let feed_addr = format!("0.0.0.0:{}", self.config.sync_tcp_port);
        let feed_bus = state.sync_bus.clone();
        tokio::spawn(async move {
            if let Err(e) = crate::sync::tcp::serve(&feed_addr, feed_bus).await {
                tracing::error!(error = %e, "Sync TCP feed failed");
            }
        });

        let app = crate::api::create_router(state.clone());
        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("🍽️ Carta server starting on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

        let bus = state.sync_bus.clone();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutting down...");
                bus.shutdown();
            })
            .await
            .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

        Ok(())
    }
}
