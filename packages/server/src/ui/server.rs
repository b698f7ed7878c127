//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    config::HubConfig,
    usecase::{
        ChatHub, GetHubStateUseCase, JoinParticipantUseCase, LeaveParticipantUseCase,
        SendMessageUseCase,
    },
};

use super::{
    handler::{get_hub_state, health_check, leave, send_message, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Chat hub server
///
/// Wires the hub's use cases to HTTP and WebSocket routes.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(Arc::new(ChatHub::new()), HubConfig::default());
/// server.run("127.0.0.1".to_string(), 5678).await?;
/// ```
pub struct Server {
    hub: Arc<ChatHub>,
    hub_config: HubConfig,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `hub` - Shared hub state (clock and connection registry)
    /// * `hub_config` - Per-connection channel settings
    pub fn new(hub: Arc<ChatHub>, hub_config: HubConfig) -> Self {
        Self { hub, hub_config }
    }

    /// Build the router with all routes and shared state
    pub fn router(&self) -> Router {
        let app_state = Arc::new(AppState {
            join_participant_usecase: Arc::new(JoinParticipantUseCase::new(self.hub.clone())),
            send_message_usecase: Arc::new(SendMessageUseCase::new(self.hub.clone())),
            leave_participant_usecase: Arc::new(LeaveParticipantUseCase::new(self.hub.clone())),
            get_hub_state_usecase: Arc::new(GetHubStateUseCase::new(self.hub.clone())),
            hub_config: self.hub_config,
        });

        Router::new()
            // WebSocket エンドポイント（Join ストリーム）
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/participants", get(get_hub_state))
            .route("/api/messages", post(send_message))
            .route("/api/leave", post(leave))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Run the chat hub server until Ctrl+C / SIGTERM
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 5678)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Chat hub listening on {}", listener.local_addr()?);
        tracing::info!("Join at: ws://{}/ws?id=<id>&name=<name>&lamport=0", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already-bound listener until `shutdown` resolves
    ///
    /// Once `shutdown` resolves the hub drops every registered connection,
    /// which ends all open Join streams.
    pub async fn serve<F>(
        self,
        listener: TcpListener,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        let hub = self.hub.clone();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.await;
                hub.shutdown().await;
            })
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
