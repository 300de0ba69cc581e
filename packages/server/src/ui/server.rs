//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::{
    handler::{
        add_agent, create_room, delete_room, get_agent_types, get_room_detail, get_rooms,
        get_simulation_status, get_typing_speed, health_check, pause_simulation, remove_agent,
        set_typing_speed, start_simulation, update_room, websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Roundtable HTTP / WebSocket server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(Arc::new(AppState::new(repository, scheduler, events)));
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    app_state: Arc<AppState>,
}

impl Server {
    pub fn new(app_state: Arc<AppState>) -> Self {
        Self { app_state }
    }

    /// All routes with the shared state attached
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/agent-types", get(get_agent_types))
            .route("/api/rooms", get(get_rooms).post(create_room))
            .route(
                "/api/rooms/{room_id}",
                get(get_room_detail).patch(update_room).delete(delete_room),
            )
            .route("/api/rooms/{room_id}/agents", post(add_agent))
            .route("/api/rooms/{room_id}/agents/{agent_id}", delete(remove_agent))
            .route("/api/rooms/{room_id}/simulation", get(get_simulation_status))
            .route("/api/rooms/{room_id}/simulation/start", post(start_simulation))
            .route("/api/rooms/{room_id}/simulation/pause", post(pause_simulation))
            .route(
                "/api/simulation/typing-speed",
                put(set_typing_speed).get(get_typing_speed),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(Arc::clone(&self.app_state))
    }

    /// Run the server until Ctrl+C / SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Roundtable server listening on {}", listener.local_addr()?);
        tracing::info!("Watch a room at: ws://{}/ws?room_id=<id>", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
