use std::future::Future;
use std::sync::Arc;

use axum::{routing::post, Router};
use tokio::net::TcpListener;

use super::handler::{poll_message, push_message, AppState};
use crate::config::{PollConfig, ServerConfig};
use crate::QueueManager;

/// Builds the `/api/{queue}` routes over a shared queue manager.
pub fn create_router(queue_manager: Arc<QueueManager>, poll: PollConfig) -> Router {
    let state = AppState {
        queue_manager,
        poll,
    };

    Router::new()
        .route("/api/{queue}", post(push_message).get(poll_message))
        .with_state(state)
}

/// HTTP front end for the queue manager.
pub struct HttpServer {
    config: ServerConfig,
    queue_manager: Arc<QueueManager>,
}

impl HttpServer {
    pub fn new(config: ServerConfig, queue_manager: Arc<QueueManager>) -> Self {
        Self {
            config,
            queue_manager,
        }
    }

    /// Serves until `shutdown` resolves, then lets in-flight requests finish.
    pub async fn run_until<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.addr();
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!(
            %addr,
            default_timeout_ms = self.config.poll.default_timeout.as_millis() as u64,
            max_timeout_ms = self.config.poll.max_timeout.as_millis() as u64,
            "pollq HTTP server listening"
        );

        let router = create_router(self.queue_manager, self.config.poll);
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}
