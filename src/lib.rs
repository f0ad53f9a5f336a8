// pollq - in-memory multi-queue message broker with HTTP long polling
//
// This library provides the queue engine and its HTTP adapter.
// Binary entry point is in src/main.rs

pub mod config;
pub mod http;
pub mod queue;

pub use config::{PollConfig, ServerConfig};
pub use http::{create_router, HttpServer};
pub use queue::{Message, MessageQueue, QueueManager, QueueStats};
