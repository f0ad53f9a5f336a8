//! HTTP adapter: `POST /api/{queue}` submits, `GET /api/{queue}` long-polls.

pub mod handler;
pub mod server;
pub mod utils;

pub use handler::{AppState, PushResponse};
pub use server::{create_router, HttpServer};
