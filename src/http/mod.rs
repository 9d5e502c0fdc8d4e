//! HTTP API server for external control (counter UI, shortcuts)
//!
//! This module provides a REST API for controlling the listener:
//! - POST /listen/start - Begin continuous listening
//! - POST /listen/stop - Stop listening
//! - GET /listen/status - Query supervisor state
//! - GET /phrases, POST /phrases, DELETE /phrases/:text - Phrase maintenance
//! - POST /counts/reset - Zero all counters
//! - GET /languages - Supported recognition languages
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
