//! voice-cr-ws - ConversationRelay WebSocket service
//!
//! Serves a liveness probe at `/health` and a ConversationRelay socket at
//! `/cr` that runs a guided voice intake dialogue and forwards confirmed
//! leads to a backend webhook.

pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod relay;
pub mod routes;
pub mod state;

pub use config::AppConfig;
pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
