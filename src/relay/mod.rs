//! ConversationRelay socket handling.
//!
//! The relay provider connects to `/cr`, streams the caller's transcribed
//! speech as text frames, and speaks back every `{"type":"text"}` frame it
//! receives. This module turns that stream into a guided intake dialogue:
//!
//! - [`transcript`]: finds the caller's words in an inbound frame
//! - [`text`]: loose matching for roles, yes/no answers and phone numbers
//! - [`session`]: the dialogue state machine
//! - [`messages`]: outbound frame format
//! - [`lead`]: best-effort delivery of confirmed leads to the backend
//! - [`socket`]: the per-connection receive/reply loop

pub mod lead;
pub mod messages;
pub mod session;
pub mod socket;
pub mod text;
pub mod transcript;

pub use lead::LeadNotifier;
pub use session::Session;

/// Errors that end a relay session
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("WebSocket error: {0}")]
    Socket(#[from] axum::Error),

    #[error("Failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),
}
