//! WebSocket upgrade for the ConversationRelay socket.

use axum::{
    extract::{ws::WebSocketUpgrade, State},
    response::Response,
    Extension,
};

use crate::middleware::RequestId;
use crate::relay::socket;
use crate::state::AppState;

/// Accept the upgrade and hand the socket to a new relay session.
pub async fn upgrade(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Extension(RequestId(request_id)): Extension<RequestId>,
) -> Response {
    let leads = state.leads.clone();
    ws.max_message_size(state.config.relay.max_message_bytes)
        .on_failed_upgrade(|e| tracing::warn!(error = %e, "WebSocket upgrade failed"))
        .on_upgrade(move |ws| socket::run(ws, leads, request_id))
}
