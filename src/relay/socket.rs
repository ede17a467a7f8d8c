//! Per-connection relay loop.
//!
//! Each accepted socket gets its own [`Session`]. The loop greets the caller,
//! then answers every inbound text frame with one spoken reply until the peer
//! closes or the connection fails. Socket errors end the session quietly so
//! the relay provider can reconnect.

use axum::extract::ws::{Message, WebSocket};
use futures::SinkExt;
use tracing::Instrument;
use uuid::Uuid;

use super::lead::{LeadNotifier, LeadSubmission};
use super::messages::Speak;
use super::session::{Session, GREETING};
use super::transcript;
use super::RelayError;

/// Drive one relay connection to completion. `request_id` is the ID of the
/// upgrade request, kept on the session span for correlation.
pub async fn run(mut socket: WebSocket, leads: LeadNotifier, request_id: Uuid) {
    let mut session = Session::new();
    let span = tracing::info_span!(
        "session",
        session_id = %session.id(),
        request_id = %request_id,
    );

    async move {
        tracing::info!("Relay session started");

        match converse(&mut socket, &mut session, &leads).await {
            Ok(()) => tracing::info!(step = %session.step(), "Relay session ended"),
            Err(e) => tracing::warn!(
                error = %e,
                step = %session.step(),
                "Relay session aborted"
            ),
        }

        // The peer may already be gone
        if let Err(e) = socket.close().await {
            tracing::debug!(error = %e, "Socket already closed");
        }
    }
    .instrument(span)
    .await
}

async fn converse(
    socket: &mut WebSocket,
    session: &mut Session,
    leads: &LeadNotifier,
) -> Result<(), RelayError> {
    say(socket, GREETING).await?;

    while let Some(message) = socket.recv().await {
        let text = match message? {
            Message::Text(text) => text,
            Message::Binary(bytes) => {
                tracing::debug!(len = bytes.len(), "Ignoring binary frame");
                continue;
            }
            Message::Close(frame) => {
                tracing::debug!(
                    code = frame.as_ref().map(|f| u16::from(f.code)),
                    "Peer closed connection"
                );
                break;
            }
            Message::Ping(_) | Message::Pong(_) => continue,
        };

        let utterance = transcript::from_frame(text.as_str());
        tracing::debug!(
            step = %session.step(),
            heard = utterance.is_some(),
            "Received frame"
        );

        let turn = session.handle(utterance.as_deref());

        if let Some(lead) = turn.confirmed {
            leads.submit(LeadSubmission::new(session.id(), lead));
        }

        say(socket, &turn.reply).await?;
    }

    Ok(())
}

async fn say(socket: &mut WebSocket, text: &str) -> Result<(), RelayError> {
    let frame = Speak::new(text).to_json()?;
    socket.send(Message::Text(frame.into())).await?;
    Ok(())
}
