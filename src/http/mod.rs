//! HTTP server module.
//!
//! The relay runs plain HTTP; TLS is expected to be terminated by the
//! hosting platform or a reverse proxy in front of it.
//!
//! The server includes graceful shutdown on SIGTERM/SIGINT, draining open
//! relay sockets before exiting.

mod server;
mod shutdown;

pub use server::{serve, start_server, ServerError};
