//! Stream coordinator error types.
//!
//! Expected absences (no host video, unset screen id, missing transport on a
//! close event) are normal control flow and never reach these types. Errors
//! here are logged at the actor's message loop and the pass is abandoned;
//! the next triggering event runs a fresh pass.

use signal_protocol::{ProducerId, SignalError};
use thiserror::Error;

use crate::transport::TransportError;

/// Stream coordinator error type.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// The signaling channel failed (closed socket, dropped ack).
    #[error("signaling error: {0}")]
    Signal(#[from] SignalError),

    /// A consumer transport operation failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A second transport was offered for a producer that already has one.
    #[error("duplicate transport for producer {0}")]
    DuplicateTransport(ProducerId),

    /// Internal error (actor channel failures and the like).
    #[error("internal error: {0}")]
    Internal(String),
}
