//! Typed channel seam between the coordinator and the socket writer.
//!
//! The coordinator never touches the socket directly. It holds a
//! [`SignalingHandle`] and sends [`SignalRequest`]s; the socket-facing
//! endpoint drains the receiver, serializes the embedded
//! [`ClientCommand`](crate::commands::ClientCommand)s, and (for resume)
//! routes the server acknowledgment back through the `respond_to` oneshot.

use crate::commands::{ConsumerPause, ConsumerResume, ResumeAck};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

/// Default buffer size for the signaling request channel.
pub const SIGNAL_CHANNEL_BUFFER: usize = 64;

/// Errors surfaced by [`SignalingHandle`] operations.
#[derive(Debug, Error)]
pub enum SignalError {
    /// The socket endpoint has shut down and dropped the receiver.
    #[error("signaling channel closed")]
    ChannelClosed,

    /// The resume acknowledgment never arrived (endpoint dropped the reply).
    #[error("resume acknowledgment dropped")]
    AckDropped,
}

/// A request queued for the signaling socket.
#[derive(Debug)]
pub enum SignalRequest {
    /// Fire-and-forget pause. No reply is expected.
    Pause(ConsumerPause),

    /// Acknowledgment-gated resume.
    Resume {
        command: ConsumerResume,
        /// Carries the server's `{resumed}` ack back to the caller.
        respond_to: oneshot::Sender<ResumeAck>,
    },
}

/// Sender half of the signaling seam, held by the coordinator.
#[derive(Debug, Clone)]
pub struct SignalingHandle {
    sender: mpsc::Sender<SignalRequest>,
}

impl SignalingHandle {
    /// Wrap an existing request sender.
    #[must_use]
    pub fn new(sender: mpsc::Sender<SignalRequest>) -> Self {
        Self { sender }
    }

    /// Create a handle plus the receiver the socket endpoint should drain.
    #[must_use]
    pub fn channel() -> (Self, mpsc::Receiver<SignalRequest>) {
        let (sender, receiver) = mpsc::channel(SIGNAL_CHANNEL_BUFFER);
        (Self { sender }, receiver)
    }

    /// Queue a `consumer-pause` for the given server consumer id.
    ///
    /// Returns once the request is queued; the server does not acknowledge
    /// pauses.
    pub async fn consumer_pause(
        &self,
        server_consumer_id: impl Into<String>,
    ) -> Result<(), SignalError> {
        self.sender
            .send(SignalRequest::Pause(ConsumerPause {
                server_consumer_id: server_consumer_id.into(),
            }))
            .await
            .map_err(|_| SignalError::ChannelClosed)
    }

    /// Send a `consumer-resume` and wait for the server acknowledgment.
    pub async fn consumer_resume(
        &self,
        server_consumer_id: impl Into<String>,
    ) -> Result<ResumeAck, SignalError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(SignalRequest::Resume {
                command: ConsumerResume {
                    server_consumer_id: server_consumer_id.into(),
                },
                respond_to: tx,
            })
            .await
            .map_err(|_| SignalError::ChannelClosed)?;

        rx.await.map_err(|_| SignalError::AckDropped)
    }
}
