//! `CoordinatorActor` - owns the whole room coordination state.
//!
//! The actor:
//! - Owns the stream registry, transport registry, and limited set
//! - Processes mailbox messages one at a time, so reconciliation passes
//!   never interleave
//! - Creates consumer transports through the injected [`ConsumerFactory`]
//! - Shuts down via `CancellationToken`

use std::sync::Arc;

use signal_protocol::{ParticipantId, ServerEvent, SignalingHandle};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::messages::{CoordinatorMessage, StateSnapshot};
use super::metrics::{CoordinatorMetrics, MetricsSnapshot};
use crate::config::CoordinatorConfig;
use crate::errors::CoordinatorError;
use crate::state::CoordinatorState;
use crate::transport::ConsumerFactory;
use crate::ui::UiEventSender;

/// Default channel buffer size for the coordinator mailbox.
const COORDINATOR_CHANNEL_BUFFER: usize = 256;

/// Handle to a running `CoordinatorActor`.
#[derive(Clone)]
pub struct CoordinatorHandle {
    sender: mpsc::Sender<CoordinatorMessage>,
    cancel_token: CancellationToken,
}

impl CoordinatorHandle {
    /// Deliver an inbound signaling event.
    pub async fn server_event(&self, event: ServerEvent) -> Result<(), CoordinatorError> {
        self.send(CoordinatorMessage::ServerEvent(event)).await
    }

    /// Deliver one audio-level sample.
    pub async fn audio_level(
        &self,
        participant_id: ParticipantId,
        average: f64,
        add: bool,
        force: bool,
    ) -> Result<(), CoordinatorError> {
        self.send(CoordinatorMessage::AudioLevel {
            participant_id,
            average,
            add,
            force,
        })
        .await
    }

    /// Register or update a participant.
    pub async fn upsert_participant(
        &self,
        participant: crate::registry::Participant,
    ) -> Result<(), CoordinatorError> {
        self.send(CoordinatorMessage::UpsertParticipant(participant))
            .await
    }

    /// Remove a participant and tear down their transports.
    pub async fn remove_participant(
        &self,
        participant_id: ParticipantId,
    ) -> Result<(), CoordinatorError> {
        self.send(CoordinatorMessage::RemoveParticipant { participant_id })
            .await
    }

    /// Announce a started screen share.
    pub async fn screen_share_started(
        &self,
        screen_id: signal_protocol::ProducerId,
    ) -> Result<(), CoordinatorError> {
        self.send(CoordinatorMessage::ScreenShareStarted { screen_id })
            .await
    }

    /// Announce a whiteboard open/close.
    pub async fn whiteboard_toggled(&self, started: bool) -> Result<(), CoordinatorError> {
        self.send(CoordinatorMessage::WhiteboardToggled { started })
            .await
    }

    /// Announce a viewport width-class change.
    pub async fn viewport_changed(&self, wide: bool) -> Result<(), CoordinatorError> {
        self.send(CoordinatorMessage::ViewportChanged { wide }).await
    }

    /// Change the room event type.
    pub async fn set_event_type(
        &self,
        event_type: crate::state::EventType,
    ) -> Result<(), CoordinatorError> {
        self.send(CoordinatorMessage::SetEventType { event_type })
            .await
    }

    /// Update breakout-room assignments.
    pub async fn set_breakout(
        &self,
        active: bool,
        assignments: Vec<crate::registry::BreakoutAssignment>,
    ) -> Result<(), CoordinatorError> {
        self.send(CoordinatorMessage::SetBreakout {
            active,
            assignments,
        })
        .await
    }

    /// Flip recording on or off.
    pub async fn set_recording(&self, active: bool) -> Result<(), CoordinatorError> {
        self.send(CoordinatorMessage::SetRecording { active }).await
    }

    /// Run the host-side recording snapshot hook.
    pub async fn re_port(&self, restart: bool) -> Result<(), CoordinatorError> {
        self.send(CoordinatorMessage::RePort { restart }).await
    }

    /// Get a point-in-time state snapshot.
    pub async fn snapshot(&self) -> Result<StateSnapshot, CoordinatorError> {
        let (tx, rx) = oneshot::channel();
        self.send(CoordinatorMessage::GetSnapshot { respond_to: tx })
            .await?;
        rx.await
            .map_err(|e| CoordinatorError::Internal(format!("response receive failed: {e}")))
    }

    /// Signal the actor to shut down.
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }

    /// Whether shutdown has been signaled.
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    async fn send(&self, message: CoordinatorMessage) -> Result<(), CoordinatorError> {
        self.sender
            .send(message)
            .await
            .map_err(|e| CoordinatorError::Internal(format!("channel send failed: {e}")))
    }
}

/// The coordinator actor. Spawn with [`CoordinatorActor::spawn`].
pub struct CoordinatorActor<F: ConsumerFactory> {
    receiver: mpsc::Receiver<CoordinatorMessage>,
    cancel_token: CancellationToken,
    state: CoordinatorState,
    factory: F,
    metrics: Arc<CoordinatorMetrics>,
}

impl<F: ConsumerFactory> CoordinatorActor<F> {
    /// Spawn the actor and return its handle plus the join handle.
    pub fn spawn(
        config: CoordinatorConfig,
        local_participant: ParticipantId,
        factory: F,
        signaling: SignalingHandle,
        ui: UiEventSender,
        cancel_token: CancellationToken,
    ) -> (CoordinatorHandle, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(COORDINATOR_CHANNEL_BUFFER);
        let metrics = CoordinatorMetrics::new();
        let state = CoordinatorState::new(
            config,
            local_participant,
            signaling,
            ui,
            Arc::clone(&metrics),
        );

        let actor = Self {
            receiver,
            cancel_token: cancel_token.clone(),
            state,
            factory,
            metrics,
        };
        let task_handle = tokio::spawn(actor.run());

        let handle = CoordinatorHandle {
            sender,
            cancel_token,
        };
        (handle, task_handle)
    }

    /// Run the actor message loop.
    async fn run(mut self) {
        info!(target: "sc.actor", "CoordinatorActor started");

        loop {
            tokio::select! {
                () = self.cancel_token.cancelled() => {
                    info!(target: "sc.actor", "CoordinatorActor received cancellation signal");
                    break;
                }

                msg = self.receiver.recv() => {
                    match msg {
                        Some(message) => {
                            if let Err(e) = self.handle_message(message).await {
                                // Abandon the pass; the next triggering
                                // event runs a fresh one.
                                error!(
                                    target: "sc.actor",
                                    error = %e,
                                    "message handling failed"
                                );
                            }
                            self.metrics.record_message_processed();
                        }
                        None => {
                            info!(target: "sc.actor", "CoordinatorActor channel closed, exiting");
                            break;
                        }
                    }
                }
            }
        }

        info!(
            target: "sc.actor",
            messages_processed = self.metrics.snapshot().messages_processed,
            "CoordinatorActor stopped"
        );
    }

    /// Handle a single mailbox message.
    async fn handle_message(
        &mut self,
        message: CoordinatorMessage,
    ) -> Result<(), CoordinatorError> {
        match message {
            CoordinatorMessage::ServerEvent(ServerEvent::NewProducer(event)) => {
                self.state
                    .new_pipe_producer(&self.factory, event.producer_id, event.host_level)
                    .await
            }

            CoordinatorMessage::ServerEvent(ServerEvent::ProducerClosed(event)) => {
                self.state.producer_closed(&event.remote_producer_id).await
            }

            CoordinatorMessage::AudioLevel {
                participant_id,
                average,
                add,
                force,
            } => {
                self.state
                    .re_update_inter(participant_id, add, force, average)
                    .await;
                Ok(())
            }

            CoordinatorMessage::UpsertParticipant(participant) => {
                self.state.registry.upsert_participant(participant);
                Ok(())
            }

            CoordinatorMessage::RemoveParticipant { participant_id } => {
                self.remove_participant(participant_id).await
            }

            CoordinatorMessage::ScreenShareStarted { screen_id } => {
                self.state.screen.share_screen_started = true;
                self.state.screen.screen_id = Some(screen_id);
                self.state.screen.orientation_hint_sent = false;
                self.state.on_screen_changes(true).await;
                Ok(())
            }

            CoordinatorMessage::WhiteboardToggled { started } => {
                self.state.screen.whiteboard_started = started;
                self.state.on_screen_changes(true).await;
                Ok(())
            }

            CoordinatorMessage::ViewportChanged { wide } => {
                self.state.screen.is_wide_screen = wide;
                Ok(())
            }

            CoordinatorMessage::SetEventType { event_type } => {
                self.state.event_type = event_type;
                self.state.on_screen_changes(false).await;
                Ok(())
            }

            CoordinatorMessage::SetBreakout {
                active,
                assignments,
            } => {
                self.state.registry.set_breakout(active, assignments);
                self.state
                    .process_consumer_transports(signal_protocol::MediaKind::Audio)
                    .await;
                Ok(())
            }

            CoordinatorMessage::SetRecording { active } => {
                self.state.recording.active = active;
                if active {
                    self.state.re_port(true);
                }
                Ok(())
            }

            CoordinatorMessage::RePort { restart } => {
                self.state.re_port(restart);
                Ok(())
            }

            CoordinatorMessage::GetSnapshot { respond_to } => {
                let snapshot = StateSnapshot {
                    limited: self.state.limited.to_vec(),
                    participant_count: self.state.registry.participant_count(),
                    transport_count: self.state.transports.len(),
                    share_screen_started: self.state.screen.share_screen_started,
                    recording_active: self.state.recording.active,
                    metrics: self.snapshot_metrics(),
                };
                let _ = respond_to.send(snapshot);
                Ok(())
            }
        }
    }

    /// Tear down a departing participant's transports and registry entry.
    async fn remove_participant(
        &mut self,
        participant_id: ParticipantId,
    ) -> Result<(), CoordinatorError> {
        let Some(participant) = self.state.registry.remove_participant(&participant_id) else {
            return Ok(());
        };

        let producer_ids: Vec<_> = [
            participant.audio_id,
            participant.video_id,
            participant.screen_id,
        ]
        .into_iter()
        .flatten()
        .collect();

        for producer_id in producer_ids {
            if let Err(e) = self.state.producer_closed(&producer_id).await {
                warn!(
                    target: "sc.actor",
                    participant_id = %participant_id,
                    producer_id = %producer_id,
                    error = %e,
                    "failed to close transport for departed participant"
                );
            }
        }

        self.state
            .loudness
            .old_sound_ids
            .retain(|id| *id != participant_id);
        Ok(())
    }

    fn snapshot_metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
