//! Message types for the coordinator mailbox.
//!
//! All room-state mutation flows through these messages so reconciliation
//! passes are serialized end-to-end. Request-reply uses `tokio::sync::oneshot`.

use signal_protocol::{ParticipantId, ProducerId, ServerEvent};
use tokio::sync::oneshot;

use crate::actors::metrics::MetricsSnapshot;
use crate::registry::{BreakoutAssignment, Participant};
use crate::state::EventType;

/// Messages sent to the `CoordinatorActor`.
#[derive(Debug)]
pub enum CoordinatorMessage {
    /// Inbound signaling event from the SFU socket.
    ServerEvent(ServerEvent),

    /// One sampled audio level for a participant.
    AudioLevel {
        participant_id: ParticipantId,
        /// Sampled loudness on the 0-255 scale.
        average: f64,
        /// Promote (`true`) or demote (`false`).
        add: bool,
        /// Bypass demotion gating (participant confirmed muted).
        force: bool,
    },

    /// A participant joined or changed metadata.
    UpsertParticipant(Participant),

    /// A participant left the room; their transports are torn down.
    RemoveParticipant { participant_id: ParticipantId },

    /// A screen share started with the given producer pinned.
    ScreenShareStarted { screen_id: ProducerId },

    /// The collaborative whiteboard was opened or closed.
    WhiteboardToggled { started: bool },

    /// The viewport crossed the wide/narrow layout boundary.
    ViewportChanged { wide: bool },

    /// The room event type changed; layout flags are recomputed.
    SetEventType { event_type: EventType },

    /// Breakout-room assignments changed.
    SetBreakout {
        active: bool,
        assignments: Vec<BreakoutAssignment>,
    },

    /// Recording started or stopped.
    SetRecording { active: bool },

    /// Host-side recording snapshot hook.
    RePort { restart: bool },

    /// Request a point-in-time state snapshot.
    GetSnapshot {
        /// Response channel for the snapshot.
        respond_to: oneshot::Sender<StateSnapshot>,
    },
}

/// Point-in-time view of coordinator state, for tests and UI surfaces.
#[derive(Debug, Clone)]
pub struct StateSnapshot {
    /// Limited-set contents in display order.
    pub limited: Vec<ProducerId>,
    /// Registered participant count.
    pub participant_count: usize,
    /// Live consumer transport count.
    pub transport_count: usize,
    /// Whether a screen share is in progress.
    pub share_screen_started: bool,
    /// Whether a recording is active.
    pub recording_active: bool,
    /// Counter snapshot.
    pub metrics: MetricsSnapshot,
}
