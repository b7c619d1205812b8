//! Coordinator state: everything a reconciliation pass reads and writes.
//!
//! Owned exclusively by the coordinator actor, which serializes passes
//! through its mailbox. Nothing here is shared mutable state; the actor is
//! the single writer and hands out snapshots on request.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use signal_protocol::{ParticipantId, ProducerId, SignalingHandle};
use tokio::time::Instant;

use crate::actors::CoordinatorMetrics;
use crate::config::CoordinatorConfig;
use crate::registry::StreamRegistry;
use crate::selector::LimitedStreamSet;
use crate::transport::TransportRegistry;
use crate::ui::UiEventSender;

/// Room event type, which drives layout flag resets on screen transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    /// One-to-many broadcast.
    Broadcast,
    /// Audio-forward chat room.
    Chat,
    /// Regular multi-party conference.
    Conference,
    /// Host-led webinar.
    Webinar,
}

/// Which participants the grid displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Only participants with video.
    Video,
    /// Participants with any media.
    Media,
    /// All participants.
    All,
}

/// Screen-share and viewport flags.
#[derive(Debug, Clone)]
pub struct ScreenState {
    /// Whether a screen share is in progress.
    pub share_screen_started: bool,
    /// Producer id of the active screen share, if any.
    pub screen_id: Option<ProducerId>,
    /// Whether the layout is locked to the shared screen.
    pub lock_screen: bool,
    /// Whether the collaborative whiteboard is open.
    pub whiteboard_started: bool,
    /// Whether the viewport is wide enough for the share layout.
    pub is_wide_screen: bool,
    /// One-shot flag: the rotate-to-landscape advisory was already emitted
    /// for the current share round.
    pub orientation_hint_sent: bool,
    /// Whether all remote videos had been received before the current
    /// share round.
    pub got_all_vids: bool,
}

impl Default for ScreenState {
    fn default() -> Self {
        Self {
            share_screen_started: false,
            screen_id: None,
            lock_screen: false,
            whiteboard_started: false,
            is_wide_screen: true,
            orientation_hint_sent: false,
            got_all_vids: false,
        }
    }
}

/// Event-type-derived layout flags, reset by screen transitions.
#[derive(Debug, Clone)]
pub struct LayoutState {
    /// Page limit currently in effect for the regular grid.
    pub effective_page_limit: usize,
    /// Whether the basic controls affordance is shown.
    pub show_basic_controls: bool,
}

/// Bookkeeping for loudness-driven promotion.
#[derive(Debug, Default)]
pub struct LoudnessState {
    /// When the last loudness-triggered reorder ran.
    pub last_reorder_at: Option<Instant>,
    /// Admission order of loudness-promoted participants, oldest first.
    /// Drives deterministic eviction.
    pub old_sound_ids: Vec<ParticipantId>,
}

/// Snapshot of layout-relevant occupancy, taken for recording metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutSnapshot {
    /// Whether the main display slot is occupied.
    pub main_screen_filled: bool,
    /// Display name of whoever occupies the main slot.
    pub main_screen_person: Option<String>,
    /// Display names of participants currently promoted on screen.
    pub active_names: Vec<String>,
    /// Display mode at snapshot time.
    pub display_mode: DisplayMode,
    /// Snapshot timestamp.
    pub at: DateTime<Utc>,
}

/// Recording-related state for the host-only `re_port` hook.
#[derive(Debug, Default)]
pub struct RecordingState {
    /// Whether a recording is in progress.
    pub active: bool,
    /// Previous snapshot, diffed against on each `re_port` call.
    pub prev_snapshot: Option<LayoutSnapshot>,
}

/// The full coordinator state, owned by the actor.
pub struct CoordinatorState {
    /// Static configuration.
    pub config: CoordinatorConfig,
    /// Participants and stream descriptors.
    pub registry: StreamRegistry,
    /// Live consumer transports.
    pub transports: TransportRegistry,
    /// The bounded promoted-stream working set.
    pub limited: LimitedStreamSet,
    /// Screen-share and viewport flags.
    pub screen: ScreenState,
    /// Event-type-derived layout flags.
    pub layout: LayoutState,
    /// Loudness promotion bookkeeping.
    pub loudness: LoudnessState,
    /// Recording snapshot state.
    pub recording: RecordingState,
    /// Room event type.
    pub event_type: EventType,
    /// Grid display mode.
    pub display_mode: DisplayMode,
    /// This client's participant id.
    pub local_participant: ParticipantId,
    /// Host display name recorded when the host stream was re-pinned from
    /// the old-streams cache (needed for later re-pinning).
    pub pinned_host_name: Option<String>,
    /// Outbound signaling seam.
    pub signaling: SignalingHandle,
    /// Fire-and-forget UI event seam.
    pub ui: UiEventSender,
    /// Shared counters.
    pub metrics: Arc<CoordinatorMetrics>,
}

impl CoordinatorState {
    /// Create a fresh state for a just-joined room.
    #[must_use]
    pub fn new(
        config: CoordinatorConfig,
        local_participant: ParticipantId,
        signaling: SignalingHandle,
        ui: UiEventSender,
        metrics: Arc<CoordinatorMetrics>,
    ) -> Self {
        let layout = LayoutState {
            effective_page_limit: config.item_page_limit,
            show_basic_controls: true,
        };
        Self {
            config,
            registry: StreamRegistry::new(),
            transports: TransportRegistry::new(),
            limited: LimitedStreamSet::new(),
            screen: ScreenState::default(),
            layout,
            loudness: LoudnessState::default(),
            recording: RecordingState::default(),
            event_type: EventType::Conference,
            display_mode: DisplayMode::Video,
            local_participant,
            pinned_host_name: None,
            signaling,
            ui,
            metrics,
        }
    }

    /// The page limit bounding the limited set in the current context.
    #[must_use]
    pub fn page_limit(&self) -> usize {
        if self.screen.share_screen_started {
            self.config.screen_page_limit
        } else {
            self.layout.effective_page_limit
        }
    }
}
