//! Pre-configured test data: participants, stream descriptors, and a
//! fully wired coordinator state.

use signal_protocol::{HostLevel, MediaKind, ParticipantId, ProducerId};
use stream_coordinator::actors::CoordinatorMetrics;
use stream_coordinator::{
    CoordinatorConfig, CoordinatorState, Participant, StreamDescriptor, UiEvent, UiEventSender,
};
use tokio::sync::mpsc;

use crate::mock_signaling::MockSignaling;

/// Builder for a test participant.
#[derive(Debug)]
pub struct TestParticipant {
    participant: Participant,
}

impl TestParticipant {
    /// Start a guest participant with the given display name and no media.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            participant: Participant {
                id: ParticipantId::new(),
                name: name.to_string(),
                audio_id: None,
                video_id: None,
                screen_id: None,
                host_level: HostLevel::Guest,
                muted: false,
                video_on: false,
            },
        }
    }

    /// Give the participant an audio producer.
    #[must_use]
    pub fn with_audio(mut self, producer_id: &str) -> Self {
        self.participant.audio_id = Some(ProducerId::from(producer_id));
        self
    }

    /// Give the participant a video producer.
    #[must_use]
    pub fn with_video(mut self, producer_id: &str) -> Self {
        self.participant.video_id = Some(ProducerId::from(producer_id));
        self.participant.video_on = true;
        self
    }

    /// Give the participant a screen-share producer.
    #[must_use]
    pub fn with_screen(mut self, producer_id: &str) -> Self {
        self.participant.screen_id = Some(ProducerId::from(producer_id));
        self
    }

    /// Set the participant's privilege level.
    #[must_use]
    pub fn with_host_level(mut self, host_level: HostLevel) -> Self {
        self.participant.host_level = host_level;
        self
    }

    /// Mark the participant muted.
    #[must_use]
    pub fn muted(mut self) -> Self {
        self.participant.muted = true;
        self
    }

    /// Finish the builder.
    #[must_use]
    pub fn build(self) -> Participant {
        self.participant
    }
}

/// A coordinator state wired to a mock signaling endpoint and a captured
/// UI event channel.
pub struct TestCoordinator {
    pub state: CoordinatorState,
    pub signaling: MockSignaling,
    pub ui_events: mpsc::UnboundedReceiver<UiEvent>,
}

impl TestCoordinator {
    /// Build a coordinator state with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(CoordinatorConfig::default())
    }

    /// Build a coordinator state with the given configuration.
    #[must_use]
    pub fn with_config(config: CoordinatorConfig) -> Self {
        let signaling = MockSignaling::spawn();
        let (ui, ui_events) = UiEventSender::channel();
        let state = CoordinatorState::new(
            config,
            ParticipantId::new(),
            signaling.handle(),
            ui,
            CoordinatorMetrics::new(),
        );
        Self {
            state,
            signaling,
            ui_events,
        }
    }

    /// Register a participant and their streams in one step.
    pub fn join(&mut self, participant: Participant) -> ParticipantId {
        let id = participant.id;
        if let Some(audio_id) = participant.audio_id.clone() {
            self.state.registry.insert_stream(StreamDescriptor {
                producer_id: audio_id,
                kind: MediaKind::Audio,
                muted: participant.muted,
            });
        }
        if let Some(video_id) = participant.video_id.clone() {
            self.state.registry.insert_stream(StreamDescriptor {
                producer_id: video_id,
                kind: MediaKind::Video,
                muted: false,
            });
        }
        self.state.registry.upsert_participant(participant);
        id
    }

    /// Drain and return every UI event emitted so far.
    pub fn drain_ui_events(&mut self) -> Vec<UiEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.ui_events.try_recv() {
            events.push(event);
        }
        events
    }
}

impl Default for TestCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
