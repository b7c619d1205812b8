//! Screen-share and whiteboard transitions: layout flag resets, closed
//! producer cleanup, and the host-side recording snapshot hook.

use chrono::Utc;
use signal_protocol::{MediaKind, ProducerId};
use tracing::{debug, info};

use crate::state::{CoordinatorState, EventType, LayoutSnapshot};

/// Media kind of a closed producer, as seen by the cleanup path.
///
/// Screenshare is not a wire-level kind: a closed video producer is
/// reclassified as screenshare when its id matches the pinned screen id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosedKind {
    Audio,
    Video,
    Screenshare,
}

impl CoordinatorState {
    /// React to a screen-share or whiteboard state flip.
    ///
    /// Resets the event-type-specific layout flags, then runs a full
    /// rebuild of the limited set followed by reconciliation of both
    /// media kinds.
    pub async fn on_screen_changes(&mut self, screen_changed: bool) {
        let (page_limit, show_controls) = match self.event_type {
            EventType::Broadcast => (1, false),
            EventType::Chat => (2, false),
            EventType::Conference | EventType::Webinar => (self.config.item_page_limit, true),
        };
        self.layout.effective_page_limit = page_limit;
        self.layout.show_basic_controls = show_controls;

        self.reorder_streams(false, screen_changed);
        self.process_consumer_transports(MediaKind::Audio).await;
        self.process_consumer_transports(MediaKind::Video).await;
    }

    /// Strip a closed producer from every tracking collection and re-run
    /// layout and reconciliation for the affected media kind.
    pub async fn close_and_resize(&mut self, producer_id: &ProducerId, kind: ClosedKind) {
        // The owner drops out of the loudness admission order along with
        // the stream itself.
        if let Some(owner_id) = self
            .registry
            .participant_for_producer(producer_id)
            .map(|p| p.id)
        {
            self.loudness.old_sound_ids.retain(|id| *id != owner_id);
            if let Some(owner) = self.registry.participant_mut(&owner_id) {
                match kind {
                    ClosedKind::Audio => owner.audio_id = None,
                    ClosedKind::Video => owner.video_id = None,
                    ClosedKind::Screenshare => owner.screen_id = None,
                }
            }
        }
        self.registry.remove_stream(producer_id);
        self.limited.remove(producer_id);

        debug!(
            target: "sc.lifecycle",
            producer_id = %producer_id,
            kind = ?kind,
            "stripped closed producer from tracking state"
        );

        match kind {
            ClosedKind::Audio => {
                self.reorder_streams(false, false);
                self.process_consumer_transports(MediaKind::Audio).await;
            }
            ClosedKind::Video => {
                self.reorder_streams(false, false);
                self.process_consumer_transports(MediaKind::Video).await;
            }
            ClosedKind::Screenshare => {
                self.screen.share_screen_started = false;
                self.screen.lock_screen = false;
                self.screen.screen_id = None;
                self.screen.orientation_hint_sent = false;
                if !self.screen.got_all_vids {
                    // Videos deferred during the share round have to be
                    // fetched now that the grid is back.
                    self.ui.refetch_videos();
                }
                self.ui.repopulate_main_slot();
                self.reorder_streams(false, true);
                self.process_consumer_transports(MediaKind::Video).await;
            }
        }
    }

    /// Host-only recording hook: snapshot main-screen occupancy and the
    /// active display names, diff against the previous snapshot, and log
    /// layout-relevant changes for recording metadata.
    ///
    /// Not part of the real-time media path; a no-op unless this client
    /// is the host and a recording is active.
    pub fn re_port(&mut self, restart: bool) {
        if !self.recording.active {
            return;
        }
        let is_host = self
            .registry
            .participant(&self.local_participant)
            .is_some_and(|p| p.host_level.is_host());
        if !is_host {
            return;
        }

        let active_names: Vec<String> = self
            .limited
            .iter()
            .filter_map(|id| self.registry.participant_for_producer(id))
            .map(|p| p.name.clone())
            .collect();
        let main_screen_person = active_names.first().cloned();
        let snapshot = LayoutSnapshot {
            main_screen_filled: !self.limited.is_empty(),
            main_screen_person,
            active_names,
            display_mode: self.display_mode,
            at: Utc::now(),
        };

        let changed = match &self.recording.prev_snapshot {
            Some(prev) => {
                prev.main_screen_filled != snapshot.main_screen_filled
                    || prev.main_screen_person != snapshot.main_screen_person
                    || prev.active_names != snapshot.active_names
                    || prev.display_mode != snapshot.display_mode
            }
            None => true,
        };

        if changed || restart {
            info!(
                target: "sc.recording",
                main_screen_filled = snapshot.main_screen_filled,
                main_screen_person = ?snapshot.main_screen_person,
                active_names = ?snapshot.active_names,
                display_mode = ?snapshot.display_mode,
                at = %snapshot.at,
                restart,
                "recording layout snapshot"
            );
        }
        self.recording.prev_snapshot = Some(snapshot);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::actors::CoordinatorMetrics;
    use crate::config::CoordinatorConfig;
    use crate::registry::{Participant, StreamDescriptor};
    use crate::ui::{UiEvent, UiEventSender};
    use signal_protocol::{HostLevel, ParticipantId, SignalingHandle};
    use tokio::sync::mpsc;

    fn test_state() -> (CoordinatorState, mpsc::UnboundedReceiver<UiEvent>) {
        let (signaling, _rx) = SignalingHandle::channel();
        let (ui, ui_rx) = UiEventSender::channel();
        let state = CoordinatorState::new(
            CoordinatorConfig::default(),
            ParticipantId::new(),
            signaling,
            ui,
            CoordinatorMetrics::new(),
        );
        (state, ui_rx)
    }

    fn add_participant(
        state: &mut CoordinatorState,
        name: &str,
        video: Option<&str>,
        host_level: HostLevel,
    ) -> ParticipantId {
        let id = ParticipantId::new();
        state.registry.upsert_participant(Participant {
            id,
            name: name.to_string(),
            audio_id: None,
            video_id: video.map(ProducerId::from),
            screen_id: None,
            host_level,
            muted: false,
            video_on: video.is_some(),
        });
        if let Some(vid) = video {
            state.registry.insert_stream(StreamDescriptor {
                producer_id: ProducerId::from(vid),
                kind: MediaKind::Video,
                muted: false,
            });
        }
        id
    }

    #[tokio::test(start_paused = true)]
    async fn test_on_screen_changes_resets_layout_flags() {
        let (mut state, _ui_rx) = test_state();

        state.event_type = EventType::Broadcast;
        state.layout.effective_page_limit = 9;
        state.on_screen_changes(false).await;
        assert_eq!(state.layout.effective_page_limit, 1);
        assert!(!state.layout.show_basic_controls);

        state.event_type = EventType::Conference;
        state.on_screen_changes(true).await;
        assert_eq!(
            state.layout.effective_page_limit,
            state.config.item_page_limit
        );
        assert!(state.layout.show_basic_controls);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_and_resize_strips_all_tracking_state() {
        let (mut state, _ui_rx) = test_state();
        let owner = add_participant(&mut state, "alice", Some("vid-a"), HostLevel::Guest);
        state.limited.push_back(ProducerId::from("vid-a"));
        state.loudness.old_sound_ids.push(owner);

        state
            .close_and_resize(&ProducerId::from("vid-a"), ClosedKind::Video)
            .await;

        assert!(state
            .registry
            .video_stream(&ProducerId::from("vid-a"))
            .is_none());
        assert!(!state.limited.contains(&ProducerId::from("vid-a")));
        assert!(state.loudness.old_sound_ids.is_empty());
        assert!(state.registry.participant(&owner).unwrap().video_id.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_screenshare_close_resets_flags_and_requests_refetch() {
        let (mut state, mut ui_rx) = test_state();
        add_participant(&mut state, "sharer", None, HostLevel::Guest);
        state.screen.share_screen_started = true;
        state.screen.lock_screen = true;
        state.screen.screen_id = Some(ProducerId::from("scr-1"));
        state.screen.got_all_vids = false;

        state
            .close_and_resize(&ProducerId::from("scr-1"), ClosedKind::Screenshare)
            .await;

        assert!(!state.screen.share_screen_started);
        assert!(!state.screen.lock_screen);
        assert!(state.screen.screen_id.is_none());

        let mut saw_refetch = false;
        let mut saw_repopulate = false;
        let mut saw_refresh_with_change = false;
        while let Ok(event) = ui_rx.try_recv() {
            match event {
                UiEvent::RefetchVideos => saw_refetch = true,
                UiEvent::RepopulateMainSlot => saw_repopulate = true,
                UiEvent::RefreshGrid { screen_changed } => {
                    saw_refresh_with_change |= screen_changed;
                }
                UiEvent::RotateToLandscape => {}
            }
        }
        assert!(saw_refetch);
        assert!(saw_repopulate);
        assert!(saw_refresh_with_change);
    }

    #[tokio::test(start_paused = true)]
    async fn test_re_port_requires_host_and_active_recording() {
        let (mut state, _ui_rx) = test_state();
        state.re_port(false);
        assert!(state.recording.prev_snapshot.is_none());

        // Recording without host level still skips.
        state.recording.active = true;
        state.registry.upsert_participant(Participant {
            id: state.local_participant,
            name: "me".to_string(),
            audio_id: None,
            video_id: None,
            screen_id: None,
            host_level: HostLevel::Guest,
            muted: false,
            video_on: false,
        });
        state.re_port(false);
        assert!(state.recording.prev_snapshot.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_re_port_snapshots_active_names() {
        let (mut state, _ui_rx) = test_state();
        state.recording.active = true;
        state.registry.upsert_participant(Participant {
            id: state.local_participant,
            name: "me".to_string(),
            audio_id: None,
            video_id: None,
            screen_id: None,
            host_level: HostLevel::Host,
            muted: false,
            video_on: false,
        });
        add_participant(&mut state, "bob", Some("vid-b"), HostLevel::Guest);
        state.limited.push_back(ProducerId::from("vid-b"));

        state.re_port(false);
        let snapshot = state.recording.prev_snapshot.clone().unwrap();
        assert!(snapshot.main_screen_filled);
        assert_eq!(snapshot.main_screen_person.as_deref(), Some("bob"));
        assert_eq!(snapshot.active_names, vec!["bob".to_string()]);

        // Unchanged layout still replaces the stored snapshot.
        state.re_port(false);
        assert!(state.recording.prev_snapshot.is_some());
    }
}
