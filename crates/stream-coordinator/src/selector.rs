//! Limited-stream selection: the bounded working set of promoted streams
//! and the reorder engine that rebuilds it.
//!
//! The limited set always contains the self-view and, when present, the
//! host's video and the active screen-sharer's video as pinned members.
//! Everything else enters incrementally (loudness promotion) and can be
//! evicted; pinned members cannot.

use std::collections::HashSet;

use signal_protocol::ProducerId;
use tracing::debug;

use crate::state::CoordinatorState;

/// Insertion-ordered bounded set of promoted producer ids with O(1)
/// membership and pinned-entry tracking.
#[derive(Debug, Default)]
pub struct LimitedStreamSet {
    order: Vec<ProducerId>,
    members: HashSet<ProducerId>,
    pinned: HashSet<ProducerId>,
}

impl LimitedStreamSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the producer is promoted.
    #[must_use]
    pub fn contains(&self, producer_id: &ProducerId) -> bool {
        self.members.contains(producer_id)
    }

    /// Whether the producer is a pinned member.
    #[must_use]
    pub fn is_pinned(&self, producer_id: &ProducerId) -> bool {
        self.pinned.contains(producer_id)
    }

    /// Append an unpinned member. Returns `false` if already present.
    pub fn push_back(&mut self, producer_id: ProducerId) -> bool {
        if self.members.contains(&producer_id) {
            return false;
        }
        self.members.insert(producer_id.clone());
        self.order.push(producer_id);
        true
    }

    /// Append a pinned member, deduplicated. An existing member is marked
    /// pinned in place.
    pub fn pin_back(&mut self, producer_id: ProducerId) {
        self.pinned.insert(producer_id.clone());
        self.push_back(producer_id);
    }

    /// Unshift a pinned member to the front. An existing member is moved.
    pub fn pin_front(&mut self, producer_id: ProducerId) {
        self.pinned.insert(producer_id.clone());
        if self.members.contains(&producer_id) {
            self.order.retain(|id| id != &producer_id);
        } else {
            self.members.insert(producer_id.clone());
        }
        self.order.insert(0, producer_id);
    }

    /// Remove a member. Returns `true` if it was present.
    pub fn remove(&mut self, producer_id: &ProducerId) -> bool {
        if !self.members.remove(producer_id) {
            return false;
        }
        self.order.retain(|id| id != producer_id);
        self.pinned.remove(producer_id);
        true
    }

    /// Drop every member, pinned included (full rebuild).
    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
        self.pinned.clear();
    }

    /// The oldest unpinned member, if any (eviction candidate).
    #[must_use]
    pub fn oldest_unpinned(&self) -> Option<&ProducerId> {
        self.order.iter().find(|id| !self.pinned.contains(*id))
    }

    /// Members in promotion order.
    pub fn iter(&self) -> impl Iterator<Item = &ProducerId> {
        self.order.iter()
    }

    /// Members in promotion order, cloned.
    #[must_use]
    pub fn to_vec(&self) -> Vec<ProducerId> {
        self.order.clone()
    }

    /// Current size.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl CoordinatorState {
    /// Rebuild the limited-stream set.
    ///
    /// With `add` false the set is cleared first (full rebuild); with `add`
    /// true existing members are kept and only the pinned entries are
    /// (re)asserted, deduplicated. Finishes by firing the grid-refresh UI
    /// event with `screen_changed` forwarded.
    ///
    /// Absent host or screen id are legitimate states, not errors.
    pub fn reorder_streams(&mut self, add: bool, screen_changed: bool) {
        if !add {
            self.limited.clear();
        }
        self.metrics.record_reorder();

        // Self-view first; dedup guards the incremental path.
        if let Some(local_id) = self
            .registry
            .local_video_stream()
            .map(|d| d.producer_id.clone())
        {
            self.limited.pin_back(local_id);
        }

        // Host video pin, falling back to the cached old stream across the
        // transport-churn window where the live producer briefly disappears.
        let host = self
            .registry
            .host()
            .map(|h| (h.name.clone(), h.video_id.clone()));
        if let Some((host_name, Some(video_id))) = host {
            if let Some(descriptor) = self.registry.video_stream(&video_id).cloned() {
                self.registry.cache_old_stream(descriptor);
                self.limited.pin_front(video_id);
            } else if self.registry.old_video_stream(&video_id).is_some() {
                // Live stream momentarily absent; record the name so the
                // host can be re-pinned once the stream reappears.
                self.pinned_host_name = Some(host_name);
                self.limited.pin_front(video_id);
            } else {
                debug!(
                    target: "sc.reorder",
                    producer_id = %video_id,
                    "host video absent from live and cached streams"
                );
            }
        }

        // Active screen-share owner pin.
        if let Some(screen_id) = self.screen.screen_id.clone() {
            let owner_video = self
                .registry
                .screen_owner(&screen_id)
                .and_then(|p| p.video_id.clone());
            if let Some(video_id) = owner_video {
                if !self.limited.contains(&video_id) {
                    self.limited.pin_front(video_id);
                }
            }
        }

        debug!(
            target: "sc.reorder",
            add,
            screen_changed,
            limited = self.limited.len(),
            "limited set rebuilt"
        );

        self.ui.refresh_grid(screen_changed);
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
    use signal_protocol::{HostLevel, MediaKind, ParticipantId, SignalingHandle};

    fn test_state() -> CoordinatorState {
        let (signaling, _rx) = SignalingHandle::channel();
        let (ui, _ui_rx) = UiEventSender::channel();
        CoordinatorState::new(
            CoordinatorConfig::default(),
            ParticipantId::new(),
            signaling,
            ui,
            CoordinatorMetrics::new(),
        )
    }

    fn video(producer_id: &str) -> StreamDescriptor {
        StreamDescriptor {
            producer_id: ProducerId::from(producer_id),
            kind: MediaKind::Video,
            muted: false,
        }
    }

    fn participant(name: &str, level: HostLevel, video_id: Option<&str>) -> Participant {
        Participant {
            id: ParticipantId::new(),
            name: name.to_string(),
            audio_id: None,
            video_id: video_id.map(ProducerId::from),
            screen_id: None,
            host_level: level,
            muted: false,
            video_on: video_id.is_some(),
        }
    }

    #[test]
    fn test_set_dedup_and_order() {
        let mut set = LimitedStreamSet::new();
        assert!(set.push_back(ProducerId::from("a")));
        assert!(!set.push_back(ProducerId::from("a")));
        set.push_back(ProducerId::from("b"));
        set.pin_front(ProducerId::from("c"));

        let order: Vec<_> = set.iter().map(ProducerId::as_str).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
        assert!(set.is_pinned(&ProducerId::from("c")));
        assert!(!set.is_pinned(&ProducerId::from("a")));
    }

    #[test]
    fn test_pin_front_moves_existing_member() {
        let mut set = LimitedStreamSet::new();
        set.push_back(ProducerId::from("a"));
        set.push_back(ProducerId::from("b"));
        set.pin_front(ProducerId::from("b"));

        let order: Vec<_> = set.iter().map(ProducerId::as_str).collect();
        assert_eq!(order, vec!["b", "a"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_oldest_unpinned_skips_pinned() {
        let mut set = LimitedStreamSet::new();
        set.pin_front(ProducerId::from("pinned"));
        set.push_back(ProducerId::from("x"));
        set.push_back(ProducerId::from("y"));

        assert_eq!(set.oldest_unpinned().unwrap().as_str(), "x");
    }

    // Scenario: self + host(video) + 3 other video streams, full rebuild
    // with no screen share -> exactly {self, host}.
    #[test]
    fn test_full_rebuild_pins_only_self_and_host() {
        let mut state = test_state();
        state.registry.insert_stream(video("youyou"));
        state.registry.insert_stream(video("vid-host"));
        for other in ["vid-1", "vid-2", "vid-3"] {
            state.registry.insert_stream(video(other));
        }
        state
            .registry
            .upsert_participant(participant("host", HostLevel::Host, Some("vid-host")));

        state.reorder_streams(false, false);

        assert_eq!(state.limited.len(), 2);
        assert!(state.limited.contains(&ProducerId::from("youyou")));
        assert!(state.limited.contains(&ProducerId::from("vid-host")));
    }

    #[test]
    fn test_incremental_rebuild_never_grows_with_unchanged_registry() {
        let mut state = test_state();
        state.registry.insert_stream(video("youyou"));
        state.registry.insert_stream(video("vid-host"));
        state
            .registry
            .upsert_participant(participant("host", HostLevel::Host, Some("vid-host")));

        state.reorder_streams(false, false);
        let size = state.limited.len();

        for _ in 0..3 {
            state.reorder_streams(true, false);
            assert_eq!(state.limited.len(), size);
        }
    }

    #[test]
    fn test_audio_only_host_is_skipped() {
        let mut state = test_state();
        state.registry.insert_stream(video("youyou"));
        state
            .registry
            .upsert_participant(participant("host", HostLevel::Host, None));

        state.reorder_streams(false, false);

        assert_eq!(state.limited.len(), 1);
        assert!(state.limited.contains(&ProducerId::from("youyou")));
    }

    #[test]
    fn test_host_fallback_to_cached_stream_records_name() {
        let mut state = test_state();
        state.registry.cache_old_stream(video("vid-host"));
        state
            .registry
            .upsert_participant(participant("Ada", HostLevel::Host, Some("vid-host")));

        state.reorder_streams(false, false);

        assert!(state.limited.contains(&ProducerId::from("vid-host")));
        assert_eq!(state.pinned_host_name.as_deref(), Some("Ada"));
    }

    #[test]
    fn test_screen_owner_video_pinned() {
        let mut state = test_state();
        state.registry.insert_stream(video("vid-sharer"));
        let mut sharer = participant("sharer", HostLevel::Guest, Some("vid-sharer"));
        sharer.screen_id = Some(ProducerId::from("scr-1"));
        state.registry.upsert_participant(sharer);
        state.screen.screen_id = Some(ProducerId::from("scr-1"));
        state.screen.share_screen_started = true;

        state.reorder_streams(false, true);

        assert!(state.limited.contains(&ProducerId::from("vid-sharer")));
        assert!(state.limited.is_pinned(&ProducerId::from("vid-sharer")));
    }

    #[tokio::test]
    async fn test_refresh_event_forwards_screen_changed() {
        let (signaling, _rx) = SignalingHandle::channel();
        let (ui, mut ui_rx) = UiEventSender::channel();
        let mut state = CoordinatorState::new(
            CoordinatorConfig::default(),
            ParticipantId::new(),
            signaling,
            ui,
            CoordinatorMetrics::new(),
        );

        state.reorder_streams(false, true);

        assert_eq!(
            ui_rx.recv().await.unwrap(),
            UiEvent::RefreshGrid { screen_changed: true }
        );
    }
}
