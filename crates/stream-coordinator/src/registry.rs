//! Stream registry: the authoritative per-client view of room topology.
//!
//! Holds participant metadata, the audio/video stream descriptors known to
//! this client, the cached "old" video streams used to bridge transport
//! churn, and breakout-room assignments. Single-writer ownership (the
//! coordinator actor) guarantees readers see a consistent snapshot during a
//! reconciliation pass.

use std::collections::HashMap;

use signal_protocol::{HostLevel, MediaKind, ParticipantId, ProducerId};

/// One inbound media track available to this client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDescriptor {
    /// Producer id of the track (unique per track).
    pub producer_id: ProducerId,
    /// Whether this is an audio or video track.
    pub kind: MediaKind,
    /// Whether the track is currently muted at the source.
    pub muted: bool,
}

/// One room member.
#[derive(Debug, Clone)]
pub struct Participant {
    /// Stable identifier. Display names are metadata only.
    pub id: ParticipantId,
    /// Display name.
    pub name: String,
    /// Producer id of the participant's audio track, if publishing.
    pub audio_id: Option<ProducerId>,
    /// Producer id of the participant's video track, if publishing.
    pub video_id: Option<ProducerId>,
    /// Producer id of the participant's screen-share track, if sharing.
    pub screen_id: Option<ProducerId>,
    /// Privilege level ("2" = host on the wire).
    pub host_level: HostLevel,
    /// Whether the participant's audio is muted.
    pub muted: bool,
    /// Whether the participant's camera is on.
    pub video_on: bool,
}

/// Breakout-room membership for one participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakoutAssignment {
    /// The assigned participant.
    pub participant_id: ParticipantId,
    /// Zero-based breakout room index.
    pub break_room: u32,
}

/// The per-client registry of participants and stream descriptors.
///
/// Producer-id lookups are O(1); participant resolution from a producer id
/// scans the participant map (rooms are small).
#[derive(Debug, Default)]
pub struct StreamRegistry {
    participants: HashMap<ParticipantId, Participant>,
    audio_streams: HashMap<ProducerId, StreamDescriptor>,
    video_streams: HashMap<ProducerId, StreamDescriptor>,
    /// Cached video descriptors kept across transport churn, so a pinned
    /// stream that briefly disappears during renegotiation can be re-pinned.
    old_video_streams: HashMap<ProducerId, StreamDescriptor>,
    breakout_active: bool,
    breakout_rooms: HashMap<ParticipantId, u32>,
}

impl StreamRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ---- participants ------------------------------------------------------

    /// Insert or replace a participant.
    pub fn upsert_participant(&mut self, participant: Participant) {
        self.participants.insert(participant.id, participant);
    }

    /// Remove a participant, returning it if present.
    pub fn remove_participant(&mut self, id: &ParticipantId) -> Option<Participant> {
        self.participants.remove(id)
    }

    /// Look up a participant by id.
    #[must_use]
    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.get(id)
    }

    /// Mutable lookup by id.
    pub fn participant_mut(&mut self, id: &ParticipantId) -> Option<&mut Participant> {
        self.participants.get_mut(id)
    }

    /// Iterate all participants.
    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.values()
    }

    /// Number of known participants.
    #[must_use]
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// The room host, if known.
    #[must_use]
    pub fn host(&self) -> Option<&Participant> {
        self.participants
            .values()
            .find(|p| p.host_level.is_host())
    }

    /// Resolve the participant owning any of the given producer id's tracks.
    #[must_use]
    pub fn participant_for_producer(&self, producer_id: &ProducerId) -> Option<&Participant> {
        self.participants.values().find(|p| {
            p.audio_id.as_ref() == Some(producer_id)
                || p.video_id.as_ref() == Some(producer_id)
                || p.screen_id.as_ref() == Some(producer_id)
        })
    }

    /// The participant currently sharing the given screen producer.
    #[must_use]
    pub fn screen_owner(&self, screen_id: &ProducerId) -> Option<&Participant> {
        self.participants
            .values()
            .find(|p| p.screen_id.as_ref() == Some(screen_id))
    }

    // ---- streams -----------------------------------------------------------

    /// Insert or replace a stream descriptor, routed by kind.
    pub fn insert_stream(&mut self, descriptor: StreamDescriptor) {
        let map = match descriptor.kind {
            MediaKind::Audio => &mut self.audio_streams,
            MediaKind::Video => &mut self.video_streams,
        };
        map.insert(descriptor.producer_id.clone(), descriptor);
    }

    /// Remove a producer from the current and cached stream maps.
    ///
    /// Returns the removed current descriptor, if any.
    pub fn remove_stream(&mut self, producer_id: &ProducerId) -> Option<StreamDescriptor> {
        self.old_video_streams.remove(producer_id);
        self.audio_streams
            .remove(producer_id)
            .or_else(|| self.video_streams.remove(producer_id))
    }

    /// Look up a live video descriptor.
    #[must_use]
    pub fn video_stream(&self, producer_id: &ProducerId) -> Option<&StreamDescriptor> {
        self.video_streams.get(producer_id)
    }

    /// Look up a live audio descriptor.
    #[must_use]
    pub fn audio_stream(&self, producer_id: &ProducerId) -> Option<&StreamDescriptor> {
        self.audio_streams.get(producer_id)
    }

    /// Look up a cached video descriptor.
    #[must_use]
    pub fn old_video_stream(&self, producer_id: &ProducerId) -> Option<&StreamDescriptor> {
        self.old_video_streams.get(producer_id)
    }

    /// Cache a video descriptor for transport-churn fallback.
    pub fn cache_old_stream(&mut self, descriptor: StreamDescriptor) {
        self.old_video_streams
            .insert(descriptor.producer_id.clone(), descriptor);
    }

    /// The local self-view descriptor, if registered.
    #[must_use]
    pub fn local_video_stream(&self) -> Option<&StreamDescriptor> {
        self.video_streams.values().find(|d| d.producer_id.is_local())
    }

    /// Iterate live audio descriptors.
    pub fn audio_streams(&self) -> impl Iterator<Item = &StreamDescriptor> {
        self.audio_streams.values()
    }

    /// Iterate live video descriptors.
    pub fn video_streams(&self) -> impl Iterator<Item = &StreamDescriptor> {
        self.video_streams.values()
    }

    /// Iterate cached video descriptors.
    pub fn old_video_streams(&self) -> impl Iterator<Item = &StreamDescriptor> {
        self.old_video_streams.values()
    }

    // ---- breakout rooms ----------------------------------------------------

    /// Replace the breakout assignment table.
    pub fn set_breakout(&mut self, active: bool, assignments: Vec<BreakoutAssignment>) {
        self.breakout_active = active;
        self.breakout_rooms = assignments
            .into_iter()
            .map(|a| (a.participant_id, a.break_room))
            .collect();
    }

    /// Whether breakout rooms are currently active.
    #[must_use]
    pub fn breakout_active(&self) -> bool {
        self.breakout_active
    }

    /// Whether two participants share a breakout room.
    ///
    /// Unassigned participants count as members of the main room, so two
    /// unassigned participants are together.
    #[must_use]
    pub fn same_break_room(&self, a: &ParticipantId, b: &ParticipantId) -> bool {
        if !self.breakout_active {
            return true;
        }
        self.breakout_rooms.get(a) == self.breakout_rooms.get(b)
    }
}
