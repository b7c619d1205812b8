//! Loudness-driven promotion: decide per audio-level sample whether a
//! speaking participant enters the limited set (screen-share layouts) or
//! triggers a full reorder (everything else).

use signal_protocol::{MediaKind, ParticipantId, ProducerId};
use tokio::time::Instant;
use tracing::debug;

use crate::state::{CoordinatorState, EventType};

/// Midpoint of the 0-255 loudness scale; at or below is silence.
pub const SILENCE_MIDPOINT: f64 = 127.5;
/// Loudness moderately above silence, debounced by the normal interval.
pub const MODERATE_LOUDNESS_THRESHOLD: f64 = 128.5;
/// Sustained-speech loudness, debounced by the shorter fast interval.
pub const STRONG_LOUDNESS_THRESHOLD: f64 = 130.0;

impl CoordinatorState {
    /// Process one loudness sample for a participant.
    ///
    /// `add` promotes, `!add` demotes; `force` bypasses the demotion
    /// gating when the participant is confirmed muted; `average` is the
    /// sampled loudness on the 0-255 scale.
    pub async fn re_update_inter(
        &mut self,
        participant_id: ParticipantId,
        add: bool,
        force: bool,
        average: f64,
    ) {
        if self.registry.breakout_active()
            && !self
                .registry
                .same_break_room(&self.local_participant, &participant_id)
        {
            debug!(
                target: "sc.reorder",
                participant_id = %participant_id,
                "loudness sample from another break room, ignoring"
            );
            return;
        }

        if !self.screen.share_screen_started {
            // Promotion-only: a quiet participant never forces a full
            // reorder in grid layouts.
            if !add {
                return;
            }
            let elapsed = self.loudness.last_reorder_at.map(|at| at.elapsed());
            let normal_due = elapsed.is_none_or(|e| e >= self.config.reorder_interval);
            let fast_due = elapsed.is_none_or(|e| e >= self.config.fast_reorder_interval);
            let trigger = (average > STRONG_LOUDNESS_THRESHOLD && fast_due)
                || (average > MODERATE_LOUDNESS_THRESHOLD && normal_due);
            if !trigger {
                return;
            }

            self.loudness.last_reorder_at = Some(Instant::now());
            if self.event_type == EventType::Conference {
                self.on_screen_changes(true).await;
            } else {
                self.reorder_streams(false, true);
                self.process_consumer_transports(MediaKind::Audio).await;
                self.process_consumer_transports(MediaKind::Video).await;
            }
            return;
        }

        // Screen-share layout: membership changes, not full rebuilds.
        let Some(video_id) = self
            .registry
            .participant(&participant_id)
            .and_then(|p| p.video_id.clone())
        else {
            return;
        };

        let limit = self.page_limit();
        if add {
            if self.limited.contains(&video_id) {
                return;
            }
            while self.limited.len() >= limit {
                if !self.evict_oldest_loud() {
                    debug!(
                        target: "sc.reorder",
                        participant_id = %participant_id,
                        limit,
                        "limited set full of pinned streams, refusing admission"
                    );
                    return;
                }
            }
            self.limited.push_back(video_id);
            self.loudness.old_sound_ids.push(participant_id);
        } else {
            // Demotion only when confirmed muted, or when the set sits
            // above the page limit and has slack to give back.
            if !force && self.limited.len() <= limit {
                return;
            }
            if !self.limited.remove(&video_id) {
                return;
            }
            self.loudness
                .old_sound_ids
                .retain(|id| *id != participant_id);
        }

        self.ui.refresh_grid(false);
        self.process_consumer_transports(MediaKind::Video).await;
    }

    /// Evict the oldest loudness-admitted, non-pinned stream from the
    /// limited set. Returns false when nothing is evictable.
    fn evict_oldest_loud(&mut self) -> bool {
        let mut victim: Option<(ParticipantId, ProducerId)> = None;
        for candidate in &self.loudness.old_sound_ids {
            let Some(video_id) = self
                .registry
                .participant(candidate)
                .and_then(|p| p.video_id.clone())
            else {
                continue;
            };
            if self.limited.contains(&video_id) && !self.limited.is_pinned(&video_id) {
                victim = Some((*candidate, video_id));
                break;
            }
        }
        match victim {
            Some((participant_id, video_id)) => {
                self.limited.remove(&video_id);
                self.loudness
                    .old_sound_ids
                    .retain(|id| *id != participant_id);
                debug!(
                    target: "sc.reorder",
                    participant_id = %participant_id,
                    producer_id = %video_id,
                    "evicted oldest loudness-admitted stream"
                );
                true
            }
            None => false,
        }
    }
}
