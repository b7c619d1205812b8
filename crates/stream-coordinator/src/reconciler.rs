//! Transport reconciliation: pause transports that fell out of the
//! should-be-live set, resume the ones that re-entered it.
//!
//! Pause is applied locally first and signaled fire-and-forget; resume is
//! signaled first and applied locally only on a positive server ack. The
//! pass is best-effort, not transactional: every per-transport step runs as
//! its own tracked task, all outcomes are awaited and logged, and a crash
//! mid-pass just leaves work for the next triggering event.

use std::collections::HashSet;
use std::sync::Arc;

use signal_protocol::{MediaKind, ProducerId};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::errors::CoordinatorError;
use crate::state::CoordinatorState;

/// Outcome counts of one reconciliation pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Consumers paused locally and signaled.
    pub paused: usize,
    /// Consumers resumed after a positive server ack.
    pub resumed: usize,
    /// Resume requests the server declined; consumers stay paused.
    pub left_paused: usize,
    /// Steps that failed outright (logged, not propagated).
    pub failed: usize,
}

/// Outcome of one per-transport step.
enum StepOutcome {
    Paused,
    Resumed,
    LeftPaused,
}

impl CoordinatorState {
    /// Producer ids whose audio should be actively consumed: the limited
    /// set plus every audio stream whose owner shares this client's
    /// breakout room. Audio with no resolvable owner keeps flowing.
    pub(crate) fn live_audio_ids(&self) -> HashSet<ProducerId> {
        let mut ids: HashSet<ProducerId> = self.limited.iter().cloned().collect();
        for descriptor in self.registry.audio_streams() {
            let eligible = match self.registry.participant_for_producer(&descriptor.producer_id) {
                Some(owner) => self
                    .registry
                    .same_break_room(&self.local_participant, &owner.id),
                None => true,
            };
            if eligible {
                ids.insert(descriptor.producer_id.clone());
            }
        }
        ids
    }

    /// Producer ids whose video should be actively consumed: the union of
    /// the limited set, the cached old streams, and the active screen
    /// producer.
    pub(crate) fn live_video_ids(&self) -> HashSet<ProducerId> {
        let mut ids: HashSet<ProducerId> = self.limited.iter().cloned().collect();
        for descriptor in self.registry.old_video_streams() {
            ids.insert(descriptor.producer_id.clone());
        }
        if let Some(screen_id) = &self.screen.screen_id {
            ids.insert(screen_id.clone());
        }
        ids
    }

    /// Reconcile every transport of the given kind against the current
    /// should-be-live set.
    ///
    /// Audio and video reconcile independently; transports of the other
    /// kind are untouched. A short fixed delay runs first to dampen churn
    /// from rapid topology flips.
    pub async fn process_consumer_transports(&self, kind: MediaKind) -> ReconcileSummary {
        let live = match kind {
            MediaKind::Audio => self.live_audio_ids(),
            MediaKind::Video => self.live_video_ids(),
        };

        tokio::time::sleep(self.config.pause_debounce).await;

        let mut tasks: JoinSet<Result<StepOutcome, CoordinatorError>> = JoinSet::new();

        for entry in self.transports.iter() {
            if entry.consumer.kind() != kind {
                continue;
            }

            let in_live = live.contains(&entry.producer_id);
            let paused = entry.consumer.is_paused();

            if paused && in_live {
                let consumer = Arc::clone(&entry.consumer);
                let signaling = self.signaling.clone();
                let server_consumer_id = entry.server_consumer_id.clone();
                let producer_id = entry.producer_id.clone();
                tasks.spawn(async move {
                    // Resume is ack-gated: never un-pause locally before
                    // the server confirms it resumed forwarding.
                    let ack = signaling.consumer_resume(server_consumer_id).await?;
                    if ack.resumed {
                        consumer.resume()?;
                        Ok(StepOutcome::Resumed)
                    } else {
                        warn!(
                            target: "sc.reconcile",
                            producer_id = %producer_id,
                            "server declined resume, consumer stays paused"
                        );
                        Ok(StepOutcome::LeftPaused)
                    }
                });
            } else if !paused && !in_live && !entry.producer_id.is_empty() {
                let consumer = Arc::clone(&entry.consumer);
                let signaling = self.signaling.clone();
                let server_consumer_id = entry.server_consumer_id.clone();
                tasks.spawn(async move {
                    // Pause fails safe: apply locally, then notify the
                    // server without waiting for an ack.
                    consumer.pause()?;
                    signaling.consumer_pause(server_consumer_id).await?;
                    Ok(StepOutcome::Paused)
                });
            }
        }

        let mut summary = ReconcileSummary::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(StepOutcome::Paused)) => summary.paused += 1,
                Ok(Ok(StepOutcome::Resumed)) => summary.resumed += 1,
                Ok(Ok(StepOutcome::LeftPaused)) => summary.left_paused += 1,
                Ok(Err(e)) => {
                    summary.failed += 1;
                    warn!(
                        target: "sc.reconcile",
                        kind = kind.as_str(),
                        error = %e,
                        "reconciliation step failed"
                    );
                }
                Err(e) => {
                    summary.failed += 1;
                    warn!(
                        target: "sc.reconcile",
                        kind = kind.as_str(),
                        error = %e,
                        "reconciliation task aborted"
                    );
                }
            }
        }

        self.metrics.record_reconcile(&summary);
        debug!(
            target: "sc.reconcile",
            kind = kind.as_str(),
            paused = summary.paused,
            resumed = summary.resumed,
            left_paused = summary.left_paused,
            failed = summary.failed,
            "reconciliation pass complete"
        );
        summary
    }
}
