//! Coordinator metrics: atomics shared between the actor and callers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::reconciler::ReconcileSummary;

/// Shared counters for coordinator throughput and reconciliation outcomes.
#[derive(Debug, Default)]
pub struct CoordinatorMetrics {
    /// Total limited-set rebuilds (full and incremental).
    pub reorders: AtomicU64,
    /// Total reconciliation passes run.
    pub reconcile_passes: AtomicU64,
    /// Consumers paused across all passes.
    pub consumers_paused: AtomicU64,
    /// Consumers resumed across all passes.
    pub consumers_resumed: AtomicU64,
    /// Resume requests the server declined.
    pub resumes_denied: AtomicU64,
    /// Per-transport reconciliation steps that failed.
    pub reconcile_failures: AtomicU64,
    /// Consumer transports created over the session.
    pub producers_created: AtomicU64,
    /// Consumer transports closed over the session.
    pub producers_closed: AtomicU64,
    /// Total mailbox messages processed.
    pub messages_processed: AtomicU64,
}

impl CoordinatorMetrics {
    /// Create a new shared metrics instance.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Record one limited-set rebuild.
    pub fn record_reorder(&self) {
        self.reorders.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the outcome of one reconciliation pass.
    pub fn record_reconcile(&self, summary: &ReconcileSummary) {
        self.reconcile_passes.fetch_add(1, Ordering::Relaxed);
        self.consumers_paused
            .fetch_add(summary.paused as u64, Ordering::Relaxed);
        self.consumers_resumed
            .fetch_add(summary.resumed as u64, Ordering::Relaxed);
        self.resumes_denied
            .fetch_add(summary.left_paused as u64, Ordering::Relaxed);
        self.reconcile_failures
            .fetch_add(summary.failed as u64, Ordering::Relaxed);
    }

    /// Record a consumer transport being created.
    pub fn record_producer_created(&self) {
        self.producers_created.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a consumer transport being closed.
    pub fn record_producer_closed(&self) {
        self.producers_closed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a mailbox message being processed.
    pub fn record_message_processed(&self) {
        self.messages_processed.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time copy of all counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            reorders: self.reorders.load(Ordering::Relaxed),
            reconcile_passes: self.reconcile_passes.load(Ordering::Relaxed),
            consumers_paused: self.consumers_paused.load(Ordering::Relaxed),
            consumers_resumed: self.consumers_resumed.load(Ordering::Relaxed),
            resumes_denied: self.resumes_denied.load(Ordering::Relaxed),
            reconcile_failures: self.reconcile_failures.load(Ordering::Relaxed),
            producers_created: self.producers_created.load(Ordering::Relaxed),
            producers_closed: self.producers_closed.load(Ordering::Relaxed),
            messages_processed: self.messages_processed.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`CoordinatorMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub reorders: u64,
    pub reconcile_passes: u64,
    pub consumers_paused: u64,
    pub consumers_resumed: u64,
    pub resumes_denied: u64,
    pub reconcile_failures: u64,
    pub producers_created: u64,
    pub producers_closed: u64,
    pub messages_processed: u64,
}
