//! Actor model for room coordination.
//!
//! A single `CoordinatorActor` owns all mutable room state and processes
//! mailbox messages one at a time, which serializes reconciliation passes
//! end-to-end. Callers hold a cheap cloneable `CoordinatorHandle`.

pub mod coordinator;
pub mod messages;
pub mod metrics;

pub use coordinator::{CoordinatorActor, CoordinatorHandle};
pub use messages::{CoordinatorMessage, StateSnapshot};
pub use metrics::{CoordinatorMetrics, MetricsSnapshot};
