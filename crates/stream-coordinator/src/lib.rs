//! Limelight Stream Coordinator
//!
//! Client-side coordination of remote audio/video streams for an
//! SFU-backed conference room. For every remote producer the coordinator
//! decides:
//!
//! - which consumer transports are actively consuming versus paused
//! - which streams are promoted into the bounded on-screen "limited" set
//! - how `new-producer` / `producer-closed` signaling drives re-layout
//!
//! # Architecture
//!
//! All mutable room state is owned by a single actor:
//!
//! ```text
//! CoordinatorActor (one per joined room)
//! ├── owns CoordinatorState
//! │   ├── StreamRegistry     (participants + stream descriptors)
//! │   ├── TransportRegistry  (live consumer transports)
//! │   └── LimitedStreamSet   (bounded promoted-stream working set)
//! ├── creates consumers through the injected ConsumerFactory
//! └── emits UiEvents and signaling commands through channel seams
//! ```
//!
//! Messages are processed one at a time, so reconciliation passes are
//! serialized end-to-end and never observe each other's partial writes.
//!
//! # Key Design Decisions
//!
//! - **Stable participant ids**: participants are keyed by uuid; display
//!   names are metadata and never used for matching
//! - **Ack-gated resume**: a consumer is only resumed locally after the
//!   server confirms it resumed forwarding
//! - **Best-effort reconciliation**: per-transport steps run in a tracked
//!   task set; partial failures are observable, logged, and recovered by
//!   the next triggering event
//!
//! # Modules
//!
//! - [`actors`] - the coordinator actor, its mailbox, and metrics
//! - [`registry`] - participants and stream descriptors
//! - [`selector`] - the limited-set reorder engine
//! - [`reconciler`] - pause/resume reconciliation of consumer transports
//! - [`lifecycle`] - producer creation and teardown
//! - [`loudness`] - loudness-driven promotion and eviction
//! - [`transitions`] - screen-share/whiteboard transitions and the
//!   recording snapshot hook
//! - [`transport`] - SFU collaborator contracts
//! - [`config`] - configuration from environment

pub mod actors;
pub mod config;
pub mod errors;
pub mod lifecycle;
pub mod loudness;
pub mod reconciler;
pub mod registry;
pub mod selector;
pub mod state;
pub mod transitions;
pub mod transport;
pub mod ui;

pub use actors::{CoordinatorActor, CoordinatorHandle, StateSnapshot};
pub use config::CoordinatorConfig;
pub use errors::CoordinatorError;
pub use reconciler::ReconcileSummary;
pub use registry::{BreakoutAssignment, Participant, StreamDescriptor, StreamRegistry};
pub use selector::LimitedStreamSet;
pub use state::{CoordinatorState, DisplayMode, EventType};
pub use transitions::ClosedKind;
pub use transport::{
    ConsumerControl, ConsumerFactory, ConsumerTransport, TransportControl, TransportError,
    TransportRegistry,
};
pub use ui::{UiEvent, UiEventSender};
