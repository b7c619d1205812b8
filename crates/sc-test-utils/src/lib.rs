//! # Stream Coordinator Test Utilities
//!
//! Shared fakes and fixtures for testing the Limelight stream coordinator
//! without a real SFU or signaling server.
//!
//! ## Modules
//!
//! - `mock_sfu` - fake consumers, transports, and the consumer factory
//! - `mock_signaling` - mock signaling endpoint recording pause/resume
//!   traffic with configurable resume acks
//! - `fixtures` - participant builders and a fully wired coordinator state
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sc_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() {
//!     let mut room = TestCoordinator::new();
//!     let host = room.join(
//!         TestParticipant::new("host")
//!             .with_video("vid-host")
//!             .with_host_level(HostLevel::Host)
//!             .build(),
//!     );
//!
//!     room.state.reorder_streams(false, false);
//!     // assert on room.state.limited, room.signaling.commands(), ...
//! }
//! ```

pub mod fixtures;
pub mod mock_sfu;
pub mod mock_signaling;

pub use fixtures::{TestCoordinator, TestParticipant};
pub use mock_sfu::{FakeConsumer, FakeConsumerFactory, FakeTransport};
pub use mock_signaling::{MockSignaling, RecordedCommand};

/// Install a log subscriber for test output, honoring `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs.
pub fn init_test_logging() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}
