//! Consumer transport contracts and registry.
//!
//! The SFU SDK's device/transport/consumer primitives are external
//! collaborators; this module defines only the contract the coordinator
//! needs from them: pause/resume/close with readable pause state, plus a
//! factory that binds a remote producer to a new consumer transport.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use signal_protocol::{MediaKind, ProducerId};
use thiserror::Error;

/// Errors surfaced by transport/consumer operations.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The underlying object was already closed. Close is idempotent at the
    /// coordinator level, so this is usually only logged.
    #[error("already closed")]
    AlreadyClosed,

    /// A second transport was offered for a producer that already has one.
    #[error("duplicate transport for producer {0}")]
    DuplicateProducer(ProducerId),

    /// Opaque SDK failure.
    #[error("sdk error: {0}")]
    Sdk(String),
}

/// Contract for the receive-side consumer bound to one remote producer.
///
/// `pause`/`resume` act locally and synchronously; server-side forwarding is
/// negotiated separately over the signaling channel.
pub trait ConsumerControl: Send + Sync {
    /// Media kind of the consumed track.
    fn kind(&self) -> MediaKind;

    /// Whether the consumer is currently paused locally.
    fn is_paused(&self) -> bool;

    /// Pause local consumption.
    fn pause(&self) -> Result<(), TransportError>;

    /// Resume local consumption.
    fn resume(&self) -> Result<(), TransportError>;

    /// Close the consumer. Must be idempotent.
    fn close(&self) -> Result<(), TransportError>;
}

/// Contract for the underlying receive transport object.
pub trait TransportControl: Send + Sync {
    /// Close the transport. Must be idempotent.
    fn close(&self) -> Result<(), TransportError>;
}

/// One client-side receive transport/consumer pair bound to a single remote
/// producer.
#[derive(Clone)]
pub struct ConsumerTransport {
    /// The remote producer this transport consumes.
    pub producer_id: ProducerId,
    /// Server-side consumer id, carried in pause/resume signaling.
    pub server_consumer_id: String,
    /// The underlying transport object.
    pub transport: Arc<dyn TransportControl>,
    /// The consumer bound to the transport.
    pub consumer: Arc<dyn ConsumerControl>,
}

impl fmt::Debug for ConsumerTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsumerTransport")
            .field("producer_id", &self.producer_id)
            .field("server_consumer_id", &self.server_consumer_id)
            .field("kind", &self.consumer.kind())
            .field("paused", &self.consumer.is_paused())
            .finish_non_exhaustive()
    }
}

/// Collaborator that signals a new consumer transport into existence for a
/// remote producer (SDK + server round trip).
pub trait ConsumerFactory: Send + Sync + 'static {
    /// Create a bound consumer transport for the given remote producer.
    fn create_consumer(
        &self,
        producer_id: &ProducerId,
    ) -> impl Future<Output = Result<ConsumerTransport, TransportError>> + Send;
}

// Lets callers keep a handle on a shared factory after moving a clone into
// the coordinator actor.
impl<F: ConsumerFactory> ConsumerFactory for Arc<F> {
    fn create_consumer(
        &self,
        producer_id: &ProducerId,
    ) -> impl Future<Output = Result<ConsumerTransport, TransportError>> + Send {
        self.as_ref().create_consumer(producer_id)
    }
}

/// The set of live consumer transports, at most one per producer id.
#[derive(Debug, Default)]
pub struct TransportRegistry {
    entries: Vec<ConsumerTransport>,
}

impl TransportRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a transport exists for the given producer.
    #[must_use]
    pub fn contains(&self, producer_id: &ProducerId) -> bool {
        self.entries.iter().any(|t| &t.producer_id == producer_id)
    }

    /// Look up the transport for a producer.
    #[must_use]
    pub fn get(&self, producer_id: &ProducerId) -> Option<&ConsumerTransport> {
        self.entries.iter().find(|t| &t.producer_id == producer_id)
    }

    /// Insert a transport, enforcing the one-per-producer invariant.
    pub fn insert(&mut self, transport: ConsumerTransport) -> Result<(), TransportError> {
        if self.contains(&transport.producer_id) {
            return Err(TransportError::DuplicateProducer(transport.producer_id));
        }
        self.entries.push(transport);
        Ok(())
    }

    /// Remove and return the transport for a producer, if any.
    pub fn remove(&mut self, producer_id: &ProducerId) -> Option<ConsumerTransport> {
        let index = self
            .entries
            .iter()
            .position(|t| &t.producer_id == producer_id)?;
        Some(self.entries.remove(index))
    }

    /// Iterate live transports.
    pub fn iter(&self) -> impl Iterator<Item = &ConsumerTransport> {
        self.entries.iter()
    }

    /// Number of live transports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no transports are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct StubConsumer {
        paused: AtomicBool,
    }

    impl ConsumerControl for StubConsumer {
        fn kind(&self) -> MediaKind {
            MediaKind::Video
        }
        fn is_paused(&self) -> bool {
            self.paused.load(Ordering::SeqCst)
        }
        fn pause(&self) -> Result<(), TransportError> {
            self.paused.store(true, Ordering::SeqCst);
            Ok(())
        }
        fn resume(&self) -> Result<(), TransportError> {
            self.paused.store(false, Ordering::SeqCst);
            Ok(())
        }
        fn close(&self) -> Result<(), TransportError> {
            Ok(())
        }
    }

    struct StubTransport;

    impl TransportControl for StubTransport {
        fn close(&self) -> Result<(), TransportError> {
            Ok(())
        }
    }

    fn transport(producer_id: &str) -> ConsumerTransport {
        ConsumerTransport {
            producer_id: ProducerId::from(producer_id),
            server_consumer_id: format!("sct-{producer_id}"),
            transport: Arc::new(StubTransport),
            consumer: Arc::new(StubConsumer { paused: AtomicBool::new(false) }),
        }
    }

    #[test]
    fn test_one_transport_per_producer() {
        let mut registry = TransportRegistry::new();
        registry.insert(transport("prod-1")).unwrap();

        let err = registry.insert(transport("prod-1")).unwrap_err();
        assert!(matches!(err, TransportError::DuplicateProducer(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut registry = TransportRegistry::new();
        registry.insert(transport("prod-2")).unwrap();

        assert!(registry.remove(&ProducerId::from("prod-2")).is_some());
        assert!(registry.remove(&ProducerId::from("prod-2")).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_lookup() {
        let mut registry = TransportRegistry::new();
        registry.insert(transport("prod-3")).unwrap();

        assert!(registry.contains(&ProducerId::from("prod-3")));
        assert_eq!(
            registry.get(&ProducerId::from("prod-3")).unwrap().server_consumer_id,
            "sct-prod-3"
        );
        assert!(!registry.contains(&ProducerId::from("prod-4")));
    }
}
