//! Fake SFU primitives: consumers, transports, and the consumer factory.
//!
//! Pause/close state lives in atomics so tests can assert on it after the
//! coordinator has taken ownership of the `Arc`s.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use signal_protocol::{MediaKind, ProducerId};
use stream_coordinator::{
    ConsumerControl, ConsumerFactory, ConsumerTransport, TransportControl, TransportError,
};

/// Fake consumer with observable pause/close state and call counters.
#[derive(Debug)]
pub struct FakeConsumer {
    kind: MediaKind,
    paused: AtomicBool,
    closed: AtomicBool,
    pause_calls: AtomicUsize,
    resume_calls: AtomicUsize,
    fail_close: AtomicBool,
}

impl FakeConsumer {
    /// Create an unpaused fake consumer of the given kind.
    #[must_use]
    pub fn new(kind: MediaKind) -> Self {
        Self {
            kind,
            paused: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            pause_calls: AtomicUsize::new(0),
            resume_calls: AtomicUsize::new(0),
            fail_close: AtomicBool::new(false),
        }
    }

    /// Start the consumer in the paused state.
    #[must_use]
    pub fn paused(kind: MediaKind) -> Self {
        let consumer = Self::new(kind);
        consumer.paused.store(true, Ordering::SeqCst);
        consumer
    }

    /// Make subsequent `close()` calls fail.
    pub fn fail_on_close(&self) {
        self.fail_close.store(true, Ordering::SeqCst);
    }

    /// Whether `close()` was called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Number of `pause()` calls.
    #[must_use]
    pub fn pause_calls(&self) -> usize {
        self.pause_calls.load(Ordering::SeqCst)
    }

    /// Number of `resume()` calls.
    #[must_use]
    pub fn resume_calls(&self) -> usize {
        self.resume_calls.load(Ordering::SeqCst)
    }
}

impl ConsumerControl for FakeConsumer {
    fn kind(&self) -> MediaKind {
        self.kind
    }

    fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    fn pause(&self) -> Result<(), TransportError> {
        self.pause_calls.fetch_add(1, Ordering::SeqCst);
        self.paused.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn resume(&self) -> Result<(), TransportError> {
        self.resume_calls.fetch_add(1, Ordering::SeqCst);
        self.paused.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn close(&self) -> Result<(), TransportError> {
        self.closed.store(true, Ordering::SeqCst);
        if self.fail_close.load(Ordering::SeqCst) {
            Err(TransportError::AlreadyClosed)
        } else {
            Ok(())
        }
    }
}

/// Fake transport with observable close state.
#[derive(Debug, Default)]
pub struct FakeTransport {
    closed: AtomicBool,
    fail_close: AtomicBool,
}

impl FakeTransport {
    /// Create an open fake transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `close()` calls fail.
    pub fn fail_on_close(&self) {
        self.fail_close.store(true, Ordering::SeqCst);
    }

    /// Whether `close()` was called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl TransportControl for FakeTransport {
    fn close(&self) -> Result<(), TransportError> {
        self.closed.store(true, Ordering::SeqCst);
        if self.fail_close.load(Ordering::SeqCst) {
            Err(TransportError::AlreadyClosed)
        } else {
            Ok(())
        }
    }
}

/// Fake consumer factory that records every created consumer.
///
/// Media kind is derived from the producer id: ids starting with `aud`
/// yield audio consumers, everything else yields video.
#[derive(Debug, Default)]
pub struct FakeConsumerFactory {
    fail_create: AtomicBool,
    created: Mutex<Vec<ProducerId>>,
    consumers: Mutex<HashMap<ProducerId, Arc<FakeConsumer>>>,
}

impl FakeConsumerFactory {
    /// Create a factory that accepts every producer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `create_consumer` calls fail.
    pub fn fail_on_create(&self) {
        self.fail_create.store(true, Ordering::SeqCst);
    }

    /// Producer ids in creation order.
    #[must_use]
    pub fn created(&self) -> Vec<ProducerId> {
        self.created.lock().unwrap().clone()
    }

    /// Number of consumers created.
    #[must_use]
    pub fn created_count(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    /// The fake consumer created for a producer, if any.
    #[must_use]
    pub fn consumer(&self, producer_id: &ProducerId) -> Option<Arc<FakeConsumer>> {
        self.consumers.lock().unwrap().get(producer_id).cloned()
    }
}

impl ConsumerFactory for FakeConsumerFactory {
    fn create_consumer(
        &self,
        producer_id: &ProducerId,
    ) -> impl Future<Output = Result<ConsumerTransport, TransportError>> + Send {
        let result = if self.fail_create.load(Ordering::SeqCst) {
            Err(TransportError::Sdk("fake create failure".to_string()))
        } else {
            let kind = if producer_id.as_str().starts_with("aud") {
                MediaKind::Audio
            } else {
                MediaKind::Video
            };
            let consumer = Arc::new(FakeConsumer::new(kind));
            self.created.lock().unwrap().push(producer_id.clone());
            self.consumers
                .lock()
                .unwrap()
                .insert(producer_id.clone(), Arc::clone(&consumer));
            Ok(ConsumerTransport {
                producer_id: producer_id.clone(),
                server_consumer_id: format!("sct-{producer_id}"),
                transport: Arc::new(FakeTransport::new()),
                consumer,
            })
        };
        async move { result }
    }
}
