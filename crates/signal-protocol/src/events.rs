//! Inbound server events.
//!
//! The signaling server pushes these over the socket when room topology
//! changes. They are the only inputs that drive consumer-transport creation
//! and teardown on the client.

use crate::types::{HostLevel, ProducerId};
use serde::{Deserialize, Serialize};

/// An event pushed by the signaling server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// A remote track became available for consumption.
    #[serde(rename = "new-producer")]
    NewProducer(NewProducer),

    /// A remote track was torn down.
    #[serde(rename = "producer-closed")]
    ProducerClosed(ProducerClosed),
}

/// Payload of `new-producer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProducer {
    /// Id of the newly published track.
    #[serde(rename = "producerId")]
    pub producer_id: ProducerId,
    /// Privilege level of the publishing participant.
    #[serde(rename = "islevel")]
    pub host_level: HostLevel,
}

/// Payload of `producer-closed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProducerClosed {
    /// Id of the track that was torn down.
    #[serde(rename = "remoteProducerId")]
    pub remote_producer_id: ProducerId,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_producer_wire_format() {
        let wire = json!({
            "event": "new-producer",
            "data": { "producerId": "prod-1", "islevel": "2" }
        });

        let event: ServerEvent = serde_json::from_value(wire.clone()).unwrap();
        assert_eq!(
            event,
            ServerEvent::NewProducer(NewProducer {
                producer_id: ProducerId::from("prod-1"),
                host_level: HostLevel::Host,
            })
        );

        assert_eq!(serde_json::to_value(&event).unwrap(), wire);
    }

    #[test]
    fn test_producer_closed_wire_format() {
        let wire = json!({
            "event": "producer-closed",
            "data": { "remoteProducerId": "prod-9" }
        });

        let event: ServerEvent = serde_json::from_value(wire.clone()).unwrap();
        assert_eq!(
            event,
            ServerEvent::ProducerClosed(ProducerClosed {
                remote_producer_id: ProducerId::from("prod-9"),
            })
        );

        assert_eq!(serde_json::to_value(&event).unwrap(), wire);
    }

    #[test]
    fn test_unknown_event_rejected() {
        let wire = json!({ "event": "mystery", "data": {} });
        assert!(serde_json::from_value::<ServerEvent>(wire).is_err());
    }
}
