//! Outbound client commands.
//!
//! Pause is fire-and-forget; resume is acknowledgment-gated. The asymmetry
//! is intentional: pausing fails safe (worst case a briefly frozen tile),
//! while resuming an unauthorized stream must not happen client-side before
//! the server confirms it.

use serde::{Deserialize, Serialize};

/// A command sent to the signaling server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientCommand {
    /// Ask the server to stop forwarding a consumer.
    #[serde(rename = "consumer-pause")]
    ConsumerPause(ConsumerPause),

    /// Ask the server to resume forwarding a consumer. The server replies
    /// with a [`ResumeAck`].
    #[serde(rename = "consumer-resume")]
    ConsumerResume(ConsumerResume),
}

/// Payload of `consumer-pause`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerPause {
    /// Server-side consumer id to pause.
    #[serde(rename = "serverConsumerId")]
    pub server_consumer_id: String,
}

/// Payload of `consumer-resume`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerResume {
    /// Server-side consumer id to resume.
    #[serde(rename = "serverConsumerId")]
    pub server_consumer_id: String,
}

/// Server acknowledgment of a `consumer-resume`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeAck {
    /// Whether the server resumed forwarding. `false` means the client must
    /// leave the local consumer paused.
    pub resumed: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_consumer_pause_wire_format() {
        let cmd = ClientCommand::ConsumerPause(ConsumerPause {
            server_consumer_id: "sct-12".to_string(),
        });
        assert_eq!(
            serde_json::to_value(&cmd).unwrap(),
            json!({
                "event": "consumer-pause",
                "data": { "serverConsumerId": "sct-12" }
            })
        );
    }

    #[test]
    fn test_consumer_resume_wire_format() {
        let cmd = ClientCommand::ConsumerResume(ConsumerResume {
            server_consumer_id: "sct-34".to_string(),
        });
        assert_eq!(
            serde_json::to_value(&cmd).unwrap(),
            json!({
                "event": "consumer-resume",
                "data": { "serverConsumerId": "sct-34" }
            })
        );
    }

    #[test]
    fn test_resume_ack_wire_format() {
        let ack: ResumeAck = serde_json::from_value(json!({ "resumed": true })).unwrap();
        assert!(ack.resumed);

        let ack: ResumeAck = serde_json::from_value(json!({ "resumed": false })).unwrap();
        assert!(!ack.resumed);
    }
}
