//! Shared identifier and media types.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Sentinel producer id the server uses for the local self-view video tile.
pub const LOCAL_PRODUCER_ID: &str = "youyou";

/// Alternate self-view sentinel (used by older server versions).
pub const LOCAL_PRODUCER_ID_ALT: &str = "youyouyou";

/// Identifier of a media producer (one published track), unique per track.
///
/// Producer ids are assigned by the SFU and are opaque strings, except for
/// the two self-view sentinels which never correspond to a remote track.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProducerId(String);

impl ProducerId {
    /// Wrap a raw producer id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The self-view sentinel id.
    #[must_use]
    pub fn local() -> Self {
        Self(LOCAL_PRODUCER_ID.to_string())
    }

    /// Whether this id denotes the local self-view rather than a remote track.
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.0 == LOCAL_PRODUCER_ID || self.0 == LOCAL_PRODUCER_ID_ALT
    }

    /// Whether the id is the empty string (no producer bound).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The raw id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProducerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProducerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ProducerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Stable identifier for a room participant.
///
/// Display names are metadata only and must never be used as a key; two
/// participants may share a display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantId(pub Uuid);

impl ParticipantId {
    /// Create a new random participant ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ParticipantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Participant privilege level carried as `islevel` on the wire
/// ("0" | "1" | "2", where "2" is the host).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostLevel {
    /// Regular attendee.
    #[serde(rename = "0")]
    Guest,
    /// Co-host with elevated permissions.
    #[serde(rename = "1")]
    CoHost,
    /// Room host.
    #[serde(rename = "2")]
    Host,
}

impl HostLevel {
    /// Whether this level denotes the room host.
    #[must_use]
    pub const fn is_host(self) -> bool {
        matches!(self, HostLevel::Host)
    }
}

/// Media kind of a producer or consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Audio track.
    Audio,
    /// Video track.
    Video,
}

impl MediaKind {
    /// Returns the kind as a string for log labels.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
        }
    }
}
