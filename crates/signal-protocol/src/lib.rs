//! Signaling protocol for Limelight.
//!
//! This crate defines the messages exchanged with the SFU signaling server
//! over the persistent socket connection, and the typed channel seam the
//! coordinator uses to emit them:
//!
//! - [`events`] - inbound server events (`new-producer`, `producer-closed`)
//! - [`commands`] - outbound client commands (`consumer-pause`,
//!   `consumer-resume`) and the resume acknowledgment
//! - [`channel`] - [`SignalingHandle`](channel::SignalingHandle), the
//!   request/reply seam between the coordinator and the socket writer
//! - [`types`] - shared id newtypes and media enums
//!
//! Wire representation is JSON; field names follow the server's camelCase
//! convention (`producerId`, `islevel`, `remoteProducerId`,
//! `serverConsumerId`).

#![warn(clippy::pedantic)]

pub mod channel;
pub mod commands;
pub mod events;
pub mod types;

pub use channel::{SignalError, SignalRequest, SignalingHandle};
pub use commands::{ClientCommand, ConsumerPause, ConsumerResume, ResumeAck};
pub use events::{NewProducer, ProducerClosed, ServerEvent};
pub use types::{HostLevel, MediaKind, ParticipantId, ProducerId};
