//! Transport Adapter interface over the pub/sub bus.
//!
//! The core never talks to a broker directly; it consumes this interface.
//! Implementations bind whatever bus client is available (an MQTT or NATS
//! binding in production, the in-memory `SimBus` from `banter-harness` in
//! tests). Delivery is push-style: the adapter hands [`Delivery`] values to
//! the runtime, which feeds them into the client as
//! [`crate::ClientEvent::Delivery`].
//!
//! The bus is best-effort only: no acknowledgement, no ordering guarantee
//! across topics, no retained messages, and publishes while disconnected are
//! simply lost.

use thiserror::Error;

use crate::ClientEvent;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection could not be established.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Operation requires a live connection.
    #[error("not connected")]
    NotConnected,

    /// The connection was closed.
    #[error("connection closed: {0}")]
    Closed(String),
}

/// A raw payload delivered from the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Topic the payload arrived on.
    pub topic: String,
    /// Raw UTF-8 JSON payload.
    pub payload: Vec<u8>,
}

impl From<Delivery> for ClientEvent {
    fn from(delivery: Delivery) -> Self {
        ClientEvent::Delivery { topic: delivery.topic, payload: delivery.payload }
    }
}

/// Publish/subscribe bus adapter consumed by the runtime.
///
/// Subscriptions live for the process lifetime; there is no unsubscribe in
/// this design (rooms are never left individually). On reconnect the runtime
/// replays the subscription set from client state.
pub trait BusTransport: Send {
    /// Whether the underlying connection is currently established.
    fn is_connected(&self) -> bool;

    /// Subscribe to a topic.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::NotConnected`] if there is no live
    /// connection; the caller re-subscribes after the next connect.
    fn subscribe(&mut self, topic: &str) -> Result<(), TransportError>;

    /// Publish a payload to a topic. Fire-and-forget.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::NotConnected`] if there is no live
    /// connection. Callers treat this as silent degradation, not a failure
    /// of the triggering operation.
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError>;
}
