//! Driver trait for abstracting platform I/O.
//!
//! The [`Driver`] trait decouples the application runtime from specific bus
//! and UI implementations. Each frontend implements the trait to provide
//! platform-specific I/O, while the generic [`crate::Runtime`] handles all
//! orchestration.

use std::future::Future;

use crate::App;

/// Abstracts bus and rendering I/O for the application runtime.
///
/// Implementations bind whatever bus client and surface are available (an
/// MQTT binding plus a terminal in production, the in-memory bus in
/// simulation) while the generic [`Runtime`](crate::Runtime) runs the same
/// orchestration logic everywhere.
///
/// # Contract
///
/// - `poll_delivery` must resolve promptly with `None` when nothing is
///   pending; the runtime interleaves it with intent processing and the
///   announce timer, so an unbounded wait would starve both.
/// - `is_connected` reflects the live link; the runtime watches it for
///   transitions and drives the client's connect/disconnect lifecycle.
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Establish the bus connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    fn connect(&mut self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Whether the bus link is currently up.
    fn is_connected(&self) -> bool;

    /// Subscribe to a bus topic.
    ///
    /// # Errors
    ///
    /// Returns an error if the subscription cannot be registered.
    fn subscribe(&mut self, topic: &str) -> Result<(), Self::Error>;

    /// Publish a payload to a bus topic. Fire-and-forget.
    ///
    /// # Errors
    ///
    /// Returns an error if the link rejects the publish outright; silent
    /// loss on a flaky link is expected and not an error.
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), Self::Error>;

    /// Poll for the next inbound delivery as `(topic, payload)`.
    ///
    /// Returns `None` promptly when nothing is pending.
    fn poll_delivery(&mut self) -> impl Future<Output = Option<(String, Vec<u8>)>> + Send;

    /// Current wall-clock time in unix millis, for the announce timer.
    fn now_millis(&self) -> u64;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Stop the connection and clean up resources.
    fn stop(&mut self);
}
