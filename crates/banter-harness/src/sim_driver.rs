//! Simulated driver for running the application runtime against [`SimBus`].

use std::collections::VecDeque;

use banter_app::{App, Driver};
use banter_client::transport::{BusTransport, TransportError};
use banter_core::env::Environment;

use crate::{BusHandle, SimEnv};

/// Driver implementation backed by the in-memory bus and virtual clock.
///
/// Renders are dropped rather than drawn; tests assert on bus traffic and
/// store contents, not pixels.
pub struct SimDriver {
    handle: BusHandle,
    env: SimEnv,
    pending: VecDeque<(String, Vec<u8>)>,
}

impl SimDriver {
    /// Create a driver over an attached bus handle.
    pub fn new(handle: BusHandle, env: SimEnv) -> Self {
        Self { handle, env, pending: VecDeque::new() }
    }
}

impl Driver for SimDriver {
    type Error = TransportError;

    async fn connect(&mut self) -> Result<(), Self::Error> {
        self.handle.set_connected(true);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.handle.is_connected()
    }

    fn subscribe(&mut self, topic: &str) -> Result<(), Self::Error> {
        self.handle.subscribe(topic)
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), Self::Error> {
        self.handle.publish(topic, payload)
    }

    async fn poll_delivery(&mut self) -> Option<(String, Vec<u8>)> {
        if self.pending.is_empty() {
            self.pending.extend(self.handle.drain());
        }
        self.pending.pop_front()
    }

    fn now_millis(&self) -> u64 {
        self.env.now_millis()
    }

    fn render(&mut self, _app: &App) -> Result<(), Self::Error> {
        Ok(())
    }

    fn stop(&mut self) {
        self.handle.set_connected(false);
    }
}
