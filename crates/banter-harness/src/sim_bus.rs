//! In-memory pub/sub broker.
//!
//! Models the bus the way the real broker behaves from a client's point of
//! view: exact-topic subscriptions, fan-out to every connected subscriber
//! including the publisher itself, nothing retained, and anything published
//! while a subscriber is offline is lost to it.

use std::{
    collections::{HashSet, VecDeque},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use banter_client::transport::{BusTransport, TransportError};

struct DeviceState {
    connected: bool,
    subscriptions: HashSet<String>,
    inbox: VecDeque<(String, Vec<u8>)>,
}

struct BrokerState {
    devices: Vec<DeviceState>,
}

/// Shared in-memory broker. Attach one [`BusHandle`] per simulated device.
#[derive(Clone)]
pub struct SimBus {
    state: Arc<Mutex<BrokerState>>,
}

impl SimBus {
    /// Create an empty broker.
    pub fn new() -> Self {
        Self { state: Arc::new(Mutex::new(BrokerState { devices: Vec::new() })) }
    }

    /// Attach a new device. The handle starts connected with no
    /// subscriptions.
    pub fn attach(&self) -> BusHandle {
        let mut state = lock(&self.state);
        let index = state.devices.len();
        state.devices.push(DeviceState {
            connected: true,
            subscriptions: HashSet::new(),
            inbox: VecDeque::new(),
        });
        BusHandle { state: Arc::clone(&self.state), index }
    }
}

impl Default for SimBus {
    fn default() -> Self {
        Self::new()
    }
}

fn lock(state: &Arc<Mutex<BrokerState>>) -> MutexGuard<'_, BrokerState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One device's connection to the [`SimBus`].
pub struct BusHandle {
    state: Arc<Mutex<BrokerState>>,
    index: usize,
}

impl BusHandle {
    /// Bring the link up or down.
    ///
    /// Going down drops the device's subscriptions (clean-session broker):
    /// on reconnect the client replays its subscription set, which is
    /// exactly what the production runtime does.
    pub fn set_connected(&self, up: bool) {
        let mut state = lock(&self.state);
        let device = &mut state.devices[self.index];
        device.connected = up;
        if !up {
            device.subscriptions.clear();
        }
    }

    /// Take all queued deliveries for this device, in arrival order.
    pub fn drain(&mut self) -> Vec<(String, Vec<u8>)> {
        lock(&self.state).devices[self.index].inbox.drain(..).collect()
    }

    /// Whether anything is queued for this device.
    pub fn has_pending(&self) -> bool {
        !lock(&self.state).devices[self.index].inbox.is_empty()
    }
}

impl BusTransport for BusHandle {
    fn is_connected(&self) -> bool {
        lock(&self.state).devices[self.index].connected
    }

    fn subscribe(&mut self, topic: &str) -> Result<(), TransportError> {
        let mut state = lock(&self.state);
        let device = &mut state.devices[self.index];
        if !device.connected {
            return Err(TransportError::NotConnected);
        }
        device.subscriptions.insert(topic.to_string());
        Ok(())
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError> {
        let mut state = lock(&self.state);
        if !state.devices[self.index].connected {
            return Err(TransportError::NotConnected);
        }

        // Fan-out to every connected subscriber, the publisher included: a
        // shared channel echoes a device's own publishes back to it.
        for device in &mut state.devices {
            if device.connected && device.subscriptions.contains(topic) {
                device.inbox.push_back((topic.to_string(), payload.to_vec()));
            }
        }
        Ok(())
    }
}
