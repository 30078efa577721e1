//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: presentation state machine
//! - [`Bridge`]: sync bridge to the client and store
//! - [`Driver`]: platform-specific I/O
//!
//! User intents arrive through a channel (see [`IntentSender`]) so any
//! frontend thread can push [`AppAction`]s without touching runtime state.

use std::time::Duration;

use banter_core::{env::Environment, storage::Store};
use tokio::sync::mpsc;

use crate::{App, AppAction, AppEvent, Bridge, Driver};

/// Default announce interval. Peers discover a public room only through
/// these periodic re-announcements, so the interval bounds cold-start
/// discovery latency.
pub const ANNOUNCE_INTERVAL: Duration = Duration::from_secs(10);

/// Handle for pushing user intents into a running [`Runtime`].
#[derive(Debug, Clone)]
pub struct IntentSender {
    tx: mpsc::UnboundedSender<AppAction>,
}

impl IntentSender {
    /// Push an intent. Silently dropped if the runtime has shut down.
    pub fn send(&self, action: AppAction) {
        let _ = self.tx.send(action);
    }
}

/// Generic runtime that orchestrates App, Bridge, and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `E`: Environment for time and randomness
/// - `S`: Store for local persistence
pub struct Runtime<D, E, S>
where
    D: Driver,
    E: Environment,
    S: Store,
{
    driver: D,
    app: App,
    bridge: Bridge<E, S>,
    intents: mpsc::UnboundedReceiver<AppAction>,
    intent_tx: mpsc::UnboundedSender<AppAction>,
    announce_interval_millis: u64,
    last_announce_millis: u64,
    link_was_up: bool,
}

impl<D, E, S> Runtime<D, E, S>
where
    D: Driver,
    E: Environment,
    S: Store,
{
    /// Create a new runtime with the given driver and bridge.
    pub fn new(driver: D, bridge: Bridge<E, S>) -> Self {
        let (intent_tx, intents) = mpsc::unbounded_channel();
        Self {
            driver,
            app: App::new(),
            bridge,
            intents,
            intent_tx,
            announce_interval_millis: ANNOUNCE_INTERVAL.as_millis() as u64,
            last_announce_millis: 0,
            link_was_up: false,
        }
    }

    /// Override the announce interval (tests use short intervals).
    pub fn set_announce_interval(&mut self, interval: Duration) {
        self.announce_interval_millis = interval.as_millis() as u64;
    }

    /// Handle for pushing user intents from the frontend.
    pub fn intent_sender(&self) -> IntentSender {
        IntentSender { tx: self.intent_tx.clone() }
    }

    /// Run the main event loop.
    ///
    /// 1. Connects the bus and replays the subscription set
    /// 2. Drains user intents into the bridge
    /// 3. Forwards inbound deliveries to the client
    /// 4. Fires the periodic announce timer
    /// 5. Flushes outgoing subscribes and publishes through the driver
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self) -> Result<(), D::Error> {
        self.driver.render(&self.app)?;

        let actions = self.app.handle(AppEvent::Connecting);
        self.execute_actions(actions)?;
        self.driver.connect().await?;

        loop {
            if self.process_cycle().await? {
                break;
            }
        }

        self.driver.stop();
        Ok(())
    }

    /// Process one cycle of the event loop.
    ///
    /// Returns `true` if the application should quit.
    async fn process_cycle(&mut self) -> Result<bool, D::Error> {
        self.sync_link_state()?;

        if let Some((topic, payload)) = self.driver.poll_delivery().await {
            let events = self.bridge.handle_delivery(topic, payload);
            self.apply_events(events)?;
        }

        let now = self.driver.now_millis();
        if self.driver.is_connected()
            && now.saturating_sub(self.last_announce_millis) >= self.announce_interval_millis
        {
            self.last_announce_millis = now;
            let events = self.bridge.handle_announce_tick();
            self.apply_events(events)?;
        }

        self.flush_outgoing()?;

        // Intents last, each flushing its own traffic, so a Quit cannot
        // strand queued publishes from earlier in the cycle.
        while let Ok(action) = self.intents.try_recv() {
            if self.dispatch_intent(action)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Watch for link transitions and drive the client lifecycle.
    fn sync_link_state(&mut self) -> Result<(), D::Error> {
        let up = self.driver.is_connected();
        if up == self.link_was_up {
            return Ok(());
        }
        self.link_was_up = up;

        let events = if up {
            tracing::info!("bus link up");
            self.bridge.handle_connected()
        } else {
            tracing::warn!("bus link down");
            self.bridge.handle_disconnected()
        };
        self.apply_events(events)?;
        self.flush_outgoing()
    }

    /// Route one user intent through App and Bridge.
    ///
    /// Returns `true` if the application should quit.
    fn dispatch_intent(&mut self, action: AppAction) -> Result<bool, D::Error> {
        match action {
            AppAction::Render => self.driver.render(&self.app)?,
            AppAction::Quit => return Ok(true),
            intent => {
                let events = self.bridge.process_app_action(intent);
                self.apply_events(events)?;
                self.flush_outgoing()?;
            },
        }
        Ok(false)
    }

    /// Feed bridge events into App and execute the resulting actions.
    fn apply_events(&mut self, events: Vec<AppEvent>) -> Result<(), D::Error> {
        for event in events {
            let actions = self.app.handle(event);
            self.execute_actions(actions)?;
        }
        Ok(())
    }

    /// Execute App-produced actions. Sync intents produced by event handling
    /// loop back through the bridge.
    fn execute_actions(&mut self, actions: Vec<AppAction>) -> Result<(), D::Error> {
        for action in actions {
            match action {
                AppAction::Render => self.driver.render(&self.app)?,
                AppAction::Quit => {},
                intent => {
                    let events = self.bridge.process_app_action(intent);
                    self.apply_events(events)?;
                },
            }
        }
        Ok(())
    }

    /// Flush pending subscribes and publishes through the driver.
    ///
    /// Subscribes go first so a room's channel is live before anything is
    /// published about it.
    fn flush_outgoing(&mut self) -> Result<(), D::Error> {
        for topic in self.bridge.take_subscribes() {
            self.driver.subscribe(&topic)?;
        }
        for (topic, payload) in self.bridge.take_publishes() {
            self.driver.publish(&topic, &payload)?;
        }
        Ok(())
    }

    /// The presentation state machine.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Mutable access to the presentation state machine.
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// The sync bridge.
    pub fn bridge(&self) -> &Bridge<E, S> {
        &self.bridge
    }
}
