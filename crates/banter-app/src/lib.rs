//! Application layer for Banter
//!
//! Pure state machines and a generic runtime for presentation and sync
//! orchestration, enabling deterministic simulation testing with the same
//! code that runs in production.
//!
//! # Components
//!
//! - [`App`]: presentation state machine (room list, active room, unread
//!   badges, directory listing)
//! - [`Bridge`]: sync bridge (owns the client and the store, executes
//!   persistence, collects outgoing bus traffic)
//! - [`Driver`]: trait for platform-specific I/O abstraction
//! - [`Runtime`]: generic orchestration loop using Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod bridge;
mod driver;
mod event;
mod runtime;
mod state;

pub use action::AppAction;
pub use app::App;
pub use bridge::Bridge;
pub use driver::Driver;
pub use event::AppEvent;
pub use runtime::{IntentSender, Runtime};
pub use state::{ConnectionState, RoomView};
