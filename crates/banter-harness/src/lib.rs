//! Deterministic simulation harness for Banter sync testing.
//!
//! Seeded implementations of the Environment and bus interfaces for
//! deterministic, reproducible multi-device testing without a broker
//! process.
//!
//! # Components
//!
//! - [`SimEnv`]: seeded RNG and a manually advanced virtual clock
//! - [`SimBus`] / [`BusHandle`]: in-memory pub/sub broker with per-device
//!   connection state and delivery queues
//! - [`SimDriver`]: runs the real application runtime against the
//!   simulated bus
//! - [`TestCluster`]: a set of simulated devices wired through one broker,
//!   executing client actions the way the production runtime would

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cluster;
pub mod sim_bus;
pub mod sim_driver;
pub mod sim_env;

pub use cluster::{Device, TestCluster};
pub use sim_bus::{BusHandle, SimBus};
pub use sim_driver::SimDriver;
pub use sim_env::SimEnv;
