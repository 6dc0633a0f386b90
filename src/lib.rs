//! BBU health check for LSI/Broadcom MegaRAID controllers
//!
//! Shells out to MegaCli or StorCli, parses the free-text battery report
//! into a normalized state, and computes a Nagios-style severity plus a
//! one-line summary and optional performance data.

pub mod backend;
pub mod battery;
pub mod config;
pub mod errors;
pub mod exec;

pub use backend::{Backend, Poll, Vendor};
pub use battery::{evaluate, BatteryState, LifecycleState, PolicyConfig, Severity};
pub use config::Config;
