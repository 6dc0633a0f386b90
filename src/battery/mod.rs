//! Normalized BBU model and severity policy
//!
//! The data model is vendor-neutral: both report parsers populate the same
//! `BatteryState`, and the policy only ever sees the normalized form.

pub mod policy;
pub mod state;

pub use policy::{evaluate, PolicyConfig, Severity};
pub use state::{BatteryState, LifecycleState};
