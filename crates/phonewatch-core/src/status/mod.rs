//! Device health classification.
//!
//! Telemetry snapshots (battery, charging, network, unsent backlog,
//! last-notification recency) are mapped to one of three levels:
//! - **Success**: nothing to report
//! - **Attention**: soft signals, all listed together
//! - **Error**: the single most severe problem

mod classifier;
mod model;

pub use classifier::{DeviceStatusClassifier, StatusThresholds};
pub use model::{StatusLevel, StatusReason, StatusResult, TelemetrySnapshot};
