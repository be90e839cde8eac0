//! # phonewatch-core
//!
//! Decision logic for a fleet of Android phones that relay bank and
//! operator notifications.
//!
//! This crate provides:
//! - **Notification filter** - separates OS/vendor noise from alerts using an
//!   operator rule table (`SQLite`), built-in package lists and text patterns
//! - **Device status** - classifies battery, network and backlog telemetry
//!   into Success / Attention / Error with reasons
//! - **Alert relay** - forwards what passes to an operator [`relay::Notifier`]
//! - **Configuration** - JSON settings with defaults for every field

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod config;
mod error;
pub mod filter;
pub mod relay;
pub mod status;

pub use config::Config;
pub use error::{Error, Result};
pub use filter::{
    FilterCatalog, FilterDecision, FilterPolicy, FilterRule, FilterRuleRepository,
    NotificationFilterEngine, NotificationSample, RuleKind, RuleProvider, RuleSnapshot,
    RuleSource,
};
pub use relay::{Alert, AlertKind, AlertRelay, Notifier};
pub use status::{
    DeviceStatusClassifier, StatusLevel, StatusReason, StatusResult, StatusThresholds,
    TelemetrySnapshot,
};
