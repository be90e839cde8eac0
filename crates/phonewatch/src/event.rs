//! JSON-line wire format for the `run` command.

use chrono::{DateTime, Utc};
use phonewatch_core::{FilterDecision, StatusResult, TelemetrySnapshot};
use serde::{Deserialize, Serialize};

/// One inbound line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A notification captured on a device.
    Notification {
        device: String,
        #[serde(default)]
        package_name: Option<String>,
        #[serde(default)]
        sender: String,
        #[serde(default)]
        text: String,
    },
    /// A periodic health report.
    Telemetry {
        device: String,
        battery_percent: i64,
        is_charging: bool,
        network_available: bool,
        #[serde(default)]
        unsent_count: i64,
        #[serde(default)]
        last_notification_at: Option<DateTime<Utc>>,
    },
}

impl Event {
    /// Device the event came from.
    pub fn device(&self) -> &str {
        match self {
            Self::Notification { device, .. } | Self::Telemetry { device, .. } => device,
        }
    }
}

/// Build a snapshot from raw telemetry, clamping out-of-range counters.
pub fn snapshot(
    battery_percent: i64,
    is_charging: bool,
    network_available: bool,
    unsent_count: i64,
    last_notification_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> TelemetrySnapshot {
    let battery = u8::try_from(battery_percent.clamp(0, 100)).unwrap_or(u8::MAX);
    let unsent = u32::try_from(unsent_count.max(0)).unwrap_or(u32::MAX);

    let snapshot = TelemetrySnapshot::new(battery, is_charging, network_available, unsent);
    match last_notification_at {
        Some(at) => snapshot.with_last_notification_at(at, now),
        None => snapshot,
    }
}

/// One outbound line.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Output<'a> {
    /// Filter verdict for a notification.
    Decision {
        device: &'a str,
        decision: &'a FilterDecision,
    },
    /// Classification of a telemetry report.
    Status {
        device: &'a str,
        status: &'a StatusResult,
    },
}
