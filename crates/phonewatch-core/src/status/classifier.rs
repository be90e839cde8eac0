//! Threshold-based device status classification.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::model::{StatusLevel, StatusReason, StatusResult, TelemetrySnapshot};

/// Limits that separate the three status levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusThresholds {
    /// Battery percent at or below which the phone may switch off.
    pub critical_battery: u8,
    /// Battery percent at or below which an unplugged phone needs attention.
    pub low_battery: u8,
    /// Unsent notifications above this are an error.
    pub max_unsent: u32,
    /// Minutes of silence after which the device is in error.
    pub error_silence_minutes: u32,
    /// Minutes of silence after which the device needs attention.
    pub attention_silence_minutes: u32,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            critical_battery: 5,
            low_battery: 10,
            max_unsent: 10,
            error_silence_minutes: 180,
            attention_silence_minutes: 60,
        }
    }
}

/// Turns telemetry into a status level with reasons.
///
/// Error conditions are checked in a fixed order and the first hit is the
/// only reason reported. Attention conditions are all checked and every hit
/// is reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceStatusClassifier {
    thresholds: StatusThresholds,
}

impl DeviceStatusClassifier {
    /// Creates a classifier with the given thresholds.
    #[must_use]
    pub const fn new(thresholds: StatusThresholds) -> Self {
        Self { thresholds }
    }

    /// The thresholds in effect.
    #[must_use]
    pub const fn thresholds(&self) -> &StatusThresholds {
        &self.thresholds
    }

    /// Classifies one snapshot.
    ///
    /// `now` is recorded on the result; the snapshot already carries the
    /// last-notification age.
    #[must_use]
    pub fn classify(&self, snapshot: &TelemetrySnapshot, now: DateTime<Utc>) -> StatusResult {
        if let Some(reason) = self.error_reason(snapshot) {
            return StatusResult {
                level: StatusLevel::Error,
                reasons: vec![reason],
                evaluated_at: now,
            };
        }

        let reasons = self.attention_reasons(snapshot);
        if reasons.is_empty() {
            StatusResult {
                level: StatusLevel::Success,
                reasons: vec![StatusReason::AllNormal],
                evaluated_at: now,
            }
        } else {
            StatusResult {
                level: StatusLevel::Attention,
                reasons,
                evaluated_at: now,
            }
        }
    }

    fn error_reason(&self, snapshot: &TelemetrySnapshot) -> Option<StatusReason> {
        let t = &self.thresholds;

        if snapshot.battery_percent <= t.critical_battery {
            return Some(StatusReason::BatteryCritical);
        }
        if !snapshot.network_available {
            return Some(StatusReason::NoNetwork);
        }
        if snapshot.unsent_count > t.max_unsent {
            return Some(StatusReason::UnsentBacklog { limit: t.max_unsent });
        }
        if silent_longer_than(snapshot, t.error_silence_minutes) {
            return Some(StatusReason::NoNotificationsFor {
                minutes: t.error_silence_minutes,
            });
        }
        None
    }

    fn attention_reasons(&self, snapshot: &TelemetrySnapshot) -> Vec<StatusReason> {
        let t = &self.thresholds;
        let mut reasons = Vec::new();

        if snapshot.battery_percent <= t.low_battery && !snapshot.is_charging {
            reasons.push(StatusReason::BatteryLow {
                limit: t.low_battery,
            });
        }
        if snapshot.unsent_count > 0 {
            reasons.push(StatusReason::UnsentPresent);
        }
        if snapshot.last_notification_age.is_none() {
            reasons.push(StatusReason::NoLastNotification);
        } else if silent_longer_than(snapshot, t.attention_silence_minutes) {
            reasons.push(StatusReason::NoNotificationsFor {
                minutes: t.attention_silence_minutes,
            });
        }

        reasons
    }
}

fn silent_longer_than(snapshot: &TelemetrySnapshot, minutes: u32) -> bool {
    snapshot
        .last_notification_age
        .is_some_and(|age| age > Duration::minutes(i64::from(minutes)))
}
