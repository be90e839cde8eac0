//! Device status data models.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// Health level of a device, ordered by escalating concern.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    /// Everything looks fine.
    #[default]
    Success,
    /// Soft signals worth a look.
    Attention,
    /// The device is likely not relaying alerts.
    Error,
}

impl StatusLevel {
    /// Parse from string representation. Unknown input maps to `Success`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "attention" => Self::Attention,
            "error" => Self::Error,
            _ => Self::Success,
        }
    }

    /// Convert to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Attention => "attention",
            Self::Error => "error",
        }
    }

    /// Human-readable label for dashboards and chat messages.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Success => "✅ All good",
            Self::Attention => "⚠️ Attention required",
            Self::Error => "❌ Critical error",
        }
    }
}

impl std::str::FromStr for StatusLevel {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl std::fmt::Display for StatusLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a device got its level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusReason {
    /// Battery at or below the critical threshold.
    BatteryCritical,
    /// Device reports no connectivity.
    NoNetwork,
    /// More unsent notifications queued than allowed.
    UnsentBacklog {
        /// Backlog size that must be exceeded.
        limit: u32,
    },
    /// No notification arrived for longer than the window.
    NoNotificationsFor {
        /// Window length in minutes.
        minutes: u32,
    },
    /// Battery at or below the low threshold while not charging.
    BatteryLow {
        /// Threshold in percent.
        limit: u8,
    },
    /// Some notifications are waiting to be sent.
    UnsentPresent,
    /// The device never reported a last-notification time.
    NoLastNotification,
    /// Placeholder for a healthy device.
    AllNormal,
}

impl std::fmt::Display for StatusReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BatteryCritical => f.write_str("battery critically low"),
            Self::NoNetwork => f.write_str("no network"),
            Self::UnsentBacklog { limit } => write!(f, "unsent backlog exceeds {limit}"),
            Self::NoNotificationsFor { minutes } => {
                write!(f, "no notifications for over {}", span(*minutes))
            }
            Self::BatteryLow { limit } => write!(f, "battery ≤ {limit}%"),
            Self::UnsentPresent => f.write_str("unsent notifications present"),
            Self::NoLastNotification => f.write_str("no last-notification information"),
            Self::AllNormal => f.write_str("all systems normal"),
        }
    }
}

impl Serialize for StatusReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn span(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (1, 0) => "1 hour".to_string(),
        (hours, 0) if hours > 0 => format!("{hours} hours"),
        _ if minutes == 1 => "1 minute".to_string(),
        _ => format!("{minutes} minutes"),
    }
}

/// One point-in-time health report from a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetrySnapshot {
    /// Battery charge, 0 to 100. Callers validate the range.
    pub battery_percent: u8,
    /// Whether the device is on a charger.
    pub is_charging: bool,
    /// Whether the device has connectivity.
    pub network_available: bool,
    /// Notifications captured but not yet delivered to the backend.
    pub unsent_count: u32,
    /// Time since the last captured notification, if known.
    pub last_notification_age: Option<Duration>,
}

impl TelemetrySnapshot {
    /// Creates a snapshot without last-notification information.
    #[must_use]
    pub const fn new(
        battery_percent: u8,
        is_charging: bool,
        network_available: bool,
        unsent_count: u32,
    ) -> Self {
        Self {
            battery_percent,
            is_charging,
            network_available,
            unsent_count,
            last_notification_age: None,
        }
    }

    /// Sets the time since the last notification.
    #[must_use]
    pub fn with_last_notification_age(mut self, age: Duration) -> Self {
        self.last_notification_age = Some(age);
        self
    }

    /// Derives the last-notification age from a timestamp.
    ///
    /// A timestamp in the future (device clock skew) counts as zero age.
    #[must_use]
    pub fn with_last_notification_at(mut self, at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        self.last_notification_age = Some((now - at).max(Duration::zero()));
        self
    }
}

/// Outcome of classifying a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusResult {
    /// Overall level.
    pub level: StatusLevel,
    /// Explanations in evaluation order. Never empty.
    pub reasons: Vec<StatusReason>,
    /// The `now` the snapshot was judged against.
    pub evaluated_at: DateTime<Utc>,
}

impl StatusResult {
    /// Returns true if the level reaches `min_level`.
    #[must_use]
    pub fn needs_alert(&self, min_level: StatusLevel) -> bool {
        self.level >= min_level
    }

    /// Reasons rendered as text.
    #[must_use]
    pub fn reason_texts(&self) -> Vec<String> {
        self.reasons.iter().map(ToString::to_string).collect()
    }

    /// All reasons on one line.
    #[must_use]
    pub fn summary(&self) -> String {
        self.reason_texts().join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(StatusLevel::Success < StatusLevel::Attention);
        assert!(StatusLevel::Attention < StatusLevel::Error);
    }

    #[test]
    fn test_level_roundtrip() {
        for level in [StatusLevel::Success, StatusLevel::Attention, StatusLevel::Error] {
            assert_eq!(StatusLevel::parse(level.as_str()), level);
        }
        assert_eq!(StatusLevel::parse("unknown"), StatusLevel::Success);
    }

    #[test]
    fn test_reason_text() {
        assert_eq!(
            StatusReason::UnsentBacklog { limit: 10 }.to_string(),
            "unsent backlog exceeds 10"
        );
        assert_eq!(
            StatusReason::NoNotificationsFor { minutes: 180 }.to_string(),
            "no notifications for over 3 hours"
        );
        assert_eq!(
            StatusReason::NoNotificationsFor { minutes: 60 }.to_string(),
            "no notifications for over 1 hour"
        );
        assert_eq!(
            StatusReason::NoNotificationsFor { minutes: 90 }.to_string(),
            "no notifications for over 90 minutes"
        );
        assert_eq!(StatusReason::BatteryLow { limit: 10 }.to_string(), "battery ≤ 10%");
    }

    #[test]
    fn test_reason_serializes_as_text() {
        let json = serde_json::to_string(&vec![StatusReason::NoNetwork]).unwrap_or_default();
        assert_eq!(json, r#"["no network"]"#);
    }

    #[test]
    fn test_future_timestamp_is_zero_age() {
        let now = Utc::now();
        let snapshot = TelemetrySnapshot::new(50, false, true, 0)
            .with_last_notification_at(now + Duration::minutes(5), now);
        assert_eq!(snapshot.last_notification_age, Some(Duration::zero()));
    }
}
