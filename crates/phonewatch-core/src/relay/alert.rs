//! Outbound alert payloads.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::filter::NotificationSample;
use crate::status::{StatusLevel, StatusReason, StatusResult};

const TIME_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// What an alert is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AlertKind {
    /// A notification that passed the filter.
    Message {
        /// Who sent it.
        sender: String,
        /// Originating app, when known.
        package: Option<String>,
        /// Body text.
        text: String,
    },
    /// A device health report worth escalating.
    Status {
        /// Classified level.
        level: StatusLevel,
        /// Why the device got that level.
        reasons: Vec<StatusReason>,
    },
}

/// One message for the operator channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    /// Device display name.
    pub device: String,
    /// When the event happened.
    pub at: DateTime<Utc>,
    /// Payload.
    #[serde(flatten)]
    pub kind: AlertKind,
}

impl Alert {
    /// Alert for a forwarded notification.
    #[must_use]
    pub fn message(
        device: impl Into<String>,
        sample: &NotificationSample,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            device: device.into(),
            at,
            kind: AlertKind::Message {
                sender: sample.sender.clone(),
                package: sample.package().map(ToString::to_string),
                text: sample.body_text.clone(),
            },
        }
    }

    /// Alert for a device status.
    #[must_use]
    pub fn status(device: impl Into<String>, result: &StatusResult) -> Self {
        Self {
            device: device.into(),
            at: result.evaluated_at,
            kind: AlertKind::Status {
                level: result.level,
                reasons: result.reasons.clone(),
            },
        }
    }

    /// Plain-text body for chat delivery.
    #[must_use]
    pub fn render(&self) -> String {
        let time = self.at.format(TIME_FORMAT);
        let mut out = String::new();

        match &self.kind {
            AlertKind::Message {
                sender,
                package,
                text,
            } => {
                let _ = writeln!(out, "🚨 NEW MESSAGE\n");
                let _ = writeln!(out, "📱 Device: {}", self.device);
                let _ = writeln!(out, "⏰ Time: {time}");
                let _ = writeln!(out, "👤 Sender: {sender}");
                if let Some(package) = package {
                    let _ = writeln!(out, "📦 App: {package}");
                }
                let _ = write!(out, "\n💬 Message:\n{text}");
            }
            AlertKind::Status { level, reasons } => {
                let _ = writeln!(out, "📊 DEVICE STATUS\n");
                let _ = writeln!(out, "📱 Device: {}", self.device);
                let _ = writeln!(out, "⏰ Time: {time}");
                let _ = writeln!(out, "Status: {}", level.display_name());
                let _ = write!(out, "Reasons:");
                for reason in reasons {
                    let _ = write!(out, "\n• {reason}");
                }
            }
        }

        out
    }
}
