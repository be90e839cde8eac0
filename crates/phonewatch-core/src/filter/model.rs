//! Filter data models.

use serde::{Deserialize, Serialize};

use super::pattern::WILDCARD;
use crate::Error;

/// What an operator rule does with a matching package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// Let notifications from the package through.
    Allow,
    /// Block notifications from the package.
    #[default]
    Deny,
}

impl RuleKind {
    /// Parse from database string representation.
    ///
    /// Accepts the legacy `whitelist`/`blacklist` spellings. Anything
    /// unrecognised is treated as a deny rule, so a damaged row never opens
    /// the filter. Operator input goes through [`str::parse`] instead.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "allow" | "whitelist" => Self::Allow,
            _ => Self::Deny,
        }
    }

    /// Convert to database string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
        }
    }
}

impl std::str::FromStr for RuleKind {
    type Err = Error;

    /// Strict parse: unknown spellings are rejected.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "allow" | "whitelist" => Ok(Self::Allow),
            "deny" | "blacklist" => Ok(Self::Deny),
            _ => Err(Error::UnknownRuleKind(s.to_string())),
        }
    }
}

/// An operator-curated allow/deny rule keyed by package pattern.
///
/// The pattern is either an exact package identifier or a prefix followed by
/// a single trailing `*`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRule {
    /// Exact package identifier or trailing-wildcard prefix.
    pub package_pattern: String,
    /// Whether the rule allows or denies.
    pub kind: RuleKind,
    /// Inactive rules are kept but ignored by the engine.
    pub active: bool,
    /// Operator-facing description, used as the block reason.
    pub description: String,
}

impl FilterRule {
    /// Create an active deny rule.
    #[must_use]
    pub fn deny(package_pattern: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            package_pattern: package_pattern.into(),
            kind: RuleKind::Deny,
            active: true,
            description: description.into(),
        }
    }

    /// Create an active allow rule.
    #[must_use]
    pub fn allow(package_pattern: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            package_pattern: package_pattern.into(),
            kind: RuleKind::Allow,
            active: true,
            description: description.into(),
        }
    }

    /// Returns the same rule marked inactive.
    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Check if the pattern carries a wildcard marker at the end.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.package_pattern.ends_with(WILDCARD)
    }
}

/// One inbound notification as reported by a device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSample {
    /// Originating application package, if the device reported one.
    pub package_name: Option<String>,
    /// Sender string shown in the notification.
    pub sender: String,
    /// Notification body.
    pub body_text: String,
}

impl NotificationSample {
    /// Create a sample.
    #[must_use]
    pub fn new(
        package_name: Option<&str>,
        sender: impl Into<String>,
        body_text: impl Into<String>,
    ) -> Self {
        Self {
            package_name: package_name.map(ToString::to_string),
            sender: sender.into(),
            body_text: body_text.into(),
        }
    }

    /// Package name with surrounding whitespace removed, `None` when blank.
    #[must_use]
    pub fn package(&self) -> Option<&str> {
        self.package_name
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

/// Which evaluation step produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionSource {
    /// SMS importance sub-rule.
    SmsImportance,
    /// Exact rule-table match.
    ExactRule,
    /// Trailing-wildcard rule-table match.
    WildcardRule,
    /// Built-in system package list.
    SystemPackage,
    /// System-noise text patterns.
    SystemText,
    /// Nothing matched; the policy default applied.
    Default,
}

/// Pass/block verdict for one notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDecision {
    /// Whether the notification should be suppressed.
    pub blocked: bool,
    /// Human-readable explanation. Never empty when `blocked`.
    pub reason: String,
    /// Step that decided.
    pub source: DecisionSource,
}

impl FilterDecision {
    /// Build a blocking decision.
    ///
    /// An empty reason is replaced so that a block is always explained.
    #[must_use]
    pub fn block(reason: impl Into<String>, source: DecisionSource) -> Self {
        let mut reason = reason.into();
        if reason.trim().is_empty() {
            reason = "blocked".to_string();
        }
        Self {
            blocked: true,
            reason,
            source,
        }
    }

    /// Build a pass-through decision.
    #[must_use]
    pub fn allow(reason: impl Into<String>, source: DecisionSource) -> Self {
        Self {
            blocked: false,
            reason: reason.into(),
            source,
        }
    }
}
