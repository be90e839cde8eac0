//! Notification filter engine.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::catalog::FilterCatalog;
use super::model::{DecisionSource, FilterDecision, FilterRule, NotificationSample, RuleKind};
use super::pattern::PackagePattern;
use super::rules::RuleSource;

/// Package that delivers plain SMS on stock Android.
pub const DEFAULT_SMS_PACKAGE: &str = "com.google.android.apps.messaging";

/// Tunable parts of the filtering policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterPolicy {
    /// Outcome when no rule, list or pattern decides.
    pub default_action: RuleKind,
    /// Only let bank/operator SMS through from the SMS package.
    pub sms_whitelist: bool,
    /// Package the SMS sub-rule applies to.
    pub sms_package: String,
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self {
            default_action: RuleKind::Allow,
            sms_whitelist: true,
            sms_package: DEFAULT_SMS_PACKAGE.to_string(),
        }
    }
}

/// Decides whether a notification is noise or an alert worth forwarding.
///
/// Precedence, highest first:
/// 1. SMS importance sub-rule (SMS package only)
/// 2. exact rule-table match
/// 3. wildcard rule-table match, first by ascending pattern
/// 4. built-in system package list
/// 5. system-noise text patterns
/// 6. policy default
///
/// A notification without a package skips straight to the text patterns.
#[derive(Debug, Clone)]
pub struct NotificationFilterEngine {
    catalog: FilterCatalog,
    policy: FilterPolicy,
}

impl NotificationFilterEngine {
    /// Create an engine over a catalog and policy.
    #[must_use]
    pub fn new(catalog: FilterCatalog, policy: FilterPolicy) -> Self {
        Self { catalog, policy }
    }

    /// The policy in effect.
    #[must_use]
    pub const fn policy(&self) -> &FilterPolicy {
        &self.policy
    }

    /// The built-in catalog in effect.
    #[must_use]
    pub const fn catalog(&self) -> &FilterCatalog {
        &self.catalog
    }

    /// Evaluate one notification against the rule table and built-in lists.
    ///
    /// Never fails: if the rule source cannot be read, rule-table steps are
    /// skipped and the built-in checks still run.
    pub fn evaluate<R>(&self, rules: &R, sample: &NotificationSample) -> FilterDecision
    where
        R: RuleSource + ?Sized,
    {
        let decision = self.decide(rules, sample);
        debug!(
            package = sample.package().unwrap_or(""),
            blocked = decision.blocked,
            source = ?decision.source,
            "Evaluated notification"
        );
        decision
    }

    fn decide<R>(&self, rules: &R, sample: &NotificationSample) -> FilterDecision
    where
        R: RuleSource + ?Sized,
    {
        let text = sample.body_text.as_str();

        let Some(package) = sample.package() else {
            if self.catalog.is_system_text(text) {
                return FilterDecision::block("system message", DecisionSource::SystemText);
            }
            return self.fallback("unrecognized notification without package".to_string());
        };

        if self.policy.sms_whitelist && package == self.policy.sms_package {
            return if self.catalog.is_important_sms(text) {
                FilterDecision::allow("important SMS", DecisionSource::SmsImportance)
            } else {
                FilterDecision::block(
                    "SMS without bank or operator markers",
                    DecisionSource::SmsImportance,
                )
            };
        }

        match Self::match_rule_table(rules, package) {
            Ok(Some(decision)) => return decision,
            Ok(None) => {}
            Err(e) => {
                warn!(
                    package,
                    error = %e,
                    "Rule table unavailable, using built-in lists only"
                );
            }
        }

        if self.catalog.is_system_package(package) {
            return FilterDecision::block(
                format!("system package {package}"),
                DecisionSource::SystemPackage,
            );
        }

        if self.catalog.is_system_text(text) {
            return FilterDecision::block("system message", DecisionSource::SystemText);
        }

        self.fallback(format!("no rule allows {package}"))
    }

    /// Exact match first, then wildcards in ascending pattern order.
    fn match_rule_table<R>(rules: &R, package: &str) -> crate::Result<Option<FilterDecision>>
    where
        R: RuleSource + ?Sized,
    {
        if let Some(rule) = rules.lookup_exact(package)?.filter(|r| r.active) {
            return Ok(Some(rule_decision(&rule, DecisionSource::ExactRule)));
        }

        let mut wildcards = rules.wildcard_rules()?;
        wildcards.sort_by(|a, b| a.package_pattern.cmp(&b.package_pattern));

        for rule in wildcards.iter().filter(|r| r.active) {
            let pattern = PackagePattern::parse(&rule.package_pattern);
            if pattern == PackagePattern::Malformed {
                debug!(pattern = %rule.package_pattern, "Skipping malformed wildcard rule");
            } else if pattern.matches(package) {
                return Ok(Some(rule_decision(rule, DecisionSource::WildcardRule)));
            }
        }

        Ok(None)
    }

    fn fallback(&self, deny_reason: String) -> FilterDecision {
        match self.policy.default_action {
            RuleKind::Allow => FilterDecision::allow(String::new(), DecisionSource::Default),
            RuleKind::Deny => FilterDecision::block(deny_reason, DecisionSource::Default),
        }
    }
}

fn rule_decision(rule: &FilterRule, source: DecisionSource) -> FilterDecision {
    let reason = if rule.description.trim().is_empty() {
        match rule.kind {
            RuleKind::Allow => format!("allowed by rule {}", rule.package_pattern),
            RuleKind::Deny => format!("blocked by rule {}", rule.package_pattern),
        }
    } else {
        rule.description.clone()
    };

    match rule.kind {
        RuleKind::Allow => FilterDecision::allow(reason, source),
        RuleKind::Deny => FilterDecision::block(reason, source),
    }
}
