//! Rule table access for the filter engine.

use std::collections::BTreeMap;
use std::future::Future;

use super::model::FilterRule;
use crate::Result;

/// Read access to the operator rule table.
///
/// The engine only ever reads through this trait, so a storage backend, an
/// in-memory snapshot or a test double can be plugged in. Implementations
/// may fail; the engine treats a failure as "no rule data" and carries on.
pub trait RuleSource {
    /// Look up the rule whose pattern equals `package` exactly.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying rule data cannot be read.
    fn lookup_exact(&self, package: &str) -> Result<Option<FilterRule>>;

    /// All rules whose pattern ends in the wildcard marker, ordered by
    /// ascending pattern string.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying rule data cannot be read.
    fn wildcard_rules(&self) -> Result<Vec<FilterRule>>;
}

/// Supplies rule snapshots to long-running callers such as the alert relay.
///
/// Each notification is evaluated against one snapshot, so rule edits made
/// between notifications are picked up without restarting.
pub trait RuleProvider: Send + Sync {
    /// Take a consistent copy of the current rule table.
    ///
    /// # Errors
    ///
    /// Returns an error if the rule table cannot be read.
    fn snapshot(&self) -> impl Future<Output = Result<RuleSnapshot>> + Send;
}

impl RuleProvider for RuleSnapshot {
    fn snapshot(&self) -> impl Future<Output = Result<RuleSnapshot>> + Send {
        std::future::ready(Ok(self.clone()))
    }
}

/// A consistent in-memory copy of the rule table.
///
/// Rules are keyed by pattern; a later rule with the same pattern replaces an
/// earlier one.
#[derive(Debug, Clone, Default)]
pub struct RuleSnapshot {
    rules: BTreeMap<String, FilterRule>,
}

impl RuleSnapshot {
    /// Snapshot with no rules.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of rules, active or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the snapshot holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate rules in ascending pattern order.
    pub fn iter(&self) -> impl Iterator<Item = &FilterRule> {
        self.rules.values()
    }
}

impl FromIterator<FilterRule> for RuleSnapshot {
    fn from_iter<I: IntoIterator<Item = FilterRule>>(iter: I) -> Self {
        let rules = iter
            .into_iter()
            .map(|rule| (rule.package_pattern.clone(), rule))
            .collect();
        Self { rules }
    }
}

impl RuleSource for RuleSnapshot {
    fn lookup_exact(&self, package: &str) -> Result<Option<FilterRule>> {
        Ok(self.rules.get(package).cloned())
    }

    fn wildcard_rules(&self) -> Result<Vec<FilterRule>> {
        // BTreeMap iteration is already ascending by pattern.
        Ok(self
            .rules
            .values()
            .filter(|rule| rule.is_wildcard())
            .cloned()
            .collect())
    }
}

impl<T: RuleSource + ?Sized> RuleSource for &T {
    fn lookup_exact(&self, package: &str) -> Result<Option<FilterRule>> {
        (**self).lookup_exact(package)
    }

    fn wildcard_rules(&self) -> Result<Vec<FilterRule>> {
        (**self).wildcard_rules()
    }
}
