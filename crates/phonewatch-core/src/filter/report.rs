//! Batch evaluation summaries.
//!
//! Useful for checking what a rule set would do to a backlog of stored
//! notifications before switching it on.

use std::collections::HashMap;

use serde::Serialize;

use super::engine::NotificationFilterEngine;
use super::model::NotificationSample;
use super::rules::RuleSource;

/// Counts for one package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackageStats {
    /// Package identifier, empty for notifications without one.
    pub package: String,
    /// Notifications seen.
    pub total: u32,
    /// Notifications that would be blocked.
    pub blocked: u32,
}

impl PackageStats {
    /// Blocked share in percent.
    #[must_use]
    pub fn blocked_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            f64::from(self.blocked) * 100.0 / f64::from(self.total)
        }
    }
}

/// Outcome of evaluating a batch of notifications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterReport {
    /// Notifications evaluated.
    pub total: u32,
    /// Notifications that would be blocked.
    pub blocked: u32,
    /// Notifications that would pass.
    pub allowed: u32,
    /// Per-package counts, busiest first, ties by package name.
    pub packages: Vec<PackageStats>,
}

impl FilterReport {
    /// Evaluate every sample against the same rule source.
    pub fn build<'a, R, I>(engine: &NotificationFilterEngine, rules: &R, samples: I) -> Self
    where
        R: RuleSource + ?Sized,
        I: IntoIterator<Item = &'a NotificationSample>,
    {
        let mut report = Self::default();
        let mut by_package: HashMap<String, PackageStats> = HashMap::new();

        for sample in samples {
            let decision = engine.evaluate(rules, sample);
            let package = sample.package().unwrap_or_default().to_string();
            let stats = by_package
                .entry(package.clone())
                .or_insert_with(|| PackageStats {
                    package,
                    ..PackageStats::default()
                });

            stats.total += 1;
            report.total += 1;
            if decision.blocked {
                stats.blocked += 1;
                report.blocked += 1;
            } else {
                report.allowed += 1;
            }
        }

        let mut packages: Vec<_> = by_package.into_values().collect();
        packages.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.package.cmp(&b.package)));
        report.packages = packages;
        report
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::filter::{FilterCatalog, FilterPolicy, FilterRule, RuleSnapshot};

    #[test]
    fn test_report_counts() {
        let engine = NotificationFilterEngine::new(
            FilterCatalog::builtin().unwrap(),
            FilterPolicy::default(),
        );
        let rules: RuleSnapshot = [FilterRule::deny("com.noisy.*", "noisy vendor")]
            .into_iter()
            .collect();

        let samples = vec![
            NotificationSample::new(Some("com.noisy.a"), "x", "ping"),
            NotificationSample::new(Some("com.noisy.a"), "x", "ping"),
            NotificationSample::new(Some("com.bank.app"), "Bank", "Payment received"),
            NotificationSample::new(None, "", ""),
        ];

        let report = FilterReport::build(&engine, &rules, &samples);
        assert_eq!(report.total, 4);
        assert_eq!(report.blocked, 3);
        assert_eq!(report.allowed, 1);

        assert_eq!(report.packages[0].package, "com.noisy.a");
        assert_eq!(report.packages[0].total, 2);
        assert!((report.packages[0].blocked_percent() - 100.0).abs() < f64::EPSILON);
        assert_eq!(report.packages.len(), 3);
    }

    #[test]
    fn test_empty_batch() {
        let engine = NotificationFilterEngine::new(
            FilterCatalog::builtin().unwrap(),
            FilterPolicy::default(),
        );
        let samples: Vec<NotificationSample> = Vec::new();
        let report = FilterReport::build(&engine, &RuleSnapshot::empty(), &samples);
        assert_eq!(report, FilterReport::default());
    }
}
