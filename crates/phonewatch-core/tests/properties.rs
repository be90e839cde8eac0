//! Property tests for the filter engine and the status classifier.

#![allow(clippy::unwrap_used)]

use chrono::{Duration, TimeZone, Utc};
use phonewatch_core::filter::{DEFAULT_SMS_PACKAGE, SYSTEM_PACKAGES};
use phonewatch_core::{
    DeviceStatusClassifier, FilterCatalog, FilterPolicy, FilterRule, NotificationFilterEngine,
    NotificationSample, RuleSnapshot, StatusLevel, TelemetrySnapshot,
};
use proptest::prelude::*;

fn engine() -> NotificationFilterEngine {
    NotificationFilterEngine::new(FilterCatalog::builtin().unwrap(), FilterPolicy::default())
}

fn arb_age() -> impl Strategy<Value = Option<Duration>> {
    prop::option::of((0_i64..600).prop_map(Duration::minutes))
}

fn arb_snapshot() -> impl Strategy<Value = TelemetrySnapshot> {
    (0_u8..=100, any::<bool>(), any::<bool>(), 0_u32..30, arb_age()).prop_map(
        |(battery, charging, network, unsent, age)| TelemetrySnapshot {
            battery_percent: battery,
            is_charging: charging,
            network_available: network,
            unsent_count: unsent,
            last_notification_age: age,
        },
    )
}

fn arb_package() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop_oneof![
        prop::sample::select(SYSTEM_PACKAGES).prop_map(ToString::to_string),
        "[a-z]{2,6}(\\.[a-z]{2,8}){1,3}",
        Just("   ".to_string()),
    ])
}

fn arb_rule() -> impl Strategy<Value = FilterRule> {
    let pattern = prop_oneof![
        "[a-z]{2,6}(\\.[a-z]{2,8}){1,3}",
        "[a-z]{2,6}(\\.[a-z]{2,8}){0,2}\\.\\*",
        Just("*".to_string()),
        Just("com.*.foo".to_string()),
    ];
    (pattern, any::<bool>(), any::<bool>(), "[a-z ]{0,12}").prop_map(
        |(pattern, allow, active, description)| {
            let rule = if allow {
                FilterRule::allow(pattern, description)
            } else {
                FilterRule::deny(pattern, description)
            };
            if active { rule } else { rule.inactive() }
        },
    )
}

proptest! {
    /// Draining the battery never makes the status better.
    #[test]
    fn prop_battery_monotonic(snapshot in arb_snapshot(), a in 0_u8..=100, b in 0_u8..=100) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let classifier = DeviceStatusClassifier::default();
        let now = Utc::now();

        let drained = TelemetrySnapshot { battery_percent: low, ..snapshot };
        let charged = TelemetrySnapshot { battery_percent: high, ..snapshot };

        let at_low = classifier.classify(&drained, now);
        let at_high = classifier.classify(&charged, now);

        prop_assert!(at_low.level >= at_high.level);
    }

    /// Classification depends only on its inputs.
    #[test]
    fn prop_classify_is_pure(snapshot in arb_snapshot(), secs in 0_i64..2_000_000_000) {
        let now = Utc.timestamp_opt(secs, 0).single().unwrap();
        let classifier = DeviceStatusClassifier::default();
        prop_assert_eq!(classifier.classify(&snapshot, now), classifier.classify(&snapshot, now));
    }

    /// Every result carries at least one reason; errors carry exactly one.
    #[test]
    fn prop_reasons_present(snapshot in arb_snapshot()) {
        let result = DeviceStatusClassifier::default().classify(&snapshot, Utc::now());
        prop_assert!(!result.reasons.is_empty());
        if result.level == StatusLevel::Error {
            prop_assert_eq!(result.reasons.len(), 1);
        }
    }

    /// A blocked notification always says why.
    #[test]
    fn prop_blocked_has_reason(
        rules in prop::collection::vec(arb_rule(), 0..8),
        package in arb_package(),
        sender in "\\PC{0,12}",
        text in "\\PC{0,40}",
    ) {
        let snapshot: RuleSnapshot = rules.into_iter().collect();
        let sample = NotificationSample::new(package.as_deref(), sender, text);
        let decision = engine().evaluate(&snapshot, &sample);
        if decision.blocked {
            prop_assert!(!decision.reason.is_empty());
        }
    }

    /// With no rules, built-in system packages are blocked whatever the text.
    #[test]
    fn prop_system_packages_blocked(
        package in prop::sample::select(SYSTEM_PACKAGES)
            .prop_filter("SMS package has its own rule", |p| *p != DEFAULT_SMS_PACKAGE),
        text in "\\PC{0,40}",
    ) {
        let sample = NotificationSample::new(Some(package), "sender", text);
        let decision = engine().evaluate(&RuleSnapshot::empty(), &sample);
        prop_assert!(decision.blocked);
    }

    /// Malformed wildcards never decide anything.
    #[test]
    fn prop_malformed_wildcards_ignored(
        package in "[a-z]{2,6}(\\.[a-z]{2,8}){1,3}",
        text in "[a-z ]{1,20}",
    ) {
        let bad: RuleSnapshot = ["*", "com.*.foo", "com.**", "*.android"]
            .into_iter()
            .map(|p| FilterRule::deny(p, ""))
            .collect();
        let sample = NotificationSample::new(Some(package.as_str()), "sender", text);

        let with_bad = engine().evaluate(&bad, &sample);
        let without = engine().evaluate(&RuleSnapshot::empty(), &sample);
        prop_assert_eq!(with_bad, without);
    }
}
