//! Default operator rule set.

use super::model::FilterRule;

/// Rules seeded into an empty rule table.
///
/// Exact entries silence vendor/system apps seen in the field; the wildcard
/// entries catch the rest of each vendor namespace. `sms_package` is the
/// messaging app the SMS importance check is configured for; it gets the
/// allow rule.
#[must_use]
pub fn default_rules(sms_package: &str) -> Vec<FilterRule> {
    vec![
        FilterRule::allow(
            sms_package,
            "SMS: only bank and operator messages are let through",
        ),
        FilterRule::deny("com.onlyone.app.FC", "FC agent service messages"),
        FilterRule::deny("com.android.systemui", "Android system UI notifications"),
        FilterRule::deny("ru.vk.store", "VK Store notifications"),
        FilterRule::deny("com.android.vending", "Google Play Store notifications"),
        FilterRule::deny("com.transsnet.store", "Transsnet Store notifications"),
        FilterRule::deny("com.xiaomi.mipicks", "Xiaomi Mi Picks system notifications"),
        FilterRule::deny("com.xiaomi.discover", "Xiaomi Discover system notifications"),
        FilterRule::deny(
            "com.google.android.setupwizard",
            "Google Setup Wizard system notifications",
        ),
        FilterRule::deny("com.google.android.gms", "Google Mobile Services notifications"),
        FilterRule::deny("com.google.android.dialer", "Google Dialer system notifications"),
        FilterRule::deny("com.oppo.ota", "OPPO OTA update notifications"),
        FilterRule::deny("com.sh.smart.caller", "Smart Caller system notifications"),
        FilterRule::deny("com.nearme.romupdate", "Nearme ROM update notifications"),
        FilterRule::deny("com.sprd.omacp", "Spreadtrum OMACP system notifications"),
        FilterRule::deny(
            "com.google.android.apps.wellbeing",
            "Google Wellbeing system notifications",
        ),
        FilterRule::deny(
            "com.android.providers.downloads",
            "Android downloads provider notifications",
        ),
        FilterRule::deny("com.miui.securitycenter", "MIUI Security Center notifications"),
        FilterRule::deny("com.miui.msa.global", "MIUI MSA Global notifications"),
        FilterRule::deny("com.android.*", "All Android system packages"),
        FilterRule::deny("com.google.android.*", "All Google system packages"),
        FilterRule::deny("com.xiaomi.*", "All Xiaomi system packages"),
        FilterRule::deny("com.oppo.*", "All OPPO system packages"),
        FilterRule::deny("com.miui.*", "All MIUI system packages"),
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::filter::engine::DEFAULT_SMS_PACKAGE;
    use crate::filter::model::RuleKind;
    use crate::filter::pattern::PackagePattern;

    #[test]
    fn test_patterns_unique() {
        let rules = default_rules(DEFAULT_SMS_PACKAGE);
        let unique: HashSet<_> = rules.iter().map(|r| r.package_pattern.as_str()).collect();
        assert_eq!(unique.len(), rules.len());
    }

    #[test]
    fn test_wildcards_well_formed() {
        for rule in default_rules(DEFAULT_SMS_PACKAGE).iter().filter(|r| r.is_wildcard()) {
            assert!(
                matches!(
                    PackagePattern::parse(&rule.package_pattern),
                    PackagePattern::Prefix(_)
                ),
                "{}",
                rule.package_pattern
            );
        }
    }

    #[test]
    fn test_all_active_with_descriptions() {
        assert!(
            default_rules(DEFAULT_SMS_PACKAGE)
                .iter()
                .all(|r| r.active && !r.description.is_empty())
        );
    }

    #[test]
    fn test_sms_allow_rule_follows_configured_package() {
        let rules = default_rules("com.samsung.android.messaging");

        let sms = &rules[0];
        assert_eq!(sms.package_pattern, "com.samsung.android.messaging");
        assert_eq!(sms.kind, RuleKind::Allow);
        assert!(
            rules
                .iter()
                .all(|r| r.package_pattern != DEFAULT_SMS_PACKAGE)
        );
    }
}
