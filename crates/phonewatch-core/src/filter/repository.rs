//! Filter rule repository for persistent storage of operator rules.

use serde::Serialize;
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::info;

use super::defaults::default_rules;
use super::model::{FilterRule, RuleKind};
use super::rules::{RuleProvider, RuleSnapshot};
use crate::{Error, Result};

/// Repository for the operator-curated rule table.
pub struct FilterRuleRepository {
    pool: SqlitePool,
}

impl FilterRuleRepository {
    /// Create a new repository with the given database path.
    ///
    /// Creates the database and tables if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn new(database_path: &str) -> Result<Self> {
        let url = format!("sqlite:{database_path}?mode=rwc");
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        let repo = Self { pool };
        repo.initialize().await?;
        Ok(repo)
    }

    /// Create an in-memory repository for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let repo = Self { pool };
        repo.initialize().await?;
        Ok(repo)
    }

    /// Initialize database schema.
    async fn initialize(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS filter_rules (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                package_pattern TEXT NOT NULL UNIQUE,
                kind TEXT NOT NULL DEFAULT 'deny',
                active INTEGER NOT NULL DEFAULT 1,
                description TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        // Index for the wildcard scan
        sqlx::query(
            r"
            CREATE INDEX IF NOT EXISTS idx_filter_rules_active
            ON filter_rules(active, package_pattern)
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a rule by its exact pattern.
    ///
    /// Returns `None` if no rule has this pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_rule(&self, package_pattern: &str) -> Result<Option<FilterRule>> {
        let row = sqlx::query(
            r"
            SELECT package_pattern, kind, active, description
            FROM filter_rules
            WHERE package_pattern = ?
            ",
        )
        .bind(package_pattern)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| row_to_rule(&r)))
    }

    /// List all rules, active or not, in ascending pattern order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_rules(&self) -> Result<Vec<FilterRule>> {
        let rows = sqlx::query(
            r"
            SELECT package_pattern, kind, active, description
            FROM filter_rules
            ORDER BY package_pattern ASC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_rule).collect())
    }

    /// Insert a rule, or replace the kind, state and description of the
    /// rule with the same pattern.
    ///
    /// Returns `true` if a new rule was created.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn upsert_rule(&self, rule: &FilterRule) -> Result<bool> {
        let updated = sqlx::query(
            r"
            UPDATE filter_rules
            SET kind = ?,
                active = ?,
                description = ?,
                updated_at = CURRENT_TIMESTAMP
            WHERE package_pattern = ?
            ",
        )
        .bind(rule.kind.as_str())
        .bind(rule.active)
        .bind(&rule.description)
        .bind(&rule.package_pattern)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() > 0 {
            return Ok(false);
        }

        sqlx::query(
            r"
            INSERT INTO filter_rules (package_pattern, kind, active, description)
            VALUES (?, ?, ?, ?)
            ",
        )
        .bind(&rule.package_pattern)
        .bind(rule.kind.as_str())
        .bind(rule.active)
        .bind(&rule.description)
        .execute(&self.pool)
        .await?;

        Ok(true)
    }

    /// Enable or disable a rule.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RuleNotFound`] if no rule has this pattern, or an
    /// error if the database operation fails.
    pub async fn set_active(&self, package_pattern: &str, active: bool) -> Result<()> {
        let updated = sqlx::query(
            r"
            UPDATE filter_rules
            SET active = ?,
                updated_at = CURRENT_TIMESTAMP
            WHERE package_pattern = ?
            ",
        )
        .bind(active)
        .bind(package_pattern)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(Error::RuleNotFound(package_pattern.to_string()));
        }
        Ok(())
    }

    /// Delete a rule entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn delete_rule(&self, package_pattern: &str) -> Result<()> {
        sqlx::query(
            r"
            DELETE FROM filter_rules
            WHERE package_pattern = ?
            ",
        )
        .bind(package_pattern)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete every rule.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn clear(&self) -> Result<()> {
        sqlx::query("DELETE FROM filter_rules")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Create or refresh the default rule set.
    ///
    /// With `reset`, every existing rule is removed first. The SMS allow rule
    /// is written for `sms_package`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn seed_defaults(&self, reset: bool, sms_package: &str) -> Result<SeedReport> {
        if reset {
            self.clear().await?;
        }

        let mut report = SeedReport::default();
        for rule in default_rules(sms_package) {
            if self.upsert_rule(&rule).await? {
                report.created += 1;
            } else {
                report.updated += 1;
            }
        }

        info!(
            created = report.created,
            updated = report.updated,
            "Seeded default filter rules"
        );
        Ok(report)
    }

    /// Get statistics about the rule table.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn stats(&self) -> Result<RuleStats> {
        let row = sqlx::query(
            r"
            SELECT
                COUNT(*) as total,
                COALESCE(SUM(CASE WHEN active = 1 THEN 1 ELSE 0 END), 0) as active,
                COALESCE(SUM(CASE WHEN kind = 'deny' THEN 1 ELSE 0 END), 0) as deny,
                COALESCE(SUM(CASE WHEN kind = 'allow' THEN 1 ELSE 0 END), 0) as allow,
                COALESCE(SUM(CASE WHEN package_pattern LIKE '%*' THEN 1 ELSE 0 END), 0) as wildcard
            FROM filter_rules
            ",
        )
        .fetch_one(&self.pool)
        .await?;

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Ok(RuleStats {
            total: row.get::<i64, _>("total") as u32,
            active: row.get::<i64, _>("active") as u32,
            deny: row.get::<i64, _>("deny") as u32,
            allow: row.get::<i64, _>("allow") as u32,
            wildcard: row.get::<i64, _>("wildcard") as u32,
        })
    }

    /// Take a consistent in-memory copy of the rule table for evaluation.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn snapshot(&self) -> Result<RuleSnapshot> {
        Ok(self.list_rules().await?.into_iter().collect())
    }
}

impl RuleProvider for FilterRuleRepository {
    fn snapshot(&self) -> impl std::future::Future<Output = Result<RuleSnapshot>> + Send {
        Self::snapshot(self)
    }
}

/// Result of seeding the default rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    /// Rules that did not exist before.
    pub created: u32,
    /// Existing rules overwritten with the default values.
    pub updated: u32,
}

/// Statistics about the rule table.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RuleStats {
    /// Total number of rules.
    pub total: u32,
    /// Rules the engine will consult.
    pub active: u32,
    /// Deny rules.
    pub deny: u32,
    /// Allow rules.
    pub allow: u32,
    /// Rules with a trailing wildcard.
    pub wildcard: u32,
}

/// Convert a database row to a `FilterRule`.
fn row_to_rule(row: &sqlx::sqlite::SqliteRow) -> FilterRule {
    FilterRule {
        package_pattern: row.get("package_pattern"),
        kind: RuleKind::parse(row.get("kind")),
        active: row.get("active"),
        description: row.get("description"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::filter::{DEFAULT_SMS_PACKAGE, RuleSource};

    #[tokio::test]
    async fn test_upsert_and_get() {
        let repo = FilterRuleRepository::in_memory().await.unwrap();

        let created = repo
            .upsert_rule(&FilterRule::deny("com.vendor.ads", "Ads"))
            .await
            .unwrap();
        assert!(created);

        let rule = repo.get_rule("com.vendor.ads").await.unwrap().unwrap();
        assert_eq!(rule.kind, RuleKind::Deny);
        assert!(rule.active);
        assert_eq!(rule.description, "Ads");
    }

    #[tokio::test]
    async fn test_upsert_existing_overwrites() {
        let repo = FilterRuleRepository::in_memory().await.unwrap();

        repo.upsert_rule(&FilterRule::deny("com.vendor.ads", "Ads"))
            .await
            .unwrap();
        let created = repo
            .upsert_rule(&FilterRule::allow("com.vendor.ads", "Actually wanted"))
            .await
            .unwrap();
        assert!(!created);

        let rule = repo.get_rule("com.vendor.ads").await.unwrap().unwrap();
        assert_eq!(rule.kind, RuleKind::Allow);
        assert_eq!(repo.list_rules().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_set_active() {
        let repo = FilterRuleRepository::in_memory().await.unwrap();

        repo.upsert_rule(&FilterRule::deny("com.vendor.ads", "Ads"))
            .await
            .unwrap();
        repo.set_active("com.vendor.ads", false).await.unwrap();

        let rule = repo.get_rule("com.vendor.ads").await.unwrap().unwrap();
        assert!(!rule.active);
    }

    #[tokio::test]
    async fn test_set_active_missing_rule() {
        let repo = FilterRuleRepository::in_memory().await.unwrap();

        let result = repo.set_active("com.missing", true).await;
        assert!(matches!(result, Err(Error::RuleNotFound(p)) if p == "com.missing"));
    }

    #[tokio::test]
    async fn test_delete_rule() {
        let repo = FilterRuleRepository::in_memory().await.unwrap();

        repo.upsert_rule(&FilterRule::deny("com.vendor.ads", "Ads"))
            .await
            .unwrap();
        repo.delete_rule("com.vendor.ads").await.unwrap();

        assert!(repo.get_rule("com.vendor.ads").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_seed_defaults_twice() {
        let repo = FilterRuleRepository::in_memory().await.unwrap();
        let expected = u32::try_from(default_rules(DEFAULT_SMS_PACKAGE).len()).unwrap();

        let first = repo.seed_defaults(false, DEFAULT_SMS_PACKAGE).await.unwrap();
        assert_eq!(first.created, expected);
        assert_eq!(first.updated, 0);

        let second = repo.seed_defaults(false, DEFAULT_SMS_PACKAGE).await.unwrap();
        assert_eq!(second.created, 0);
        assert_eq!(second.updated, expected);
    }

    #[tokio::test]
    async fn test_seed_defaults_reset_removes_custom_rules() {
        let repo = FilterRuleRepository::in_memory().await.unwrap();

        repo.upsert_rule(&FilterRule::deny("com.custom.app", "custom"))
            .await
            .unwrap();
        repo.seed_defaults(true, DEFAULT_SMS_PACKAGE).await.unwrap();

        assert!(repo.get_rule("com.custom.app").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_seed_defaults_uses_configured_sms_package() {
        let repo = FilterRuleRepository::in_memory().await.unwrap();

        repo.seed_defaults(false, "com.samsung.android.messaging")
            .await
            .unwrap();

        let sms = repo
            .get_rule("com.samsung.android.messaging")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(sms.kind, RuleKind::Allow);
        assert!(repo.get_rule(DEFAULT_SMS_PACKAGE).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stats() {
        let repo = FilterRuleRepository::in_memory().await.unwrap();

        repo.upsert_rule(&FilterRule::deny("com.android.*", "Android"))
            .await
            .unwrap();
        repo.upsert_rule(&FilterRule::allow("com.bank.app", "Bank"))
            .await
            .unwrap();
        repo.upsert_rule(&FilterRule::deny("com.vendor.ads", "Ads").inactive())
            .await
            .unwrap();

        let stats = repo.stats().await.unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.deny, 2);
        assert_eq!(stats.allow, 1);
        assert_eq!(stats.wildcard, 1);
    }

    #[tokio::test]
    async fn test_stats_empty_table() {
        let repo = FilterRuleRepository::in_memory().await.unwrap();

        let stats = repo.stats().await.unwrap();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.active, 0);
    }

    #[tokio::test]
    async fn test_snapshot_serves_engine_lookups() {
        let repo = FilterRuleRepository::in_memory().await.unwrap();
        repo.seed_defaults(false, DEFAULT_SMS_PACKAGE).await.unwrap();

        let snapshot = repo.snapshot().await.unwrap();
        let exact = snapshot.lookup_exact("com.oppo.ota").unwrap().unwrap();
        assert_eq!(exact.kind, RuleKind::Deny);

        let wildcards = snapshot.wildcard_rules().unwrap();
        assert!(wildcards.iter().all(FilterRule::is_wildcard));
        assert!(
            wildcards
                .windows(2)
                .all(|w| w[0].package_pattern < w[1].package_pattern)
        );
    }
}
