//! Runtime configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::filter::{FilterCatalog, FilterPolicy, NotificationFilterEngine};
use crate::relay::{AlertRelay, Notifier};
use crate::status::{DeviceStatusClassifier, StatusLevel, StatusThresholds};
use crate::{Error, Result};

/// Deployment settings, read from a JSON file. Every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rule database location. `None` lets the caller pick a platform path.
    pub database_path: Option<PathBuf>,
    /// Filter policy.
    pub filter: FilterPolicy,
    /// Status thresholds.
    pub status: StatusThresholds,
    /// Lowest status level that triggers an operator alert.
    pub alert_level: StatusLevel,
    /// Packages treated as system noise in addition to the built-in list.
    pub extra_system_packages: Vec<String>,
    /// Regular expressions treated as system text in addition to the built-in list.
    pub extra_noise_patterns: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: None,
            filter: FilterPolicy::default(),
            status: StatusThresholds::default(),
            alert_level: StatusLevel::Attention,
            extra_system_packages: Vec::new(),
            extra_noise_patterns: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON for
    /// this structure.
    pub async fn load(path: &Path) -> Result<Self> {
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write configuration as pretty JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any filesystem operation fails.
    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, contents).await?;
        info!("Config saved to {}", path.display());
        Ok(())
    }

    /// Built-in catalog plus the configured extras.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pattern`] if an extra noise pattern is not a valid
    /// regular expression.
    pub fn catalog(&self) -> Result<FilterCatalog> {
        FilterCatalog::with_extra(&self.extra_system_packages, &self.extra_noise_patterns)
    }

    /// Filter engine for this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pattern`] if an extra noise pattern is invalid.
    pub fn engine(&self) -> Result<NotificationFilterEngine> {
        Ok(NotificationFilterEngine::new(
            self.catalog()?,
            self.filter.clone(),
        ))
    }

    /// Status classifier for this configuration.
    #[must_use]
    pub const fn classifier(&self) -> DeviceStatusClassifier {
        DeviceStatusClassifier::new(self.status)
    }

    /// Alert relay wired to `notifier`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pattern`] if an extra noise pattern is invalid.
    pub fn relay<N: Notifier>(&self, notifier: N) -> Result<AlertRelay<N>> {
        Ok(AlertRelay::new(
            self.engine()?,
            self.classifier(),
            notifier,
            self.alert_level,
        ))
    }
}
