use phonewatch_core::{Alert, AlertKind, Notifier, Result};
use tracing::{info, warn};

/// Writes operator alerts to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    async fn deliver(&self, alert: &Alert) -> Result<()> {
        match &alert.kind {
            AlertKind::Message { .. } => info!(device = %alert.device, "\n{}", alert.render()),
            AlertKind::Status { .. } => warn!(device = %alert.device, "\n{}", alert.render()),
        }
        Ok(())
    }
}
