//! Delivery seam for operator alerts.

use std::future::Future;

use super::alert::Alert;
use crate::Result;

/// Sends alerts to the operator channel (chat bot, log, webhook).
///
/// Implementations report transport problems as [`crate::Error::Delivery`].
pub trait Notifier: Send + Sync {
    /// Delivers one alert.
    fn deliver(&self, alert: &Alert) -> impl Future<Output = Result<()>> + Send;
}

impl<N: Notifier> Notifier for std::sync::Arc<N> {
    fn deliver(&self, alert: &Alert) -> impl Future<Output = Result<()>> + Send {
        (**self).deliver(alert)
    }
}
