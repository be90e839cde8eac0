//! Ties filtering and status classification to alert delivery.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::alert::Alert;
use super::notifier::Notifier;
use crate::filter::{
    FilterDecision, NotificationFilterEngine, NotificationSample, RuleProvider, RuleSnapshot,
};
use crate::status::{DeviceStatusClassifier, StatusLevel, StatusResult, TelemetrySnapshot};

/// Runs device events through the engine and classifier and forwards what
/// matters to a [`Notifier`].
pub struct AlertRelay<N> {
    engine: NotificationFilterEngine,
    classifier: DeviceStatusClassifier,
    notifier: N,
    alert_level: StatusLevel,
}

impl<N: Notifier> AlertRelay<N> {
    /// Create a relay. Status alerts fire at `alert_level` and above.
    #[must_use]
    pub const fn new(
        engine: NotificationFilterEngine,
        classifier: DeviceStatusClassifier,
        notifier: N,
        alert_level: StatusLevel,
    ) -> Self {
        Self {
            engine,
            classifier,
            notifier,
            alert_level,
        }
    }

    /// The filter engine.
    #[must_use]
    pub const fn engine(&self) -> &NotificationFilterEngine {
        &self.engine
    }

    /// The delivery target.
    #[must_use]
    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Filter a notification and forward it if it passes.
    ///
    /// An unreadable rule table degrades to the built-in lists. Delivery
    /// failures are logged and do not change the decision.
    pub async fn on_notification<P>(
        &self,
        rules: &P,
        device: &str,
        sample: &NotificationSample,
    ) -> FilterDecision
    where
        P: RuleProvider + ?Sized,
    {
        let snapshot = match rules.snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Rule table unavailable, using built-in lists: {e}");
                RuleSnapshot::empty()
            }
        };

        let decision = self.engine.evaluate(&snapshot, sample);
        if decision.blocked {
            debug!(device, reason = %decision.reason, "Notification suppressed");
            return decision;
        }

        let alert = Alert::message(device, sample, Utc::now());
        if let Err(e) = self.notifier.deliver(&alert).await {
            warn!(device, "Failed to deliver message alert: {e}");
        }
        decision
    }

    /// Classify telemetry and escalate when the level warrants it.
    pub async fn on_telemetry(
        &self,
        device: &str,
        snapshot: &TelemetrySnapshot,
        now: DateTime<Utc>,
    ) -> StatusResult {
        let result = self.classifier.classify(snapshot, now);
        debug!(device, level = %result.level, "Telemetry classified");

        if result.needs_alert(self.alert_level) {
            let alert = Alert::status(device, &result);
            if let Err(e) = self.notifier.deliver(&alert).await {
                warn!(device, "Failed to deliver status alert: {e}");
            }
        }
        result
    }
}
