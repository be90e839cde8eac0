//! Alert relay: forwards passing notifications and worrying device status
//! to the operator through a [`Notifier`].

mod alert;
mod dispatch;
mod notifier;

pub use alert::{Alert, AlertKind};
pub use dispatch::AlertRelay;
pub use notifier::Notifier;
