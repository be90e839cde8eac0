//! Notification filtering: noise versus signal.
//!
//! This module provides:
//! - **Engine**: decides pass/block for one notification, with a reason
//! - **Rule table**: operator allow/deny rules keyed by exact package or
//!   trailing-wildcard prefix, stored in `SQLite`
//! - **Catalog**: built-in OS/vendor package list and text patterns
//!
//! # Example
//!
//! ```ignore
//! use phonewatch_core::filter::{FilterCatalog, FilterPolicy, NotificationFilterEngine};
//!
//! let engine = NotificationFilterEngine::new(FilterCatalog::builtin()?, FilterPolicy::default());
//! let rules = repo.snapshot().await?;
//!
//! let decision = engine.evaluate(&rules, &sample);
//! if !decision.blocked {
//!     // forward to subscribers
//! }
//! ```

mod catalog;
mod defaults;
mod engine;
mod model;
mod pattern;
mod report;
mod repository;
mod rules;

pub use catalog::{FilterCatalog, IMPORTANT_SMS_PATTERNS, SYSTEM_NOISE_PATTERNS, SYSTEM_PACKAGES};
pub use defaults::default_rules;
pub use engine::{DEFAULT_SMS_PACKAGE, FilterPolicy, NotificationFilterEngine};
pub use model::{DecisionSource, FilterDecision, FilterRule, NotificationSample, RuleKind};
pub use pattern::{PackagePattern, WILDCARD};
pub use report::{FilterReport, PackageStats};
pub use repository::{FilterRuleRepository, RuleStats, SeedReport};
pub use rules::{RuleProvider, RuleSnapshot, RuleSource};
