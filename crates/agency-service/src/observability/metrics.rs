//! Metrics definitions for the casting agency service.
//!
//! All metrics follow Prometheus naming conventions:
//! - `agency_` prefix
//! - `_total` suffix for counters
//!
//! # Cardinality
//!
//! Labels are bounded to prevent cardinality explosion:
//! - `outcome`: one value per authorization failure kind plus `granted`

use metrics::counter;

/// Record the outcome of one authorization decision.
///
/// Metric: `agency_auth_decisions_total`
/// Labels: `outcome` (`granted` or an [`crate::auth::AuthError`] metric
/// label)
pub fn record_auth_decision(outcome: &'static str) {
    counter!("agency_auth_decisions_total", "outcome" => outcome).increment(1);
}
