//! Provider availability reporting.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Snapshot of provider availability, assembled fresh on every call — probes
/// are cheap local checks, so nothing is cached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStatusReport {
    pub provider_status: BTreeMap<String, bool>,
    /// Available providers in priority order.
    pub available_providers: Vec<String>,
    /// First available provider in priority order, if any.
    pub preferred_provider: Option<String>,
    pub has_available_provider: bool,
    pub checked_at: DateTime<Utc>,
}
