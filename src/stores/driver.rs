use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What the store map exposes for one listed store, before any cleanup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub latitude: Option<String>,
    #[serde(default)]
    pub longitude: Option<String>,
    /// May span several lines; only the first is the address.
    #[serde(default)]
    pub address_text: Option<String>,
}

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("failed to select region {code}: {reason}")]
    Selection { code: String, reason: String },

    #[error("store list did not load within {timeout:?}")]
    LoadTimeout { timeout: Duration },

    #[error("store list failed to load: {reason}")]
    Load { reason: String },

    /// The driver itself is gone; nothing further can be collected.
    #[error("page driver failed: {reason}")]
    Fatal { reason: String },
}

impl DriverError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal { .. })
    }
}

/// The store map page, reduced to the handful of interactions the
/// collector needs.
pub trait PageDriver {
    fn select_region(&mut self, code: &str) -> Result<(), DriverError>;

    /// Pick the "all districts" option, which triggers loading the full list.
    fn select_all_subdivisions(&mut self) -> Result<(), DriverError>;

    fn wait_for_load_complete(&mut self, timeout: Duration) -> Result<(), DriverError>;

    fn list_visible_entries(&mut self) -> Result<Vec<RawEntry>, DriverError>;

    fn reset_selection(&mut self) -> Result<(), DriverError>;
}
