use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_MAX_TRANSFERS_PER_ADDRESS;
use crate::constants::KASPA_API_URL;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KaspaApiConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    /// `max_results` handed to every transfer lookup
    pub max_transfers_per_address: usize,
}

impl Default for KaspaApiConfig {
    fn default() -> Self {
        Self {
            base_url: KASPA_API_URL.to_string(),
            timeout_ms: 30_000,
            max_transfers_per_address: DEFAULT_MAX_TRANSFERS_PER_ADDRESS,
        }
    }
}
