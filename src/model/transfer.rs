use serde::Deserialize;
use serde::Serialize;

use crate::utils::normalize_timestamp;
use crate::utils::sompi_to_kas;

/// One movement of funds between two addresses, amounts in KAS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub transaction_id: String,
    pub amount: f64,
    pub timestamp: i64,
    pub date: String,
}

impl Transfer {
    /// Scale a raw sompi amount into KAS and validate the block time.
    pub fn from_sompi(
        transaction_id: impl Into<String>,
        amount_sompi: u64,
        timestamp: i64,
    ) -> Self {
        let (timestamp, date) = normalize_timestamp(timestamp);
        Self {
            transaction_id: transaction_id.into(),
            amount: sompi_to_kas(amount_sompi),
            timestamp,
            date,
        }
    }
}

/// Canonical transfer record as delivered by a `DataSource`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransferRecord {
    pub transaction_id: String,
    /// Unix seconds, unvalidated
    pub timestamp: i64,
    pub outputs: Vec<TransferOutput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOutput {
    pub address: String,
    /// Sompi
    pub amount: u64,
}

impl TransferOutput {
    pub fn new(
        address: impl Into<String>,
        amount: u64,
    ) -> Self {
        Self {
            address: address.into(),
            amount,
        }
    }
}

/// Per-address summary. `AddressInfo::default()` is the fallback used when the
/// lookup fails.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AddressInfo {
    /// Sompi
    pub balance: u64,
    pub transaction_count: u64,
    pub is_exchange: bool,
}
