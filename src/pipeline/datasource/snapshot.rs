use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::error::DataSourceError;
use crate::model::AddressInfo;
use crate::model::TransferRecord;
use crate::pipeline::datasource::DataSource;
use crate::pipeline::datasource::normalize;

#[derive(Debug, Default, Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    transfers: HashMap<String, Value>,
    #[serde(default)]
    info: HashMap<String, Value>,
}

/// Offline replay of previously fetched upstream payloads.
///
/// File layout: `{"transfers": {address: <full-transactions response>},
/// "info": {address: {"balance": .., "transaction_count": .., "is_exchange": ..}}}`.
/// Addresses missing from `transfers` have no transfers; addresses missing from
/// `info` fail the lookup.
#[derive(Debug, Clone, Default)]
pub struct SnapshotDataSource {
    transfers: HashMap<String, Vec<TransferRecord>>,
    info: HashMap<String, AddressInfo>,
}

impl SnapshotDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(payload: &str) -> Result<Self, DataSourceError> {
        let file: SnapshotFile = serde_json::from_str(payload)?;
        let mut snapshot = Self::new();

        for (address, response) in file.transfers {
            let records = normalize::transfer_list(response)?;
            let transfers = normalize::normalize_transfers(&address, &records);
            snapshot.transfers.insert(address, transfers);
        }
        for (address, value) in file.info {
            match normalize::address_info_from_value(&value) {
                Some(info) => {
                    snapshot.info.insert(address, info);
                },
                None => tracing::warn!("snapshot_info_malformed::address::{}", address),
            }
        }

        tracing::debug!(
            "snapshot_loaded::transfer_addresses::{}::info_addresses::{}",
            snapshot.transfers.len(),
            snapshot.info.len()
        );
        Ok(snapshot)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataSourceError> {
        let payload = std::fs::read_to_string(path)?;
        Self::from_json(&payload)
    }

    pub fn with_transfers(
        mut self,
        address: impl Into<String>,
        transfers: Vec<TransferRecord>,
    ) -> Self {
        self.transfers.insert(address.into(), transfers);
        self
    }

    pub fn with_info(
        mut self,
        address: impl Into<String>,
        info: AddressInfo,
    ) -> Self {
        self.info.insert(address.into(), info);
        self
    }
}

#[async_trait]
impl DataSource for SnapshotDataSource {
    async fn get_transfers(
        &self,
        address: &str,
        max_results: usize,
    ) -> Result<Vec<TransferRecord>, DataSourceError> {
        Ok(self
            .transfers
            .get(address)
            .map(|transfers| transfers.iter().take(max_results).cloned().collect())
            .unwrap_or_default())
    }

    async fn get_address_info(
        &self,
        address: &str,
    ) -> Result<AddressInfo, DataSourceError> {
        self.info.get(address).cloned().ok_or_else(|| DataSourceError::AddressNotFound(address.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn test_snapshot_replay() {
        let snapshot = SnapshotDataSource::from_json(
            r#"{
                "transfers": {
                    "kaspa:a": [
                        {"txid": "t1", "block_time": 10, "outputs": [{"address": "kaspa:b", "amount": 100}]},
                        {"txid": "t2", "block_time": 20, "outputs": [{"address": "kaspa:c", "amount": 200}]}
                    ],
                    "kaspa:b": {"transactions": []}
                },
                "info": {"kaspa:a": {"balance": 1000, "transactionsCount": 2}}
            }"#,
        )
        .unwrap();

        assert_eq!(snapshot.get_transfers("kaspa:a", 100).await.unwrap().len(), 2);
        assert_eq!(snapshot.get_transfers("kaspa:a", 1).await.unwrap().len(), 1);
        assert!(snapshot.get_transfers("kaspa:b", 100).await.unwrap().is_empty());
        assert!(snapshot.get_transfers("kaspa:unknown", 100).await.unwrap().is_empty());

        let info = snapshot.get_address_info("kaspa:a").await.unwrap();
        assert_eq!(info.balance, 1000);
        assert_eq!(info.transaction_count, 2);
        assert!(matches!(
            snapshot.get_address_info("kaspa:b").await,
            Err(DataSourceError::AddressNotFound(_))
        ));
    }
}
