pub mod kaspa_api;
pub mod normalize;
pub mod snapshot;

use async_trait::async_trait;

pub use kaspa_api::KaspaApiClient;
pub use snapshot::SnapshotDataSource;

use crate::error::DataSourceError;
use crate::model::AddressInfo;
use crate::model::TransferRecord;

/// Narrow capability the graph builder consumes. Implementations normalize
/// whatever the upstream returns into the canonical record types.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn get_transfers(
        &self,
        address: &str,
        max_results: usize,
    ) -> Result<Vec<TransferRecord>, DataSourceError>;

    async fn get_address_info(
        &self,
        address: &str,
    ) -> Result<AddressInfo, DataSourceError>;
}
