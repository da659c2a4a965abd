use async_trait::async_trait;
use mockall::mock;

use crate::error::DataSourceError;
use crate::model::AddressInfo;
use crate::model::TransferRecord;
use crate::pipeline::datasource::DataSource;

// Mock for the upstream data source
mock! {
    pub DataSource {}

    #[async_trait]
    impl DataSource for DataSource {
        async fn get_transfers(&self, address: &str, max_results: usize) -> Result<Vec<TransferRecord>, DataSourceError>;
        async fn get_address_info(&self, address: &str) -> Result<AddressInfo, DataSourceError>;
    }
}

/// Data source with no transfers whose info lookups always fail
pub fn create_unreachable_datasource() -> MockDataSource {
    let mut mock = MockDataSource::new();

    mock.expect_get_transfers().returning(|_, _| Ok(vec![]));

    mock.expect_get_address_info()
        .returning(|address| Err(DataSourceError::AddressNotFound(address.to_string())));

    mock
}
