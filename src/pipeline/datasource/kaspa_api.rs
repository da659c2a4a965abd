use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use tracing::error;
use tracing::warn;
use url::Url;

use crate::config::KaspaApiConfig;
use crate::error::DataSourceError;
use crate::model::AddressInfo;
use crate::model::ExchangeDirectory;
use crate::model::TransferRecord;
use crate::pipeline::datasource::DataSource;
use crate::pipeline::datasource::normalize;

/// REST client for the public Kaspa API.
#[derive(Debug, Clone)]
pub struct KaspaApiClient {
    client: Client,
    base_url: String,
    exchanges: ExchangeDirectory,
}

impl KaspaApiClient {
    pub fn new(config: &KaspaApiConfig) -> Result<Self, DataSourceError> {
        Url::parse(&config.base_url)?;

        let client = Client::builder().timeout(Duration::from_millis(config.timeout_ms)).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            exchanges: ExchangeDirectory::default(),
        })
    }

    /// Addresses in the directory are reported with `is_exchange = true`.
    pub fn with_exchanges(
        mut self,
        exchanges: ExchangeDirectory,
    ) -> Self {
        self.exchanges = exchanges;
        self
    }

    /// Raw transaction details, as returned by `/transactions/{txid}`.
    pub async fn get_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<Value, DataSourceError> {
        let transaction = self.get_json(&format!("/transactions/{}", transaction_id), &[]).await?;
        if let Some(error) = transaction.get("error") {
            return Err(DataSourceError::Upstream(error.to_string()));
        }
        Ok(transaction)
    }

    async fn get_json(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<Value, DataSourceError> {
        let url = Url::parse(&format!("{}{}", self.base_url, endpoint))?;
        debug!("kaspa_api_request::GET::{}::{:?}", url, query);

        let response = self.client.get(url.clone()).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("kaspa_api_error::{}::status::{}::body::{}", url, status.as_u16(), body);
            return Err(DataSourceError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// A failed endpoint reads as an absent payload, so the other half of the
    /// address info survives.
    async fn get_json_or_null(
        &self,
        endpoint: &str,
    ) -> Value {
        match self.get_json(endpoint, &[]).await {
            Ok(value) => value,
            Err(e) => {
                warn!("kaspa_api_payload_missing::{}::{}", endpoint, e);
                Value::Null
            },
        }
    }
}

#[async_trait]
impl DataSource for KaspaApiClient {
    async fn get_transfers(
        &self,
        address: &str,
        max_results: usize,
    ) -> Result<Vec<TransferRecord>, DataSourceError> {
        let response = self
            .get_json(&format!("/addresses/{}/full-transactions", address), &[("limit", max_results.to_string())])
            .await?;
        let records = normalize::transfer_list(response)?;
        debug!("kaspa_api_transfers::address::{}::records::{}", address, records.len());
        Ok(normalize::normalize_transfers(address, &records))
    }

    async fn get_address_info(
        &self,
        address: &str,
    ) -> Result<AddressInfo, DataSourceError> {
        let balance = self.get_json_or_null(&format!("/addresses/{}/balance", address)).await;
        let transaction_count = self.get_json_or_null(&format!("/addresses/{}/transactions-count", address)).await;

        let mut info = normalize::normalize_address_info(address, &balance, &transaction_count);
        info.is_exchange = self.exchanges.is_exchange(address);
        Ok(info)
    }
}
