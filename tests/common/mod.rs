#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use mockall::mock;
use muhaqqiq::error::DataSourceError;
use muhaqqiq::model::AddressInfo;
use muhaqqiq::model::Transfer;
use muhaqqiq::model::TransactionGraph;
use muhaqqiq::model::TransferOutput;
use muhaqqiq::model::TransferRecord;
use muhaqqiq::pipeline::DataSource;

mock! {
    pub DataSource {}

    #[async_trait]
    impl DataSource for DataSource {
        async fn get_transfers(&self, address: &str, max_results: usize) -> Result<Vec<TransferRecord>, DataSourceError>;
        async fn get_address_info(&self, address: &str) -> Result<AddressInfo, DataSourceError>;
    }
}

pub const BASE_TIME: i64 = 1_700_000_000;
pub const SOMPI: u64 = 100_000_000;

pub fn record(
    transaction_id: &str,
    timestamp: i64,
    outputs: &[(&str, u64)],
) -> TransferRecord {
    TransferRecord {
        transaction_id: transaction_id.to_string(),
        timestamp,
        outputs: outputs.iter().map(|(address, amount)| TransferOutput::new(*address, *amount)).collect(),
    }
}

/// Graph from `(source, destination, amount KAS, timestamp)` tuples
pub fn graph(edges: &[(&str, &str, f64, i64)]) -> TransactionGraph {
    let mut graph = TransactionGraph::new();
    for (i, (source, destination, amount, timestamp)) in edges.iter().enumerate() {
        graph.add_transfer(
            source,
            destination,
            Transfer {
                transaction_id: format!("tx{}", i),
                amount: *amount,
                timestamp: *timestamp,
                date: String::new(),
            },
        );
    }
    graph.calculate_node_metrics();
    graph
}

/// In-memory source over an adjacency map that records every call.
#[derive(Default)]
pub struct RecordingDataSource {
    pub transfers: HashMap<String, Vec<TransferRecord>>,
    pub expanded: Mutex<Vec<String>>,
    pub info_lookups: Mutex<Vec<String>>,
}

impl RecordingDataSource {
    /// One 1-KAS transfer per `(source, destination)` pair
    pub fn from_edges(edges: &[(String, String)]) -> Self {
        let mut transfers: HashMap<String, Vec<TransferRecord>> = HashMap::new();
        for (i, (source, destination)) in edges.iter().enumerate() {
            transfers.entry(source.clone()).or_default().push(TransferRecord {
                transaction_id: format!("tx{}", i),
                timestamp: BASE_TIME + i as i64,
                outputs: vec![TransferOutput::new(destination.clone(), SOMPI)],
            });
        }
        Self {
            transfers,
            ..Default::default()
        }
    }

    pub fn expanded(&self) -> Vec<String> {
        self.expanded.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn info_lookups(&self) -> Vec<String> {
        self.info_lookups.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl DataSource for RecordingDataSource {
    async fn get_transfers(
        &self,
        address: &str,
        max_results: usize,
    ) -> Result<Vec<TransferRecord>, DataSourceError> {
        if let Ok(mut expanded) = self.expanded.lock() {
            expanded.push(address.to_string());
        }
        Ok(self.transfers.get(address).map(|t| t.iter().take(max_results).cloned().collect()).unwrap_or_default())
    }

    async fn get_address_info(
        &self,
        address: &str,
    ) -> Result<AddressInfo, DataSourceError> {
        if let Ok(mut lookups) = self.info_lookups.lock() {
            lookups.push(address.to_string());
        }
        Ok(AddressInfo::default())
    }
}
