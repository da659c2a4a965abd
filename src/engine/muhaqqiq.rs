use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use tracing::error;
use tracing::info;

use crate::Result;
use crate::err_with_loc;
use crate::analysis::GraphAnalyzer;
use crate::config::Config;
use crate::error::EngineError;
use crate::model::ExchangeDirectory;
use crate::model::GraphExport;
use crate::pipeline::BuildLimits;
use crate::pipeline::DataSource;
use crate::pipeline::GraphBuilder;
use crate::pipeline::KaspaApiClient;
use crate::utils::sompi_to_kas;

/// One-shot analysis of the money flow around `start_address`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub start_address: String,
    pub depth: usize,
    pub min_amount: Option<f64>,
    pub max_nodes: usize,
    pub include_exchanges: bool,
}

impl AnalysisRequest {
    /// Request using the configured builder defaults
    pub fn new(
        start_address: impl Into<String>,
        config: &Config,
    ) -> Self {
        Self {
            start_address: start_address.into(),
            depth: config.graph_builder.depth,
            min_amount: config.graph_builder.min_amount,
            max_nodes: config.graph_builder.max_nodes,
            include_exchanges: true,
        }
    }

    pub fn limits(&self) -> BuildLimits {
        BuildLimits {
            depth: self.depth,
            max_nodes: self.max_nodes,
            min_amount: self.min_amount,
        }
    }
}

/// Canonical address lookup, balance in KAS.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressSummary {
    pub address: String,
    pub balance: f64,
    pub transaction_count: u64,
    pub is_exchange: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_name: Option<String>,
}

/// Muhaqqiq (محقق): The Investigator
#[derive(Clone)]
pub struct Muhaqqiq {
    pub config: Config,
    datasource: Arc<dyn DataSource>,
    exchanges: ExchangeDirectory,
}

impl Muhaqqiq {
    pub fn new(
        config: Config,
        datasource: Arc<dyn DataSource>,
    ) -> Self {
        let exchanges = ExchangeDirectory::new(config.exchanges.clone());
        Self {
            config,
            datasource,
            exchanges,
        }
    }

    /// Backed by the Kaspa REST API named in the configuration
    pub fn from_config(config: Config) -> Result<Self> {
        let exchanges = ExchangeDirectory::new(config.exchanges.clone());
        let client = KaspaApiClient::new(&config.kaspa_api)?.with_exchanges(exchanges);
        Ok(Self::new(config, Arc::new(client)))
    }

    /// Build, analyse and export. Any unrecovered failure is logged with its
    /// full chain and surfaced as a single `AnalysisFailed`.
    pub async fn analyze(
        &self,
        request: &AnalysisRequest,
    ) -> std::result::Result<GraphExport, EngineError> {
        match self.run_analysis(request).await {
            Ok(export) => Ok(export),
            Err(e) => {
                error!("analysis_failed::address::{}::error::{:?}", request.start_address, e);
                Err(EngineError::AnalysisFailed {
                    address: request.start_address.clone(),
                    message: e.to_string(),
                })
            },
        }
    }

    async fn run_analysis(
        &self,
        request: &AnalysisRequest,
    ) -> Result<GraphExport> {
        if request.start_address.trim().is_empty() {
            return Err(err_with_loc!("start address must not be empty"));
        }
        info!(
            "analysis_started::address::{}::depth::{}::max_nodes::{}::include_exchanges::{}",
            request.start_address, request.depth, request.max_nodes, request.include_exchanges
        );

        let builder = GraphBuilder::new(self.datasource.clone())
            .with_exchanges(self.exchanges.clone())
            .with_max_concurrent_requests(self.config.graph_builder.max_concurrent_requests)
            .with_max_transfers_per_address(self.config.kaspa_api.max_transfers_per_address);
        let graph = builder.build(&request.start_address, &request.limits()).await?;

        let mut analyzer = GraphAnalyzer::new(graph, self.config.analyzer.clone());
        analyzer.calculate_centrality();
        analyzer.detect_patterns();
        if request.include_exchanges {
            analyzer.identify_exchanges();
        }
        let export = analyzer.export_graph_data();

        info!(
            "analysis_finished::address::{}::nodes::{}::edges::{}::findings::{}::exchanges::{}",
            request.start_address,
            export.metrics.node_count,
            export.metrics.edge_count,
            export.metrics.finding_count,
            export.metrics.exchange_count
        );
        Ok(export)
    }

    pub async fn address_info(
        &self,
        address: &str,
    ) -> std::result::Result<AddressSummary, EngineError> {
        let info = self.datasource.get_address_info(address).await.map_err(|e| {
            error!("address_lookup_failed::address::{}::error::{:?}", address, e);
            EngineError::AddressLookupFailed {
                address: address.to_string(),
                message: e.to_string(),
            }
        })?;

        let exchange_name = self.exchanges.get_exchange_name(address).map(str::to_string);
        Ok(AddressSummary {
            address: address.to_string(),
            balance: sompi_to_kas(info.balance),
            transaction_count: info.transaction_count,
            is_exchange: info.is_exchange || exchange_name.is_some(),
            exchange_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::DataSourceError;
    use crate::model::AddressInfo;
    use crate::test_utils::TestFixtures;
    use crate::test_utils::mocks::MockDataSource;

    fn config() -> Config {
        let mut config = Config::default();
        config.exchanges.insert("kaspa:exchange".to_string(), "Exchange".to_string());
        config
    }

    #[tokio::test]
    async fn test_analyze_reports_findings_and_metrics() {
        let mut datasource = MockDataSource::new();
        datasource.expect_get_transfers().returning(|address, _| {
            Ok(match address {
                "A" => vec![TestFixtures::transfer_record("t1", 1_700_000_000, &[("B", 10_000_000_000)])],
                "B" => vec![TestFixtures::transfer_record("t2", 1_700_000_600, &[("C", 10_000_000_000)])],
                "C" => vec![TestFixtures::transfer_record("t3", 1_700_001_200, &[("D", 10_000_000_000)])],
                _ => vec![],
            })
        });
        datasource.expect_get_address_info().returning(|_| Ok(AddressInfo::default()));

        let engine = Muhaqqiq::new(config(), Arc::new(datasource));
        let mut request = AnalysisRequest::new("A", &engine.config);
        request.depth = 5;

        let export = engine.analyze(&request).await.unwrap();
        assert_eq!(export.metrics.node_count, 4);
        assert_eq!(export.metrics.edge_count, 3);
        assert_eq!(export.metrics.total_volume, 300.0);
        assert!(export.findings.iter().any(|f| f.kind == crate::model::PatternKind::Layering));
    }

    #[tokio::test]
    async fn test_transfer_failure_is_fatal() {
        let mut datasource = MockDataSource::new();
        datasource
            .expect_get_transfers()
            .returning(|_, _| Err(DataSourceError::HttpStatus { status: 503, body: "down".to_string() }));
        datasource.expect_get_address_info().returning(|_| Ok(AddressInfo::default()));

        let engine = Muhaqqiq::new(config(), Arc::new(datasource));
        let result = engine.analyze(&AnalysisRequest::new("A", &engine.config)).await;
        match result {
            Err(EngineError::AnalysisFailed { address, message }) => {
                assert_eq!(address, "A");
                assert!(message.contains("failed to fetch transfers"));
            },
            other => panic!("unexpected result: {:?}", other.map(|e| e.metrics)),
        }
    }

    #[tokio::test]
    async fn test_empty_address_is_rejected() {
        let engine = Muhaqqiq::new(config(), Arc::new(MockDataSource::new()));
        let result = engine.analyze(&AnalysisRequest::new("  ", &engine.config)).await;
        assert!(matches!(result, Err(EngineError::AnalysisFailed { .. })));
    }

    #[tokio::test]
    async fn test_address_info_applies_directory() {
        let mut datasource = MockDataSource::new();
        datasource.expect_get_address_info().returning(|_| {
            Ok(AddressInfo {
                balance: 250_000_000,
                transaction_count: 7,
                is_exchange: false,
            })
        });

        let engine = Muhaqqiq::new(config(), Arc::new(datasource));
        let summary = engine.address_info("kaspa:exchange").await.unwrap();
        assert_eq!(summary.balance, 2.5);
        assert_eq!(summary.transaction_count, 7);
        assert!(summary.is_exchange);
        assert_eq!(summary.exchange_name.as_deref(), Some("Exchange"));
    }
}
