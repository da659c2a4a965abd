use std::collections::HashMap;
use std::collections::HashSet;
use std::collections::VecDeque;
use std::sync::Arc;

use futures::StreamExt;
use futures::stream;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::Result;
use crate::config::GraphBuilderConfig;
use crate::constants::DEFAULT_MAX_TRANSFERS_PER_ADDRESS;
use crate::error::Context;
use crate::model::AddressInfo;
use crate::model::ExchangeDirectory;
use crate::model::Transfer;
use crate::model::TransactionGraph;
use crate::pipeline::datasource::DataSource;
use crate::utils::sompi_to_kas;

/// Bounds of a single build.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildLimits {
    pub depth: usize,
    pub max_nodes: usize,
    pub min_amount: Option<f64>,
}

impl From<&GraphBuilderConfig> for BuildLimits {
    fn from(config: &GraphBuilderConfig) -> Self {
        Self {
            depth: config.depth,
            max_nodes: config.max_nodes,
            min_amount: config.min_amount,
        }
    }
}

/// An expanded address whose qualifying transfers are still being walked.
struct Frame {
    address: String,
    depth: usize,
    pending: VecDeque<(String, Transfer)>,
}

/// State owned by exactly one build; nothing here outlives the call.
#[derive(Default)]
struct BuildState {
    graph: TransactionGraph,
    visited: HashSet<String>,
    info_cache: HashMap<String, AddressInfo>,
}

pub struct GraphBuilder {
    datasource: Arc<dyn DataSource>,
    exchanges: ExchangeDirectory,
    max_concurrent_requests: usize,
    max_transfers_per_address: usize,
}

impl GraphBuilder {
    pub fn new(datasource: Arc<dyn DataSource>) -> Self {
        Self {
            datasource,
            exchanges: ExchangeDirectory::default(),
            max_concurrent_requests: GraphBuilderConfig::default().max_concurrent_requests,
            max_transfers_per_address: DEFAULT_MAX_TRANSFERS_PER_ADDRESS,
        }
    }

    pub fn with_exchanges(
        mut self,
        exchanges: ExchangeDirectory,
    ) -> Self {
        self.exchanges = exchanges;
        self
    }

    pub fn with_max_concurrent_requests(
        mut self,
        max_concurrent_requests: usize,
    ) -> Self {
        self.max_concurrent_requests = max_concurrent_requests.max(1);
        self
    }

    pub fn with_max_transfers_per_address(
        mut self,
        max_transfers_per_address: usize,
    ) -> Self {
        self.max_transfers_per_address = max_transfers_per_address;
        self
    }

    /// Preorder depth-first expansion from `start_address`.
    ///
    /// Every qualifying transfer of an expanded address adds its node and edge;
    /// expansion of the destination is skipped once `depth` hops are reached,
    /// the destination was already expanded, or `max_nodes` addresses have been
    /// expanded. Only a failed transfer lookup aborts the build.
    pub async fn build(
        &self,
        start_address: &str,
        limits: &BuildLimits,
    ) -> Result<TransactionGraph> {
        info!(
            "graph_build_started::address::{}::depth::{}::max_nodes::{}::min_amount::{:?}",
            start_address, limits.depth, limits.max_nodes, limits.min_amount
        );

        let mut state = BuildState::default();
        self.prefetch_info(&mut state, vec![start_address.to_string()]).await;
        self.add_address(&mut state, start_address, true);

        let mut stack: Vec<Frame> = Vec::new();
        if let Some(frame) = self.expand(&mut state, start_address, 0, limits).await? {
            stack.push(frame);
        }

        loop {
            let Some(frame) = stack.last_mut() else {
                break;
            };
            let Some((destination, transfer)) = frame.pending.pop_front() else {
                stack.pop();
                continue;
            };
            let source = frame.address.clone();
            let next_depth = frame.depth + 1;

            self.add_address(&mut state, &destination, false);
            state.graph.add_transfer(&source, &destination, transfer);

            if let Some(child) = self.expand(&mut state, &destination, next_depth, limits).await? {
                stack.push(child);
            }
        }

        let mut graph = state.graph;
        graph.calculate_node_metrics();

        info!(
            "graph_build_finished::address::{}::visited::{}::nodes::{}::edges::{}",
            start_address,
            state.visited.len(),
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }

    /// Mark `address` visited and collect its qualifying transfers, or `None`
    /// when a termination condition holds.
    async fn expand(
        &self,
        state: &mut BuildState,
        address: &str,
        depth: usize,
        limits: &BuildLimits,
    ) -> Result<Option<Frame>> {
        if depth >= limits.depth || state.visited.contains(address) || state.visited.len() >= limits.max_nodes {
            return Ok(None);
        }
        state.visited.insert(address.to_string());

        let records = self
            .datasource
            .get_transfers(address, self.max_transfers_per_address)
            .await
            .with_context(|| format!("failed to fetch transfers for {}", address))?;
        debug!("address_expanded::{}::depth::{}::records::{}", address, depth, records.len());

        let mut pending = VecDeque::new();
        for record in records {
            for output in record.outputs {
                if output.address.is_empty() || output.address == address {
                    continue;
                }
                let transfer = Transfer::from_sompi(record.transaction_id.clone(), output.amount, record.timestamp);
                if limits.min_amount.is_some_and(|min_amount| transfer.amount < min_amount) {
                    continue;
                }
                pending.push_back((output.address, transfer));
            }
        }

        let unseen: Vec<String> = pending
            .iter()
            .map(|(destination, _)| destination.clone())
            .filter(|destination| !state.graph.contains(destination))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        self.prefetch_info(state, unseen).await;

        Ok(Some(Frame {
            address: address.to_string(),
            depth,
            pending,
        }))
    }

    /// Fill the per-build cache for addresses not fetched yet. Lookups run
    /// concurrently; the cache is only written here, after they complete.
    async fn prefetch_info(
        &self,
        state: &mut BuildState,
        addresses: Vec<String>,
    ) {
        let missing: Vec<String> =
            addresses.into_iter().filter(|address| !state.info_cache.contains_key(address)).collect();
        if missing.is_empty() {
            return;
        }

        let datasource = &self.datasource;
        let fetched: Vec<(String, AddressInfo)> = stream::iter(missing)
            .map(|address| async move {
                let info = match datasource.get_address_info(&address).await {
                    Ok(info) => info,
                    Err(e) => {
                        warn!("address_info_fallback::address::{}::error::{}", address, e);
                        AddressInfo::default()
                    },
                };
                (address, info)
            })
            .buffer_unordered(self.max_concurrent_requests)
            .collect()
            .await;

        state.info_cache.extend(fetched);
    }

    /// Create the node on first encounter, enriched from the cache.
    fn add_address(
        &self,
        state: &mut BuildState,
        address: &str,
        is_start: bool,
    ) {
        if state.graph.contains(address) {
            return;
        }

        let info = state.info_cache.get(address).cloned().unwrap_or_default();
        let exchange_name = self.exchanges.get_exchange_name(address).map(str::to_string);

        state.graph.add_node(address);
        if let Some(node) = state.graph.node_mut(address) {
            node.is_start = is_start;
            node.balance = sompi_to_kas(info.balance);
            node.transaction_count = info.transaction_count;
            node.is_exchange = info.is_exchange || exchange_name.is_some();
            node.exchange_name = exchange_name;
        }
    }
}
