use std::collections::HashMap;

use petgraph::Direction;
use petgraph::graph::DiGraph;
use petgraph::graph::EdgeIndex;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use serde::Deserialize;
use serde::Serialize;

use crate::model::transfer::Transfer;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Centrality {
    pub in_centrality: f64,
    pub out_centrality: f64,
    pub betweenness: f64,
    pub eigenvector: f64,
}

impl Centrality {
    /// Unweighted mean of the four measures
    pub fn score(&self) -> f64 {
        (self.in_centrality + self.out_centrality + self.betweenness + self.eigenvector) / 4.0
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AddressNode {
    pub address: String,
    /// KAS
    pub balance: f64,
    pub total_received: f64,
    pub total_sent: f64,
    pub transaction_count: u64,
    pub in_degree: usize,
    pub out_degree: usize,
    pub is_start: bool,
    pub is_exchange: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_name: Option<String>,
    pub potential_exchange: bool,
    #[serde(flatten)]
    pub centrality: Centrality,
    pub centrality_score: f64,
}

impl AddressNode {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Default::default()
        }
    }
}

/// Funds moved along one ordered address pair.
///
/// A pair starts as `Single` and is promoted to `Aggregated` on its second
/// transfer. `total_amount` always equals the sum of `transactions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Flow {
    Aggregated {
        transactions: Vec<Transfer>,
        total_amount: f64,
    },
    Single(Transfer),
}

impl Flow {
    pub fn effective_amount(&self) -> f64 {
        match self {
            Flow::Single(transfer) => transfer.amount,
            Flow::Aggregated { total_amount, .. } => *total_amount,
        }
    }

    pub fn transfers(&self) -> &[Transfer] {
        match self {
            Flow::Single(transfer) => std::slice::from_ref(transfer),
            Flow::Aggregated { transactions, .. } => transactions,
        }
    }

    pub fn transfer_count(&self) -> usize {
        self.transfers().len()
    }

    pub fn is_aggregated(&self) -> bool {
        matches!(self, Flow::Aggregated { .. })
    }

    /// Most recent transfer; ties resolve to the earliest inserted one.
    /// `None` only for an `Aggregated` flow with no transactions.
    pub fn latest(&self) -> Option<&Transfer> {
        self.transfers().iter().reduce(|latest, transfer| {
            if transfer.timestamp > latest.timestamp {
                transfer
            } else {
                latest
            }
        })
    }

    pub fn push(
        &mut self,
        transfer: Transfer,
    ) {
        match self {
            Flow::Single(existing) => {
                let total_amount = existing.amount + transfer.amount;
                let transactions = vec![existing.clone(), transfer];
                *self = Flow::Aggregated {
                    transactions,
                    total_amount,
                };
            },
            Flow::Aggregated {
                transactions,
                total_amount,
            } => {
                *total_amount += transfer.amount;
                transactions.push(transfer);
            },
        }
    }
}

impl From<Transfer> for Flow {
    fn from(transfer: Transfer) -> Self {
        Flow::Single(transfer)
    }
}

/// Directed money-flow graph keyed by address, at most one edge per ordered pair.
#[derive(Debug, Clone, Default)]
pub struct TransactionGraph {
    graph: DiGraph<AddressNode, Flow>,
    node_indices: HashMap<String, NodeIndex>,
}

impl TransactionGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_indices: HashMap::new(),
        }
    }

    /// Returns the existing index when the address is already present.
    pub fn add_node(
        &mut self,
        address: &str,
    ) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(address) {
            return idx;
        }

        let idx = self.graph.add_node(AddressNode::new(address));
        self.node_indices.insert(address.to_string(), idx);
        idx
    }

    /// Record a transfer on the (source, destination) edge, creating the edge or
    /// promoting it to aggregated form. Self-transfers are dropped.
    pub fn add_transfer(
        &mut self,
        source: &str,
        destination: &str,
        transfer: Transfer,
    ) -> Option<EdgeIndex> {
        if source == destination {
            tracing::trace!("self_transfer_dropped::address::{}::tx::{}", source, transfer.transaction_id);
            return None;
        }

        let from_idx = self.add_node(source);
        let to_idx = self.add_node(destination);

        match self.graph.find_edge(from_idx, to_idx) {
            Some(edge_idx) => {
                self.graph[edge_idx].push(transfer);
                Some(edge_idx)
            },
            None => Some(self.graph.add_edge(from_idx, to_idx, Flow::Single(transfer))),
        }
    }

    /// Derive volumes and degrees from the final edge set.
    pub fn calculate_node_metrics(&mut self) {
        let indices: Vec<NodeIndex> = self.graph.node_indices().collect();
        for idx in indices {
            let (total_sent, out_degree) = self
                .graph
                .edges_directed(idx, Direction::Outgoing)
                .fold((0.0, 0), |(sum, count), edge| (sum + edge.weight().effective_amount(), count + 1));
            let (total_received, in_degree) = self
                .graph
                .edges_directed(idx, Direction::Incoming)
                .fold((0.0, 0), |(sum, count), edge| (sum + edge.weight().effective_amount(), count + 1));

            let node = &mut self.graph[idx];
            node.total_sent = total_sent;
            node.total_received = total_received;
            node.out_degree = out_degree;
            node.in_degree = in_degree;
        }
    }

    pub fn index_of(
        &self,
        address: &str,
    ) -> Option<NodeIndex> {
        self.node_indices.get(address).copied()
    }

    pub fn contains(
        &self,
        address: &str,
    ) -> bool {
        self.node_indices.contains_key(address)
    }

    pub fn node(
        &self,
        address: &str,
    ) -> Option<&AddressNode> {
        self.index_of(address).map(|idx| &self.graph[idx])
    }

    pub fn node_mut(
        &mut self,
        address: &str,
    ) -> Option<&mut AddressNode> {
        let idx = self.index_of(address)?;
        Some(&mut self.graph[idx])
    }

    pub fn node_at(
        &self,
        idx: NodeIndex,
    ) -> &AddressNode {
        &self.graph[idx]
    }

    pub fn node_at_mut(
        &mut self,
        idx: NodeIndex,
    ) -> &mut AddressNode {
        &mut self.graph[idx]
    }

    pub fn flow(
        &self,
        source: &str,
        destination: &str,
    ) -> Option<&Flow> {
        let from_idx = self.index_of(source)?;
        let to_idx = self.index_of(destination)?;
        self.flow_between(from_idx, to_idx)
    }

    pub fn flow_between(
        &self,
        from_idx: NodeIndex,
        to_idx: NodeIndex,
    ) -> Option<&Flow> {
        self.graph.find_edge(from_idx, to_idx).map(|edge_idx| &self.graph[edge_idx])
    }

    /// Successor indices in edge insertion order.
    pub fn successors(
        &self,
        idx: NodeIndex,
    ) -> Vec<NodeIndex> {
        self.neighbors_in_order(idx, Direction::Outgoing)
    }

    /// Predecessor indices in edge insertion order.
    pub fn predecessors(
        &self,
        idx: NodeIndex,
    ) -> Vec<NodeIndex> {
        self.neighbors_in_order(idx, Direction::Incoming)
    }

    fn neighbors_in_order(
        &self,
        idx: NodeIndex,
        direction: Direction,
    ) -> Vec<NodeIndex> {
        let mut edges: Vec<(EdgeIndex, NodeIndex)> = self
            .graph
            .edges_directed(idx, direction)
            .map(|edge| {
                let other = match direction {
                    Direction::Outgoing => edge.target(),
                    Direction::Incoming => edge.source(),
                };
                (edge.id(), other)
            })
            .collect();
        edges.sort_by_key(|(edge_idx, _)| *edge_idx);
        edges.into_iter().map(|(_, other)| other).collect()
    }

    /// Outgoing flows of a node as (destination, flow), in edge insertion order.
    pub fn outgoing(
        &self,
        idx: NodeIndex,
    ) -> Vec<(NodeIndex, &Flow)> {
        self.successors(idx)
            .into_iter()
            .filter_map(|to_idx| self.flow_between(idx, to_idx).map(|flow| (to_idx, flow)))
            .collect()
    }

    /// Incoming flows of a node as (source, flow), in edge insertion order.
    pub fn incoming(
        &self,
        idx: NodeIndex,
    ) -> Vec<(NodeIndex, &Flow)> {
        self.predecessors(idx)
            .into_iter()
            .filter_map(|from_idx| self.flow_between(from_idx, idx).map(|flow| (from_idx, flow)))
            .collect()
    }

    /// Node indices in insertion order.
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &AddressNode> {
        self.graph.node_weights()
    }

    /// Every edge as (source node, destination node, flow), in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&AddressNode, &AddressNode, &Flow)> {
        self.graph
            .edge_references()
            .map(|edge| (&self.graph[edge.source()], &self.graph[edge.target()], edge.weight()))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn inner(&self) -> &DiGraph<AddressNode, Flow> {
        &self.graph
    }
}
