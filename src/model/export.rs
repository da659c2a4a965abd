use serde::Serialize;

use crate::constants::COLOR_DEFAULT;
use crate::constants::COLOR_KNOWN_EXCHANGE;
use crate::constants::COLOR_POTENTIAL_EXCHANGE;
use crate::constants::COLOR_START;
use crate::model::finding::PatternFinding;
use crate::model::graph::AddressNode;
use crate::model::graph::Flow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeCategory {
    KnownExchange,
    PotentialExchange,
    Start,
    Default,
}

impl NodeCategory {
    /// Known exchange > potential exchange > start > default
    pub fn of(node: &AddressNode) -> Self {
        if node.is_exchange {
            NodeCategory::KnownExchange
        } else if node.potential_exchange {
            NodeCategory::PotentialExchange
        } else if node.is_start {
            NodeCategory::Start
        } else {
            NodeCategory::Default
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            NodeCategory::KnownExchange => COLOR_KNOWN_EXCHANGE,
            NodeCategory::PotentialExchange => COLOR_POTENTIAL_EXCHANGE,
            NodeCategory::Start => COLOR_START,
            NodeCategory::Default => COLOR_DEFAULT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportNode {
    pub id: String,
    pub label: String,
    pub size: f64,
    pub color: &'static str,
    pub category: NodeCategory,
    #[serde(flatten)]
    pub attributes: AddressNode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportLink {
    pub source: String,
    pub target: String,
    pub width: f64,
    #[serde(flatten)]
    pub flow: Flow,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GraphMetrics {
    pub node_count: usize,
    pub edge_count: usize,
    pub finding_count: usize,
    pub exchange_count: usize,
    pub total_volume: f64,
}

/// Visualisation-ready projection of an analysed graph.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GraphExport {
    pub nodes: Vec<ExportNode>,
    pub links: Vec<ExportLink>,
    pub metrics: GraphMetrics,
    pub findings: Vec<PatternFinding>,
}
