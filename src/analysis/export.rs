use crate::constants::EDGE_WIDTH_AMOUNT_DIVISOR;
use crate::constants::EDGE_WIDTH_BASE;
use crate::constants::EDGE_WIDTH_MAX_EXTRA;
use crate::constants::MIN_CENTRALITY_NORMALIZER;
use crate::constants::NODE_SIZE_MIN;
use crate::constants::NODE_SIZE_RANGE;
use crate::model::ExportLink;
use crate::model::ExportNode;
use crate::model::GraphExport;
use crate::model::GraphMetrics;
use crate::model::NodeCategory;
use crate::model::PatternFinding;
use crate::model::TransactionGraph;
use crate::utils::format_address_label;

/// `5 + 45 * score / max(max_score, 0.01)`
pub fn node_size(
    centrality_score: f64,
    max_centrality_score: f64,
) -> f64 {
    NODE_SIZE_MIN + NODE_SIZE_RANGE * (centrality_score / max_centrality_score.max(MIN_CENTRALITY_NORMALIZER))
}

/// `1 + min(5, amount / 100)`
pub fn edge_width(amount: f64) -> f64 {
    EDGE_WIDTH_BASE + EDGE_WIDTH_MAX_EXTRA.min(amount / EDGE_WIDTH_AMOUNT_DIVISOR)
}

pub fn export_graph(
    graph: &TransactionGraph,
    findings: &[PatternFinding],
    exchange_count: usize,
) -> GraphExport {
    let max_score = graph.nodes().map(|node| node.centrality_score).fold(0.0, f64::max);

    let nodes: Vec<ExportNode> = graph
        .nodes()
        .map(|node| {
            let category = NodeCategory::of(node);
            ExportNode {
                id: node.address.clone(),
                label: format_address_label(&node.address),
                size: node_size(node.centrality_score, max_score),
                color: category.color(),
                category,
                attributes: node.clone(),
            }
        })
        .collect();

    let mut total_volume = 0.0;
    let links: Vec<ExportLink> = graph
        .edges()
        .map(|(source, target, flow)| {
            let amount = flow.effective_amount();
            total_volume += amount;
            ExportLink {
                source: source.address.clone(),
                target: target.address.clone(),
                width: edge_width(amount),
                flow: flow.clone(),
            }
        })
        .collect();

    GraphExport {
        metrics: GraphMetrics {
            node_count: nodes.len(),
            edge_count: links.len(),
            finding_count: findings.len(),
            exchange_count,
            total_volume,
        },
        nodes,
        links,
        findings: findings.to_vec(),
    }
}
