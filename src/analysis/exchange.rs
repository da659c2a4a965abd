use crate::config::ExchangeHeuristicConfig;
use crate::model::ExchangeEvidence;
use crate::model::PatternFinding;
use crate::model::TransactionGraph;

/// Known exchanges plus exchange-like hubs, in node insertion order.
///
/// Hubs get `potential_exchange = true` and one `potential_exchange` finding
/// each. Nodes already flagged `is_exchange` are never re-scored.
pub fn identify_exchanges(
    graph: &mut TransactionGraph,
    config: &ExchangeHeuristicConfig,
) -> (Vec<String>, Vec<PatternFinding>) {
    let mut exchanges = Vec::new();
    let mut findings = Vec::new();
    let indices: Vec<_> = graph.node_indices().collect();

    for idx in indices {
        if graph.node_at(idx).is_exchange {
            exchanges.push(graph.node_at(idx).address.clone());
            continue;
        }

        let in_degree = graph.predecessors(idx).len();
        let out_degree = graph.successors(idx).len();
        if in_degree <= config.min_degree || out_degree <= config.min_degree {
            continue;
        }

        let (volume, transaction_count) = graph
            .incoming(idx)
            .iter()
            .flat_map(|(_, flow)| flow.transfers())
            .fold((0.0, 0), |(volume, count), transfer| (volume + transfer.amount, count + 1));
        if volume <= config.min_inbound_volume || transaction_count <= config.min_inbound_transfers {
            continue;
        }

        let node = graph.node_at_mut(idx);
        node.potential_exchange = true;
        tracing::info!(
            "potential_exchange::address::{}::in_degree::{}::out_degree::{}::volume::{}",
            node.address,
            in_degree,
            out_degree,
            volume
        );
        exchanges.push(node.address.clone());
        findings.push(PatternFinding::potential_exchange(
            node.address.clone(),
            config.confidence,
            ExchangeEvidence {
                in_degree,
                out_degree,
                volume,
                transaction_count,
            },
        ));
    }

    (exchanges, findings)
}
