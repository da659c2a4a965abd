use crate::model::Transfer;
use crate::model::TransactionGraph;
use crate::model::TransferOutput;
use crate::model::TransferRecord;
use crate::utils::normalize_timestamp;

/// Test fixtures for creating consistent test data
pub struct TestFixtures;

impl TestFixtures {
    /// Canonical record with one output per `(address, sompi)` pair
    pub fn transfer_record(
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

    /// Transfer already expressed in KAS
    pub fn transfer(
        transaction_id: &str,
        amount: f64,
        timestamp: i64,
    ) -> Transfer {
        let (timestamp, date) = normalize_timestamp(timestamp);
        Transfer {
            transaction_id: transaction_id.to_string(),
            amount,
            timestamp,
            date,
        }
    }

    /// Graph from `(source, destination, amount KAS, timestamp)` tuples, metrics computed
    pub fn graph(edges: &[(&str, &str, f64, i64)]) -> TransactionGraph {
        let mut graph = TransactionGraph::new();
        for (i, (source, destination, amount, timestamp)) in edges.iter().enumerate() {
            graph.add_transfer(source, destination, Self::transfer(&format!("tx{}", i), *amount, *timestamp));
        }
        graph.calculate_node_metrics();
        graph
    }

    /// A -> B -> C -> D with the given per-hop amounts, one hour apart
    pub fn chain(amounts: &[f64]) -> TransactionGraph {
        let names = ["A", "B", "C", "D", "E", "F", "G"];
        let edges: Vec<(&str, &str, f64, i64)> = amounts
            .iter()
            .enumerate()
            .map(|(i, amount)| (names[i], names[i + 1], *amount, 1_700_000_000 + i as i64 * 3600))
            .collect();
        Self::graph(&edges)
    }

    /// X sends one transfer to each of `amounts.len()` targets, `gap` seconds apart
    pub fn fan_out(
        amounts: &[f64],
        gap: i64,
    ) -> TransactionGraph {
        let targets: Vec<String> = (0..amounts.len()).map(|i| format!("T{}", i)).collect();
        let edges: Vec<(&str, &str, f64, i64)> = amounts
            .iter()
            .enumerate()
            .map(|(i, amount)| ("X", targets[i].as_str(), *amount, 1_700_000_000 + i as i64 * gap))
            .collect();
        Self::graph(&edges)
    }

    /// A -> B -> C -> A with the given per-hop timestamps
    pub fn triangle(
        amounts: [f64; 3],
        timestamps: [i64; 3],
    ) -> TransactionGraph {
        Self::graph(&[
            ("A", "B", amounts[0], timestamps[0]),
            ("B", "C", amounts[1], timestamps[1]),
            ("C", "A", amounts[2], timestamps[2]),
        ])
    }

    /// Hub with `spokes` inbound and outbound counterparties
    pub fn hub(
        spokes: usize,
        inbound_amount: f64,
    ) -> TransactionGraph {
        let mut graph = TransactionGraph::new();
        for i in 0..spokes {
            graph.add_transfer(&format!("in{}", i), "HUB", Self::transfer(&format!("in-a{}", i), inbound_amount, 1_000 + i as i64));
            graph.add_transfer(&format!("in{}", i), "HUB", Self::transfer(&format!("in-b{}", i), inbound_amount, 2_000 + i as i64));
            graph.add_transfer("HUB", &format!("out{}", i), Self::transfer(&format!("out{}", i), inbound_amount, 3_000 + i as i64));
        }
        graph.calculate_node_metrics();
        graph
    }
}
