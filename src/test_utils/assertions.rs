use crate::model::Flow;
use crate::model::PatternFinding;
use crate::model::PatternKind;
use crate::model::TransactionGraph;

/// Custom assertions for domain-specific testing
pub struct TestAssertions;

impl TestAssertions {
    /// Every aggregated edge's total equals the sum of its transfers and no self-loop exists
    pub fn assert_flow_invariants(graph: &TransactionGraph) {
        for (source, destination, flow) in graph.edges() {
            assert_ne!(source.address, destination.address, "self-loop on {}", source.address);
            if let Flow::Aggregated {
                transactions,
                total_amount,
            } = flow
            {
                let sum: f64 = transactions.iter().map(|t| t.amount).sum();
                assert!(
                    (sum - total_amount).abs() < 1e-9,
                    "edge {} -> {} total {} != sum {}",
                    source.address,
                    destination.address,
                    total_amount,
                    sum
                );
                assert!(transactions.len() >= 2, "aggregated edge with fewer than two transfers");
            }
        }
    }

    /// Node degrees and volumes agree with the edge set
    pub fn assert_node_metrics_consistent(graph: &TransactionGraph) {
        for idx in graph.node_indices() {
            let node = graph.node_at(idx);
            let outgoing = graph.outgoing(idx);
            let incoming = graph.incoming(idx);
            assert_eq!(node.out_degree, outgoing.len(), "out_degree of {}", node.address);
            assert_eq!(node.in_degree, incoming.len(), "in_degree of {}", node.address);

            let sent: f64 = outgoing.iter().map(|(_, flow)| flow.effective_amount()).sum();
            let received: f64 = incoming.iter().map(|(_, flow)| flow.effective_amount()).sum();
            assert!((node.total_sent - sent).abs() < 1e-9, "total_sent of {}", node.address);
            assert!((node.total_received - received).abs() < 1e-9, "total_received of {}", node.address);
        }
    }

    pub fn findings_of(
        findings: &[PatternFinding],
        kind: PatternKind,
    ) -> Vec<&PatternFinding> {
        findings.iter().filter(|f| f.kind == kind).collect()
    }

    pub fn assert_confidences_in_range(findings: &[PatternFinding]) {
        for finding in findings {
            assert!(
                (0.0..=1.0).contains(&finding.confidence),
                "{} finding with confidence {}",
                finding.kind,
                finding.confidence
            );
        }
    }
}
