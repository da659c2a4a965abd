use petgraph::graph::NodeIndex;

use crate::analysis::centrality::successor_lists;
use crate::analysis::cycles::simple_cycles;
use crate::analysis::detector::PatternDetector;
use crate::config::CyclingConfig;
use crate::error::AnalysisError;
use crate::model::CyclingEvidence;
use crate::model::Flow;
use crate::model::PatternFinding;
use crate::model::TransactionGraph;
use crate::utils::coefficient_of_variation;

/// Funds returning to an earlier address through a directed cycle whose hops
/// carry similar amounts in chronological order.
pub struct CyclingDetector {
    config: CyclingConfig,
}

impl CyclingDetector {
    pub fn new(config: CyclingConfig) -> Self {
        Self { config }
    }
}

impl PatternDetector for CyclingDetector {
    fn name(&self) -> &'static str {
        "cycling"
    }

    fn detect(
        &self,
        graph: &TransactionGraph,
    ) -> Result<Vec<PatternFinding>, AnalysisError> {
        let cycles = simple_cycles(&successor_lists(graph), self.config.max_cycles)?;
        tracing::debug!("cycles_enumerated::{}", cycles.len());

        let mut findings = Vec::new();
        for cycle in cycles {
            if cycle.len() < self.config.min_cycle_length {
                continue;
            }

            let mut amounts = Vec::with_capacity(cycle.len());
            let mut timestamps = Vec::with_capacity(cycle.len());
            for (i, &from) in cycle.iter().enumerate() {
                let to = cycle[(i + 1) % cycle.len()];
                if let Some(latest) = graph.flow_between(NodeIndex::new(from), NodeIndex::new(to)).and_then(Flow::latest) {
                    amounts.push(latest.amount);
                    timestamps.push(latest.timestamp);
                }
            }
            if amounts.len() != cycle.len() {
                continue;
            }

            let Some(amount_cv) = coefficient_of_variation(&amounts) else {
                continue;
            };
            let chronological = timestamps.windows(2).all(|pair| pair[0] <= pair[1]);
            if amount_cv >= self.config.max_amount_cv || !chronological {
                continue;
            }

            let addresses = cycle.iter().map(|&v| graph.node_at(NodeIndex::new(v)).address.clone()).collect();
            findings.push(PatternFinding::cycling(
                addresses,
                self.config.confidence,
                CyclingEvidence {
                    amounts,
                    timestamps,
                    amount_cv,
                },
            ));
        }

        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_utils::TestFixtures;

    fn detect(graph: &TransactionGraph) -> Result<Vec<PatternFinding>, AnalysisError> {
        CyclingDetector::new(CyclingConfig::default()).detect(graph)
    }

    #[test]
    fn test_chronological_cycle() {
        let graph = TestFixtures::triangle([100.0, 100.0, 100.0], [1_000, 2_000, 3_000]);
        let findings = detect(&graph).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].confidence, 0.9);
        assert_eq!(findings[0].anchor(), Some("A"));
    }

    #[test]
    fn test_reversed_timestamps_are_ignored() {
        let graph = TestFixtures::triangle([100.0, 100.0, 100.0], [3_000, 2_000, 1_000]);
        assert!(detect(&graph).unwrap().is_empty());
    }

    #[test]
    fn test_two_cycles_are_too_short() {
        let graph = TestFixtures::graph(&[("A", "B", 100.0, 1), ("B", "A", 100.0, 2)]);
        assert!(detect(&graph).unwrap().is_empty());
    }

    #[test]
    fn test_latest_transfer_of_aggregated_hop_is_used() {
        let graph = TestFixtures::graph(&[
            ("A", "B", 100.0, 1_000),
            ("B", "C", 100.0, 2_000),
            ("C", "A", 5.0, 500),
            ("C", "A", 100.0, 3_000),
        ]);
        assert_eq!(detect(&graph).unwrap().len(), 1);
    }

    #[test]
    fn test_cycle_budget() {
        let graph = TestFixtures::triangle([100.0, 100.0, 100.0], [1, 2, 3]);
        let detector = CyclingDetector::new(CyclingConfig {
            max_cycles: 0,
            ..CyclingConfig::default()
        });
        assert_eq!(detector.detect(&graph), Err(AnalysisError::CycleLimitExceeded { limit: 0 }));
    }
}
