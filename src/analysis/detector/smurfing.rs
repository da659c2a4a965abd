use crate::analysis::detector::PatternDetector;
use crate::config::SmurfingConfig;
use crate::error::AnalysisError;
use crate::model::PatternFinding;
use crate::model::SmurfingEvidence;
use crate::model::TransactionGraph;
use crate::utils::coefficient_of_variation;
use crate::utils::mean;

/// A sum split into near-equal outgoing transfers sent close together.
pub struct SmurfingDetector {
    config: SmurfingConfig,
}

impl SmurfingDetector {
    pub fn new(config: SmurfingConfig) -> Self {
        Self { config }
    }
}

impl PatternDetector for SmurfingDetector {
    fn name(&self) -> &'static str {
        "smurfing"
    }

    fn detect(
        &self,
        graph: &TransactionGraph,
    ) -> Result<Vec<PatternFinding>, AnalysisError> {
        let mut findings = Vec::new();

        for idx in graph.node_indices() {
            let outgoing = graph.outgoing(idx);
            if outgoing.len() < self.config.min_outgoing_edges {
                continue;
            }

            let mut transfers: Vec<(&str, f64, i64)> = outgoing
                .iter()
                .flat_map(|(target, flow)| {
                    let target = graph.node_at(*target).address.as_str();
                    flow.transfers().iter().map(move |t| (target, t.amount, t.timestamp))
                })
                .collect();
            if transfers.len() < self.config.min_transfers {
                continue;
            }
            transfers.sort_by_key(|(_, _, timestamp)| *timestamp);

            let max_gap = transfers.windows(2).map(|pair| pair[1].2 - pair[0].2).max().unwrap_or(0);
            let amounts: Vec<f64> = transfers.iter().map(|(_, amount, _)| *amount).collect();
            let Some(amount_cv) = coefficient_of_variation(&amounts) else {
                continue;
            };
            if max_gap >= self.config.max_time_gap || amount_cv >= self.config.max_amount_cv {
                continue;
            }

            let mut targets: Vec<String> = Vec::new();
            for (target, _, _) in &transfers {
                if !targets.iter().any(|seen| seen == target) {
                    targets.push(target.to_string());
                }
            }

            findings.push(PatternFinding::smurfing(
                graph.node_at(idx).address.clone(),
                self.config.confidence,
                SmurfingEvidence {
                    targets,
                    transaction_count: transfers.len(),
                    avg_amount: mean(&amounts).unwrap_or(0.0),
                    amount_cv,
                    max_time_interval: max_gap,
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
    use crate::model::Evidence;
    use crate::test_utils::TestFixtures;

    fn detect(graph: &TransactionGraph) -> Vec<PatternFinding> {
        SmurfingDetector::new(SmurfingConfig::default()).detect(graph).unwrap()
    }

    #[test]
    fn test_burst_of_equal_transfers() {
        let findings = detect(&TestFixtures::fan_out(&[100.0, 101.0, 99.0], 300));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].confidence, 0.7);
        assert_eq!(findings[0].anchor(), Some("X"));
        let Evidence::Smurfing(evidence) = &findings[0].details else {
            panic!("unexpected evidence");
        };
        assert_eq!(evidence.targets, vec!["T0", "T1", "T2"]);
        assert_eq!(evidence.max_time_interval, 300);
    }

    #[test]
    fn test_spread_over_hours_is_ignored() {
        assert!(detect(&TestFixtures::fan_out(&[100.0, 100.0, 100.0], 5 * 3600)).is_empty());
    }

    #[test]
    fn test_uneven_amounts_are_ignored() {
        assert!(detect(&TestFixtures::fan_out(&[10.0, 100.0, 1000.0], 60)).is_empty());
    }

    #[test]
    fn test_needs_three_outgoing_edges() {
        assert!(detect(&TestFixtures::fan_out(&[100.0, 100.0], 60)).is_empty());
    }

    #[test]
    fn test_aggregated_edges_are_flattened() {
        let graph = TestFixtures::graph(&[
            ("X", "A", 50.0, 100),
            ("X", "A", 50.0, 200),
            ("X", "B", 50.0, 300),
            ("X", "C", 50.0, 400),
        ]);
        let findings = detect(&graph);
        let Evidence::Smurfing(evidence) = &findings[0].details else {
            panic!("unexpected evidence");
        };
        assert_eq!(evidence.transaction_count, 4);
        assert_eq!(evidence.targets, vec!["A", "B", "C"]);
    }
}
