use crate::analysis::paths::linear_path;
use crate::analysis::detector::PatternDetector;
use crate::config::LayeringConfig;
use crate::error::AnalysisError;
use crate::model::LayeringEvidence;
use crate::model::PatternFinding;
use crate::model::TransactionGraph;
use crate::utils::coefficient_of_variation;

/// Funds passing through a linear chain of addresses in similar amounts.
pub struct LayeringDetector {
    config: LayeringConfig,
}

impl LayeringDetector {
    pub fn new(config: LayeringConfig) -> Self {
        Self { config }
    }
}

impl PatternDetector for LayeringDetector {
    fn name(&self) -> &'static str {
        "layering"
    }

    fn detect(
        &self,
        graph: &TransactionGraph,
    ) -> Result<Vec<PatternFinding>, AnalysisError> {
        let mut findings = Vec::new();

        for start in graph.node_indices() {
            let path = linear_path(graph, start, self.config.max_depth);
            if path.len() < self.config.min_path_nodes {
                continue;
            }

            let amounts: Vec<f64> = path
                .windows(2)
                .filter_map(|hop| graph.flow_between(hop[0], hop[1]))
                .map(|flow| flow.effective_amount())
                .collect();
            if amounts.len() < 2 {
                continue;
            }

            let Some(relative_std) = coefficient_of_variation(&amounts) else {
                continue;
            };
            if relative_std >= self.config.max_relative_std {
                continue;
            }

            let confidence = if relative_std < self.config.high_confidence_relative_std {
                self.config.high_confidence
            } else {
                self.config.low_confidence
            };
            let addresses = path.iter().map(|idx| graph.node_at(*idx).address.clone()).collect();
            findings.push(PatternFinding::layering(addresses, confidence, LayeringEvidence { amounts, relative_std }));
        }

        Ok(findings)
    }
}
