pub mod centrality;
pub mod cycles;
pub mod detector;
pub mod exchange;
pub mod export;
pub mod paths;

use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::config::AnalyzerConfig;
use crate::model::Centrality;
use crate::model::GraphExport;
use crate::model::PatternFinding;
use crate::model::TransactionGraph;

pub use detector::PatternDetector;

/// Runs centrality, the pattern detectors and exchange identification over a
/// built graph, annotating it in place.
pub struct GraphAnalyzer {
    graph: TransactionGraph,
    config: AnalyzerConfig,
    detectors: Vec<Box<dyn PatternDetector>>,
    findings: Vec<PatternFinding>,
    exchanges: Vec<String>,
}

impl GraphAnalyzer {
    pub fn new(
        graph: TransactionGraph,
        config: AnalyzerConfig,
    ) -> Self {
        let detectors = detector::default_detectors(&config);
        Self {
            graph,
            config,
            detectors,
            findings: Vec::new(),
            exchanges: Vec::new(),
        }
    }

    /// Run an extra detector after the built-in ones
    pub fn with_detector(
        mut self,
        detector: Box<dyn PatternDetector>,
    ) -> Self {
        self.detectors.push(detector);
        self
    }

    pub fn graph(&self) -> &TransactionGraph {
        &self.graph
    }

    pub fn findings(&self) -> &[PatternFinding] {
        &self.findings
    }

    /// No-op below two nodes. Eigenvector non-convergence degrades to zero
    /// scores for every node.
    pub fn calculate_centrality(&mut self) {
        let node_count = self.graph.node_count();
        if node_count < 2 {
            debug!("centrality_skipped::nodes::{}", node_count);
            return;
        }

        let in_degree = centrality::in_degree_centrality(&self.graph);
        let out_degree = centrality::out_degree_centrality(&self.graph);
        let betweenness = centrality::betweenness_centrality(&self.graph);
        let eigenvector = match centrality::eigenvector_centrality(
            &self.graph,
            self.config.centrality.eigenvector_max_iterations,
            self.config.centrality.eigenvector_tolerance,
        ) {
            Ok(scores) => scores,
            Err(e) => {
                warn!("eigenvector_centrality_fallback::{}", e);
                vec![0.0; node_count]
            },
        };

        let indices: Vec<_> = self.graph.node_indices().collect();
        for idx in indices {
            let i = idx.index();
            let node = self.graph.node_at_mut(idx);
            node.centrality = Centrality {
                in_centrality: in_degree[i],
                out_centrality: out_degree[i],
                betweenness: betweenness[i],
                eigenvector: eigenvector[i],
            };
            node.centrality_score = node.centrality.score();
        }
    }

    /// Replace the finding list with the output of every detector. A failing
    /// detector is logged and contributes nothing.
    pub fn detect_patterns(&mut self) -> &[PatternFinding] {
        self.findings.clear();

        for detector in &self.detectors {
            match detector.detect(&self.graph) {
                Ok(findings) => {
                    debug!("detector_finished::{}::findings::{}", detector.name(), findings.len());
                    self.findings.extend(findings);
                },
                Err(e) => error!("detector_failed::{}::{}", detector.name(), e),
            }
        }

        info!("patterns_detected::{}", self.findings.len());
        &self.findings
    }

    /// Known exchanges plus heuristic hubs; hub findings are appended to the
    /// current finding list.
    pub fn identify_exchanges(&mut self) -> &[String] {
        let (exchanges, findings) = exchange::identify_exchanges(&mut self.graph, &self.config.exchange);
        self.exchanges = exchanges;
        self.findings.extend(findings);
        &self.exchanges
    }

    pub fn export_graph_data(&self) -> GraphExport {
        export::export_graph(&self.graph, &self.findings, self.exchanges.len())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::AnalysisError;
    use crate::model::PatternKind;
    use crate::test_utils::TestAssertions;
    use crate::test_utils::TestFixtures;

    struct FailingDetector;

    impl PatternDetector for FailingDetector {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn detect(
            &self,
            _graph: &TransactionGraph,
        ) -> Result<Vec<PatternFinding>, AnalysisError> {
            Err(AnalysisError::CycleLimitExceeded { limit: 0 })
        }
    }

    #[test]
    fn test_centrality_skipped_for_single_node() {
        let mut graph = TransactionGraph::new();
        graph.add_node("A");
        let mut analyzer = GraphAnalyzer::new(graph, AnalyzerConfig::default());
        analyzer.calculate_centrality();
        assert_eq!(analyzer.graph().node("A").unwrap().centrality_score, 0.0);
    }

    #[test]
    fn test_centrality_score_is_mean_of_measures() {
        let mut analyzer = GraphAnalyzer::new(TestFixtures::triangle([1.0, 1.0, 1.0], [1, 2, 3]), AnalyzerConfig::default());
        analyzer.calculate_centrality();
        for node in analyzer.graph().nodes() {
            let c = node.centrality;
            let expected = (c.in_centrality + c.out_centrality + c.betweenness + c.eigenvector) / 4.0;
            assert!((node.centrality_score - expected).abs() < 1e-12);
            assert!((c.in_centrality - 0.5).abs() < 1e-12);
            assert!(c.eigenvector > 0.0);
        }
    }

    #[test]
    fn test_unconverged_eigenvector_degrades_to_zero() {
        let mut analyzer = GraphAnalyzer::new(TestFixtures::chain(&[1.0, 1.0, 1.0]), AnalyzerConfig::default());
        analyzer.calculate_centrality();

        let third = 1.0 / 3.0;
        let expected = [
            ("A", 0.0, third, 0.0),
            ("B", third, third, third),
            ("C", third, third, third),
            ("D", third, 0.0, 0.0),
        ];
        for (address, in_centrality, out_centrality, betweenness) in expected {
            let node = analyzer.graph().node(address).unwrap();
            let c = node.centrality;
            assert_eq!(c.eigenvector, 0.0, "{}", address);
            assert!((c.in_centrality - in_centrality).abs() < 1e-12, "{}", address);
            assert!((c.out_centrality - out_centrality).abs() < 1e-12, "{}", address);
            assert!((c.betweenness - betweenness).abs() < 1e-12, "{}", address);
            assert!((node.centrality_score - (in_centrality + out_centrality + betweenness) / 4.0).abs() < 1e-12);
        }
        assert!((analyzer.graph().node("B").unwrap().centrality_score - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_failing_detector_is_isolated() {
        let graph = TestFixtures::triangle([100.0, 100.0, 100.0], [1_000, 2_000, 3_000]);
        let mut analyzer = GraphAnalyzer::new(graph, AnalyzerConfig::default()).with_detector(Box::new(FailingDetector));
        let findings = analyzer.detect_patterns().to_vec();
        assert_eq!(TestAssertions::findings_of(&findings, PatternKind::Cycling).len(), 1);
        TestAssertions::assert_confidences_in_range(&findings);
    }

    #[test]
    fn test_cycle_budget_does_not_stop_other_detectors() {
        let mut config = AnalyzerConfig::default();
        config.cycling.max_cycles = 0;
        let graph = TestFixtures::triangle([100.0, 100.0, 100.0], [1_000, 2_000, 3_000]);
        let mut analyzer = GraphAnalyzer::new(graph, config);
        let findings = analyzer.detect_patterns().to_vec();
        assert!(TestAssertions::findings_of(&findings, PatternKind::Cycling).is_empty());
        // A -> B -> C -> (A already on path) still forms a linear chain
        assert!(!TestAssertions::findings_of(&findings, PatternKind::Layering).is_empty());
    }

    #[test]
    fn test_exchange_findings_follow_detection() {
        let mut analyzer = GraphAnalyzer::new(TestFixtures::hub(11, 500.0), AnalyzerConfig::default());
        analyzer.calculate_centrality();
        analyzer.detect_patterns();
        let before = analyzer.findings().len();
        assert_eq!(analyzer.identify_exchanges(), &["HUB".to_string()]);
        assert_eq!(analyzer.findings().len(), before + 1);

        let export = analyzer.export_graph_data();
        assert_eq!(export.metrics.exchange_count, 1);
        assert_eq!(export.metrics.finding_count, before + 1);
        let hub = export.nodes.iter().find(|n| n.id == "HUB").unwrap();
        assert_eq!(hub.category, crate::model::NodeCategory::PotentialExchange);
    }
}
