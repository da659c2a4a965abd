pub mod cycling;
pub mod layering;
pub mod smurfing;
pub mod sudden_activity;

pub use cycling::CyclingDetector;
pub use layering::LayeringDetector;
pub use smurfing::SmurfingDetector;
pub use sudden_activity::SuddenActivityDetector;

use crate::config::AnalyzerConfig;
use crate::error::AnalysisError;
use crate::model::PatternFinding;
use crate::model::TransactionGraph;

/// One independent heuristic over a built graph.
pub trait PatternDetector: Send + Sync {
    fn name(&self) -> &'static str;

    fn detect(
        &self,
        graph: &TransactionGraph,
    ) -> Result<Vec<PatternFinding>, AnalysisError>;
}

/// Layering, smurfing, cycling and sudden activity, in that order
pub fn default_detectors(config: &AnalyzerConfig) -> Vec<Box<dyn PatternDetector>> {
    vec![
        Box::new(LayeringDetector::new(config.layering.clone())),
        Box::new(SmurfingDetector::new(config.smurfing.clone())),
        Box::new(CyclingDetector::new(config.cycling.clone())),
        Box::new(SuddenActivityDetector::new(config.sudden_activity.clone())),
    ]
}
