use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GraphBuilderConfig {
    /// Hops from the start address that may still be expanded
    pub depth: usize,
    /// Upper bound on distinct addresses expanded in one build
    pub max_nodes: usize,
    /// Transfers below this KAS value never create nodes or edges
    pub min_amount: Option<f64>,
    pub max_concurrent_requests: usize,
}

impl Default for GraphBuilderConfig {
    fn default() -> Self {
        Self {
            depth: 2,
            max_nodes: 1000,
            min_amount: None,
            max_concurrent_requests: 8,
        }
    }
}
