//! Heuristic thresholds for the analyzer. Defaults are empirical.

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub centrality: CentralityConfig,
    pub layering: LayeringConfig,
    pub smurfing: SmurfingConfig,
    pub cycling: CyclingConfig,
    pub sudden_activity: SuddenActivityConfig,
    pub exchange: ExchangeHeuristicConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CentralityConfig {
    pub eigenvector_max_iterations: usize,
    pub eigenvector_tolerance: f64,
}

impl Default for CentralityConfig {
    fn default() -> Self {
        Self {
            eigenvector_max_iterations: 300,
            eigenvector_tolerance: 1.0e-6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayeringConfig {
    /// Hops a linear path may extend from its start
    pub max_depth: usize,
    pub min_path_nodes: usize,
    pub max_relative_std: f64,
    pub high_confidence_relative_std: f64,
    pub high_confidence: f64,
    pub low_confidence: f64,
}

impl Default for LayeringConfig {
    fn default() -> Self {
        Self {
            max_depth: 5,
            min_path_nodes: 3,
            max_relative_std: 0.2,
            high_confidence_relative_std: 0.1,
            high_confidence: 0.8,
            low_confidence: 0.6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SmurfingConfig {
    pub min_outgoing_edges: usize,
    pub min_transfers: usize,
    /// Seconds
    pub max_time_gap: i64,
    pub max_amount_cv: f64,
    pub confidence: f64,
}

impl Default for SmurfingConfig {
    fn default() -> Self {
        Self {
            min_outgoing_edges: 3,
            min_transfers: 3,
            max_time_gap: 3600,
            max_amount_cv: 0.3,
            confidence: 0.7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CyclingConfig {
    pub min_cycle_length: usize,
    pub max_amount_cv: f64,
    pub confidence: f64,
    /// Johnson's algorithm is exponential in the worst case
    pub max_cycles: usize,
}

impl Default for CyclingConfig {
    fn default() -> Self {
        Self {
            min_cycle_length: 3,
            max_amount_cv: 0.3,
            confidence: 0.9,
            max_cycles: 10_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SuddenActivityConfig {
    pub min_transaction_count: u64,
    pub min_transfers: usize,
    pub min_burst_size: usize,
    /// A gap joins the current burst when it is below `mean_gap * burst_gap_ratio`
    pub burst_gap_ratio: f64,
    pub min_pass_through_ratio: f64,
    pub confidence: f64,
}

impl Default for SuddenActivityConfig {
    fn default() -> Self {
        Self {
            min_transaction_count: 5,
            min_transfers: 5,
            min_burst_size: 3,
            burst_gap_ratio: 0.5,
            min_pass_through_ratio: 0.8,
            confidence: 0.75,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExchangeHeuristicConfig {
    /// Both in and out degree must be strictly greater
    pub min_degree: usize,
    pub min_inbound_volume: f64,
    pub min_inbound_transfers: usize,
    pub confidence: f64,
}

impl Default for ExchangeHeuristicConfig {
    fn default() -> Self {
        Self {
            min_degree: 10,
            min_inbound_volume: 10_000.0,
            min_inbound_transfers: 20,
            confidence: 0.7,
        }
    }
}
