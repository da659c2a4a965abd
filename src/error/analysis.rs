use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Cycle enumeration exceeded the budget of {limit} cycles")]
    CycleLimitExceeded { limit: usize },

    #[error("Eigenvector centrality did not converge within {iterations} iterations")]
    EigenvectorNotConverged { iterations: usize },
}
