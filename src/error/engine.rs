use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// The only error an analysis request surfaces; the full chain stays in the logs.
    #[error("Analysis failed for {address}: {message}")]
    AnalysisFailed { address: String, message: String },

    #[error("Address lookup failed for {address}: {message}")]
    AddressLookupFailed { address: String, message: String },

    #[error("Failed to setup tracing: {0}")]
    SetupTracingError(String),
}
