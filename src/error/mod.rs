pub mod analysis;
pub mod config;
pub mod datasource;
pub mod engine;

pub use analysis::AnalysisError;
pub use anyhow::anyhow;
pub use anyhow::Context;
pub use anyhow::Error;
pub use anyhow::Result;
pub use config::ConfigError;
pub use datasource::DataSourceError;
pub use engine::EngineError;

// For consistent error handling with location info
#[macro_export]
macro_rules! err_with_loc {
    ($err:expr) => {
        anyhow::anyhow!($err).context(format!("at {}:{}", file!(), line!()))
    };
}
