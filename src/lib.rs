pub mod analysis;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod tracing;
pub mod utils;

pub use engine::*;
pub use error::*;

// Test utilities - only compiled during testing
#[cfg(test)]
pub mod test_utils;
