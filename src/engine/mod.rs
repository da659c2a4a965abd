pub mod muhaqqiq;

pub use muhaqqiq::AddressSummary;
pub use muhaqqiq::AnalysisRequest;
pub use muhaqqiq::Muhaqqiq;
