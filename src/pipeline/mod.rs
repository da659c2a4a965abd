pub mod builder;
pub mod datasource;

pub use builder::BuildLimits;
pub use builder::GraphBuilder;
pub use datasource::DataSource;
pub use datasource::KaspaApiClient;
pub use datasource::SnapshotDataSource;
