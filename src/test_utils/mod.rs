pub mod assertions;
pub mod fixtures;
pub mod mocks;

pub use assertions::TestAssertions;
pub use fixtures::TestFixtures;
