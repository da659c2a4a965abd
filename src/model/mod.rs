pub mod exchange;
pub mod export;
pub mod finding;
pub mod graph;
pub mod transfer;

pub use exchange::*;
pub use export::*;
pub use finding::*;
pub use graph::*;
pub use transfer::*;
