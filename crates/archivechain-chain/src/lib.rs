pub mod chain;
pub mod config;
pub mod persistence;

pub use chain::{ArchiveChain, ChainStats};
pub use config::ChainConfig;
