pub mod canonical;
pub mod constants;
pub mod error;
pub mod types;

pub use canonical::canonical_json_bytes;
pub use constants::*;
pub use error::ArchiveChainError;
pub use types::*;
