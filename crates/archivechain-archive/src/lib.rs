pub mod archive;
pub mod index;
pub mod metadata;

pub use archive::ArchiveData;
pub use index::ArchiveIndex;
pub use metadata::{ArchiveMetadata, Compression};
