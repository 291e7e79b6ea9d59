pub mod challenges;
pub mod poa;
pub mod proofs;
pub mod scoring;
pub mod validator;

pub use challenges::ChallengeTable;
pub use poa::ProofOfArchive;
pub use proofs::{expected_storage_response, BandwidthProof, LongevityProof, StorageProof};
pub use scoring::{bandwidth_score, longevity_score, storage_score, total_score};
pub use validator::{select_block_validator, top_candidates, validate_block_creation_right};
