pub mod bounty;
pub mod event;
pub mod pool;
pub mod registry;
pub mod verification;

pub use bounty::{ArchiveBounty, BountyStatus};
pub use event::{ContractEvent, ContractState};
pub use pool::{PreservationPool, PreserverInfo};
pub use registry::{Contract, ContractRegistry};
pub use verification::{ContentVerification, VerificationRecord, Vote};
