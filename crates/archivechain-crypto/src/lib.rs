pub mod address;
pub mod challenge;
pub mod checksum;
pub mod keypair;
pub mod registry;
pub mod signature;

pub use address::{address_matches, derive_address};
pub use challenge::generate_challenge;
pub use checksum::{compute_checksum, verify_checksum, SaltCache};
pub use keypair::KeyPair;
pub use registry::KeyRegistry;
pub use signature::{constant_time_eq, hash_for_signing, sign_value, verify_multisig, verify_value};
