//! Tahoe-LAFS capability tooling - mutable file capabilities.
//!
//! Generates mutable file (MDMF) write capabilities from a 16-byte seed,
//! diminishes them to read-only capabilities, and converts capabilities
//! to and from BIP-39 word sequences.

mod error;
pub use error::CapError;

pub mod capability;
pub mod seed;
pub mod words;
pub mod filecap;

pub use capability::{CapType, Capability, OtherTag};
pub use filecap::generate_mutable_filecap;
pub use seed::{Seed, SEED_LEN};
pub use words::{to_cap, to_words};
