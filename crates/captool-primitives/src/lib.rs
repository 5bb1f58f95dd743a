//! Tahoe-LAFS capability tooling - encodings, hashes and key derivation.
//!
//! This crate provides the building blocks for capability generation:
//! - Base32 encoding in Tahoe's unpadded lowercase form
//! - BIP-39 mnemonic encoding of raw key material
//! - Tahoe tagged hashes (SHA-256d over a netstring tag)
//! - A BLAKE3-based deterministic byte stream
//! - Deterministic RSA keypair derivation from a seed

pub mod hash;
pub mod base32;
pub mod bip39;
pub mod prng;
pub mod keypair;

mod error;
pub use error::PrimitivesError;
pub use keypair::{generate_rsa_keypair, RsaKeypair, DEFAULT_RSA_BITS};
pub use prng::DeterministicPrng;
