//! Hash function primitives for capability derivation.
//!
//! Provides SHA-256, double SHA-256 and the Tahoe-LAFS tagged hash
//! construction used to turn RSA key material into writekeys, readkeys
//! and public key fingerprints. These follow the conventions of
//! Tahoe-LAFS (`allmydata.util.hashutil`).

use sha2::{Digest, Sha256};

/// Length of a symmetric key (writekey or readkey) in bytes.
pub const KEY_LEN: usize = 16;

/// Length of an untruncated tagged hash in bytes.
pub const HASH_LEN: usize = 32;

/// Tag for deriving a writekey from a DER-encoded RSA private key.
pub const MUTABLE_WRITEKEY_TAG: &[u8] = b"allmydata_mutable_privkey_to_writekey_v1";

/// Tag for deriving a fingerprint from a DER-encoded RSA public key.
pub const MUTABLE_PUBKEY_TAG: &[u8] = b"allmydata_mutable_pubkey_to_fingerprint_v1";

/// Tag for deriving a readkey from a writekey.
pub const MUTABLE_READKEY_TAG: &[u8] = b"allmydata_mutable_writekey_to_readkey_v1";

/// Compute SHA-256 hash of the input data.
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 32-byte SHA-256 digest.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute double SHA-256 (SHA-256d) hash of the input data.
///
/// Computes SHA-256(SHA-256(data)).
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Wrap bytes in a netstring: `<decimal length>:<bytes>,`.
pub fn netstring(data: &[u8]) -> Vec<u8> {
    let mut out = format!("{}:", data.len()).into_bytes();
    out.extend_from_slice(data);
    out.push(b',');
    out
}

/// Compute a tagged hash, truncated to `N` bytes.
///
/// The digest is SHA-256d over `netstring(tag) || value`. `N` must not
/// exceed [`HASH_LEN`]; this is checked at compile time.
///
/// # Arguments
/// * `tag` - Domain separation tag.
/// * `value` - Bytes to hash under that tag.
///
/// # Returns
/// The first `N` bytes of the digest.
pub fn tagged_hash<const N: usize>(tag: &[u8], value: &[u8]) -> [u8; N] {
    const { assert!(N <= HASH_LEN) };
    let mut preimage = netstring(tag);
    preimage.extend_from_slice(value);
    let digest = sha256d(&preimage);
    let mut output = [0u8; N];
    output.copy_from_slice(&digest[..N]);
    output
}

/// Derive the writekey of a mutable file from its DER-encoded private key.
pub fn ssk_writekey_hash(private_der: &[u8]) -> [u8; KEY_LEN] {
    tagged_hash(MUTABLE_WRITEKEY_TAG, private_der)
}

/// Derive the public key fingerprint from a DER-encoded public key.
pub fn ssk_pubkey_fingerprint_hash(public_der: &[u8]) -> [u8; HASH_LEN] {
    tagged_hash(MUTABLE_PUBKEY_TAG, public_der)
}

/// Derive a readkey from a writekey.
///
/// This is the one-way step that turns a write capability into a
/// read-only one.
pub fn ssk_readkey_hash(writekey: &[u8]) -> [u8; KEY_LEN] {
    tagged_hash(MUTABLE_READKEY_TAG, writekey)
}
