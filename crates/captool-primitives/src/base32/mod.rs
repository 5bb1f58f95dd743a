//! Base32 encoding and decoding in Tahoe-LAFS capability form.
//!
//! Capability components are RFC 4648 base32 with the trailing `=`
//! padding stripped and the alphabet lowercased. Decoding restores the
//! padding and upper-cases the input before handing it to a strict
//! RFC 4648 decoder.

use data_encoding::BASE32;

use crate::PrimitivesError;

/// Size of a padded base32 block in characters.
const BLOCK_LEN: usize = 8;

/// Encode a byte slice to unpadded lowercase base32.
///
/// # Arguments
/// * `data` - The bytes to encode.
///
/// # Returns
/// A base32 string with no `=` characters.
pub fn encode(data: &[u8]) -> String {
    BASE32
        .encode(data)
        .trim_end_matches('=')
        .to_ascii_lowercase()
}

/// Append the `=` characters needed to make `s` a whole number of
/// base32 blocks.
pub fn pad(s: &str) -> String {
    let missing = s.len().div_ceil(BLOCK_LEN) * BLOCK_LEN - s.len();
    let mut padded = String::with_capacity(s.len() + missing);
    padded.push_str(s);
    padded.extend(std::iter::repeat('=').take(missing));
    padded
}

/// Decode an unpadded base32 string of either case.
///
/// Decoding is canonical: inputs whose unused trailing bits are not zero
/// are rejected, so any accepted string re-encodes to itself (lowercased).
///
/// # Arguments
/// * `s` - The base32 string, without padding.
///
/// # Returns
/// `Ok(Vec<u8>)` on success, or an error for invalid characters or an
/// impossible length.
pub fn decode(s: &str) -> Result<Vec<u8>, PrimitivesError> {
    let padded = pad(&s.to_ascii_uppercase());
    BASE32
        .decode(padded.as_bytes())
        .map_err(|e| PrimitivesError::InvalidBase32(format!("{s:?}: {e}")))
}
