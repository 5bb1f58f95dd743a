//! BIP-39 mnemonic encoding of raw key material.
//!
//! Converts entropy of any BIP-39 length (16, 20, 24, 28 or 32 bytes) to a
//! checksummed English word sequence and back. Seeds and writekeys are 16
//! bytes and encode to 12 words; public key fingerprints are 32 bytes and
//! encode to 24 words.

use ::bip39::{Language, Mnemonic};

use crate::PrimitivesError;

/// Number of words in the mnemonic of a 16-byte value.
pub const WORDS_PER_KEY: usize = 12;

/// Encode entropy bytes as English mnemonic words.
///
/// # Arguments
/// * `entropy` - 16 to 32 bytes, in steps of 4.
///
/// # Returns
/// The words in order, or `InvalidMnemonic` if the length is not a BIP-39
/// entropy length.
pub fn to_mnemonic(entropy: &[u8]) -> Result<Vec<String>, PrimitivesError> {
    let mnemonic = Mnemonic::from_entropy_in(Language::English, entropy)?;
    Ok(mnemonic.to_string().split(' ').map(str::to_owned).collect())
}

/// Decode English mnemonic words back to their entropy bytes.
///
/// # Arguments
/// * `words` - The words in order.
///
/// # Returns
/// The entropy, or `InvalidMnemonic` for a bad word count, an unknown word
/// or a checksum mismatch.
pub fn to_bytes<S: AsRef<str>>(words: &[S]) -> Result<Vec<u8>, PrimitivesError> {
    let phrase = words
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ");
    let mnemonic = Mnemonic::parse_in_normalized(Language::English, &phrase)?;
    Ok(mnemonic.to_entropy())
}

/// Report whether `word` is in the English word list.
pub fn is_word(word: &str) -> bool {
    Language::English.find_word(word).is_some()
}
