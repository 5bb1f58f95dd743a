//! Conversion between capabilities and mnemonic word sequences.
//!
//! The key field and the fingerprint field are each encoded as their own
//! BIP-39 mnemonic and concatenated. Keys are always 16 bytes, so the
//! first 12 words are the key and the rest is the fingerprint: 12 more
//! words for a 16-byte fingerprint, 24 for a full 32-byte one.

use captool_primitives::bip39::{self, WORDS_PER_KEY};
use captool_primitives::hash::KEY_LEN;
use captool_primitives::PrimitivesError;

use crate::capability::{CapType, Capability};
use crate::error::CapError;

/// Fewest words that can encode a capability.
pub const MIN_CAP_WORDS: usize = 2 * WORDS_PER_KEY;

/// Encode a capability's two payloads as mnemonic words.
///
/// # Returns
/// 12 words for the key followed by the fingerprint's words, or
/// `InvalidPart` if the key is not 16 bytes or the fingerprint is not a
/// BIP-39 entropy length.
pub fn to_words(cap: &Capability) -> Result<Vec<String>, CapError> {
    if cap.key().len() != KEY_LEN {
        return Err(CapError::InvalidPart {
            part: "key",
            source: PrimitivesError::InvalidMnemonic(format!(
                "expected {KEY_LEN} bytes, got {}",
                cap.key().len()
            )),
        });
    }
    let mut words = bip39::to_mnemonic(cap.key())
        .map_err(|source| CapError::InvalidPart { part: "key", source })?;
    let fingerprint_words = bip39::to_mnemonic(cap.fingerprint())
        .map_err(|source| CapError::InvalidPart { part: "fingerprint", source })?;
    words.extend(fingerprint_words);
    Ok(words)
}

/// Rebuild a capability of the given type from its word encoding.
///
/// # Arguments
/// * `words` - At least 24 words: 12 for the key, the rest for the fingerprint.
/// * `cap_type` - Type tag for the rebuilt capability.
///
/// # Returns
/// The capability, `WordCount` for too few words, or `InvalidPart` when
/// either half is not a valid mnemonic.
pub fn to_cap<S: AsRef<str>>(words: &[S], cap_type: CapType) -> Result<Capability, CapError> {
    if words.len() < MIN_CAP_WORDS {
        return Err(CapError::WordCount { got: words.len() });
    }
    let (key_words, fingerprint_words) = words.split_at(WORDS_PER_KEY);
    let key = bip39::to_bytes(key_words)
        .map_err(|source| CapError::InvalidPart { part: "key", source })?;
    let fingerprint = bip39::to_bytes(fingerprint_words)
        .map_err(|source| CapError::InvalidPart { part: "fingerprint", source })?;
    Ok(Capability::new(cap_type, key, fingerprint))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZERO_KEY: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaa";
    const FF_KEY: &str = "77777777777777777777777774";

    fn short_cap() -> Capability {
        format!("URI:MDMF:{ZERO_KEY}:{FF_KEY}").parse().unwrap()
    }

    fn split(phrase: &str) -> Vec<String> {
        phrase.split(' ').map(str::to_owned).collect()
    }

    #[test]
    fn test_to_words_two_key_sized_parts() {
        let words = to_words(&short_cap()).unwrap();
        assert_eq!(words.len(), 24);
        assert_eq!(
            words,
            split(
                "abandon abandon abandon abandon abandon abandon \
                 abandon abandon abandon abandon abandon about \
                 zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo wrong"
            )
        );
        assert!(words.iter().all(|w| bip39::is_word(w)));
    }

    #[test]
    fn test_to_words_full_fingerprint() {
        let cap = Capability::new(CapType::Mdmf, vec![0u8; 16], vec![0u8; 32]);
        let words = to_words(&cap).unwrap();
        assert_eq!(words.len(), 36);
        assert_eq!(words[11], "about");
        assert_eq!(words[35], "art");
    }

    #[test]
    fn test_to_cap_roundtrip() {
        let cap = short_cap();
        let words = to_words(&cap).unwrap();
        assert_eq!(to_cap(&words, CapType::Mdmf).unwrap(), cap);

        let read = cap.diminish().unwrap();
        let words = to_words(&read).unwrap();
        let rebuilt = to_cap(&words, read.cap_type().clone()).unwrap();
        assert_eq!(rebuilt.to_string(), read.to_string());
    }

    #[test]
    fn test_to_cap_full_fingerprint_roundtrip() {
        let cap = Capability::new(CapType::Mdmf, vec![3u8; 16], (0u8..32).collect());
        let words = to_words(&cap).unwrap();
        assert_eq!(to_cap(&words, CapType::Mdmf).unwrap(), cap);
    }

    #[test]
    fn test_to_cap_uses_requested_type() {
        let words = to_words(&short_cap()).unwrap();
        let cap = to_cap(&words, CapType::MdmfReadOnly).unwrap();
        assert_eq!(cap.to_string(), format!("URI:MDMF-RO:{ZERO_KEY}:{FF_KEY}"));
    }

    #[test]
    fn test_to_cap_rejects_short_input() {
        let words = to_words(&short_cap()).unwrap();
        for n in [0, 1, 12, 23] {
            assert!(matches!(
                to_cap(&words[..n], CapType::Mdmf),
                Err(CapError::WordCount { got }) if got == n
            ));
        }
    }

    #[test]
    fn test_to_cap_rejects_odd_tail() {
        let mut words = to_words(&short_cap()).unwrap();
        words.push("abandon".to_string());
        assert!(matches!(
            to_cap(&words, CapType::Mdmf),
            Err(CapError::InvalidPart { part: "fingerprint", .. })
        ));
    }

    #[test]
    fn test_to_cap_rejects_bad_checksum_in_key() {
        let mut words = to_words(&short_cap()).unwrap();
        words[11] = "abandon".to_string();
        assert!(matches!(
            to_cap(&words, CapType::Mdmf),
            Err(CapError::InvalidPart { part: "key", .. })
        ));
    }

    #[test]
    fn test_to_words_rejects_unencodable_parts() {
        let short_key = Capability::new(CapType::Mdmf, vec![0u8; 20], vec![0u8; 16]);
        assert!(matches!(
            to_words(&short_key),
            Err(CapError::InvalidPart { part: "key", .. })
        ));
        let odd_fingerprint = Capability::new(CapType::Mdmf, vec![0u8; 16], vec![0u8; 10]);
        assert!(matches!(
            to_words(&odd_fingerprint),
            Err(CapError::InvalidPart { part: "fingerprint", .. })
        ));
    }
}
