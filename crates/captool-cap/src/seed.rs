//! The 16-byte root secret of a mutable file.

use rand::rngs::OsRng;
use rand::RngCore;

use captool_primitives::bip39;
use captool_primitives::PrimitivesError;

use crate::error::CapError;

/// Length of a seed in bytes.
pub const SEED_LEN: usize = 16;

/// Root secret from which a mutable file's keys are derived.
#[derive(Clone, PartialEq, Eq)]
pub struct Seed([u8; SEED_LEN]);

impl Seed {
    /// Generate a new seed from the OS random number generator.
    pub fn random() -> Self {
        let mut bytes = [0u8; SEED_LEN];
        OsRng.fill_bytes(&mut bytes);
        Seed(bytes)
    }

    /// Wrap raw seed bytes.
    pub fn from_bytes(bytes: [u8; SEED_LEN]) -> Self {
        Seed(bytes)
    }

    /// Recover a seed from its 12-word recovery phrase.
    ///
    /// Phrases that are valid mnemonics of any other length are rejected
    /// with `InvalidMnemonic`.
    pub fn from_words<S: AsRef<str>>(words: &[S]) -> Result<Self, CapError> {
        let bytes = bip39::to_bytes(words)?;
        let seed = <[u8; SEED_LEN]>::try_from(bytes.as_slice()).map_err(|_| {
            PrimitivesError::InvalidMnemonic(format!(
                "recovery phrase encodes {} bytes, expected {SEED_LEN}",
                bytes.len()
            ))
        })?;
        Ok(Seed(seed))
    }

    /// The 12-word recovery phrase for this seed.
    pub fn to_words(&self) -> Result<Vec<String>, CapError> {
        Ok(bip39::to_mnemonic(&self.0)?)
    }

    /// The raw seed bytes.
    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Seed(..)")
    }
}
