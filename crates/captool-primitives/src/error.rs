/// Unified error type for all primitives operations.
///
/// Covers errors from the base32 and mnemonic codecs and from RSA key
/// derivation.
#[derive(Debug, thiserror::Error)]
pub enum PrimitivesError {
    #[error("invalid base32: {0}")]
    InvalidBase32(String),

    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("key generation failed: {0}")]
    KeyGeneration(String),
}

impl From<::bip39::Error> for PrimitivesError {
    fn from(e: ::bip39::Error) -> Self {
        PrimitivesError::InvalidMnemonic(e.to_string())
    }
}
