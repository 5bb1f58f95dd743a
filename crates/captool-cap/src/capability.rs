//! Capability strings and the diminish transform.
//!
//! A capability has the form `URI:<TYPE>:<key>:<fingerprint>` with both
//! payloads in unpadded lowercase base32. For a mutable file the key is
//! the writekey (`MDMF`) or the readkey (`MDMF-RO`).
//!
//! The fingerprint field keeps the exact text it was parsed from, so a
//! diminished capability carries it through byte for byte.

use std::fmt;
use std::str::FromStr;

use captool_primitives::base32;
use captool_primitives::hash::{ssk_readkey_hash, KEY_LEN};

use crate::error::CapError;

/// Literal first field of every capability string.
pub const URI_PREFIX: &str = "URI";

/// Number of `:`-separated fields in a capability string.
const FIELD_COUNT: usize = 4;

/// One-way function from a write-side key to its read-side key.
type ReadDerivation = fn(&[u8]) -> [u8; KEY_LEN];

/// The type tag of a capability.
///
/// Only the mutable file types are modelled. Other tags still parse so
/// that their payloads can be converted to words, but they cannot be
/// diminished.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CapType {
    /// Read-write mutable file (`MDMF`).
    Mdmf,
    /// Read-only mutable file (`MDMF-RO`).
    MdmfReadOnly,
    /// Any other tag, kept verbatim. Only built by parsing.
    Other(OtherTag),
}

/// A type tag outside the modelled set.
///
/// Non-empty and free of `:`; construct it by parsing a [`CapType`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OtherTag(String);

impl OtherTag {
    /// The tag text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl CapType {
    /// The tag as it appears in the capability string.
    pub fn tag(&self) -> &str {
        match self {
            CapType::Mdmf => "MDMF",
            CapType::MdmfReadOnly => "MDMF-RO",
            CapType::Other(tag) => tag.as_str(),
        }
    }

    /// The diminished type and the key derivation leading to it, if this
    /// type can be diminished.
    fn read_derivation(&self) -> Option<(CapType, ReadDerivation)> {
        match self {
            CapType::Mdmf => Some((CapType::MdmfReadOnly, ssk_readkey_hash)),
            CapType::MdmfReadOnly | CapType::Other(_) => None,
        }
    }
}

impl fmt::Display for CapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for CapType {
    type Err = CapError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "MDMF" => Ok(CapType::Mdmf),
            "MDMF-RO" => Ok(CapType::MdmfReadOnly),
            "" => Err(CapError::MalformedCapability("empty type tag".to_string())),
            t if t.contains(':') => Err(CapError::MalformedCapability(format!(
                "type tag {t:?} contains ':'"
            ))),
            t => Ok(CapType::Other(OtherTag(t.to_string()))),
        }
    }
}

/// A parsed capability.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Capability {
    cap_type: CapType,
    key: Vec<u8>,
    fingerprint: Vec<u8>,
    fingerprint_text: String,
}

impl Capability {
    /// Assemble a capability from its parts.
    pub fn new(cap_type: CapType, key: Vec<u8>, fingerprint: Vec<u8>) -> Self {
        let fingerprint_text = base32::encode(&fingerprint);
        Capability { cap_type, key, fingerprint, fingerprint_text }
    }

    /// The type tag.
    pub fn cap_type(&self) -> &CapType {
        &self.cap_type
    }

    /// The decoded key field (writekey or readkey).
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// The decoded public key fingerprint field.
    pub fn fingerprint(&self) -> &[u8] {
        &self.fingerprint
    }

    /// Derive the read-only capability.
    ///
    /// The key is replaced by its readkey hash and the fingerprint is
    /// carried over unchanged. Fails with `UnsupportedCapabilityType` for
    /// types that have no read derivation, including already diminished
    /// ones.
    pub fn diminish(&self) -> Result<Capability, CapError> {
        let (read_type, derive) = self
            .cap_type
            .read_derivation()
            .ok_or_else(|| CapError::UnsupportedCapabilityType(self.cap_type.tag().to_string()))?;
        tracing::debug!(from = %self.cap_type, to = %read_type, "diminishing capability");
        Ok(Capability {
            cap_type: read_type,
            key: derive(&self.key).to_vec(),
            fingerprint: self.fingerprint.clone(),
            fingerprint_text: self.fingerprint_text.clone(),
        })
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{URI_PREFIX}:{}:{}:{}",
            self.cap_type,
            base32::encode(&self.key),
            self.fingerprint_text
        )
    }
}

impl FromStr for Capability {
    type Err = CapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(':').collect();
        if fields.len() != FIELD_COUNT {
            return Err(CapError::MalformedCapability(format!(
                "expected {FIELD_COUNT} ':'-separated fields, got {}",
                fields.len()
            )));
        }
        if fields[0] != URI_PREFIX {
            return Err(CapError::MalformedCapability(format!(
                "expected prefix {URI_PREFIX:?}, got {:?}",
                fields[0]
            )));
        }
        let cap_type = fields[1].parse()?;
        let key = base32::decode(fields[2])
            .map_err(|source| CapError::InvalidPart { part: "key", source })?;
        let fingerprint = base32::decode(fields[3])
            .map_err(|source| CapError::InvalidPart { part: "fingerprint", source })?;
        Ok(Capability {
            cap_type,
            key,
            fingerprint,
            fingerprint_text: fields[3].to_string(),
        })
    }
}
