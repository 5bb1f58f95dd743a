//! Deterministic RSA keypair derivation.
//!
//! A seed drives a [`DeterministicPrng`], and the stream is consumed by a
//! fixed prime search so that the same seed and modulus size always give
//! the same key, byte for byte. The search procedure is part of the
//! output format: changing the candidate layout, the sieve, the window,
//! the Miller-Rabin round count or the order in which bytes are drawn
//! changes every derived capability.
//!
//! Prime search, for a prime of `b` bits:
//! 1. Draw `b / 8` bytes, force the top two bits and the low bit.
//! 2. Walk odd offsets `0, 2, 4, ...` below [`SEARCH_WINDOW`], skipping
//!    offsets divisible by an odd prime below [`SIEVE_LIMIT`] and offsets
//!    congruent to 1 modulo the public exponent. If the window runs out or
//!    the value outgrows `b` bits, draw a fresh candidate.
//! 3. Run [`MILLER_RABIN_ROUNDS`] rounds, each witness drawn as
//!    `2 + (stream(b / 8 bytes) mod (n - 3))`.
//!
//! `p` is drawn first, then `q`. `q` is redrawn while `|p - q|` has at most
//! `bits / 2 - 100` bits or the private exponent has at most `bits / 2`
//! bits. The larger prime is stored first and `d = e^-1 mod lcm(p-1, q-1)`.

use std::sync::LazyLock;

use num_integer::Integer;
use num_traits::One;
use rsa::pkcs1::EncodeRsaPrivateKey;
use rsa::pkcs8::EncodePublicKey;
use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};

use crate::prng::{DeterministicPrng, RSA_PRNG_CONTEXT};
use crate::PrimitivesError;

/// Modulus size used for mutable file keys.
pub const DEFAULT_RSA_BITS: usize = 2048;

/// Smallest modulus size accepted.
pub const MIN_RSA_BITS: usize = 512;

/// Public exponent of every derived key.
pub const RSA_PUBLIC_EXPONENT: u32 = 65_537;

/// Miller-Rabin rounds applied to each sieve survivor.
pub const MILLER_RABIN_ROUNDS: usize = 10;

/// Trial division uses the odd primes below this bound.
pub const SIEVE_LIMIT: u32 = 1 << 14;

/// Number of offsets scanned from one drawn candidate.
pub const SEARCH_WINDOW: u32 = 1 << 16;

/// Required minimum distance between the primes, in bits below `bits / 2`.
const PRIME_DISTANCE_MARGIN: usize = 100;

static SMALL_PRIMES: LazyLock<Vec<u32>> = LazyLock::new(|| odd_primes_below(SIEVE_LIMIT));

/// A DER-encoded RSA keypair.
///
/// The private key is PKCS#1 `RSAPrivateKey`, the public key is X.509
/// `SubjectPublicKeyInfo`.
#[derive(Clone, PartialEq, Eq)]
pub struct RsaKeypair {
    private_der: Vec<u8>,
    public_der: Vec<u8>,
}

impl RsaKeypair {
    /// The PKCS#1 DER encoding of the private key.
    pub fn private_der(&self) -> &[u8] {
        &self.private_der
    }

    /// The SubjectPublicKeyInfo DER encoding of the public key.
    pub fn public_der(&self) -> &[u8] {
        &self.public_der
    }
}

impl std::fmt::Debug for RsaKeypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaKeypair")
            .field("private_der", &format_args!("<{} bytes>", self.private_der.len()))
            .field("public_der_len", &self.public_der.len())
            .finish()
    }
}

/// Derive an RSA keypair from a seed.
///
/// # Arguments
/// * `seed` - The root secret. Only its bytes matter, not its length.
/// * `bits` - Modulus size; a multiple of 16, at least [`MIN_RSA_BITS`].
///
/// # Returns
/// The DER-encoded keypair, or `KeyGeneration` for an unsupported size or
/// a failure assembling or exporting the key.
pub fn generate_rsa_keypair(seed: &[u8], bits: usize) -> Result<RsaKeypair, PrimitivesError> {
    if bits < MIN_RSA_BITS || bits % 16 != 0 {
        return Err(PrimitivesError::KeyGeneration(format!(
            "unsupported modulus size {bits}: need a multiple of 16, at least {MIN_RSA_BITS}"
        )));
    }
    let half = bits / 2;
    let mut prng = DeterministicPrng::new(seed, RSA_PRNG_CONTEXT);

    let p = generate_prime(&mut prng, half);
    let key = loop {
        let q = generate_prime(&mut prng, half);
        let distance = if p > q { &p - &q } else { &q - &p };
        if distance.bits() <= half - PRIME_DISTANCE_MARGIN {
            tracing::debug!("primes too close, redrawing q");
            continue;
        }
        let (larger, smaller) = if p > q { (p.clone(), q) } else { (q, p.clone()) };
        let key = RsaPrivateKey::from_p_q(larger, smaller, BigUint::from(RSA_PUBLIC_EXPONENT))
            .map_err(|e| PrimitivesError::KeyGeneration(e.to_string()))?;
        if key.d().bits() <= half {
            tracing::debug!("private exponent too small, redrawing q");
            continue;
        }
        break key;
    };

    if key.n().bits() != bits {
        return Err(PrimitivesError::KeyGeneration(format!(
            "modulus has {} bits, expected {bits}",
            key.n().bits()
        )));
    }
    key.validate()
        .map_err(|e| PrimitivesError::KeyGeneration(e.to_string()))?;

    let private_der = key
        .to_pkcs1_der()
        .map_err(|e| PrimitivesError::KeyGeneration(e.to_string()))?
        .as_bytes()
        .to_vec();
    let public_der = RsaPublicKey::from(&key)
        .to_public_key_der()
        .map_err(|e| PrimitivesError::KeyGeneration(e.to_string()))?
        .as_bytes()
        .to_vec();

    tracing::debug!(bits, "derived rsa keypair");
    Ok(RsaKeypair { private_der, public_der })
}

/// Search for a probable prime of exactly `bits` bits.
fn generate_prime(prng: &mut DeterministicPrng, bits: usize) -> BigUint {
    let len = bits / 8;
    let mut draws = 0usize;
    loop {
        draws += 1;
        let mut bytes = prng.next(len);
        bytes[0] |= 0xc0;
        bytes[len - 1] |= 0x01;

        let residues: Vec<u32> = SMALL_PRIMES.iter().map(|&p| residue(&bytes, p)).collect();
        let e_residue = residue(&bytes, RSA_PUBLIC_EXPONENT);
        let base = BigUint::from_bytes_be(&bytes);

        for offset in (0..SEARCH_WINDOW).step_by(2) {
            let divisible = SMALL_PRIMES
                .iter()
                .zip(&residues)
                .any(|(&p, &r)| (r + offset) % p == 0);
            if divisible || (e_residue + offset) % RSA_PUBLIC_EXPONENT == 1 {
                continue;
            }
            let candidate = &base + BigUint::from(offset);
            if candidate.bits() != bits {
                break;
            }
            if passes_miller_rabin(&candidate, MILLER_RABIN_ROUNDS, prng) {
                tracing::trace!(bits, draws, offset, "found probable prime");
                return candidate;
            }
        }
    }
}

/// Miller-Rabin test with witnesses drawn from the stream.
///
/// `n` must be odd and greater than 3.
fn passes_miller_rabin(n: &BigUint, rounds: usize, prng: &mut DeterministicPrng) -> bool {
    let one = BigUint::one();
    let two = BigUint::from(2u32);
    let n_minus_one = n - &one;
    let span = n - BigUint::from(3u32);
    let width = n.bits().div_ceil(8);

    let mut d = n_minus_one.clone();
    let mut s = 0usize;
    while d.is_even() {
        d = d >> 1usize;
        s += 1;
    }

    'witness: for _ in 0..rounds {
        let a = BigUint::from_bytes_be(&prng.next(width)) % &span + &two;
        let mut x = a.modpow(&d, n);
        if x == one || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
            if x == one {
                return false;
            }
        }
        return false;
    }
    true
}

/// Remainder of a big-endian integer modulo a small word.
fn residue(bytes: &[u8], modulus: u32) -> u32 {
    let m = u64::from(modulus);
    let r = bytes.iter().fold(0u64, |r, &b| (r * 256 + u64::from(b)) % m);
    // r < modulus, so the narrowing is lossless.
    r as u32
}

/// Sieve of Eratosthenes over the odd numbers below `limit`.
fn odd_primes_below(limit: u32) -> Vec<u32> {
    let limit = limit as usize;
    let mut composite = vec![false; limit];
    let mut primes = Vec::new();
    for i in (3..limit).step_by(2) {
        if composite[i] {
            continue;
        }
        primes.push(i as u32);
        for j in (i * i..limit).step_by(2 * i) {
            composite[j] = true;
        }
    }
    primes
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::pkcs1::DecodeRsaPrivateKey;
    use rsa::pkcs8::DecodePublicKey;

    const TEST_BITS: usize = 512;

    fn test_prng() -> DeterministicPrng {
        DeterministicPrng::new(b"miller-rabin", "captool test stream v1")
    }

    // ---- Sieve and residues ----

    #[test]
    fn test_odd_primes_below() {
        let primes = odd_primes_below(100);
        assert_eq!(&primes[..5], &[3, 5, 7, 11, 13]);
        assert_eq!(primes.len(), 24);
        assert_eq!(primes.last(), Some(&97));
    }

    #[test]
    fn test_small_prime_table() {
        assert_eq!(SMALL_PRIMES[0], 3);
        assert!(SMALL_PRIMES.iter().all(|&p| p < SIEVE_LIMIT));
        assert_eq!(SMALL_PRIMES.last(), Some(&16_381));
    }

    #[test]
    fn test_residue() {
        assert_eq!(residue(&[0x01, 0x00], 7), 256 % 7);
        assert_eq!(residue(&[], 7), 0);
        assert_eq!(residue(&[0xff; 8], RSA_PUBLIC_EXPONENT), (u64::MAX % 65_537) as u32);
    }

    // ---- Miller-Rabin ----

    #[test]
    fn test_miller_rabin_accepts_primes() {
        let mut prng = test_prng();
        let mersenne_127 = (BigUint::one() << 127usize) - BigUint::one();
        assert!(passes_miller_rabin(&mersenne_127, MILLER_RABIN_ROUNDS, &mut prng));
        assert!(passes_miller_rabin(&BigUint::from(65_537u32), MILLER_RABIN_ROUNDS, &mut prng));
        assert!(passes_miller_rabin(&BigUint::from(16_381u32), MILLER_RABIN_ROUNDS, &mut prng));
    }

    #[test]
    fn test_miller_rabin_rejects_composites() {
        let mut prng = test_prng();
        // Carmichael numbers fool the Fermat test but not Miller-Rabin.
        for n in [561u32, 1105, 1729, 41_041] {
            assert!(!passes_miller_rabin(&BigUint::from(n), MILLER_RABIN_ROUNDS, &mut prng));
        }
        let semiprime = BigUint::from(1_000_003u64 * 1_000_033u64);
        assert!(!passes_miller_rabin(&semiprime, MILLER_RABIN_ROUNDS, &mut prng));
    }

    #[test]
    fn test_generate_prime_has_exact_size() {
        let mut prng = test_prng();
        let p = generate_prime(&mut prng, 256);
        assert_eq!(p.bits(), 256);
        assert!(p.is_odd());
        // Top two bits forced.
        assert_eq!((&p >> 254usize), BigUint::from(3u32));
        assert!(SMALL_PRIMES.iter().all(|&sp| residue(&p.to_bytes_be(), sp) != 0));
    }

    // ---- Keypair derivation ----

    #[test]
    fn test_keypair_is_deterministic() {
        let a = generate_rsa_keypair(&[7u8; 16], TEST_BITS).unwrap();
        let b = generate_rsa_keypair(&[7u8; 16], TEST_BITS).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_keypair_depends_on_seed() {
        let a = generate_rsa_keypair(&[7u8; 16], TEST_BITS).unwrap();
        let b = generate_rsa_keypair(&[8u8; 16], TEST_BITS).unwrap();
        assert_ne!(a.private_der(), b.private_der());
        assert_ne!(a.public_der(), b.public_der());
    }

    #[test]
    fn test_keypair_der_decodes() {
        let pair = generate_rsa_keypair(&[0u8; 16], TEST_BITS).unwrap();
        let private = RsaPrivateKey::from_pkcs1_der(pair.private_der()).unwrap();
        let public = RsaPublicKey::from_public_key_der(pair.public_der()).unwrap();

        assert_eq!(RsaPublicKey::from(&private), public);
        assert_eq!(public.n().bits(), TEST_BITS);
        assert_eq!(public.e(), &BigUint::from(RSA_PUBLIC_EXPONENT));

        let primes = private.primes();
        assert_eq!(primes.len(), 2);
        assert!(primes[0] > primes[1]);
        assert_eq!(&primes[0] * &primes[1], *public.n());
    }

    #[test]
    fn test_keypair_rejects_unsupported_sizes() {
        for bits in [0, 256, 500, 1000] {
            assert!(matches!(
                generate_rsa_keypair(&[0u8; 16], bits),
                Err(PrimitivesError::KeyGeneration(_))
            ));
        }
    }

    #[test]
    fn test_keypair_debug_hides_private_key() {
        let pair = generate_rsa_keypair(&[1u8; 16], TEST_BITS).unwrap();
        let rendered = format!("{pair:?}");
        assert!(rendered.contains("bytes>"));
        assert!(!rendered.contains(&format!("{:?}", pair.private_der())));
    }
}
