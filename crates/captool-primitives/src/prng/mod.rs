//! Deterministic byte stream for seeded key generation.
//!
//! A BLAKE3 hasher in derive-key mode is keyed with a context string and
//! fed the seed. Every request first absorbs the hasher's own current
//! digest and then reads the requested length from the extendable
//! output, so successive requests never repeat.

/// Context string for the RSA key generation stream.
pub const RSA_PRNG_CONTEXT: &str = "Deterministic RSA PRNG v1";

/// A seeded, fully deterministic source of pseudo-random bytes.
///
/// Identical seed, context and sequence of request sizes always give the
/// identical byte stream.
#[derive(Clone)]
pub struct DeterministicPrng {
    state: blake3::Hasher,
}

impl DeterministicPrng {
    /// Create a stream from a seed under a domain separation context.
    ///
    /// # Arguments
    /// * `seed` - The root secret.
    /// * `context` - A fixed, globally unique string naming the purpose.
    pub fn new(seed: &[u8], context: &str) -> Self {
        let mut state = blake3::Hasher::new_derive_key(context);
        state.update(seed);
        DeterministicPrng { state }
    }

    /// Advance the state and return the next `n` bytes.
    pub fn next(&mut self, n: usize) -> Vec<u8> {
        let mut out = vec![0u8; n];
        self.fill(&mut out);
        out
    }

    /// Advance the state and fill `dest` with the next bytes.
    pub fn fill(&mut self, dest: &mut [u8]) {
        let digest = self.state.finalize();
        self.state.update(digest.as_bytes());
        self.state.finalize_xof().fill(dest);
    }
}

impl std::fmt::Debug for DeterministicPrng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeterministicPrng").finish_non_exhaustive()
    }
}
