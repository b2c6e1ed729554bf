//! Deterministic seeded sampling of ring elements.
//!
//! A [`Sampler`] carries its seed and a label path explicitly; there is no
//! module-level RNG state. The same seed and labels always expand to the same
//! polynomial, which lets a published public key be regenerated from its
//! archived seed and compared byte for byte.
//!
//! Expansion uses BLAKE3 in derive-key mode as an extendable-output function.

use rand::RngCore;

use super::modular::ModQ;
use super::ring::RingElement;
use crate::params::{N, Q};

/// Domain separation context for all sampler output.
const SAMPLER_CONTEXT: &str = "rlwe-audit 2024-01-01 sampler v1";

/// Separator between label components in the context path.
const LABEL_SEPARATOR: u8 = b'|';

/// Seeded expander for uniform and small-bounded coefficients.
#[derive(Clone, Debug)]
pub struct Sampler {
    seed: Vec<u8>,
    context: Vec<u8>,
}

impl Sampler {
    /// Sampler rooted at `seed` with an empty context.
    pub fn new(seed: impl AsRef<[u8]>) -> Self {
        Self {
            seed: seed.as_ref().to_vec(),
            context: Vec::new(),
        }
    }

    /// Sampler over a fresh 32-byte seed from the OS-seeded thread RNG.
    pub fn random() -> Self {
        let mut seed = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut seed);
        Self::new(seed)
    }

    /// Child sampler whose context is this context joined with `label`.
    pub fn derive(&self, label: impl AsRef<[u8]>) -> Self {
        let mut context = self.context.clone();
        if !context.is_empty() {
            context.push(LABEL_SEPARATOR);
        }
        context.extend_from_slice(label.as_ref());
        Self {
            seed: self.seed.clone(),
            context,
        }
    }

    /// Seed bytes this sampler expands.
    pub fn seed(&self) -> &[u8] {
        &self.seed
    }

    /// Label path, components joined by `|`.
    pub fn context(&self) -> &[u8] {
        &self.context
    }

    fn xof(&self) -> blake3::OutputReader {
        let mut hasher = blake3::Hasher::new_derive_key(SAMPLER_CONTEXT);
        hasher.update(&(self.seed.len() as u64).to_le_bytes());
        hasher.update(&self.seed);
        hasher.update(&(self.context.len() as u64).to_le_bytes());
        hasher.update(&self.context);
        hasher.finalize_xof()
    }

    /// `n` pseudorandom bytes.
    pub fn bytes(&self, n: usize) -> Vec<u8> {
        let mut out = vec![0u8; n];
        self.xof().fill(&mut out);
        out
    }

    /// `n` values uniform in `[-bound, bound]`, stored as residues mod Q.
    ///
    /// Bytes at or above the largest multiple of `2·bound + 1` are skipped,
    /// so every value is exactly equiprobable.
    ///
    /// # Panics
    ///
    /// Panics unless `1 ≤ bound ≤ 127`.
    pub fn small_vec(&self, n: usize, bound: u64) -> Vec<u64> {
        assert!((1..=127).contains(&bound), "bound must fit a single byte draw");
        let width = 2 * bound + 1;
        let limit = 256 - (256 % width);

        let mut reader = self.xof();
        let mut block = [0u8; 64];
        let mut out = Vec::with_capacity(n);
        while out.len() < n {
            reader.fill(&mut block);
            for &byte in &block {
                let byte = byte as u64;
                if byte >= limit {
                    continue;
                }
                let centered = (byte % width) as i64 - bound as i64;
                out.push(ModQ::from_signed(centered, Q));
                if out.len() == n {
                    break;
                }
            }
        }
        out
    }

    /// `n` values from 4-byte big-endian words reduced mod Q.
    pub fn uniform_vec(&self, n: usize) -> Vec<u64> {
        self.bytes(4 * n)
            .chunks_exact(4)
            .map(|w| u32::from_be_bytes([w[0], w[1], w[2], w[3]]) as u64 % Q)
            .collect()
    }

    /// Small-coefficient ring element.
    pub fn small(&self, bound: u64) -> RingElement {
        RingElement::from_coeffs(self.small_vec(N, bound))
    }

    /// Uniform ring element.
    pub fn uniform(&self) -> RingElement {
        RingElement::from_coeffs(self.uniform_vec(N))
    }
}
