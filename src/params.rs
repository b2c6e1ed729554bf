//! Parameter set for the audit encryption scheme.
//!
//! Every participant (transaction layer, auditors, orchestrator) must agree on
//! these values; a ciphertext produced under one set is meaningless under another.

use serde::{Deserialize, Serialize};

/// Ring dimension N (power of two).
pub const N: usize = 1024;

/// Ciphertext modulus Q = 5·2^25 + 1, so Q ≡ 1 (mod 2N).
pub const Q: u64 = 167772161;

/// Number of message slots carried in the sparse `c0` component.
pub const M: usize = 32;

/// Plaintext modulus t (one byte per slot).
pub const T: u64 = 256;

/// Scaling factor Δ = ⌊Q/t⌋.
pub const DELTA: u64 = Q / T;

/// Noise coefficients are drawn from [-NOISE_BOUND, NOISE_BOUND].
pub const NOISE_BOUND: u64 = 3;

/// Number of partial decryptions required to recover a plaintext.
pub const THRESHOLD: usize = 2;

/// Number of shares produced from one secret key.
pub const NUM_SHARES: usize = 3;

/// Core cryptographic parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditParams {
    /// Ring dimension n
    pub ring_dim: usize,

    /// Ciphertext modulus q
    /// Must be NTT-friendly: q ≡ 1 (mod 2n)
    pub q: u64,

    /// Plaintext modulus t
    pub t: u64,

    /// Message slots kept in c0
    pub slots: usize,

    /// Uniform noise bound: coefficients lie in [-bound, bound]
    pub noise_bound: u64,

    /// Partials needed to decrypt
    pub threshold: usize,

    /// Shares issued per key
    pub shares: usize,
}

impl AuditParams {
    /// The reference parameter set used by every deployed participant.
    pub fn standard() -> Self {
        Self {
            ring_dim: N,
            q: Q,
            t: T,
            slots: M,
            noise_bound: NOISE_BOUND,
            threshold: THRESHOLD,
            shares: NUM_SHARES,
        }
    }

    /// Scaling factor Δ = ⌊q/t⌋
    pub fn delta(&self) -> u64 {
        self.q / self.t
    }

    /// Worst-case decryption noise magnitude.
    ///
    /// Noise is `e·r + e1 + s·e2` (signs aside): two ring products of bounded
    /// polynomials, each at most `n·bound²` per coefficient, plus one bounded term.
    pub fn worst_case_noise(&self) -> u128 {
        let n = self.ring_dim as u128;
        let bound = self.noise_bound as u128;
        2 * n * bound * bound + bound
    }

    /// Check if parameters are valid
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.ring_dim.is_power_of_two() {
            return Err("ring_dim must be a power of two");
        }

        if self.q % (2 * self.ring_dim as u64) != 1 {
            return Err("q must be ≡ 1 (mod 2n) for NTT");
        }

        if self.q <= self.t {
            return Err("q must be > t");
        }

        if self.slots > self.ring_dim {
            return Err("slots must not exceed ring_dim");
        }

        if self.threshold < 2 || self.threshold > self.shares {
            return Err("threshold must be in [2, shares]");
        }

        // Decoding rounds to the nearest multiple of Δ, so noise must stay under Δ/2.
        if self.worst_case_noise() >= (self.delta() / 2) as u128 {
            return Err("worst-case noise exceeds Δ/2");
        }

        Ok(())
    }
}

impl Default for AuditParams {
    fn default() -> Self {
        Self::standard()
    }
}
