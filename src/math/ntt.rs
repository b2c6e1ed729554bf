//! Number-Theoretic Transform (NTT) for fast polynomial multiplication.
//!
//! Implements Cooley-Tukey radix-2 NTT for negacyclic convolution over
//! R_q = Z_q[X]/(X^n + 1). The NTT enables O(n log n) polynomial multiplication
//! instead of the O(n²) schoolbook convolution.
//!
//! # Theory
//!
//! For negacyclic convolution (multiplication modulo X^n + 1), we use a
//! primitive 2n-th root of unity ψ where ψ^n = -1. The NTT evaluates a
//! polynomial at the odd powers of ψ, so that multiplication becomes pointwise.
//!
//! # Requirements
//!
//! The modulus q must satisfy q ≡ 1 (mod 2n). The audit modulus
//! Q = 5·2^25 + 1 supports n up to 2^24.
//!
//! # Example
//!
//! ```
//! use rlwe_audit::math::NttContext;
//!
//! let ctx = NttContext::with_default_q(1024);
//!
//! let mut coeffs = vec![1u64; 1024];
//! ctx.forward(&mut coeffs);
//! ctx.inverse(&mut coeffs);
//! assert_eq!(coeffs[0], 1);
//! ```

use std::sync::OnceLock;

use super::modular::ModQ;
use crate::params::{N, Q};

/// Precomputed NTT context with twiddle factors.
///
/// Create once and reuse for all polynomial operations with the same
/// dimension and modulus; [`NttContext::standard`] returns a shared context
/// for the audit parameters.
#[derive(Clone, Debug)]
pub struct NttContext {
    /// Ring dimension (power of two).
    n: usize,
    /// Modulus.
    q: u64,
    /// Forward twiddle factors ψ^bitrev(k), indexed from 1.
    psi_powers: Vec<u64>,
    /// Inverse twiddle factors ψ^(-bitrev(k)), indexed from 1.
    psi_inv_powers: Vec<u64>,
    /// n^(-1) mod q for inverse NTT scaling.
    n_inv: u64,
}

impl NttContext {
    /// Creates an NTT context for the given dimension and modulus.
    ///
    /// # Panics
    ///
    /// Panics if `n` is not a power of two or q is not ≡ 1 (mod 2n).
    pub fn new(n: usize, q: u64) -> Self {
        assert!(n.is_power_of_two(), "n must be a power of two");
        assert!(q % (2 * n as u64) == 1, "q must be ≡ 1 (mod 2n)");

        let psi = Self::find_primitive_root(2 * n as u64, q);
        let psi_inv = ModQ::inv(psi, q).expect("primitive root is non-zero");

        let psi_powers = Self::compute_twiddle_factors(n, psi, q);
        let psi_inv_powers = Self::compute_twiddle_factors(n, psi_inv, q);
        let n_inv = ModQ::inv(n as u64, q).expect("n is invertible mod prime q");

        Self {
            n,
            q,
            psi_powers,
            psi_inv_powers,
            n_inv,
        }
    }

    /// Creates an NTT context with the audit modulus Q.
    pub fn with_default_q(n: usize) -> Self {
        Self::new(n, Q)
    }

    /// Shared context for (N, Q), built on first use.
    pub fn standard() -> &'static NttContext {
        static CTX: OnceLock<NttContext> = OnceLock::new();
        CTX.get_or_init(|| NttContext::new(N, Q))
    }

    /// Returns the ring dimension.
    pub fn dimension(&self) -> usize {
        self.n
    }

    /// Returns the modulus q.
    pub fn modulus(&self) -> u64 {
        self.q
    }

    /// Performs forward NTT in-place (Cooley-Tukey, decimation-in-time).
    ///
    /// Output is in bit-reversed evaluation order; only `inverse` and
    /// `pointwise_mul` should consume it.
    ///
    /// # Panics
    ///
    /// Panics if `coeffs.len() != n`.
    pub fn forward(&self, coeffs: &mut [u64]) {
        assert_eq!(coeffs.len(), self.n, "Input length must match dimension");

        let n = self.n;
        let q = self.q;
        let mut t = n;
        let mut m = 1;

        while m < n {
            t >>= 1;
            for i in 0..m {
                let j1 = 2 * i * t;
                let j2 = j1 + t;
                let w = self.psi_powers[m + i];

                for j in j1..j2 {
                    let u = coeffs[j];
                    let v = ModQ::mul(coeffs[j + t], w, q);

                    coeffs[j] = if u + v >= q { u + v - q } else { u + v };
                    coeffs[j + t] = if u >= v { u - v } else { q - v + u };
                }
            }
            m <<= 1;
        }
    }

    /// Performs inverse NTT in-place (Gentleman-Sande, decimation-in-frequency),
    /// including the final n^(-1) scaling.
    ///
    /// # Panics
    ///
    /// Panics if `coeffs.len() != n`.
    pub fn inverse(&self, coeffs: &mut [u64]) {
        assert_eq!(coeffs.len(), self.n, "Input length must match dimension");

        let n = self.n;
        let q = self.q;
        let mut t = 1;
        let mut m = n;

        while m > 1 {
            m >>= 1;
            for i in 0..m {
                let j1 = i * 2 * t;
                let w = self.psi_inv_powers[m + i];

                for j in j1..(j1 + t) {
                    let u = coeffs[j];
                    let v = coeffs[j + t];

                    coeffs[j] = if u + v >= q { u + v - q } else { u + v };
                    let diff = if u >= v { u - v } else { q - v + u };
                    coeffs[j + t] = ModQ::mul(diff, w, q);
                }
            }
            t <<= 1;
        }

        for c in coeffs.iter_mut() {
            *c = ModQ::mul(*c, self.n_inv, q);
        }
    }

    /// Performs pointwise multiplication in NTT domain.
    ///
    /// # Panics
    ///
    /// Panics if any slice length differs from n.
    pub fn pointwise_mul(&self, a: &[u64], b: &[u64], result: &mut [u64]) {
        assert_eq!(a.len(), self.n, "Input length must match dimension");
        assert_eq!(b.len(), self.n, "Input length must match dimension");
        assert_eq!(result.len(), self.n, "Output length must match dimension");

        for ((r, &x), &y) in result.iter_mut().zip(a).zip(b) {
            *r = ModQ::mul(x, y, self.q);
        }
    }

    /// Find a primitive m-th root of unity modulo q (m a power of two).
    fn find_primitive_root(m: u64, q: u64) -> u64 {
        let exp = (q - 1) / m;

        for g in 2..q {
            let candidate = ModQ::pow(g, exp, q);
            // Order divides m; it is exactly m iff candidate^(m/2) ≠ 1
            if ModQ::pow(candidate, m / 2, q) != 1 {
                return candidate;
            }
        }
        panic!("No primitive root found (should not happen for valid parameters)");
    }

    /// Twiddle table in bit-reversed order: `factors[k] = root^bitrev(k)`.
    fn compute_twiddle_factors(n: usize, root: u64, q: u64) -> Vec<u64> {
        let mut factors = vec![0u64; n];

        for m in 1..n {
            if m.is_power_of_two() {
                // bitrev(2^k) over log2(n) bits is n/(2m)
                factors[m] = ModQ::pow(root, (n / (2 * m)) as u64, q);
            } else {
                // bitrev is additive over disjoint bits
                let prev_idx = m & (m - 1);
                let step_idx = m & m.wrapping_neg();
                factors[m] = ModQ::mul(factors[prev_idx], factors[step_idx], q);
            }
        }

        factors
    }
}
