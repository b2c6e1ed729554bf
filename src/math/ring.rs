//! Elements of R_Q = Z_Q[X]/(X^N + 1).
//!
//! [`RingElement`] is the one value type every layer above works with: keys,
//! shares, ciphertext components and partial decryptions. Its length is fixed
//! at [`N`] and every coefficient is kept in `[0, Q)`.
//!
//! Two multiplication routines are provided. [`RingElement::negacyclic_mul`]
//! is the schoolbook definition of the ring product and the reference the
//! tests compare against; [`RingElement::mul`] computes the same product via
//! the NTT and is what the scheme uses.
//!
//! # Example
//!
//! ```
//! use rlwe_audit::math::RingElement;
//! use rlwe_audit::params::{N, Q};
//!
//! let mut x = vec![0u64; N];
//! x[N - 1] = 1;
//! let x_pow = RingElement::from_coeffs(x);
//!
//! let mut y = vec![0u64; N];
//! y[1] = 1;
//! let y_pow = RingElement::from_coeffs(y);
//!
//! // X^(N-1) · X = X^N = -1
//! let product = x_pow.negacyclic_mul(&y_pow);
//! assert_eq!(product.coeff(0), Q - 1);
//! ```

use std::ops::{Add, Neg, Sub};

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use super::modular::ModQ;
use super::ntt::NttContext;
use crate::error::AuditError;
use crate::params::{N, Q};

/// Polynomial in R_Q with coefficients in `[0, Q)`.
///
/// Immutable in practice: arithmetic returns fresh values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
#[serde(try_from = "Vec<u64>", into = "Vec<u64>")]
pub struct RingElement {
    coeffs: Vec<u64>,
}

impl RingElement {
    /// The zero polynomial.
    pub fn zero() -> Self {
        Self {
            coeffs: vec![0; N],
        }
    }

    /// Create polynomial from a length-N coefficient vector, reducing mod Q.
    ///
    /// # Panics
    ///
    /// Panics if `coeffs.len() != N`. Use `TryFrom<Vec<u64>>` for untrusted input.
    pub fn from_coeffs(mut coeffs: Vec<u64>) -> Self {
        assert_eq!(coeffs.len(), N, "Ring elements have exactly N coefficients");
        for c in &mut coeffs {
            *c %= Q;
        }
        Self { coeffs }
    }

    /// Lift signed coefficients into positive residues.
    pub fn from_signed(values: &[i64]) -> Self {
        Self::from_coeffs(values.iter().map(|&v| ModQ::from_signed(v, Q)).collect())
    }

    /// Get coefficient at index
    pub fn coeff(&self, i: usize) -> u64 {
        self.coeffs[i]
    }

    /// Coefficient slice, length N
    pub fn coeffs(&self) -> &[u64] {
        &self.coeffs
    }

    /// Check if polynomial is zero
    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(|&c| c == 0)
    }

    /// Maximum absolute coefficient in centered representation
    pub fn linf_norm(&self) -> u64 {
        self.coeffs
            .iter()
            .map(|&c| ModQ::to_signed(c, Q).unsigned_abs())
            .max()
            .unwrap_or(0)
    }

    /// Scalar multiplication
    pub fn scalar_mul(&self, scalar: u64) -> Self {
        let scalar = scalar % Q;
        Self {
            coeffs: self.coeffs.iter().map(|&c| ModQ::mul(c, scalar, Q)).collect(),
        }
    }

    /// Schoolbook product modulo X^N + 1.
    ///
    /// Terms landing at degree `i + j ≥ N` wrap to `i + j - N` with their sign
    /// flipped. O(N²); kept as the reference definition.
    pub fn negacyclic_mul(&self, other: &Self) -> Self {
        let q = Q as u128;
        // Accumulate positive and negative contributions separately; each
        // bucket holds at most N products below Q², well inside u128.
        let mut pos = vec![0u128; N];
        let mut neg = vec![0u128; N];

        for (i, &a) in self.coeffs.iter().enumerate() {
            if a == 0 {
                continue;
            }
            let a = a as u128;
            for (j, &b) in other.coeffs.iter().enumerate() {
                let k = i + j;
                if k < N {
                    pos[k] += a * b as u128;
                } else {
                    neg[k - N] += a * b as u128;
                }
            }
        }

        let coeffs = pos
            .into_iter()
            .zip(neg)
            .map(|(p, n)| ModQ::sub((p % q) as u64, (n % q) as u64, Q))
            .collect();
        Self { coeffs }
    }

    /// Product modulo X^N + 1 through the given NTT context.
    pub fn mul_ntt(&self, other: &Self, ctx: &NttContext) -> Self {
        let mut a = self.coeffs.clone();
        let mut b = other.coeffs.clone();
        ctx.forward(&mut a);
        ctx.forward(&mut b);

        let mut coeffs = vec![0u64; N];
        ctx.pointwise_mul(&a, &b, &mut coeffs);
        ctx.inverse(&mut coeffs);

        a.zeroize();
        b.zeroize();
        Self { coeffs }
    }

    /// Ring product using the shared NTT context.
    pub fn mul(&self, other: &Self) -> Self {
        self.mul_ntt(other, NttContext::standard())
    }
}

impl Default for RingElement {
    fn default() -> Self {
        Self::zero()
    }
}

impl TryFrom<Vec<u64>> for RingElement {
    type Error = AuditError;

    fn try_from(coeffs: Vec<u64>) -> Result<Self, Self::Error> {
        if coeffs.len() != N {
            return Err(AuditError::MalformedRingElement(format!(
                "expected {} coefficients, got {}",
                N,
                coeffs.len()
            )));
        }
        if let Some(pos) = coeffs.iter().position(|&c| c >= Q) {
            return Err(AuditError::MalformedRingElement(format!(
                "coefficient {} is not reduced mod Q",
                pos
            )));
        }
        Ok(Self { coeffs })
    }
}

impl From<RingElement> for Vec<u64> {
    fn from(mut poly: RingElement) -> Self {
        std::mem::take(&mut poly.coeffs)
    }
}

impl Add for &RingElement {
    type Output = RingElement;

    fn add(self, rhs: Self) -> Self::Output {
        let coeffs = self
            .coeffs
            .iter()
            .zip(rhs.coeffs.iter())
            .map(|(&a, &b)| {
                let sum = a + b;
                if sum >= Q {
                    sum - Q
                } else {
                    sum
                }
            })
            .collect();
        RingElement { coeffs }
    }
}

impl Sub for &RingElement {
    type Output = RingElement;

    fn sub(self, rhs: Self) -> Self::Output {
        let coeffs = self
            .coeffs
            .iter()
            .zip(rhs.coeffs.iter())
            .map(|(&a, &b)| ModQ::sub(a, b, Q))
            .collect();
        RingElement { coeffs }
    }
}

impl Neg for &RingElement {
    type Output = RingElement;

    fn neg(self) -> Self::Output {
        let coeffs = self.coeffs.iter().map(|&c| ModQ::negate(c, Q)).collect();
        RingElement { coeffs }
    }
}
