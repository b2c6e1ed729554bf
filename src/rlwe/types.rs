//! RLWE key and ciphertext types.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{AuditError, Result};
use crate::math::RingElement;
use crate::params::{M, Q};

/// RLWE secret key: polynomial with coefficients in [-3, 3], stored as residues.
///
/// Zeroized on drop. In deployment the full key only exists transiently inside
/// the key ceremony; auditors hold [`crate::threshold::SecretShare`]s instead.
#[derive(Clone, Debug, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    /// Secret polynomial in R_Q.
    pub poly: RingElement,
}

impl SecretKey {
    pub fn from_poly(poly: RingElement) -> Self {
        Self { poly }
    }
}

/// RLWE public key (a, b) with b = -(a·s + e).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    /// Uniform random polynomial.
    pub a: RingElement,
    /// b = -(a·s + e).
    pub b: RingElement,
}

/// Key pair produced by [`crate::rlwe::generate_key_pair`].
#[derive(Clone, Debug)]
pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

/// Sparse RLWE ciphertext.
///
/// Only the first [`M`] coefficients of the `b·r` term are kept in `c0`, one
/// per message slot; `c1` is a full ring element.
///
/// # Fields
///
/// * `c0` - `(b·r)[i] + e1[i] + Δ·m[i]` for `i < M`
/// * `c1` - `a·r + e2`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCiphertext")]
pub struct Ciphertext {
    c0: Vec<u64>,
    c1: RingElement,
}

#[derive(Deserialize)]
struct RawCiphertext {
    c0: Vec<u64>,
    c1: RingElement,
}

impl TryFrom<RawCiphertext> for Ciphertext {
    type Error = AuditError;

    fn try_from(raw: RawCiphertext) -> Result<Self> {
        Self::from_parts(raw.c0, raw.c1)
    }
}

impl Ciphertext {
    /// Assemble a ciphertext from untrusted parts, checking shape and range.
    pub fn from_parts(c0: Vec<u64>, c1: RingElement) -> Result<Self> {
        if c0.len() != M {
            return Err(AuditError::InvalidCiphertext(format!(
                "c0 must have {} slots, got {}",
                M,
                c0.len()
            )));
        }
        if c0.iter().any(|&c| c >= Q) {
            return Err(AuditError::InvalidCiphertext(
                "c0 slot not reduced mod Q".to_string(),
            ));
        }
        Ok(Self { c0, c1 })
    }

    /// Internal constructor for values already known to be well-formed.
    pub(crate) fn new_unchecked(c0: Vec<u64>, c1: RingElement) -> Self {
        debug_assert_eq!(c0.len(), M);
        Self { c0, c1 }
    }

    /// Message-slot component, length M.
    pub fn c0(&self) -> &[u64] {
        &self.c0
    }

    /// Full-length mask component.
    pub fn c1(&self) -> &RingElement {
        &self.c1
    }

    /// Split into `(c0, c1)`.
    pub fn into_parts(self) -> (Vec<u64>, RingElement) {
        (self.c0, self.c1)
    }
}
