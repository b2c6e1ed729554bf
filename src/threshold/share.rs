//! Linear 2-of-3 sharing of an RLWE secret key.
//!
//! The key is the constant term of the degree-1 polynomial
//! `f(X) = s + X·mask` over R_Q; share `j` is `f(j)` for `j ∈ {1, 2, 3}`.
//! One share alone is `s` masked by a uniform ring element.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::math::{RingElement, Sampler};
use crate::params::NUM_SHARES;
use crate::rlwe::SecretKey;

/// One auditor's share of the secret key.
///
/// Zeroized on drop; each share-holding service owns exactly one.
#[derive(Clone, Debug, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct SecretShare {
    /// Evaluation point in 1..=3.
    pub index: u32,
    /// `s + index·mask`.
    pub value: RingElement,
}

/// Split `sk` into three shares, with the mask expanded from `seed|"mask"`.
pub fn split_secret_key(sk: &SecretKey, seed: &[u8]) -> [SecretShare; NUM_SHARES] {
    let mut mask = Sampler::new(seed).derive("mask").uniform();

    let shares = std::array::from_fn(|pos| {
        let index = pos as u32 + 1;
        SecretShare {
            index,
            value: &sk.poly + &mask.scalar_mul(index as u64),
        }
    });

    mask.zeroize();
    shares
}
