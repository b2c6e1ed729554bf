//! Identity codec: two 128-bit field elements packed into 32 byte slots.
//!
//! Slot `i < 16` holds byte `i` of `x` (little-endian), slot `16 + i` holds
//! byte `i` of `y`. Each byte is scaled by Δ so that noise below Δ/2 in a slot
//! rounds away on decode.

use serde::{Deserialize, Serialize};

use crate::params::{DELTA, M, T};

/// Bytes per identity coordinate.
const COORD_BYTES: usize = M / 2;

/// Identity coordinates of a pool user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub x: u128,
    pub y: u128,
}

impl Identity {
    pub fn new(x: u128, y: u128) -> Self {
        Self { x, y }
    }

    /// The all-zero identity, used for share verification.
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Message bytes of an identity, `x` then `y`, little-endian.
pub fn identity_bytes(identity: &Identity) -> [u8; M] {
    let mut out = [0u8; M];
    out[..COORD_BYTES].copy_from_slice(&identity.x.to_le_bytes());
    out[COORD_BYTES..].copy_from_slice(&identity.y.to_le_bytes());
    out
}

/// Δ-scaled slot values for an identity.
pub fn encode_identity(identity: &Identity) -> [u64; M] {
    let bytes = identity_bytes(identity);
    let mut slots = [0u64; M];
    for (slot, &byte) in slots.iter_mut().zip(bytes.iter()) {
        *slot = byte as u64 * DELTA;
    }
    slots
}

/// Round one noisy slot value back to its byte: ⌊(v + Δ/2) / Δ⌋ mod t.
#[inline]
pub fn decode_slot(value: u64) -> u8 {
    (((value + DELTA / 2) / DELTA) % T) as u8
}

/// Recover an identity from (at least) M noisy slot values.
///
/// # Panics
///
/// Panics if fewer than M slots are given.
pub fn decode_slots(slots: &[u64]) -> Identity {
    assert!(slots.len() >= M, "need {} slots to decode", M);

    let mut bytes = [0u8; M];
    for (byte, &value) in bytes.iter_mut().zip(slots) {
        *byte = decode_slot(value);
    }

    let mut x = [0u8; COORD_BYTES];
    let mut y = [0u8; COORD_BYTES];
    x.copy_from_slice(&bytes[..COORD_BYTES]);
    y.copy_from_slice(&bytes[COORD_BYTES..]);

    Identity {
        x: u128::from_le_bytes(x),
        y: u128::from_le_bytes(y),
    }
}
