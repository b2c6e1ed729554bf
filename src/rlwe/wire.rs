//! Ciphertext byte encoding for on-chain and off-chain storage.
//!
//! Layout: `c0` (M limbs) followed by `c1` (N limbs), each limb a 4-byte
//! big-endian integer. Q < 2^28, so 4 bytes hold every residue.

use std::io::Cursor;

use byteorder::{BigEndian, ByteOrder, ReadBytesExt};

use crate::error::{AuditError, Result};
use crate::math::RingElement;
use crate::params::{M, N, Q};

use super::types::Ciphertext;

/// Bytes per encoded coefficient.
pub const LIMB_BYTES: usize = 4;

/// Total encoded ciphertext size: (32 + 1024) · 4 = 4224 bytes.
pub const CIPHERTEXT_BYTES: usize = (M + N) * LIMB_BYTES;

impl Ciphertext {
    /// Serialize to the fixed-width storage layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(CIPHERTEXT_BYTES);
        let mut limb_buf = [0u8; LIMB_BYTES];
        for &limb in self.c0().iter().chain(self.c1().coeffs()) {
            BigEndian::write_u32(&mut limb_buf, limb as u32);
            out.extend_from_slice(&limb_buf);
        }
        out
    }

    /// Parse the fixed-width storage layout, rejecting wrong lengths and
    /// unreduced limbs.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != CIPHERTEXT_BYTES {
            return Err(AuditError::InvalidCiphertext(format!(
                "expected {} bytes, got {}",
                CIPHERTEXT_BYTES,
                bytes.len()
            )));
        }

        let mut reader = Cursor::new(bytes);
        let mut limbs = Vec::with_capacity(M + N);
        for idx in 0..(M + N) {
            let limb = reader
                .read_u32::<BigEndian>()
                .map_err(|e| AuditError::InvalidCiphertext(e.to_string()))?
                as u64;
            if limb >= Q {
                return Err(AuditError::InvalidCiphertext(format!(
                    "limb {} is not reduced mod Q",
                    idx
                )));
            }
            limbs.push(limb);
        }

        let c1 = RingElement::try_from(limbs.split_off(M))?;
        Ciphertext::from_parts(limbs, c1)
    }
}
