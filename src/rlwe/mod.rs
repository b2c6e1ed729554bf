//! RLWE public-key encryption of user identities.
//!
//! This module implements the base scheme over R_Q = Z_Q[X]/(X^N + 1):
//!
//! - Secret key s sampled with coefficients in [-3, 3]
//! - Public key (a, b) with b = -(a·s + e)
//! - Sparse ciphertexts keeping only the M = 32 message slots of `c0`
//! - Δ = ⌊Q/256⌋ scaling so one byte of the identity lives in each slot
//!
//! # Example
//!
//! ```
//! use rlwe_audit::rlwe::{decrypt, encrypt, generate_key_pair, Identity};
//!
//! let kp = generate_key_pair(b"test_seed_123");
//! let id = Identity::new(0x123456789ABCDEF, 0xFEDCBA987654321);
//! let ct = encrypt(&kp.public_key, &id, b"enc_seed_456");
//! assert_eq!(decrypt(&kp.secret_key, &ct), id);
//! ```

mod codec;
mod enc;
mod keygen;
mod types;
mod wire;

pub use codec::{decode_slot, decode_slots, encode_identity, identity_bytes, Identity};
pub(crate) use enc::recover_identity;
pub use enc::{decrypt, encrypt, encrypt_batch, encrypt_with_sampler};
pub use keygen::generate_key_pair;
pub use types::{Ciphertext, KeyPair, PublicKey, SecretKey};
pub use wire::{CIPHERTEXT_BYTES, LIMB_BYTES};
