//! RLWE encryption and decryption of identities.
//!
//! Encryption under public key (a, b) with b = -(a·s + e):
//!
//! ```text
//! c0[i] = (b·r)[i] + e1[i] + Δ·m[i]     for i < M
//! c1    = a·r + e2
//! ```
//!
//! Decryption adds `c1·s`, cancelling the `a·r·s` terms:
//!
//! ```text
//! c0 + c1·s = Δ·m + (e1 - e·r + e2·s)
//! ```
//!
//! The noise is bounded by `2·N·bound² + bound` (see
//! [`AuditParams::worst_case_noise`](crate::params::AuditParams::worst_case_noise)),
//! which the reference parameters keep below Δ/2.

use rayon::prelude::*;

use crate::math::{ModQ, RingElement, Sampler};
use crate::params::{M, NOISE_BOUND, Q};

use super::codec::{decode_slots, encode_identity, Identity};
use super::types::{Ciphertext, PublicKey, SecretKey};

/// Encrypt an identity under `pk`, with all randomness expanded from `seed`.
pub fn encrypt(pk: &PublicKey, identity: &Identity, seed: &[u8]) -> Ciphertext {
    encrypt_with_sampler(pk, identity, &Sampler::new(seed))
}

/// Encrypt with randomness drawn from an existing sampler context.
pub fn encrypt_with_sampler(pk: &PublicKey, identity: &Identity, sampler: &Sampler) -> Ciphertext {
    let r = sampler.derive("r").small(NOISE_BOUND);
    let e1 = sampler.derive("e1").small_vec(M, NOISE_BOUND);
    let e2 = sampler.derive("e2").small(NOISE_BOUND);

    let slots = encode_identity(identity);
    let b_r = pk.b.mul(&r);

    let c0: Vec<u64> = (0..M)
        .map(|i| ModQ::add(ModQ::add(b_r.coeff(i), e1[i], Q), slots[i], Q))
        .collect();
    let c1 = &pk.a.mul(&r) + &e2;

    Ciphertext::new_unchecked(c0, c1)
}

/// Encrypt independent `(identity, seed)` pairs in parallel.
///
/// Output order matches input order.
pub fn encrypt_batch(pk: &PublicKey, items: &[(Identity, Vec<u8>)]) -> Vec<Ciphertext> {
    items
        .par_iter()
        .map(|(identity, seed)| encrypt(pk, identity, seed))
        .collect()
}

/// Decrypt with the full secret key.
///
/// Never fails: a ciphertext not produced under the matching public key, or
/// tampered with, decodes to an unrelated identity.
pub fn decrypt(sk: &SecretKey, ct: &Ciphertext) -> Identity {
    let c1_s = ct.c1().mul(&sk.poly);
    recover_identity(ct, &c1_s)
}

/// Combine `c0` with an approximation of `c1·s` and decode the message slots.
///
/// `c0` is implicitly zero-padded to length N; only its M slots carry data.
pub(crate) fn recover_identity(ct: &Ciphertext, c1_s: &RingElement) -> Identity {
    let raw: Vec<u64> = ct
        .c0()
        .iter()
        .enumerate()
        .map(|(i, &c)| ModQ::add(c, c1_s.coeff(i), Q))
        .collect();
    decode_slots(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rlwe::generate_key_pair;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let kp = generate_key_pair(b"roundtrip");
        let id = Identity::new(0x123456789ABCDEF, 0xFEDCBA987654321);
        let ct = encrypt(&kp.public_key, &id, b"enc");
        assert_eq!(decrypt(&kp.secret_key, &ct), id);
    }

    #[test]
    fn test_roundtrip_random_identities() {
        let kp = generate_key_pair(b"random identities");
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        for i in 0..8u32 {
            let id = Identity::new(rng.gen(), rng.gen());
            let ct = encrypt(&kp.public_key, &id, &i.to_le_bytes());
            assert_eq!(decrypt(&kp.secret_key, &ct), id, "identity {} mismatch", i);
        }
    }

    #[test]
    fn test_roundtrip_extremes() {
        let kp = generate_key_pair(b"extremes");
        for id in [
            Identity::zero(),
            Identity::new(u128::MAX, u128::MAX),
            Identity::new(0, u128::MAX),
        ] {
            let ct = encrypt(&kp.public_key, &id, b"extreme");
            assert_eq!(decrypt(&kp.secret_key, &ct), id);
        }
    }

    #[test]
    fn test_encryption_deterministic_in_seed() {
        let kp = generate_key_pair(b"det");
        let id = Identity::new(7, 9);
        assert_eq!(
            encrypt(&kp.public_key, &id, b"s1"),
            encrypt(&kp.public_key, &id, b"s1")
        );
        assert_ne!(
            encrypt(&kp.public_key, &id, b"s1"),
            encrypt(&kp.public_key, &id, b"s2")
        );
    }

    #[test]
    fn test_noise_within_budget() {
        let kp = generate_key_pair(b"noise");
        let id = Identity::new(0xAB, 0xCD);
        let ct = encrypt(&kp.public_key, &id, b"noise-enc");
        let c1_s = ct.c1().mul(&kp.secret_key.poly);
        let slots = encode_identity(&id);

        for i in 0..M {
            let raw = ModQ::add(ct.c0()[i], c1_s.coeff(i), Q);
            let noise = ModQ::to_signed(ModQ::sub(raw, slots[i], Q), Q);
            assert!(noise.unsigned_abs() < crate::params::DELTA / 2);
        }
    }

    #[test]
    fn test_wrong_key_yields_garbage() {
        let kp = generate_key_pair(b"right");
        let other = generate_key_pair(b"wrong");
        let id = Identity::new(0x1111, 0x2222);
        let ct = encrypt(&kp.public_key, &id, b"enc");
        assert_ne!(decrypt(&other.secret_key, &ct), id);
    }

    #[test]
    fn test_encrypt_batch_matches_sequential() {
        let kp = generate_key_pair(b"batch");
        let items: Vec<(Identity, Vec<u8>)> = (0..4u8)
            .map(|i| (Identity::new(i as u128, 100 + i as u128), vec![i; 8]))
            .collect();

        let batch = encrypt_batch(&kp.public_key, &items);
        assert_eq!(batch.len(), items.len());
        for ((id, seed), ct) in items.iter().zip(&batch) {
            assert_eq!(ct, &encrypt(&kp.public_key, id, seed));
            assert_eq!(decrypt(&kp.secret_key, ct), *id);
        }
    }
}
