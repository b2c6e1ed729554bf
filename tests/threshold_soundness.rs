//! Correctness and soundness properties of encryption and 2-of-3 decryption

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use rlwe_audit::math::{ModQ, RingElement, Sampler};
use rlwe_audit::params::{DELTA, M, Q};
use rlwe_audit::rlwe::{decrypt, encrypt, generate_key_pair, Ciphertext, Identity, CIPHERTEXT_BYTES};
use rlwe_audit::threshold::{
    combine_partial_decryptions, lagrange_at_zero, partial_decrypt, split_secret_key,
    verify_all_share_pairs, verify_share, PartialDecryption,
};

#[test]
fn test_concrete_seed_scenario() {
    let kp = generate_key_pair(b"test_seed_123");
    let id = Identity::new(0x123456789ABCDEF, 0xFEDCBA987654321);
    let ct = encrypt(&kp.public_key, &id, b"enc_seed_456");

    assert_eq!(decrypt(&kp.secret_key, &ct), id);

    let shares = split_secret_key(&kp.secret_key, b"share_seed_789");
    let partials = [partial_decrypt(&shares[0], &ct), partial_decrypt(&shares[1], &ct)];
    assert_eq!(combine_partial_decryptions(&partials, &ct).unwrap(), id);
}

#[test]
fn test_round_trip_random_identities() {
    let mut rng = ChaCha20Rng::seed_from_u64(1);
    let kp = generate_key_pair(b"round-trip");
    for i in 0..20u32 {
        let id = Identity::new(rng.gen(), rng.gen());
        let ct = encrypt(&kp.public_key, &id, &i.to_be_bytes());
        assert_eq!(decrypt(&kp.secret_key, &ct), id);
    }
    assert_eq!(
        decrypt(&kp.secret_key, &encrypt(&kp.public_key, &Identity::new(u128::MAX, u128::MAX), b"max")),
        Identity::new(u128::MAX, u128::MAX)
    );
}

#[test]
fn test_every_pair_recovers() {
    let mut rng = ChaCha20Rng::seed_from_u64(2);
    let kp = generate_key_pair(b"pairs");
    let shares = split_secret_key(&kp.secret_key, b"pairs-split");

    for trial in 0..5u32 {
        let id = Identity::new(rng.gen(), rng.gen());
        let ct = encrypt(&kp.public_key, &id, &trial.to_le_bytes());
        for (a, b) in [(0, 1), (0, 2), (1, 2), (2, 0)] {
            let partials = [partial_decrypt(&shares[a], &ct), partial_decrypt(&shares[b], &ct)];
            assert_eq!(combine_partial_decryptions(&partials, &ct).unwrap(), id);
        }
    }
}

#[test]
fn test_single_share_is_not_the_key() {
    let kp = generate_key_pair(b"single");
    let shares = split_secret_key(&kp.secret_key, b"single-split");
    let id = Identity::new(0x0123_4567_89AB_CDEF, 0x1111);
    let ct = encrypt(&kp.public_key, &id, b"single-enc");

    for share in shares.iter() {
        assert_ne!(share.value, kp.secret_key.poly);
        // Using one share as if it were the full key: c0 + share·c1 leaves a mask·c1 residue.
        let partial = partial_decrypt(share, &ct);
        let raw: Vec<u64> = ct
            .c0()
            .iter()
            .zip(partial.value.coeffs())
            .map(|(&c, &p)| ModQ::add(c, p, Q))
            .collect();
        let decoded = rlwe_audit::rlwe::decode_slots(&raw);
        assert_ne!(decoded, id);
    }
}

#[test]
fn test_wrong_lagrange_coefficients_fail() {
    let kp = generate_key_pair(b"lagrange");
    let shares = split_secret_key(&kp.secret_key, b"lagrange-split");
    let id = Identity::new(0xABCDEF, 0x123456);
    let ct = encrypt(&kp.public_key, &id, b"lagrange-enc");

    let p1 = partial_decrypt(&shares[0], &ct);
    let p2 = partial_decrypt(&shares[1], &ct);

    // Relabel share 2's partial as index 3: the weights no longer interpolate f at 0.
    let mislabelled = [
        p1.clone(),
        PartialDecryption {
            index: 3,
            value: p2.value.clone(),
        },
    ];
    assert_ne!(combine_partial_decryptions(&mislabelled, &ct).unwrap(), id);

    // Plain summation (λ = 1, 1) is also wrong.
    let (l1, l2) = lagrange_at_zero(1, 2).unwrap();
    assert_ne!((l1, l2), (1, 1));
}

#[test]
fn test_tampering_c0_changes_plaintext() {
    let kp = generate_key_pair(b"tamper");
    let id = Identity::new(0x5555, 0xAAAA);
    let ct = encrypt(&kp.public_key, &id, b"tamper-enc");

    let (mut c0, c1) = ct.into_parts();
    c0[5] = ModQ::add(c0[5], DELTA, Q);
    let tampered = Ciphertext::from_parts(c0, c1).unwrap();
    assert_ne!(decrypt(&kp.secret_key, &tampered), id);
}

#[test]
fn test_tampering_c1_changes_plaintext() {
    let kp = generate_key_pair(b"tamper");
    let shares = split_secret_key(&kp.secret_key, b"tamper-split");
    let id = Identity::new(0x5555, 0xAAAA);
    let ct = encrypt(&kp.public_key, &id, b"tamper-enc");

    let (c0, c1) = ct.into_parts();
    let mut coeffs = c1.coeffs().to_vec();
    coeffs[0] = ModQ::add(coeffs[0], Q / 3, Q);
    let tampered = Ciphertext::from_parts(c0, RingElement::from_coeffs(coeffs)).unwrap();

    assert_ne!(decrypt(&kp.secret_key, &tampered), id);
    let partials = [
        partial_decrypt(&shares[0], &tampered),
        partial_decrypt(&shares[2], &tampered),
    ];
    assert_ne!(combine_partial_decryptions(&partials, &tampered).unwrap(), id);
}

#[test]
fn test_random_ciphertext_decrypts_to_garbage() {
    let mut rng = ChaCha20Rng::seed_from_u64(3);
    let kp = generate_key_pair(b"forgery");
    let target = Identity::new(rng.gen(), rng.gen());

    for i in 0..10u32 {
        let sampler = Sampler::new(i.to_be_bytes()).derive("forge");
        let c0 = sampler.derive("c0").uniform_vec(M);
        let c1 = sampler.derive("c1").uniform();
        let forged = Ciphertext::from_parts(c0, c1).unwrap();
        assert_ne!(decrypt(&kp.secret_key, &forged), target);
    }
}

#[test]
fn test_share_verification() {
    let kp = generate_key_pair(b"verify");
    let shares = split_secret_key(&kp.secret_key, b"verify-split");
    assert!(verify_all_share_pairs(&shares, &kp.public_key));

    let other = generate_key_pair(b"other");
    assert!(!verify_share(&shares[0], &other.public_key, &shares[1]));

    let foreign = split_secret_key(&other.secret_key, b"verify-split");
    assert!(!verify_share(&shares[0], &kp.public_key, &foreign[1]));
}

#[test]
fn test_wire_round_trip_preserves_decryption() {
    let kp = generate_key_pair(b"wire");
    let id = Identity::new(0xFEED, 0xFACE);
    let ct = encrypt(&kp.public_key, &id, b"wire-enc");

    let bytes = ct.to_bytes();
    assert_eq!(bytes.len(), CIPHERTEXT_BYTES);
    let parsed = Ciphertext::from_bytes(&bytes).unwrap();
    assert_eq!(parsed, ct);
    assert_eq!(decrypt(&kp.secret_key, &parsed), id);
}
