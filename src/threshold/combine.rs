//! Partial decryption and Lagrange combination.
//!
//! Each share holder contributes `p_j = share_j·c1`. Because the sharing is
//! linear, `λ_i·p_i + λ_j·p_j = (λ_i·f(i) + λ_j·f(j))·c1 = s·c1` for the
//! Lagrange coefficients at zero, which is exactly the term full decryption
//! uses. Wrong coefficients leave a uniform `mask·c1` residue and decode to
//! garbage.

use serde::{Deserialize, Serialize};

use crate::error::{AuditError, Result};
use crate::math::{ModQ, RingElement, Sampler};
use crate::params::{NUM_SHARES, Q, THRESHOLD};
use crate::rlwe::{encrypt_with_sampler, recover_identity, Ciphertext, Identity, PublicKey};

use super::share::SecretShare;

/// One holder's contribution towards decrypting a specific ciphertext.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialDecryption {
    /// Index of the share that produced this partial.
    pub index: u32,
    /// `share·c1`.
    pub value: RingElement,
}

/// Compute `share·c1`.
pub fn partial_decrypt(share: &SecretShare, ct: &Ciphertext) -> PartialDecryption {
    PartialDecryption {
        index: share.index,
        value: share.value.mul(ct.c1()),
    }
}

fn check_index(index: u32) -> Result<u32> {
    if (1..=NUM_SHARES as u32).contains(&index) {
        Ok(index)
    } else {
        Err(AuditError::InvalidShareIndex(index))
    }
}

/// Lagrange coefficients at x = 0 for evaluation points `i` and `j`:
/// `λ_i = j/(j-i)`, `λ_j = i/(i-j)` mod Q.
pub fn lagrange_at_zero(i: u32, j: u32) -> Result<(u64, u64)> {
    let i = check_index(i)? as u64;
    let j = check_index(j)? as u64;
    let inv_j_minus_i = ModQ::inv(ModQ::sub(j, i, Q), Q).ok_or(AuditError::InsufficientShares {
        needed: THRESHOLD,
        got: 1,
    })?;
    let inv_i_minus_j = ModQ::negate(inv_j_minus_i, Q);

    Ok((ModQ::mul(j, inv_j_minus_i, Q), ModQ::mul(i, inv_i_minus_j, Q)))
}

/// Recover the plaintext identity from at least two partials with distinct indices.
///
/// The first two distinct indices are used; later duplicates and extras are
/// ignored. As with [`crate::rlwe::decrypt`], a bad pairing of index and value
/// is not detected and yields garbage.
pub fn combine_partial_decryptions(
    partials: &[PartialDecryption],
    ct: &Ciphertext,
) -> Result<Identity> {
    if partials.len() < THRESHOLD {
        return Err(AuditError::InsufficientShares {
            needed: THRESHOLD,
            got: partials.len(),
        });
    }

    let mut chosen: Vec<&PartialDecryption> = Vec::with_capacity(THRESHOLD);
    for partial in partials {
        check_index(partial.index)?;
        if chosen.len() < THRESHOLD && chosen.iter().all(|p| p.index != partial.index) {
            chosen.push(partial);
        }
    }

    let [first, second] = chosen.as_slice() else {
        return Err(AuditError::InsufficientShares {
            needed: THRESHOLD,
            got: chosen.len(),
        });
    };

    let (lambda_i, lambda_j) = lagrange_at_zero(first.index, second.index)?;
    let combined = &first.value.scalar_mul(lambda_i) + &second.value.scalar_mul(lambda_j);

    Ok(recover_identity(ct, &combined))
}

/// Check that two shares jointly decrypt a fresh encryption of zero.
///
/// Run over every pair before shares are handed out.
pub fn verify_share(share_a: &SecretShare, pk: &PublicKey, share_b: &SecretShare) -> bool {
    let ct = encrypt_with_sampler(pk, &Identity::zero(), &Sampler::random().derive("verify"));
    let partials = [partial_decrypt(share_a, &ct), partial_decrypt(share_b, &ct)];
    matches!(
        combine_partial_decryptions(&partials, &ct),
        Ok(id) if id == Identity::zero()
    )
}

/// [`verify_share`] over all unordered pairs.
pub fn verify_all_share_pairs(shares: &[SecretShare], pk: &PublicKey) -> bool {
    if shares.len() < THRESHOLD {
        return false;
    }
    shares.iter().enumerate().all(|(pos, a)| {
        shares[pos + 1..]
            .iter()
            .all(|b| verify_share(a, pk, b))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rlwe::{decrypt, encrypt, generate_key_pair, KeyPair};
    use crate::threshold::split_secret_key;

    fn setup() -> (KeyPair, [SecretShare; 3], Ciphertext, Identity) {
        let kp = generate_key_pair(b"combine");
        let shares = split_secret_key(&kp.secret_key, b"combine-split");
        let id = Identity::new(0xC0FFEE, 0xBADC0DE);
        let ct = encrypt(&kp.public_key, &id, b"combine-enc");
        (kp, shares, ct, id)
    }

    #[test]
    fn test_lagrange_coefficients_sum_to_one() {
        // λ_i + λ_j = 1 for a degree-1 interpolation at 0
        for (i, j) in [(1, 2), (1, 3), (2, 3), (3, 1)] {
            let (li, lj) = lagrange_at_zero(i, j).unwrap();
            assert_eq!(ModQ::add(li, lj, Q), 1);
        }
        let (l1, l2) = lagrange_at_zero(1, 2).unwrap();
        assert_eq!(l1, 2);
        assert_eq!(l2, Q - 1);
    }

    #[test]
    fn test_lagrange_rejects_bad_indices() {
        assert_eq!(lagrange_at_zero(0, 1), Err(AuditError::InvalidShareIndex(0)));
        assert_eq!(lagrange_at_zero(1, 4), Err(AuditError::InvalidShareIndex(4)));
        assert!(lagrange_at_zero(2, 2).is_err());
    }

    #[test]
    fn test_all_pairs_recover() {
        let (kp, shares, ct, id) = setup();
        let direct = decrypt(&kp.secret_key, &ct);
        assert_eq!(direct, id);

        for (a, b) in [(0, 1), (0, 2), (1, 2)] {
            let partials = [partial_decrypt(&shares[a], &ct), partial_decrypt(&shares[b], &ct)];
            assert_eq!(combine_partial_decryptions(&partials, &ct).unwrap(), direct);
        }
    }

    #[test]
    fn test_combined_term_equals_direct_term() {
        let (kp, shares, ct, _) = setup();
        let p1 = partial_decrypt(&shares[0], &ct);
        let p3 = partial_decrypt(&shares[2], &ct);
        let (l1, l3) = lagrange_at_zero(1, 3).unwrap();
        let combined = &p1.value.scalar_mul(l1) + &p3.value.scalar_mul(l3);
        assert_eq!(combined, ct.c1().mul(&kp.secret_key.poly));
    }

    #[test]
    fn test_order_of_partials_irrelevant() {
        let (_, shares, ct, id) = setup();
        let partials = [partial_decrypt(&shares[2], &ct), partial_decrypt(&shares[0], &ct)];
        assert_eq!(combine_partial_decryptions(&partials, &ct).unwrap(), id);
    }

    #[test]
    fn test_insufficient_shares() {
        let (_, shares, ct, _) = setup();
        let p1 = partial_decrypt(&shares[0], &ct);

        assert_eq!(
            combine_partial_decryptions(&[], &ct),
            Err(AuditError::InsufficientShares { needed: 2, got: 0 })
        );
        assert_eq!(
            combine_partial_decryptions(&[p1.clone()], &ct),
            Err(AuditError::InsufficientShares { needed: 2, got: 1 })
        );
        assert_eq!(
            combine_partial_decryptions(&[p1.clone(), p1], &ct),
            Err(AuditError::InsufficientShares { needed: 2, got: 1 })
        );
    }

    #[test]
    fn test_duplicates_skipped() {
        let (_, shares, ct, id) = setup();
        let p1 = partial_decrypt(&shares[0], &ct);
        let p2 = partial_decrypt(&shares[1], &ct);
        let partials = [p1.clone(), p1, p2];
        assert_eq!(combine_partial_decryptions(&partials, &ct).unwrap(), id);
    }

    #[test]
    fn test_invalid_index_rejected() {
        let (_, shares, ct, _) = setup();
        let mut bad = partial_decrypt(&shares[0], &ct);
        bad.index = 7;
        let partials = [bad, partial_decrypt(&shares[1], &ct)];
        assert_eq!(
            combine_partial_decryptions(&partials, &ct),
            Err(AuditError::InvalidShareIndex(7))
        );
    }

    #[test]
    fn test_verify_share_pairs() {
        let (kp, shares, _, _) = setup();
        assert!(verify_share(&shares[0], &kp.public_key, &shares[1]));
        assert!(verify_all_share_pairs(&shares, &kp.public_key));
    }

    #[test]
    fn test_verify_share_detects_corruption() {
        let (kp, shares, _, _) = setup();
        let mut corrupted = shares[1].clone();
        corrupted.value = &corrupted.value + &Sampler::new(b"junk").uniform();
        assert!(!verify_share(&shares[0], &kp.public_key, &corrupted));
    }

    #[test]
    fn test_verify_share_same_index_fails() {
        let (kp, shares, _, _) = setup();
        assert!(!verify_share(&shares[0], &kp.public_key, &shares[0]));
    }
}
