//! RLWE key generation.

use crate::math::Sampler;
use crate::params::NOISE_BOUND;

use super::types::{KeyPair, PublicKey, SecretKey};

/// Derive a key pair from `seed`.
///
/// Computes `s ← small(seed|"sk")`, `e ← small(seed|"e")`,
/// `a ← uniform(seed|"a")` and `b = -(a·s + e)`. Pure: the seed is the only
/// source of randomness, so callers must supply a high-entropy seed.
pub fn generate_key_pair(seed: &[u8]) -> KeyPair {
    let sampler = Sampler::new(seed);

    let secret = sampler.derive("sk").small(NOISE_BOUND);
    let error = sampler.derive("e").small(NOISE_BOUND);
    let a = sampler.derive("a").uniform();

    let b = -&(&a.mul(&secret) + &error);

    KeyPair {
        secret_key: SecretKey::from_poly(secret),
        public_key: PublicKey { a, b },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::ModQ;
    use crate::params::Q;

    #[test]
    fn test_keygen_deterministic() {
        let kp1 = generate_key_pair(b"test_seed_123");
        let kp2 = generate_key_pair(b"test_seed_123");
        assert_eq!(kp1.public_key, kp2.public_key);
        assert_eq!(kp1.secret_key.poly, kp2.secret_key.poly);

        let kp3 = generate_key_pair(b"other_seed");
        assert_ne!(kp1.public_key, kp3.public_key);
    }

    #[test]
    fn test_secret_key_is_small() {
        let kp = generate_key_pair(b"small");
        assert!(kp.secret_key.poly.linf_norm() <= NOISE_BOUND);
    }

    #[test]
    fn test_rlwe_relation() {
        // b + a·s = -e must be small
        let kp = generate_key_pair(b"relation");
        let residual = &kp.public_key.b + &kp.public_key.a.mul(&kp.secret_key.poly);
        assert!(residual.linf_norm() <= NOISE_BOUND);
        assert!(residual
            .coeffs()
            .iter()
            .all(|&c| ModQ::to_signed(c, Q).abs() <= NOISE_BOUND as i64));
    }
}
