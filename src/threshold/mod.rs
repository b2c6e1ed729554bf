//! 2-of-3 threshold decryption.
//!
//! # Protocol
//!
//! 1. **Split**: the ceremony splits s into `f(1), f(2), f(3)` with
//!    `f(X) = s + X·mask`, then checks every pair with [`verify_share`]
//! 2. **Partial**: each holder computes `f(j)·c1` for the target ciphertext
//! 3. **Combine**: any two partials weighted by Lagrange coefficients at 0
//!    reproduce `s·c1`, and the message slots decode as in plain decryption
//!
//! A single share never yields the plaintext.
//!
//! # Example
//!
//! ```
//! use rlwe_audit::rlwe::{encrypt, generate_key_pair, Identity};
//! use rlwe_audit::threshold::{combine_partial_decryptions, partial_decrypt, split_secret_key};
//!
//! let kp = generate_key_pair(b"test_seed_123");
//! let id = Identity::new(0x123456789ABCDEF, 0xFEDCBA987654321);
//! let ct = encrypt(&kp.public_key, &id, b"enc_seed_456");
//!
//! let shares = split_secret_key(&kp.secret_key, b"share_seed_789");
//! let partials = [partial_decrypt(&shares[0], &ct), partial_decrypt(&shares[1], &ct)];
//! assert_eq!(combine_partial_decryptions(&partials, &ct).unwrap(), id);
//! ```

mod combine;
mod share;

pub use combine::{
    combine_partial_decryptions, lagrange_at_zero, partial_decrypt, verify_all_share_pairs,
    verify_share, PartialDecryption,
};
pub use share::{split_secret_key, SecretShare};
