//! Mathematical primitives for the audit scheme.
//!
//! - **Modular arithmetic** over Z_Q
//! - **Number-Theoretic Transform (NTT)** for fast negacyclic multiplication
//! - **Ring elements** of R_Q = Z_Q[X]/(X^N + 1)
//! - **Deterministic sampling** of uniform and small polynomials from a seed
//!
//! # Example
//!
//! ```
//! use rlwe_audit::math::{RingElement, Sampler};
//!
//! let sampler = Sampler::new(b"example");
//! let a = sampler.derive("a").uniform();
//! let s = sampler.derive("s").small(3);
//! assert_eq!(a.mul(&s), a.negacyclic_mul(&s));
//! ```

pub mod modular;
pub mod ntt;
pub mod ring;
pub mod sampler;

pub use modular::ModQ;
pub use ntt::NttContext;
pub use ring::RingElement;
pub use sampler::Sampler;
