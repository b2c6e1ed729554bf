//! rlwe-audit: compliance audits for a shielded transaction pool
//!
//! Each transaction's sender identity is encrypted under a lattice (RLWE)
//! public key and logged against the transaction nullifier. The matching secret
//! key is split 2-of-3 among independent auditors, so revealing any identity
//! needs an approved audit request and partial decryptions from two auditors.
//!
//! Key components:
//! - `math`: arithmetic mod Q, negacyclic ring R_Q = Z_Q[X]/(X^N+1), NTT, seeded sampling
//! - `rlwe`: key generation, identity encoding, encryption and the ciphertext wire format
//! - `threshold`: secret key sharing, partial decryption and Lagrange combination
//! - `audit`: the transaction log and the audit request workflow
//! - `ceremony`: one-shot key generation with share verification and public key export

pub mod audit;
pub mod ceremony;
pub mod error;
pub mod math;
pub mod params;
pub mod rlwe;
pub mod threshold;

pub use audit::{
    ApprovalOutcome, AuditLog, AuditLogEntry, AuditRequest, AuditSystem, AuditorId,
    CiphertextStore, LocalShareHolder, Nullifier, RequestId, RequestStatus, ShareHolder,
    TransactionRecord, TxHash,
};
pub use ceremony::{CeremonyOutput, CeremonyTranscript, KeyCeremony, PublicKeyArtifact};
pub use error::{AuditError, Result};
pub use params::AuditParams;
pub use rlwe::{decrypt, encrypt, generate_key_pair, Ciphertext, Identity, KeyPair, PublicKey, SecretKey};
pub use threshold::{
    combine_partial_decryptions, partial_decrypt, split_secret_key, verify_share,
    PartialDecryption, SecretShare,
};
