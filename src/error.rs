//! Error taxonomy for the audit core.
//!
//! Every variant is a local, recoverable condition reported to the caller.
//! Cryptographic failure is deliberately absent: decrypting a malformed
//! ciphertext yields garbage, not an error.

use thiserror::Error;

use crate::audit::{AuditorId, Nullifier, RequestId};

/// Audit operation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuditError {
    /// Key material was requested from an unusable seed.
    #[error("invalid seed: {0}")]
    InvalidSeed(&'static str),

    /// Approval or partial attributed to an identity holding no share.
    #[error("auditor {0} holds no recognized share")]
    UnknownAuditor(AuditorId),

    /// The same auditor tried to approve a request twice.
    #[error("auditor {auditor} already approved request {request}")]
    DuplicateApproval {
        request: RequestId,
        auditor: AuditorId,
    },

    #[error("audit request {0} not found")]
    RequestNotFound(RequestId),

    #[error("no audit log entry for nullifier {0}")]
    AuditLogNotFound(Nullifier),

    /// A nullifier maps to exactly one ciphertext; re-logging is refused.
    #[error("nullifier {0} is already logged")]
    DuplicateLogEntry(Nullifier),

    /// Combination attempted with fewer distinct partials than the threshold.
    #[error("insufficient shares: need {needed} distinct partials, got {got}")]
    InsufficientShares { needed: usize, got: usize },

    #[error("share index {0} is outside 1..=3")]
    InvalidShareIndex(u32),

    /// The request already left the Pending state.
    #[error("audit request {0} is not pending")]
    RequestNotPending(RequestId),

    #[error("invalid ciphertext encoding: {0}")]
    InvalidCiphertext(String),

    #[error("malformed ring element: {0}")]
    MalformedRingElement(String),

    /// The same auditor id was registered for more than one share holder.
    #[error("auditor {0} is registered more than once")]
    DuplicateAuditor(AuditorId),

    /// A completed request was recombined to a different identity; the stored one is kept.
    #[error("audit request {0} already decrypted to a different identity")]
    DecryptionMismatch(RequestId),

    #[error("invalid public key artifact: {0}")]
    InvalidArtifact(String),

    /// A share holder failed to answer a partial-decryption call.
    #[error("share holder {auditor} unavailable: {reason}")]
    ShareHolderUnavailable { auditor: AuditorId, reason: String },
}

/// Result type for audit operations
pub type Result<T> = std::result::Result<T, AuditError>;
