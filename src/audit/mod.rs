//! Transaction logging and threshold-gated identity recovery.
//!
//! Every logged transaction stores the sender identity encrypted under the
//! audit public key. Revealing it takes an [`AuditRequest`] approved by two of
//! the three registered auditors, each of whom contributes a partial
//! decryption through its [`ShareHolder`].

mod holder;
mod log;
mod request;
mod workflow;

pub use holder::{LocalShareHolder, ShareHolder};
pub use log::{AuditLog, AuditLogEntry, CiphertextStore, Nullifier, TxHash};
pub(crate) use log::unix_now;
pub use request::{AuditRequest, AuditorId, RequestId, RequestStatus};
pub use workflow::{ApprovalOutcome, AuditSystem, TransactionRecord};
