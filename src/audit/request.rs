//! Audit requests and their approval state.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AuditError, Result};
use crate::params::THRESHOLD;
use crate::rlwe::Identity;

use super::log::Nullifier;

/// Identity of an auditor holding one key share.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AuditorId(pub String);

impl AuditorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for AuditorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle: `Pending → Approved` via approvals, `Pending → Rejected` by an
/// administrator. Both non-pending states are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

/// A compliance request to reveal the sender behind one nullifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRequest {
    pub id: RequestId,
    pub requestor: String,
    pub target_nullifier: Nullifier,
    pub reason: String,
    pub status: RequestStatus,
    /// At most one entry per auditor.
    pub approvals: BTreeSet<AuditorId>,
    pub decrypted_identity: Option<Identity>,
    /// Seconds since the Unix epoch.
    pub created_at: u64,
}

impl AuditRequest {
    pub(crate) fn new(
        id: RequestId,
        requestor: String,
        target_nullifier: Nullifier,
        reason: String,
        created_at: u64,
    ) -> Self {
        Self {
            id,
            requestor,
            target_nullifier,
            reason,
            status: RequestStatus::Pending,
            approvals: BTreeSet::new(),
            decrypted_identity: None,
            created_at,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    pub fn approval_count(&self) -> usize {
        self.approvals.len()
    }

    /// Whether `auditor` may approve now. Duplicates are reported before
    /// state, so a replayed approval is always `DuplicateApproval`.
    pub(crate) fn check_can_approve(&self, auditor: &AuditorId) -> Result<()> {
        if self.approvals.contains(auditor) {
            return Err(AuditError::DuplicateApproval {
                request: self.id,
                auditor: auditor.clone(),
            });
        }
        if !self.is_pending() {
            return Err(AuditError::RequestNotPending(self.id));
        }
        Ok(())
    }

    /// Record an approval, moving to `Approved` at the threshold.
    ///
    /// Returns whether the request is now approved.
    pub(crate) fn record_approval(&mut self, auditor: AuditorId) -> Result<bool> {
        self.check_can_approve(&auditor)?;
        self.approvals.insert(auditor);
        if self.approvals.len() >= THRESHOLD {
            self.status = RequestStatus::Approved;
        }
        Ok(self.status == RequestStatus::Approved)
    }

    pub(crate) fn reject(&mut self) -> Result<()> {
        if !self.is_pending() {
            return Err(AuditError::RequestNotPending(self.id));
        }
        self.status = RequestStatus::Rejected;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> AuditRequest {
        AuditRequest::new(
            RequestId(1),
            "compliance".to_string(),
            Nullifier([3u8; 32]),
            "suspicious transfer".to_string(),
            0,
        )
    }

    #[test]
    fn test_threshold_transition() {
        let mut req = request();
        assert!(!req.record_approval(AuditorId::new("alice")).unwrap());
        assert_eq!(req.status, RequestStatus::Pending);
        assert!(req.record_approval(AuditorId::new("bob")).unwrap());
        assert_eq!(req.status, RequestStatus::Approved);
        assert_eq!(req.approval_count(), 2);
    }

    #[test]
    fn test_duplicate_approval() {
        let mut req = request();
        req.record_approval(AuditorId::new("alice")).unwrap();
        assert_eq!(
            req.record_approval(AuditorId::new("alice")),
            Err(AuditError::DuplicateApproval {
                request: RequestId(1),
                auditor: AuditorId::new("alice"),
            })
        );
        assert_eq!(req.approval_count(), 1);
    }

    #[test]
    fn test_terminal_states() {
        let mut req = request();
        req.reject().unwrap();
        assert_eq!(req.status, RequestStatus::Rejected);
        assert_eq!(
            req.record_approval(AuditorId::new("carol")),
            Err(AuditError::RequestNotPending(RequestId(1)))
        );
        assert!(req.reject().is_err());
    }
}
