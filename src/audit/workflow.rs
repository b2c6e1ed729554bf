//! The audit orchestrator.
//!
//! [`AuditSystem`] owns the ciphertext store, the request table and handles to
//! the share holders. It never sees a secret share or the full secret key.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{AuditError, Result};
use crate::math::Sampler;
use crate::params::NUM_SHARES;
use crate::rlwe::{encrypt_with_sampler, Ciphertext, Identity, PublicKey};
use crate::threshold::{combine_partial_decryptions, PartialDecryption};

use super::holder::ShareHolder;
use super::log::{unix_now, AuditLog, AuditLogEntry, CiphertextStore, Nullifier, TxHash};
use super::request::{AuditRequest, AuditorId, RequestId, RequestStatus};

/// One transaction to log in a batch.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub nullifier: Nullifier,
    pub identity: Identity,
    pub tx_hash: Option<TxHash>,
}

/// Result of a successful approval.
#[derive(Clone, Debug)]
pub struct ApprovalOutcome {
    /// Whether the request reached the approval threshold with this call.
    pub approved: bool,
    /// The approving auditor's contribution, to pass to
    /// [`AuditSystem::complete_decryption`].
    pub partial: PartialDecryption,
}

type RequestHandle = Arc<Mutex<AuditRequest>>;

/// Logs encrypted identities and runs the 2-of-3 audit workflow over them.
pub struct AuditSystem<S: CiphertextStore = AuditLog> {
    public_key: PublicKey,
    store: S,
    holders: HashMap<AuditorId, Arc<dyn ShareHolder>>,
    requests: RwLock<BTreeMap<RequestId, RequestHandle>>,
    next_request_id: AtomicU64,
}

impl AuditSystem<AuditLog> {
    /// Audit system backed by an in-memory log.
    pub fn new(public_key: PublicKey, holders: Vec<Arc<dyn ShareHolder>>) -> Result<Self> {
        Self::with_store(public_key, AuditLog::new(), holders)
    }
}

impl<S: CiphertextStore> AuditSystem<S> {
    /// Audit system over a caller-supplied store.
    ///
    /// Each holder must carry a distinct share index in `1..=3` and a distinct
    /// auditor id.
    pub fn with_store(
        public_key: PublicKey,
        store: S,
        holders: Vec<Arc<dyn ShareHolder>>,
    ) -> Result<Self> {
        let mut by_id: HashMap<AuditorId, Arc<dyn ShareHolder>> = HashMap::new();
        for holder in holders {
            let index = holder.share_index();
            let index_taken = by_id.values().any(|h| h.share_index() == index);
            if !(1..=NUM_SHARES as u32).contains(&index) || index_taken {
                return Err(AuditError::InvalidShareIndex(index));
            }
            if by_id.contains_key(holder.auditor()) {
                return Err(AuditError::DuplicateAuditor(holder.auditor().clone()));
            }
            by_id.insert(holder.auditor().clone(), holder);
        }

        info!(auditors = by_id.len(), "audit system initialised");
        Ok(Self {
            public_key,
            store,
            holders: by_id,
            requests: RwLock::new(BTreeMap::new()),
            next_request_id: AtomicU64::new(1),
        })
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Registered auditors, sorted.
    pub fn auditors(&self) -> Vec<AuditorId> {
        let mut ids: Vec<AuditorId> = self.holders.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Encrypt `identity` under fresh randomness and log it against `nullifier`.
    pub fn log_transaction(
        &self,
        nullifier: Nullifier,
        identity: &Identity,
        tx_hash: Option<TxHash>,
    ) -> Result<Ciphertext> {
        let sampler = Sampler::random().derive("log");
        self.log_with_sampler(nullifier, identity, tx_hash, &sampler)
    }

    /// [`log_transaction`](Self::log_transaction) with caller-chosen encryption randomness.
    pub fn log_transaction_with_seed(
        &self,
        nullifier: Nullifier,
        identity: &Identity,
        tx_hash: Option<TxHash>,
        seed: &[u8],
    ) -> Result<Ciphertext> {
        self.log_with_sampler(nullifier, identity, tx_hash, &Sampler::new(seed))
    }

    fn log_with_sampler(
        &self,
        nullifier: Nullifier,
        identity: &Identity,
        tx_hash: Option<TxHash>,
        sampler: &Sampler,
    ) -> Result<Ciphertext> {
        let ciphertext = encrypt_with_sampler(&self.public_key, identity, sampler);
        self.store
            .insert(AuditLogEntry::new(nullifier, ciphertext.clone(), tx_hash))?;
        debug!(%nullifier, "transaction logged");
        Ok(ciphertext)
    }

    /// Log a batch, encrypting in parallel. Results are in input order.
    pub fn log_transactions(&self, batch: &[TransactionRecord]) -> Vec<Result<Ciphertext>> {
        let results: Vec<Result<Ciphertext>> = batch
            .par_iter()
            .map(|record| self.log_transaction(record.nullifier, &record.identity, record.tx_hash))
            .collect();

        let failed = results.iter().filter(|r| r.is_err()).count();
        info!(total = batch.len(), failed, "batch logged");
        results
    }

    /// Logged entry for `nullifier`.
    pub fn audit_entry(&self, nullifier: &Nullifier) -> Result<AuditLogEntry> {
        self.store.get(nullifier)
    }

    /// Open a `Pending` request against a logged nullifier.
    pub fn create_audit_request(
        &self,
        requestor: impl Into<String>,
        nullifier: Nullifier,
        reason: impl Into<String>,
    ) -> Result<RequestId> {
        self.store.get(&nullifier)?;

        let id = RequestId(self.next_request_id.fetch_add(1, Ordering::Relaxed));
        let request = AuditRequest::new(id, requestor.into(), nullifier, reason.into(), unix_now());
        info!(request = %id, requestor = %request.requestor, %nullifier, "audit request created");

        self.requests
            .write()
            .insert(id, Arc::new(Mutex::new(request)));
        Ok(id)
    }

    fn request_handle(&self, id: RequestId) -> Result<RequestHandle> {
        self.requests
            .read()
            .get(&id)
            .cloned()
            .ok_or(AuditError::RequestNotFound(id))
    }

    fn holder(&self, auditor: &AuditorId) -> Result<&Arc<dyn ShareHolder>> {
        self.holders
            .get(auditor)
            .ok_or_else(|| AuditError::UnknownAuditor(auditor.clone()))
    }

    /// Record `auditor`'s approval and obtain its partial decryption.
    ///
    /// The partial is requested from the share holder without holding the
    /// request lock; the approval is then re-checked and recorded atomically,
    /// so racing duplicate approvals count once.
    pub fn approve_request(&self, id: RequestId, auditor: &AuditorId) -> Result<ApprovalOutcome> {
        let handle = self.request_handle(id)?;
        let holder = self.holder(auditor)?;

        let nullifier = {
            let request = handle.lock();
            request.check_can_approve(auditor)?;
            request.target_nullifier
        };

        let entry = self.store.get(&nullifier)?;
        let partial = holder.partial_decrypt(&entry.ciphertext)?;
        if partial.index != holder.share_index() {
            warn!(request = %id, %auditor, "share holder returned a foreign index");
            return Err(AuditError::ShareHolderUnavailable {
                auditor: auditor.clone(),
                reason: format!(
                    "partial carries index {} instead of {}",
                    partial.index,
                    holder.share_index()
                ),
            });
        }

        let (approved, approvals) = {
            let mut request = handle.lock();
            let approved = request.record_approval(auditor.clone())?;
            (approved, request.approval_count())
        };

        if approved {
            info!(request = %id, %auditor, approvals, "approval threshold reached");
        } else {
            info!(request = %id, %auditor, approvals, "approval recorded");
        }
        Ok(ApprovalOutcome { approved, partial })
    }

    /// Administrative rejection of a pending request.
    pub fn reject_request(&self, id: RequestId) -> Result<()> {
        let handle = self.request_handle(id)?;
        handle.lock().reject()?;
        info!(request = %id, "audit request rejected");
        Ok(())
    }

    /// Combine partials for a request, store and return the recovered identity.
    ///
    /// Accepted for pending and approved requests. The first recovered
    /// identity is final: later calls return it, or `DecryptionMismatch` if
    /// their partials combine to something else.
    pub fn complete_decryption(
        &self,
        id: RequestId,
        partials: &[PartialDecryption],
    ) -> Result<Identity> {
        let handle = self.request_handle(id)?;
        let nullifier = {
            let request = handle.lock();
            if request.status == RequestStatus::Rejected {
                return Err(AuditError::RequestNotPending(id));
            }
            request.target_nullifier
        };

        for partial in partials {
            if !self.holders.values().any(|h| h.share_index() == partial.index) {
                return Err(AuditError::UnknownAuditor(AuditorId(format!(
                    "share-{}",
                    partial.index
                ))));
            }
        }

        let entry = self.store.get(&nullifier)?;
        let identity = combine_partial_decryptions(partials, &entry.ciphertext)?;

        let mut request = handle.lock();
        if request.status == RequestStatus::Rejected {
            return Err(AuditError::RequestNotPending(id));
        }
        match request.decrypted_identity {
            Some(stored) if stored == identity => Ok(stored),
            Some(_) => {
                warn!(request = %id, "recombined identity differs from stored result");
                Err(AuditError::DecryptionMismatch(id))
            }
            None => {
                request.decrypted_identity = Some(identity);
                info!(request = %id, partials = partials.len(), "decryption completed");
                Ok(identity)
            }
        }
    }

    /// Ask each listed auditor to approve in parallel and decrypt once any two
    /// partials arrive. Failed or duplicate approvals are skipped.
    pub fn approve_and_decrypt(&self, id: RequestId, auditors: &[AuditorId]) -> Result<Identity> {
        let partials: Vec<PartialDecryption> = auditors
            .par_iter()
            .filter_map(|auditor| match self.approve_request(id, auditor) {
                Ok(outcome) => Some(outcome.partial),
                Err(err) => {
                    warn!(request = %id, %auditor, error = %err, "approval skipped");
                    None
                }
            })
            .collect();

        self.complete_decryption(id, &partials)
    }

    /// Snapshot of one request.
    pub fn get_request(&self, id: RequestId) -> Result<AuditRequest> {
        Ok(self.request_handle(id)?.lock().clone())
    }

    /// Snapshots of all pending requests, ordered by id.
    pub fn get_pending_requests(&self) -> Vec<AuditRequest> {
        self.requests
            .read()
            .values()
            .filter_map(|handle| {
                let request = handle.lock();
                request.is_pending().then(|| request.clone())
            })
            .collect()
    }
}
