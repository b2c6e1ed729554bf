//! Append-only store of identity ciphertexts keyed by nullifier.

use std::collections::HashMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{AuditError, Result};
use crate::rlwe::Ciphertext;

/// Opaque label of a spent note, owned by the transaction layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Nullifier(pub [u8; 32]);

impl fmt::Display for Nullifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl From<[u8; 32]> for Nullifier {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// Hash of the transaction that produced a log entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxHash(pub [u8; 32]);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// One logged transaction: the sender identity encrypted under the audit key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub nullifier: Nullifier,
    pub ciphertext: Ciphertext,
    /// Seconds since the Unix epoch.
    pub timestamp: u64,
    pub tx_hash: Option<TxHash>,
}

impl AuditLogEntry {
    /// Entry stamped with the current wall-clock time.
    pub fn new(nullifier: Nullifier, ciphertext: Ciphertext, tx_hash: Option<TxHash>) -> Self {
        Self {
            nullifier,
            ciphertext,
            timestamp: unix_now(),
            tx_hash,
        }
    }
}

pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Storage boundary for logged ciphertexts.
///
/// Implementations stand in for on-chain or off-chain storage. Each nullifier
/// maps to at most one entry and entries are never modified.
pub trait CiphertextStore: Send + Sync {
    /// Store a new entry; a nullifier already present is `DuplicateLogEntry`.
    fn insert(&self, entry: AuditLogEntry) -> Result<()>;

    /// Fetch the entry for a nullifier, `AuditLogNotFound` if absent.
    fn get(&self, nullifier: &Nullifier) -> Result<AuditLogEntry>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory [`CiphertextStore`].
#[derive(Debug, Default)]
pub struct AuditLog {
    entries: RwLock<HashMap<Nullifier, AuditLogEntry>>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CiphertextStore for AuditLog {
    fn insert(&self, entry: AuditLogEntry) -> Result<()> {
        let mut entries = self.entries.write();
        if entries.contains_key(&entry.nullifier) {
            return Err(AuditError::DuplicateLogEntry(entry.nullifier));
        }
        entries.insert(entry.nullifier, entry);
        Ok(())
    }

    fn get(&self, nullifier: &Nullifier) -> Result<AuditLogEntry> {
        self.entries
            .read()
            .get(nullifier)
            .cloned()
            .ok_or(AuditError::AuditLogNotFound(*nullifier))
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::RingElement;
    use crate::params::M;

    fn dummy_ciphertext() -> Ciphertext {
        Ciphertext::from_parts(vec![0; M], RingElement::zero()).unwrap()
    }

    #[test]
    fn test_insert_and_get() {
        let log = AuditLog::new();
        let nullifier = Nullifier([7u8; 32]);
        log.insert(AuditLogEntry::new(nullifier, dummy_ciphertext(), None))
            .unwrap();

        let entry = log.get(&nullifier).unwrap();
        assert_eq!(entry.nullifier, nullifier);
        assert!(entry.timestamp > 0);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_one_ciphertext_per_nullifier() {
        let log = AuditLog::new();
        let nullifier = Nullifier([1u8; 32]);
        log.insert(AuditLogEntry::new(nullifier, dummy_ciphertext(), None))
            .unwrap();
        assert_eq!(
            log.insert(AuditLogEntry::new(nullifier, dummy_ciphertext(), None)),
            Err(AuditError::DuplicateLogEntry(nullifier))
        );
    }

    #[test]
    fn test_missing_nullifier() {
        let log = AuditLog::new();
        let nullifier = Nullifier([9u8; 32]);
        assert_eq!(log.get(&nullifier), Err(AuditError::AuditLogNotFound(nullifier)));
        assert!(log.is_empty());
    }

    #[test]
    fn test_nullifier_display_is_hex() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0xab;
        let shown = Nullifier(bytes).to_string();
        assert_eq!(shown.len(), 64);
        assert!(shown.starts_with("ab00"));
    }
}
