//! Share-holding auditor services.
//!
//! Each holder owns exactly one [`SecretShare`]; the orchestrator only ever
//! receives partial decryptions from it.

use crate::error::Result;
use crate::rlwe::Ciphertext;
use crate::threshold::{partial_decrypt, PartialDecryption, SecretShare};

use super::request::AuditorId;

/// An auditor able to produce partial decryptions.
///
/// Calls are arm's-length: a remote implementation may fail or be slow, and
/// should report failure as `ShareHolderUnavailable`.
pub trait ShareHolder: Send + Sync {
    fn auditor(&self) -> &AuditorId;

    /// Evaluation point of the held share.
    fn share_index(&self) -> u32;

    /// `share·c1` for the given ciphertext.
    fn partial_decrypt(&self, ct: &Ciphertext) -> Result<PartialDecryption>;
}

/// Holder whose share lives in this process.
#[derive(Debug)]
pub struct LocalShareHolder {
    auditor: AuditorId,
    share: SecretShare,
}

impl LocalShareHolder {
    pub fn new(auditor: AuditorId, share: SecretShare) -> Self {
        Self { auditor, share }
    }
}

impl ShareHolder for LocalShareHolder {
    fn auditor(&self) -> &AuditorId {
        &self.auditor
    }

    fn share_index(&self) -> u32 {
        self.share.index
    }

    fn partial_decrypt(&self, ct: &Ciphertext) -> Result<PartialDecryption> {
        Ok(partial_decrypt(&self.share, ct))
    }
}
