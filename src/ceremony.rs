//! One-shot key ceremony.
//!
//! Derives the audit key pair from a seed, splits the secret key into three
//! shares, checks every pair of shares against the public key and drops the
//! full secret key before returning. The public key is exported as a
//! [`PublicKeyArtifact`]: canonical bincode bytes plus a BLAKE3 fingerprint
//! that anyone holding the seed can reproduce.

use std::fs;
use std::path::Path;

use eyre::{Result as EyreResult, WrapErr};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::audit::unix_now;
use crate::error::{AuditError, Result};
use crate::math::Sampler;
use crate::params::{AuditParams, NUM_SHARES};
use crate::rlwe::{generate_key_pair, PublicKey};
use crate::threshold::{split_secret_key, verify_share, SecretShare};

/// Canonical export of the audit public key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyArtifact {
    bytes: Vec<u8>,
    fingerprint: String,
}

impl PublicKeyArtifact {
    pub fn from_public_key(pk: &PublicKey) -> Result<Self> {
        let bytes = bincode::serialize(pk)
            .map_err(|e| AuditError::InvalidArtifact(e.to_string()))?;
        Ok(Self::from_bytes_unchecked(bytes))
    }

    fn from_bytes_unchecked(bytes: Vec<u8>) -> Self {
        let fingerprint = blake3::hash(&bytes).to_hex().to_string();
        Self { bytes, fingerprint }
    }

    /// Parse artifact bytes back into a public key.
    pub fn public_key(&self) -> Result<PublicKey> {
        bincode::deserialize(&self.bytes).map_err(|e| AuditError::InvalidArtifact(e.to_string()))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Hex BLAKE3 digest of [`bytes`](Self::bytes).
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// Outcome of checking one pair of shares.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairCheck {
    pub first: u32,
    pub second: u32,
    pub passed: bool,
}

/// Public record of a ceremony. Contains no secret material.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CeremonyTranscript {
    pub params: AuditParams,
    pub fingerprint: String,
    pub share_indices: Vec<u32>,
    pub pair_checks: Vec<PairCheck>,
    pub created_at: u64,
}

impl CeremonyTranscript {
    pub fn all_pairs_passed(&self) -> bool {
        !self.pair_checks.is_empty() && self.pair_checks.iter().all(|c| c.passed)
    }

    pub fn to_json(&self) -> EyreResult<String> {
        serde_json::to_string_pretty(self).wrap_err("failed to serialize ceremony transcript")
    }

    pub fn from_json(json: &str) -> EyreResult<Self> {
        serde_json::from_str(json).wrap_err("failed to parse ceremony transcript")
    }
}

/// Everything a ceremony hands out. Each share goes to exactly one auditor.
#[derive(Debug)]
pub struct CeremonyOutput {
    pub public_key: PublicKey,
    pub artifact: PublicKeyArtifact,
    pub shares: [SecretShare; NUM_SHARES],
    pub transcript: CeremonyTranscript,
}

pub struct KeyCeremony;

impl KeyCeremony {
    fn subseed(seed: &[u8], label: &str) -> Vec<u8> {
        Sampler::new(seed).derive(label).bytes(32)
    }

    /// Run the ceremony from a non-empty seed.
    ///
    /// Share verification failing is reported as `InvalidSeed`; it cannot
    /// happen for a correct implementation.
    pub fn run(seed: &[u8]) -> Result<CeremonyOutput> {
        if seed.is_empty() {
            return Err(AuditError::InvalidSeed("ceremony seed must not be empty"));
        }

        let key_pair = generate_key_pair(&Self::subseed(seed, "keygen"));
        let shares = split_secret_key(&key_pair.secret_key, &Self::subseed(seed, "shares"));
        let public_key = key_pair.public_key.clone();
        drop(key_pair);

        let mut pair_checks = Vec::with_capacity(3);
        for a in 0..NUM_SHARES {
            for b in a + 1..NUM_SHARES {
                pair_checks.push(PairCheck {
                    first: shares[a].index,
                    second: shares[b].index,
                    passed: verify_share(&shares[a], &public_key, &shares[b]),
                });
            }
        }

        let artifact = PublicKeyArtifact::from_public_key(&public_key)?;
        let transcript = CeremonyTranscript {
            params: AuditParams::standard(),
            fingerprint: artifact.fingerprint().to_string(),
            share_indices: shares.iter().map(|s| s.index).collect(),
            pair_checks,
            created_at: unix_now(),
        };

        if !transcript.all_pairs_passed() {
            warn!(fingerprint = %artifact.fingerprint(), "share pair verification failed");
            return Err(AuditError::InvalidSeed("share verification failed"));
        }

        info!(fingerprint = %artifact.fingerprint(), "key ceremony completed");
        Ok(CeremonyOutput {
            public_key,
            artifact,
            shares,
            transcript,
        })
    }

    /// Whether `bytes` is exactly the public key artifact `seed` produces.
    pub fn verify_artifact(seed: &[u8], bytes: &[u8]) -> Result<bool> {
        if seed.is_empty() {
            return Err(AuditError::InvalidSeed("ceremony seed must not be empty"));
        }
        let key_pair = generate_key_pair(&Self::subseed(seed, "keygen"));
        let expected = PublicKeyArtifact::from_public_key(&key_pair.public_key)?;
        Ok(expected.bytes() == bytes)
    }
}

/// Write artifact bytes to `path`.
pub fn write_artifact(path: impl AsRef<Path>, artifact: &PublicKeyArtifact) -> EyreResult<()> {
    let path = path.as_ref();
    fs::write(path, artifact.bytes())
        .wrap_err_with(|| format!("failed to write public key artifact to {}", path.display()))
}

/// Read artifact bytes from `path`, checking that they parse as a public key.
pub fn read_artifact(path: impl AsRef<Path>) -> EyreResult<PublicKeyArtifact> {
    let path = path.as_ref();
    let bytes = fs::read(path)
        .wrap_err_with(|| format!("failed to read public key artifact from {}", path.display()))?;
    let artifact = PublicKeyArtifact::from_bytes_unchecked(bytes);
    artifact
        .public_key()
        .wrap_err_with(|| format!("{} is not a public key artifact", path.display()))?;
    Ok(artifact)
}
