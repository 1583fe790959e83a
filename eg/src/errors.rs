// Copyright (C) 2026 The electionguard-core Authors.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::manual_assert)]

//! The main error type returned by this crate's fallible operations.
//!
//! Variants are grouped, per spec §7, into domain errors (client-caused,
//! recoverable at the boundary), cryptographic failures (adversarial or
//! corrupted input), and a catch-all for aggregated failures reported by
//! `anyhow`. There is deliberately no "programmer error" variant: those
//! are bugs and must show up as a panic in debug assertions during
//! development, never as a value a caller is expected to handle.

use crate::guardian::GuardianIndex;

/// The stable error codes from spec §6.3, each carrying the context
/// needed to act on it without leaking secret material.
#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone, serde::Serialize)]
pub enum EgError {
    #[error("invalid group or field element: {0}")]
    InvalidElement(String),

    #[error("zero-knowledge proof does not verify: {0}")]
    ProofInvalid(String),

    #[error("insufficient quorum: need {needed}, have {have}")]
    InsufficientQuorum { needed: u32, have: u32 },

    #[error("discrete log search exceeded its table bound of {bound}")]
    RangeExceeded { bound: u64 },

    #[error("election manifest is invalid: {0}")]
    ManifestInvalid(String),

    #[error("state conflict: {0}")]
    StateConflict(String),

    #[error("unknown guardian: {0}")]
    UnknownGuardian(GuardianIndex),

    #[error("required nonce is missing: {0}")]
    NonceMissing(String),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for EgError {
    fn from(e: anyhow::Error) -> Self {
        EgError::Other(e.to_string())
    }
}

/// [`Result`](std::result::Result) specialized to [`EgError`].
pub type EgResult<T> = std::result::Result<T, EgError>;
