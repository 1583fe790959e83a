// Copyright (C) 2026 The electionguard-core Authors.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::manual_assert)]

//! Guardian identity.
//!
//! A guardian is identified by a human-readable `id` plus a
//! `sequence_order` in `{1, ..., n}` (never `0`, since `0` is excluded
//! from every evaluation domain used in Lagrange interpolation and
//! polynomial evaluation). The sequence order, not the id string, is
//! what every cryptographic computation indexes by.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{EgError, EgResult};

/// A guardian's position among `{1, ..., n}`. Never `0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GuardianIndex(u32);

impl GuardianIndex {
    /// Fails if `index` is `0`.
    pub fn new(index: u32) -> EgResult<Self> {
        if index == 0 {
            return Err(EgError::InvalidElement(
                "guardian sequence order must not be zero".into(),
            ));
        }
        Ok(GuardianIndex(index))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for GuardianIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A guardian's public identity within a given election.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guardian {
    pub id: String,
    pub sequence_order: GuardianIndex,
    pub name: Option<String>,
}

impl Guardian {
    pub fn new(id: impl Into<String>, sequence_order: u32) -> EgResult<Self> {
        Ok(Guardian {
            id: id.into(),
            sequence_order: GuardianIndex::new(sequence_order)?,
            name: None,
        })
    }
}

/// The full set of guardians for an election, with the threshold `k`
/// needed to decrypt (`k <= n`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardianSet {
    pub guardians: Vec<Guardian>,
    pub quorum: u32,
}

impl GuardianSet {
    pub fn new(guardians: Vec<Guardian>, quorum: u32) -> EgResult<Self> {
        let n = guardians.len() as u32;
        if quorum == 0 || quorum > n {
            return Err(EgError::InvalidElement(format!(
                "quorum {quorum} is not in range [1, {n}]"
            )));
        }
        let mut seen = std::collections::BTreeSet::new();
        for g in &guardians {
            if !seen.insert(g.sequence_order) {
                return Err(EgError::InvalidElement(format!(
                    "duplicate guardian sequence order {}",
                    g.sequence_order
                )));
            }
        }
        Ok(GuardianSet { guardians, quorum })
    }

    pub fn n(&self) -> u32 {
        self.guardians.len() as u32
    }

    pub fn find(&self, index: GuardianIndex) -> EgResult<&Guardian> {
        self.guardians
            .iter()
            .find(|g| g.sequence_order == index)
            .ok_or(EgError::UnknownGuardian(index))
    }
}
