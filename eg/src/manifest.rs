// Copyright (C) 2026 The electionguard-core Authors.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::manual_assert)]

//! The election manifest: the public, hashed description of what is on
//! the ballot. Every contest, selection, and ballot style referenced
//! anywhere else in this crate is resolved against a validated
//! [`Manifest`].

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::canonical::{CanonicalEncode, CanonicalEncoder};
use crate::errors::{EgError, EgResult};
use crate::hash::{eg_h, HValue};

/// How many selections a voter may mark, and how a marked selection
/// counts, for a given contest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteVariation {
    /// Exactly one selection may be marked.
    OneOfM,
    /// Up to `votes_allowed` selections may be marked, each counting as
    /// one vote toward its own tally.
    NOfM,
    /// Every selection is voted on independently (yes/no per
    /// candidate); `votes_allowed` is not used for this variation.
    Approval,
}

impl VoteVariation {
    fn tag(&self) -> u8 {
        match self {
            VoteVariation::OneOfM => 0,
            VoteVariation::NOfM => 1,
            VoteVariation::Approval => 2,
        }
    }
}

/// One candidate choice within a contest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionDefinition {
    pub object_id: String,
    pub candidate_id: String,
    pub sequence_order: u32,
}

impl CanonicalEncode for SelectionDefinition {
    fn canonical_encode(&self, enc: &mut CanonicalEncoder) {
        enc.put_str(&self.object_id);
        enc.put_str(&self.candidate_id);
        enc.put_u32(self.sequence_order);
    }
}

/// A contest and the selections a voter may choose among.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestDefinition {
    pub object_id: String,
    pub sequence_order: u32,
    pub vote_variation: VoteVariation,
    /// The maximum number of selections that may be marked (the
    /// contest's `L`, used as the inclusive limit in its
    /// [`crate::nizk::RangeProof`]). For [`VoteVariation::Approval`]
    /// this is always `1` per selection rather than across the contest.
    pub votes_allowed: u32,
    pub selections: Vec<SelectionDefinition>,
}

impl CanonicalEncode for ContestDefinition {
    fn canonical_encode(&self, enc: &mut CanonicalEncoder) {
        enc.put_str(&self.object_id);
        enc.put_u32(self.sequence_order);
        enc.put_uint_fixed_width(self.vote_variation.tag() as u64, 1);
        enc.put_u32(self.votes_allowed);
        enc.put_seq(&self.selections, |e, s| s.canonical_encode(e));
    }
}

impl ContestDefinition {
    /// Placeholder selections are appended at encryption time so the
    /// disjunctive sum proof can certify the *total* marked count
    /// equals `votes_allowed` exactly, not merely that it is within
    /// bounds; this returns how many are needed.
    pub fn placeholder_count(&self) -> u32 {
        match self.vote_variation {
            VoteVariation::Approval => 0,
            VoteVariation::OneOfM | VoteVariation::NOfM => self.votes_allowed,
        }
    }
}

/// A named candidate, referenced by id from [`SelectionDefinition`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub object_id: String,
    pub name: String,
}

/// A named grouping of contests presented together to a class of
/// voters (e.g. a precinct's ballot).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotStyle {
    pub object_id: String,
    pub contest_ids: Vec<String>,
}

impl CanonicalEncode for BallotStyle {
    fn canonical_encode(&self, enc: &mut CanonicalEncoder) {
        enc.put_str(&self.object_id);
        enc.put_seq(&self.contest_ids, |e, id| e.put_str(id));
    }
}

/// The full, validated election definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub election_scope_id: String,
    pub candidates: Vec<Candidate>,
    pub contests: Vec<ContestDefinition>,
    pub ballot_styles: Vec<BallotStyle>,
}

impl CanonicalEncode for Manifest {
    fn canonical_encode(&self, enc: &mut CanonicalEncoder) {
        enc.put_str(&self.election_scope_id);
        enc.put_seq(&self.candidates, |e, c| {
            e.put_str(&c.object_id);
            e.put_str(&c.name);
        });
        enc.put_seq(&self.contests, |e, c| c.canonical_encode(e));
        enc.put_seq(&self.ballot_styles, |e, bs| bs.canonical_encode(e));
    }
}

impl Manifest {
    /// Validates: every object id is unique within its kind, every
    /// selection's `candidate_id` resolves to a declared candidate, and
    /// every ballot style's `contest_ids` resolve to declared contests.
    pub fn validate(&self) -> EgResult<()> {
        let mut candidate_ids = BTreeSet::new();
        for c in &self.candidates {
            if !candidate_ids.insert(c.object_id.as_str()) {
                return Err(EgError::ManifestInvalid(format!(
                    "duplicate candidate id {}",
                    c.object_id
                )));
            }
        }

        let mut contest_ids = BTreeSet::new();
        for contest in &self.contests {
            if !contest_ids.insert(contest.object_id.as_str()) {
                return Err(EgError::ManifestInvalid(format!(
                    "duplicate contest id {}",
                    contest.object_id
                )));
            }
            if contest.selections.is_empty() {
                return Err(EgError::ManifestInvalid(format!(
                    "contest {} declares no selections",
                    contest.object_id
                )));
            }
            match contest.vote_variation {
                VoteVariation::OneOfM if contest.votes_allowed != 1 => {
                    return Err(EgError::ManifestInvalid(format!(
                        "contest {} is one-of-m but votes_allowed != 1",
                        contest.object_id
                    )));
                }
                VoteVariation::NOfM if contest.votes_allowed == 0 => {
                    return Err(EgError::ManifestInvalid(format!(
                        "contest {} allows zero votes",
                        contest.object_id
                    )));
                }
                VoteVariation::NOfM if contest.votes_allowed as usize > contest.selections.len() => {
                    return Err(EgError::ManifestInvalid(format!(
                        "contest {} allows more votes than it has selections",
                        contest.object_id
                    )));
                }
                _ => {}
            }

            let mut selection_ids = BTreeSet::new();
            for selection in &contest.selections {
                if !selection_ids.insert(selection.object_id.as_str()) {
                    return Err(EgError::ManifestInvalid(format!(
                        "duplicate selection id {} in contest {}",
                        selection.object_id, contest.object_id
                    )));
                }
                if !candidate_ids.contains(selection.candidate_id.as_str()) {
                    return Err(EgError::ManifestInvalid(format!(
                        "selection {} references unknown candidate {}",
                        selection.object_id, selection.candidate_id
                    )));
                }
            }
        }

        let mut ballot_style_ids = BTreeSet::new();
        for bs in &self.ballot_styles {
            if !ballot_style_ids.insert(bs.object_id.as_str()) {
                return Err(EgError::ManifestInvalid(format!(
                    "duplicate ballot style id {}",
                    bs.object_id
                )));
            }
            for contest_id in &bs.contest_ids {
                if !contest_ids.contains(contest_id.as_str()) {
                    return Err(EgError::ManifestInvalid(format!(
                        "ballot style {} references unknown contest {}",
                        bs.object_id, contest_id
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn contest(&self, id: &str) -> EgResult<&ContestDefinition> {
        self.contests
            .iter()
            .find(|c| c.object_id == id)
            .ok_or_else(|| EgError::ManifestInvalid(format!("unknown contest {id}")))
    }

    pub fn ballot_style(&self, id: &str) -> EgResult<&BallotStyle> {
        self.ballot_styles
            .iter()
            .find(|bs| bs.object_id == id)
            .ok_or_else(|| EgError::ManifestInvalid(format!("unknown ballot style {id}")))
    }

    /// A lookup table from contest id to contest, built once by callers
    /// that resolve many contests (ballot encryption, tally).
    pub fn contests_by_id(&self) -> HashMap<&str, &ContestDefinition> {
        self.contests.iter().map(|c| (c.object_id.as_str(), c)).collect()
    }

    /// `H(manifest)`, the root hash every other derived hash in this
    /// crate (commitment hash, crypto base hash, crypto extended base
    /// hash) is built on top of.
    pub fn manifest_hash(&self) -> HValue {
        let bytes = crate::canonical::canonical_bytes(self);
        eg_h(0x20, &[crate::hash::HashInput::Bytes(&bytes)])
    }
}
