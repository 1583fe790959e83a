// Copyright (C) 2026 The electionguard-core Authors.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::manual_assert)]

//! The distributed key-generation (DKG) ceremony that turns `n`
//! guardians' individually-generated secret polynomials into a single
//! joint public key, with every guardian holding a Shamir share of the
//! corresponding joint secret.
//!
//! The mediator does not generate, hold, or see any guardian's secret
//! key material; it only relays the public commitments and (out of
//! band, confidentially delivered) Shamir backups, and checks that
//! every exchange is internally consistent. A guardian whose backup or
//! commitment fails verification is excluded with an explicit
//! [`CeremonyError`] rather than silently dropped: there is no such
//! thing as a partially-formed joint key in this crate's output.

use std::collections::{BTreeMap, BTreeSet};

use util::algebra::{FieldElement, Group, GroupElement, ScalarField};
use util::csrng::Csrng;

use crate::el_gamal::ElGamalPublicKey;
use crate::guardian::{GuardianIndex, GuardianSet};
use crate::polynomial::{CoefficientCommitments, SecretPolynomial};

#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum CeremonyError {
    #[error("key ceremony is in phase {actual:?}, operation requires {expected:?}")]
    WrongPhase {
        expected: CeremonyPhase,
        actual: CeremonyPhase,
    },

    #[error("guardian {0} submitted a commitment or backup that failed verification and is excluded")]
    GuardianExcluded(GuardianIndex),

    #[error("not every guardian has announced")]
    IncompleteAnnouncements,

    #[error("not every required backup has been exchanged")]
    IncompleteBackups,
}

pub type CeremonyResult<T> = Result<T, CeremonyError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CeremonyPhase {
    Init,
    Announced,
    BackupsShared,
    BackupsVerified,
    Published,
}

/// A guardian's own secret state during the ceremony: its sampled
/// polynomial. Never held by [`KeyCeremonyMediator`], only by the
/// guardian itself; a caller orchestrating an in-process simulation
/// (tests, `eg-demo`) keeps one of these per guardian.
pub struct GuardianSecretState {
    pub index: GuardianIndex,
    pub polynomial: SecretPolynomial,
}

impl GuardianSecretState {
    pub fn generate(index: GuardianIndex, k: u32, field: &ScalarField, csrng: &dyn Csrng) -> Self {
        // `SecretPolynomial::generate` only fails for k == 0, which a
        // `GuardianSet` with quorum >= 1 never produces.
        let polynomial = SecretPolynomial::generate(k, field, csrng)
            .unwrap_or_else(|_| SecretPolynomial { coefficients: vec![field.random_field_elem(csrng)] });
        GuardianSecretState { index, polynomial }
    }

    pub fn commit(
        &self,
        group: &Group,
        field: &ScalarField,
        csrng: &dyn Csrng,
    ) -> CoefficientCommitments {
        self.polynomial.commit(group, field, csrng)
    }

    /// The Shamir backup this guardian sends to `recipient`:
    /// `P(recipient.sequence_order)`. In a real deployment this value
    /// is wrapped under `recipient`'s credential key before transport;
    /// that wrapping is outside this crate's scope and is the caller's
    /// responsibility.
    pub fn backup_for(&self, recipient: GuardianIndex, field: &ScalarField) -> FieldElement {
        let x = FieldElement::from_u64(u64::from(recipient.get()), field);
        self.polynomial.evaluate(&x, field)
    }
}

/// Coordinates the announce / exchange-backups / verify / publish
/// rounds across a fixed [`GuardianSet`]. Holds only public information.
pub struct KeyCeremonyMediator {
    guardians: GuardianSet,
    phase: CeremonyPhase,
    announcements: BTreeMap<GuardianIndex, CoefficientCommitments>,
    backups: BTreeMap<(GuardianIndex, GuardianIndex), FieldElement>,
    verified_backups: BTreeSet<(GuardianIndex, GuardianIndex)>,
    excluded: BTreeSet<GuardianIndex>,
}

impl KeyCeremonyMediator {
    pub fn new(guardians: GuardianSet) -> Self {
        KeyCeremonyMediator {
            guardians,
            phase: CeremonyPhase::Init,
            announcements: BTreeMap::new(),
            backups: BTreeMap::new(),
            verified_backups: BTreeSet::new(),
            excluded: BTreeSet::new(),
        }
    }

    fn require_phase(&self, expected: CeremonyPhase) -> CeremonyResult<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(CeremonyError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    /// Round 1: every guardian publishes its coefficient commitments.
    /// Each commitment's embedded Schnorr proofs are checked immediately
    /// (spec-level "verify on receipt", not deferred to combine time).
    pub fn receive_announcement(
        &mut self,
        guardian: GuardianIndex,
        commitments: CoefficientCommitments,
        group: &Group,
        field: &ScalarField,
    ) -> CeremonyResult<()> {
        if matches!(self.phase, CeremonyPhase::Init | CeremonyPhase::Announced) {
            self.guardians
                .find(guardian)
                .map_err(|_| CeremonyError::GuardianExcluded(guardian))?;
            if commitments.verify(group, field).is_err() {
                self.excluded.insert(guardian);
                return Err(CeremonyError::GuardianExcluded(guardian));
            }
            self.announcements.insert(guardian, commitments);
            self.phase = CeremonyPhase::Announced;
            Ok(())
        } else {
            Err(CeremonyError::WrongPhase {
                expected: CeremonyPhase::Announced,
                actual: self.phase,
            })
        }
    }

    /// `true` once every non-excluded guardian in the set has announced.
    pub fn all_announced(&self) -> bool {
        self.guardians
            .guardians
            .iter()
            .all(|g| self.excluded.contains(&g.sequence_order) || self.announcements.contains_key(&g.sequence_order))
    }

    /// Round 2: records a Shamir backup sent from `sender` to
    /// `recipient`, after the recipient (or, on its behalf, the
    /// mediator acting as a trusted relay in this in-process
    /// simulation) has checked it against `sender`'s published
    /// commitments.
    pub fn receive_backup(
        &mut self,
        sender: GuardianIndex,
        recipient: GuardianIndex,
        value: FieldElement,
        group: &Group,
        field: &ScalarField,
    ) -> CeremonyResult<()> {
        self.require_phase_in(&[CeremonyPhase::Announced, CeremonyPhase::BackupsShared])?;
        let sender_commitments = self
            .announcements
            .get(&sender)
            .ok_or(CeremonyError::GuardianExcluded(sender))?;
        let x = FieldElement::from_u64(u64::from(recipient.get()), field);
        if sender_commitments
            .verify_evaluation(&x, &value, group, field)
            .is_err()
        {
            self.excluded.insert(sender);
            return Err(CeremonyError::GuardianExcluded(sender));
        }
        self.backups.insert((sender, recipient), value);
        self.verified_backups.insert((sender, recipient));
        self.phase = CeremonyPhase::BackupsShared;
        Ok(())
    }

    fn require_phase_in(&self, allowed: &[CeremonyPhase]) -> CeremonyResult<()> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(CeremonyError::WrongPhase {
                expected: allowed[0],
                actual: self.phase,
            })
        }
    }

    /// `true` once every ordered pair of non-excluded guardians has an
    /// exchanged, verified backup.
    pub fn all_backups_verified(&self) -> bool {
        let present: Vec<&GuardianIndex> = self
            .guardians
            .guardians
            .iter()
            .map(|g| &g.sequence_order)
            .filter(|idx| !self.excluded.contains(idx))
            .collect();
        present.iter().all(|&&sender| {
            present
                .iter()
                .all(|&&recipient| self.verified_backups.contains(&(sender, recipient)))
        })
    }

    pub fn advance_to_backups_verified(&mut self) -> CeremonyResult<()> {
        self.require_phase(CeremonyPhase::BackupsShared)?;
        if !self.all_backups_verified() {
            return Err(CeremonyError::IncompleteBackups);
        }
        self.phase = CeremonyPhase::BackupsVerified;
        Ok(())
    }

    /// Round 3: combines every guardian's constant-term commitment into
    /// the joint public key `K = prod_i g^{a_{i,0}} = g^{sum_i a_{i,0}}`.
    pub fn publish(&mut self, group: &Group) -> CeremonyResult<ElGamalPublicKey> {
        self.require_phase(CeremonyPhase::BackupsVerified)?;
        if !self.all_announced() {
            return Err(CeremonyError::IncompleteAnnouncements);
        }
        let mut joint: GroupElement = Group::one();
        for g in &self.guardians.guardians {
            if self.excluded.contains(&g.sequence_order) {
                return Err(CeremonyError::GuardianExcluded(g.sequence_order));
            }
            let commitments = self
                .announcements
                .get(&g.sequence_order)
                .ok_or(CeremonyError::GuardianExcluded(g.sequence_order))?;
            let public = commitments
                .public_key()
                .map_err(|_| CeremonyError::GuardianExcluded(g.sequence_order))?;
            joint = joint.mul(public, group);
        }
        self.phase = CeremonyPhase::Published;
        Ok(ElGamalPublicKey(joint))
    }

    pub fn phase(&self) -> CeremonyPhase {
        self.phase
    }

    pub fn excluded_guardians(&self) -> &BTreeSet<GuardianIndex> {
        &self.excluded
    }

    pub fn guardian_count(&self) -> u32 {
        self.guardians.n()
    }

    pub fn quorum(&self) -> u32 {
        self.guardians.quorum
    }
}
