// Copyright (C) 2026 The electionguard-core Authors.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::manual_assert)]

//! Threshold decryption of a [`crate::tally::CiphertextTally`].
//!
//! Every present guardian `i` holds `s_i`, its accumulated Shamir share
//! of the joint secret (the sum, over every guardian `j`, of the backup
//! `P_j(i)` it received during the key ceremony). `s_i` is itself a
//! point on the degree-`(k-1)` aggregate polynomial `P(x) = sum_j
//! P_j(x)`, whose value at `0` is the joint secret `x`. Any `quorum`
//! guardians' shares therefore reconstruct the decryption factor
//! `alpha^x` via Lagrange interpolation at zero
//! ([`crate::polynomial::lagrange_coefficient_at_zero`]) — this is the
//! whole point of a threshold scheme: the guardians who happen to be
//! missing never need to contribute anything for decryption to
//! succeed, so long as `quorum` others show up.
//!
//! A guardian that does not show up is still recorded in the
//! [`DecryptionVerificationBlock`] as [`GuardianDecryptionStatus::MissingCompensated`],
//! and, when enough present guardians hold a Shamir backup *from* it,
//! its published commitment can be independently cross-checked via
//! [`reconstruct_missing_constant_term`] — an audit reconciliation, not
//! an input to the decryption arithmetic above.
//!
//! Alongside that shortcut, this module also implements the literal
//! three-operation decryption interface of spec §4.10/§6.1 —
//! `partial_decrypt` ([`PartialDecryptionShare::compute`]),
//! `compensated_decrypt` ([`compensated_decrypt`]), and `combine`
//! ([`combine`]) — built directly on each guardian's own secret key
//! share `a_{i,0}` rather than the accumulated `s_i`. Under this model
//! every one of the `n` guardians contributes a term to the decryption
//! factor, present guardians directly and missing ones through
//! [`reconstruct_missing_share`]'s Lagrange interpolation over a
//! quorum of other guardians' compensation shares.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use util::algebra::{FieldElement, Group, GroupElement, ScalarField};
use util::csrng::Csrng;

use crate::el_gamal::{Ciphertext, ElGamalPublicKey, ElGamalSecretKey};
use crate::errors::{EgError, EgResult};
use crate::fixed_parameters::FixedParameters;
use crate::guardian::GuardianIndex;
use crate::nizk::DecryptionShareProof;
use crate::polynomial::{lagrange_coefficient_at_zero, CoefficientCommitments};
use crate::tally::CiphertextTally;

/// A single guardian's partial decryption of one ciphertext, plus the
/// Chaum-Pedersen proof that it was computed honestly from `s_i`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptionShare {
    pub guardian: GuardianIndex,
    pub share: GroupElement,
    pub proof: DecryptionShareProof,
}

/// `g^{P(x)}`, the guardian's public decryption-share key, derived
/// purely from every guardian's published coefficient commitments
/// (spec-level: no secret material is needed to check a share's proof).
fn public_share_of(
    guardian: GuardianIndex,
    all_commitments: &[(GuardianIndex, CoefficientCommitments)],
    group: &Group,
    field: &ScalarField,
) -> GroupElement {
    let x = FieldElement::from_u64(u64::from(guardian.get()), field);
    let mut acc = Group::one();
    for (_, commitments) in all_commitments {
        acc = acc.mul(&commitments.public_at(&x, group, field), group);
    }
    acc
}

impl DecryptionShare {
    /// Computes guardian `guardian`'s share of decrypting `ciphertext`,
    /// given its accumulated secret `s_i`.
    pub fn compute(
        guardian: GuardianIndex,
        s_i: &FieldElement,
        ciphertext: &Ciphertext,
        all_commitments: &[(GuardianIndex, CoefficientCommitments)],
        group: &Group,
        field: &ScalarField,
        csrng: &dyn Csrng,
    ) -> Self {
        let public_share = public_share_of(guardian, all_commitments, group, field);
        let secret_key = ElGamalSecretKey(s_i.clone());
        let public_key = ElGamalPublicKey(public_share);
        let share = ciphertext.alpha.exp(s_i, group);
        let proof = DecryptionShareProof::prove(&secret_key, &public_key, ciphertext, &share, group, field, csrng);
        DecryptionShare {
            guardian,
            share,
            proof,
        }
    }

    pub fn verify(
        &self,
        ciphertext: &Ciphertext,
        all_commitments: &[(GuardianIndex, CoefficientCommitments)],
        group: &Group,
        field: &ScalarField,
    ) -> EgResult<()> {
        let public_share = public_share_of(self.guardian, all_commitments, group, field);
        self.proof
            .verify(&ElGamalPublicKey(public_share), ciphertext, &self.share, group, field)
    }
}

/// Combines `quorum` or more guardians' shares of `ciphertext` into the
/// full decryption factor `alpha^x`, via Lagrange interpolation at
/// zero over exactly the guardian indices present in `shares`.
pub fn combine_shares(shares: &[DecryptionShare], quorum: u32, field: &ScalarField, group: &Group) -> EgResult<GroupElement> {
    if shares.len() < quorum as usize {
        return Err(EgError::InsufficientQuorum {
            needed: quorum,
            have: shares.len() as u32,
        });
    }
    let present: Vec<GuardianIndex> = shares.iter().map(|s| s.guardian).collect();
    let mut acc = Group::one();
    for share in shares {
        let w = lagrange_coefficient_at_zero(share.guardian, &present, field)?;
        acc = acc.mul(&share.share.exp(&w, group), group);
    }
    Ok(acc)
}

/// Decrypts one ciphertext given `quorum`-or-more shares. `bound` is
/// the inclusive upper bound the discrete-log search is run over; for
/// a tally selection this is the number of cast ballots (no selection
/// can ever exceed it).
pub fn decrypt_with_shares(
    ciphertext: &Ciphertext,
    shares: &[DecryptionShare],
    quorum: u32,
    bound: u64,
    fixed_parameters: &FixedParameters,
) -> EgResult<u64> {
    let m_factor = combine_shares(shares, quorum, &fixed_parameters.field, &fixed_parameters.group)?;
    ciphertext.decrypt_known_product(&m_factor, fixed_parameters, bound)
}

/// Reconstructs a missing guardian's own polynomial constant term
/// `a_{m,0}` from `quorum`-or-more backups `P_m(j)` held by present
/// guardians (the value guardian `m` handed each of them during the key
/// ceremony). An audit reconciliation: compares against `m`'s already
/// published commitment, it is never an input to [`combine_shares`].
pub fn reconstruct_missing_constant_term(
    compensating_backups: &[(GuardianIndex, FieldElement)],
    field: &ScalarField,
) -> EgResult<FieldElement> {
    let present: Vec<GuardianIndex> = compensating_backups.iter().map(|(idx, _)| *idx).collect();
    let mut acc = ScalarField::zero();
    for (idx, value) in compensating_backups {
        let w = lagrange_coefficient_at_zero(*idx, &present, field)?;
        acc = acc.add(&w.mul(value, field), field);
    }
    Ok(acc)
}

/// Cross-checks a reconstructed constant term against the missing
/// guardian's published commitment.
pub fn verify_missing_guardian_commitment(
    missing_commitments: &CoefficientCommitments,
    compensating_backups: &[(GuardianIndex, FieldElement)],
    group: &Group,
    field: &ScalarField,
) -> EgResult<()> {
    let reconstructed = reconstruct_missing_constant_term(compensating_backups, field)?;
    let expected = missing_commitments.public_key()?;
    if group.g_exp(&reconstructed) == *expected {
        Ok(())
    } else {
        Err(EgError::ProofInvalid(
            "reconstructed constant term does not match the missing guardian's published commitment".into(),
        ))
    }
}

/// A present guardian's decryption contribution computed directly from
/// its own secret key share `a_{i,0}` (the constant term of its ceremony
/// polynomial), rather than the accumulated `s_i` used by
/// [`DecryptionShare`]. This is the per-guardian share consumed by
/// [`combine`], the literal spec §4.10/§6.1 reconstruction in which
/// every one of the `n` guardians — present or, via
/// [`compensated_decrypt`] and [`reconstruct_missing_share`], absent —
/// must contribute a term, as distinct from [`combine_shares`]'s
/// present-subset Lagrange shortcut over the accumulated aggregate
/// polynomial.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialDecryptionShare {
    pub guardian: GuardianIndex,
    pub share: GroupElement,
    pub proof: DecryptionShareProof,
}

impl PartialDecryptionShare {
    /// `alpha^{a_{i,0}}`, proven against `guardian`'s own published
    /// public key `K_i = g^{a_{i,0}}`.
    pub fn compute(
        guardian: GuardianIndex,
        a_i0: &FieldElement,
        own_commitments: &CoefficientCommitments,
        ciphertext: &Ciphertext,
        group: &Group,
        field: &ScalarField,
        csrng: &dyn Csrng,
    ) -> EgResult<Self> {
        let public_key = own_commitments.public_key()?.clone();
        let secret_key = ElGamalSecretKey(a_i0.clone());
        let share = ciphertext.alpha.exp(a_i0, group);
        let proof = DecryptionShareProof::prove(
            &secret_key,
            &ElGamalPublicKey(public_key),
            ciphertext,
            &share,
            group,
            field,
            csrng,
        );
        Ok(PartialDecryptionShare { guardian, share, proof })
    }

    pub fn verify(
        &self,
        own_commitments: &CoefficientCommitments,
        ciphertext: &Ciphertext,
        group: &Group,
        field: &ScalarField,
    ) -> EgResult<()> {
        let public_key = own_commitments.public_key()?.clone();
        self.proof
            .verify(&ElGamalPublicKey(public_key), ciphertext, &self.share, group, field)
    }
}

/// A present guardian `compensator`'s stand-in contribution on behalf
/// of a missing guardian `missing_guardian`: `alpha^{P_missing(compensator)}`,
/// computed from the Shamir backup `compensator` received from
/// `missing_guardian` during the key ceremony (the recipient's copy of
/// [`crate::key_ceremony::GuardianSecretState::backup_for`], sender =
/// `missing_guardian`). Carries a proof tying the share to
/// `missing_guardian`'s published per-coefficient commitments evaluated
/// at `compensator`'s sequence order, so it can be checked without the
/// verifier learning anything about the backup itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensatedShare {
    pub compensator: GuardianIndex,
    pub missing_guardian: GuardianIndex,
    pub share: GroupElement,
    pub proof: DecryptionShareProof,
}

/// Computes `compensator`'s compensation share for `missing_guardian`
/// on `ciphertext`, given the Shamir backup `P_missing(compensator)` it
/// holds from the key ceremony.
pub fn compensated_decrypt(
    compensator: GuardianIndex,
    missing_guardian: GuardianIndex,
    backup_from_missing: &FieldElement,
    missing_commitments: &CoefficientCommitments,
    ciphertext: &Ciphertext,
    group: &Group,
    field: &ScalarField,
    csrng: &dyn Csrng,
) -> CompensatedShare {
    let x = FieldElement::from_u64(u64::from(compensator.get()), field);
    let public_at_x = missing_commitments.public_at(&x, group, field);
    let secret_key = ElGamalSecretKey(backup_from_missing.clone());
    let share = ciphertext.alpha.exp(backup_from_missing, group);
    let proof = DecryptionShareProof::prove(
        &secret_key,
        &ElGamalPublicKey(public_at_x),
        ciphertext,
        &share,
        group,
        field,
        csrng,
    );
    CompensatedShare {
        compensator,
        missing_guardian,
        share,
        proof,
    }
}

impl CompensatedShare {
    pub fn verify(
        &self,
        missing_commitments: &CoefficientCommitments,
        ciphertext: &Ciphertext,
        group: &Group,
        field: &ScalarField,
    ) -> EgResult<()> {
        let x = FieldElement::from_u64(u64::from(self.compensator.get()), field);
        let public_at_x = missing_commitments.public_at(&x, group, field);
        self.proof
            .verify(&ElGamalPublicKey(public_at_x), ciphertext, &self.share, group, field)
    }
}

/// Lagrange-interpolates a quorum of [`CompensatedShare`]s for the same
/// missing guardian at `x = 0`, reconstructing `alpha^{a_{i,0}}` — that
/// guardian's own decryption contribution, as if it had run
/// [`PartialDecryptionShare::compute`] itself (spec §4.10 step 3).
pub fn reconstruct_missing_share(
    compensated_shares: &[CompensatedShare],
    field: &ScalarField,
    group: &Group,
) -> EgResult<GroupElement> {
    let missing_guardian = compensated_shares
        .first()
        .map(|c| c.missing_guardian)
        .ok_or_else(|| EgError::StateConflict("no compensated shares supplied".into()))?;
    if compensated_shares
        .iter()
        .any(|c| c.missing_guardian != missing_guardian)
    {
        return Err(EgError::StateConflict(
            "compensated shares mix contributions for different missing guardians".into(),
        ));
    }
    let present: Vec<GuardianIndex> = compensated_shares.iter().map(|c| c.compensator).collect();
    let mut acc = Group::one();
    for c in compensated_shares {
        let w = lagrange_coefficient_at_zero(c.compensator, &present, field)?;
        acc = acc.mul(&c.share.exp(&w, group), group);
    }
    Ok(acc)
}

/// Combines every present guardian's own [`PartialDecryptionShare`]
/// together with every missing guardian's Lagrange-reconstructed
/// contribution (from [`reconstruct_missing_share`]) into the full
/// decryption factor `alpha^x = prod_i alpha^{a_{i,0}}`. Requires
/// exactly one contribution — direct or reconstructed — per guardian in
/// `all_guardians`; unlike [`combine_shares`], a guardian that
/// contributes neither is a [`EgError::StateConflict`], since each term
/// here is that guardian's own secret and cannot be supplied by anyone
/// else's accumulated share.
pub fn combine(
    available: &[PartialDecryptionShare],
    reconstructed_missing: &[(GuardianIndex, GroupElement)],
    all_guardians: &[GuardianIndex],
    group: &Group,
) -> EgResult<GroupElement> {
    let mut acc = Group::one();
    let mut seen: BTreeMap<GuardianIndex, ()> = BTreeMap::new();
    for share in available {
        if seen.insert(share.guardian, ()).is_some() {
            return Err(EgError::StateConflict(format!(
                "guardian {} contributed more than one partial decryption share",
                share.guardian
            )));
        }
        acc = acc.mul(&share.share, group);
    }
    for (guardian, value) in reconstructed_missing {
        if seen.insert(*guardian, ()).is_some() {
            return Err(EgError::StateConflict(format!(
                "guardian {guardian} is both present and reconstructed as missing"
            )));
        }
        acc = acc.mul(value, group);
    }
    for guardian in all_guardians {
        if !seen.contains_key(guardian) {
            return Err(EgError::StateConflict(format!(
                "guardian {guardian} contributed neither a partial share nor a compensated reconstruction"
            )));
        }
    }
    Ok(acc)
}

/// Whether a guardian contributed its share directly, or was absent and
/// (if enough backups were available) had its commitment audited by
/// compensation instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuardianDecryptionStatus {
    Available,
    MissingCompensated,
}

/// The per-guardian accounting record for one decryption session:
/// which guardians actually participated, and which were compensated
/// for. Published alongside the decrypted tally for audit.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DecryptionVerificationBlock {
    pub statuses: BTreeMap<GuardianIndex, GuardianDecryptionStatus>,
}

impl DecryptionVerificationBlock {
    pub fn new() -> Self {
        DecryptionVerificationBlock {
            statuses: BTreeMap::new(),
        }
    }

    pub fn record_available(&mut self, guardian: GuardianIndex) {
        self.statuses.insert(guardian, GuardianDecryptionStatus::Available);
    }

    pub fn record_missing_compensated(&mut self, guardian: GuardianIndex) {
        self.statuses
            .insert(guardian, GuardianDecryptionStatus::MissingCompensated);
    }

    pub fn available_count(&self) -> u32 {
        self.statuses
            .values()
            .filter(|s| matches!(s, GuardianDecryptionStatus::Available))
            .count() as u32
    }
}

/// Decrypts every selection in `tally`, given each available guardian's
/// shares, keyed by `(contest_id, selection_object_id)`.
pub fn decrypt_tally(
    tally: &CiphertextTally,
    shares_by_selection: &BTreeMap<(String, String), Vec<DecryptionShare>>,
    quorum: u32,
    fixed_parameters: &FixedParameters,
) -> EgResult<BTreeMap<(String, String), u64>> {
    let bound = tally.num_cast() as u64;
    let mut results = BTreeMap::new();
    for key in tally.totals.keys() {
        let ciphertext = tally.selection_total(&key.0, &key.1)?;
        let shares = shares_by_selection.get(key).ok_or_else(|| {
            EgError::StateConflict(format!(
                "no decryption shares supplied for selection {} in contest {}",
                key.1, key.0
            ))
        })?;
        let count = decrypt_with_shares(ciphertext, shares, quorum, bound, fixed_parameters)?;
        results.insert(key.clone(), count);
    }
    Ok(results)
}
