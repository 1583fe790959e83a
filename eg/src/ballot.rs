// Copyright (C) 2026 The electionguard-core Authors.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::manual_assert)]

//! Per-ballot encryption: turns a voter's plaintext choices into an
//! [`CiphertextBallot`] with, per contest, placeholder-expanded
//! selections, a 0/1 proof on every selection, and a range proof that
//! the contest's accumulated total equals its vote limit.
//!
//! All randomness used for nonces is derived deterministically from a
//! single ballot nonce `ν_b` via [`crate::hash::eg_h_q`] (spec §4.8); the
//! only place true randomness enters is the Fiat-Shamir commitment in
//! each proof, drawn from the caller-supplied [`Csrng`]. Given the same
//! `(plaintext, ν_b, context)` and a `Csrng` that replays the same
//! stream (a freshly-seeded [`util::csrng::DeterministicCsrng`]),
//! encryption is byte-for-byte reproducible (spec §8 property 7).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use util::algebra::{FieldElement, Group, ScalarField};
use util::csrng::Csrng;

use crate::context::Context;
use crate::el_gamal::{Ciphertext, ElGamalPublicKey};
use crate::errors::{EgError, EgResult};
use crate::fixed_parameters::FixedParameters;
use crate::hash::{eg_h, eg_h_q, HValue, HashInput};
use crate::manifest::{Manifest, SelectionDefinition, VoteVariation};
use crate::nizk::RangeProof;

mod domain {
    pub const CONTEST_NONCE: u8 = 0x30;
    pub const SELECTION_NONCE: u8 = 0x31;
    pub const SELECTION_HASH: u8 = 0x32;
    pub const CONTEST_HASH: u8 = 0x33;
    pub const BALLOT_HASH: u8 = 0x34;
}

/// A voter's mark on one selection: `0` or `1`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaintextSelection {
    pub object_id: String,
    pub vote: u8,
}

/// A voter's marks across one contest's declared selections. Selections
/// left unmarked need not appear; [`encrypt_ballot`] treats any
/// selection absent from this list as `vote: 0`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaintextContest {
    pub contest_id: String,
    pub selections: Vec<PlaintextSelection>,
}

/// A complete voter ballot, prior to encryption.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaintextBallot {
    pub ballot_id: String,
    pub style_id: String,
    pub contests: Vec<PlaintextContest>,
}

impl PlaintextBallot {
    /// Checks this ballot conforms to `manifest`'s declared ballot
    /// style: every contest on the ballot belongs to the style, every
    /// selection resolves, no duplicates, and every contest's vote count
    /// respects its `vote_variation`/`votes_allowed`.
    pub fn validate(&self, manifest: &Manifest) -> EgResult<()> {
        let style = manifest.ballot_style(&self.style_id)?;
        let mut seen_contests = BTreeSet::new();
        for contest in &self.contests {
            if !style.contest_ids.iter().any(|id| id == &contest.contest_id) {
                return Err(EgError::ManifestInvalid(format!(
                    "contest {} is not part of ballot style {}",
                    contest.contest_id, self.style_id
                )));
            }
            if !seen_contests.insert(contest.contest_id.clone()) {
                return Err(EgError::ManifestInvalid(format!(
                    "duplicate contest {} on ballot",
                    contest.contest_id
                )));
            }
            let def = manifest.contest(&contest.contest_id)?;

            let mut seen_selections = BTreeSet::new();
            let mut total: u32 = 0;
            for selection in &contest.selections {
                if selection.vote > 1 {
                    return Err(EgError::ManifestInvalid(format!(
                        "selection {} carries a non-binary vote {}",
                        selection.object_id, selection.vote
                    )));
                }
                if !def
                    .selections
                    .iter()
                    .any(|s| s.object_id == selection.object_id)
                {
                    return Err(EgError::ManifestInvalid(format!(
                        "selection {} does not exist in contest {}",
                        selection.object_id, contest.contest_id
                    )));
                }
                if !seen_selections.insert(selection.object_id.clone()) {
                    return Err(EgError::ManifestInvalid(format!(
                        "duplicate selection {} in contest {}",
                        selection.object_id, contest.contest_id
                    )));
                }
                total += u32::from(selection.vote);
            }

            match def.vote_variation {
                VoteVariation::Approval => {}
                VoteVariation::OneOfM | VoteVariation::NOfM => {
                    if total > def.votes_allowed {
                        return Err(EgError::ManifestInvalid(format!(
                            "contest {} marks {} selections, exceeding its limit of {}",
                            contest.contest_id, total, def.votes_allowed
                        )));
                    }
                }
            }
        }
        if seen_contests.len() != style.contest_ids.len() {
            return Err(EgError::ManifestInvalid(format!(
                "ballot style {} requires every one of its contests to be present",
                self.style_id
            )));
        }
        Ok(())
    }
}

/// One (possibly placeholder) selection's ciphertext, its 0/1 proof, and
/// the nonce it was encrypted with. `nonce` is `Some` until
/// [`crate::sanitize::sanitize`] strips it from a cast ballot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedSelection {
    pub object_id: String,
    pub ciphertext: Ciphertext,
    pub proof: RangeProof,
    pub selection_hash: HValue,
    pub nonce: Option<FieldElement>,
}

/// One contest's full ciphertext: every (real + placeholder) selection,
/// their homomorphic sum, and a range proof that the sum equals the
/// contest's vote limit. `range_proof` is `None` for
/// [`VoteVariation::Approval`], whose selections have no contest-wide
/// limit to prove.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedContest {
    pub contest_id: String,
    pub selections: Vec<EncryptedSelection>,
    pub encrypted_total: Ciphertext,
    pub range_proof: Option<RangeProof>,
    /// The contest's vote limit `L`, carried alongside `range_proof` so
    /// verification doesn't require a manifest lookup.
    pub votes_allowed: Option<u64>,
    pub contest_hash: HValue,
    pub nonce: Option<FieldElement>,
}

/// A fully encrypted ballot, still carrying every nonce. This is the
/// "with nonces" artifact of spec §6.1's `encrypt_ballot` operation;
/// [`crate::sanitize::sanitize`] produces the publication copy from it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiphertextBallot {
    pub ballot_id: String,
    pub style_id: String,
    pub contests: Vec<EncryptedContest>,
    pub crypto_hash: HValue,
    pub nonce: Option<FieldElement>,
}

fn derive_contest_nonce(
    context: &Context,
    contest_id: &str,
    ballot_nonce: &FieldElement,
    field: &ScalarField,
) -> FieldElement {
    eg_h_q(
        domain::CONTEST_NONCE,
        &[
            HashInput::HValue(&context.crypto_extended_base_hash),
            HashInput::Bytes(contest_id.as_bytes()),
            HashInput::Field(ballot_nonce, field),
        ],
        field,
    )
}

fn derive_selection_nonce(
    contest_nonce: &FieldElement,
    sequence: u32,
    field: &ScalarField,
) -> FieldElement {
    eg_h_q(
        domain::SELECTION_NONCE,
        &[
            HashInput::Field(contest_nonce, field),
            HashInput::Bytes(&sequence.to_be_bytes()),
        ],
        field,
    )
}

#[allow(clippy::too_many_arguments)]
fn encrypt_one_selection(
    object_id: &str,
    vote: u64,
    sequence: u32,
    contest_nonce: &FieldElement,
    context: &Context,
    fixed_parameters: &FixedParameters,
    csrng: &dyn Csrng,
) -> EgResult<(EncryptedSelection, FieldElement)> {
    let group = &fixed_parameters.group;
    let field = &fixed_parameters.field;
    let pub_key = &context.joint_public_key;

    let nonce = derive_selection_nonce(contest_nonce, sequence, field);
    let ciphertext = Ciphertext::encrypt(vote, &nonce, pub_key, fixed_parameters);
    let proof = RangeProof::prove(vote, &nonce, pub_key, &ciphertext, 1, group, field, csrng)?;
    let selection_hash = eg_h(
        domain::SELECTION_HASH,
        &[
            HashInput::HValue(&context.crypto_extended_base_hash),
            HashInput::Bytes(object_id.as_bytes()),
            HashInput::Group(&ciphertext.alpha, group),
            HashInput::Group(&ciphertext.beta, group),
        ],
    );
    Ok((
        EncryptedSelection {
            object_id: object_id.to_string(),
            ciphertext,
            proof,
            selection_hash,
            nonce: Some(nonce.clone()),
        },
        nonce,
    ))
}

/// Encrypts `plaintext` against `manifest`/`context`, deriving every
/// nonce from `ballot_nonce` per spec §4.8. `csrng` supplies the
/// Fiat-Shamir commitment randomness for each proof; pass a freshly
/// seeded [`util::csrng::DeterministicCsrng`] for reproducible test
/// vectors, or [`util::csrng::OsCsrng`] otherwise.
pub fn encrypt_ballot(
    plaintext: &PlaintextBallot,
    manifest: &Manifest,
    context: &Context,
    fixed_parameters: &FixedParameters,
    ballot_nonce: FieldElement,
    csrng: &dyn Csrng,
) -> EgResult<CiphertextBallot> {
    plaintext.validate(manifest)?;

    let group = &fixed_parameters.group;
    let field = &fixed_parameters.field;
    let style = manifest.ballot_style(&plaintext.style_id)?;

    let mut encrypted_contests = Vec::with_capacity(style.contest_ids.len());
    for contest_id in &style.contest_ids {
        let def = manifest.contest(contest_id)?;
        let plaintext_contest = plaintext
            .contests
            .iter()
            .find(|c| &c.contest_id == contest_id);

        let contest_nonce = derive_contest_nonce(context, contest_id, &ballot_nonce, field);

        let mut defs: Vec<&SelectionDefinition> = def.selections.iter().collect();
        defs.sort_by_key(|s| s.sequence_order);

        let mut selections = Vec::with_capacity(defs.len());
        let mut nonces = Vec::with_capacity(defs.len());
        let mut sequence = 0u32;
        let mut marked_total: u32 = 0;

        for sdef in &defs {
            let vote = plaintext_contest
                .and_then(|c| c.selections.iter().find(|s| s.object_id == sdef.object_id))
                .map(|s| u64::from(s.vote))
                .unwrap_or(0);
            marked_total += vote as u32;
            let (encrypted, nonce) = encrypt_one_selection(
                &sdef.object_id,
                vote,
                sequence,
                &contest_nonce,
                context,
                fixed_parameters,
                csrng,
            )?;
            selections.push(encrypted);
            nonces.push(nonce);
            sequence += 1;
        }

        let placeholder_count = def.placeholder_count();
        let placeholder_ones = placeholder_count.saturating_sub(marked_total);
        for i in 0..placeholder_count {
            let vote = u64::from(i < placeholder_ones);
            let object_id = format!("{contest_id}-placeholder-{i}");
            let (encrypted, nonce) = encrypt_one_selection(
                &object_id,
                vote,
                sequence,
                &contest_nonce,
                context,
                fixed_parameters,
                csrng,
            )?;
            selections.push(encrypted);
            nonces.push(nonce);
            sequence += 1;
        }

        let mut encrypted_total = Ciphertext::identity();
        for s in &selections {
            encrypted_total = encrypted_total.add(&s.ciphertext, group);
        }
        let mut total_nonce = ScalarField::zero();
        for n in &nonces {
            total_nonce = total_nonce.add(n, field);
        }

        let range_proof = match def.vote_variation {
            VoteVariation::Approval => None,
            VoteVariation::OneOfM | VoteVariation::NOfM => Some(RangeProof::prove(
                u64::from(def.votes_allowed),
                &total_nonce,
                &context.joint_public_key,
                &encrypted_total,
                u64::from(def.votes_allowed),
                group,
                field,
                csrng,
            )?),
        };

        let contest_hash = eg_h(
            domain::CONTEST_HASH,
            &[
                HashInput::HValue(&context.crypto_extended_base_hash),
                HashInput::Bytes(contest_id.as_bytes()),
                HashInput::Seq(
                    selections
                        .iter()
                        .map(|s| HashInput::HValue(&s.selection_hash))
                        .collect(),
                ),
                HashInput::Group(&encrypted_total.alpha, group),
                HashInput::Group(&encrypted_total.beta, group),
            ],
        );

        let votes_allowed = match def.vote_variation {
            VoteVariation::Approval => None,
            VoteVariation::OneOfM | VoteVariation::NOfM => Some(u64::from(def.votes_allowed)),
        };

        encrypted_contests.push(EncryptedContest {
            contest_id: contest_id.clone(),
            selections,
            encrypted_total,
            range_proof,
            votes_allowed,
            contest_hash,
            nonce: Some(contest_nonce),
        });
    }

    let crypto_hash = eg_h(
        domain::BALLOT_HASH,
        &[
            HashInput::HValue(&context.crypto_extended_base_hash),
            HashInput::Bytes(plaintext.ballot_id.as_bytes()),
            HashInput::Bytes(plaintext.style_id.as_bytes()),
            HashInput::Seq(
                encrypted_contests
                    .iter()
                    .map(|c| HashInput::HValue(&c.contest_hash))
                    .collect(),
            ),
        ],
    );

    Ok(CiphertextBallot {
        ballot_id: plaintext.ballot_id.clone(),
        style_id: plaintext.style_id.clone(),
        contests: encrypted_contests,
        crypto_hash,
        nonce: Some(ballot_nonce),
    })
}

impl CiphertextBallot {
    /// Verifies every selection's 0/1 proof and every contest's range
    /// proof against the stored ciphertexts; used by the tally/ballot
    /// box when admitting a submitted ballot (spec §7: a ballot whose
    /// proof fails is dropped, never admitted with a "best effort" tally).
    pub fn verify_proofs(&self, context: &Context, fixed_parameters: &FixedParameters) -> EgResult<()> {
        let group = &fixed_parameters.group;
        let field = &fixed_parameters.field;
        let pub_key = &context.joint_public_key;
        for contest in &self.contests {
            for selection in &contest.selections {
                selection
                    .proof
                    .verify(pub_key, &selection.ciphertext, 1, group, field)
                    .map_err(|_| {
                        EgError::ProofInvalid(format!(
                            "selection {} in contest {} fails its 0/1 proof",
                            selection.object_id, contest.contest_id
                        ))
                    })?;
            }
            if let (Some(proof), Some(limit)) = (&contest.range_proof, contest.votes_allowed) {
                proof
                    .verify(pub_key, &contest.encrypted_total, limit, group, field)
                    .map_err(|_| {
                        EgError::ProofInvalid(format!(
                            "contest {} fails its range proof",
                            contest.contest_id
                        ))
                    })?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::guardian::{Guardian, GuardianSet};
    use crate::key_ceremony::{GuardianSecretState, KeyCeremonyMediator};
    use crate::manifest::{BallotStyle, Candidate, ContestDefinition, SelectionDefinition};
    use util::csrng::DeterministicCsrng;

    fn two_candidate_manifest() -> Manifest {
        Manifest {
            election_scope_id: "town-2026".into(),
            candidates: vec![
                Candidate {
                    object_id: "alice".into(),
                    name: "Alice".into(),
                },
                Candidate {
                    object_id: "bob".into(),
                    name: "Bob".into(),
                },
            ],
            contests: vec![ContestDefinition {
                object_id: "mayor".into(),
                sequence_order: 0,
                vote_variation: VoteVariation::OneOfM,
                votes_allowed: 1,
                selections: vec![
                    SelectionDefinition {
                        object_id: "mayor-alice".into(),
                        candidate_id: "alice".into(),
                        sequence_order: 0,
                    },
                    SelectionDefinition {
                        object_id: "mayor-bob".into(),
                        candidate_id: "bob".into(),
                        sequence_order: 1,
                    },
                ],
            }],
            ballot_styles: vec![BallotStyle {
                object_id: "default".into(),
                contest_ids: vec!["mayor".into()],
            }],
        }
    }

    fn ceremony_context(seed: &[u8]) -> (FixedParameters, Context, Manifest) {
        let fp = FixedParameters::compact();
        let csrng = DeterministicCsrng::from_seed_bytes(seed);
        let guardians = vec![Guardian::new("g1", 1).unwrap(), Guardian::new("g2", 2).unwrap()];
        let guardian_set = GuardianSet::new(guardians, 2).unwrap();
        let secrets: Vec<GuardianSecretState> = guardian_set
            .guardians
            .iter()
            .map(|g| GuardianSecretState::generate(g.sequence_order, 2, &fp.field, &csrng))
            .collect();
        let mut mediator = KeyCeremonyMediator::new(guardian_set.clone());
        let mut commitments = Vec::new();
        for s in &secrets {
            let c = s.commit(&fp.group, &fp.field, &csrng);
            mediator
                .receive_announcement(s.index, c.clone(), &fp.group, &fp.field)
                .unwrap();
            commitments.push((s.index.get(), c));
        }
        for sender in &secrets {
            for recipient in &secrets {
                let value = sender.backup_for(recipient.index, &fp.field);
                mediator
                    .receive_backup(sender.index, recipient.index, value, &fp.group, &fp.field)
                    .unwrap();
            }
        }
        mediator.advance_to_backups_verified().unwrap();
        let joint_key = mediator.publish(&fp.group).unwrap();
        let manifest = two_candidate_manifest();
        let context = Context::build(&mediator, joint_key, &manifest, &fp, commitments);
        (fp, context, manifest)
    }

    fn ballot_for(choice: &str) -> PlaintextBallot {
        PlaintextBallot {
            ballot_id: format!("ballot-{choice}"),
            style_id: "default".into(),
            contests: vec![PlaintextContest {
                contest_id: "mayor".into(),
                selections: vec![PlaintextSelection {
                    object_id: format!("mayor-{choice}"),
                    vote: 1,
                }],
            }],
        }
    }

    #[test]
    fn encryption_is_deterministic_given_same_nonce_and_csrng_stream() {
        let (fp, context, manifest) = ceremony_context(b"ballot-det");
        let plaintext = ballot_for("alice");
        let csrng1 = DeterministicCsrng::from_seed_bytes(b"ballot-enc-stream");
        let csrng2 = DeterministicCsrng::from_seed_bytes(b"ballot-enc-stream");
        let ballot_nonce = fp.field.random_field_elem(&DeterministicCsrng::from_seed_bytes(b"bn"));

        let b1 = encrypt_ballot(&plaintext, &manifest, &context, &fp, ballot_nonce.clone(), &csrng1).unwrap();
        let b2 = encrypt_ballot(&plaintext, &manifest, &context, &fp, ballot_nonce, &csrng2).unwrap();
        assert_eq!(b1.crypto_hash, b2.crypto_hash);
        assert_eq!(b1, b2);
    }

    #[test]
    fn placeholder_expansion_sums_to_vote_limit() {
        let (fp, context, manifest) = ceremony_context(b"ballot-placeholder");
        let csrng = DeterministicCsrng::from_seed_bytes(b"ballot-enc-placeholder");
        let ballot_nonce = fp.field.random_field_elem(&csrng);
        let plaintext = ballot_for("bob");
        let ballot = encrypt_ballot(&plaintext, &manifest, &context, &fp, ballot_nonce, &csrng).unwrap();

        let contest = &ballot.contests[0];
        // one real candidate marked + one placeholder (votes_allowed == 1)
        assert_eq!(contest.selections.len(), 3);
        assert!(ballot.verify_proofs(&context, &fp).is_ok());
    }

    #[test]
    fn corrupted_selection_proof_fails_verification() {
        let (fp, context, manifest) = ceremony_context(b"ballot-corrupt");
        let csrng = DeterministicCsrng::from_seed_bytes(b"ballot-enc-corrupt");
        let ballot_nonce = fp.field.random_field_elem(&csrng);
        let plaintext = ballot_for("alice");
        let mut ballot = encrypt_ballot(&plaintext, &manifest, &context, &fp, ballot_nonce, &csrng).unwrap();

        // Flip one bit's worth of the first selection's ciphertext.
        ballot.contests[0].selections[0].ciphertext.beta =
            ballot.contests[0].selections[0].ciphertext.beta.mul(&fp.group.generator(), &fp.group);
        assert!(ballot.verify_proofs(&context, &fp).is_err());
    }

    #[test]
    fn ballot_missing_a_required_contest_is_rejected() {
        let (_fp, _context, manifest) = ceremony_context(b"ballot-missing-contest");
        let bad = PlaintextBallot {
            ballot_id: "bad".into(),
            style_id: "default".into(),
            contests: vec![],
        };
        assert!(bad.validate(&manifest).is_err());
    }

    #[test]
    fn contest_exceeding_vote_limit_is_rejected() {
        let (_fp, _context, manifest) = ceremony_context(b"ballot-overvote");
        let bad = PlaintextBallot {
            ballot_id: "bad".into(),
            style_id: "default".into(),
            contests: vec![PlaintextContest {
                contest_id: "mayor".into(),
                selections: vec![
                    PlaintextSelection {
                        object_id: "mayor-alice".into(),
                        vote: 1,
                    },
                    PlaintextSelection {
                        object_id: "mayor-bob".into(),
                        vote: 1,
                    },
                ],
            }],
        };
        assert!(bad.validate(&manifest).is_err());
    }
}
