// Copyright (C) 2026 The electionguard-core Authors.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::manual_assert)]

//! The ballot box: the append-only record of every submitted ballot's
//! disposition. A ballot is submitted exactly once, as either CAST (its
//! selections count toward the tally, nonces are never again needed)
//! or SPOILED (held out of the tally and opened for the Benaloh
//! challenge). Once recorded, a ballot's disposition never changes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ballot::CiphertextBallot;
use crate::context::Context;
use crate::errors::{EgError, EgResult};
use crate::fixed_parameters::FixedParameters;

/// A submitted ballot's final disposition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallotBoxState {
    Cast,
    Spoiled,
}

/// One entry in the ballot box: the ciphertext ballot together with the
/// disposition it was submitted under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedBallot {
    pub ballot: CiphertextBallot,
    pub state: BallotBoxState,
}

/// The append-only store of every ballot submitted in an election.
/// `ballot_id` is the uniqueness key: a second submission under the
/// same id, cast or spoiled, is rejected rather than silently
/// overwriting the first (spec-level: no ballot may be both cast and
/// spoiled, or cast twice).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BallotBox {
    entries: BTreeMap<String, SubmittedBallot>,
}

impl BallotBox {
    pub fn new() -> Self {
        BallotBox {
            entries: BTreeMap::new(),
        }
    }

    /// Submits `ballot` under `state`, after checking its NIZK proofs
    /// verify and that `ballot_id` has not already been submitted. A
    /// ballot whose proofs fail is rejected outright: there is no
    /// partial admission of an unverified ballot (spec §7).
    pub fn submit(
        &mut self,
        ballot: CiphertextBallot,
        state: BallotBoxState,
        context: &Context,
        fixed_parameters: &FixedParameters,
    ) -> EgResult<()> {
        if self.entries.contains_key(&ballot.ballot_id) {
            return Err(EgError::StateConflict(format!(
                "ballot {} has already been submitted",
                ballot.ballot_id
            )));
        }
        ballot.verify_proofs(context, fixed_parameters)?;
        self.entries
            .insert(ballot.ballot_id.clone(), SubmittedBallot { ballot, state });
        Ok(())
    }

    pub fn get(&self, ballot_id: &str) -> Option<&SubmittedBallot> {
        self.entries.get(ballot_id)
    }

    /// Every cast ballot, in ascending ballot-id order (a stable,
    /// submission-order-independent iteration order for the tally).
    pub fn cast_ballots(&self) -> impl Iterator<Item = &CiphertextBallot> {
        self.entries
            .values()
            .filter(|e| e.state == BallotBoxState::Cast)
            .map(|e| &e.ballot)
    }

    /// Every spoiled ballot, in ascending ballot-id order.
    pub fn spoiled_ballots(&self) -> impl Iterator<Item = &CiphertextBallot> {
        self.entries
            .values()
            .filter(|e| e.state == BallotBoxState::Spoiled)
            .map(|e| &e.ballot)
    }

    pub fn cast_ballot_ids(&self) -> Vec<String> {
        self.cast_ballots().map(|b| b.ballot_id.clone()).collect()
    }

    pub fn spoiled_ballot_ids(&self) -> Vec<String> {
        self.spoiled_ballots().map(|b| b.ballot_id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ballot::{encrypt_ballot, PlaintextBallot, PlaintextContest, PlaintextSelection};
    use crate::context::Context;
    use crate::guardian::{Guardian, GuardianSet};
    use crate::key_ceremony::{GuardianSecretState, KeyCeremonyMediator};
    use crate::manifest::{BallotStyle, Candidate, ContestDefinition, Manifest, SelectionDefinition, VoteVariation};
    use util::csrng::DeterministicCsrng;

    fn manifest() -> Manifest {
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

    fn setup() -> (FixedParameters, Context, Manifest) {
        let fp = FixedParameters::compact();
        let csrng = DeterministicCsrng::from_seed_bytes(b"ballot-box-setup");
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
        let manifest = manifest();
        let context = Context::build(&mediator, joint_key, &manifest, &fp, commitments);
        (fp, context, manifest)
    }

    fn ballot(id: &str, choice: &str, fp: &FixedParameters, context: &Context, manifest: &Manifest, seed: &[u8]) -> CiphertextBallot {
        let csrng = DeterministicCsrng::from_seed_bytes(seed);
        let ballot_nonce = fp.field.random_field_elem(&csrng);
        let plaintext = PlaintextBallot {
            ballot_id: id.into(),
            style_id: "default".into(),
            contests: vec![PlaintextContest {
                contest_id: "mayor".into(),
                selections: vec![PlaintextSelection {
                    object_id: format!("mayor-{choice}"),
                    vote: 1,
                }],
            }],
        };
        encrypt_ballot(&plaintext, manifest, context, fp, ballot_nonce, &csrng).unwrap()
    }

    #[test]
    fn cast_and_spoiled_ballots_are_tracked_separately() {
        let (fp, context, manifest) = setup();
        let mut box_ = BallotBox::new();

        let b1 = ballot("b1", "alice", &fp, &context, &manifest, b"b1");
        let b2 = ballot("b2", "bob", &fp, &context, &manifest, b"b2");

        box_.submit(b1, BallotBoxState::Cast, &context, &fp).unwrap();
        box_.submit(b2, BallotBoxState::Spoiled, &context, &fp).unwrap();

        assert_eq!(box_.cast_ballot_ids(), vec!["b1".to_string()]);
        assert_eq!(box_.spoiled_ballot_ids(), vec!["b2".to_string()]);
    }

    #[test]
    fn duplicate_ballot_id_is_rejected() {
        let (fp, context, manifest) = setup();
        let mut box_ = BallotBox::new();

        let b1 = ballot("b1", "alice", &fp, &context, &manifest, b"dup");
        let b1_again = ballot("b1", "bob", &fp, &context, &manifest, b"dup-again");

        box_.submit(b1, BallotBoxState::Cast, &context, &fp).unwrap();
        assert!(box_
            .submit(b1_again, BallotBoxState::Cast, &context, &fp)
            .is_err());
    }

    #[test]
    fn ballot_with_invalid_proof_is_rejected_on_submit() {
        let (fp, context, manifest) = setup();
        let mut box_ = BallotBox::new();

        let mut tampered = ballot("b1", "alice", &fp, &context, &manifest, b"tamper");
        tampered.contests[0].selections[0].ciphertext.beta = tampered.contests[0].selections[0]
            .ciphertext
            .beta
            .mul(&fp.group.generator(), &fp.group);

        assert!(box_
            .submit(tampered, BallotBoxState::Cast, &context, &fp)
            .is_err());
        assert!(box_.is_empty());
    }
}
