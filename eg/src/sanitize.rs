// Copyright (C) 2026 The electionguard-core Authors.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::manual_assert)]

//! Ballot sanitization: the publication step that strips every nonce
//! out of a [`CiphertextBallot`] before it is written to the public
//! record, while separately keeping them (for AUDITED ballots only) in
//! a [`NonceMap`] an auditor can use to independently re-derive the
//! Benaloh challenge in [`crate::benaloh`].
//!
//! A CAST ballot's nonces are discarded outright: once a ballot is
//! counted, its nonces serve no further purpose and retaining them
//! would let whoever holds them prove how that ballot voted. An
//! AUDITED (spoiled) ballot's nonces are, by contrast, exactly what the
//! challenge needs, so they are returned alongside the sanitized
//! ballot rather than thrown away.

use std::collections::BTreeMap;

use crate::ballot::CiphertextBallot;

/// Every nonce stripped out of a ballot during sanitization, keyed by
/// a stable path so a given nonce can be matched back to the field it
/// came from without needing the original (un-sanitized) ballot.
pub type NonceMap = BTreeMap<String, util::algebra::FieldElement>;

fn ballot_nonce_key() -> String {
    "ballot_nonce".to_string()
}

fn contest_nonce_key(contest_id: &str) -> String {
    format!("{contest_id}_nonce")
}

/// Produces the publication copy of `ballot`: identical in every field
/// except that every nonce (ballot-level, per-contest, per-selection)
/// is set to `None`. This is the only form of an encrypted ballot ever
/// written to the public election record; hashing it (with nonces
/// excluded, as they already are not part of [`CiphertextBallot::crypto_hash`]'s
/// input) reproduces the same `crypto_hash` as the original.
///
/// When `audit` is `true` the extracted nonces are returned as a
/// [`NonceMap`] for the Benaloh challenge; for a ballot being cast,
/// pass `audit: false` and the returned map is empty, matching the
/// spoiled/cast disposition split (spec §7) after which a cast
/// ballot's nonces must never again be recoverable.
pub fn sanitize(ballot: &CiphertextBallot, audit: bool) -> (CiphertextBallot, NonceMap) {
    let mut nonces = NonceMap::new();
    let mut sanitized = ballot.clone();

    if let Some(n) = sanitized.nonce.take() {
        if audit {
            nonces.insert(ballot_nonce_key(), n);
        }
    }

    for contest in &mut sanitized.contests {
        if let Some(n) = contest.nonce.take() {
            if audit {
                nonces.insert(contest_nonce_key(&contest.contest_id), n);
            }
        }
        for selection in &mut contest.selections {
            if let Some(n) = selection.nonce.take() {
                if audit {
                    nonces.insert(selection.object_id.clone(), n);
                }
            }
        }
    }

    (sanitized, nonces)
}

/// `true` iff every nonce has already been stripped from `ballot` —
/// the state a ballot must be in before it is handed to anything
/// outside the guardian/tally boundary.
pub fn is_sanitized(ballot: &CiphertextBallot) -> bool {
    ballot.nonce.is_none()
        && ballot.contests.iter().all(|c| {
            c.nonce.is_none() && c.selections.iter().all(|s| s.nonce.is_none())
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ballot::{encrypt_ballot, PlaintextBallot, PlaintextContest, PlaintextSelection};
    use crate::context::Context;
    use crate::fixed_parameters::FixedParameters;
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
        let csrng = DeterministicCsrng::from_seed_bytes(b"sanitize-setup");
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

    fn encrypted(fp: &FixedParameters, context: &Context, manifest: &Manifest, seed: &[u8]) -> CiphertextBallot {
        let csrng = DeterministicCsrng::from_seed_bytes(seed);
        let ballot_nonce = fp.field.random_field_elem(&csrng);
        let plaintext = PlaintextBallot {
            ballot_id: "b1".into(),
            style_id: "default".into(),
            contests: vec![PlaintextContest {
                contest_id: "mayor".into(),
                selections: vec![PlaintextSelection {
                    object_id: "mayor-alice".into(),
                    vote: 1,
                }],
            }],
        };
        encrypt_ballot(&plaintext, manifest, context, fp, ballot_nonce, &csrng).unwrap()
    }

    #[test]
    fn cast_sanitization_strips_nonces_and_discards_them() {
        let (fp, context, manifest) = setup();
        let ballot = encrypted(&fp, &context, &manifest, b"sanitize-cast");
        assert!(!is_sanitized(&ballot));

        let (sanitized, nonces) = sanitize(&ballot, false);
        assert!(is_sanitized(&sanitized));
        assert!(nonces.is_empty());
    }

    #[test]
    fn audited_sanitization_strips_nonces_but_retains_them_separately() {
        let (fp, context, manifest) = setup();
        let ballot = encrypted(&fp, &context, &manifest, b"sanitize-audit");

        let (sanitized, nonces) = sanitize(&ballot, true);
        assert!(is_sanitized(&sanitized));
        assert!(nonces.contains_key(&ballot_nonce_key()));
        assert!(nonces.contains_key(&contest_nonce_key("mayor")));
        assert!(nonces.contains_key("mayor-alice"));
        assert!(nonces.contains_key("mayor-bob"));
    }

    #[test]
    fn sanitization_preserves_the_crypto_hash() {
        let (fp, context, manifest) = setup();
        let ballot = encrypted(&fp, &context, &manifest, b"sanitize-hash");
        let (sanitized, _) = sanitize(&ballot, false);
        assert_eq!(ballot.crypto_hash, sanitized.crypto_hash);
        assert_eq!(ballot.ballot_id, sanitized.ballot_id);
        assert_eq!(ballot.contests.len(), sanitized.contests.len());
    }
}
