// Copyright (C) 2026 The electionguard-core Authors.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::manual_assert)]

//! The derived election context: the small set of values computed once
//! a manifest and a joint public key exist, and then reused everywhere
//! a ballot is encrypted or a proof is checked.
//!
//! `crypto_base_hash` binds the group parameters and the manifest
//! together; `crypto_extended_base_hash` additionally binds the
//! guardians' published coefficient commitments, so that a ballot
//! encrypted against one key ceremony's output can never be mistaken
//! for (or replayed against) another's.

use serde::{Deserialize, Serialize};

use crate::el_gamal::ElGamalPublicKey;
use crate::fixed_parameters::FixedParameters;
use crate::hash::{eg_h, HValue, HashInput};
use crate::key_ceremony::KeyCeremonyMediator;
use crate::manifest::Manifest;
use crate::polynomial::CoefficientCommitments;

/// Everything derived from a completed key ceremony and a validated
/// manifest, held for the lifetime of the election.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub number_of_guardians: u32,
    pub quorum: u32,
    pub joint_public_key: ElGamalPublicKey,
    pub manifest_hash: HValue,
    pub commitment_hash: HValue,
    pub crypto_base_hash: HValue,
    pub crypto_extended_base_hash: HValue,
}

impl Context {
    /// `H(p || q || g || n || k || manifest_hash)`.
    fn crypto_base_hash(fixed_parameters: &FixedParameters, n: u32, k: u32, manifest_hash: &HValue) -> HValue {
        let p_bytes = fixed_parameters.group.p().to_bytes_be();
        let q_bytes = fixed_parameters.group.q().to_bytes_be();
        let g_bytes = fixed_parameters.group.generator().value().to_bytes_be();
        eg_h(
            0x21,
            &[
                HashInput::Bytes(&p_bytes),
                HashInput::Bytes(&q_bytes),
                HashInput::Bytes(&g_bytes),
                HashInput::Bytes(&n.to_be_bytes()),
                HashInput::Bytes(&k.to_be_bytes()),
                HashInput::HValue(manifest_hash),
            ],
        )
    }

    /// `H(commitment for every guardian's every coefficient, in
    /// ascending guardian sequence order)`.
    fn commitment_hash(all_commitments: &[(u32, CoefficientCommitments)], fixed_parameters: &FixedParameters) -> HValue {
        let group = &fixed_parameters.group;
        let mut sorted: Vec<&(u32, CoefficientCommitments)> = all_commitments.iter().collect();
        sorted.sort_by_key(|(idx, _)| *idx);
        let mut items = Vec::new();
        for (_, commitments) in &sorted {
            for c in &commitments.commitments {
                items.push(HashInput::Group(&c.public, group));
            }
        }
        eg_h(0x22, &items)
    }

    /// Builds the [`Context`] for a completed key ceremony. `commitments`
    /// must contain exactly the coefficient commitments published by
    /// every guardian in `mediator`'s guardian set, each paired with
    /// its guardian's sequence order (spec-level: ordering must not
    /// affect the result, hence the sort inside [`Self::commitment_hash`]).
    pub fn build(
        mediator: &KeyCeremonyMediator,
        joint_public_key: ElGamalPublicKey,
        manifest: &Manifest,
        fixed_parameters: &FixedParameters,
        commitments: Vec<(u32, CoefficientCommitments)>,
    ) -> Self {
        let manifest_hash = manifest.manifest_hash();
        let n = mediator.guardian_count();
        let k = mediator.quorum();
        let crypto_base_hash = Self::crypto_base_hash(fixed_parameters, n, k, &manifest_hash);
        let commitment_hash = Self::commitment_hash(&commitments, fixed_parameters);
        let crypto_extended_base_hash = eg_h(
            0x23,
            &[
                HashInput::HValue(&crypto_base_hash),
                HashInput::HValue(&commitment_hash),
            ],
        );
        Context {
            number_of_guardians: n,
            quorum: k,
            joint_public_key,
            manifest_hash,
            commitment_hash,
            crypto_base_hash,
            crypto_extended_base_hash,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::guardian::{Guardian, GuardianSet};
    use crate::key_ceremony::GuardianSecretState;
    use crate::manifest::{BallotStyle, Candidate, ContestDefinition, SelectionDefinition, VoteVariation};
    use util::csrng::DeterministicCsrng;

    fn sample_manifest() -> Manifest {
        Manifest {
            election_scope_id: "town-2026".into(),
            candidates: vec![Candidate {
                object_id: "alice".into(),
                name: "Alice".into(),
            }],
            contests: vec![ContestDefinition {
                object_id: "mayor".into(),
                sequence_order: 0,
                vote_variation: VoteVariation::OneOfM,
                votes_allowed: 1,
                selections: vec![SelectionDefinition {
                    object_id: "mayor-alice".into(),
                    candidate_id: "alice".into(),
                    sequence_order: 0,
                }],
            }],
            ballot_styles: vec![BallotStyle {
                object_id: "default".into(),
                contest_ids: vec!["mayor".into()],
            }],
        }
    }

    #[test]
    fn context_hashes_are_deterministic_and_bind_the_manifest() {
        let fp = FixedParameters::compact();
        let csrng = DeterministicCsrng::from_seed_bytes(b"context-build");
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

        let manifest = sample_manifest();
        let ctx1 = Context::build(&mediator, joint_key.clone(), &manifest, &fp, commitments.clone());
        let ctx2 = Context::build(&mediator, joint_key, &manifest, &fp, commitments);
        assert_eq!(ctx1, ctx2);
        assert_eq!(ctx1.manifest_hash, manifest.manifest_hash());
    }
}
