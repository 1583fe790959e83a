// Copyright (C) 2026 The electionguard-core Authors.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::manual_assert)]

//! A fixed-vector, in-process run of the whole protocol: key ceremony,
//! ballot encryption, tallying, threshold decryption (both the
//! accumulated-share shortcut and the literal compensated-decrypt path),
//! and a Benaloh challenge — driven entirely by [`DeterministicCsrng`]
//! so its output is reproducible run to run. Nothing here touches a
//! network or the filesystem; it exists to demonstrate the crate's
//! operations end to end, the way a unit test would, but as a runnable
//! program.

use std::collections::BTreeMap;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use tracing::{info, warn};

use eg::ballot::{encrypt_ballot, PlaintextBallot, PlaintextContest, PlaintextSelection};
use eg::ballot_box::{BallotBox, BallotBoxState};
use eg::benaloh::{challenge_ballot, matches_declared_intent};
use eg::context::Context;
use eg::decryption::{
    combine, compensated_decrypt, reconstruct_missing_share, CompensatedShare,
    DecryptionVerificationBlock, PartialDecryptionShare,
};
use eg::fixed_parameters::FixedParameters;
use eg::guardian::{Guardian, GuardianIndex, GuardianSet};
use eg::key_ceremony::{GuardianSecretState, KeyCeremonyMediator};
use eg::manifest::{
    BallotStyle, Candidate, ContestDefinition, Manifest, SelectionDefinition, VoteVariation,
};
use eg::sanitize::sanitize;
use eg::tally::CiphertextTally;
use util::algebra::ScalarField;
use util::csrng::DeterministicCsrng;

fn main() -> ExitCode {
    use tracing::Level;

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .without_time()
        .finish();

    tracing::subscriber::with_default(subscriber, || match run() {
        Ok(()) => {
            info!("fixed-vector scenario completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("scenario failed: {e:#}");
            ExitCode::FAILURE
        }
    })
}

fn mayoral_manifest() -> Manifest {
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

struct Ceremony {
    fp: FixedParameters,
    context: Context,
    manifest: Manifest,
    secrets: Vec<GuardianSecretState>,
    all_commitments: Vec<(GuardianIndex, eg::polynomial::CoefficientCommitments)>,
    quorum: u32,
}

/// Runs the full announce/exchange/verify/publish ceremony for `n`
/// guardians with threshold `k`, seeded deterministically from `seed`.
fn run_ceremony(seed: &[u8], n: u32, k: u32) -> Result<Ceremony> {
    let fp = FixedParameters::compact();
    let csrng = DeterministicCsrng::from_seed_bytes(seed);

    let guardians: Vec<Guardian> = (1..=n)
        .map(|i| Guardian::new(format!("guardian-{i}"), i))
        .collect::<eg::EgResult<_>>()
        .context("constructing guardian identities")?;
    let guardian_set = GuardianSet::new(guardians, k).context("assembling guardian set")?;

    let secrets: Vec<GuardianSecretState> = guardian_set
        .guardians
        .iter()
        .map(|g| GuardianSecretState::generate(g.sequence_order, k, &fp.field, &csrng))
        .collect();

    let mut mediator = KeyCeremonyMediator::new(guardian_set.clone());
    let mut all_commitments = Vec::new();
    for s in &secrets {
        let commitments = s.commit(&fp.group, &fp.field, &csrng);
        mediator
            .receive_announcement(s.index, commitments.clone(), &fp.group, &fp.field)
            .map_err(|e| anyhow::anyhow!(e))
            .context("guardian announcement")?;
        all_commitments.push((s.index, commitments));
    }
    for sender in &secrets {
        for recipient in &secrets {
            let value = sender.backup_for(recipient.index, &fp.field);
            mediator
                .receive_backup(sender.index, recipient.index, value, &fp.group, &fp.field)
                .map_err(|e| anyhow::anyhow!(e))
                .context("Shamir backup exchange")?;
        }
    }
    mediator
        .advance_to_backups_verified()
        .map_err(|e| anyhow::anyhow!(e))?;
    let joint_key = mediator.publish(&fp.group).map_err(|e| anyhow::anyhow!(e))?;

    let manifest = mayoral_manifest();
    let context = Context::build(
        &mediator,
        joint_key,
        &manifest,
        &fp,
        all_commitments.iter().map(|(i, c)| (i.get(), c.clone())).collect(),
    );

    Ok(Ceremony {
        fp,
        context,
        manifest,
        secrets,
        all_commitments,
        quorum: k,
    })
}

fn accumulated_share(index: GuardianIndex, ceremony: &Ceremony) -> util::algebra::FieldElement {
    let mut acc = ScalarField::zero();
    for sender in &ceremony.secrets {
        let value = sender.backup_for(index, &ceremony.fp.field);
        acc = acc.add(&value, &ceremony.fp.field);
    }
    acc
}

fn cast_ballot(
    ceremony: &Ceremony,
    ballot_id: &str,
    choice: &str,
    seed: &[u8],
) -> Result<eg::ballot::CiphertextBallot> {
    let csrng = DeterministicCsrng::from_seed_bytes(seed);
    let ballot_nonce = ceremony.fp.field.random_field_elem(&csrng);
    let plaintext = PlaintextBallot {
        ballot_id: ballot_id.into(),
        style_id: "default".into(),
        contests: vec![PlaintextContest {
            contest_id: "mayor".into(),
            selections: vec![PlaintextSelection {
                object_id: format!("mayor-{choice}"),
                vote: 1,
            }],
        }],
    };
    encrypt_ballot(
        &plaintext,
        &ceremony.manifest,
        &ceremony.context,
        &ceremony.fp,
        ballot_nonce,
        &csrng,
    )
    .map_err(|e| anyhow::anyhow!(e))
    .context("encrypting ballot")
}

fn run() -> Result<()> {
    info!("---- E1: n=3, k=2, ballots A, A, B, decrypted by quorum with one guardian compensated ----");

    let ceremony = run_ceremony(b"eg-demo-e1", 3, 2)?;
    info!(n = 3, k = 2, "key ceremony complete");

    let mut ballot_box = BallotBox::new();
    for (id, choice) in [("ballot-1", "alice"), ("ballot-2", "alice"), ("ballot-3", "bob")] {
        let seed = format!("eg-demo-e1-{id}");
        let ballot = cast_ballot(&ceremony, id, choice, seed.as_bytes())?;
        ballot_box
            .submit(ballot, BallotBoxState::Cast, &ceremony.context, &ceremony.fp)
            .map_err(|e| anyhow::anyhow!(e))
            .context("submitting ballot")?;
    }
    info!(cast = ballot_box.len(), "ballots cast");

    let tally = CiphertextTally::accumulate(&ballot_box, &ceremony.manifest, &ceremony.fp.group)
        .map_err(|e| anyhow::anyhow!(e))?;

    // Guardian 3 is withheld. Guardians 1 and 2 decrypt directly and
    // also compensate on guardian 3's behalf, so the literal
    // partial_decrypt / compensated_decrypt / combine path can be
    // exercised for every selection.
    let missing = ceremony.secrets[2].index;
    let all_guardians: Vec<GuardianIndex> = ceremony.secrets.iter().map(|s| s.index).collect();
    let missing_commitments = ceremony
        .all_commitments
        .iter()
        .find(|(idx, _)| *idx == missing)
        .map(|(_, c)| c.clone())
        .ok_or_else(|| anyhow::anyhow!("missing guardian's commitments were not published"))?;

    let csrng = DeterministicCsrng::from_seed_bytes(b"eg-demo-e1-decryption");
    let mut counts = BTreeMap::new();
    let mut block = DecryptionVerificationBlock::new();
    block.record_available(ceremony.secrets[0].index);
    block.record_available(ceremony.secrets[1].index);
    block.record_missing_compensated(missing);

    for key in tally.totals.keys() {
        let ciphertext = tally.selection_total(&key.0, &key.1).map_err(|e| anyhow::anyhow!(e))?;

        let available: Vec<PartialDecryptionShare> = ceremony.secrets[0..2]
            .iter()
            .map(|s| {
                let own_commitments = ceremony
                    .all_commitments
                    .iter()
                    .find(|(idx, _)| *idx == s.index)
                    .map(|(_, c)| c.clone())
                    .ok_or_else(|| anyhow::anyhow!("guardian commitments missing"))?;
                PartialDecryptionShare::compute(
                    s.index,
                    &s.polynomial.coefficients[0],
                    &own_commitments,
                    ciphertext,
                    &ceremony.fp.group,
                    &ceremony.fp.field,
                    &csrng,
                )
                .map_err(|e| anyhow::anyhow!(e))
            })
            .collect::<Result<_>>()?;

        let compensated: Vec<CompensatedShare> = ceremony.secrets[0..2]
            .iter()
            .map(|s| {
                let backup = ceremony.secrets[2].backup_for(s.index, &ceremony.fp.field);
                compensated_decrypt(
                    s.index,
                    missing,
                    &backup,
                    &missing_commitments,
                    ciphertext,
                    &ceremony.fp.group,
                    &ceremony.fp.field,
                    &csrng,
                )
            })
            .collect();

        let reconstructed = reconstruct_missing_share(&compensated, &ceremony.fp.field, &ceremony.fp.group)
            .map_err(|e| anyhow::anyhow!(e))?;
        let m_factor = combine(&available, &[(missing, reconstructed)], &all_guardians, &ceremony.fp.group)
            .map_err(|e| anyhow::anyhow!(e))?;
        let count = ciphertext
            .decrypt_known_product(&m_factor, &ceremony.fp, tally.num_cast() as u64)
            .map_err(|e| anyhow::anyhow!(e))?;
        counts.insert(key.clone(), count);
    }

    for ((contest_id, selection_id), count) in &counts {
        info!(contest_id, selection_id, count, "decrypted selection total");
    }
    info!(available = block.available_count(), "decryption verification block recorded");

    let alice_count = counts
        .get(&("mayor".to_string(), "mayor-alice".to_string()))
        .copied()
        .unwrap_or(0);
    let bob_count = counts
        .get(&("mayor".to_string(), "mayor-bob".to_string()))
        .copied()
        .unwrap_or(0);
    if alice_count != 2 || bob_count != 1 {
        anyhow::bail!("fixed scenario E1 expected alice=2, bob=1 but got alice={alice_count}, bob={bob_count}");
    }

    info!("---- Benaloh challenge on a freshly encrypted, not-yet-sanitized ballot ----");
    let intent = PlaintextBallot {
        ballot_id: "audited-1".into(),
        style_id: "default".into(),
        contests: vec![PlaintextContest {
            contest_id: "mayor".into(),
            selections: vec![PlaintextSelection {
                object_id: "mayor-alice".into(),
                vote: 1,
            }],
        }],
    };
    let audited = cast_ballot(&ceremony, "audited-1", "alice", b"eg-demo-e1-audit")?;
    let challenge_result = challenge_ballot(&audited, &ceremony.context, &ceremony.fp).map_err(|e| anyhow::anyhow!(e))?;
    matches_declared_intent(&challenge_result, &intent).map_err(|e| anyhow::anyhow!(e))?;
    info!("Benaloh challenge confirmed the ballot matches the declared intent");

    let (sanitized, nonces) = sanitize(&audited, true);
    if challenge_ballot(&sanitized, &ceremony.context, &ceremony.fp).is_ok() {
        warn!("sanitized ballot unexpectedly still carries a challengeable nonce");
    }
    info!(retained_nonces = nonces.len(), "sanitization strips public-record nonces, retaining them only for this audit copy");

    Ok(())
}
