// Copyright (C) 2026 The electionguard-core Authors.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::manual_assert)]

//! Non-interactive zero-knowledge proofs built from the Fiat-Shamir
//! transform of Schnorr's identification protocol.
//!
//! Three shapes are used throughout this crate:
//!
//! - [`SchnorrProof`]: proof of knowledge of a discrete log, used for
//!   guardian key-ceremony coefficient commitments.
//! - [`DecryptionShareProof`]: a Chaum-Pedersen proof of equality of
//!   discrete logs, used to certify that a guardian's (or compensating
//!   guardian's) decryption share was computed honestly from the
//!   ciphertext and the claimed public key, without revealing the
//!   secret exponent.
//! - [`RangeProof`]: the disjunctive (one-of-many) generalization of
//!   Chaum-Pedersen, proving a ciphertext encodes some value in
//!   `0..=limit` without revealing which. `limit == 1` is the
//!   selection-is-zero-or-one proof; `limit` equal to a contest's vote
//!   limit is the contest sum-in-range proof.

use serde::{Deserialize, Serialize};

use util::algebra::{FieldElement, Group, GroupElement, ScalarField};
use util::csrng::Csrng;

use crate::el_gamal::{Ciphertext, ElGamalPublicKey, ElGamalSecretKey};
use crate::errors::{EgError, EgResult};
use crate::hash::{eg_h_q, HashInput};

/// Domain separators for the Fiat-Shamir challenges in this module.
/// Distinct from the ones used to hash manifests/contexts in
/// `hash.rs`'s call sites elsewhere in the crate.
mod domain {
    pub const SCHNORR: u8 = 0x10;
    pub const DECRYPTION_SHARE: u8 = 0x11;
    pub const RANGE_PROOF: u8 = 0x12;
    pub const CONSTANT_VALUE: u8 = 0x13;
}

/// Proof of knowledge of `x` such that `public == g^x`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchnorrProof {
    pub commitment: GroupElement,
    pub response: FieldElement,
}

impl SchnorrProof {
    pub fn prove(
        secret: &FieldElement,
        public: &GroupElement,
        group: &Group,
        field: &ScalarField,
        csrng: &dyn Csrng,
    ) -> Self {
        let u = field.random_field_elem(csrng);
        let commitment = group.g_exp(&u);
        let challenge = eg_h_q(
            domain::SCHNORR,
            &[
                HashInput::Group(public, group),
                HashInput::Group(&commitment, group),
            ],
            field,
        );
        let response = u.add(&challenge.mul(secret, field), field);
        SchnorrProof {
            commitment,
            response,
        }
    }

    pub fn verify(&self, public: &GroupElement, group: &Group, field: &ScalarField) -> EgResult<()> {
        let challenge = eg_h_q(
            domain::SCHNORR,
            &[
                HashInput::Group(public, group),
                HashInput::Group(&self.commitment, group),
            ],
            field,
        );
        let lhs = group.g_exp(&self.response);
        let rhs = self.commitment.mul(&public.exp(&challenge, group), group);
        if lhs == rhs {
            Ok(())
        } else {
            Err(EgError::ProofInvalid("Schnorr proof does not verify".into()))
        }
    }
}

/// Chaum-Pedersen proof that `share == alpha^secret` given the public
/// key `public == g^secret`, without revealing `secret`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptionShareProof {
    pub commitment_a: GroupElement,
    pub commitment_b: GroupElement,
    pub response: FieldElement,
}

impl DecryptionShareProof {
    pub fn prove(
        secret: &ElGamalSecretKey,
        public: &ElGamalPublicKey,
        ciphertext: &Ciphertext,
        share: &GroupElement,
        group: &Group,
        field: &ScalarField,
        csrng: &dyn Csrng,
    ) -> Self {
        let u = field.random_field_elem(csrng);
        let commitment_a = group.g_exp(&u);
        let commitment_b = ciphertext.alpha.exp(&u, group);
        let challenge = eg_h_q(
            domain::DECRYPTION_SHARE,
            &[
                HashInput::Group(&public.0, group),
                HashInput::Group(&ciphertext.alpha, group),
                HashInput::Group(share, group),
                HashInput::Group(&commitment_a, group),
                HashInput::Group(&commitment_b, group),
            ],
            field,
        );
        let response = u.add(&challenge.mul(&secret.0, field), field);
        DecryptionShareProof {
            commitment_a,
            commitment_b,
            response,
        }
    }

    pub fn verify(
        &self,
        public: &ElGamalPublicKey,
        ciphertext: &Ciphertext,
        share: &GroupElement,
        group: &Group,
        field: &ScalarField,
    ) -> EgResult<()> {
        let challenge = eg_h_q(
            domain::DECRYPTION_SHARE,
            &[
                HashInput::Group(&public.0, group),
                HashInput::Group(&ciphertext.alpha, group),
                HashInput::Group(share, group),
                HashInput::Group(&self.commitment_a, group),
                HashInput::Group(&self.commitment_b, group),
            ],
            field,
        );
        let lhs_a = group.g_exp(&self.response);
        let rhs_a = self.commitment_a.mul(&public.0.exp(&challenge, group), group);
        let lhs_b = ciphertext.alpha.exp(&self.response, group);
        let rhs_b = self.commitment_b.mul(&share.exp(&challenge, group), group);
        if lhs_a == rhs_a && lhs_b == rhs_b {
            Ok(())
        } else {
            Err(EgError::ProofInvalid(
                "decryption share proof does not verify".into(),
            ))
        }
    }
}

/// One branch of a [`RangeProof`]: the simulated-or-real Chaum-Pedersen
/// transcript for the candidate value `j`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct RangeProofBranch {
    a: GroupElement,
    b: GroupElement,
    challenge: FieldElement,
    response: FieldElement,
}

/// A disjunctive (one-of-`limit+1`) zero-knowledge proof that a
/// ciphertext `(alpha, beta) = (g^R, K^R * g^m)` encodes some
/// `m in 0..=limit`, without revealing `m`.
///
/// `limit == 1` is the familiar "this selection is 0 or 1" proof.
/// Any other `limit` proves a contest's accumulated selection sum is
/// within its vote limit, without revealing the sum.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeProof {
    branches: Vec<RangeProofBranch>,
}

impl RangeProof {
    /// `m` is the true encoded value, `nonce` the `R` it was encrypted
    /// with, `limit` the inclusive upper bound of the disjunction.
    pub fn prove(
        m: u64,
        nonce: &FieldElement,
        pub_key: &ElGamalPublicKey,
        ciphertext: &Ciphertext,
        limit: u64,
        group: &Group,
        field: &ScalarField,
        csrng: &dyn Csrng,
    ) -> EgResult<Self> {
        if m > limit {
            return Err(EgError::InvalidElement(format!(
                "value {m} exceeds disjunction limit {limit}"
            )));
        }

        let mut branches: Vec<Option<RangeProofBranch>> = (0..=limit).map(|_| None).collect();
        let mut simulated_challenge_sum = ScalarField::zero();

        for j in 0..=limit {
            if j == m {
                continue;
            }
            let c_j = field.random_field_elem(csrng);
            let v_j = field.random_field_elem(csrng);
            let g_to_j = crate::discrete_log::g_pow(group, field, j);
            let beta_over_gj = ciphertext.beta.mul(&g_to_j.inv(group), group);
            let a_j = group
                .g_exp(&v_j)
                .mul(&ciphertext.alpha.exp(&c_j, group).inv(group), group);
            let b_j = pub_key
                .0
                .exp(&v_j, group)
                .mul(&beta_over_gj.exp(&c_j, group).inv(group), group);
            simulated_challenge_sum = simulated_challenge_sum.add(&c_j, field);
            branches[j as usize] = Some(RangeProofBranch {
                a: a_j,
                b: b_j,
                challenge: c_j,
                response: v_j,
            });
        }

        let u = field.random_field_elem(csrng);
        let a_m = group.g_exp(&u);
        let b_m = pub_key.0.exp(&u, group);

        let mut hash_items = vec![
            HashInput::Group(&pub_key.0, group),
            HashInput::Group(&ciphertext.alpha, group),
            HashInput::Group(&ciphertext.beta, group),
        ];
        for (j, branch) in branches.iter().enumerate() {
            match branch {
                Some(b) => {
                    hash_items.push(HashInput::Group(&b.a, group));
                    hash_items.push(HashInput::Group(&b.b, group));
                }
                None => {
                    debug_assert_eq!(j as u64, m);
                    hash_items.push(HashInput::Group(&a_m, group));
                    hash_items.push(HashInput::Group(&b_m, group));
                }
            }
        }
        let overall_challenge = eg_h_q(domain::RANGE_PROOF, &hash_items, field);

        let c_m = overall_challenge.sub(&simulated_challenge_sum, field);
        let v_m = u.add(&c_m.mul(nonce, field), field);
        branches[m as usize] = Some(RangeProofBranch {
            a: a_m,
            b: b_m,
            challenge: c_m,
            response: v_m,
        });

        Ok(RangeProof {
            branches: branches
                .into_iter()
                .collect::<Option<Vec<_>>>()
                .unwrap_or_default(),
        })
    }

    pub fn verify(
        &self,
        pub_key: &ElGamalPublicKey,
        ciphertext: &Ciphertext,
        limit: u64,
        group: &Group,
        field: &ScalarField,
    ) -> EgResult<()> {
        if self.branches.len() as u64 != limit + 1 {
            return Err(EgError::ProofInvalid(
                "range proof branch count does not match limit".into(),
            ));
        }

        let mut hash_items = vec![
            HashInput::Group(&pub_key.0, group),
            HashInput::Group(&ciphertext.alpha, group),
            HashInput::Group(&ciphertext.beta, group),
        ];
        for branch in &self.branches {
            hash_items.push(HashInput::Group(&branch.a, group));
            hash_items.push(HashInput::Group(&branch.b, group));
        }
        let overall_challenge = eg_h_q(domain::RANGE_PROOF, &hash_items, field);

        let mut challenge_sum = ScalarField::zero();
        for (j, branch) in self.branches.iter().enumerate() {
            challenge_sum = challenge_sum.add(&branch.challenge, field);

            let g_to_j = crate::discrete_log::g_pow(group, field, j as u64);
            let beta_over_gj = ciphertext.beta.mul(&g_to_j.inv(group), group);

            let lhs_a = group.g_exp(&branch.response);
            let rhs_a = branch
                .a
                .mul(&ciphertext.alpha.exp(&branch.challenge, group), group);
            let lhs_b = pub_key.0.exp(&branch.response, group);
            let rhs_b = branch.b.mul(&beta_over_gj.exp(&branch.challenge, group), group);

            if lhs_a != rhs_a || lhs_b != rhs_b {
                return Err(EgError::ProofInvalid(format!(
                    "range proof branch {j} does not verify"
                )));
            }
        }

        if challenge_sum == overall_challenge {
            Ok(())
        } else {
            Err(EgError::ProofInvalid(
                "range proof challenge sum does not match overall challenge".into(),
            ))
        }
    }
}

/// Proof that a ciphertext `(alpha, beta)` encrypts a known constant
/// `value`: knowledge of the nonce `R` such that `alpha == g^R` and
/// `beta / g^value == K^R`. Used to certify that a contest's
/// accumulated placeholder-plus-marked-selection total is exactly the
/// contest's vote limit, without revealing which selections (if any
/// placeholders) carried the remaining count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantValueProof {
    pub commitment_a: GroupElement,
    pub commitment_b: GroupElement,
    pub response: FieldElement,
}

impl ConstantValueProof {
    pub fn prove(
        nonce: &FieldElement,
        value: u64,
        pub_key: &ElGamalPublicKey,
        group: &Group,
        field: &ScalarField,
        csrng: &dyn Csrng,
    ) -> Self {
        let u = field.random_field_elem(csrng);
        let commitment_a = group.g_exp(&u);
        let commitment_b = pub_key.0.exp(&u, group);
        let value_fe = FieldElement::from_u64(value, field);
        let challenge = eg_h_q(
            domain::CONSTANT_VALUE,
            &[
                HashInput::Group(&pub_key.0, group),
                HashInput::Field(&value_fe, field),
                HashInput::Group(&commitment_a, group),
                HashInput::Group(&commitment_b, group),
            ],
            field,
        );
        let response = u.add(&challenge.mul(nonce, field), field);
        ConstantValueProof {
            commitment_a,
            commitment_b,
            response,
        }
    }

    pub fn verify(
        &self,
        ciphertext: &Ciphertext,
        value: u64,
        pub_key: &ElGamalPublicKey,
        group: &Group,
        field: &ScalarField,
    ) -> EgResult<()> {
        let value_fe = FieldElement::from_u64(value, field);
        let challenge = eg_h_q(
            domain::CONSTANT_VALUE,
            &[
                HashInput::Group(&pub_key.0, group),
                HashInput::Field(&value_fe, field),
                HashInput::Group(&self.commitment_a, group),
                HashInput::Group(&self.commitment_b, group),
            ],
            field,
        );

        let lhs_a = group.g_exp(&self.response);
        let rhs_a = self.commitment_a.mul(&ciphertext.alpha.exp(&challenge, group), group);

        let g_to_value = crate::discrete_log::g_pow(group, field, value);
        let beta_over_value = ciphertext.beta.mul(&g_to_value.inv(group), group);
        let lhs_b = pub_key.0.exp(&self.response, group);
        let rhs_b = self.commitment_b.mul(&beta_over_value.exp(&challenge, group), group);

        if lhs_a == rhs_a && lhs_b == rhs_b {
            Ok(())
        } else {
            Err(EgError::ProofInvalid(
                "constant-value proof does not verify".into(),
            ))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fixed_parameters::FixedParameters;
    use util::csrng::DeterministicCsrng;

    #[test]
    fn schnorr_proof_round_trip() {
        let fp = FixedParameters::compact();
        let csrng = DeterministicCsrng::from_seed_bytes(b"nizk-schnorr");
        let secret = fp.field.random_field_elem(&csrng);
        let public = fp.group.g_exp(&secret);
        let proof = SchnorrProof::prove(&secret, &public, &fp.group, &fp.field, &csrng);
        assert!(proof.verify(&public, &fp.group, &fp.field).is_ok());
    }

    #[test]
    fn schnorr_proof_rejects_wrong_public_key() {
        let fp = FixedParameters::compact();
        let csrng = DeterministicCsrng::from_seed_bytes(b"nizk-schnorr-bad");
        let secret = fp.field.random_field_elem(&csrng);
        let public = fp.group.g_exp(&secret);
        let proof = SchnorrProof::prove(&secret, &public, &fp.group, &fp.field, &csrng);
        let other_public = fp.group.g_exp(&fp.field.random_field_elem(&csrng));
        assert!(proof.verify(&other_public, &fp.group, &fp.field).is_err());
    }

    #[test]
    fn decryption_share_proof_round_trip() {
        let fp = FixedParameters::compact();
        let csrng = DeterministicCsrng::from_seed_bytes(b"nizk-decshare");
        let secret = ElGamalSecretKey(fp.field.random_field_elem(&csrng));
        let public = secret.public_key(&fp.group);

        let nonce = fp.field.random_field_elem(&csrng);
        let ct = Ciphertext::encrypt(3, &nonce, &public, &fp);
        let share = ct.alpha.exp(&secret.0, &fp.group);

        let proof = DecryptionShareProof::prove(
            &secret, &public, &ct, &share, &fp.group, &fp.field, &csrng,
        );
        assert!(proof
            .verify(&public, &ct, &share, &fp.group, &fp.field)
            .is_ok());
    }

    #[test]
    fn decryption_share_proof_rejects_wrong_share() {
        let fp = FixedParameters::compact();
        let csrng = DeterministicCsrng::from_seed_bytes(b"nizk-decshare-bad");
        let secret = ElGamalSecretKey(fp.field.random_field_elem(&csrng));
        let public = secret.public_key(&fp.group);

        let nonce = fp.field.random_field_elem(&csrng);
        let ct = Ciphertext::encrypt(3, &nonce, &public, &fp);
        let share = ct.alpha.exp(&secret.0, &fp.group);
        let wrong_share = share.mul(&fp.group.generator(), &fp.group);

        let proof = DecryptionShareProof::prove(
            &secret, &public, &ct, &share, &fp.group, &fp.field, &csrng,
        );
        assert!(proof
            .verify(&public, &ct, &wrong_share, &fp.group, &fp.field)
            .is_err());
    }

    #[test]
    fn range_proof_round_trip_zero_or_one() {
        let fp = FixedParameters::compact();
        let csrng = DeterministicCsrng::from_seed_bytes(b"nizk-range-01");
        let secret = ElGamalSecretKey(fp.field.random_field_elem(&csrng));
        let public = secret.public_key(&fp.group);

        for m in [0u64, 1] {
            let nonce = fp.field.random_field_elem(&csrng);
            let ct = Ciphertext::encrypt(m, &nonce, &public, &fp);
            let proof = RangeProof::prove(
                m, &nonce, &public, &ct, 1, &fp.group, &fp.field, &csrng,
            )
            .unwrap();
            assert!(proof
                .verify(&public, &ct, 1, &fp.group, &fp.field)
                .is_ok());
        }
    }

    #[test]
    fn range_proof_round_trip_contest_limit() {
        let fp = FixedParameters::compact();
        let csrng = DeterministicCsrng::from_seed_bytes(b"nizk-range-limit");
        let secret = ElGamalSecretKey(fp.field.random_field_elem(&csrng));
        let public = secret.public_key(&fp.group);

        let nonce = fp.field.random_field_elem(&csrng);
        let ct = Ciphertext::encrypt(2, &nonce, &public, &fp);
        let proof =
            RangeProof::prove(2, &nonce, &public, &ct, 3, &fp.group, &fp.field, &csrng).unwrap();
        assert!(proof
            .verify(&public, &ct, 3, &fp.group, &fp.field)
            .is_ok());
    }

    #[test]
    fn range_proof_rejects_value_exceeding_limit() {
        let fp = FixedParameters::compact();
        let csrng = DeterministicCsrng::from_seed_bytes(b"nizk-range-exceed");
        let secret = ElGamalSecretKey(fp.field.random_field_elem(&csrng));
        let public = secret.public_key(&fp.group);
        let nonce = fp.field.random_field_elem(&csrng);
        let ct = Ciphertext::encrypt(5, &nonce, &public, &fp);
        assert!(RangeProof::prove(5, &nonce, &public, &ct, 3, &fp.group, &fp.field, &csrng)
            .is_err());
    }

    #[test]
    fn constant_value_proof_round_trip() {
        let fp = FixedParameters::compact();
        let csrng = DeterministicCsrng::from_seed_bytes(b"nizk-constant");
        let secret = ElGamalSecretKey(fp.field.random_field_elem(&csrng));
        let public = secret.public_key(&fp.group);

        let nonce = fp.field.random_field_elem(&csrng);
        let ct = Ciphertext::encrypt(2, &nonce, &public, &fp);
        let proof = ConstantValueProof::prove(&nonce, 2, &public, &fp.group, &fp.field, &csrng);
        assert!(proof.verify(&ct, 2, &public, &fp.group, &fp.field).is_ok());
        assert!(proof.verify(&ct, 3, &public, &fp.group, &fp.field).is_err());
    }

    #[test]
    fn range_proof_rejects_tampered_ciphertext() {
        let fp = FixedParameters::compact();
        let csrng = DeterministicCsrng::from_seed_bytes(b"nizk-range-tamper");
        let secret = ElGamalSecretKey(fp.field.random_field_elem(&csrng));
        let public = secret.public_key(&fp.group);

        let nonce = fp.field.random_field_elem(&csrng);
        let ct = Ciphertext::encrypt(1, &nonce, &public, &fp);
        let proof =
            RangeProof::prove(1, &nonce, &public, &ct, 1, &fp.group, &fp.field, &csrng).unwrap();

        let tampered = Ciphertext {
            alpha: ct.alpha.clone(),
            beta: ct.beta.mul(&fp.group.generator(), &fp.group),
        };
        assert!(proof
            .verify(&public, &tampered, 1, &fp.group, &fp.field)
            .is_err());
    }
}
