// Copyright (C) 2026 The electionguard-core Authors.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::manual_assert)]

//! Degree-`(k-1)` polynomials over `Z_q` and their use in Shamir/Feldman
//! secret sharing during the guardian key ceremony.
//!
//! A guardian with threshold `k` samples a random polynomial
//! `P(x) = a_0 + a_1 x + ... + a_{k-1} x^{k-1}`, where `a_0` is the
//! guardian's secret key share. `P(0) = a_0` and `P(sequence_order)`,
//! evaluated at every other guardian's sequence order, produces the
//! Shamir backups exchanged during the ceremony. Reconstructing `a_0`
//! from any `k` of those evaluation points is Lagrange interpolation at
//! `x = 0`, see [`lagrange_coefficient_at_zero`].

use serde::{Deserialize, Serialize};

use util::algebra::{FieldElement, Group, GroupElement, ScalarField};
use util::csrng::Csrng;

use crate::errors::{EgError, EgResult};
use crate::guardian::GuardianIndex;
use crate::nizk::SchnorrProof;

/// A guardian's secret polynomial, coefficients in ascending degree
/// order (`coefficients[0]` is the constant term, the guardian's secret
/// key share).
#[derive(Clone)]
pub struct SecretPolynomial {
    pub coefficients: Vec<FieldElement>,
}

impl SecretPolynomial {
    /// Samples a random degree-`(k-1)` polynomial.
    pub fn generate(k: u32, field: &ScalarField, csrng: &dyn Csrng) -> EgResult<Self> {
        if k == 0 {
            return Err(EgError::InvalidElement(
                "polynomial degree bound (threshold) must be at least 1".into(),
            ));
        }
        let coefficients = (0..k).map(|_| field.random_field_elem(csrng)).collect();
        Ok(SecretPolynomial { coefficients })
    }

    /// `P(x)`, evaluated via Horner's method.
    pub fn evaluate(&self, x: &FieldElement, field: &ScalarField) -> FieldElement {
        let mut acc = ScalarField::zero();
        for coeff in self.coefficients.iter().rev() {
            acc = acc.mul(x, field).add(coeff, field);
        }
        acc
    }

    /// The guardian's public key share, `g^{a_0}`.
    pub fn constant_public(&self, group: &Group) -> GroupElement {
        group.g_exp(&self.coefficients[0])
    }

    /// Per-coefficient public commitments `K_i = g^{a_i}`, together with
    /// a Schnorr proof of knowledge of each `a_i`. Every coefficient is
    /// proven individually, not just the constant term, so that a
    /// guardian cannot claim a commitment it does not actually hold the
    /// exponent for.
    pub fn commit(
        &self,
        group: &Group,
        field: &ScalarField,
        csrng: &dyn Csrng,
    ) -> CoefficientCommitments {
        let commitments = self
            .coefficients
            .iter()
            .map(|a_i| {
                let public = group.g_exp(a_i);
                let proof = SchnorrProof::prove(a_i, &public, group, field, csrng);
                CommittedCoefficient {
                    public,
                    proof,
                }
            })
            .collect();
        CoefficientCommitments { commitments }
    }
}

/// One coefficient's public commitment and its proof of knowledge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedCoefficient {
    pub public: GroupElement,
    pub proof: SchnorrProof,
}

/// The public commitments to every coefficient of a guardian's secret
/// polynomial, published during the key ceremony's announcement round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoefficientCommitments {
    pub commitments: Vec<CommittedCoefficient>,
}

impl CoefficientCommitments {
    /// Verifies every coefficient's Schnorr proof.
    pub fn verify(&self, group: &Group, field: &ScalarField) -> EgResult<()> {
        for (i, c) in self.commitments.iter().enumerate() {
            c.proof.verify(&c.public, group, field).map_err(|_| {
                EgError::ProofInvalid(format!("coefficient {i} commitment proof does not verify"))
            })?;
        }
        Ok(())
    }

    /// The guardian's public key, `K = g^{a_0}`.
    pub fn public_key(&self) -> EgResult<&GroupElement> {
        self.commitments
            .first()
            .map(|c| &c.public)
            .ok_or_else(|| EgError::InvalidElement("coefficient commitment list is empty".into()))
    }

    /// Checks that evaluating the committed polynomial "in the
    /// exponent" at `x` matches `g^{P(x)}`, the consistency check a
    /// recipient runs against a Shamir backup it receives (spec-level
    /// Feldman verification): `g^{P(x)} == prod_i K_i^{x^i}`.
    pub fn verify_evaluation(
        &self,
        x: &FieldElement,
        claimed_value: &FieldElement,
        group: &Group,
        field: &ScalarField,
    ) -> EgResult<()> {
        if self.public_at(x, group, field) == group.g_exp(claimed_value) {
            Ok(())
        } else {
            Err(EgError::ProofInvalid(
                "Shamir backup does not match published coefficient commitments".into(),
            ))
        }
    }

    /// `g^{P(x)} = prod_i K_i^{x^i}`, evaluated "in the exponent" purely
    /// from published commitments, without knowledge of `P` itself. Used
    /// to derive a guardian's public decryption share and, for a
    /// missing guardian, to cross-check a compensated reconstruction of
    /// its polynomial at an arbitrary point.
    pub fn public_at(&self, x: &FieldElement, group: &Group, field: &ScalarField) -> GroupElement {
        let mut acc = Group::one();
        let mut x_pow = ScalarField::one();
        for c in &self.commitments {
            acc = acc.mul(&c.public.exp(&x_pow, group), group);
            x_pow = x_pow.mul(x, field);
        }
        acc
    }
}

/// The Lagrange coefficient `w_i` such that `sum_i w_i * P(x_i) = P(0)`
/// for any `k` of the `(x_i, P(x_i))` points, where `x_i` ranges over
/// `present`'s sequence orders and `i` indexes `present[my_index]`.
pub fn lagrange_coefficient_at_zero(
    my_index: GuardianIndex,
    present: &[GuardianIndex],
    field: &ScalarField,
) -> EgResult<FieldElement> {
    let x_i = FieldElement::from_u64(u64::from(my_index.get()), field);
    let mut numerator = ScalarField::one();
    let mut denominator = ScalarField::one();
    let mut found_self = false;

    for &other in present {
        if other == my_index {
            found_self = true;
            continue;
        }
        let x_j = FieldElement::from_u64(u64::from(other.get()), field);
        numerator = numerator.mul(&x_j, field);
        denominator = denominator.mul(&x_j.sub(&x_i, field), field);
    }

    if !found_self {
        return Err(EgError::UnknownGuardian(my_index));
    }

    let denom_inv = denominator.inv(field).ok_or_else(|| {
        EgError::InvalidElement("degenerate Lagrange denominator (duplicate guardian index)".into())
    })?;
    Ok(numerator.mul(&denom_inv, field))
}
