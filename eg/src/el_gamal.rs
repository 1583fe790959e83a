// Copyright (C) 2026 The electionguard-core Authors.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::manual_assert)]

//! Exponential ElGamal over the order-`q` subgroup.
//!
//! A plaintext `m` is encrypted as `(alpha, beta) = (g^R, K^R * g^m)`.
//! This is "exponential" ElGamal: the message lives in the exponent, not
//! the group element itself, which is what makes the scheme additively
//! homomorphic ([`Ciphertext::add`]) at the cost of requiring a bounded
//! discrete-log search to recover `m` on decryption
//! ([`crate::discrete_log`]).

use serde::{Deserialize, Serialize};

use util::algebra::{FieldElement, Group, GroupElement, ScalarField};

use crate::{
    discrete_log,
    errors::{EgError, EgResult},
    fixed_parameters::FixedParameters,
};

/// The joint (or a single guardian's) ElGamal public key `K = g^secret`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElGamalPublicKey(pub GroupElement);

impl ElGamalPublicKey {
    pub fn group_element(&self) -> &GroupElement {
        &self.0
    }
}

/// An ElGamal secret key / exponent. Overwritten with zero on drop,
/// never serialized.
#[derive(Clone)]
pub struct ElGamalSecretKey(pub FieldElement);

impl ElGamalSecretKey {
    pub fn public_key(&self, group: &Group) -> ElGamalPublicKey {
        ElGamalPublicKey(group.g_exp(&self.0))
    }
}

impl Drop for ElGamalSecretKey {
    fn drop(&mut self) {
        self.0 = ScalarField::zero();
    }
}

/// `(alpha, beta) = (g^R, K^R * g^m)`: an encryption of the exponent `m`
/// under nonce `R` and public key `K`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ciphertext {
    pub alpha: GroupElement,
    pub beta: GroupElement,
}

impl Ciphertext {
    /// The neutral element of component-wise multiplication: an
    /// encryption of `0` under nonce `0`. Used as the starting
    /// accumulator for homomorphic tallying; an empty selection product
    /// is this identity.
    pub fn identity() -> Self {
        Ciphertext {
            alpha: Group::one(),
            beta: Group::one(),
        }
    }

    /// `Enc(m, R, K) = (g^R, K^R * g^m)`.
    pub fn encrypt(
        m: u64,
        nonce: &FieldElement,
        pub_key: &ElGamalPublicKey,
        fixed_parameters: &FixedParameters,
    ) -> Self {
        let group = &fixed_parameters.group;
        let field = &fixed_parameters.field;
        let alpha = group.g_exp(nonce);
        let k_to_r = pub_key.0.exp(nonce, group);
        let g_to_m = group.g_exp(&FieldElement::from_u64(m, field));
        let beta = k_to_r.mul(&g_to_m, group);
        Ciphertext { alpha, beta }
    }

    /// Component-wise product: `(a1*a2, b1*b2)`. Encrypts `m1 + m2`
    /// under the same key when `self` encrypts `m1` and `other`
    /// encrypts `m2`.
    pub fn add(&self, other: &Ciphertext, group: &Group) -> Self {
        Ciphertext {
            alpha: self.alpha.mul(&other.alpha, group),
            beta: self.beta.mul(&other.beta, group),
        }
    }

    /// Raises both components to `factor`: scales the encrypted value by
    /// `factor` without decrypting it. Used to apply a Lagrange
    /// coefficient to a decryption share.
    pub fn scale(&self, factor: &FieldElement, group: &Group) -> Self {
        Ciphertext {
            alpha: self.alpha.exp(factor, group),
            beta: self.beta.exp(factor, group),
        }
    }

    /// Decrypts given the known secret key, via `M = alpha^secret`, then
    /// solves `beta * M^-1 = g^m` for `m` over `[0, bound]`.
    pub fn decrypt_known_secret(
        &self,
        secret: &ElGamalSecretKey,
        fixed_parameters: &FixedParameters,
        bound: u64,
    ) -> EgResult<u64> {
        let m_factor = self.alpha.exp(&secret.0, &fixed_parameters.group);
        self.decrypt_known_product(&m_factor, fixed_parameters, bound)
    }

    /// Decrypts given the combined decryption factor `M`.
    pub fn decrypt_known_product(
        &self,
        m_factor: &GroupElement,
        fixed_parameters: &FixedParameters,
        bound: u64,
    ) -> EgResult<u64> {
        let m_factor_inv = m_factor.inv(&fixed_parameters.group);
        let target = self.beta.mul(&m_factor_inv, &fixed_parameters.group);
        discrete_log::solve_discrete_log(&fixed_parameters.group, &target, bound)
    }

    /// Decrypts given the nonce `R` the ciphertext was produced with, by
    /// computing `beta * (K^R)^-1 = g^m`. Used by the Benaloh challenge
    /// and by the audited-ballot fast path, where the voter or auditor
    /// holds the nonce rather than any secret key.
    pub fn decrypt_known_nonce(
        &self,
        nonce: &FieldElement,
        pub_key: &ElGamalPublicKey,
        fixed_parameters: &FixedParameters,
        bound: u64,
    ) -> EgResult<u64> {
        let k_to_r = pub_key.0.exp(nonce, &fixed_parameters.group);
        self.decrypt_known_product(&k_to_r, fixed_parameters, bound)
    }

    /// `true` iff both components are members of the order-`q`
    /// subgroup.
    pub fn is_valid(&self, group: &Group) -> bool {
        self.alpha.is_valid(group) && self.beta.is_valid(group)
    }
}

/// Validates a ciphertext read from outside this crate (e.g. a
/// submitted ballot); the only place `InvalidElement` is raised for
/// ciphertext components, since every ciphertext this crate itself
/// produces is guaranteed valid by construction.
pub fn validate_ciphertext(ct: &Ciphertext, group: &Group) -> EgResult<()> {
    if ct.is_valid(group) {
        Ok(())
    } else {
        Err(EgError::InvalidElement(
            "ciphertext component is not a member of the order-q subgroup".into(),
        ))
    }
}
