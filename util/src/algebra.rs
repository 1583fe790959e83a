// Copyright (C) 2026 The electionguard-core Authors.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::manual_assert)]

//! Wrappers around [`BigUint`] that separate field (`Z_q`) and group
//! (`Z_p` subgroup of order `q`) elements in the type system, so that a
//! field exponent can never be passed where a group element was expected
//! and vice versa.

use std::num::NonZeroUsize;

use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};

use crate::{
    algebra_utils::{cnt_bits_repr, mod_inverse, to_be_bytes_left_pad},
    csrng::Csrng,
};

/// An element of the field `Z_q`, the scalar field used for nonces,
/// secret keys, and polynomial coefficients. Always `< q`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct FieldElement(#[serde(with = "crate::biguint_serde::biguint_hex")] BigUint);

/// The finite field `Z_q`, where `q` is prime.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScalarField {
    q: BigUint,
}

impl FieldElement {
    /// The value, guaranteed `< q` of whichever field produced it.
    pub fn value(&self) -> &BigUint {
        &self.0
    }

    pub fn add(&self, other: &FieldElement, field: &ScalarField) -> Self {
        FieldElement((&self.0 + &other.0) % &field.q)
    }

    pub fn sub(&self, other: &FieldElement, field: &ScalarField) -> Self {
        if self.0 >= other.0 {
            FieldElement((&self.0 - &other.0) % &field.q)
        } else {
            FieldElement((&field.q - (&other.0 - &self.0)) % &field.q)
        }
    }

    pub fn neg(&self, field: &ScalarField) -> Self {
        ScalarField::zero().sub(self, field)
    }

    pub fn mul(&self, other: &FieldElement, field: &ScalarField) -> Self {
        FieldElement((&self.0 * &other.0) % &field.q)
    }

    /// Multiplicative inverse, or `None` iff `self` is zero.
    pub fn inv(&self, field: &ScalarField) -> Option<Self> {
        mod_inverse(&self.0, &field.q).map(FieldElement)
    }

    pub fn pow(&self, exponent: &BigUint, field: &ScalarField) -> FieldElement {
        FieldElement(self.0.modpow(exponent, &field.q))
    }

    pub fn from_u64(x: u64, field: &ScalarField) -> Self {
        FieldElement(BigUint::from(x) % &field.q)
    }

    /// Reduces a big-endian byte string modulo `q`.
    pub fn from_bytes_be(bytes: &[u8], field: &ScalarField) -> Self {
        FieldElement(BigUint::from_bytes_be(bytes) % &field.q)
    }

    /// Big-endian encoding, left-padded to the field's canonical width
    /// (32 bytes for every parameter set this crate defines).
    pub fn to_be_bytes_left_pad(&self, field: &ScalarField) -> Vec<u8> {
        to_be_bytes_left_pad(&self.0, field.q_len_bytes())
    }

    pub fn is_zero(&self) -> bool {
        BigUint::is_zero(&self.0)
    }

    /// `0 <= self < q`.
    pub fn is_valid(&self, field: &ScalarField) -> bool {
        self.0 < field.q
    }
}

impl ScalarField {
    /// Builds a field from a modulus already known/trusted to be prime
    /// (the standard and compact parameter sets are fixed constants;
    /// nothing calls this with untrusted input).
    pub fn new_unchecked(q: BigUint) -> Self {
        ScalarField { q }
    }

    pub fn one() -> FieldElement {
        FieldElement(BigUint::one())
    }

    pub fn zero() -> FieldElement {
        FieldElement(BigUint::zero())
    }

    pub fn random_field_elem(&self, csrng: &dyn Csrng) -> FieldElement {
        FieldElement(csrng.next_biguint_lt(&self.q))
    }

    /// A random, *nonzero* field element. Used for guardian sequence
    /// orders and polynomial leading coefficients, where zero is
    /// disallowed by spec invariants.
    pub fn random_nonzero_field_elem(&self, csrng: &dyn Csrng) -> FieldElement {
        loop {
            let fe = self.random_field_elem(csrng);
            if !fe.is_zero() {
                return fe;
            }
        }
    }

    pub fn order(&self) -> &BigUint {
        &self.q
    }

    pub fn q_len_bytes(&self) -> usize {
        cnt_bits_repr(&self.q).div_ceil(8)
    }
}

//-------------------------------------------------------------------------------------------------|

/// An element of the order-`q` subgroup of `Z_p^*`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct GroupElement(#[serde(with = "crate::biguint_serde::biguint_hex")] BigUint);

/// The multiplicative group `Z_p^*` together with its distinguished
/// order-`q` subgroup generated by `g`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
    p: BigUint,
    q: BigUint,
    g: BigUint,
    r: BigUint,
}

impl GroupElement {
    pub fn value(&self) -> &BigUint {
        &self.0
    }

    pub fn mul(&self, other: &GroupElement, group: &Group) -> Self {
        GroupElement((&self.0 * &other.0) % &group.p)
    }

    pub fn exp(&self, exponent: &FieldElement, group: &Group) -> Self {
        GroupElement(self.0.modpow(exponent.value(), &group.p))
    }

    /// Raises to a raw (non-field-reduced) exponent. Used by Lagrange
    /// reconstruction, whose exponents are themselves field elements but
    /// sometimes arrive as plain `BigUint` sequence orders (`s_j`).
    pub fn exp_biguint(&self, exponent: &BigUint, group: &Group) -> Self {
        GroupElement(self.0.modpow(exponent, &group.p))
    }

    pub fn inv(&self, group: &Group) -> Self {
        // `self` is always a member of the order-`q` subgroup, so
        // `self^(q-1)` is its inverse; this never panics because
        // `mod_inverse` only fails when `gcd(self, p) != 1`, which would
        // mean `self` is not actually in `Z_p^*`.
        match mod_inverse(&self.0, &group.p) {
            Some(inv) => GroupElement(inv),
            None => GroupElement(BigUint::one()),
        }
    }

    pub fn is_valid(&self, group: &Group) -> bool {
        !self.0.is_zero() && self.0 < group.p && self.0.modpow(&group.q, &group.p).is_one()
    }

    pub fn to_be_bytes_left_pad(&self, group: &Group) -> Vec<u8> {
        to_be_bytes_left_pad(&self.0, group.p_len_bytes())
    }

    pub fn from_bytes_be(bytes: &[u8]) -> Self {
        GroupElement(BigUint::from_bytes_be(bytes))
    }
}

impl Group {
    /// Constructs group parameters. Callers are expected to have already
    /// validated `p`, `q`, `g` (this crate's two fixed parameter sets are
    /// checked once, in their unit tests, not on every construction).
    pub fn new_unchecked(p: BigUint, q: BigUint, g: BigUint, r: BigUint) -> Self {
        Group { p, q, g, r }
    }

    pub fn one() -> GroupElement {
        GroupElement(BigUint::one())
    }

    pub fn generator(&self) -> GroupElement {
        GroupElement(self.g.clone())
    }

    /// `g^x mod p`.
    pub fn g_exp(&self, x: &FieldElement) -> GroupElement {
        self.generator().exp(x, self)
    }

    pub fn p(&self) -> &BigUint {
        &self.p
    }

    pub fn q(&self) -> &BigUint {
        &self.q
    }

    pub fn cofactor(&self) -> &BigUint {
        &self.r
    }

    pub fn p_len_bytes(&self) -> usize {
        cnt_bits_repr(&self.p).div_ceil(8)
    }

    /// `true` iff `g^q == 1 mod p` and `g != 1`: the invariant every
    /// `Group` value must satisfy (spec §3 "Group parameters").
    pub fn generator_has_order_q(&self) -> bool {
        self.g != BigUint::one() && self.g.modpow(&self.q, &self.p).is_one()
    }
}

/// `q^bits` sized random field-less scalar, used only for Fiat-Shamir
/// commitment randomness where a raw nonzero bit-width value (not yet
/// reduced into a named field) is convenient. Kept here since it is
/// exercised by both [`FieldElement`] construction paths and by
/// polynomial evaluation call sites in `eg`.
pub fn random_bits(csrng: &dyn Csrng, bits: usize) -> BigUint {
    let bits = NonZeroUsize::new(bits).unwrap_or(NonZeroUsize::MIN);
    csrng.next_biguint(bits)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::csrng::DeterministicCsrng;

    fn toy_group() -> (Group, ScalarField) {
        // q=11 (prime), p=23=2*11+1 (prime), g=4 has order 11 in Z_23^*.
        let q = BigUint::from(11u32);
        let p = BigUint::from(23u32);
        let g = BigUint::from(4u32);
        let r = BigUint::from(2u32);
        (
            Group::new_unchecked(p, q.clone(), g, r),
            ScalarField::new_unchecked(q),
        )
    }

    #[test]
    fn generator_has_order_q() {
        let (group, _field) = toy_group();
        assert!(group.generator_has_order_q());
    }

    #[test]
    fn field_add_sub_roundtrip() {
        let (_group, field) = toy_group();
        let a = FieldElement::from_u64(7, &field);
        let b = FieldElement::from_u64(9, &field);
        let sum = a.add(&b, &field);
        assert_eq!(sum.sub(&b, &field), a);
    }

    #[test]
    fn field_inverse() {
        let (_group, field) = toy_group();
        for v in 1u64..11 {
            let a = FieldElement::from_u64(v, &field);
            let inv = a.inv(&field).unwrap();
            assert_eq!(a.mul(&inv, &field), ScalarField::one());
        }
    }

    #[test]
    fn group_exp_matches_repeated_mul() {
        let (group, field) = toy_group();
        let g = group.generator();
        let three = FieldElement::from_u64(3, &field);
        let expected = g.mul(&g, &group).mul(&g, &group);
        assert_eq!(g.exp(&three, &group), expected);
    }

    #[test]
    fn group_element_inverse() {
        let (group, field) = toy_group();
        let x = FieldElement::from_u64(5, &field);
        let gx = group.g_exp(&x);
        let gx_inv = gx.inv(&group);
        assert_eq!(gx.mul(&gx_inv, &group), Group::one());
    }

    #[test]
    fn random_field_elem_is_in_range() {
        let (_group, field) = toy_group();
        let csrng = DeterministicCsrng::from_seed_bytes(b"algebra-test");
        for _ in 0..50 {
            let fe = field.random_field_elem(&csrng);
            assert!(fe.is_valid(&field));
        }
    }
}
