// Copyright (C) 2026 The electionguard-core Authors.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::manual_assert)]

//! Exhaustive discrete-log table lookup.
//!
//! ElectionGuard never needs a *general* discrete log: every quantity
//! decrypted this way is a vote count, bounded above by the number of
//! cast ballots (or, for a single selection's tally, by the number of
//! cast ballots times 1). So `m` is found by building the table
//! `{g^0, g^1, ..., g^bound}` once and looking up `target` in it, rather
//! than running Pollard's rho or baby-step/giant-step.

use util::algebra::{FieldElement, Group, GroupElement, ScalarField};

use crate::errors::{EgError, EgResult};

/// A discrete-log table for a fixed group, good for any `target` known
/// in advance to correspond to an exponent `<= bound`.
pub struct DiscreteLogTable {
    /// `powers[i] == g^i`.
    powers: Vec<GroupElement>,
}

impl DiscreteLogTable {
    /// Builds the table `g^0 .. g^bound` inclusive.
    pub fn build(group: &Group, bound: u64) -> Self {
        let mut powers = Vec::with_capacity(bound as usize + 1);
        let mut cur = Group::one();
        powers.push(cur.clone());
        let g = group.generator();
        for _ in 0..bound {
            cur = cur.mul(&g, group);
            powers.push(cur.clone());
        }
        DiscreteLogTable { powers }
    }

    /// Finds `m` such that `g^m == target`, `0 <= m <= bound`.
    pub fn solve(&self, target: &GroupElement) -> EgResult<u64> {
        self.powers
            .iter()
            .position(|p| p == target)
            .map(|m| m as u64)
            .ok_or(EgError::RangeExceeded {
                bound: (self.powers.len() - 1) as u64,
            })
    }
}

/// Convenience one-shot solve without retaining a table; builds a table
/// of size `bound + 1` each call, so prefer [`DiscreteLogTable`] when
/// solving many targets against the same bound (the tally and
/// decryption mediator do).
pub fn solve_discrete_log(group: &Group, target: &GroupElement, bound: u64) -> EgResult<u64> {
    DiscreteLogTable::build(group, bound).solve(target)
}

/// `g^m mod p` for a small non-negative integer `m`, the inverse
/// operation of [`solve_discrete_log`].
pub fn g_pow(group: &Group, field: &ScalarField, m: u64) -> GroupElement {
    group.g_exp(&FieldElement::from_u64(m, field))
}
