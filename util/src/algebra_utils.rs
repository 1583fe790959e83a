// Copyright (C) 2026 The electionguard-core Authors.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::manual_assert)]

//! Small numeric helpers shared by [`crate::algebra`].

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::csrng::Csrng;

/// Number of bits required to represent `n`. `0` requires `1` bit, by
/// convention, so callers never have to special-case it.
pub fn cnt_bits_repr(n: &BigUint) -> usize {
    if n.is_zero() { 1 } else { n.bits() as usize }
}

/// Big-endian encoding of `n`, left-padded with zero bytes to exactly `len`
/// bytes. Panics only if `n` does not fit in `len` bytes, which indicates a
/// programmer error (a field/group element wider than its declared width).
pub fn to_be_bytes_left_pad(n: &BigUint, len: usize) -> Vec<u8> {
    let mut v = n.to_bytes_be();
    assert!(v.len() <= len, "value does not fit in {len} bytes");
    if v.len() < len {
        let pad = len - v.len();
        let mut padded = vec![0u8; pad];
        padded.append(&mut v);
        v = padded;
    }
    v
}

/// Modular multiplicative inverse of `a` modulo `m`, via the extended
/// Euclidean algorithm. Returns `None` iff `gcd(a, m) != 1`.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    if m.is_zero() {
        return None;
    }
    let (g, x, _y) = extended_gcd(&BigInt::from(a.clone()), &BigInt::from(m.clone()));
    if g != BigInt::one() {
        return None;
    }
    let m_big = BigInt::from(m.clone());
    let x = ((x % &m_big) + &m_big) % &m_big;
    let (sign, mag) = x.into_parts();
    debug_assert!(sign != Sign::Minus);
    Some(mag)
}

/// Returns `(gcd, x, y)` such that `a*x + b*y == gcd`.
fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    if b.is_zero() {
        (a.clone(), BigInt::one(), BigInt::zero())
    } else {
        let (q, r) = a.div_rem(b);
        let (g, x1, y1) = extended_gcd(b, &r);
        (g, y1.clone(), x1 - q * y1)
    }
}

/// Probabilistic (Miller-Rabin, `rounds` iterations) primality test. Used
/// only to validate caller-supplied group parameters, never on a hot path.
pub fn is_prime(n: &BigUint, rounds: usize, csrng: &dyn Csrng) -> bool {
    if *n < BigUint::from(2u8) {
        return false;
    }
    for small in [2u8, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31] {
        let small = BigUint::from(small);
        if *n == small {
            return true;
        }
        if (n % &small).is_zero() {
            return false;
        }
    }

    // n - 1 = 2^s * d, d odd.
    let one = BigUint::one();
    let n_minus_one = n - &one;
    let mut d = n_minus_one.clone();
    let mut s = 0u64;
    while (&d % 2u8).is_zero() {
        d /= 2u8;
        s += 1;
    }

    'witness: for _ in 0..rounds {
        let a = csrng.next_biguint_range(&BigUint::from(2u8), &(n - &one));
        let mut x = a.modpow(&d, n);
        if x == one || x == n_minus_one {
            continue;
        }
        for _ in 0..s.saturating_sub(1) {
            x = x.modpow(&BigUint::from(2u8), n);
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csrng::DeterministicCsrng;

    #[test]
    fn mod_inverse_round_trips() {
        let m = BigUint::from(97u32);
        for a in 1u32..97 {
            let a = BigUint::from(a);
            let inv = mod_inverse(&a, &m).unwrap_or_else(|| panic!("{a} should be invertible"));
            assert_eq!((&a * &inv) % &m, BigUint::one());
        }
    }

    #[test]
    fn to_be_bytes_left_pad_pads() {
        let n = BigUint::from(1u8);
        assert_eq!(to_be_bytes_left_pad(&n, 4), vec![0, 0, 0, 1]);
    }

    #[test]
    fn is_prime_known_values() {
        let csrng = DeterministicCsrng::from_seed_bytes(b"primetest");
        assert!(is_prime(&BigUint::from(2u32), 20, &csrng));
        assert!(is_prime(&BigUint::from(97u32), 20, &csrng));
        assert!(!is_prime(&BigUint::from(98u32), 20, &csrng));
        assert!(is_prime(&BigUint::from(65537u32), 20, &csrng));
    }
}
