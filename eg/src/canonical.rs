// Copyright (C) 2026 The electionguard-core Authors.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::manual_assert)]

//! Canonical byte serialization for composite artifacts.
//!
//! Every hash in this crate that is taken over a *composite* artifact
//! (the manifest, a contest, a ballot style) goes through
//! [`CanonicalEncoder`] first, so the hash input is a flat, unambiguous
//! byte string rather than whatever a `serde_json` formatter happens to
//! produce (which is explicitly not stable across implementations: key
//! order, whitespace, and number formatting all vary). Proof challenges
//! and nonce derivations, which hash small fixed tuples of field/group
//! elements, use [`crate::hash::eg_h`] directly instead — this module is
//! only for composite records.

use std::collections::BTreeMap;

/// Accumulates a canonical byte encoding.
#[derive(Default)]
pub struct CanonicalEncoder {
    buf: Vec<u8>,
}

impl CanonicalEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Unsigned big-endian, fixed width. Panics if `n` needs more bytes
    /// than `width` (a caller-side programmer error, e.g. passing a
    /// `u64` where a `u32` field was declared).
    pub fn put_uint_fixed_width(&mut self, n: u64, width: usize) {
        let full = n.to_be_bytes();
        assert!(width <= full.len(), "width larger than u64::BITS/8");
        let start = full.len() - width;
        // Ensure the truncated high bytes are actually zero.
        assert!(full[..start].iter().all(|b| *b == 0), "value does not fit in {width} bytes");
        self.buf.extend_from_slice(&full[start..]);
    }

    pub fn put_u32(&mut self, n: u32) {
        self.buf.extend_from_slice(&n.to_be_bytes());
    }

    /// Length-prefixed (4-byte BE) byte string.
    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.put_u32(bytes.len() as u32);
        self.buf.extend_from_slice(bytes);
    }

    /// UTF-8 string, then treated as a byte string.
    pub fn put_str(&mut self, s: &str) {
        self.put_bytes(s.as_bytes());
    }

    /// A sequence: length prefix, then each element encoded by `f`.
    pub fn put_seq<T>(&mut self, items: &[T], mut f: impl FnMut(&mut Self, &T)) {
        self.put_u32(items.len() as u32);
        for item in items {
            f(self, item);
        }
    }

    /// `None` → a single zero byte. `Some(v)` → `0x01` then `v` encoded
    /// by `f`.
    pub fn put_option<T>(&mut self, opt: &Option<T>, f: impl FnOnce(&mut Self, &T)) {
        match opt {
            None => self.buf.push(0x00),
            Some(v) => {
                self.buf.push(0x01);
                f(self, v);
            }
        }
    }

    /// A mapping, sorted by key bytes, as a flat key-then-value
    /// sequence.
    pub fn put_map<K, V>(
        &mut self,
        entries: &[(K, V)],
        key_bytes: impl Fn(&K) -> Vec<u8>,
        mut f: impl FnMut(&mut Self, &K, &V),
    ) {
        let mut sorted: Vec<&(K, V)> = entries.iter().collect();
        sorted.sort_by(|a, b| key_bytes(&a.0).cmp(&key_bytes(&b.0)));
        self.put_u32(sorted.len() as u32);
        for (k, v) in sorted {
            f(self, k, v);
        }
    }
}

/// Types that know how to append themselves to a [`CanonicalEncoder`].
pub trait CanonicalEncode {
    fn canonical_encode(&self, enc: &mut CanonicalEncoder);
}

/// Encodes `value` from scratch and returns the resulting bytes; the
/// common entry point used to feed [`crate::hash::eg_h`].
pub fn canonical_bytes<T: CanonicalEncode>(value: &T) -> Vec<u8> {
    let mut enc = CanonicalEncoder::new();
    value.canonical_encode(&mut enc);
    enc.into_bytes()
}

/// Sorts string keys by their raw UTF-8 bytes, the key-ordering rule
/// [`CanonicalEncoder::put_map`] needs.
pub fn sorted_by_key_bytes<V: Clone>(map: &BTreeMap<String, V>) -> Vec<(String, V)> {
    // `BTreeMap<String, _>` is already sorted by `Ord for String`, which
    // for ASCII/UTF-8 content agrees with byte-lexicographic order.
    map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn fixed_width_zero_pads() {
        let mut enc = CanonicalEncoder::new();
        enc.put_uint_fixed_width(5, 4);
        assert_eq!(enc.into_bytes(), vec![0, 0, 0, 5]);
    }

    #[test]
    fn bytes_are_length_prefixed() {
        let mut enc = CanonicalEncoder::new();
        enc.put_bytes(b"ab");
        assert_eq!(enc.into_bytes(), vec![0, 0, 0, 2, b'a', b'b']);
    }

    #[test]
    fn option_none_is_single_zero_byte() {
        let mut enc = CanonicalEncoder::new();
        enc.put_option::<u8>(&None, |e, v| e.put_uint_fixed_width(*v as u64, 1));
        assert_eq!(enc.into_bytes(), vec![0x00]);
    }

    #[test]
    fn option_some_is_tagged() {
        let mut enc = CanonicalEncoder::new();
        enc.put_option(&Some(7u8), |e, v| e.put_uint_fixed_width(*v as u64, 1));
        assert_eq!(enc.into_bytes(), vec![0x01, 7]);
    }

    #[test]
    fn sequence_boundaries_are_unambiguous() {
        let mut enc_a = CanonicalEncoder::new();
        enc_a.put_seq(&["ab", "c"], |e, s| e.put_str(s));
        let mut enc_b = CanonicalEncoder::new();
        enc_b.put_seq(&["a", "bc"], |e, s| e.put_str(s));
        assert_ne!(enc_a.into_bytes(), enc_b.into_bytes());
    }
}
