// Copyright (C) 2026 The electionguard-core Authors.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::manual_assert)]

//! Canonical hashing of heterogeneous tuples into a 32-byte value and,
//! where the result feeds a Fiat-Shamir challenge or a derived nonce,
//! into `Z_q`.
//!
//! The exact encoding here is normative: two conforming implementations
//! of this protocol must produce byte-identical hashes for the same
//! logical input, or every cross-checked proof and every published hash
//! (manifest, commitment, extended base) silently diverges.

use sha2::{Digest, Sha256};
use util::algebra::{FieldElement, GroupElement, ScalarField};

pub const HVALUE_BYTE_LEN: usize = 32;
pub type HValueByteArray = [u8; HVALUE_BYTE_LEN];

/// A 32-byte output of [`eg_h`]. Used for `manifest_hash`,
/// `commitment_hash`, `crypto_base_hash`, `crypto_extended_base_hash`,
/// ballot/contest/selection hashes, and Fiat-Shamir challenges before
/// their final reduction mod `q`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub struct HValue(#[serde(with = "hvalue_hex")] pub HValueByteArray);

mod hvalue_hex {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &super::HValueByteArray, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(v))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<super::HValueByteArray, D::Error> {
        use serde::de::Error;
        let s = String::deserialize(d)?;
        let bytes = hex::decode(s.trim()).map_err(D::Error::custom)?;
        <super::HValueByteArray>::try_from(bytes.as_slice())
            .map_err(|_| D::Error::custom("HValue must be exactly 32 bytes"))
    }
}

impl HValue {
    pub fn as_bytes(&self) -> &HValueByteArray {
        &self.0
    }
}

impl AsRef<[u8]> for HValue {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for HValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode_upper(self.0))
    }
}

impl std::fmt::Display for HValue {
    /// Lowercase hex, matching the encoding used in serialized JSON.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl From<HValueByteArray> for HValue {
    fn from(value: HValueByteArray) -> Self {
        HValue(value)
    }
}

/// One argument to [`eg_h`]: numbers canonicalize to fixed-width
/// big-endian, byte strings to length-prefixed bytes, sequences join
/// their elements with `|`, and the absence of a value canonicalizes to
/// the literal `null`.
pub enum HashInput<'a> {
    Group(&'a GroupElement, &'a util::algebra::Group),
    Field(&'a FieldElement, &'a ScalarField),
    Bytes(&'a [u8]),
    HValue(&'a HValue),
    Seq(Vec<HashInput<'a>>),
    None,
}

impl<'a> HashInput<'a> {
    fn canonical_bytes(&self) -> Vec<u8> {
        match self {
            HashInput::Group(ge, group) => ge.to_be_bytes_left_pad(group),
            HashInput::Field(fe, field) => fe.to_be_bytes_left_pad(field),
            HashInput::Bytes(b) => {
                let mut v = (b.len() as u32).to_be_bytes().to_vec();
                v.extend_from_slice(b);
                v
            }
            HashInput::HValue(h) => h.0.to_vec(),
            HashInput::Seq(items) => {
                let mut v = Vec::new();
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        v.push(b'|');
                    }
                    v.extend(item.canonical_bytes());
                }
                v
            }
            HashInput::None => b"null".to_vec(),
        }
    }
}

/// Convenience constructor for a `Bytes` input from a UTF-8 string.
pub fn str_input(s: &str) -> HashInput<'_> {
    HashInput::Bytes(s.as_bytes())
}

/// ElectionGuard hash function `H`: `SHA-256(domain_separator || canon(x1)
/// || canon(x2) || ...)`.
///
/// `domain_separator` disambiguates the many call sites that hash
/// different logical things (manifest vs. commitment vs. a proof
/// challenge) so that no two of them can ever collide on the same input
/// bytes by coincidence of encoding.
pub fn eg_h(domain_separator: u8, items: &[HashInput<'_>]) -> HValue {
    let mut hasher = Sha256::new();
    hasher.update([domain_separator]);
    for item in items {
        hasher.update(item.canonical_bytes());
    }
    let digest = hasher.finalize();
    let mut out = [0u8; HVALUE_BYTE_LEN];
    out.copy_from_slice(&digest);
    HValue(out)
}

/// `H` reduced into `Z_q`: used wherever the hash output is a
/// Fiat-Shamir challenge or a nonce, both of which must be field
/// elements.
pub fn eg_h_q(domain_separator: u8, items: &[HashInput<'_>], field: &ScalarField) -> FieldElement {
    let hv = eg_h(domain_separator, items);
    FieldElement::from_bytes_be(hv.as_bytes(), field)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn eg_h_is_deterministic() {
        let a = eg_h(0x01, &[HashInput::Bytes(b"hello")]);
        let b = eg_h(0x01, &[HashInput::Bytes(b"hello")]);
        assert_eq!(a, b);
    }

    #[test]
    fn eg_h_distinguishes_domain_separators() {
        let a = eg_h(0x01, &[HashInput::Bytes(b"hello")]);
        let b = eg_h(0x02, &[HashInput::Bytes(b"hello")]);
        assert_ne!(a, b);
    }

    #[test]
    fn eg_h_distinguishes_sequence_boundaries() {
        // Without length-prefixing inside `Bytes`, "ab"+"c" and "a"+"bc"
        // could collide; the length prefix on each `Bytes` item prevents
        // that even though sequence items are '|'-joined.
        let a = eg_h(
            0x05,
            &[HashInput::Seq(vec![
                HashInput::Bytes(b"ab"),
                HashInput::Bytes(b"c"),
            ])],
        );
        let b = eg_h(
            0x05,
            &[HashInput::Seq(vec![
                HashInput::Bytes(b"a"),
                HashInput::Bytes(b"bc"),
            ])],
        );
        assert_ne!(a, b);
    }

    #[test]
    fn hvalue_serde_round_trip() {
        let hv = eg_h(0x09, &[HashInput::Bytes(b"round-trip")]);
        let json = serde_json::to_string(&hv).unwrap();
        let back: HValue = serde_json::from_str(&json).unwrap();
        assert_eq!(hv, back);
    }

    #[test]
    fn hvalue_display_is_lowercase_hex() {
        let hv = HValue([0xABu8; 32]);
        assert_eq!(hv.to_string(), "ab".repeat(32));
    }
}
