// Copyright (C) 2026 The electionguard-core Authors.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::manual_assert)]

//! `serde` helpers for encoding [`num_bigint::BigUint`] values as
//! uppercase hex strings of a fixed byte width, so JSON artifacts carry a
//! canonical, length-stable representation rather than a decimal string
//! of varying length (spec §9 "String-typed big integers").

use num_bigint::BigUint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::algebra_utils::to_be_bytes_left_pad;

/// Serializes bytes as a string of uppercase hex digits.
pub fn serialize_bytes_as_uppercase_hex<S, B>(bytes: B, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    B: AsRef<[u8]>,
{
    hex::encode_upper(bytes).serialize(serializer)
}

/// Decodes a string of hex digits (either case) into raw bytes.
pub fn deserialize_hex_bytes<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let s = String::deserialize(deserializer)?;
    hex::decode(s.trim()).map_err(D::Error::custom)
}

/// Serializes a [`BigUint`] as an uppercase hex string left-padded to
/// `byte_len` bytes.
pub fn serialize_biguint_fixed_width<S>(
    byte_len: usize,
) -> impl Fn(&BigUint, S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    move |n, serializer| {
        let bytes = to_be_bytes_left_pad(n, byte_len);
        serialize_bytes_as_uppercase_hex(bytes, serializer)
    }
}

/// Decodes a [`BigUint`] from a hex string of any length.
pub fn deserialize_biguint<'de, D>(deserializer: D) -> Result<BigUint, D::Error>
where
    D: Deserializer<'de>,
{
    let bytes = deserialize_hex_bytes(deserializer)?;
    Ok(BigUint::from_bytes_be(&bytes))
}

/// `#[serde(with = "...")]` target for a bare [`BigUint`] field: hex
/// string, unpadded. The one canonical wire form for field/group
/// elements (spec §9 "String-typed big integers" — a reimplementation
/// must pick a single form and reject the other); every artifact in
/// this crate that embeds a `BigUint` uses this rather than accepting
/// both a JSON string and a JSON object for the same value.
pub mod biguint_hex {
    use super::{deserialize_biguint, serialize_bytes_as_uppercase_hex};
    use num_bigint::BigUint;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(n: &BigUint, s: S) -> Result<S::Ok, S::Error> {
        serialize_bytes_as_uppercase_hex(n.to_bytes_be(), s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<BigUint, D::Error> {
        deserialize_biguint(d)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let bytes = [0xDE, 0xAD, 0xBE, 0xEF];
        let s = hex::encode_upper(bytes);
        assert_eq!(s, "DEADBEEF");
        assert_eq!(hex::decode(s).unwrap(), bytes);
    }
}
