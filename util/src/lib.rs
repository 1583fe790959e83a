// Copyright (C) 2026 The electionguard-core Authors.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::manual_assert)]

//! Group/field arithmetic and small shared utilities used throughout the
//! `eg` crate. Kept free of any election-domain knowledge.

pub mod algebra;
pub mod algebra_utils;
pub mod biguint_serde;
pub mod csrng;
