// Copyright (C) 2026 The electionguard-core Authors.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::manual_assert)]

//! The ElectionGuard cryptographic protocol engine: distributed key
//! ceremony, per-ballot encryption with NIZK proofs, homomorphic tally,
//! threshold decryption with compensation, the Benaloh challenge, and
//! ballot sanitization.
//!
//! Everything outside this crate — the HTTP façade, request validation,
//! session stores, persistent storage, and the at-rest credential KEM —
//! is an external collaborator with a narrow interface and is not
//! implemented here.

pub mod ballot;
pub mod ballot_box;
pub mod benaloh;
pub mod canonical;
pub mod context;
pub mod decryption;
pub mod discrete_log;
pub mod el_gamal;
pub mod errors;
pub mod fixed_parameters;
pub mod guardian;
pub mod hash;
pub mod key_ceremony;
pub mod manifest;
pub mod nizk;
pub mod polynomial;
pub mod sanitize;
pub mod tally;

pub use errors::{EgError, EgResult};
