//! Shared test helpers for license tests.

#![allow(dead_code)]

use licensify::{License, Signer, Verifier, keys};
use std::path::PathBuf;

/// PKCS#8 PEM of the 2048-bit issuing key used across tests.
pub const ISSUER_PRIVATE_PEM: &str = include_str!("../fixtures/issuer_private.pem");
/// PKIX PEM matching [`ISSUER_PRIVATE_PEM`].
pub const ISSUER_PUBLIC_PEM: &str = include_str!("../fixtures/issuer_public.pem");
/// PKIX PEM of an unrelated 2048-bit key.
pub const OTHER_PUBLIC_PEM: &str = include_str!("../fixtures/other_public.pem");
/// PKCS#8 PEM of an Ed25519 key (wrong algorithm).
pub const ED25519_PRIVATE_PEM: &str = include_str!("../fixtures/ed25519_private.pem");
/// SPKI PEM of an Ed25519 key (wrong algorithm).
pub const ED25519_PUBLIC_PEM: &str = include_str!("../fixtures/ed25519_public.pem");

/// Path of a file under `tests/fixtures`.
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Signer for the fixed issuing key.
pub fn issuer_signer() -> Signer {
    Signer::new(keys::private_key_from_pem(ISSUER_PRIVATE_PEM).unwrap())
}

/// Verifier for the fixed issuing key.
pub fn issuer_verifier() -> Verifier {
    Verifier::new(keys::public_key_from_pem(ISSUER_PUBLIC_PEM).unwrap())
}

/// Verifier for a key that did not sign anything.
pub fn other_verifier() -> Verifier {
    Verifier::new(keys::public_key_from_pem(OTHER_PUBLIC_PEM).unwrap())
}

/// The license used by the concrete scenarios: `{"id": "abc-123", "product": "Pro"}`.
pub fn sample_license() -> License {
    [("id", "abc-123"), ("product", "Pro")].into_iter().collect()
}

/// A license resembling one produced by an issuing backend.
pub fn full_license() -> License {
    let mut license = License::new();
    license.set("id", "44c4e2c6-c54e-46d9-be58-c174289b84b8");
    license.set("product", "Pro Version");
    license.set("expiry", "2026-03-11T00:00:00Z");
    license.set("seats", "5");
    license
}
