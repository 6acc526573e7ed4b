//! Shared helpers for CLI and HTTP tests.

#![allow(dead_code)]

use licensify::{License, Signer, Verifier, keys};

pub const ISSUER_PRIVATE_PEM: &str =
    include_str!("../../../licensify/tests/fixtures/issuer_private.pem");
pub const ISSUER_PUBLIC_PEM: &str =
    include_str!("../../../licensify/tests/fixtures/issuer_public.pem");
pub const OTHER_PUBLIC_PEM: &str =
    include_str!("../../../licensify/tests/fixtures/other_public.pem");

pub fn issuer_signer() -> Signer {
    Signer::new(keys::private_key_from_pem(ISSUER_PRIVATE_PEM).unwrap())
}

pub fn issuer_verifier() -> Verifier {
    Verifier::new(keys::public_key_from_pem(ISSUER_PUBLIC_PEM).unwrap())
}

pub fn other_verifier() -> Verifier {
    Verifier::new(keys::public_key_from_pem(OTHER_PUBLIC_PEM).unwrap())
}

pub fn sample_license() -> License {
    [("id", "abc-123"), ("product", "Pro")].into_iter().collect()
}
