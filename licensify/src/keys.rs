//! Loading and exporting RSA key material.
//!
//! Private keys are PEM-armored PKCS#8 (`BEGIN PRIVATE KEY`), public keys
//! PEM-armored SubjectPublicKeyInfo (`BEGIN PUBLIC KEY`). Either may be
//! wrapped in standard base64 to travel as a single-line string (env vars,
//! config values).

use crate::error::{LicenseError, LicenseResult};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use rsa::pkcs8::{
    DecodePrivateKey, Document, EncodePrivateKey, EncodePublicKey, LineEnding,
    SubjectPublicKeyInfoRef,
};
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use std::fs;
use std::path::Path;

/// Default modulus size for newly generated keys.
pub const DEFAULT_KEY_BITS: usize = 2048;

/// Largest public modulus accepted when loading, in bits.
pub const MAX_KEY_BITS: usize = 16384;

const PUBLIC_KEY_LABEL: &str = "PUBLIC KEY";

/// Loads an RSA private key from a PKCS#8 PEM file.
pub fn load_private_key(path: impl AsRef<Path>) -> LicenseResult<RsaPrivateKey> {
    private_key_from_pem(&read_key_file(path.as_ref())?)
}

/// Loads an RSA public key from a PKIX PEM file.
pub fn load_public_key(path: impl AsRef<Path>) -> LicenseResult<RsaPublicKey> {
    public_key_from_pem(&read_key_file(path.as_ref())?)
}

/// Parses an RSA private key from PKCS#8 PEM text.
///
/// # Errors
///
/// Fails on malformed PEM framing, on non-PKCS#8 documents, and on PKCS#8
/// keys of another algorithm (e.g. Ed25519).
pub fn private_key_from_pem(pem: &str) -> LicenseResult<RsaPrivateKey> {
    RsaPrivateKey::from_pkcs8_pem(pem.trim())
        .map_err(|e| LicenseError::KeyLoad(format!("invalid PKCS#8 RSA private key: {e}")))
}

/// Parses an RSA public key from PKIX (SubjectPublicKeyInfo) PEM text.
///
/// Moduli up to [`MAX_KEY_BITS`] are accepted, so keys larger than the
/// 4096 bits `rsa` allows by default still load.
pub fn public_key_from_pem(pem: &str) -> LicenseResult<RsaPublicKey> {
    let (label, doc) = Document::from_pem(pem.trim()).map_err(public_key_error)?;
    if label != PUBLIC_KEY_LABEL {
        return Err(LicenseError::KeyLoad(format!(
            "invalid PKIX RSA public key: unexpected PEM label {label:?}"
        )));
    }

    let spki = SubjectPublicKeyInfoRef::try_from(doc.as_bytes()).map_err(public_key_error)?;
    spki.algorithm
        .assert_algorithm_oid(rsa::pkcs1::ALGORITHM_OID)
        .map_err(public_key_error)?;

    let bits = spki
        .subject_public_key
        .as_bytes()
        .ok_or_else(|| public_key_error("unaligned bit string"))?;
    let pkcs1 = rsa::pkcs1::RsaPublicKey::try_from(bits).map_err(public_key_error)?;

    RsaPublicKey::new_with_max_size(
        BigUint::from_bytes_be(pkcs1.modulus.as_bytes()),
        BigUint::from_bytes_be(pkcs1.public_exponent.as_bytes()),
        MAX_KEY_BITS,
    )
    .map_err(public_key_error)
}

/// Parses an RSA private key from base64-wrapped PKCS#8 PEM.
pub fn private_key_from_base64(value: &str) -> LicenseResult<RsaPrivateKey> {
    private_key_from_pem(&decode_base64_pem(value)?)
}

/// Parses an RSA public key from base64-wrapped PKIX PEM.
pub fn public_key_from_base64(value: &str) -> LicenseResult<RsaPublicKey> {
    public_key_from_pem(&decode_base64_pem(value)?)
}

/// Generates a fresh RSA private key using the OS random source.
pub fn generate_private_key(bits: usize) -> LicenseResult<RsaPrivateKey> {
    RsaPrivateKey::new(&mut rand::rngs::OsRng, bits)
        .map_err(|e| LicenseError::KeyLoad(format!("key generation failed: {e}")))
}

/// Encodes a private key as PKCS#8 PEM with LF line endings.
pub fn private_key_to_pem(key: &RsaPrivateKey) -> LicenseResult<String> {
    key.to_pkcs8_pem(LineEnding::LF)
        .map(|pem| pem.to_string())
        .map_err(|e| LicenseError::KeyLoad(format!("failed to encode private key: {e}")))
}

/// Encodes a public key as PKIX PEM with LF line endings.
pub fn public_key_to_pem(key: &RsaPublicKey) -> LicenseResult<String> {
    key.to_public_key_pem(LineEnding::LF)
        .map_err(|e| LicenseError::KeyLoad(format!("failed to encode public key: {e}")))
}

/// Encodes a private key as single-line base64-wrapped PEM.
pub fn private_key_to_base64(key: &RsaPrivateKey) -> LicenseResult<String> {
    Ok(BASE64.encode(private_key_to_pem(key)?))
}

/// Encodes a public key as single-line base64-wrapped PEM.
pub fn public_key_to_base64(key: &RsaPublicKey) -> LicenseResult<String> {
    Ok(BASE64.encode(public_key_to_pem(key)?))
}

fn read_key_file(path: &Path) -> LicenseResult<String> {
    fs::read_to_string(path)
        .map_err(|e| LicenseError::KeyLoad(format!("cannot read {}: {e}", path.display())))
}

fn public_key_error(e: impl std::fmt::Display) -> LicenseError {
    LicenseError::KeyLoad(format!("invalid PKIX RSA public key: {e}"))
}

fn decode_base64_pem(value: &str) -> LicenseResult<String> {
    let bytes = BASE64
        .decode(value.trim())
        .map_err(|e| LicenseError::KeyLoad(format!("invalid base64: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| LicenseError::KeyLoad(format!("decoded key is not UTF-8: {e}")))
}
