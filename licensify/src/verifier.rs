//! License verification with an RSA public key.

use crate::canonical;
use crate::error::{LicenseError, LicenseResult};
use crate::signature::Signature;
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Sign, RsaPublicKey};
use sha2::Sha256;

/// Verifies license signatures against an RSA public key.
///
/// Meant for client code running on untrusted devices or infrastructure.
/// Holds no mutable state and can be shared across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verifier {
    public_key: RsaPublicKey,
}

impl Verifier {
    /// Creates a verifier for the given public key.
    #[must_use]
    pub fn new(public_key: RsaPublicKey) -> Self {
        Self { public_key }
    }

    /// Checks that `signature` was issued by the matching private key over
    /// exactly the license it carries.
    ///
    /// Both the current canonical digest and the first-generation one
    /// ([`canonical::legacy_digest`]) are accepted; each covers the same
    /// attribute content.
    ///
    /// # Errors
    ///
    /// - [`LicenseError::Encoding`] if the signature text is not valid base64.
    /// - [`LicenseError::InvalidSignature`] for any cryptographic failure:
    ///   tampered attributes, a different key, or corrupted signature bytes.
    ///
    /// Callers must treat every error as "untrusted".
    pub fn verify(&self, signature: &Signature) -> LicenseResult<()> {
        let raw = signature.decoded()?;
        let license = signature.license();

        let current = canonical::digest(license);
        if self.check(&current, &raw) {
            return Ok(());
        }

        let legacy = canonical::legacy_digest(license);
        if legacy != current && self.check(&legacy, &raw) {
            return Ok(());
        }

        Err(LicenseError::InvalidSignature)
    }

    fn check(&self, digest: &[u8], raw: &[u8]) -> bool {
        self.public_key
            .verify(Pkcs1v15Sign::new::<Sha256>(), digest, raw)
            .is_ok()
    }

    /// Returns the public key.
    #[must_use]
    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }

    /// Returns the modulus size in bits.
    #[must_use]
    pub fn key_bits(&self) -> usize {
        self.public_key.n().bits()
    }
}
