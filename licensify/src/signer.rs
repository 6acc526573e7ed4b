//! License signing with an RSA private key.

use crate::canonical;
use crate::error::{LicenseError, LicenseResult};
use crate::license::License;
use crate::signature::Signature;
use crate::verifier::Verifier;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use rand::{CryptoRng, RngCore};
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

/// Smallest modulus, in bytes, that fits a PKCS#1 v1.5 SHA-256 signature:
/// 11 bytes of padding overhead, the 19-byte DigestInfo prefix and the
/// 32-byte digest.
pub const MIN_MODULUS_BYTES: usize = 11 + 19 + canonical::DIGEST_SIZE;

/// Signs licenses with an RSA private key.
///
/// Lives with the issuing authority. The produced [`Signature`] can be
/// handed to client devices or untrusted infrastructure and checked there
/// with a [`Verifier`].
#[derive(Clone)]
pub struct Signer {
    private_key: RsaPrivateKey,
}

impl Signer {
    /// Creates a signer for the given private key.
    #[must_use]
    pub fn new(private_key: RsaPrivateKey) -> Self {
        Self { private_key }
    }

    /// Signs a license using the OS random source for blinding.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Signing`] if the key is too small for a
    /// PKCS#1 v1.5 SHA-256 signature or the RSA operation fails.
    pub fn sign(&self, license: &License) -> LicenseResult<Signature> {
        self.sign_with_rng(&mut rand::rngs::OsRng, license)
    }

    /// Signs a license with a caller-supplied random source.
    ///
    /// PKCS#1 v1.5 signatures are deterministic for a given key and digest;
    /// the randomness only blinds the private-key operation.
    pub fn sign_with_rng<R>(&self, rng: &mut R, license: &License) -> LicenseResult<Signature>
    where
        R: CryptoRng + RngCore,
    {
        let modulus_bytes = self.private_key.size();
        if modulus_bytes < MIN_MODULUS_BYTES {
            return Err(LicenseError::Signing(format!(
                "{}-bit key is too small, need at least {} bits",
                self.key_bits(),
                MIN_MODULUS_BYTES * 8
            )));
        }

        let digest = canonical::digest(license);
        let raw = self
            .private_key
            .sign_with_rng(rng, Pkcs1v15Sign::new::<Sha256>(), &digest)
            .map_err(|e| LicenseError::Signing(e.to_string()))?;

        Ok(Signature::from_parts(license.clone(), BASE64.encode(raw)))
    }

    /// Returns the public half of the signing key.
    #[must_use]
    pub fn public_key(&self) -> RsaPublicKey {
        self.private_key.to_public_key()
    }

    /// Returns a verifier for signatures produced by this signer.
    #[must_use]
    pub fn verifier(&self) -> Verifier {
        Verifier::new(self.public_key())
    }

    /// Returns the modulus size in bits.
    #[must_use]
    pub fn key_bits(&self) -> usize {
        self.private_key.n().bits()
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("key_bits", &self.key_bits())
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}
