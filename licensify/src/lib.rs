//! Signed software licenses with offline verification.
//!
//! This crate handles:
//! - License data as an unordered set of string attributes
//! - Order-independent canonical hashing (SHA-256)
//! - RSA PKCS#1 v1.5 signing by the issuing authority
//! - Signature verification on untrusted devices, no network needed
//! - A stable JSON file format for distributing signed licenses
//!
//! # Design Principles
//!
//! - **Offline-first**: only the public key is needed to verify
//! - **Tamper-evident**: any change to a signed attribute invalidates it
//! - **No oracle**: every verification failure looks the same to the caller
//! - **Quiet**: library calls return errors, they never log or exit
//!
//! # Example
//!
//! ```no_run
//! use licensify::{License, Signer, keys, load_signature};
//!
//! # fn main() -> licensify::LicenseResult<()> {
//! let signer = Signer::new(keys::load_private_key("private.pem")?);
//!
//! let mut license = License::new();
//! license.set("id", "abc-123");
//! license.set("product", "Pro");
//!
//! signer.sign(&license)?.save("license.json")?;
//!
//! let verifier = licensify::Verifier::new(keys::load_public_key("public.pem")?);
//! verifier.verify(&load_signature("license.json")?)?;
//! # Ok(())
//! # }
//! ```

pub mod canonical;
mod error;
pub mod keys;
mod license;
mod signature;
mod signer;
mod verifier;

pub use canonical::DIGEST_SIZE;
pub use error::{LicenseError, LicenseResult};
pub use license::License;
pub use signature::{Signature, load_signature};
pub use signer::{MIN_MODULUS_BYTES, Signer};
pub use verifier::Verifier;

/// RSA key types accepted by [`Signer`] and [`Verifier`].
pub use rsa::{RsaPrivateKey, RsaPublicKey};
