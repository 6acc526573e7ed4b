//! The work behind each CLI subcommand.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use licensify::{
    License, LicenseError, RsaPrivateKey, RsaPublicKey, Signature, Signer, Verifier, canonical,
    keys, load_signature,
};
use tracing::{debug, info, warn};

/// File name of the private key written by [`keygen`].
pub const PRIVATE_KEY_FILE: &str = "private.pem";
/// File name of the public key written by [`keygen`].
pub const PUBLIC_KEY_FILE: &str = "public.pem";

/// Where a key comes from: a PEM file, or base64-wrapped PEM given inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    Path(PathBuf),
    Base64(String),
}

impl KeySource {
    /// Picks whichever of the two forms was supplied.
    pub fn from_args(path: Option<PathBuf>, base64: Option<String>) -> Result<Self> {
        match (path, base64) {
            (Some(path), None) => Ok(Self::Path(path)),
            (None, Some(value)) => Ok(Self::Base64(value)),
            (Some(_), Some(_)) => bail!("give either a key file or an inline base64 key, not both"),
            (None, None) => bail!("no key given"),
        }
    }

    pub fn load_private(&self) -> Result<RsaPrivateKey> {
        let key = match self {
            Self::Path(path) => keys::load_private_key(path),
            Self::Base64(value) => keys::private_key_from_base64(value),
        };
        key.context("Failed to load private key")
    }

    pub fn load_public(&self) -> Result<RsaPublicKey> {
        let key = match self {
            Self::Path(path) => keys::load_public_key(path),
            Self::Base64(value) => keys::public_key_from_base64(value),
        };
        key.context("Failed to load public key")
    }
}

/// Parses a `KEY=VALUE` command line attribute.
pub fn parse_attribute(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got {raw:?}")),
    }
}

/// Assembles a license from attributes, optionally assigning a random `id`.
pub fn build_license(attributes: Vec<(String, String)>, with_id: bool) -> License {
    let mut license: License = attributes.into_iter().collect();
    if with_id && !license.contains_key("id") {
        license.set("id", uuid::Uuid::new_v4().to_string());
    }
    license
}

/// Generates a key pair and writes `private.pem` and `public.pem` into `out_dir`.
///
/// Refuses to replace an existing private key.
pub fn keygen(out_dir: &Path, bits: usize) -> Result<(PathBuf, PathBuf)> {
    let private_path = out_dir.join(PRIVATE_KEY_FILE);
    let public_path = out_dir.join(PUBLIC_KEY_FILE);
    if private_path.exists() {
        bail!("{} already exists", private_path.display());
    }

    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    info!("Generating {}-bit RSA key pair", bits);
    let private = keys::generate_private_key(bits)?;
    let public = private.to_public_key();

    fs::write(&private_path, keys::private_key_to_pem(&private)?)
        .context("Failed to write private key")?;
    fs::write(&public_path, keys::public_key_to_pem(&public)?)
        .context("Failed to write public key")?;

    info!("Wrote {} and {}", private_path.display(), public_path.display());
    Ok((private_path, public_path))
}

/// Signs `license` and saves the signature file at `out`.
pub fn sign(key: &KeySource, license: &License, out: &Path) -> Result<Signature> {
    if canonical::has_reserved_chars(license) {
        warn!("Attributes contain ':' or ','; the signed form may be ambiguous");
    }

    let signer = Signer::new(key.load_private()?);
    debug!("Signing with {}-bit key", signer.key_bits());
    let signature = signer.sign(license)?;

    signature
        .save(out)
        .with_context(|| format!("Failed to write {}", out.display()))?;
    info!("Signed license written to {}", out.display());
    Ok(signature)
}

/// Verifies the signature file at `path`.
///
/// Returns `Ok(false)` for any signature that does not check out; errors
/// are reserved for keys or files that cannot be loaded at all.
pub fn verify(key: &KeySource, path: &Path) -> Result<bool> {
    let verifier = Verifier::new(key.load_public()?);
    let signature =
        load_signature(path).with_context(|| format!("Failed to load {}", path.display()))?;

    match verifier.verify(&signature) {
        Ok(()) => Ok(true),
        Err(LicenseError::InvalidSignature | LicenseError::Encoding(_)) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// What `inspect` reports about a signature file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection {
    pub attributes: BTreeMap<String, String>,
    pub digest_hex: String,
    pub ambiguous: bool,
}

/// Reads a signature file without verifying it.
pub fn inspect(path: &Path) -> Result<Inspection> {
    let signature =
        load_signature(path).with_context(|| format!("Failed to load {}", path.display()))?;
    let license = signature.license();

    Ok(Inspection {
        attributes: license
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        digest_hex: hex::encode(license.digest()),
        ambiguous: canonical::has_reserved_chars(license),
    })
}
