//! Signed licenses and their persisted form.
//!
//! A signature file is a JSON document with two fields:
//!
//! ```json
//! {"sig": "<base64 RSA signature>", "license": {"id": "abc-123", "product": "Pro"}}
//! ```
//!
//! The layout matches the files written by earlier issuers and must stay
//! stable. Field order is not significant.

use crate::error::{LicenseError, LicenseResult};
use crate::license::License;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// A license together with the RSA signature over its canonical digest.
///
/// Self-contained: everything needed for verification except the public
/// key. Contains no secret material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SignatureDocument")]
pub struct Signature {
    sig: String,
    license: License,
}

/// Unvalidated wire form, checked on the way into [`Signature`].
#[derive(Deserialize)]
struct SignatureDocument {
    sig: String,
    license: License,
}

impl TryFrom<SignatureDocument> for Signature {
    type Error = String;

    fn try_from(doc: SignatureDocument) -> Result<Self, Self::Error> {
        if doc.sig.trim().is_empty() {
            return Err("signature field is empty".to_string());
        }
        Ok(Self {
            sig: doc.sig,
            license: doc.license,
        })
    }
}

impl Signature {
    /// Assembles a signature from a license and base64 signature text.
    ///
    /// No check is made here; pass the result to a verifier.
    #[must_use]
    pub fn from_parts(license: License, sig: impl Into<String>) -> Self {
        Self {
            sig: sig.into(),
            license,
        }
    }

    /// Returns the base64-encoded signature bytes.
    #[must_use]
    pub fn sig(&self) -> &str {
        &self.sig
    }

    /// Returns the signed license.
    #[must_use]
    pub fn license(&self) -> &License {
        &self.license
    }

    /// Splits into the license and the signature text.
    #[must_use]
    pub fn into_parts(self) -> (License, String) {
        (self.license, self.sig)
    }

    /// Decodes the signature text into raw RSA signature bytes.
    ///
    /// Strict standard base64: embedded or surrounding whitespace is an error.
    pub(crate) fn decoded(&self) -> LicenseResult<Vec<u8>> {
        if self.sig.trim().is_empty() {
            return Err(LicenseError::Encoding("signature field is empty".to_string()));
        }
        BASE64
            .decode(&self.sig)
            .map_err(|e| LicenseError::Encoding(format!("invalid signature base64: {e}")))
    }

    /// Serializes to a JSON string.
    pub fn to_json(&self) -> LicenseResult<String> {
        serde_json::to_string(self)
            .map_err(|e| LicenseError::Encoding(format!("failed to serialize signature: {e}")))
    }

    /// Parses a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Encoding`] for malformed JSON, missing
    /// fields, or an empty `sig` field.
    pub fn from_json(json: &str) -> LicenseResult<Self> {
        serde_json::from_str(json).map_err(parse_error)
    }

    /// Writes the JSON document to a byte stream, followed by a newline.
    pub fn write_to<W: Write>(&self, mut writer: W) -> LicenseResult<()> {
        serde_json::to_writer_pretty(&mut writer, self)
            .map_err(|e| LicenseError::Encoding(format!("failed to serialize signature: {e}")))?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Reads a JSON document from a byte stream.
    pub fn read_from<R: Read>(reader: R) -> LicenseResult<Self> {
        serde_json::from_reader(reader).map_err(parse_error)
    }

    /// Saves the signature as JSON at `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> LicenseResult<()> {
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file))
    }

    /// Loads a signature previously written with [`Signature::save`].
    pub fn load(path: impl AsRef<Path>) -> LicenseResult<Self> {
        let file = File::open(path)?;
        Self::read_from(BufReader::new(file))
    }
}

/// Loads a signature previously written with [`Signature::save`].
pub fn load_signature(path: impl AsRef<Path>) -> LicenseResult<Signature> {
    Signature::load(path)
}

fn parse_error(e: serde_json::Error) -> LicenseError {
    if e.is_io() {
        return LicenseError::Io(e.into());
    }
    LicenseError::Encoding(format!("invalid signature document: {e}"))
}
