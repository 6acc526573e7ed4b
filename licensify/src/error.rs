//! Error types for license signing and verification.

use thiserror::Error;

/// Licensing errors.
///
/// Verification failures are deliberately collapsed into a single
/// [`LicenseError::InvalidSignature`] so callers cannot tell a tampered
/// license from a wrong key or corrupted signature bytes.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// Key could not be read, decoded, or is not an RSA key.
    #[error("failed to load key: {0}")]
    KeyLoad(String),

    /// Signing failed (key too small, randomness unavailable).
    #[error("signing failed: {0}")]
    Signing(String),

    /// Signature text or persisted document is malformed.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// RSA signature verification failed.
    #[error("license signature invalid")]
    InvalidSignature,

    /// Reading or writing a signature file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
