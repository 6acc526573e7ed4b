//! Canonical hashing of licenses.
//!
//! The canonical form of a license is every attribute rendered as
//! `key:value`, sorted byte-wise, and joined with `,`:
//!
//! ```text
//! {"product": "Pro", "id": "abc-123"}  ->  "id:abc-123,product:Pro"
//! ```
//!
//! The digest is SHA-256 over the UTF-8 bytes of that string. The format is
//! part of every issued signature and must never change.
//!
//! Licenses issued by the first generation of the signing service were
//! hashed over a slightly different string: one empty token per attribute
//! was sorted in ahead of the real tokens, giving a run of leading commas:
//!
//! ```text
//! {"product": "Pro", "id": "abc-123"}  ->  ",,id:abc-123,product:Pro"
//! ```
//!
//! [`legacy_canonical_form`] and [`legacy_digest`] reproduce that string so
//! those licenses keep verifying. New signatures always use
//! [`canonical_form`].
//!
//! Delimiters are not escaped. A license whose keys or values contain `:`
//! or `,` can share a canonical form with a different license, e.g.
//! `{"a": "1,b:2"}` and `{"a": "1", "b": "2"}`. Use
//! [`has_reserved_chars`] to reject such input before issuing.

use crate::license::License;
use sha2::{Digest, Sha256};

/// Size of a license digest in bytes (SHA-256).
pub const DIGEST_SIZE: usize = 32;

/// Separates a key from its value inside one token.
pub const KEY_VALUE_DELIMITER: char = ':';

/// Separates tokens in the canonical form.
pub const TOKEN_SEPARATOR: char = ',';

/// Returns the canonical string form of a license.
#[must_use]
pub fn canonical_form(license: &License) -> String {
    let mut tokens = Vec::with_capacity(license.len());
    for (key, value) in license.iter() {
        tokens.push(format!("{key}{KEY_VALUE_DELIMITER}{value}"));
    }

    tokens.sort_unstable();
    let separator = TOKEN_SEPARATOR.to_string();
    tokens.join(separator.as_str())
}

/// Returns the SHA-256 digest of the canonical form.
///
/// An empty license hashes the empty string.
#[must_use]
pub fn digest(license: &License) -> [u8; DIGEST_SIZE] {
    let mut hasher = Sha256::new();
    hasher.update(canonical_form(license).as_bytes());
    hasher.finalize().into()
}

/// Returns the canonical form used by first-generation issuers: `len`
/// leading separators followed by [`canonical_form`].
///
/// An empty license renders as the empty string in both forms.
#[must_use]
pub fn legacy_canonical_form(license: &License) -> String {
    if license.is_empty() {
        return String::new();
    }
    let mut form = TOKEN_SEPARATOR.to_string().repeat(license.len());
    form.push_str(&canonical_form(license));
    form
}

/// Returns the SHA-256 digest of [`legacy_canonical_form`].
#[must_use]
pub fn legacy_digest(license: &License) -> [u8; DIGEST_SIZE] {
    let mut hasher = Sha256::new();
    hasher.update(legacy_canonical_form(license).as_bytes());
    hasher.finalize().into()
}

/// Returns true if any key or value contains a canonical-form delimiter.
#[must_use]
pub fn has_reserved_chars(license: &License) -> bool {
    let reserved = [KEY_VALUE_DELIMITER, TOKEN_SEPARATOR];
    license
        .iter()
        .any(|(k, v)| k.contains(&reserved[..]) || v.contains(&reserved[..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_sorted_bytewise() {
        let license: License = [("b", "2"), ("B", "1"), ("a", "3")].into_iter().collect();
        // Uppercase sorts before lowercase in byte order.
        assert_eq!(canonical_form(&license), "B:1,a:3,b:2");
    }

    #[test]
    fn empty_license_has_empty_form() {
        assert_eq!(canonical_form(&License::new()), "");
        assert_eq!(legacy_canonical_form(&License::new()), "");
    }

    #[test]
    fn legacy_form_has_one_leading_separator_per_attribute() {
        let one: License = [("id", "x")].into_iter().collect();
        assert_eq!(legacy_canonical_form(&one), ",id:x");

        let three: License = [("c", "3"), ("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(legacy_canonical_form(&three), ",,,a:1,b:2,c:3");
    }
}
