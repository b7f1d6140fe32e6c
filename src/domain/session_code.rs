//! Normalized session code.
//!
//! [`SessionCode`] is a newtype around the canonical form of a client-chosen
//! join code, so that `" abc123 "` and `"ABC123"` can never end up in two
//! different rooms.

use std::fmt;

use serde::Serialize;

/// Maximum number of characters kept from a normalized code.
pub const MAX_CODE_LEN: usize = 32;

/// Canonical session identifier.
///
/// Produced only by [`SessionCode::parse`]: trimmed, uppercased, restricted
/// to ASCII alphanumerics and at most [`MAX_CODE_LEN`] characters long.
/// Used as the key in [`super::SessionRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SessionCode(String);

impl SessionCode {
    /// Normalizes a raw code, returning `None` if nothing usable remains.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_uppercase())
            .take(MAX_CODE_LEN)
            .collect();
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    /// Returns the normalized code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
