//! Octal permission strings.
//!
//! Permissions are carried as the exact text the caller supplied (for example
//! `"755"` or `"0644"`) so that reading them back never reformats the value.
//! The numeric mode is derived on demand.

use std::fmt;
use std::str::FromStr;

use crate::SpecError;

/// Mask selecting the permission bits of a raw `st_mode` value.
///
/// Covers the setuid, setgid and sticky bits in addition to `rwxrwxrwx`; the
/// file-type bits above them are dropped.
pub const PERMISSION_MASK: u32 = 0o7777;

const MAX_DIGITS: usize = 4;

/// A validated string of one to four octal digits.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct OctalPerms(String);

impl OctalPerms {
    /// Validates `value` and wraps it.
    pub fn new(value: impl Into<String>) -> Result<Self, SpecError> {
        let value = value.into();
        if is_octal_string(&value) {
            Ok(Self(value))
        } else {
            Err(SpecError::InvalidPermissions { value })
        }
    }

    /// Returns the string exactly as supplied.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the numeric permission bits described by the string.
    #[must_use]
    pub fn bits(&self) -> u32 {
        // Validation guarantees at most four octal digits, so every byte is
        // in `b'0'..=b'7'` and the result fits in `PERMISSION_MASK`.
        self.0
            .bytes()
            .fold(0, |mode, digit| (mode << 3) | u32::from(digit - b'0'))
    }

    /// Returns `true` when the permission bits of `mode` already match.
    #[must_use]
    pub fn matches_mode(&self, mode: u32) -> bool {
        mode & PERMISSION_MASK == self.bits()
    }
}

fn is_octal_string(value: &str) -> bool {
    (1..=MAX_DIGITS).contains(&value.len()) && value.bytes().all(|b| matches!(b, b'0'..=b'7'))
}

impl FromStr for OctalPerms {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for OctalPerms {
    type Error = SpecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OctalPerms> for String {
    fn from(perms: OctalPerms) -> Self {
        perms.0
    }
}

impl AsRef<str> for OctalPerms {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OctalPerms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
