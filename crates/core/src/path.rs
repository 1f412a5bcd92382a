//! `Path`: the primary key of the temporal store.
//!
//! A path is an opaque, non-empty byte sequence, at most
//! [`MAX_PATH_BYTES`] bytes, with no embedded NUL, no `..` segment once
//! split on `/`, and not absolute (does not start with `/`).

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a [`Path`] in bytes.
pub const MAX_PATH_BYTES: usize = 4096;

/// Opaque, validated, non-empty byte sequence used as the temporal store's key.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Path(Box<[u8]>);

impl Path {
    /// Validate and construct a `Path` from raw bytes.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPath`] if `bytes` is empty, longer than
    /// [`MAX_PATH_BYTES`], contains a NUL byte, is absolute, or contains a
    /// `..` segment after splitting on `/`.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        validate(&bytes)?;
        Ok(Path(bytes.into_boxed_slice()))
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Render as UTF-8 if valid, otherwise a lossy approximation (used only
    /// for diagnostics; the engine never relies on UTF-8-ness of a path).
    pub fn display_lossy(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }
}

fn validate(bytes: &[u8]) -> Result<()> {
    if bytes.is_empty() {
        return Err(Error::InvalidPath("path must not be empty".into()));
    }
    if bytes.len() > MAX_PATH_BYTES {
        return Err(Error::InvalidPath(format!(
            "path exceeds {} bytes",
            MAX_PATH_BYTES
        )));
    }
    if bytes.contains(&0) {
        return Err(Error::InvalidPath("path contains a NUL byte".into()));
    }
    if bytes[0] == b'/' {
        return Err(Error::InvalidPath("path must not be absolute".into()));
    }
    if bytes
        .split(|&b| b == b'/')
        .any(|segment| segment == b"..")
    {
        return Err(Error::InvalidPath("path contains a '..' segment".into()));
    }
    Ok(())
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({:?})", self.display_lossy())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_lossy())
    }
}

impl TryFrom<&str> for Path {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Path::new(value.as_bytes().to_vec())
    }
}

impl TryFrom<String> for Path {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Path::new(value.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_relative_path() {
        assert!(Path::try_from("src/foo.rs").is_ok());
    }

    #[test]
    fn rejects_empty() {
        assert!(Path::new(Vec::new()).is_err());
    }

    #[test]
    fn rejects_too_long() {
        let long = vec![b'a'; MAX_PATH_BYTES + 1];
        assert!(Path::new(long).is_err());
    }

    #[test]
    fn rejects_embedded_nul() {
        assert!(Path::new(vec![b'a', 0, b'b']).is_err());
    }

    #[test]
    fn rejects_absolute() {
        assert!(Path::try_from("/etc/passwd").is_err());
    }

    #[test]
    fn rejects_dotdot_segment() {
        assert!(Path::try_from("a/../b").is_err());
        assert!(Path::try_from("..").is_err());
    }

    #[test]
    fn allows_dotdot_as_substring_not_a_segment() {
        assert!(Path::try_from("a..b/c").is_ok());
    }

    #[test]
    fn equal_bytes_hash_equal() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(Path::try_from("a/b").unwrap());
        assert!(set.contains(&Path::try_from("a/b").unwrap()));
    }
}
