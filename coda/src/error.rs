//! Error taxonomy shared by every format adapter.
//!
//! All four decode kinds are constructed with the full coding path at the
//! failure site and propagate up through every nesting level unmodified;
//! there is no local recovery inside the framework.

use alloc::string::String;
use core::fmt;

use crate::key::CodingPath;

/// The specific kind of a [`DecodeError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// The requested shape or type disagrees with what the underlying data
    /// actually holds.
    TypeMismatch {
        /// What the caller asked for.
        expected: &'static str,
    },
    /// A value was expected to be present (non-null, in-bounds) but is
    /// absent, null, or the cursor is past the end.
    ValueNotFound,
    /// A required field is absent from a keyed structure entirely.
    KeyNotFound,
    /// The underlying data is structurally invalid in a way not covered by
    /// the other kinds (malformed nested encoding, odd-length key/value pair
    /// sequence, a number that does not fit the requested type).
    DataCorrupted,
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeErrorKind::TypeMismatch { expected } => {
                write!(f, "type mismatch (expected {expected})")
            }
            DecodeErrorKind::ValueNotFound => f.write_str("value not found"),
            DecodeErrorKind::KeyNotFound => f.write_str("key not found"),
            DecodeErrorKind::DataCorrupted => f.write_str("data corrupted"),
        }
    }
}

/// Error produced while constructing a value from a [`Decoder`].
///
/// [`Decoder`]: crate::decode::Decoder
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeError {
    /// The specific kind of failure.
    pub kind: DecodeErrorKind,
    /// Where in the document the failure happened.
    pub path: CodingPath,
    /// Human-readable description of the failure.
    pub message: String,
}

impl DecodeError {
    /// The requested type disagrees with the underlying data.
    pub fn type_mismatch(
        path: CodingPath,
        expected: &'static str,
        message: impl Into<String>,
    ) -> Self {
        DecodeError {
            kind: DecodeErrorKind::TypeMismatch { expected },
            path,
            message: message.into(),
        }
    }

    /// An expected value is absent, null, or past the end of a sequence.
    pub fn value_not_found(path: CodingPath, message: impl Into<String>) -> Self {
        DecodeError {
            kind: DecodeErrorKind::ValueNotFound,
            path,
            message: message.into(),
        }
    }

    /// A required field is missing from a keyed structure.
    pub fn key_not_found(path: CodingPath, message: impl Into<String>) -> Self {
        DecodeError {
            kind: DecodeErrorKind::KeyNotFound,
            path,
            message: message.into(),
        }
    }

    /// The underlying data is structurally invalid.
    ///
    /// This is the standard constructor for container code: pass the current
    /// container's coding path plus a description, and the path composition
    /// stays consistent across all container kinds.
    pub fn data_corrupted(path: CodingPath, message: impl Into<String>) -> Self {
        DecodeError {
            kind: DecodeErrorKind::DataCorrupted,
            path,
            message: message.into(),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.kind, self.path, self.message)
    }
}

impl core::error::Error for DecodeError {}

/// Error produced while encoding a value to an [`Encoder`].
///
/// The encode side only ever reports invalid values (a value graph the
/// adapter cannot represent, or a top-level value that never encoded
/// anything), so the kind is implicit.
///
/// [`Encoder`]: crate::encode::Encoder
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeError {
    /// Where in the document the failure happened.
    pub path: CodingPath,
    /// Human-readable description of the failure.
    pub message: String,
}

impl EncodeError {
    /// The value at `path` cannot be encoded.
    pub fn invalid_value(path: CodingPath, message: impl Into<String>) -> Self {
        EncodeError {
            path,
            message: message.into(),
        }
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid value at {}: {}", self.path, self.message)
    }
}

impl core::error::Error for EncodeError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::CodingKey;
    use alloc::string::ToString;

    fn sample_path() -> CodingPath {
        CodingPath::root()
            .child(&CodingKey::new("a"))
            .child(&CodingKey::new("b"))
            .child(&CodingKey::index(1))
    }

    #[test]
    fn decode_error_renders_kind_path_and_message() {
        let error = DecodeError::type_mismatch(sample_path(), "i64", "expected i64, found string");
        assert_eq!(
            error.to_string(),
            "type mismatch (expected i64) at a.b[1]: expected i64, found string"
        );
    }

    #[test]
    fn helpers_pick_the_right_kind() {
        let path = CodingPath::root();
        assert_eq!(
            DecodeError::value_not_found(path.clone(), "").kind,
            DecodeErrorKind::ValueNotFound
        );
        assert_eq!(
            DecodeError::key_not_found(path.clone(), "").kind,
            DecodeErrorKind::KeyNotFound
        );
        assert_eq!(
            DecodeError::data_corrupted(path, "").kind,
            DecodeErrorKind::DataCorrupted
        );
    }

    #[test]
    fn encode_error_renders_path() {
        let error = EncodeError::invalid_value(sample_path(), "float key");
        assert_eq!(error.to_string(), "invalid value at a.b[1]: float key");
    }
}
