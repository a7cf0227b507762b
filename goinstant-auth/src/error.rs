//! Error types for the `goinstant-auth` crate.
//!
//! Follows the same pattern as the rest of the workspace: a root Error struct
//! holding an error kind tree and an optional source for error chaining. The
//! source of a key or signer error is the human readable message, which is
//! what `Display` prints.

use std::error::Error as StdError;
use std::fmt;

/// Top-level error type for goinstant-auth crate.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

/// Major categories of errors in goinstant-auth.
#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    InvalidKey(InvalidKeyErrorKind),
    Signer(SignerErrorKind),
    Codec(CodecErrorKind),
}

/// Errors raised while constructing a `Signer` from key text.
#[derive(Debug, PartialEq)]
pub enum InvalidKeyErrorKind {
    Missing,
    NotBase64,
    TooShort,
    Rejected,
}

/// Errors raised while validating the input of a signing call.
#[derive(Debug, PartialEq)]
pub enum SignerErrorKind {
    NotARecord,
    MissingRequiredKey,
    GroupsNotArray,
    GroupNotRecord,
}

/// Errors from the compact codec.
///
/// `Base64` and `Json` are decode-side failures; `Serialize` only happens when
/// a value cannot be represented as JSON.
#[derive(Debug, PartialEq)]
pub enum CodecErrorKind {
    Base64,
    Json,
    Serialize,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (&self.error_kind, &self.source) {
            (ErrorKind::Codec(kind), Some(source)) => {
                write!(f, "Codec error ({:?}): {}", kind, source)
            }
            (_, Some(source)) => write!(f, "{}", source),
            (kind, None) => write!(f, "{:?}", kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: ErrorKind::Codec(CodecErrorKind::Base64),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: ErrorKind::Codec(CodecErrorKind::Json),
        }
    }
}

/// Helper function to create key errors.
pub fn invalid_key_error(kind: InvalidKeyErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::InvalidKey(kind),
    }
}

/// Helper function to create signer input errors.
pub fn signer_error(kind: SignerErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Signer(kind),
    }
}
