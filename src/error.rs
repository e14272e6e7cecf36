//! Message validation errors.

use crate::attribute::FieldStatus;
use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// An error describing why a message cannot be accepted.
///
/// Validation fails closed: any of these errors rejects the message as a
/// whole, there are no warnings and no best-effort results.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InvalidMessageError {
    /// A secured header of the inner message has no byte-identical
    /// counterpart in the envelope.
    SecuredHeaderMismatch { name: String },
    /// A signature directive referenced a header the envelope does not
    /// contain.
    DirectiveUnmatched { status: FieldStatus, name: String },
    /// The canonicalization algorithm enumerated in the signature is not
    /// known.
    UnknownAlgorithm(i64),
    /// A directive carried a field status outside the defined range.
    UnknownFieldStatus(i64),
    /// No trusted header with the given name is present.
    HeaderMissing { name: String },
    /// More than one trusted header with the given name is present.
    HeaderDuplicated { name: String, count: usize },
    /// A header value could not be parsed as a single mail address.
    InvalidAddress { field: String },
}

impl Display for InvalidMessageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::SecuredHeaderMismatch { name } => {
                write!(f, "secured header '{name}' does not match envelope header")
            }
            Self::DirectiveUnmatched { status, name } => {
                write!(
                    f,
                    "secured header '{name}' not found in envelope for {status} directive"
                )
            }
            Self::UnknownAlgorithm(value) => {
                write!(f, "unknown canonicalization algorithm: {value}")
            }
            Self::UnknownFieldStatus(value) => write!(f, "unknown header field status: {value}"),
            Self::HeaderMissing { name } => {
                write!(f, "protected header '{name}' is required, but missing")
            }
            Self::HeaderDuplicated { name, count } => {
                write!(
                    f,
                    "expected exactly one protected header '{name}', found {count}"
                )
            }
            Self::InvalidAddress { field } => write!(f, "invalid '{field}' address"),
        }
    }
}

impl Error for InvalidMessageError {}
