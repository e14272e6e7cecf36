//! The secured header fields signature attribute.
//!
//! RFC 7508 protects header fields by listing them in a CMS signed
//! attribute:
//!
//! ```text
//! SecHeaderFields ::= SET {
//!     canonAlgorithm   Algorithm DEFAULT canonAlgorithmSimple,
//!     secHeaderFields  HeaderFields }
//!
//! Algorithm ::= ENUMERATED {
//!     canonAlgorithmSimple(0),
//!     canonAlgorithmRelaxed(1) }
//!
//! HeaderFields ::= SEQUENCE SIZE (1..MAX) OF HeaderField
//!
//! HeaderField ::= SEQUENCE {
//!     field-Name    HeaderFieldName,
//!     field-Value   HeaderFieldValue,
//!     field-Status  HeaderFieldStatus DEFAULT duplicated }
//!
//! HeaderFieldStatus ::= INTEGER {
//!     duplicated(0), deleted(1), modified(2) }
//! ```
//!
//! This module models the attribute value after DER decoding. Decoding
//! itself stays with the caller's CMS library; the algorithm and status
//! fields are kept as the raw integers found on the wire so that unknown
//! values are diagnosed where they matter, during reconciliation.

use std::fmt::{self, Display, Formatter};

/// OID of the CMS signed attribute carrying secured header fields,
/// id-aa-secureHeaderFieldsIdentifier.
pub const SECURE_HEADER_FIELDS_OID: &str = "1.2.840.113549.1.9.16.2.55";

/// A single secured header field directive.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SecuredField {
    pub name: String,
    pub value: String,
    /// Raw field status integer; see [`FieldStatus`].
    pub status: i64,
}

impl SecuredField {
    /// Creates a directive with the default status, duplicated, used when
    /// the status is absent on the wire.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::with_status(name, value, 0)
    }

    pub fn with_status(name: impl Into<String>, value: impl Into<String>, status: i64) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            status,
        }
    }
}

/// The decoded value of the secured header fields attribute: an optional
/// canonicalization algorithm and the directives in wire order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SecuredHeaderFields {
    /// Raw ENUMERATED algorithm value, if the signature carried one.
    pub algorithm: Option<i64>,
    pub fields: Vec<SecuredField>,
}

impl SecuredHeaderFields {
    pub fn new(fields: Vec<SecuredField>) -> Self {
        Self {
            algorithm: None,
            fields,
        }
    }

    pub fn with_algorithm(algorithm: i64, fields: Vec<SecuredField>) -> Self {
        Self {
            algorithm: Some(algorithm),
            fields,
        }
    }
}

/// The defined header field statuses of RFC 7508.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FieldStatus {
    /// The envelope copy of the header is authentic as-is.
    Duplicated,
    /// The header exists only in the envelope and must be discarded.
    Deleted,
    /// The signed value replaces the envelope form of the header.
    Modified,
}

impl FieldStatus {
    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Duplicated),
            1 => Some(Self::Deleted),
            2 => Some(Self::Modified),
            _ => None,
        }
    }
}

impl Display for FieldStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicated => write!(f, "duplicated"),
            Self::Deleted => write!(f, "deleted"),
            Self::Modified => write!(f, "modified"),
        }
    }
}
