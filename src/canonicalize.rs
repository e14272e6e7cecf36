//! Canonicalization of header names and values.
//!
//! RFC 7508, §4 distinguishes two precisions for matching header fields
//! between the envelope and the secured sources: a *simple* match that
//! compares bytes exactly, and a *relaxed* match that ignores case in field
//! names and whitespace differences in field values.

/// The canonicalization algorithm used when matching header fields.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub enum CanonicalizationAlgorithm {
    #[default]
    Simple,
    Relaxed,
}

impl CanonicalizationAlgorithm {
    /// Converts the enumerated value carried in the secured header fields
    /// attribute: 0 is simple, 1 is relaxed.
    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Simple),
            1 => Some(Self::Relaxed),
            _ => None,
        }
    }

    /// Compares two header field names at this precision.
    pub fn name_eq(self, name: &str, other: &str) -> bool {
        match self {
            Self::Simple => name == other,
            Self::Relaxed => name.eq_ignore_ascii_case(other),
        }
    }

    /// Compares two header field values at this precision.
    pub fn value_eq(self, value: &str, other: &str) -> bool {
        match self {
            Self::Simple => value == other,
            Self::Relaxed => canonicalize_value(value) == canonicalize_value(other),
        }
    }
}

/// Produces the relaxed form of a header value: every run of whitespace is
/// compressed into a single space, and leading and trailing whitespace is
/// removed.
pub fn canonicalize_value(value: &str) -> String {
    let value = value.trim_matches(|c: char| c.is_ascii_whitespace());

    let mut result = String::with_capacity(value.len());
    let mut compressing = false;
    for c in value.chars() {
        if c.is_ascii_whitespace() {
            if !compressing {
                result.push(' ');
                compressing = true;
            }
        } else {
            result.push(c);
            if compressing {
                compressing = false;
            }
        }
    }

    result
}
