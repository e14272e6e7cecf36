//! Representation of reconciled email header data.
//!
//! See RFC 5322, section 2.2 for the underlying header field model.

use crate::canonicalize::CanonicalizationAlgorithm;

/// A single header record.
///
/// Records keep the name and value exactly as they were handed over by the
/// message source; comparisons at a chosen precision go through
/// [`name_matches`][Header::name_matches] and
/// [`value_matches`][Header::value_matches]. The trusted flag starts out
/// false and is only ever raised, never cleared.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Header {
    name: String,
    value: String,
    trusted: bool,
}

impl Header {
    fn new(name: String, value: String, trusted: bool) -> Self {
        Self {
            name,
            value,
            trusted,
        }
    }

    /// The header field name, in its original case.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The header field value, whitespace preserved.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether some secured source authenticated this record.
    pub fn is_trusted(&self) -> bool {
        self.trusted
    }

    /// Checks the field name against an expected name.
    pub fn name_matches(&self, expected: &str, canon: CanonicalizationAlgorithm) -> bool {
        canon.name_eq(&self.name, expected)
    }

    /// Checks the field value against an expected value.
    pub fn value_matches(&self, expected: &str, canon: CanonicalizationAlgorithm) -> bool {
        canon.value_eq(&self.value, expected)
    }
}

/// An ordered collection of header records.
///
/// The store permits duplicate records and preserves insertion order; the
/// order carries no security meaning, it only keeps output deterministic.
/// All mutation is mechanical and infallible, driven by record predicates.
#[derive(Clone, Debug, Default)]
pub struct HeaderStore {
    records: Vec<Header>,
}

impl HeaderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes all records.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Appends a record. Duplicates of an existing name and value are
    /// permitted.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>, trusted: bool) {
        self.records
            .push(Header::new(name.into(), value.into(), trusted));
    }

    /// Marks every record satisfying the predicate as trusted and returns
    /// the number of records affected.
    pub fn mark_trusted_where<P>(&mut self, mut pred: P) -> usize
    where
        P: FnMut(&Header) -> bool,
    {
        let mut count = 0;
        for record in &mut self.records {
            if pred(record) {
                record.trusted = true;
                count += 1;
            }
        }
        count
    }

    /// Removes every record satisfying the predicate and returns the number
    /// of records removed.
    pub fn remove_where<P>(&mut self, mut pred: P) -> usize
    where
        P: FnMut(&Header) -> bool,
    {
        let len = self.records.len();
        self.records.retain(|record| !pred(record));
        len - self.records.len()
    }

    /// Returns the trimmed values of all trusted records with the given
    /// name, compared case-insensitively, in insertion order.
    pub fn find_trusted(&self, name: &str) -> Vec<&str> {
        self.records
            .iter()
            .filter(|record| record.trusted && record.name.eq_ignore_ascii_case(name))
            .map(|record| record.value.trim())
            .collect()
    }

    /// Returns the trimmed values of all records with the given name,
    /// compared case-insensitively, regardless of trust.
    pub fn find_any(&self, name: &str) -> Vec<&str> {
        self.records
            .iter()
            .filter(|record| record.name.eq_ignore_ascii_case(name))
            .map(|record| record.value.trim())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Header> + '_ {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
