// viasmime – validation of signed S/MIME email messages
// Copyright © 2025–2026 The viasmime developers
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later
// version.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.

//! Reconciliation of message headers from their competing sources.

use crate::{
    attribute::{FieldStatus, SecuredField, SecuredHeaderFields},
    canonicalize::CanonicalizationAlgorithm,
    error::InvalidMessageError,
    header::{Header, HeaderStore},
    mail::TrustedMail,
};
use tracing::trace;

/// Header names that never take part in reconciliation.
///
/// These necessarily differ between the envelope and the signed inner
/// message, and are never part of the authenticated payload.
pub const IGNORED_HEADER_NAMES: &[&str] = &["Content-Type", "MIME-Version", "Received"];

fn is_ignored(name: &str) -> bool {
    IGNORED_HEADER_NAMES
        .iter()
        .any(|ignored| ignored.eq_ignore_ascii_case(name))
}

/// Merges the headers of a signed message into a single trusted view.
///
/// A reconciler is created empty per message and fed in fixed order: first
/// the envelope headers with [`import_untrusted`][Self::import_untrusted],
/// then the headers of the signed inner message with either
/// [`import_trusted`][Self::import_trusted] (strict) or
/// [`import_trusted_relaxed`][Self::import_trusted_relaxed], and finally the
/// secured header fields of the signature itself with
/// [`import_secured_fields`][Self::import_secured_fields]. Every step may
/// only widen the set of trusted records, never narrow it. The result is
/// handed off with [`into_mail`][Self::into_mail].
///
/// Each import step skips header names in [`IGNORED_HEADER_NAMES`].
///
/// # Examples
///
/// ```
/// use viasmime::{HeaderReconciler, Mail, SecuredField, SecuredHeaderFields};
///
/// # fn main() -> Result<(), viasmime::InvalidMessageError> {
/// let envelope = vec![
///     ("From".to_owned(), "ca@example.org".to_owned()),
///     ("To".to_owned(), "jane@example.com".to_owned()),
///     ("Subject".to_owned(), "ACME: validate jane@example.com".to_owned()),
///     ("Received".to_owned(), "from mx1.example.org".to_owned()),
/// ];
///
/// let mut reconciler = HeaderReconciler::new();
/// reconciler.import_untrusted(envelope.clone());
/// reconciler.import_trusted(envelope)?;
///
/// let attr = SecuredHeaderFields::new(vec![
///     SecuredField::new("Subject", "ACME: validate jane@example.com"),
/// ]);
/// reconciler.import_secured_fields(&attr)?;
///
/// let mail = reconciler.into_mail();
/// assert!(mail.missing_secured_headers().is_empty());
/// assert_eq!(mail.subject()?, "ACME: validate jane@example.com");
/// assert_eq!(mail.from_addr()?.addr(), "ca@example.org");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct HeaderReconciler {
    headers: HeaderStore,
}

impl HeaderReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Imports untrusted headers from the envelope message.
    ///
    /// All previously imported headers are discarded first.
    pub fn import_untrusted<I>(&mut self, headers: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.headers.clear();
        for (name, value) in headers {
            if is_ignored(&name) {
                continue;
            }
            self.headers.append(name, value, false);
        }
        trace!("imported {} untrusted envelope headers", self.headers.len());
    }

    /// Imports secured headers from the signed inner message, strictly.
    ///
    /// Every imported header must reproduce an envelope header byte for
    /// byte; all matching envelope records become trusted. A header without
    /// an exact envelope counterpart rejects the message.
    pub fn import_trusted<I>(&mut self, headers: I) -> Result<(), InvalidMessageError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in headers {
            if is_ignored(&name) {
                continue;
            }

            let count = self.headers.mark_trusted_where(|h| {
                h.name_matches(&name, CanonicalizationAlgorithm::Simple)
                    && h.value_matches(&value, CanonicalizationAlgorithm::Simple)
            });

            if count == 0 {
                trace!("secured header '{name}' missing from envelope");
                return Err(InvalidMessageError::SecuredHeaderMismatch { name });
            }
        }

        Ok(())
    }

    /// Imports secured headers from the signed inner message, relaxed.
    ///
    /// An imported header replaces any untrusted envelope headers of the
    /// same name. Trusted records from earlier imports are left in place,
    /// never overwritten.
    pub fn import_trusted_relaxed<I>(&mut self, headers: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in headers {
            if is_ignored(&name) {
                continue;
            }

            self.headers.remove_where(|h| {
                !h.is_trusted() && h.name_matches(&name, CanonicalizationAlgorithm::Relaxed)
            });
            self.headers.append(name, value, true);
        }
    }

    /// Imports the secured header fields carried in the signature.
    ///
    /// Depending on each directive's status, the matching envelope headers
    /// are confirmed, deleted, or replaced. Directives are applied in wire
    /// order; those preceding a failing directive keep their effect on the
    /// store.
    pub fn import_secured_fields(
        &mut self,
        attr: &SecuredHeaderFields,
    ) -> Result<(), InvalidMessageError> {
        let canon = match attr.algorithm {
            None => CanonicalizationAlgorithm::default(),
            Some(value) => CanonicalizationAlgorithm::from_value(value)
                .ok_or(InvalidMessageError::UnknownAlgorithm(value))?,
        };

        trace!(
            "applying {} secured header field directives, {canon:?} canonicalization",
            attr.fields.len()
        );

        for field in &attr.fields {
            match FieldStatus::from_value(field.status) {
                Some(FieldStatus::Duplicated) => self.confirm_duplicated_field(field, canon)?,
                Some(FieldStatus::Deleted) => self.delete_field(field, canon)?,
                Some(FieldStatus::Modified) => self.modify_field(field, canon)?,
                None => return Err(InvalidMessageError::UnknownFieldStatus(field.status)),
            }
        }

        Ok(())
    }

    /// Iterates over the header records in their current reconciliation
    /// state.
    pub fn headers(&self) -> impl Iterator<Item = &Header> + '_ {
        self.headers.iter()
    }

    /// Hands the reconciled headers off to the read-only view.
    pub fn into_mail(self) -> TrustedMail {
        TrustedMail::new(self.headers)
    }

    // A duplicated directive asserts that the envelope copies of the header
    // are authentic; they must exist with the signed value.
    fn confirm_duplicated_field(
        &mut self,
        field: &SecuredField,
        canon: CanonicalizationAlgorithm,
    ) -> Result<(), InvalidMessageError> {
        let count = self.headers.mark_trusted_where(|h| {
            h.name_matches(&field.name, canon) && h.value_matches(&field.value, canon)
        });

        if count == 0 {
            return Err(InvalidMessageError::DirectiveUnmatched {
                status: FieldStatus::Duplicated,
                name: field.name.clone(),
            });
        }

        Ok(())
    }

    // A deleted directive asserts an envelope-only header, a transport
    // artifact; it must exist with the signed value and is discarded.
    fn delete_field(
        &mut self,
        field: &SecuredField,
        canon: CanonicalizationAlgorithm,
    ) -> Result<(), InvalidMessageError> {
        let count = self.headers.remove_where(|h| {
            h.name_matches(&field.name, canon) && h.value_matches(&field.value, canon)
        });

        if count == 0 {
            return Err(InvalidMessageError::DirectiveUnmatched {
                status: FieldStatus::Deleted,
                name: field.name.clone(),
            });
        }

        Ok(())
    }

    // A modified directive replaces whatever envelope form the header has
    // with the canonical signed value.
    fn modify_field(
        &mut self,
        field: &SecuredField,
        canon: CanonicalizationAlgorithm,
    ) -> Result<(), InvalidMessageError> {
        let count = self
            .headers
            .remove_where(|h| h.name_matches(&field.name, canon));

        if count == 0 {
            return Err(InvalidMessageError::DirectiveUnmatched {
                status: FieldStatus::Modified,
                name: field.name.clone(),
            });
        }

        self.headers
            .append(field.name.clone(), field.value.clone(), true);

        Ok(())
    }
}
