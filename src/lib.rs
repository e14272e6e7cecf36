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

//! A library validating the headers of signed S/MIME email messages, as
//! used by ACME clients responding to `email-reply-00` challenges
//! ([RFC 8823]).
//!
//! When a certificate authority mails a challenge, the client must answer
//! with values taken from a message whose headers it can actually trust. A
//! signed message carries up to three competing header sources: the outer
//! envelope (attacker-controllable in transit), the signed inner MIME
//! message, and the secured header fields attribute of [RFC 7508] bound
//! into the CMS signature. This library reconciles the three into one set
//! of header records, each marked trusted or untrusted, and refuses the
//! message at the first inconsistency.
//!
//! Cryptographic verification is out of scope. Callers verify the CMS
//! signature with their PKCS#7 library of choice and feed this crate the
//! enumerated headers of the envelope and inner message, together with the
//! decoded secured header fields attribute, as plain values.
//!
//! # Usage
//!
//! The type [`HeaderReconciler`] provides the entry point: it ingests the
//! header sources in order and hands the result off to a [`TrustedMail`]
//! view, whose accessors only ever expose authenticated values. See the
//! example for `HeaderReconciler` for basic usage.
//!
//! # Trace logging
//!
//! This library uses the [tracing] crate for internal trace logging. For
//! insight into library operation, install a [tracing
//! subscriber][tracing-subscriber] and enable logging at `trace` level.
//!
//! [RFC 7508]: https://www.rfc-editor.org/rfc/rfc7508
//! [RFC 8823]: https://www.rfc-editor.org/rfc/rfc8823
//! [tracing]: https://crates.io/crates/tracing
//! [tracing-subscriber]: https://crates.io/crates/tracing-subscriber

// Throughout, where RFC 7508 is quoted in comments, section numbers are
// referred to with the symbol ‘§’.

pub mod attribute;
pub mod canonicalize;
mod error;
pub mod header;
pub mod mail;
pub mod reconcile;

pub use crate::{
    attribute::{FieldStatus, SecuredField, SecuredHeaderFields, SECURE_HEADER_FIELDS_OID},
    canonicalize::CanonicalizationAlgorithm,
    error::InvalidMessageError,
    header::{Header, HeaderStore},
    mail::{Address, AddressParseError, Mail, TrustedMail, UnverifiedMail},
    reconcile::{HeaderReconciler, IGNORED_HEADER_NAMES},
};
