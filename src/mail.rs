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

//! Read-only mail views over reconciled headers.

use crate::{error::InvalidMessageError, header::Header, header::HeaderStore};
use mailparse::MailAddr;
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};

/// Secured headers every acceptable message must carry, upper-cased.
pub const REQUIRED_SECURED_NAMES: &[&str] = &["FROM", "TO", "SUBJECT"];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AddressParseError;

/// A single parsed mail address.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Address {
    display_name: Option<String>,
    addr: String,
}

impl Address {
    /// Parses a single RFC 5322 mailbox, eg `Jane Doe <jane@example.com>`.
    ///
    /// Address lists, group syntax, and anything else that does not reduce
    /// to exactly one address are rejected.
    pub fn parse(s: &str) -> Result<Self, AddressParseError> {
        let addrs = mailparse::addrparse(s).map_err(|_| AddressParseError)?;

        if addrs.len() != 1 {
            return Err(AddressParseError);
        }

        match &addrs[0] {
            MailAddr::Single(info) => Ok(Self {
                display_name: info.display_name.clone(),
                addr: info.addr.clone(),
            }),
            MailAddr::Group(_) => Err(AddressParseError),
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// The bare `local-part@domain` form.
    pub fn addr(&self) -> &str {
        &self.addr
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.display_name {
            Some(name) => write!(f, "{} <{}>", name, self.addr),
            None => self.addr.fmt(f),
        }
    }
}

/// Read access to the validated fields of a mail message.
///
/// The challenge-response layer works against this trait so that signed and
/// unsigned messages are handled alike.
pub trait Mail {
    /// Returns the sender address.
    fn from_addr(&self) -> Result<Address, InvalidMessageError>;

    /// Returns the recipient address.
    fn to_addr(&self) -> Result<Address, InvalidMessageError>;

    /// Returns the message subject.
    fn subject(&self) -> Result<String, InvalidMessageError>;

    /// Returns the Message-ID, if one is present. Informational only.
    fn message_id(&self) -> Option<String>;

    /// Returns the Reply-To addresses; the list may be empty.
    fn reply_to(&self) -> Result<Vec<Address>, InvalidMessageError>;

    /// Checks whether the message declares itself automatically generated,
    /// per RFC 3834.
    fn is_auto_submitted(&self) -> bool;
}

// The exactly-once contract shared by both views.
fn fetch_exactly_one(values: &[&str], name: &str) -> Result<String, InvalidMessageError> {
    match *values {
        [] => Err(InvalidMessageError::HeaderMissing {
            name: name.to_owned(),
        }),
        [value] => Ok(value.to_owned()),
        _ => Err(InvalidMessageError::HeaderDuplicated {
            name: name.to_owned(),
            count: values.len(),
        }),
    }
}

fn parse_address_field(value: &str, field: &str) -> Result<Address, InvalidMessageError> {
    Address::parse(value).map_err(|_| InvalidMessageError::InvalidAddress {
        field: field.to_owned(),
    })
}

fn is_auto_generated(values: &[&str]) -> bool {
    values.iter().any(|value| {
        let value = value.to_ascii_lowercase();
        value == "auto-generated" || value.starts_with("auto-generated;")
    })
}

/// The reconciled view of a signed message.
///
/// Accessors only return header values whose authenticity was established
/// during reconciliation; everything else is refused. `Message-ID`,
/// `Reply-To`, and `Auto-Submitted` are exempt, they are informational in
/// the challenge flow and read regardless of trust.
#[derive(Clone, Debug)]
pub struct TrustedMail {
    headers: HeaderStore,
}

impl TrustedMail {
    pub(crate) fn new(headers: HeaderStore) -> Self {
        Self { headers }
    }

    /// Iterates over all reconciled header records.
    pub fn headers(&self) -> impl Iterator<Item = &Header> + '_ {
        self.headers.iter()
    }

    /// Returns the names of required secured headers that are not present
    /// as trusted records. This set is supposed to be empty on valid
    /// messages; if it has at least one element, the message must be
    /// refused.
    pub fn missing_secured_headers(&self) -> BTreeSet<String> {
        let mut missing: BTreeSet<String> = REQUIRED_SECURED_NAMES
            .iter()
            .map(|name| (*name).to_owned())
            .collect();

        for header in self.headers.iter() {
            if header.is_trusted() {
                missing.remove(&header.name().to_ascii_uppercase());
            }
        }

        missing
    }

    // Fetches a header that must be present exactly once and marked as
    // trusted, ie it was either found in the signed inner message or set by
    // the signature's secured header fields.
    fn fetch_trusted(&self, name: &str) -> Result<String, InvalidMessageError> {
        fetch_exactly_one(&self.headers.find_trusted(name), name)
    }
}

impl Mail for TrustedMail {
    fn from_addr(&self) -> Result<Address, InvalidMessageError> {
        parse_address_field(&self.fetch_trusted("From")?, "From")
    }

    fn to_addr(&self) -> Result<Address, InvalidMessageError> {
        parse_address_field(&self.fetch_trusted("To")?, "To")
    }

    fn subject(&self) -> Result<String, InvalidMessageError> {
        self.fetch_trusted("Subject")
    }

    fn message_id(&self) -> Option<String> {
        self.headers
            .find_any("Message-ID")
            .first()
            .map(|value| (*value).to_owned())
    }

    fn reply_to(&self) -> Result<Vec<Address>, InvalidMessageError> {
        self.headers
            .find_any("Reply-To")
            .into_iter()
            .map(|value| parse_address_field(value, "Reply-To"))
            .collect()
    }

    fn is_auto_submitted(&self) -> bool {
        is_auto_generated(&self.headers.find_any("Auto-Submitted"))
    }
}

impl Display for TrustedMail {
    // One record per line, trusted records marked with ‘*’.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for header in self.headers.iter() {
            let marker = if header.is_trusted() { '*' } else { ' ' };
            writeln!(f, "{} {}: {}", marker, header.name(), header.value())?;
        }
        Ok(())
    }
}

/// An envelope-only view for flows that run with signature validation
/// disabled.
///
/// All headers are taken at face value; nothing in this view carries an
/// authenticity guarantee.
#[derive(Clone, Debug, Default)]
pub struct UnverifiedMail {
    headers: HeaderStore,
}

impl UnverifiedMail {
    pub fn from_headers<I>(headers: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut store = HeaderStore::new();
        for (name, value) in headers {
            store.append(name, value, false);
        }
        Self { headers: store }
    }

    fn fetch(&self, name: &str) -> Result<String, InvalidMessageError> {
        fetch_exactly_one(&self.headers.find_any(name), name)
    }
}

impl Mail for UnverifiedMail {
    fn from_addr(&self) -> Result<Address, InvalidMessageError> {
        parse_address_field(&self.fetch("From")?, "From")
    }

    fn to_addr(&self) -> Result<Address, InvalidMessageError> {
        parse_address_field(&self.fetch("To")?, "To")
    }

    fn subject(&self) -> Result<String, InvalidMessageError> {
        self.fetch("Subject")
    }

    fn message_id(&self) -> Option<String> {
        self.headers
            .find_any("Message-ID")
            .first()
            .map(|value| (*value).to_owned())
    }

    fn reply_to(&self) -> Result<Vec<Address>, InvalidMessageError> {
        self.headers
            .find_any("Reply-To")
            .into_iter()
            .map(|value| parse_address_field(value, "Reply-To"))
            .collect()
    }

    fn is_auto_submitted(&self) -> bool {
        is_auto_generated(&self.headers.find_any("Auto-Submitted"))
    }
}
