// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! DNS record types managed through WAPI.
//!
//! Infoblox models each record type as its own WAPI object (`record:a`,
//! `record:aaaa`, `record:cname`, `record:txt`), each with its own value field.
//! This module maps between those objects and a single [`Record`] read model,
//! and builds the JSON bodies used to create records ([`NewRecord`]).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use tracing::debug;

use crate::constants::{OBJECT_RECORD_A, OBJECT_RECORD_AAAA, OBJECT_RECORD_CNAME, OBJECT_RECORD_TXT};
use crate::dns_errors::{RecordError, Result};
use crate::wapi::types::WapiRecord;

/// Supported DNS record types.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecordType {
    /// IPv4 address record
    A,
    /// IPv6 address record
    AAAA,
    /// Canonical name (alias) record
    CNAME,
    /// Text record
    TXT,
}

impl RecordType {
    /// All supported record types.
    pub const ALL: [Self; 4] = [Self::A, Self::AAAA, Self::CNAME, Self::TXT];

    /// WAPI object type for this record type (e.g. `record:a`).
    #[must_use]
    pub fn object_type(self) -> &'static str {
        match self {
            Self::A => OBJECT_RECORD_A,
            Self::AAAA => OBJECT_RECORD_AAAA,
            Self::CNAME => OBJECT_RECORD_CNAME,
            Self::TXT => OBJECT_RECORD_TXT,
        }
    }

    /// Name of the WAPI field carrying the record value.
    #[must_use]
    pub fn value_field(self) -> &'static str {
        match self {
            Self::A => "ipv4addr",
            Self::AAAA => "ipv6addr",
            Self::CNAME => "canonical",
            Self::TXT => "text",
        }
    }

    /// Fields requested when searching records of this type.
    #[must_use]
    pub fn return_fields(self) -> [&'static str; 6] {
        ["name", self.value_field(), "view", "zone", "ttl", "use_ttl"]
    }

    /// Short name as used in zone files (`A`, `AAAA`, ...).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::AAAA => "AAAA",
            Self::CNAME => "CNAME",
            Self::TXT => "TXT",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = RecordError;

    /// Accepts short names (`A`, `txt`) as well as WAPI object types (`record:a`).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let short = lowered.strip_prefix("record:").unwrap_or(&lowered);

        match short {
            "a" => Ok(Self::A),
            "aaaa" => Ok(Self::AAAA),
            "cname" => Ok(Self::CNAME),
            "txt" => Ok(Self::TXT),
            _ => Err(RecordError::UnsupportedRecordType {
                record_type: s.to_string(),
            }),
        }
    }
}

/// A DNS record as stored on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// WAPI object reference; the record's identity on the grid
    #[serde(rename = "ref")]
    pub reference: String,
    /// Fully qualified record name, without trailing dot
    pub name: String,
    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// DNS view holding the record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    /// Zone holding the record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    /// Record TTL when WAPI returned one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    /// Address, target or text, depending on the type
    ///
    /// Always `None` for records listed through `allrecords`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// A list of records, as returned by record searches.
pub type RecordSet = Vec<Record>;

impl Record {
    /// Convert a typed search result (`record:a`, ...) into a record.
    #[must_use]
    pub fn from_typed(wire: WapiRecord, record_type: RecordType) -> Self {
        let value = match record_type {
            RecordType::A => wire.ipv4addr,
            RecordType::AAAA => wire.ipv6addr,
            RecordType::CNAME => wire.canonical,
            RecordType::TXT => wire.text,
        };

        Self {
            reference: wire.reference,
            name: trim_dot(&wire.name).to_string(),
            record_type,
            view: wire.view,
            zone: wire.zone,
            ttl: wire.ttl,
            value,
        }
    }

    /// Convert an `allrecords` entry into a record.
    ///
    /// Returns `None` for record types this crate does not manage. `allrecords`
    /// reports names relative to the zone; they are qualified here.
    #[must_use]
    pub fn from_all_records(wire: WapiRecord) -> Option<Self> {
        let object_type = wire.object_type.as_deref().unwrap_or_default();
        let Ok(record_type) = object_type.parse::<RecordType>() else {
            debug!(
                reference = %wire.reference,
                object_type = %object_type,
                "Skipping unsupported record type in allrecords result"
            );
            return None;
        };

        let name = match wire.zone.as_deref() {
            Some(zone) => qualify_name(&wire.name, zone),
            None => trim_dot(&wire.name).to_string(),
        };

        Some(Self {
            reference: wire.reference,
            name,
            record_type,
            view: wire.view,
            zone: wire.zone,
            ttl: wire.ttl,
            value: None,
        })
    }

    /// WAPI reference identifying the record.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.reference
    }

    /// Fully qualified DNS name of the record.
    #[must_use]
    pub fn dns_name(&self) -> &str {
        &self.name
    }

    /// Compare the record name with `name`, ignoring case and a trailing dot.
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        trim_dot(&self.name).eq_ignore_ascii_case(trim_dot(name))
    }
}

/// JSON body creating a record through WAPI.
///
/// Only the value field of the record type is serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRecord {
    /// Record type; selects the WAPI object and value field
    #[serde(skip)]
    pub record_type: RecordType,
    /// Fully qualified record name
    pub name: String,
    /// DNS view; omitted when empty so WAPI uses its default view
    #[serde(skip_serializing_if = "String::is_empty")]
    pub view: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    ipv4addr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ipv6addr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    canonical: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    /// Record TTL; `None` inherits the zone default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    use_ttl: Option<bool>,
}

impl NewRecord {
    /// Validate the inputs and build a creation body.
    ///
    /// # Arguments
    /// * `record_type` - Record type
    /// * `name` - Fully qualified record name (e.g. "www.example.com")
    /// * `view` - DNS view (e.g. "default")
    /// * `value` - IPv4 address, IPv6 address, CNAME target or text
    /// * `ttl` - TTL in seconds; zero or negative inherits the zone default
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::InvalidRecordData`] if the name is empty, the value does
    /// not fit the record type or the TTL exceeds 32 bits.
    pub fn build(
        record_type: RecordType,
        name: &str,
        view: &str,
        value: &str,
        ttl: i64,
    ) -> Result<Self, RecordError> {
        let name = trim_dot(name.trim());
        if name.is_empty() {
            return Err(invalid(name, "record name must not be empty"));
        }

        let ttl = if ttl > 0 {
            Some(u32::try_from(ttl).map_err(|_| {
                invalid(name, &format!("TTL {ttl} exceeds the maximum of {}", u32::MAX))
            })?)
        } else {
            None
        };

        let mut record = Self {
            record_type,
            name: name.to_string(),
            view: view.trim().to_string(),
            ipv4addr: None,
            ipv6addr: None,
            canonical: None,
            text: None,
            ttl,
            use_ttl: ttl.map(|_| true),
        };

        let value = value.trim();
        match record_type {
            RecordType::A => {
                let addr = Ipv4Addr::from_str(value)
                    .map_err(|_| invalid(name, &format!("'{value}' is not a valid IPv4 address")))?;
                record.ipv4addr = Some(addr.to_string());
            }
            RecordType::AAAA => {
                let addr = Ipv6Addr::from_str(value)
                    .map_err(|_| invalid(name, &format!("'{value}' is not a valid IPv6 address")))?;
                record.ipv6addr = Some(addr.to_string());
            }
            RecordType::CNAME => {
                let target = trim_dot(value);
                if target.is_empty() {
                    return Err(invalid(name, "CNAME target must not be empty"));
                }
                record.canonical = Some(target.to_string());
            }
            RecordType::TXT => {
                record.text = Some(normalize_txt(value));
            }
        }

        Ok(record)
    }

    /// The value carried by this body.
    #[must_use]
    pub fn value(&self) -> &str {
        self.ipv4addr
            .as_deref()
            .or(self.ipv6addr.as_deref())
            .or(self.canonical.as_deref())
            .or(self.text.as_deref())
            .unwrap_or_default()
    }
}

/// Unquote a TXT value when it is a single quoted token.
///
/// `"abc"` becomes `abc`; quoted values containing spaces are sent as given
/// because WAPI treats them as multiple character strings.
#[must_use]
pub fn normalize_txt(value: &str) -> String {
    let is_quoted = value.len() >= 2 && value.starts_with('"') && value.ends_with('"');
    if !is_quoted || value.contains(' ') {
        return value.to_string();
    }

    let inner = &value[1..value.len() - 1];
    let mut unquoted = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(escaped) => unquoted.push(escaped),
                None => unquoted.push('\\'),
            }
        } else {
            unquoted.push(c);
        }
    }
    unquoted
}

/// Build a fully qualified name from a zone-relative name.
#[must_use]
pub fn qualify_name(name: &str, zone: &str) -> String {
    let name = trim_dot(name);
    let zone = trim_dot(zone);

    if name.is_empty() || name == "@" {
        zone.to_string()
    } else if zone.is_empty()
        || name.eq_ignore_ascii_case(zone)
        || name
            .to_ascii_lowercase()
            .ends_with(&format!(".{}", zone.to_ascii_lowercase()))
    {
        name.to_string()
    } else {
        format!("{name}.{zone}")
    }
}

fn trim_dot(name: &str) -> &str {
    name.trim_end_matches('.')
}

fn invalid(name: &str, reason: &str) -> RecordError {
    RecordError::InvalidRecordData {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
#[path = "records_tests.rs"]
mod records_tests;
