// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Wire types exchanged with WAPI.

use serde::{Deserialize, Serialize};

/// A record object as returned by a WAPI search.
///
/// Covers both the typed record objects (`record:a`, ...) and `allrecords`
/// entries. Fields WAPI did not return stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WapiRecord {
    /// Object reference (`record:a/ZG5z...:www.example.com/default`)
    #[serde(rename = "_ref")]
    pub reference: String,
    /// Record name; zone-relative for `allrecords`
    #[serde(default)]
    pub name: String,
    /// Object type of `allrecords` entries (e.g. `record:a`)
    #[serde(rename = "type", default)]
    pub object_type: Option<String>,
    #[serde(default)]
    pub view: Option<String>,
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub ttl: Option<u32>,
    #[serde(default)]
    pub ipv4addr: Option<String>,
    #[serde(default)]
    pub ipv6addr: Option<String>,
    #[serde(default)]
    pub canonical: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// An authoritative zone (`zone_auth`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneAuth {
    /// Object reference
    #[serde(rename = "_ref")]
    pub reference: String,
    /// Zone name (e.g. `example.com`)
    pub fqdn: String,
    /// DNS view holding the zone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
}

/// Error body returned by WAPI with non-2xx responses.
///
/// ```text
/// {
///   "Error": "AdmConDataError: None (IBDataConflictError: IB.Data.Conflict:...)",
///   "code": "Client.Ibap.Data.Conflict",
///   "text": "The record 'www.example.com' already exists."
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WapiErrorBody {
    /// Full internal error string
    #[serde(rename = "Error", default)]
    pub error: String,
    /// Error code (e.g. `Client.Ibap.Proto`)
    #[serde(default)]
    pub code: Option<String>,
    /// Human-readable message
    #[serde(default)]
    pub text: Option<String>,
}

impl WapiErrorBody {
    /// Parse a WAPI error body.
    ///
    /// Returns `None` if the body is not a JSON object with an `Error` or `text` field.
    #[must_use]
    pub fn parse(body: &str) -> Option<Self> {
        let parsed: Self = serde_json::from_str(body.trim()).ok()?;
        if parsed.error.is_empty() && parsed.text.as_deref().is_none_or(str::is_empty) {
            return None;
        }
        Some(parsed)
    }

    /// Best message to show a user: `text` when present, else `Error`.
    #[must_use]
    pub fn message(&self) -> &str {
        self.text
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.error)
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
