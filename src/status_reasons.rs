// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Stable reason identifiers for failed grid operations.
//!
//! Reasons are programmatic identifiers in CamelCase that explain why an operation
//! against the Infoblox grid failed. They are reported by
//! [`DnsError::status_reason`](crate::dns_errors::DnsError::status_reason) and by
//! [`map_http_error_to_reason`](crate::http_errors::map_http_error_to_reason), and
//! are meant for scripts that consume `ibdns --json` output.
//!
//! # Example Output
//!
//! ```json
//! {
//!   "reason": "WapiAuthFailed",
//!   "message": "WAPI authentication required (401)"
//! }
//! ```

// ============================================================================
// WAPI HTTP Reasons
// ============================================================================

/// WAPI rejected the request as malformed (HTTP 400).
///
/// Typical causes are unknown search fields, invalid record data or a record
/// that already exists in the view.
pub const REASON_WAPI_BAD_REQUEST: &str = "WapiBadRequest";

/// WAPI authentication or authorization failed (HTTP 401 / 403).
pub const REASON_WAPI_AUTH_FAILED: &str = "WapiAuthFailed";

/// Requested object does not exist on the grid (HTTP 404).
pub const REASON_OBJECT_NOT_FOUND: &str = "ObjectNotFound";

/// WAPI hit an internal error (HTTP 500).
pub const REASON_WAPI_INTERNAL_ERROR: &str = "WapiInternalError";

/// Gateway error reaching the grid member (HTTP 502 / 503 / 504).
pub const REASON_GATEWAY_ERROR: &str = "GatewayError";

/// WAPI is rate limiting the client (HTTP 429).
pub const REASON_WAPI_RATE_LIMITED: &str = "WapiRateLimited";

/// The grid member could not be reached or answered with an unexpected status.
pub const REASON_GRID_UNREACHABLE: &str = "GridUnreachable";

// ============================================================================
// Transport Reasons
// ============================================================================

/// The HTTP connection could not be established.
pub const REASON_HTTP_CONNECTION_FAILED: &str = "HttpConnectionFailed";

/// The HTTP request exceeded the configured timeout.
pub const REASON_HTTP_REQUEST_TIMEOUT: &str = "HttpRequestTimeout";

/// The grid answered with a body that could not be decoded.
pub const REASON_UNEXPECTED_RESPONSE: &str = "UnexpectedResponse";

/// WAPI answered with an error status and an error body.
pub const REASON_WAPI_REJECTED: &str = "WapiRejected";

/// The grid member is unavailable (gateway errors).
pub const REASON_GRID_UNAVAILABLE: &str = "GridUnavailable";

// ============================================================================
// Record Reasons
// ============================================================================

/// Record data failed validation before being sent.
pub const REASON_INVALID_RECORD_DATA: &str = "InvalidRecordData";

/// The record type is not one of A, AAAA, CNAME or TXT.
pub const REASON_UNSUPPORTED_RECORD_TYPE: &str = "UnsupportedRecordType";

/// Creating a record failed.
pub const REASON_RECORD_CREATION_FAILED: &str = "RecordCreationFailed";

/// Deleting a record failed.
pub const REASON_RECORD_DELETION_FAILED: &str = "RecordDeletionFailed";

// ============================================================================
// Configuration Reasons
// ============================================================================

/// A required configuration value is missing.
pub const REASON_MISSING_CONFIGURATION: &str = "MissingConfiguration";

/// A configuration value is present but invalid.
pub const REASON_INVALID_CONFIGURATION: &str = "InvalidConfiguration";

/// The configured CA certificate could not be loaded.
pub const REASON_INVALID_CA_CERTIFICATE: &str = "InvalidCaCertificate";

/// The configuration file could not be read or parsed.
pub const REASON_CONFIG_FILE_ERROR: &str = "ConfigFileError";

/// Catch-all for failures that fit no other category.
pub const REASON_DNS_OPERATION_FAILED: &str = "DnsOperationFailed";
