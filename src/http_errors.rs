// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! HTTP error code mapping to reason identifiers.
//!
//! This module maps HTTP status codes returned by WAPI to the reason identifiers
//! defined in [`crate::status_reasons`], together with a human-readable message.
//!
//! # Usage
//!
//! ```rust
//! use ibdns::http_errors::map_http_error_to_reason;
//!
//! let (reason, message) = map_http_error_to_reason(404);
//! assert_eq!(reason, "ObjectNotFound");
//!
//! let (reason, message) = map_http_error_to_reason(500);
//! assert_eq!(reason, "WapiInternalError");
//! ```

use crate::status_reasons::{
    REASON_GATEWAY_ERROR, REASON_GRID_UNREACHABLE, REASON_HTTP_CONNECTION_FAILED,
    REASON_OBJECT_NOT_FOUND, REASON_WAPI_AUTH_FAILED, REASON_WAPI_BAD_REQUEST,
    REASON_WAPI_INTERNAL_ERROR, REASON_WAPI_RATE_LIMITED,
};

/// Map HTTP status code to reason and message.
///
/// # HTTP Code Mapping
///
/// | HTTP Code | Reason | Meaning |
/// |-----------|--------|---------|
/// | 400 | `WapiBadRequest` | Invalid request or record data |
/// | 401 | `WapiAuthFailed` | Authentication required |
/// | 403 | `WapiAuthFailed` | Insufficient permissions |
/// | 404 | `ObjectNotFound` | Object or reference not found |
/// | 429 | `WapiRateLimited` | Too many requests |
/// | 500 | `WapiInternalError` | Internal server error |
/// | 502 | `GatewayError` | Bad gateway |
/// | 503 | `GatewayError` | Service unavailable |
/// | 504 | `GatewayError` | Gateway timeout |
/// | Other | `GridUnreachable` | Unexpected error |
///
/// # Example
///
/// ```rust
/// use ibdns::http_errors::map_http_error_to_reason;
///
/// let (reason, message) = map_http_error_to_reason(503);
/// assert_eq!(reason, "GatewayError");
/// assert!(message.contains("503"));
/// ```
#[must_use]
pub fn map_http_error_to_reason(status_code: u16) -> (&'static str, String) {
    match status_code {
        400 => (
            REASON_WAPI_BAD_REQUEST,
            "Invalid request to WAPI (400)".into(),
        ),
        401 => (
            REASON_WAPI_AUTH_FAILED,
            "WAPI authentication required (401)".into(),
        ),
        403 => (
            REASON_WAPI_AUTH_FAILED,
            "WAPI authorization failed (403)".into(),
        ),
        404 => (
            REASON_OBJECT_NOT_FOUND,
            "Object or reference not found on the grid (404)".into(),
        ),
        429 => (
            REASON_WAPI_RATE_LIMITED,
            "WAPI rate limit exceeded (429)".into(),
        ),
        500 => (
            REASON_WAPI_INTERNAL_ERROR,
            "WAPI internal error (500)".into(),
        ),
        502 => (
            REASON_GATEWAY_ERROR,
            "Bad gateway reaching the grid member (502)".into(),
        ),
        503 => (
            REASON_GATEWAY_ERROR,
            "Grid member unavailable (503)".into(),
        ),
        504 => (
            REASON_GATEWAY_ERROR,
            "Gateway timeout reaching the grid member (504)".into(),
        ),
        _ => (
            REASON_GRID_UNREACHABLE,
            format!("Unexpected HTTP error from WAPI ({status_code})"),
        ),
    }
}

/// Map connection error to reason and message.
///
/// Use this when the HTTP client cannot establish a connection to the grid,
/// before receiving any HTTP status code.
///
/// # Common Causes
///
/// - Wrong host or port
/// - Firewall blocking HTTPS to the grid member
/// - TLS handshake failure (try `sslVerify: false` or provide `caCert`)
/// - DNS resolution failure for the grid host name
#[must_use]
pub fn map_connection_error() -> (&'static str, String) {
    (
        REASON_HTTP_CONNECTION_FAILED,
        "Cannot connect to the Infoblox grid WAPI endpoint".into(),
    )
}

/// Check if HTTP status code indicates success (2xx).
#[must_use]
pub fn is_success_status(status_code: u16) -> bool {
    (200..300).contains(&status_code)
}
