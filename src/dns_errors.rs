// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! DNS operation and WAPI error types for ibdns.
//!
//! This module provides specialized error types for:
//! - Record validation and record create/delete failures
//! - Transport and WAPI failures talking to the Infoblox grid
//! - Configuration loading and validation
//!
//! These errors provide structured error handling for DNS operations,
//! enabling retry decisions and stable reason identifiers in CLI output.

use reqwest::StatusCode;
use thiserror::Error;

use crate::retry::is_retryable_http_status;
use crate::status_reasons::{
    REASON_CONFIG_FILE_ERROR, REASON_DNS_OPERATION_FAILED, REASON_GRID_UNAVAILABLE,
    REASON_HTTP_CONNECTION_FAILED, REASON_HTTP_REQUEST_TIMEOUT, REASON_INVALID_CA_CERTIFICATE,
    REASON_INVALID_CONFIGURATION, REASON_INVALID_RECORD_DATA, REASON_MISSING_CONFIGURATION,
    REASON_RECORD_CREATION_FAILED, REASON_RECORD_DELETION_FAILED, REASON_UNEXPECTED_RESPONSE,
    REASON_UNSUPPORTED_RECORD_TYPE, REASON_WAPI_AUTH_FAILED, REASON_WAPI_REJECTED,
};

/// Errors that can occur while building or changing DNS records.
#[derive(Error, Debug, Clone)]
pub enum RecordError {
    /// Invalid record data (malformed IP, empty name, out-of-range TTL, etc.)
    ///
    /// Returned when record data fails validation before any request is sent.
    #[error("Invalid record data for '{name}': {reason}")]
    InvalidRecordData {
        /// The record name with invalid data
        name: String,
        /// Explanation of what is invalid
        reason: String,
    },

    /// Record type outside of A, AAAA, CNAME and TXT
    #[error("Record type '{record_type}' is not supported (expected A, AAAA, CNAME or TXT)")]
    UnsupportedRecordType {
        /// The record type as given by the caller
        record_type: String,
    },

    /// Failed to create a record on the grid
    #[error("Failed to create {record_type} record '{name}': {reason}")]
    RecordCreationFailed {
        /// The record name being created
        name: String,
        /// Short record type name (e.g., "A")
        record_type: String,
        /// Specific reason for the failure
        reason: String,
    },

    /// Failed to delete a record on the grid
    #[error("Failed to delete record '{reference}': {reason}")]
    RecordDeletionFailed {
        /// The WAPI reference of the record
        reference: String,
        /// Specific reason for the failure
        reason: String,
    },
}

/// Errors related to grid availability and the WAPI transport.
#[derive(Error, Debug, Clone)]
pub enum GridError {
    /// HTTP connection failed (network unreachable, connection refused, TLS failure)
    #[error("HTTP connection to {endpoint} failed: {reason}")]
    HttpConnectionFailed {
        /// The URL that couldn't be reached
        endpoint: String,
        /// Reason for the connection failure
        reason: String,
    },

    /// HTTP request timeout
    #[error("HTTP request to {endpoint} timed out after {timeout_secs}s")]
    HttpRequestTimeout {
        /// The URL that timed out
        endpoint: String,
        /// Timeout in seconds
        timeout_secs: u64,
    },

    /// Credentials were rejected (HTTP 401 or 403)
    #[error("WAPI at {endpoint} rejected the credentials (HTTP {status_code})")]
    AuthenticationFailed {
        /// The URL that rejected the request
        endpoint: String,
        /// HTTP status code (401 or 403)
        status_code: u16,
    },

    /// Grid member unavailable (HTTP 502, 503 or 504)
    #[error("Grid member at {endpoint} unavailable (HTTP {status_code})")]
    GridUnavailable {
        /// The URL that returned the gateway error
        endpoint: String,
        /// HTTP status code
        status_code: u16,
    },

    /// WAPI answered with an error status
    ///
    /// `code` and `text` are taken from the WAPI error body when it could be parsed,
    /// e.g. `Client.Ibap.Data.Conflict`.
    #[error("WAPI at {endpoint} rejected the request (HTTP {status_code}): {text}")]
    WapiRejected {
        /// The URL that rejected the request
        endpoint: String,
        /// HTTP status code
        status_code: u16,
        /// WAPI error code, if present in the body
        code: Option<String>,
        /// WAPI error text or raw body
        text: String,
    },

    /// Response body could not be decoded
    #[error("Unexpected response from {endpoint}: {reason}")]
    UnexpectedResponse {
        /// The URL that returned the body
        endpoint: String,
        /// Decoding failure
        reason: String,
    },
}

/// Errors raised while loading and validating configuration.
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    /// A required setting is missing
    #[error("Missing required configuration value '{field}'")]
    MissingField {
        /// The configuration key
        field: String,
    },

    /// A setting is present but invalid
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The configuration key
        field: String,
        /// Explanation of what is invalid
        reason: String,
    },

    /// The configured CA certificate is not valid PEM
    #[error("Invalid CA certificate: {reason}")]
    InvalidCaCertificate {
        /// Parsing failure
        reason: String,
    },

    /// The configuration file could not be read or parsed
    #[error("Failed to load configuration file '{path}': {reason}")]
    FileError {
        /// Path of the configuration file
        path: String,
        /// I/O or parse failure
        reason: String,
    },
}

/// Composite error type that encompasses all DNS operation errors.
///
/// This is the error type returned by every public operation of the crate.
#[derive(Error, Debug, Clone)]
pub enum DnsError {
    /// Record-related error (validation, create, delete)
    #[error(transparent)]
    Record(#[from] RecordError),

    /// Grid or transport error
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic error for operations that don't fit other categories
    #[error("DNS operation failed: {0}")]
    Generic(String),
}

impl DnsError {
    /// Returns true if this error is transient and the request should be retried.
    ///
    /// Transient errors include connection failures, timeouts, gateway errors and
    /// WAPI rejections with a retryable status (429, 500).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Grid(
                GridError::HttpConnectionFailed { .. }
                | GridError::HttpRequestTimeout { .. }
                | GridError::GridUnavailable { .. },
            ) => true,

            Self::Grid(GridError::WapiRejected { status_code, .. }) => {
                StatusCode::from_u16(*status_code).is_ok_and(is_retryable_http_status)
            }

            Self::Grid(
                GridError::AuthenticationFailed { .. } | GridError::UnexpectedResponse { .. },
            )
            | Self::Record(_)
            | Self::Config(_)
            | Self::Generic(_) => false,
        }
    }

    /// Returns the reason identifier for this error.
    #[must_use]
    pub fn status_reason(&self) -> &'static str {
        match self {
            Self::Record(RecordError::InvalidRecordData { .. }) => REASON_INVALID_RECORD_DATA,
            Self::Record(RecordError::UnsupportedRecordType { .. }) => {
                REASON_UNSUPPORTED_RECORD_TYPE
            }
            Self::Record(RecordError::RecordCreationFailed { .. }) => REASON_RECORD_CREATION_FAILED,
            Self::Record(RecordError::RecordDeletionFailed { .. }) => REASON_RECORD_DELETION_FAILED,

            Self::Grid(GridError::HttpConnectionFailed { .. }) => REASON_HTTP_CONNECTION_FAILED,
            Self::Grid(GridError::HttpRequestTimeout { .. }) => REASON_HTTP_REQUEST_TIMEOUT,
            Self::Grid(GridError::AuthenticationFailed { .. }) => REASON_WAPI_AUTH_FAILED,
            Self::Grid(GridError::GridUnavailable { .. }) => REASON_GRID_UNAVAILABLE,
            Self::Grid(GridError::WapiRejected { .. }) => REASON_WAPI_REJECTED,
            Self::Grid(GridError::UnexpectedResponse { .. }) => REASON_UNEXPECTED_RESPONSE,

            Self::Config(ConfigError::MissingField { .. }) => REASON_MISSING_CONFIGURATION,
            Self::Config(ConfigError::InvalidValue { .. }) => REASON_INVALID_CONFIGURATION,
            Self::Config(ConfigError::InvalidCaCertificate { .. }) => {
                REASON_INVALID_CA_CERTIFICATE
            }
            Self::Config(ConfigError::FileError { .. }) => REASON_CONFIG_FILE_ERROR,

            Self::Generic(_) => REASON_DNS_OPERATION_FAILED,
        }
    }

    /// HTTP status code carried by the error, if the grid answered at all.
    #[must_use]
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Grid(
                GridError::AuthenticationFailed { status_code, .. }
                | GridError::GridUnavailable { status_code, .. }
                | GridError::WapiRejected { status_code, .. },
            ) => Some(*status_code),
            _ => None,
        }
    }
}

// Conversion from anyhow::Error to DnsError for callers mixing both
impl From<anyhow::Error> for DnsError {
    fn from(err: anyhow::Error) -> Self {
        Self::Generic(err.to_string())
    }
}

/// Result alias used across the crate.
pub type Result<T, E = DnsError> = std::result::Result<T, E>;
