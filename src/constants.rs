// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for ibdns.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Connection Defaults
// ============================================================================

/// Default HTTPS port of the grid's WAPI endpoint
pub const DEFAULT_WAPI_PORT: u16 = 443;

/// Default WAPI version
pub const DEFAULT_WAPI_VERSION: &str = "2.10";

/// Default Infoblox DNS view
pub const DEFAULT_DNS_VIEW: &str = "default";

/// Default number of idle pooled connections per host
pub const DEFAULT_HTTP_POOL_CONNECTIONS: usize = 10;

/// Default HTTP request timeout (1 minute)
pub const DEFAULT_HTTP_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Default maximum time spent retrying transient WAPI failures (2 minutes)
pub const DEFAULT_HTTP_RETRY_MAX_ELAPSED_SECS: u64 = 120;

/// User agent sent with every WAPI request
pub const USER_AGENT: &str = concat!("ibdns/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// WAPI Object Types
// ============================================================================

/// URL path prefix preceding the WAPI version (`/wapi/v2.10/...`)
pub const WAPI_PATH_PREFIX: &str = "wapi";

/// WAPI object type for A records
pub const OBJECT_RECORD_A: &str = "record:a";

/// WAPI object type for AAAA records
pub const OBJECT_RECORD_AAAA: &str = "record:aaaa";

/// WAPI object type for CNAME records
pub const OBJECT_RECORD_CNAME: &str = "record:cname";

/// WAPI object type for TXT records
pub const OBJECT_RECORD_TXT: &str = "record:txt";

/// WAPI pseudo object listing every record of a zone
pub const OBJECT_ALL_RECORDS: &str = "allrecords";

/// WAPI object type for authoritative zones
pub const OBJECT_ZONE_AUTH: &str = "zone_auth";

// ============================================================================
// WAPI Query Parameters
// ============================================================================

/// Comma separated list of fields WAPI should return
pub const PARAM_RETURN_FIELDS: &str = "_return_fields";

/// Upper bound on the number of objects returned by a search
pub const PARAM_MAX_RESULTS: &str = "_max_results";

/// Forwards a search to another grid member
pub const PARAM_PROXY_SEARCH: &str = "_proxy_search";

/// `_proxy_search` value targeting the Grid Master
pub const PROXY_SEARCH_GRID_MASTER: &str = "GM";

/// Search field restricting records to a zone
pub const SEARCH_FIELD_ZONE: &str = "zone";

/// Return fields requested for authoritative zones
pub const ZONE_AUTH_RETURN_FIELDS: &[&str] = &["fqdn", "view"];

/// Return fields requested for `allrecords` searches
pub const ALL_RECORDS_RETURN_FIELDS: &[&str] = &["name", "type", "view", "zone", "ttl"];

// ============================================================================
// Logging
// ============================================================================

/// Maximum number of response body bytes echoed into debug logs
pub const MAX_LOGGED_BODY_BYTES: usize = 1500;
