// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Common test utilities for integration tests against a mock WAPI.

#![allow(dead_code)]

use base64::{engine::general_purpose::STANDARD, Engine as _};
use ibdns::{Credentials, InfobloxConfig, InfobloxDnsClient};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "infoblox";
pub const ZONE: &str = "example.com";

/// Configuration pointing at the mock server, with retries disabled.
pub fn test_config(server: &MockServer) -> InfobloxConfig {
    InfobloxConfig {
        host: Some(server.uri()),
        http_retry_max_elapsed: Some(0),
        request_timeout: Some(5),
        ..InfobloxConfig::with_defaults()
    }
}

/// Client for the mock server, with retries disabled.
pub fn test_client(server: &MockServer) -> InfobloxDnsClient {
    client_with_config(&test_config(server))
}

pub fn client_with_config(config: &InfobloxConfig) -> InfobloxDnsClient {
    InfobloxDnsClient::from_config(config, Credentials::new(USERNAME, PASSWORD))
        .expect("client should build for the mock server")
}

/// Expected `Authorization` header for the test credentials.
pub fn basic_auth_header() -> String {
    format!("Basic {}", STANDARD.encode(format!("{USERNAME}:{PASSWORD}")))
}

/// Path of a WAPI object or reference.
pub fn wapi_path(object: &str) -> String {
    format!("/wapi/v2.10/{object}")
}

/// Typed search result as WAPI returns it.
pub fn wapi_record(object_type: &str, value_field: &str, name: &str, value: &str, ttl: u32) -> Value {
    json!({
        "_ref": record_ref(object_type, name, value),
        "name": name,
        value_field: value,
        "view": "default",
        "zone": ZONE,
        "ttl": ttl,
        "use_ttl": true
    })
}

/// Deterministic reference for a record.
pub fn record_ref(object_type: &str, name: &str, value: &str) -> String {
    let id = STANDARD.encode(format!("{name}/{value}")).replace(['=', '+', '/'], "");
    format!("{object_type}/{id}:{name}/default")
}

/// WAPI error body.
pub fn wapi_error(code: &str, text: &str) -> Value {
    json!({
        "Error": format!("AdmConProtoError: {text}"),
        "code": code,
        "text": text
    })
}
