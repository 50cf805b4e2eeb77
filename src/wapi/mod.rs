// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! HTTP connector for the Infoblox Web API (WAPI).
//!
//! [`WapiConnector`] owns a pooled `reqwest` client configured from a
//! [`TransportConfig`] and speaks the three WAPI verbs this crate needs:
//!
//! - **GET** `{object}?...` - search objects ([`WapiConnector::get_objects`])
//! - **POST** `{object}` - create an object, returning its reference
//!   ([`WapiConnector::create_object`])
//! - **DELETE** `{reference}` - delete an object ([`WapiConnector::delete_object`])
//!
//! Every request carries HTTP basic auth and `Content-Type: application/json`.
//! Transient failures (connection errors, timeouts, 429 and 5xx) are retried with
//! exponential backoff; see [`crate::retry`].

pub mod request;
pub mod types;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Certificate, Client as HttpClient, Method, Proxy};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::config::{Credentials, HostConfig, TransportConfig};
use crate::constants::{MAX_LOGGED_BODY_BYTES, USER_AGENT};
use crate::dns_errors::{ConfigError, DnsError, GridError, Result};
use crate::http_errors::{is_success_status, map_connection_error, map_http_error_to_reason};
use crate::retry::{http_backoff, retry_wapi_call};

pub use request::{QueryParams, WapiRequestBuilder};
pub use types::{WapiErrorBody, WapiRecord, ZoneAuth};

/// Authenticated HTTP access to one grid member.
#[derive(Debug, Clone)]
pub struct WapiConnector {
    client: HttpClient,
    requests: WapiRequestBuilder,
    credentials: Credentials,
    request_timeout: Duration,
    retry_max_elapsed: Duration,
}

impl WapiConnector {
    /// Create a connector for a grid member.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the CA certificate or proxy cannot be used or the
    /// HTTP client cannot be built.
    pub fn new(host: &HostConfig, transport: &TransportConfig) -> Result<Self> {
        let client = build_http_client(transport)?;

        debug!(
            base_url = %host.base_url,
            version = %host.version,
            ssl_verify = transport.ssl_verify,
            proxy = transport.proxy_url.is_some(),
            "Created WAPI connector"
        );

        Ok(Self {
            client,
            requests: WapiRequestBuilder::new(host, transport.max_results),
            credentials: host.credentials.clone(),
            request_timeout: transport.request_timeout,
            retry_max_elapsed: transport.retry_max_elapsed,
        })
    }

    /// URL builder used by this connector.
    #[must_use]
    pub fn requests(&self) -> &WapiRequestBuilder {
        &self.requests
    }

    /// Search objects of one type.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not a JSON array of `T`.
    pub async fn get_objects<T: DeserializeOwned>(
        &self,
        object_type: &str,
        return_fields: &[&str],
        query: &QueryParams,
    ) -> Result<Vec<T>> {
        let url = self.requests.build_url(object_type, return_fields, query);
        let body = self.execute(Method::GET, &url, None).await?;

        serde_json::from_str(&body).map_err(|e| {
            GridError::UnexpectedResponse {
                endpoint: endpoint(&url),
                reason: format!("expected a JSON array of {object_type} objects: {e}"),
            }
            .into()
        })
    }

    /// Create an object and return its reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be serialized, the request fails, or WAPI
    /// does not answer with a reference string.
    pub async fn create_object<B: Serialize + fmt::Debug>(
        &self,
        object_type: &str,
        body: &B,
    ) -> Result<String> {
        let payload = serde_json::to_string(body).map_err(|e| {
            DnsError::Generic(format!("Failed to serialize {object_type} body {body:?}: {e}"))
        })?;

        let url = self.requests.write_url(object_type);
        let response = self.execute(Method::POST, &url, Some(payload)).await?;
        parse_reference(&url, &response)
    }

    /// Delete an object by reference and return the reference WAPI echoes back.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or WAPI does not answer with a reference.
    pub async fn delete_object(&self, reference: &str) -> Result<String> {
        let url = self.requests.write_url(reference);
        let response = self.execute(Method::DELETE, &url, None).await?;
        parse_reference(&url, &response)
    }

    /// Execute a request, retrying transient failures.
    async fn execute(&self, method: Method, url: &Url, body: Option<String>) -> Result<String> {
        let operation = format!("{method} {}", endpoint(url));

        retry_wapi_call(
            || self.execute_once(method.clone(), url, body.as_deref()),
            &operation,
            http_backoff(Some(self.retry_max_elapsed)),
        )
        .await
    }

    /// Execute a single request without retries.
    async fn execute_once(&self, method: Method, url: &Url, body: Option<&str>) -> Result<String> {
        debug!(
            method = %method,
            url = %url,
            body = ?body,
            username = %self.credentials.username,
            "WAPI request"
        );

        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .header(CONTENT_TYPE, "application/json");
        if let Some(payload) = body {
            request = request.body(payload.to_string());
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(url, &e))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(url, &e))?;

        debug!(
            method = %method,
            url = %url,
            status = status,
            body = %truncate_for_log(&text),
            "WAPI response"
        );

        if is_success_status(status) {
            Ok(text)
        } else {
            Err(status_error(url, status, &text))
        }
    }

    fn transport_error(&self, url: &Url, error: &reqwest::Error) -> DnsError {
        let (reason, _) = map_connection_error();
        let endpoint = endpoint(url);

        if error.is_timeout() {
            debug!(reason = reason, endpoint = %endpoint, "WAPI request timed out");
            return GridError::HttpRequestTimeout {
                endpoint,
                timeout_secs: self.request_timeout.as_secs(),
            }
            .into();
        }

        debug!(reason = reason, endpoint = %endpoint, error = %error, "WAPI transport error");
        GridError::HttpConnectionFailed {
            endpoint,
            reason: error_chain(error),
        }
        .into()
    }
}

/// Build the pooled HTTP client.
///
/// A custom CA certificate is only trusted when TLS verification is enabled;
/// with verification disabled every certificate is accepted.
fn build_http_client(transport: &TransportConfig) -> Result<HttpClient, ConfigError> {
    let mut builder = HttpClient::builder()
        .user_agent(USER_AGENT)
        .timeout(transport.request_timeout)
        .pool_max_idle_per_host(transport.pool_connections)
        .danger_accept_invalid_certs(!transport.ssl_verify);

    if transport.ssl_verify {
        if let Some(pem) = transport.ca_cert.as_deref() {
            let certificate = Certificate::from_pem(pem.as_bytes()).map_err(|e| {
                ConfigError::InvalidCaCertificate {
                    reason: e.to_string(),
                }
            })?;
            builder = builder.add_root_certificate(certificate);
        }
    }

    if let Some(proxy_url) = &transport.proxy_url {
        let proxy = Proxy::all(proxy_url.as_str()).map_err(|e| ConfigError::InvalidValue {
            field: "proxyUrl".to_string(),
            reason: e.to_string(),
        })?;
        builder = builder.proxy(proxy);
    }

    builder.build().map_err(|e| ConfigError::InvalidValue {
        field: "transport".to_string(),
        reason: format!("failed to build HTTP client: {}", error_chain(&e)),
    })
}

/// Map a non-2xx response to an error.
fn status_error(url: &Url, status: u16, body: &str) -> DnsError {
    let (reason, message) = map_http_error_to_reason(status);
    let endpoint = endpoint(url);
    let parsed = WapiErrorBody::parse(body);

    warn!(
        endpoint = %endpoint,
        status = status,
        reason = reason,
        code = ?parsed.as_ref().and_then(|p| p.code.as_deref()),
        "WAPI request failed"
    );

    match status {
        401 | 403 => GridError::AuthenticationFailed {
            endpoint,
            status_code: status,
        }
        .into(),
        502..=504 => GridError::GridUnavailable {
            endpoint,
            status_code: status,
        }
        .into(),
        _ => {
            let (code, text) = match parsed {
                Some(parsed) => (parsed.code.clone(), parsed.message().to_string()),
                None if !body.trim().is_empty() => (None, truncate_for_log(body.trim()).to_string()),
                None => (None, message),
            };
            GridError::WapiRejected {
                endpoint,
                status_code: status,
                code,
                text,
            }
            .into()
        }
    }
}

/// Parse the JSON string reference returned by POST and DELETE.
fn parse_reference(url: &Url, body: &str) -> Result<String> {
    match serde_json::from_str::<String>(body.trim()) {
        Ok(reference) if !reference.is_empty() => Ok(reference),
        _ => Err(GridError::UnexpectedResponse {
            endpoint: endpoint(url),
            reason: format!(
                "expected a JSON string object reference, got '{}'",
                truncate_for_log(body)
            ),
        }
        .into()),
    }
}

/// URL without its query, for logs and errors.
fn endpoint(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}

/// Render an error with its sources, `reqwest` hides the interesting part there.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Cap a response body for logging on a char boundary.
pub(crate) fn truncate_for_log(body: &str) -> &str {
    if body.len() <= MAX_LOGGED_BODY_BYTES {
        return body;
    }
    let mut end = MAX_LOGGED_BODY_BYTES;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
