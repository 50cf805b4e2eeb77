// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Connection configuration for the Infoblox grid.
//!
//! [`InfobloxConfig`] is the user-facing configuration. It deserializes from YAML or
//! JSON using the camelCase keys of the Infoblox provider configuration
//! (`sslVerify`, `httpPoolConnections`, ...). Every field is optional so that
//! configurations can be layered: built-in defaults, then a file, then command-line
//! flags and environment variables (see [`InfobloxConfig::merge`]).
//!
//! Resolution validates the merged configuration and splits it into a
//! [`HostConfig`] (where and as whom to connect) and a [`TransportConfig`] (how to
//! connect).
//!
//! # Example
//!
//! ```rust
//! use ibdns::config::{Credentials, InfobloxConfig};
//!
//! let config = InfobloxConfig {
//!     host: Some("10.0.0.10".to_string()),
//!     ..InfobloxConfig::with_defaults()
//! };
//!
//! let host = config.host_config(Credentials::new("admin", "secret")).unwrap();
//! assert_eq!(host.base_url.as_str(), "https://10.0.0.10/");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv6Addr;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::constants::{
    DEFAULT_DNS_VIEW, DEFAULT_HTTP_POOL_CONNECTIONS, DEFAULT_HTTP_REQUEST_TIMEOUT_SECS,
    DEFAULT_HTTP_RETRY_MAX_ELAPSED_SECS, DEFAULT_WAPI_PORT, DEFAULT_WAPI_VERSION,
};
use crate::dns_errors::ConfigError;

/// User-facing Infoblox connection settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfobloxConfig {
    /// Grid member host name or address; may carry an `http(s)://` scheme
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// WAPI port (ignored when `host` carries a scheme)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Verify the grid's TLS certificate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_verify: Option<bool>,
    /// WAPI version (e.g. "2.10")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Default DNS view for new records
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    /// Idle pooled connections kept per host
    #[serde(rename = "httpPoolConnections", skip_serializing_if = "Option::is_none")]
    pub pool_connections: Option<usize>,
    /// Request timeout in seconds
    #[serde(rename = "httpRequestTimeout", skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
    /// PEM encoded CA certificate trusted when `sslVerify` is true
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<String>,
    /// `_max_results` sent with searches; zero leaves the WAPI default
    #[serde(default)]
    pub max_results: i32,
    /// HTTP(S) proxy used to reach the grid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
    /// Seconds spent retrying transient failures; zero disables retries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_retry_max_elapsed: Option<u64>,
}

impl InfobloxConfig {
    /// Configuration holding the built-in defaults.
    ///
    /// Port 443, view `default`, 10 pooled connections, 60s timeout, WAPI 2.10.
    /// TLS verification stays unset, which resolves to disabled.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            port: Some(DEFAULT_WAPI_PORT),
            version: Some(DEFAULT_WAPI_VERSION.to_string()),
            view: Some(DEFAULT_DNS_VIEW.to_string()),
            pool_connections: Some(DEFAULT_HTTP_POOL_CONNECTIONS),
            request_timeout: Some(DEFAULT_HTTP_REQUEST_TIMEOUT_SECS),
            http_retry_max_elapsed: Some(DEFAULT_HTTP_RETRY_MAX_ELAPSED_SECS),
            ..Self::default()
        }
    }

    /// Load a configuration file.
    ///
    /// The file may be YAML or JSON; JSON is parsed as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileError`] if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::from_yaml(&contents).map_err(|e| match e {
            ConfigError::FileError { reason, .. } => ConfigError::FileError {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Parse a configuration from YAML or JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileError`] if the text cannot be parsed.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(contents).map_err(|e| ConfigError::FileError {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })
    }

    /// Overlay `other` on top of `self`.
    ///
    /// Values set in `other` win; unset values fall back to `self`.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            host: other.host.or(self.host),
            port: other.port.or(self.port),
            ssl_verify: other.ssl_verify.or(self.ssl_verify),
            version: other.version.or(self.version),
            view: other.view.or(self.view),
            pool_connections: other.pool_connections.or(self.pool_connections),
            request_timeout: other.request_timeout.or(self.request_timeout),
            ca_cert: other.ca_cert.or(self.ca_cert),
            max_results: if other.max_results == 0 {
                self.max_results
            } else {
                other.max_results
            },
            proxy_url: other.proxy_url.or(self.proxy_url),
            http_retry_max_elapsed: other.http_retry_max_elapsed.or(self.http_retry_max_elapsed),
        }
    }

    /// DNS view used for new records.
    #[must_use]
    pub fn view_or_default(&self) -> &str {
        self.view
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(DEFAULT_DNS_VIEW)
    }

    /// Resolve where and as whom to connect.
    ///
    /// # Errors
    ///
    /// Returns an error if the host is missing or malformed, the WAPI version is not
    /// of the form `N.N[.N]`, or the username is empty.
    pub fn host_config(&self, credentials: Credentials) -> Result<HostConfig, ConfigError> {
        let host = self
            .host
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ConfigError::MissingField {
                field: "host".to_string(),
            })?;

        if credentials.username.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "username".to_string(),
            });
        }

        let version = self
            .version
            .as_deref()
            .map(str::trim)
            .unwrap_or(DEFAULT_WAPI_VERSION);
        validate_wapi_version(version)?;

        Ok(HostConfig {
            base_url: build_base_url(host, self.port.unwrap_or(DEFAULT_WAPI_PORT))?,
            version: version.to_string(),
            credentials,
        })
    }

    /// Resolve how to connect.
    ///
    /// # Errors
    ///
    /// Returns an error if the proxy URL is malformed, the timeout is zero or a CA
    /// certificate is configured but does not contain a PEM certificate block.
    pub fn transport_config(&self) -> Result<TransportConfig, ConfigError> {
        let request_timeout = self
            .request_timeout
            .unwrap_or(DEFAULT_HTTP_REQUEST_TIMEOUT_SECS);
        if request_timeout == 0 {
            return Err(ConfigError::InvalidValue {
                field: "httpRequestTimeout".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        let proxy_url = self
            .proxy_url
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| {
                Url::parse(p).map_err(|e| ConfigError::InvalidValue {
                    field: "proxyUrl".to_string(),
                    reason: format!("'{p}' is not a valid URL: {e}"),
                })
            })
            .transpose()?;

        let ca_cert = self
            .ca_cert
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        if let Some(pem) = ca_cert.as_deref() {
            if !pem.contains("-----BEGIN CERTIFICATE-----") {
                return Err(ConfigError::InvalidCaCertificate {
                    reason: "caCert does not contain a PEM certificate block".to_string(),
                });
            }
        }

        Ok(TransportConfig {
            ssl_verify: self.ssl_verify.unwrap_or(false),
            ca_cert,
            request_timeout: Duration::from_secs(request_timeout),
            pool_connections: self
                .pool_connections
                .unwrap_or(DEFAULT_HTTP_POOL_CONNECTIONS),
            proxy_url,
            max_results: self.max_results,
            retry_max_elapsed: Duration::from_secs(
                self.http_retry_max_elapsed
                    .unwrap_or(DEFAULT_HTTP_RETRY_MAX_ELAPSED_SECS),
            ),
        })
    }
}

/// WAPI user credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// WAPI user name
    pub username: String,
    /// WAPI password
    pub password: String,
}

impl Credentials {
    /// Create credentials from a user name and password.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Resolved endpoint and identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// Scheme, host and port of the grid member (e.g. `https://10.0.0.10/`)
    pub base_url: Url,
    /// WAPI version
    pub version: String,
    /// Basic-auth credentials
    pub credentials: Credentials,
}

/// Resolved HTTP transport settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Verify the grid's TLS certificate
    pub ssl_verify: bool,
    /// Extra trusted CA certificate (PEM), only used when `ssl_verify` is set
    pub ca_cert: Option<String>,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Idle pooled connections kept per host
    pub pool_connections: usize,
    /// Proxy used to reach the grid
    pub proxy_url: Option<Url>,
    /// `_max_results` for searches; zero leaves the WAPI default
    pub max_results: i32,
    /// Time budget for retrying transient failures; zero disables retries
    pub retry_max_elapsed: Duration,
}

/// Build the base URL of the grid member.
///
/// Hosts carrying an `http://` or `https://` scheme are used as given (their own
/// port wins). Bare hosts become `https://{host}:{port}`; bare IPv6 addresses are
/// bracketed.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if the resulting URL is not a valid base URL.
pub fn build_base_url(host: &str, port: u16) -> Result<Url, ConfigError> {
    let host = host.trim().trim_end_matches('/');

    let raw = if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else if host.parse::<Ipv6Addr>().is_ok() {
        format!("https://[{host}]:{port}")
    } else {
        format!("https://{host}:{port}")
    };

    let url = Url::parse(&raw).map_err(|e| ConfigError::InvalidValue {
        field: "host".to_string(),
        reason: format!("'{host}' does not form a valid URL: {e}"),
    })?;

    if url.cannot_be_a_base() || url.host_str().is_none_or(str::is_empty) {
        return Err(ConfigError::InvalidValue {
            field: "host".to_string(),
            reason: format!("'{host}' does not name a host"),
        });
    }

    Ok(url)
}

/// Check that a WAPI version looks like `2.10` or `2.12.3`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] for anything else.
pub fn validate_wapi_version(version: &str) -> Result<(), ConfigError> {
    let parts: Vec<&str> = version.split('.').collect();
    let well_formed = (2..=3).contains(&parts.len())
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()));

    if well_formed {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: "version".to_string(),
            reason: format!("'{version}' is not a WAPI version like 2.10"),
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
