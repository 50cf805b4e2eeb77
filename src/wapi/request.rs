// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! WAPI URL construction.
//!
//! Every WAPI endpoint lives under `{base}/wapi/v{version}/`. Object types
//! (`record:a`) and object references (`record:a/ZG5z...:www.example.com/default`)
//! are appended to the path verbatim, followed by the query parameters WAPI uses for
//! searches (`_return_fields`, `_max_results`, `_proxy_search` and search fields).

use std::collections::BTreeMap;
use url::Url;

use crate::config::HostConfig;
use crate::constants::{
    PARAM_MAX_RESULTS, PARAM_PROXY_SEARCH, PARAM_RETURN_FIELDS, PROXY_SEARCH_GRID_MASTER,
    WAPI_PATH_PREFIX,
};

/// Query options for a single WAPI request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    /// Send `_proxy_search=GM` so the grid member forwards the search to the Grid Master
    pub force_proxy: bool,
    /// Search fields, e.g. `zone=example.com`
    pub search_fields: BTreeMap<String, String>,
}

impl QueryParams {
    /// Query params searching by one field.
    #[must_use]
    pub fn search(field: &str, value: &str) -> Self {
        Self::default().with_field(field, value)
    }

    /// Add a search field.
    #[must_use]
    pub fn with_field(mut self, field: &str, value: &str) -> Self {
        self.search_fields
            .insert(field.to_string(), value.to_string());
        self
    }

    /// Set or clear the Grid Master proxy flag.
    #[must_use]
    pub fn with_proxy(mut self, force_proxy: bool) -> Self {
        self.force_proxy = force_proxy;
        self
    }
}

/// Builds WAPI URLs for one grid member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WapiRequestBuilder {
    base_url: Url,
    version: String,
    max_results: i32,
}

impl WapiRequestBuilder {
    /// Create a builder from a resolved host configuration.
    ///
    /// `max_results` of zero omits `_max_results` from searches.
    #[must_use]
    pub fn new(host: &HostConfig, max_results: i32) -> Self {
        Self {
            base_url: host.base_url.clone(),
            version: host.version.clone(),
            max_results,
        }
    }

    /// WAPI root, e.g. `https://10.0.0.10/wapi/v2.10/`.
    #[must_use]
    pub fn api_root(&self) -> Url {
        self.object_url("")
    }

    /// Build a search URL for an object type or object reference.
    ///
    /// `return_fields` becomes `_return_fields`; an empty slice leaves the WAPI
    /// defaults. Search fields are emitted in key order, `_max_results` and
    /// `_proxy_search` last.
    #[must_use]
    pub fn build_url(&self, object: &str, return_fields: &[&str], query: &QueryParams) -> Url {
        let mut url = self.object_url(object);

        let mut params: Vec<(&str, String)> = Vec::new();
        if !return_fields.is_empty() {
            params.push((PARAM_RETURN_FIELDS, return_fields.join(",")));
        }
        for (field, value) in &query.search_fields {
            params.push((field.as_str(), value.clone()));
        }
        if self.max_results != 0 {
            params.push((PARAM_MAX_RESULTS, self.max_results.to_string()));
        }
        if query.force_proxy {
            params.push((PARAM_PROXY_SEARCH, PROXY_SEARCH_GRID_MASTER.to_string()));
        }

        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        url
    }

    /// URL for a write (`POST` to an object type, `DELETE` of a reference).
    ///
    /// Writes carry no query; search options such as `_max_results` only apply to
    /// `GET`.
    #[must_use]
    pub fn write_url(&self, object: &str) -> Url {
        self.object_url(object)
    }

    /// Base URL, path and object, without any query.
    ///
    /// References keep their own escaping; they are returned by WAPI ready for use
    /// in a path.
    fn object_url(&self, object: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);

        let base_path = url.path().trim_end_matches('/').to_string();
        let object = object.trim_start_matches('/');
        url.set_path(&format!(
            "{base_path}/{WAPI_PATH_PREFIX}/v{}/{object}",
            self.version
        ));
        url
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod request_tests;
