// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! DNS record set management on an Infoblox grid.
//!
//! [`DnsClient`] is the record-set level interface: list zones, read record sets,
//! replace a record set and delete a record set. [`InfobloxDnsClient`] implements it
//! on top of a [`WapiConnector`].
//!
//! ## Record set replacement
//!
//! Upserts follow an observe, diff, act loop:
//!
//! 1. Validate every desired value before touching the grid
//! 2. Read the current records of the type in the zone and keep those with the name
//! 3. Skip the change when values and TTL already match
//! 4. Otherwise delete the current records and create one record per value
//!
//! ## Grid Master fallback
//!
//! Grid members do not always hold every zone. When a direct record search fails,
//! it is repeated once with `_proxy_search=GM` so the member forwards it to the
//! Grid Master.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

use crate::config::{Credentials, InfobloxConfig};
use crate::constants::{
    ALL_RECORDS_RETURN_FIELDS, OBJECT_ALL_RECORDS, OBJECT_ZONE_AUTH, SEARCH_FIELD_ZONE,
    ZONE_AUTH_RETURN_FIELDS,
};
use crate::dns_errors::{DnsError, GridError, RecordError, Result};
use crate::records::{NewRecord, Record, RecordSet, RecordType};
use crate::wapi::{QueryParams, WapiConnector, WapiRecord, ZoneAuth};

/// Record-set operations against a DNS provider.
#[async_trait]
pub trait DnsClient: Send + Sync {
    /// List authoritative zones as a map of zone reference to zone name.
    async fn get_managed_zones(&self) -> Result<BTreeMap<String, String>>;

    /// Replace the records of one name and type with `values`.
    ///
    /// `ttl` of zero or less inherits the zone default. An empty `values` removes
    /// the record set.
    async fn create_or_update_record_set(
        &self,
        view: &str,
        name: &str,
        zone: &str,
        record_type: RecordType,
        values: &[String],
        ttl: i64,
    ) -> Result<()>;

    /// Delete every record of one name and type in a zone.
    ///
    /// Deleting a record set that does not exist is not an error.
    async fn delete_record_set(&self, zone: &str, name: &str, record_type: RecordType)
        -> Result<()>;

    /// Read the records of a zone.
    ///
    /// With `fetch_all` every supported record in the zone is listed through
    /// `allrecords` (without values) and `record_type` is ignored; otherwise only
    /// records of `record_type` are listed.
    async fn get_record_set(
        &self,
        fetch_all: bool,
        record_type: RecordType,
        zone: &str,
    ) -> Result<RecordSet>;
}

/// [`DnsClient`] backed by Infoblox WAPI.
#[derive(Debug, Clone)]
pub struct InfobloxDnsClient {
    connector: WapiConnector,
    default_view: String,
}

impl InfobloxDnsClient {
    /// Create a client for `host` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the host or credentials are invalid.
    pub fn new(username: &str, password: &str, host: &str) -> Result<Self> {
        let config = InfobloxConfig {
            host: Some(host.to_string()),
            ..InfobloxConfig::with_defaults()
        };
        Self::from_config(&config, Credentials::new(username, password))
    }

    /// Create a client from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not resolve (see
    /// [`InfobloxConfig::host_config`] and [`InfobloxConfig::transport_config`]).
    pub fn from_config(config: &InfobloxConfig, credentials: Credentials) -> Result<Self> {
        let host = config.host_config(credentials)?;
        let transport = config.transport_config()?;

        Ok(Self {
            connector: WapiConnector::new(&host, &transport)?,
            default_view: config.view_or_default().to_string(),
        })
    }

    /// DNS view used when callers pass an empty view.
    #[must_use]
    pub fn default_view(&self) -> &str {
        &self.default_view
    }

    /// Underlying WAPI connector.
    #[must_use]
    pub fn connector(&self) -> &WapiConnector {
        &self.connector
    }

    /// Create one record and return its reference.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::RecordCreationFailed`] when WAPI rejects the record, or
    /// the underlying transport error.
    pub async fn create_record(&self, record: &NewRecord) -> Result<String> {
        let object_type = record.record_type.object_type();

        match self.connector.create_object(object_type, record).await {
            Ok(reference) => {
                info!(
                    name = %record.name,
                    record_type = %record.record_type,
                    value = %record.value(),
                    ttl = ?record.ttl,
                    reference = %reference,
                    "Created DNS record"
                );
                Ok(reference)
            }
            Err(DnsError::Grid(GridError::WapiRejected {
                status_code, text, ..
            })) if !is_retryable(status_code) => Err(RecordError::RecordCreationFailed {
                name: record.name.clone(),
                record_type: record.record_type.to_string(),
                reason: text,
            }
            .into()),
            Err(e) => Err(e),
        }
    }

    /// Delete one record by reference.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::RecordDeletionFailed`] when WAPI rejects the deletion,
    /// or the underlying transport error.
    pub async fn delete_record(&self, record: &Record) -> Result<()> {
        match self.connector.delete_object(record.id()).await {
            Ok(_) => {
                info!(
                    name = %record.name,
                    record_type = %record.record_type,
                    reference = %record.reference,
                    "Deleted DNS record"
                );
                Ok(())
            }
            Err(DnsError::Grid(GridError::WapiRejected {
                status_code, text, ..
            })) if !is_retryable(status_code) => Err(RecordError::RecordDeletionFailed {
                reference: record.reference.clone(),
                reason: text,
            }
            .into()),
            Err(e) => Err(e),
        }
    }

    /// Records of one name and type in a zone, optionally restricted to a view.
    async fn existing_records(
        &self,
        zone: &str,
        name: &str,
        record_type: RecordType,
        view: Option<&str>,
    ) -> Result<RecordSet> {
        let records = self.get_record_set(false, record_type, zone).await?;

        Ok(records
            .into_iter()
            .filter(|r| !r.id().is_empty() && r.matches_name(name))
            .filter(|r| match (view, r.view.as_deref()) {
                (Some(wanted), Some(actual)) => wanted == actual,
                _ => true,
            })
            .collect())
    }

    /// One record search, direct or through the Grid Master.
    async fn search_records(
        &self,
        fetch_all: bool,
        record_type: RecordType,
        zone: &str,
        force_proxy: bool,
    ) -> Result<RecordSet> {
        let query = QueryParams::search(SEARCH_FIELD_ZONE, zone).with_proxy(force_proxy);

        if fetch_all {
            let entries: Vec<WapiRecord> = self
                .connector
                .get_objects(OBJECT_ALL_RECORDS, ALL_RECORDS_RETURN_FIELDS, &query)
                .await?;
            return Ok(entries
                .into_iter()
                .filter_map(Record::from_all_records)
                .collect());
        }

        let entries: Vec<WapiRecord> = self
            .connector
            .get_objects(
                record_type.object_type(),
                &record_type.return_fields(),
                &query,
            )
            .await?;
        Ok(entries
            .into_iter()
            .map(|entry| Record::from_typed(entry, record_type))
            .collect())
    }
}

#[async_trait]
impl DnsClient for InfobloxDnsClient {
    async fn get_managed_zones(&self) -> Result<BTreeMap<String, String>> {
        let zones: Vec<ZoneAuth> = self
            .connector
            .get_objects(
                OBJECT_ZONE_AUTH,
                ZONE_AUTH_RETURN_FIELDS,
                &QueryParams::default(),
            )
            .await?;

        debug!(count = zones.len(), "Fetched authoritative zones");

        Ok(zones
            .into_iter()
            .map(|zone| (zone.reference, zone.fqdn))
            .collect())
    }

    async fn create_or_update_record_set(
        &self,
        view: &str,
        name: &str,
        zone: &str,
        record_type: RecordType,
        values: &[String],
        ttl: i64,
    ) -> Result<()> {
        let view = if view.trim().is_empty() {
            self.default_view.as_str()
        } else {
            view
        };

        // All values are validated before anything is deleted
        let mut desired = values
            .iter()
            .map(|value| NewRecord::build(record_type, name, view, value, ttl))
            .collect::<Result<Vec<_>, RecordError>>()?;
        let mut seen = BTreeSet::new();
        desired.retain(|record| seen.insert(record.value().to_string()));

        let existing = self
            .existing_records(zone, name, record_type, Some(view))
            .await?;

        if record_set_matches(&existing, &desired) {
            info!(
                name = %name,
                zone = %zone,
                record_type = %record_type,
                "Record set already up to date, skipping"
            );
            return Ok(());
        }

        info!(
            name = %name,
            zone = %zone,
            view = %view,
            record_type = %record_type,
            existing = existing.len(),
            desired = desired.len(),
            "Replacing record set"
        );

        for record in &existing {
            self.delete_record(record).await?;
        }
        for record in &desired {
            self.create_record(record).await?;
        }

        Ok(())
    }

    async fn delete_record_set(
        &self,
        zone: &str,
        name: &str,
        record_type: RecordType,
    ) -> Result<()> {
        let existing = self.existing_records(zone, name, record_type, None).await?;

        if existing.is_empty() {
            info!(
                name = %name,
                zone = %zone,
                record_type = %record_type,
                "No records to delete"
            );
            return Ok(());
        }

        for record in &existing {
            self.delete_record(record).await?;
        }
        Ok(())
    }

    async fn get_record_set(
        &self,
        fetch_all: bool,
        record_type: RecordType,
        zone: &str,
    ) -> Result<RecordSet> {
        match self.search_records(fetch_all, record_type, zone, false).await {
            Ok(records) => Ok(records),
            Err(e) => {
                warn!(
                    zone = %zone,
                    record_type = %record_type,
                    fetch_all = fetch_all,
                    error = %e,
                    "Record search failed, retrying through the Grid Master"
                );
                self.search_records(fetch_all, record_type, zone, true)
                    .await
            }
        }
    }
}

/// Check whether the existing records already hold the desired values.
///
/// Values are compared as sets. CNAME targets ignore case and a trailing dot, other
/// values must match exactly. The TTL is only compared when the desired records set
/// one.
pub(crate) fn record_set_matches(existing: &[Record], desired: &[NewRecord]) -> bool {
    if existing.len() != desired.len() {
        return false;
    }

    let normalize = |record_type: RecordType, value: &str| -> String {
        if record_type == RecordType::CNAME {
            value.trim().trim_end_matches('.').to_ascii_lowercase()
        } else {
            value.to_string()
        }
    };

    let current: BTreeSet<String> = existing
        .iter()
        .filter_map(|r| r.value.as_deref().map(|v| normalize(r.record_type, v)))
        .collect();
    let wanted: BTreeSet<String> = desired
        .iter()
        .map(|r| normalize(r.record_type, r.value()))
        .collect();

    if current.len() != existing.len() || current != wanted {
        return false;
    }

    desired
        .iter()
        .filter_map(|r| r.ttl)
        .all(|ttl| existing.iter().all(|r| r.ttl == Some(ttl)))
}

fn is_retryable(status_code: u16) -> bool {
    reqwest::StatusCode::from_u16(status_code).is_ok_and(crate::retry::is_retryable_http_status)
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod client_tests;
