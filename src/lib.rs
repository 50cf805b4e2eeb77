// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # ibdns - Infoblox DNS record client
//!
//! ibdns manages A, AAAA, CNAME and TXT record sets on an Infoblox grid through the
//! Infoblox Web API (WAPI).
//!
//! ## Overview
//!
//! The library exposes a record-set level [`client::DnsClient`] trait and its WAPI
//! implementation, [`client::InfobloxDnsClient`]:
//!
//! - List the authoritative zones of the grid
//! - Read the records of a zone, falling back to the Grid Master when the grid
//!   member cannot answer
//! - Replace the records of one name and type
//! - Delete the records of one name and type
//!
//! ## Modules
//!
//! - [`client`] - Record-set operations
//! - [`config`] - Connection configuration and its resolution
//! - [`records`] - Record types and WAPI record bodies
//! - [`wapi`] - HTTP connector and URL construction for WAPI
//! - [`retry`] - Exponential backoff for transient WAPI failures
//! - [`dns_errors`] - Error types
//! - [`cli`] - The `ibdns` command line
//!
//! ## Example
//!
//! ```rust,no_run
//! use ibdns::client::{DnsClient, InfobloxDnsClient};
//! use ibdns::records::RecordType;
//!
//! # async fn example() -> ibdns::dns_errors::Result<()> {
//! let client = InfobloxDnsClient::new("admin", "infoblox", "10.0.0.10")?;
//!
//! for (reference, zone) in client.get_managed_zones().await? {
//!     println!("{zone} ({reference})");
//! }
//!
//! client
//!     .create_or_update_record_set(
//!         "default",
//!         "www.example.com",
//!         "example.com",
//!         RecordType::A,
//!         &["192.0.2.10".to_string()],
//!         300,
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod dns_errors;
pub mod http_errors;
pub mod records;
pub mod retry;
pub mod status_reasons;
pub mod wapi;

pub use client::{DnsClient, InfobloxDnsClient};
pub use config::{Credentials, InfobloxConfig};
pub use dns_errors::{DnsError, Result};
pub use records::{Record, RecordSet, RecordType};
