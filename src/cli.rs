// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Command-line interface for `ibdns`.
//!
//! Argument parsing uses clap derive macros. Connection options are global and can
//! also come from `IBDNS_*` environment variables or a configuration file; see
//! [`GlobalOptions::resolve_config`] for the precedence.
//!
//! Command execution is separated from process concerns (logging, signals,
//! printing) so that it can run against any [`DnsClient`].

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use serde_json::json;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::client::DnsClient;
use crate::config::{Credentials, InfobloxConfig};
use crate::records::{RecordSet, RecordType};

/// Manage DNS records on an Infoblox grid through WAPI.
#[derive(Parser, Debug)]
#[command(name = "ibdns")]
#[command(version)]
#[command(about = "Manage A, AAAA, CNAME and TXT records on an Infoblox grid")]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Commands,
}

/// Connection and output options shared by all commands.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// YAML or JSON configuration file.
    #[arg(long, env = "IBDNS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Grid member host name or address (may include http:// or https://).
    #[arg(long, env = "IBDNS_HOST", global = true)]
    pub host: Option<String>,

    /// WAPI port.
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// WAPI user name.
    #[arg(long, env = "IBDNS_USERNAME", global = true)]
    pub username: Option<String>,

    /// WAPI password.
    #[arg(long, env = "IBDNS_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// DNS view for new records.
    #[arg(long, env = "IBDNS_VIEW", global = true)]
    pub view: Option<String>,

    /// WAPI version (e.g. 2.10).
    #[arg(long = "wapi-version", global = true)]
    pub wapi_version: Option<String>,

    /// Verify the grid's TLS certificate (true or false).
    #[arg(long = "ssl-verify", global = true)]
    pub ssl_verify: Option<bool>,

    /// HTTP(S) proxy used to reach the grid.
    #[arg(long = "proxy-url", global = true)]
    pub proxy_url: Option<String>,

    /// Output JSON instead of human-readable text.
    #[arg(long = "json", global = true)]
    pub is_json: bool,
}

/// Available commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List authoritative zones.
    Zones,

    /// List records in a zone.
    Records(RecordsArgs),

    /// Replace the records of a name and type.
    ///
    /// Without any --value the record set is removed.
    Upsert(UpsertArgs),

    /// Delete the records of a name and type.
    Delete(DeleteArgs),

    /// Print shell completions.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Arguments of `ibdns records`.
#[derive(Args, Debug, Clone)]
pub struct RecordsArgs {
    /// Zone to search (e.g. example.com).
    #[arg(long)]
    pub zone: String,

    /// Record type: A, AAAA, CNAME or TXT.
    #[arg(long = "type", default_value = "A", value_parser = parse_record_type)]
    pub record_type: RecordType,

    /// List every supported record in the zone, without values.
    #[arg(long)]
    pub all: bool,
}

/// Arguments of `ibdns upsert`.
#[derive(Args, Debug, Clone)]
pub struct UpsertArgs {
    /// Zone holding the record.
    #[arg(long)]
    pub zone: String,

    /// Fully qualified record name.
    #[arg(long)]
    pub name: String,

    /// Record type: A, AAAA, CNAME or TXT.
    #[arg(long = "type", value_parser = parse_record_type)]
    pub record_type: RecordType,

    /// Record value; repeat for several values.
    #[arg(long = "value")]
    pub values: Vec<String>,

    /// TTL in seconds; 0 inherits the zone default.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub ttl: i64,
}

/// Arguments of `ibdns delete`.
#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    /// Zone holding the record.
    #[arg(long)]
    pub zone: String,

    /// Fully qualified record name.
    #[arg(long)]
    pub name: String,

    /// Record type: A, AAAA, CNAME or TXT.
    #[arg(long = "type", value_parser = parse_record_type)]
    pub record_type: RecordType,
}

fn parse_record_type(value: &str) -> std::result::Result<RecordType, String> {
    value.parse().map_err(|e: crate::dns_errors::RecordError| e.to_string())
}

impl GlobalOptions {
    /// Build the effective configuration.
    ///
    /// Precedence, lowest first: built-in defaults, configuration file, flags and
    /// environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be loaded.
    pub fn resolve_config(&self) -> Result<InfobloxConfig> {
        let mut config = InfobloxConfig::with_defaults();

        if let Some(path) = &self.config {
            let file = InfobloxConfig::from_file(path)?;
            config = config.merge(file);
        }

        Ok(config.merge(self.overrides()))
    }

    /// Credentials from flags or environment.
    ///
    /// # Errors
    ///
    /// Returns an error if no user name was given.
    pub fn credentials(&self) -> Result<Credentials> {
        let username = self
            .username
            .clone()
            .filter(|u| !u.trim().is_empty())
            .context("a WAPI user name is required (--username or IBDNS_USERNAME)")?;

        Ok(Credentials::new(
            username,
            self.password.clone().unwrap_or_default(),
        ))
    }

    fn overrides(&self) -> InfobloxConfig {
        InfobloxConfig {
            host: self.host.clone(),
            port: self.port,
            ssl_verify: self.ssl_verify,
            version: self.wapi_version.clone(),
            view: self.view.clone(),
            proxy_url: self.proxy_url.clone(),
            ..InfobloxConfig::default()
        }
    }
}

/// Run one record command and render its output.
///
/// `view` is the DNS view for new records. Completions are not handled here; see
/// [`completions`].
///
/// # Errors
///
/// Returns the DNS client error, or an error for [`Commands::Completions`].
pub async fn run_command(
    client: &dyn DnsClient,
    command: &Commands,
    view: &str,
    is_json: bool,
) -> Result<String> {
    match command {
        Commands::Zones => {
            let zones = client
                .get_managed_zones()
                .await
                .context("failed to list zones")?;
            Ok(render_zones(&zones, is_json))
        }
        Commands::Records(args) => {
            let records = client
                .get_record_set(args.all, args.record_type, &args.zone)
                .await
                .with_context(|| format!("failed to list records in zone {}", args.zone))?;
            Ok(render_records(&records, is_json))
        }
        Commands::Upsert(args) => {
            client
                .create_or_update_record_set(
                    view,
                    &args.name,
                    &args.zone,
                    args.record_type,
                    &args.values,
                    args.ttl,
                )
                .await
                .with_context(|| {
                    format!("failed to update {} record set {}", args.record_type, args.name)
                })?;

            let summary = if args.values.is_empty() {
                format!("Removed {} record set {}", args.record_type, args.name)
            } else {
                format!(
                    "Updated {} record set {} ({} value(s))",
                    args.record_type,
                    args.name,
                    args.values.len()
                )
            };
            Ok(render_status(
                &summary,
                json!({
                    "status": "ok",
                    "name": args.name,
                    "zone": args.zone,
                    "type": args.record_type,
                    "values": args.values,
                }),
                is_json,
            ))
        }
        Commands::Delete(args) => {
            client
                .delete_record_set(&args.zone, &args.name, args.record_type)
                .await
                .with_context(|| {
                    format!("failed to delete {} record set {}", args.record_type, args.name)
                })?;

            Ok(render_status(
                &format!("Deleted {} record set {}", args.record_type, args.name),
                json!({
                    "status": "ok",
                    "name": args.name,
                    "zone": args.zone,
                    "type": args.record_type,
                }),
                is_json,
            ))
        }
        Commands::Completions { .. } => {
            anyhow::bail!("completions do not need a DNS client")
        }
    }
}

/// Shell completion script for `ibdns`.
#[must_use]
pub fn completions(shell: clap_complete::Shell) -> String {
    let mut command = Cli::command();
    let mut buffer = Vec::new();
    clap_complete::generate(shell, &mut command, "ibdns", &mut buffer);
    String::from_utf8_lossy(&buffer).into_owned()
}

fn render_zones(zones: &BTreeMap<String, String>, is_json: bool) -> String {
    if is_json {
        return json!(zones).to_string();
    }

    // Sort by zone name for reading, the map is keyed by reference
    let mut rows: Vec<(&String, &String)> = zones.iter().map(|(r, fqdn)| (fqdn, r)).collect();
    rows.sort();

    rows.into_iter()
        .map(|(fqdn, reference)| format!("{fqdn}\t{reference}\n"))
        .collect()
}

fn render_records(records: &RecordSet, is_json: bool) -> String {
    if is_json {
        return json!(records).to_string();
    }

    records
        .iter()
        .map(|record| {
            let ttl = record
                .ttl
                .map_or_else(|| "-".to_string(), |ttl| ttl.to_string());
            format!(
                "{}\t{}\t{}\t{}\n",
                record.name,
                record.record_type,
                ttl,
                record.value.as_deref().unwrap_or("-")
            )
        })
        .collect()
}

fn render_status(summary: &str, body: serde_json::Value, is_json: bool) -> String {
    if is_json {
        body.to_string()
    } else {
        format!("{summary}\n")
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod cli_tests;
