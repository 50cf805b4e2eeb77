// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::Result;
use clap::Parser;
use ibdns::{
    cli::{completions, run_command, Cli, Commands},
    client::InfobloxDnsClient,
    dns_errors::DnsError,
};
use tracing::{debug, error, info};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Completions need neither logging nor a runtime
    if let Commands::Completions { shell } = cli.command {
        print!("{}", completions(shell));
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("ibdns")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cli))
}

async fn async_main(cli: Cli) -> Result<()> {
    // Logs go to stderr so command output on stdout stays parseable
    //
    // Respects RUST_LOG environment variable if set, otherwise defaults to WARN level
    // Example: RUST_LOG=debug ibdns zones
    //
    // Respects RUST_LOG_FORMAT environment variable for output format
    // Example: RUST_LOG_FORMAT=json ibdns zones
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }

    debug!("Logging initialized");

    let config = cli.global.resolve_config()?;
    let credentials = cli.global.credentials()?;
    let client = InfobloxDnsClient::from_config(&config, credentials)?;

    info!(
        host = ?config.host,
        view = %client.default_view(),
        "Created Infoblox DNS client"
    );

    let view = client.default_view().to_string();

    let output = tokio::select! {
        result = run_command(&client, &cli.command, &view, cli.global.is_json) => match result {
            Ok(output) => output,
            Err(e) => {
                if let Some(dns_error) = e.downcast_ref::<DnsError>() {
                    error!(
                        reason = dns_error.status_reason(),
                        http_status = ?dns_error.http_status(),
                        transient = dns_error.is_transient(),
                        "Command failed"
                    );
                }
                return Err(e);
            }
        },
        () = shutdown_signal() => {
            error!("Interrupted, aborting before the command completed");
            anyhow::bail!("interrupted");
        }
    };

    print!("{output}");
    if cli.global.is_json {
        println!();
    }
    Ok(())
}

/// Wait for SIGINT or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT"),
        () = terminate => info!("Received SIGTERM"),
    }
}
