// # hostsdnsd - hosts-file webhook daemon
//
// Thin integration layer: all provider logic lives in hostsdns-core and
// the HTTP surface in hostsdns-webhook.
//
// The daemon is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Building the record store and provider
// 4. Serving the webhook until SIGINT/SIGTERM
//
// ## Configuration
//
// - `HOSTSDNS_LISTEN_ADDRESS`: Address to listen on (default 127.0.0.1)
// - `HOSTSDNS_PORT`: Port to listen on (default 8888)
// - `HOSTSDNS_HOSTS_FILE`: Hosts file to manage (default /etc/hosts)
// - `HOSTSDNS_WRITE_MODE`: atomic or in-place (default atomic)
// - `HOSTSDNS_STORE_TYPE`: file or memory (default file)
// - `HOSTSDNS_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export HOSTSDNS_LISTEN_ADDRESS=0.0.0.0
// export HOSTSDNS_HOSTS_FILE=/host/etc/hosts
// export HOSTSDNS_WRITE_MODE=in-place
//
// hostsdnsd
// ```

use anyhow::{Context, Result};
use hostsdns_core::config::DEFAULT_HOSTS_PATH;
use hostsdns_core::{HostsProvider, RecordStoreConfig, WebhookConfig, WriteMode, build_store};
use std::env;
use std::net::IpAddr;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy)]
enum DaemonExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DaemonExitCode> for ExitCode {
    fn from(code: DaemonExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Raw settings read from the environment
#[derive(Debug)]
struct Settings {
    listen_address: String,
    port: String,
    hosts_file: String,
    write_mode: String,
    store_type: String,
    log_level: String,
}

impl Settings {
    /// Load settings from environment variables
    fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        Self {
            listen_address: get("HOSTSDNS_LISTEN_ADDRESS", "127.0.0.1"),
            port: get("HOSTSDNS_PORT", "8888"),
            hosts_file: get("HOSTSDNS_HOSTS_FILE", DEFAULT_HOSTS_PATH),
            write_mode: get("HOSTSDNS_WRITE_MODE", "atomic"),
            store_type: get("HOSTSDNS_STORE_TYPE", "file"),
            log_level: get("HOSTSDNS_LOG_LEVEL", "info"),
        }
    }

    /// Validate the settings and turn them into a webhook configuration
    fn into_config(self) -> Result<(WebhookConfig, Level)> {
        let listen_address: IpAddr = self.listen_address.trim().parse().with_context(|| {
            format!(
                "HOSTSDNS_LISTEN_ADDRESS '{}' is not an IP address",
                self.listen_address
            )
        })?;

        let port: u16 = self.port.trim().parse().with_context(|| {
            format!(
                "HOSTSDNS_PORT must be between 0 and 65535. Got: {}",
                self.port
            )
        })?;

        let store = match self.store_type.trim().to_lowercase().as_str() {
            "file" => RecordStoreConfig::File {
                path: self.hosts_file.clone(),
                write_mode: self
                    .write_mode
                    .parse::<WriteMode>()
                    .context("HOSTSDNS_WRITE_MODE")?,
            },
            "memory" => RecordStoreConfig::Memory {
                initial: String::new(),
            },
            other => anyhow::bail!(
                "HOSTSDNS_STORE_TYPE '{}' is not supported. \
                Supported types: file, memory",
                other
            ),
        };

        let log_level = match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => anyhow::bail!(
                "HOSTSDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        };

        let config = WebhookConfig::new()
            .with_listen(listen_address, port)
            .with_store(store);
        config.validate()?;

        Ok((config, log_level))
    }
}

fn main() -> ExitCode {
    let (config, log_level) = match Settings::from_env().into_config() {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return DaemonExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DaemonExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DaemonExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("Daemon error: {:#}", e);
            DaemonExitCode::RuntimeError
        } else {
            DaemonExitCode::CleanShutdown
        }
    })
    .into()
}

/// Run the daemon until a shutdown signal arrives
async fn run_daemon(config: WebhookConfig) -> Result<()> {
    info!("Store type: {}", config.store.type_name());

    let provider = Arc::new(HostsProvider::new(build_store(&config.store)));
    let server = hostsdns_webhook::start_server(config.socket_addr(), provider)
        .await
        .with_context(|| format!("failed to listen on {}", config.socket_addr()))?;

    let signal = wait_for_shutdown().await?;
    info!("Received shutdown signal: {}", signal);

    server.shutdown().await.context("server did not shut down cleanly")?;
    info!("Webhook provider stopped");
    Ok(())
}

/// Wait for SIGTERM or SIGINT
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    let received = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    Ok(received)
}

/// Wait for CTRL-C
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
