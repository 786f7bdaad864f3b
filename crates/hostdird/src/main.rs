// # hostdird - Host Directory Daemon
//
// This is a THIN host over hostdir-core. It parses configuration, loads the
// directory and forwards text commands to it; all lookup, uniqueness and
// persistence logic lives in hostdir-core.
//
// The hostdird binary is responsible for:
// 1. Reading configuration from environment variables (or a JSON file)
// 2. Initializing logging and the runtime
// 3. Loading the directory from its backing store
// 4. Serving commands, interactively or over TCP
//
// ## Configuration
//
// - `HOSTDIR_CONFIG`: Path to a JSON config file (overrides the variables below)
// - `HOSTDIR_STORE_TYPE`: Type of store (file, memory)
// - `HOSTDIR_STORE_PATH`: Path to the store file (default: dns.txt)
// - `HOSTDIR_LISTEN_ADDR`: Serve the line protocol on this address; without
//   it, commands are read from stdin
// - `HOSTDIR_MAX_LINE_BYTES`: Longest accepted command line (default: 1024)
// - `HOSTDIR_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export HOSTDIR_STORE_PATH=/var/lib/hostdir/dns.txt
// export HOSTDIR_LISTEN_ADDR=127.0.0.1:5353
//
// hostdird
// ```

mod input;
mod server;
mod session;
mod shell;

use anyhow::{Context, Result};
use hostdir_core::{Directory, HostdirConfig, ServerConfig, StoreConfig};
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum HostdirExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<HostdirExitCode> for ExitCode {
    fn from(code: HostdirExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Settings read from the environment
struct EnvSettings {
    config_path: Option<String>,
    store_type: String,
    store_path: String,
    listen_addr: Option<String>,
    max_line_bytes: Option<String>,
    log_level: String,
}

impl EnvSettings {
    /// Load settings from environment variables
    fn from_env() -> Self {
        Self {
            config_path: env::var("HOSTDIR_CONFIG").ok(),
            store_type: env::var("HOSTDIR_STORE_TYPE").unwrap_or_else(|_| "file".to_string()),
            store_path: env::var("HOSTDIR_STORE_PATH").unwrap_or_else(|_| "dns.txt".to_string()),
            listen_addr: env::var("HOSTDIR_LISTEN_ADDR").ok().filter(|s| !s.is_empty()),
            max_line_bytes: env::var("HOSTDIR_MAX_LINE_BYTES").ok(),
            log_level: env::var("HOSTDIR_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }

    /// Parse the log level
    fn log_level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "HOSTDIR_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }

    /// Build the directory configuration from the variables
    fn to_config(&self) -> Result<HostdirConfig> {
        let store = match self.store_type.as_str() {
            "file" => StoreConfig::File {
                path: self.store_path.clone(),
            },
            "memory" => StoreConfig::Memory { lines: Vec::new() },
            other => anyhow::bail!(
                "HOSTDIR_STORE_TYPE '{}' is not supported. \
                Supported types: file, memory",
                other
            ),
        };

        let mut server = ServerConfig {
            listen_addr: self.listen_addr.clone(),
            ..ServerConfig::default()
        };
        if let Some(raw) = &self.max_line_bytes {
            server.max_line_bytes = raw.parse().with_context(|| {
                format!("HOSTDIR_MAX_LINE_BYTES must be a positive integer. Got: {}", raw)
            })?;
        }

        let config = HostdirConfig { store, server };
        config.validate()?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    let settings = EnvSettings::from_env();

    let log_level = match settings.log_level() {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration validation error: {}", e);
            return HostdirExitCode::ConfigError.into();
        }
    };

    // Logs go to stderr; stdout carries replies in interactive mode
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return HostdirExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return HostdirExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        let config = match load_config(&settings).await {
            Ok(config) => config,
            Err(e) => {
                error!("Configuration error: {:#}", e);
                return HostdirExitCode::ConfigError;
            }
        };

        let directory = match open_directory(&config.store).await {
            Ok(directory) => Arc::new(directory),
            Err(e) => {
                error!("Failed to load directory: {:#}", e);
                return HostdirExitCode::ConfigError;
            }
        };

        match run(config.server, directory).await {
            Ok(()) => HostdirExitCode::CleanShutdown,
            Err(e) => {
                error!("Runtime error: {:#}", e);
                HostdirExitCode::RuntimeError
            }
        }
    })
    .into()
}

/// JSON file if `HOSTDIR_CONFIG` is set, environment variables otherwise
async fn load_config(settings: &EnvSettings) -> Result<HostdirConfig> {
    match &settings.config_path {
        Some(path) => HostdirConfig::from_json_file(path)
            .await
            .with_context(|| format!("Failed to load config file {}", path)),
        None => settings.to_config(),
    }
}

async fn open_directory(store_config: &StoreConfig) -> Result<Directory> {
    info!("Store type: {}", store_config.type_name());
    let store = store_config.build().await?;
    let directory = Directory::load(store).await?;
    info!(
        "Loaded {} record(s) from {}",
        directory.len().await,
        directory.store_description()
    );
    Ok(directory)
}

async fn run(server_config: ServerConfig, directory: Arc<Directory>) -> Result<()> {
    match server_config.socket_addr()? {
        Some(addr) => {
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;
            server::serve(
                listener,
                directory,
                server_config.max_line_bytes,
                wait_for_shutdown(),
            )
            .await
        }
        None => shell::run(&directory, server_config.max_line_bytes).await,
    }
}

/// Wait for SIGTERM or SIGINT
#[cfg(unix)]
async fn wait_for_shutdown() {
    let (mut sigterm, mut sigint) = match (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) {
        (Ok(term), Ok(int)) => (term, int),
        _ => {
            error!("Failed to set up signal handlers, falling back to Ctrl-C");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    let name = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    info!("Received shutdown signal: {}", name);
}

/// Wait for Ctrl-C
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Received shutdown signal: SIGINT");
}
