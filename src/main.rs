// src/main.rs

//! The main entry point for the CitrineDB server application.

use anyhow::Result;
use citrinedb::config::Config;
use citrinedb::server;
use std::env;
use tracing::error;
use tracing_subscriber::filter::EnvFilter;

fn main() -> Result<()> {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let args: Vec<String> = env::args().collect();

    if args.contains(&"--version".to_string()) {
        println!("CitrineDB version {VERSION}");
        return Ok(());
    }

    // The configuration path can be provided via a --config flag; otherwise
    // "config.toml" is used when present and built-in defaults when not.
    let explicit_config_path = args
        .iter()
        .position(|arg| arg == "--config")
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str());

    let mut config = match explicit_config_path {
        Some(path) => match Config::from_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Failed to load configuration from \"{path}\": {e}");
                std::process::exit(1);
            }
        },
        None => match Config::from_file("config.toml") {
            Ok(cfg) => cfg,
            Err(_) => Config::default(),
        },
    };

    // Override the listen port if provided as a command-line argument.
    if let Some(port_index) = args.iter().position(|arg| arg == "--port") {
        if let Some(port_str) = args.get(port_index + 1) {
            match port_str.parse::<u16>() {
                Ok(port) => config.port = port,
                Err(_) => {
                    eprintln!("Invalid port number: {port_str}");
                    std::process::exit(1);
                }
            }
        } else {
            eprintln!("--port flag requires a value");
            std::process::exit(1);
        }
    }

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .compact()
        .with_ansi(true)
        .init();

    // The runtime is built by hand so that `worker.threads` from the
    // configuration controls the executor size.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.worker.threads.max(1))
        .enable_all()
        .build()?;

    if let Err(e) = runtime.block_on(server::run(config)) {
        error!("Server runtime error: {}", e);
        return Err(e);
    }

    Ok(())
}
