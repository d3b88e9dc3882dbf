// src/config.rs

//! Manages server configuration: loading from a TOML file and validation.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

/// Tuning for the connection-accepting side of the server.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct AcceptConfig {
    /// Number of acceptor tasks pulling from the shared listener.
    #[serde(default = "default_accept_threads")]
    pub threads: usize,
}

impl Default for AcceptConfig {
    fn default() -> Self {
        Self {
            threads: default_accept_threads(),
        }
    }
}

/// Tuning for the command-executing side of the server.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct WorkerConfig {
    /// Number of runtime worker threads. Defaults to the number of cores.
    #[serde(default = "default_worker_threads")]
    pub threads: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            threads: default_worker_threads(),
        }
    }
}

/// The complete server configuration.
///
/// Only `port`, `accept.threads` and `worker.threads` are recognized;
/// anything else in the file is rejected at load time.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub accept: AcceptConfig,
    #[serde(default)]
    pub worker: WorkerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            accept: AcceptConfig::default(),
            worker: WorkerConfig::default(),
        }
    }
}

fn default_port() -> u16 {
    6379
}

fn default_accept_threads() -> usize {
    1
}

fn default_worker_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

impl Config {
    /// Loads and parses the configuration from a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("could not read config file '{path}'"))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("could not parse config file '{path}'"))?;
        Ok(config)
    }
}
