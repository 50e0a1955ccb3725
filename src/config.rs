// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `VOLUMES_DIR` | Directory scanned for volume containers | `./volumes` |
//! | `MOUNT_ROOT` | Parent directory for temporary mount points | system temp dir |
//! | `VERACRYPT_BIN` | VeraCrypt executable | `veracrypt` |
//! | `MOUNT_TIMEOUT_SECS` | Upper bound for a mount call | `10` |
//! | `COMMAND_TIMEOUT_SECS` | Upper bound for dismount/list calls | `30` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `TLS_CERT_PATH` | PEM certificate chain (enables HTTPS with `TLS_KEY_PATH`) | unset |
//! | `TLS_KEY_PATH` | PEM private key | unset |
//! | `UNMOUNT_ON_SHUTDOWN` | Dismount mounted volumes when the server stops | `true` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{net::SocketAddr, path::PathBuf, time::Duration};

use tracing::warn;

use crate::volumes::engine::{DEFAULT_COMMAND_TIMEOUT, DEFAULT_MOUNT_TIMEOUT};

pub const VOLUMES_DIR_ENV: &str = "VOLUMES_DIR";
pub const MOUNT_ROOT_ENV: &str = "MOUNT_ROOT";
pub const VERACRYPT_BIN_ENV: &str = "VERACRYPT_BIN";
pub const MOUNT_TIMEOUT_ENV: &str = "MOUNT_TIMEOUT_SECS";
pub const COMMAND_TIMEOUT_ENV: &str = "COMMAND_TIMEOUT_SECS";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const UNMOUNT_ON_SHUTDOWN_ENV: &str = "UNMOUNT_ON_SHUTDOWN";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_VOLUMES_DIR: &str = "volumes";
pub const DEFAULT_VERACRYPT_BIN: &str = "veracrypt";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Output format for the tracing subscriber.
///
/// Read on its own, before [`Config`], so that configuration warnings are
/// already emitted through the chosen format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }

    pub fn from_env() -> Self {
        Self::parse(std::env::var(LOG_FORMAT_ENV).ok().as_deref())
    }
}

/// PEM files for HTTPS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsFiles {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

/// Settings resolved from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub volumes_dir: PathBuf,
    pub mount_root: PathBuf,
    pub veracrypt_bin: PathBuf,
    pub mount_timeout: Duration,
    pub command_timeout: Duration,
    pub host: String,
    pub port: u16,
    pub tls: Option<TlsFiles>,
    pub unmount_on_shutdown: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Invalid values fall
    /// back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let tls = match (lookup(TLS_CERT_PATH_ENV), lookup(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsFiles {
                cert_path: cert.into(),
                key_path: key.into(),
            }),
            (None, None) => None,
            _ => {
                warn!(
                    "{TLS_CERT_PATH_ENV} and {TLS_KEY_PATH_ENV} must be set together, serving plain HTTP"
                );
                None
            }
        };

        Self {
            volumes_dir: lookup(VOLUMES_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_VOLUMES_DIR)),
            mount_root: lookup(MOUNT_ROOT_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
            veracrypt_bin: lookup(VERACRYPT_BIN_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_VERACRYPT_BIN)),
            mount_timeout: seconds(&lookup, MOUNT_TIMEOUT_ENV, DEFAULT_MOUNT_TIMEOUT),
            command_timeout: seconds(&lookup, COMMAND_TIMEOUT_ENV, DEFAULT_COMMAND_TIMEOUT),
            host: lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parsed(&lookup, PORT_ENV).unwrap_or(DEFAULT_PORT),
            tls,
            unmount_on_shutdown: parsed(&lookup, UNMOUNT_ON_SHUTDOWN_ENV).unwrap_or(true),
        }
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

fn parsed<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "invalid value, using default");
            None
        }
    }
}

fn seconds(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: Duration) -> Duration {
    parsed::<u64>(lookup, key)
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(default)
}
