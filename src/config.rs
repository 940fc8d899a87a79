// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tienda Project

//! # Runtime Configuration
//!
//! Configuration is read from the environment exactly once at startup into an
//! immutable [`AppConfig`], which is then injected into the roster, the
//! gateway and the services. Nothing reads the environment after startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `RPC_URL` | JSON-RPC endpoint of the chain | Required |
//! | `PRIVATE_KEY` | Single admin signing key (hex) | Required unless list mode |
//! | `PUBLIC_KEYS` / `PRIVATE_KEYS` | Comma-separated, index-aligned roster; the public list may be longer (watch-only tail) | — |
//! | `STORE_CONTRACT` | Store wallet contract address | Required |
//! | `REGISTRY_CONTRACT` | Personnel registry contract address | Required |
//! | `PAYOUT_CONTRACT` | Payout splitter contract address | Required |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `4000` |
//! | `RPC_TIMEOUT_SECS` | Bound on each RPC call | `30` |
//! | `CONFIRM_TIMEOUT_SECS` | Bound on waiting for a transaction to mine | `120` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::{env, net::SocketAddr, time::Duration};

use url::Url;

use crate::chain::GatewayTimeouts;

/// Missing or malformed environment configuration. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing {0} in the environment")]
    Missing(&'static str),

    #[error("malformed {0}: {1}")]
    Malformed(&'static str, String),
}

/// Key material: one admin key, or an index-aligned roster.
#[derive(Debug, Clone)]
pub enum KeyConfig {
    /// Single operational key (`PRIVATE_KEY`).
    Single { private_key: String },
    /// `PUBLIC_KEYS` / `PRIVATE_KEYS`. Public entries past the end of the
    /// private list are watch-only payees.
    List {
        public: Vec<String>,
        private: Vec<String>,
    },
}

/// Immutable process configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub rpc_url: Url,
    pub keys: KeyConfig,
    pub store_contract: String,
    pub registry_contract: String,
    pub payout_contract: String,
    pub host: String,
    pub port: u16,
    pub timeouts: GatewayTimeouts,
}

impl AppConfig {
    /// Load from the environment. Any missing required value is fatal.
    pub fn from_env() -> Result<Self, ConfigError> {
        let rpc_url = require("RPC_URL")?
            .parse::<Url>()
            .map_err(|e| ConfigError::Malformed("RPC_URL", e.to_string()))?;

        // List mode takes precedence when both are present
        let keys = match env::var("PRIVATE_KEYS") {
            Ok(private) if !private.trim().is_empty() => {
                let public = split_csv(&require("PUBLIC_KEYS")?);
                let private = split_csv(&private);
                if private.is_empty() {
                    return Err(ConfigError::Malformed("PRIVATE_KEYS", "empty list".into()));
                }
                if public.len() < private.len() {
                    return Err(ConfigError::Malformed(
                        "PUBLIC_KEYS",
                        format!(
                            "{} addresses for {} private keys",
                            public.len(),
                            private.len()
                        ),
                    ));
                }
                KeyConfig::List { public, private }
            }
            _ => KeyConfig::Single {
                private_key: require("PRIVATE_KEY")?,
            },
        };

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|e| ConfigError::Malformed("PORT", e.to_string()))?,
            Err(_) => 4000,
        };

        Ok(Self {
            rpc_url,
            keys,
            store_contract: require("STORE_CONTRACT")?,
            registry_contract: require("REGISTRY_CONTRACT")?,
            payout_contract: require("PAYOUT_CONTRACT")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            timeouts: GatewayTimeouts {
                rpc: seconds_from_env("RPC_TIMEOUT_SECS", 30)?,
                confirm: seconds_from_env("CONFIRM_TIMEOUT_SECS", 120)?,
            },
        })
    }

    /// The socket address to bind the HTTP server to.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| {
                ConfigError::Malformed("HOST", e.to_string())
            })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}

fn seconds_from_env(name: &'static str, default: u64) -> Result<Duration, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::Malformed(name, e.to_string())),
        Err(_) => Ok(Duration::from_secs(default)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_drops_empties() {
        assert_eq!(
            split_csv(" 0xaa, 0xbb ,,0xcc "),
            vec!["0xaa", "0xbb", "0xcc"]
        );
        assert!(split_csv("").is_empty());
    }

    #[test]
    fn bind_addr_joins_host_and_port() {
        let config = AppConfig {
            rpc_url: "http://127.0.0.1:8545".parse().unwrap(),
            keys: KeyConfig::Single {
                private_key: "00".into(),
            },
            store_contract: String::new(),
            registry_contract: String::new(),
            payout_contract: String::new(),
            host: "127.0.0.1".into(),
            port: 4000,
            timeouts: GatewayTimeouts::default(),
        };
        assert_eq!(config.bind_addr().unwrap().port(), 4000);
    }
}
