// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup (a `.env` file in
//! the working directory is read first, if present).
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET` | Shared HS256 signing secret | Required |
//! | `JWT_EXPIRY_HOURS` | Lifetime of tokens signed by this service | `1` |
//! | `AUTH_AUDIENCE` | Expected `aud` claim on bearer tokens | Required |
//! | `AUTH_VERIFY_SIGNATURES` | Verify token signatures in the auth gate | `false` |
//! | `DATA_DIR` | Directory holding the profile database | `./data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{env, net::SocketAddr, path::PathBuf};

pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const JWT_EXPIRY_HOURS_ENV: &str = "JWT_EXPIRY_HOURS";
pub const AUTH_AUDIENCE_ENV: &str = "AUTH_AUDIENCE";
pub const AUTH_VERIFY_SIGNATURES_ENV: &str = "AUTH_VERIFY_SIGNATURES";

/// Environment variable name for the data directory path.
pub const DATA_DIR_ENV: &str = "DATA_DIR";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 1;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// File name of the profile database inside `DATA_DIR`.
pub const PROFILE_DB_FILE: &str = "profiles.redb";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Token and gate settings.
#[derive(Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub audience: String,
    pub verify_signatures: bool,
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expiry_hours", &self.jwt_expiry_hours)
            .field("audience", &self.audience)
            .field("verify_signatures", &self.verify_signatures)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub auth: AuthSettings,
    pub data_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let auth = AuthSettings {
            jwt_secret: required(JWT_SECRET_ENV)?,
            jwt_expiry_hours: parse_or(&lookup, JWT_EXPIRY_HOURS_ENV, DEFAULT_JWT_EXPIRY_HOURS)?,
            audience: required(AUTH_AUDIENCE_ENV)?,
            verify_signatures: parse_bool(&lookup, AUTH_VERIFY_SIGNATURES_ENV)?,
        };

        let log_format = match lookup(LOG_FORMAT_ENV).as_deref().map(str::trim) {
            None | Some("") | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: LOG_FORMAT_ENV,
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            auth,
            data_dir: lookup(DATA_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            host: lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(&lookup, PORT_ENV, DEFAULT_PORT)?,
            log_format,
        })
    }

    pub fn profile_db_path(&self) -> PathBuf {
        self.data_dir.join(PROFILE_DB_FILE)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::Invalid {
                name: HOST_ENV,
                value: self.host.clone(),
            })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { name, value: raw }),
    }
}

fn parse_bool<F>(lookup: &F, name: &'static str) -> Result<bool, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
{
    match lookup(name).as_deref().map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(false),
        Some(v) => match v.as_str() {
            "" | "0" | "false" | "no" => Ok(false),
            "1" | "true" | "yes" => Ok(true),
            _ => Err(ConfigError::Invalid { name, value: v }),
        },
    }
}
