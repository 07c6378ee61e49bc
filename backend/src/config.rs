//! Server settings read from the environment.
//!
//! | Variable            | Default                  |
//! |---------------------|--------------------------|
//! | `SPLIT_BIND_ADDR`   | `127.0.0.1:3000`         |
//! | `PORT`              | used when no bind address is set |
//! | `SPLIT_BASE_URL`    | `http://localhost:{port}` |
//! | `SPLIT_CORS_ORIGIN` | `http://localhost:8080`  |
//! | `SPLIT_LINK_STYLE`  | `query` (or `compressed`) |

use std::net::{AddrParseError, IpAddr, Ipv4Addr, SocketAddr};
use std::num::ParseIntError;

use axum::http::HeaderValue;

use crate::domain::LinkStyle;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:8080";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("SPLIT_BIND_ADDR '{value}' is not a socket address: {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: AddrParseError,
    },
    #[error("PORT '{value}' is not a port number: {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("SPLIT_CORS_ORIGIN '{0}' is not a valid header value")]
    InvalidCorsOrigin(String),
    #[error("SPLIT_LINK_STYLE: {0}")]
    InvalidLinkStyle(String),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Public address share links point at, without a trailing slash
    pub base_url: String,
    pub cors_origin: HeaderValue,
    pub link_style: LinkStyle,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_PORT),
            base_url: format!("http://localhost:{}", DEFAULT_PORT),
            cors_origin: HeaderValue::from_static(DEFAULT_CORS_ORIGIN),
            link_style: LinkStyle::Query,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any variable source; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let bind_addr = match (var("SPLIT_BIND_ADDR"), var("PORT")) {
            (Some(value), _) => value
                .trim()
                .parse::<SocketAddr>()
                .map_err(|source| ConfigError::InvalidBindAddr { value, source })?,
            (None, Some(value)) => {
                let port = value
                    .trim()
                    .parse::<u16>()
                    .map_err(|source| ConfigError::InvalidPort { value, source })?;
                SocketAddr::new(defaults.bind_addr.ip(), port)
            }
            (None, None) => defaults.bind_addr,
        };

        let base_url = var("SPLIT_BASE_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("http://localhost:{}", bind_addr.port()));

        let cors_origin = match var("SPLIT_CORS_ORIGIN") {
            Some(origin) => HeaderValue::from_str(origin.trim())
                .map_err(|_| ConfigError::InvalidCorsOrigin(origin))?,
            None => defaults.cors_origin,
        };

        let link_style = match var("SPLIT_LINK_STYLE") {
            Some(style) => style.parse::<LinkStyle>().map_err(ConfigError::InvalidLinkStyle)?,
            None => defaults.link_style,
        };

        Ok(Self {
            bind_addr,
            base_url,
            cors_origin,
            link_style,
        })
    }
}
