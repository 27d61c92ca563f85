//! Server configuration.
//!
//! Read once from the environment at startup. Parsing goes through an
//! injectable lookup function so the defaults and error paths are testable
//! without touching the process environment.

use std::env::VarError;
use std::net::SocketAddr;
use std::time::Duration;

use rendezvous_signaling::domain::config::{
    DEFAULT_SESSION_TTL_SECS, DEFAULT_STUN_URL, IceServer, SignalingConfig,
};

use crate::error::AppError;

/// Core server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Listen address (host:port).
    pub listen_addr: SocketAddr,
    /// Requested signaling session TTL; the store applies its own bounds.
    pub session_ttl_secs: u64,
    /// ICE servers handed to every signaling client.
    pub ice_servers: Vec<IceServer>,
    /// Period of the background expiry sweep, if enabled.
    pub sweep_interval: Option<Duration>,
}

impl ApiConfig {
    /// Parse configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `HOST` | `0.0.0.0` |
    /// | `PORT` | `3000` |
    /// | `RENDEZVOUS_SESSION_TTL_SECS` | `300` |
    /// | `RENDEZVOUS_ICE_SERVERS` | `stun:stun.l.google.com:19302` |
    /// | `RENDEZVOUS_TURN_USERNAME` | *(unset)* |
    /// | `RENDEZVOUS_TURN_CREDENTIAL` | *(unset)* |
    /// | `RENDEZVOUS_SWEEP_INTERVAL_SECS` | *(unset: lazy sweep only)* |
    ///
    /// TURN credentials are attached to every `turn:`/`turns:` server and
    /// must be set together.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a numeric variable does not parse, the
    /// host and port do not form a socket address, or only one of the TURN
    /// credential variables is set.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_env_fn(|key| std::env::var(key))
    }

    fn from_env_fn<F>(env: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let host = env("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = parse_or(&env, "PORT", 3000)?;
        let listen_addr = format!("{host}:{port}")
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;

        let session_ttl_secs = parse_or(&env, "RENDEZVOUS_SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?;

        let mut ice_servers: Vec<IceServer> = env("RENDEZVOUS_ICE_SERVERS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(IceServer::from_url)
            .collect();
        if ice_servers.is_empty() {
            ice_servers.push(IceServer::from_url(DEFAULT_STUN_URL));
        }

        match (env("RENDEZVOUS_TURN_USERNAME"), env("RENDEZVOUS_TURN_CREDENTIAL")) {
            (Ok(username), Ok(credential)) => {
                ice_servers = ice_servers
                    .into_iter()
                    .map(|server| {
                        if server.is_turn() {
                            server.with_credentials(username.clone(), credential.clone())
                        } else {
                            server
                        }
                    })
                    .collect();
            }
            (Err(_), Err(_)) => {}
            _ => {
                return Err(AppError::Config(
                    "RENDEZVOUS_TURN_USERNAME and RENDEZVOUS_TURN_CREDENTIAL must be set together"
                        .into(),
                ));
            }
        }

        let sweep_secs: u64 = parse_or(&env, "RENDEZVOUS_SWEEP_INTERVAL_SECS", 0)?;
        let sweep_interval = (sweep_secs > 0).then(|| Duration::from_secs(sweep_secs));

        Ok(Self {
            listen_addr,
            session_ttl_secs,
            ice_servers,
            sweep_interval,
        })
    }

    /// Signaling store configuration derived from this config.
    #[must_use]
    pub fn signaling_config(&self) -> SignalingConfig {
        SignalingConfig::new(self.session_ttl_secs, self.ice_servers.clone())
    }
}

fn parse_or<F, T>(env: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Result<String, VarError>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key} must be a valid number: {e}"))),
        Err(_) => Ok(default),
    }
}
