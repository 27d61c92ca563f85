//! Signaling store configuration.

use chrono::Duration;
use serde::Serialize;

/// Shortest session lifetime the store accepts.
pub const MIN_SESSION_TTL_SECS: u64 = 60;

/// Longest session lifetime the store accepts.
pub const MAX_SESSION_TTL_SECS: u64 = 86_400;

/// Session lifetime used when none is configured.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 300;

/// STUN server handed out when no ICE servers are configured.
pub const DEFAULT_STUN_URL: &str = "stun:stun.l.google.com:19302";

/// An ICE server descriptor as understood by `RTCPeerConnection`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IceServer {
    /// STUN/TURN URLs for this server.
    pub urls: Vec<String>,
    /// TURN username, if the server requires one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// TURN credential, if the server requires one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

impl IceServer {
    /// A server reachable at a single URL without credentials.
    #[must_use]
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            urls: vec![url.into()],
            username: None,
            credential: None,
        }
    }

    /// Attaches TURN credentials to this server.
    #[must_use]
    pub fn with_credentials(mut self, username: impl Into<String>, credential: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.credential = Some(credential.into());
        self
    }

    /// Whether any of this server's URLs is a TURN relay.
    #[must_use]
    pub fn is_turn(&self) -> bool {
        self.urls
            .iter()
            .any(|url| url.starts_with("turn:") || url.starts_with("turns:"))
    }
}

/// Configuration for [`SignalingSessionStore`](super::store::SignalingSessionStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalingConfig {
    ttl_seconds: u64,
    ice_servers: Vec<IceServer>,
}

impl SignalingConfig {
    /// Create a configuration. `ttl_seconds` is clamped into
    /// `MIN_SESSION_TTL_SECS..=MAX_SESSION_TTL_SECS`.
    #[must_use]
    pub fn new(ttl_seconds: u64, ice_servers: Vec<IceServer>) -> Self {
        Self {
            ttl_seconds: ttl_seconds.clamp(MIN_SESSION_TTL_SECS, MAX_SESSION_TTL_SECS),
            ice_servers,
        }
    }

    /// Effective session lifetime in seconds.
    #[must_use]
    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// Effective session lifetime.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        // Bounded by MAX_SESSION_TTL_SECS, so the conversion cannot truncate.
        Duration::seconds(i64::try_from(self.ttl_seconds).unwrap_or(i64::MAX / 1_000))
    }

    /// ICE servers returned to every client.
    #[must_use]
    pub fn ice_servers(&self) -> &[IceServer] {
        &self.ice_servers
    }
}

impl Default for SignalingConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_SESSION_TTL_SECS,
            vec![IceServer::from_url(DEFAULT_STUN_URL)],
        )
    }
}
