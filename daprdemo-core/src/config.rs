//! # Sidecar Configuration
//!
//! Where the sidecar lives and how long the client waits on it.
use std::time::Duration;

/// Host the sidecar listens on. Dapr always runs next to the app.
pub const DEFAULT_HOST: &str = "localhost";

/// Bound on establishing the channel to the sidecar.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// How long [`crate::SidecarClient::shutdown`] waits for outstanding calls.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(60);

/// Connection settings for a Dapr sidecar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidecarConfig {
    pub host: String,
    pub port: u16,
    pub connect_timeout: Duration,
    /// Grace period given to outstanding calls on shutdown before they are aborted.
    pub grace_period: Duration,
}

impl SidecarConfig {
    pub fn new(port: u16) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            grace_period: DEFAULT_GRACE_PERIOD,
        }
    }

    /// Plaintext URL of the sidecar gRPC endpoint (e.g. `http://localhost:50001`).
    pub fn endpoint_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}
