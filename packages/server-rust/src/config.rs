//! Runtime configuration for the alignment service.

use std::time::Duration;

/// Top-level configuration for the server.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Bind address for the server.
    pub host: String,
    /// Port to listen on. 0 means OS-assigned.
    pub port: u16,
    /// Artificial processing delay applied by the slow path, in whole
    /// seconds. Also advertised as the `Retry-Later` hint on deferred
    /// submissions.
    pub delay_seconds: u64,
    /// Version string reported by the readiness endpoint.
    pub version: String,
    /// Allowed CORS origins.
    pub cors_origins: Vec<String>,
    /// Maximum time to wait for a request to complete. Must exceed
    /// `delay_seconds`, or the slow path times out before it can answer.
    pub request_timeout: Duration,
    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl ServiceConfig {
    /// The artificial delay as a [`Duration`].
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_seconds)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 0,
            delay_seconds: 5,
            version: "???".to_string(),
            cors_origins: vec!["*".to_string()],
            request_timeout: Duration::from_secs(30),
            max_body_bytes: 1_048_576, // 1 MB
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_config_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 0);
        assert_eq!(config.delay_seconds, 5);
        assert_eq!(config.version, "???");
        assert_eq!(config.cors_origins, vec!["*"]);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.max_body_bytes, 1_048_576);
    }

    #[test]
    fn delay_converts_to_duration() {
        let config = ServiceConfig {
            delay_seconds: 2,
            ..ServiceConfig::default()
        };
        assert_eq!(config.delay(), Duration::from_secs(2));
    }
}
