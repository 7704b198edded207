//! Server configuration

/// Server configuration
///
/// # Environment variables
///
/// Every setting can be overridden through the environment:
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | WORK_DIR | /var/lib/lumiere/booking | Working directory for database and logs |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | REAPER_INTERVAL_SECS | 30 | Expiry reaper sweep interval |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | Graceful shutdown budget (milliseconds) |
///
/// The 5-minute lock TTL is intentionally NOT configuration; it is a fixed
/// contract of the booking workflow.
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory holding the embedded database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Seconds between expiry reaper sweeps
    pub reaper_interval_secs: u64,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Graceful shutdown budget in milliseconds
    pub shutdown_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables, with defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR")
                .unwrap_or_else(|_| "/var/lib/lumiere/booking".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            reaper_interval_secs: std::env::var("REAPER_INTERVAL_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            shutdown_timeout_ms: std::env::var("SHUTDOWN_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10000),
        }
    }

    /// Override the filesystem and port settings, typically for tests
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_apply() {
        let config = Config::with_overrides("/tmp/booking-test", 8080);
        assert_eq!(config.work_dir, "/tmp/booking-test");
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.reaper_interval_secs, 30);
    }
}
