use std::env;
use std::time::Duration;

/// Config holds all application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub templates_dir: String,
    /// UDP reachability probe bound
    pub probe_timeout: Duration,
    /// Bound on waiting for the transient TFTP server to become ready
    pub server_ready_timeout: Duration,
    /// Per-read timeout on both transports
    pub read_timeout: Duration,
    pub serial_baud_rate: u32,
    /// Pause between serial lines, milliseconds
    pub serial_line_delay_ms: u64,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn load() -> Self {
        Self {
            templates_dir: get_env("TEMPLATES_DIR", "templates"),
            probe_timeout: Duration::from_secs(
                get_env("PROBE_TIMEOUT_SECS", "2").parse().unwrap_or(2),
            ),
            server_ready_timeout: Duration::from_secs(
                get_env("SERVER_READY_TIMEOUT_SECS", "5").parse().unwrap_or(5),
            ),
            read_timeout: Duration::from_secs(
                get_env("READ_TIMEOUT_SECS", "1").parse().unwrap_or(1),
            ),
            serial_baud_rate: get_env("SERIAL_BAUD_RATE", "9600").parse().unwrap_or(9600),
            serial_line_delay_ms: get_env("SERIAL_LINE_DELAY_MS", "500").parse().unwrap_or(500),
        }
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
