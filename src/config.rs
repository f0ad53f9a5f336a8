use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_MAX_TIMEOUT_MS: u64 = 60_000;

/// Long-poll limits applied by the HTTP layer before calling into the queues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub default_timeout: Duration,
    pub max_timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            default_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            max_timeout: Duration::from_millis(DEFAULT_MAX_TIMEOUT_MS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub poll: PollConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            poll: PollConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Reads `POLLQ_HOST`, `POLLQ_PORT`, `POLLQ_DEFAULT_TIMEOUT_MS` and
    /// `POLLQ_MAX_TIMEOUT_MS`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("POLLQ_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_var(&lookup, "POLLQ_PORT", DEFAULT_PORT);
        let default_timeout = parse_var(&lookup, "POLLQ_DEFAULT_TIMEOUT_MS", DEFAULT_TIMEOUT_MS);
        let max_timeout = parse_var(&lookup, "POLLQ_MAX_TIMEOUT_MS", DEFAULT_MAX_TIMEOUT_MS);

        if default_timeout > max_timeout {
            tracing::warn!(
                default_timeout_ms = default_timeout,
                max_timeout_ms = max_timeout,
                "default timeout exceeds the maximum and will be clamped"
            );
        }

        Self {
            host,
            port,
            poll: PollConfig {
                default_timeout: Duration::from_millis(default_timeout),
                max_timeout: Duration::from_millis(max_timeout),
            },
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "ignoring unparsable setting");
            default
        }),
        None => default,
    }
}
