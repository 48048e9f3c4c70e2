//! Application configuration loaded from environment variables.

use access::RateLimitPolicy;
use services::JanitorConfig;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `JANITOR_GRACE_MINUTES` — expiry grace window (default: `15`)
/// - `JANITOR_SWEEP_SECS` — time between expiry sweeps (default: `60`)
/// - `LOGIN_MAX_ATTEMPTS` — attempts per window before 429 (default: `10`)
/// - `LOGIN_WINDOW_MINUTES` — rate-limit window length (default: `60`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub janitor_grace_minutes: i64,
    pub janitor_sweep_secs: u64,
    pub login_max_attempts: u32,
    pub login_window_minutes: i64,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_parse("PORT", 3000),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            janitor_grace_minutes: env_parse("JANITOR_GRACE_MINUTES", 15),
            janitor_sweep_secs: env_parse("JANITOR_SWEEP_SECS", 60),
            login_max_attempts: env_parse("LOGIN_MAX_ATTEMPTS", 10),
            login_window_minutes: env_parse("LOGIN_WINDOW_MINUTES", 60),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn janitor_config(&self) -> JanitorConfig {
        JanitorConfig {
            grace: chrono::Duration::minutes(self.janitor_grace_minutes),
            sweep_interval: std::time::Duration::from_secs(self.janitor_sweep_secs),
        }
    }

    pub fn rate_limit_policy(&self) -> RateLimitPolicy {
        RateLimitPolicy {
            max_attempts: self.login_max_attempts,
            window: chrono::Duration::minutes(self.login_window_minutes),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            janitor_grace_minutes: 15,
            janitor_sweep_secs: 60,
            login_max_attempts: 10,
            login_window_minutes: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.janitor_grace_minutes, 15);
        assert_eq!(config.login_max_attempts, 10);
    }

    #[test]
    fn test_addr_formatting() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Config::default()
        };
        assert_eq!(config.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_derived_configs() {
        let config = Config::default();
        assert_eq!(config.janitor_config().grace, chrono::Duration::minutes(15));
        assert_eq!(
            config.rate_limit_policy().window,
            chrono::Duration::minutes(60)
        );
    }
}
