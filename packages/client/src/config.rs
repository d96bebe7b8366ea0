//! Configuration constants and environment-driven settings for the client.

use std::path::PathBuf;
use std::time::Duration;

/// Base URL the Todo Manager listens on when started with its defaults.
pub const DEFAULT_BASE_URL: &str = "http://localhost:4567";

/// HTTP timeout in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 10;

/// Readiness probe attempts after a (re)start.
pub const DEFAULT_READY_ATTEMPTS: u32 = 40;

/// Delay between readiness probe attempts (milliseconds).
pub const DEFAULT_READY_INTERVAL_MS: u64 = 500;

/// Endpoint used as readiness probe.
pub const READINESS_ENDPOINT: &str = "/todos";

/// Endpoint that makes the service exit.
pub const SHUTDOWN_ENDPOINT: &str = "/shutdown";

/// Runtime settings for talking to a Todo Manager instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub server_jar: Option<PathBuf>,
    pub ready_attempts: u32,
    pub ready_interval: Duration,
    /// Delete resources created during a scenario once it finishes.
    pub cleanup_created: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            server_jar: None,
            ready_attempts: DEFAULT_READY_ATTEMPTS,
            ready_interval: Duration::from_millis(DEFAULT_READY_INTERVAL_MS),
            cleanup_created: true,
        }
    }
}

impl ClientConfig {
    /// Read settings from `TODO_MANAGER_*` environment variables.
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let base_url = get("TODO_MANAGER_URL")
            .map(|v| normalize_base_url(&v))
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.base_url);

        let server_jar = get("TODO_MANAGER_JAR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let ready_attempts = get("TODO_MANAGER_READY_ATTEMPTS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.ready_attempts);

        let ready_interval = get("TODO_MANAGER_READY_INTERVAL_MS")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.ready_interval);

        let cleanup_created = get("TODO_MANAGER_CLEANUP")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(defaults.cleanup_created);

        Self {
            base_url,
            server_jar,
            ready_attempts,
            ready_interval,
            cleanup_created,
        }
    }

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            ..Self::default()
        }
    }

    pub fn with_server_jar(mut self, jar: impl Into<PathBuf>) -> Self {
        self.server_jar = Some(jar.into());
        self
    }

    pub fn with_readiness(mut self, attempts: u32, interval: Duration) -> Self {
        self.ready_attempts = attempts;
        self.ready_interval = interval;
        self
    }

    pub fn with_cleanup(mut self, cleanup_created: bool) -> Self {
        self.cleanup_created = cleanup_created;
        self
    }
}

/// Strip whitespace and trailing slashes so endpoints can be appended verbatim.
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = ClientConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.base_url, "http://localhost:4567");
        assert!(config.server_jar.is_none());
    }

    #[test]
    fn test_reads_all_variables() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("TODO_MANAGER_URL", "http://127.0.0.1:9000/"),
            ("TODO_MANAGER_JAR", "runTodoManagerRestAPI-1.5.5.jar"),
            ("TODO_MANAGER_READY_ATTEMPTS", "3"),
            ("TODO_MANAGER_READY_INTERVAL_MS", "25"),
            ("TODO_MANAGER_CLEANUP", "false"),
        ]));
        assert_eq!(config.base_url, "http://127.0.0.1:9000");
        assert_eq!(
            config.server_jar,
            Some(PathBuf::from("runTodoManagerRestAPI-1.5.5.jar"))
        );
        assert_eq!(config.ready_attempts, 3);
        assert_eq!(config.ready_interval, Duration::from_millis(25));
        assert!(!config.cleanup_created);
    }

    #[test]
    fn test_unparsable_numbers_fall_back() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("TODO_MANAGER_READY_ATTEMPTS", "many"),
            ("TODO_MANAGER_READY_INTERVAL_MS", "-1"),
        ]));
        assert_eq!(config.ready_attempts, DEFAULT_READY_ATTEMPTS);
        assert_eq!(
            config.ready_interval,
            Duration::from_millis(DEFAULT_READY_INTERVAL_MS)
        );
    }

    #[test]
    fn test_blank_jar_is_ignored() {
        let config = ClientConfig::from_lookup(lookup(&[("TODO_MANAGER_JAR", "  ")]));
        assert!(config.server_jar.is_none());
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url(" http://x:1// "), "http://x:1");
        assert_eq!(normalize_base_url("http://x:1"), "http://x:1");
    }
}
