use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;

const DEFAULT_DIRECTIONS_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/directions/json";
const DEFAULT_BACKEND_URL: &str = "http://localhost:8081/api";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    FailBatch,
    /// Failed drivers are written back without a quote.
    Isolate,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "fail-batch" | "fail_batch" => Ok(Self::FailBatch),
            "isolate" => Ok(Self::Isolate),
            other => Err(format!("unknown failure policy {other:?}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format {other:?}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
    pub event_buffer_size: usize,
    pub directions_endpoint: String,
    pub directions_api_key: String,
    pub directions_timeout: Duration,
    pub backend_url: String,
    pub failure_policy: FailurePolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let string_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let event_buffer_size = parse_or_default(&lookup, "EVENT_BUFFER_SIZE", 256)?;
        if event_buffer_size == 0 {
            return Err(AppError::Internal(
                "invalid EVENT_BUFFER_SIZE: must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            http_port: parse_or_default(&lookup, "HTTP_PORT", 3000)?,
            log_level: string_or("LOG_LEVEL", "info"),
            log_format: parse_or_default(&lookup, "LOG_FORMAT", LogFormat::Compact)?,
            event_buffer_size,
            directions_endpoint: string_or("DIRECTIONS_ENDPOINT", DEFAULT_DIRECTIONS_ENDPOINT),
            directions_api_key: string_or("DIRECTIONS_API_KEY", ""),
            directions_timeout: Duration::from_millis(parse_or_default(
                &lookup,
                "DIRECTIONS_TIMEOUT_MS",
                5_000,
            )?),
            backend_url: string_or("BACKEND_URL", DEFAULT_BACKEND_URL),
            failure_policy: parse_or_default(&lookup, "FARE_FAILURE_POLICY", FailurePolicy::FailBatch)?,
        })
    }
}

fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::{Config, FailurePolicy, LogFormat};

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, crate::error::AppError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.http_port, 3000);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Compact);
        assert_eq!(config.failure_policy, FailurePolicy::FailBatch);
        assert_eq!(config.directions_timeout, Duration::from_secs(5));
        assert!(config.directions_api_key.is_empty());
    }

    #[test]
    fn overrides_are_parsed() {
        let config = config_from(&[
            ("HTTP_PORT", "8080"),
            ("LOG_FORMAT", "json"),
            ("FARE_FAILURE_POLICY", "isolate"),
            ("DIRECTIONS_TIMEOUT_MS", "250"),
            ("DIRECTIONS_API_KEY", "abc"),
        ])
        .unwrap();

        assert_eq!(config.http_port, 8080);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.failure_policy, FailurePolicy::Isolate);
        assert_eq!(config.directions_timeout, Duration::from_millis(250));
        assert_eq!(config.directions_api_key, "abc");
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(config_from(&[("HTTP_PORT", "not-a-port")]).is_err());
        assert!(config_from(&[("FARE_FAILURE_POLICY", "retry")]).is_err());
    }

    #[test]
    fn zero_event_buffer_is_rejected() {
        assert!(config_from(&[("EVENT_BUFFER_SIZE", "0")]).is_err());
        assert_eq!(
            config_from(&[("EVENT_BUFFER_SIZE", "1")])
                .unwrap()
                .event_buffer_size,
            1
        );
    }
}
