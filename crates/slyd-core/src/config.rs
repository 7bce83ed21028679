use crate::{Result, SlydError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

pub const ENV_CONFIG_PATH: &str = "SLYD_CONFIG";
pub const ENV_API_BASE: &str = "SLYD_API_BASE";
pub const ENV_SERVICE_PORT: &str = "SLYD_SERVICE_PORT";
pub const ENV_API_TOKEN: &str = "SLYD_API_TOKEN";

/// Settings for talking to the management API and the service it supervises.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Base URL every management endpoint hangs off.
    pub api_base: String,
    /// Port the inference service listens on, used for the liveness probe.
    pub service_port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    pub request_timeout_secs: u64,
    pub benchmark_timeout_secs: u64,
    pub restart_settle_ms: u64,
    pub raw_save_settle_ms: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:5005".to_string(),
            service_port: 5002,
            api_token: None,
            request_timeout_secs: 30,
            benchmark_timeout_secs: 1800,
            restart_settle_ms: 3000,
            raw_save_settle_ms: 1500,
        }
    }
}

impl ConsoleConfig {
    /// Load a JSON config file; keys it leaves out keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Overlay `SLYD_*` environment variables.
    pub fn apply_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(base) = lookup(ENV_API_BASE).filter(|b| !b.is_empty()) {
            self.api_base = base;
        }
        if let Some(port) = lookup(ENV_SERVICE_PORT).filter(|p| !p.is_empty()) {
            self.service_port = port.trim().parse().map_err(|_| {
                SlydError::Config(format!("{ENV_SERVICE_PORT} must be a port number, got {port:?}"))
            })?;
        }
        if let Some(token) = lookup(ENV_API_TOKEN).filter(|t| !t.is_empty()) {
            self.api_token = Some(token);
        }
        Ok(self)
    }

    /// Host of the management API; the inference service runs on the same machine.
    pub fn service_host(&self) -> String {
        Url::parse(&self.api_base)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| "localhost".to_string())
    }

    /// Direct liveness URL of the inference service, bypassing the management API.
    pub fn probe_url(&self, port: u16) -> String {
        format!("http://{}:{}/v1/models", self.service_host(), port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn benchmark_timeout(&self) -> Duration {
        Duration::from_secs(self.benchmark_timeout_secs)
    }

    pub fn restart_settle(&self) -> Duration {
        Duration::from_millis(self.restart_settle_ms)
    }

    pub fn raw_save_settle(&self) -> Duration {
        Duration::from_millis(self.raw_save_settle_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_restart_and_save_delays() {
        let config = ConsoleConfig::default();
        assert_eq!(config.restart_settle(), Duration::from_millis(3000));
        assert_eq!(config.raw_save_settle(), Duration::from_millis(1500));
        assert_eq!(config.service_port, 5002);
    }

    #[test]
    fn test_env_overrides() {
        let config = ConsoleConfig::default()
            .apply_vars(vars(&[
                (ENV_API_BASE, "http://gpu-box:8080/"),
                (ENV_SERVICE_PORT, "8000"),
                (ENV_API_TOKEN, "secret"),
            ]))
            .unwrap();
        assert_eq!(config.api_base, "http://gpu-box:8080/");
        assert_eq!(config.service_port, 8000);
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert_eq!(config.probe_url(8000), "http://gpu-box:8000/v1/models");
    }

    #[test]
    fn test_bad_port_is_config_error() {
        let err = ConsoleConfig::default()
            .apply_vars(vars(&[(ENV_SERVICE_PORT, "eighty")]))
            .unwrap_err();
        assert!(matches!(err, SlydError::Config(_)));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: ConsoleConfig = serde_json::from_str(r#"{"service_port": 9000}"#).unwrap();
        assert_eq!(config.service_port, 9000);
        assert_eq!(config.api_base, "http://localhost:5005");
    }

    #[test]
    fn test_unparseable_base_probes_localhost() {
        let config = ConsoleConfig {
            api_base: "not a url".to_string(),
            ..Default::default()
        };
        assert_eq!(config.probe_url(5002), "http://localhost:5002/v1/models");
    }
}
