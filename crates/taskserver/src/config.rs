use std::env;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

/// Server settings, read from `TASKFLOW_*` environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_address: String,
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank values take the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let allowed_origins = read("TASKFLOW_ALLOWED_ORIGINS", DEFAULT_ALLOWED_ORIGINS)
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Self {
            bind_address: read("TASKFLOW_BIND_ADDRESS", DEFAULT_BIND_ADDRESS),
            allowed_origins,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_unset() {
        let config = ServerConfig::default();

        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:3000", "http://127.0.0.1:3000"]
        );
    }

    #[test]
    fn reads_overrides() {
        let vars: HashMap<&str, &str> = [
            ("TASKFLOW_BIND_ADDRESS", "127.0.0.1:9000"),
            ("TASKFLOW_ALLOWED_ORIGINS", " https://a.example , ,https://b.example"),
        ]
        .into_iter()
        .collect();

        let config = ServerConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.bind_address, "127.0.0.1:9000");
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }
}
