use badam_api::ClientConfig;
use std::env;
use thiserror::Error;

pub const ENDPOINT_VAR: &str = "BADAM_ENDPOINT";
pub const USERNAME_VAR: &str = "BADAM_USERNAME";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} environment variable not found")]
    Missing(&'static str),
    #[error("{0} environment variable is empty")]
    Empty(&'static str),
}

/// Connection settings read from the environment (after `.env` is loaded).
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub endpoint: String,
    pub username: String,
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &'static str| {
            let value = lookup(name).ok_or(ConfigError::Missing(name))?;
            let value = value.trim().to_string();
            if value.is_empty() {
                return Err(ConfigError::Empty(name));
            }
            Ok(value)
        };

        Ok(Self {
            endpoint: read(ENDPOINT_VAR)?,
            username: read(USERNAME_VAR)?,
        })
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::builder()
            .base_url(self.endpoint.as_str())
            .username(self.username.as_str())
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn reads_both_variables() {
        let config = DashboardConfig::from_lookup(lookup(&[
            (ENDPOINT_VAR, "https://api.example.com/v1 "),
            (USERNAME_VAR, "demo"),
        ]))
        .unwrap();

        assert_eq!(config.endpoint, "https://api.example.com/v1");
        assert_eq!(config.client_config().username, "demo");
    }

    #[test]
    fn missing_variable_is_named() {
        let err = DashboardConfig::from_lookup(lookup(&[(ENDPOINT_VAR, "http://x")])).unwrap_err();

        assert_eq!(err, ConfigError::Missing(USERNAME_VAR));
        assert_eq!(err.to_string(), "BADAM_USERNAME environment variable not found");
    }

    #[test]
    fn blank_variable_is_rejected() {
        let err = DashboardConfig::from_lookup(lookup(&[(ENDPOINT_VAR, "  "), (USERNAME_VAR, "demo")])).unwrap_err();
        assert_eq!(err, ConfigError::Empty(ENDPOINT_VAR));
    }
}
