// Configuration type definitions

use std::time::Duration;

use serde::Deserialize;

use crate::recommender::DEFAULT_ENDPOINT;

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

/// Recommendation API configuration section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Whole-request timeout; unset means wait indefinitely
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            endpoint: default_endpoint(),
            timeout_secs: None,
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_config_uses_default_endpoint() {
        let config = Config::default();
        assert_eq!(config.api.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.api.timeout(), None);
    }

    #[test]
    fn test_timeout_conversion() {
        let api = ApiConfig {
            endpoint: default_endpoint(),
            timeout_secs: Some(30),
        };
        assert_eq!(api.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let config: Config = toml::from_str(
            r#"
[api]
endpoint = "http://localhost:5000/recommend"
retries = 3

[theme]
accent = "blue"
"#,
        )
        .unwrap();
        assert_eq!(config.api.endpoint, "http://localhost:5000/recommend");
    }

    // Any endpoint string in the file is carried through unchanged
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_endpoint_parsing(
            host in "[a-z]{3,12}",
            port in 1u16..65535u16,
        ) {
            let endpoint = format!("http://{}:{}/recommend", host, port);
            let toml_content = format!("[api]\nendpoint = \"{}\"\n", endpoint);

            let config: Result<Config, _> = toml::from_str(&toml_content);
            prop_assert!(config.is_ok(), "Failed to parse endpoint: {}", endpoint);
            prop_assert_eq!(config.unwrap().api.endpoint, endpoint);
        }
    }

    // Missing sections and fields fall back to defaults
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_missing_fields_use_defaults(
            include_api_section in prop::bool::ANY,
            include_timeout in prop::bool::ANY,
        ) {
            let toml_content = match (include_api_section, include_timeout) {
                (false, _) => String::new(),
                (true, false) => "[api]\n".to_string(),
                (true, true) => "[api]\ntimeout_secs = 10\n".to_string(),
            };

            let config: Result<Config, _> = toml::from_str(&toml_content);
            prop_assert!(config.is_ok(), "Failed to parse config with missing fields");

            let config = config.unwrap();
            prop_assert_eq!(config.api.endpoint.as_str(), DEFAULT_ENDPOINT);
            if include_api_section && include_timeout {
                prop_assert_eq!(config.api.timeout_secs, Some(10));
            } else {
                prop_assert_eq!(config.api.timeout_secs, None);
            }
        }
    }
}
