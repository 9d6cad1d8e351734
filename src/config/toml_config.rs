use crate::adapters::dom::Document;
use crate::adapters::http::{FetchTransport, HttpClientTransport};
use crate::core::client::ApiClient;
use crate::domain::model::RequestOptions;
use crate::utils::error::{ApiError, Result};
use crate::utils::validation::{self, Validate};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

static ENV_VAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

const MAX_TIMEOUT_MS: u64 = 600_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub request: RequestOptions,
    pub transport: TransportConfig,
    pub credentials: CredentialsConfig,
    pub bind: BindConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    #[default]
    Fetch,
    HttpClient,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    pub backend: Backend,
    pub user_agent: Option<String>,
    /// 只有 http_client 後端會送出
    pub default_headers: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub headers: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BindConfig {
    pub root: Option<String>,
}

impl ClientConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ApiError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_TOKEN})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_range(
            "request.timeout_ms",
            self.request.timeout_ms,
            1,
            MAX_TIMEOUT_MS,
        )?;

        for name in self.request.headers.keys() {
            validation::validate_header_name("request.headers", name)?;
        }
        for name in self.transport.default_headers.keys() {
            validation::validate_header_name("transport.default_headers", name)?;
        }
        for name in self.credentials.headers.keys() {
            validation::validate_header_name("credentials.headers", name)?;
        }

        if let Some(user_agent) = &self.transport.user_agent {
            validation::validate_non_empty_string("transport.user_agent", user_agent)?;
        }

        self.root_selector()?;
        Ok(())
    }

    pub fn request_options(&self) -> RequestOptions {
        self.request.clone()
    }

    pub fn root_selector(&self) -> Result<Option<Selector>> {
        self.bind
            .root
            .as_deref()
            .map(Document::selector)
            .transpose()
    }

    fn http(&self) -> Result<Client> {
        let mut builder = Client::builder();
        if let Some(user_agent) = &self.transport.user_agent {
            builder = builder.user_agent(user_agent);
        }
        Ok(builder.build()?)
    }

    pub fn build_client(&self) -> Result<ApiClient> {
        let http = self.http()?;

        let client = match self.transport.backend {
            Backend::Fetch => {
                let mut transport = FetchTransport::with_client(http);
                for (name, value) in &self.credentials.headers {
                    transport = transport.credential_header(name, value);
                }
                ApiClient::new(transport)
            }
            Backend::HttpClient => {
                let mut transport = HttpClientTransport::with_client(http);
                for (name, value) in &self.transport.default_headers {
                    transport = transport.default_header(name, value);
                }
                for (name, value) in &self.credentials.headers {
                    transport = transport.credential_header(name, value);
                }
                ApiClient::new(transport)
            }
        };

        tracing::debug!("Using '{}' transport", client.transport_name());
        Ok(client)
    }
}

impl Validate for ClientConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Method;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r##"
[request]
method = "post"
timeout_ms = 5000
with_credentials = false
headers = { X-Trace = "abc" }

[transport]
backend = "http_client"
user_agent = "ezyapi-test"
default_headers = { Accept = "application/json" }

[credentials]
headers = { Authorization = "Bearer token" }

[bind]
root = "#app"
"##;

        let config = ClientConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.request.method, Method::Post);
        assert_eq!(config.request.timeout_ms, 5000);
        assert!(!config.request.with_credentials);
        assert_eq!(config.request.headers.get("X-Trace").unwrap(), "abc");
        assert_eq!(config.transport.backend, Backend::HttpClient);
        assert_eq!(config.bind.root.as_deref(), Some("#app"));
        assert!(config.validate().is_ok());

        let client = config.build_client().unwrap();
        assert_eq!(client.transport_name(), "http_client");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ClientConfig::from_toml_str("").unwrap();

        assert_eq!(config.request, RequestOptions::default());
        assert_eq!(config.transport.backend, Backend::Fetch);
        assert!(config.root_selector().unwrap().is_none());
        assert_eq!(config.build_client().unwrap().transport_name(), "fetch");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("EZYAPI_TEST_TOKEN", "Bearer from-env");

        let toml_content = r#"
[credentials]
headers = { Authorization = "${EZYAPI_TEST_TOKEN}", X-Missing = "${EZYAPI_TEST_UNSET}" }
"#;

        let config = ClientConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.credentials.headers.get("Authorization").unwrap(),
            "Bearer from-env"
        );
        assert_eq!(
            config.credentials.headers.get("X-Missing").unwrap(),
            "${EZYAPI_TEST_UNSET}"
        );

        std::env::remove_var("EZYAPI_TEST_TOKEN");
    }

    #[test]
    fn test_config_validation() {
        let zero_timeout = ClientConfig::from_toml_str("[request]\ntimeout_ms = 0\n").unwrap();
        assert!(zero_timeout.validate().is_err());

        let bad_root = ClientConfig::from_toml_str("[bind]\nroot = \"##\"\n").unwrap();
        assert!(matches!(
            bad_root.validate(),
            Err(ApiError::SelectorError { .. })
        ));

        let bad_header =
            ClientConfig::from_toml_str("[request]\nheaders = { \"Bad Header\" = \"x\" }\n")
                .unwrap();
        assert!(bad_header.validate().is_err());
    }

    #[test]
    fn test_invalid_method_is_parse_error() {
        let result = ClientConfig::from_toml_str("[request]\nmethod = \"TRACE\"\n");
        assert!(matches!(result, Err(ApiError::ConfigError { .. })));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[request]\nmethod = \"PUT\"\n")
            .unwrap();

        let config = ClientConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.request.method, Method::Put);
    }
}
