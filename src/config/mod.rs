pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

#[cfg(feature = "cli")]
mod cli {
    use super::toml_config::{Backend, ClientConfig};
    use crate::domain::model::Method;
    use crate::utils::error::{ApiError, Result};
    use crate::utils::validation::{self, Validate};
    use clap::Parser;
    use std::path::PathBuf;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "ezyapi")]
    #[command(about = "Call an API and bind its data into {placeholders} of an HTML page")]
    pub struct CliConfig {
        #[arg(long, help = "API endpoint to call", conflicts_with = "data")]
        pub url: Option<String>,

        #[arg(long, help = "Bind a local JSON file instead of calling an API")]
        pub data: Option<PathBuf>,

        #[arg(long, help = "HTML file containing {placeholders}")]
        pub template: Option<PathBuf>,

        #[arg(long, help = "CSS selector of the bind root (default: body)")]
        pub root: Option<String>,

        #[arg(long, short, help = "Write the bound HTML here instead of stdout")]
        pub output: Option<PathBuf>,

        #[arg(long, short, help = "TOML configuration file")]
        pub config: Option<PathBuf>,

        #[arg(long, short = 'X')]
        pub method: Option<Method>,

        #[arg(long, help = "JSON request body")]
        pub body: Option<String>,

        #[arg(long = "header", short = 'H', help = "Request header as 'Name: value'")]
        pub headers: Vec<String>,

        #[arg(long, help = "Timeout in milliseconds")]
        pub timeout: Option<u64>,

        #[arg(long, help = "Do not attach credential headers")]
        pub no_credentials: bool,

        #[arg(long, value_enum)]
        pub backend: Option<Backend>,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON lines")]
        pub log_json: bool,
    }

    impl CliConfig {
        /// 載入設定檔後以命令列參數覆蓋
        pub fn resolve(&self) -> Result<ClientConfig> {
            let mut config = match &self.config {
                Some(path) => ClientConfig::from_file(path)?,
                None => ClientConfig::default(),
            };

            if let Some(method) = self.method {
                config.request.method = method;
            }
            if let Some(body) = &self.body {
                config.request.body = Some(serde_json::from_str(body)?);
            }
            for header in &self.headers {
                let (name, value) = parse_header(header)?;
                config.request.headers.insert(name, value);
            }
            if let Some(timeout) = self.timeout {
                config.request.timeout_ms = timeout;
            }
            if self.no_credentials {
                config.request.with_credentials = false;
            }
            if let Some(backend) = self.backend {
                config.transport.backend = backend;
            }
            if let Some(root) = &self.root {
                config.bind.root = Some(root.clone());
            }

            config.validate()?;
            Ok(config)
        }
    }

    fn parse_header(raw: &str) -> Result<(String, String)> {
        let Some((name, value)) = raw.split_once(':') else {
            return Err(ApiError::InvalidConfigValueError {
                field: "header".to_string(),
                value: raw.to_string(),
                reason: "Expected 'Name: value'".to_string(),
            });
        };
        Ok((name.trim().to_string(), value.trim().to_string()))
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            match (&self.url, &self.data) {
                (Some(url), _) => validation::validate_url("url", url),
                (None, Some(_)) => Ok(()),
                (None, None) => Err(ApiError::ConfigError {
                    message: "either --url or --data is required".to_string(),
                }),
            }
        }
    }

}
