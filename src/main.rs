use clap::Parser;
use ezyapi::utils::{logger, validation::Validate};
use ezyapi::{ApiClient, ApiError, CliConfig, Document};
use serde_json::Value;

async fn run(cli: &CliConfig) -> ezyapi::Result<()> {
    let config = cli.resolve()?;
    let root = config.root_selector()?;

    let mut document = cli
        .template
        .as_ref()
        .map(Document::from_file)
        .transpose()?;

    let data = match (&cli.url, &cli.data) {
        (Some(url), _) => {
            let client: ApiClient = config.build_client()?;
            let options = config.request_options();
            match document.as_mut() {
                Some(document) => {
                    client
                        .auto_bind(url, document, root.as_ref(), &options)
                        .await
                }
                None => client.apidata(client.callapi(url, &options)).await,
            }
        }
        (None, Some(path)) => {
            let data: Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
            if let Some(document) = document.as_mut() {
                ezyapi::bind_data(&data, document, root.as_ref());
            }
            data
        }
        (None, None) => {
            return Err(ApiError::ConfigError {
                message: "either --url or --data is required".to_string(),
            })
        }
    };

    // 沒有模板時直接輸出拆封後的資料
    let output = match &document {
        Some(document) => document.html(),
        None => serde_json::to_string_pretty(&data)?,
    };

    match &cli.output {
        Some(path) => {
            std::fs::write(path, output)?;
            tracing::info!("📁 Output saved to: {}", path.display());
        }
        None => println!("{}", output),
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = cli.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    if let Err(e) = run(&cli).await {
        tracing::error!("❌ ezyapi failed: {}", e);
        eprintln!("❌ {}", e);
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(2);
    }
}
