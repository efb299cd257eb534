use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vendormatch_common::{logger, AppConfig};
use vendormatch_matcher::{MatchEngine, QualificationRequest, QualificationResponse};

#[derive(Parser)]
#[command(name = "vendormatch")]
#[command(about = "VendorMatch - semantic vendor qualification by capability", long_about = None)]
struct Cli {
    /// Configuration file (toml, json or yaml); environment variables otherwise
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Vendor dataset (.csv, .json or .jsonl)
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the vendor catalog and start the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run one qualification request and print the JSON response
    Qualify {
        /// Target software category
        #[arg(long)]
        category: String,

        /// Desired capability (repeat for several)
        #[arg(long = "capability", required = true)]
        capabilities: Vec<String>,

        /// Pretty-print the JSON response
        #[arg(long)]
        pretty: bool,
    },
}

/// `.env` (searched upward from the working directory) is read by `AppConfig`
fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::from_env()?,
    };

    if let Some(dataset) = &cli.dataset {
        config.dataset_path = dataset.clone();
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(&cli)?;

    match cli.command {
        Some(Commands::Qualify {
            category,
            capabilities,
            pretty,
        }) => {
            logger::setup_console_logging(&config.log_level)?;
            config.validate()?;

            let engine = MatchEngine::from_config(&config).await?;
            let request = QualificationRequest::new(category, capabilities);
            let response = QualificationResponse::from(engine.qualify(&request).await?);

            let json = if pretty {
                serde_json::to_string_pretty(&response)?
            } else {
                serde_json::to_string(&response)?
            };
            println!("{}", json);
        }
        Some(Commands::Serve { host, port }) => {
            if let Some(host) = host {
                config.server_host = host;
            }
            if let Some(port) = port {
                config.server_port = port;
            }

            logger::setup_logging(&config.log_dir, &config.log_level)?;

            tracing::info!("VendorMatch starting...");
            tracing::info!("Configuration loaded:");
            tracing::info!("  Bind: {}", config.server_bind_address());
            tracing::info!("  Dataset: {}", config.dataset_path.display());
            tracing::info!("  Embedding: {} ({})", config.embedding_backend, config.embedding_model);

            vendormatch_server::start_server(config).await?;
        }
        None => {
            logger::setup_logging(&config.log_dir, &config.log_level)?;

            tracing::info!("VendorMatch starting with default configuration...");

            vendormatch_server::start_server(config).await?;
        }
    }

    Ok(())
}
