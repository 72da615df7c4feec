use clap::Parser;
use rata_etl::domain::ports::ConfigProvider;
use rata_etl::utils::{logger, validation::Validate};
use rata_etl::{CliConfig, DelayPipeline, DigitrafficClient, EtlEngine, FileConfig, LocalStorage};

#[derive(Parser)]
#[command(name = "rata-etl")]
#[command(about = "Process raw train positions into a delay table")]
struct Args {
    /// Path to a TOML configuration file; flags are used when absent
    #[arg(short, long)]
    config: Option<String>,

    #[command(flatten)]
    cli: CliConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    logger::init_cli_logger(args.cli.verbose);
    tracing::info!("starting rata-etl processor");

    match &args.config {
        Some(path) => {
            tracing::info!("loading configuration from {}", path);
            let config = match FileConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Failed to load config file '{}': {}", path, e);
                    std::process::exit(1);
                }
            };
            run(config).await
        }
        None => run(args.cli).await,
    }
}

async fn run<C: ConfigProvider + Validate>(config: C) -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = config.validate() {
        tracing::error!("configuration validation failed: {}", e);
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let client = DigitrafficClient::new(
        config.position_endpoint().to_string(),
        config.detail_endpoint().to_string(),
        config.request_timeout(),
    )?;
    let raw_store = LocalStorage::new(config.raw_path().to_string());
    let processed_store = LocalStorage::new(config.processed_path().to_string());

    let pipeline = DelayPipeline::new(raw_store, processed_store, config, client);
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("ETL run completed, output saved to {}", output_path);
            println!("Output saved to: {}", output_path);
        }
        Err(e) if e.is_empty_result() => {
            tracing::warn!("{}; nothing to do this run", e);
        }
        Err(e) => {
            tracing::error!("ETL run failed: {}", e);
            eprintln!("ETL run failed: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
