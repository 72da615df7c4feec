use clap::Parser;
use rata_etl::domain::ports::ConfigProvider;
use rata_etl::utils::{logger, validation::Validate};
use rata_etl::{CliConfig, Collector, DigitrafficClient, LocalStorage};

#[derive(Parser)]
#[command(name = "collector")]
#[command(about = "Periodically archive live train positions into raw storage")]
struct Args {
    /// Seconds to wait between collection cycles
    #[arg(long, default_value = "60")]
    interval_secs: u64,

    /// Run a single collection cycle and exit
    #[arg(long)]
    once: bool,

    #[command(flatten)]
    cli: CliConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    logger::init_cli_logger(args.cli.verbose);
    tracing::info!("starting position collector");

    if let Err(e) = args.cli.validate() {
        tracing::error!("configuration validation failed: {}", e);
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let client = DigitrafficClient::new(
        args.cli.position_endpoint().to_string(),
        args.cli.detail_endpoint().to_string(),
        args.cli.request_timeout(),
    )?;
    let storage = LocalStorage::new(args.cli.raw_path().to_string());
    let collector = Collector::new(storage, client);

    if args.once {
        collector.run_once().await?;
        return Ok(());
    }

    let mut interval = tokio::time::interval(std::time::Duration::from_secs(args.interval_secs));
    loop {
        interval.tick().await;
        // A failed cycle is logged and the loop keeps going; the next tick
        // gets a fresh chance at the source.
        if let Err(e) = collector.run_once().await {
            tracing::error!("collection cycle failed: {}", e);
        }
    }
}
