use clap::Parser;
use rata_etl::domain::ports::{ConfigProvider, PositionSource, StreamPublisher};
use rata_etl::stream::{ChannelStream, StreamArchiver};
use rata_etl::utils::{logger, validation::Validate};
use rata_etl::{CliConfig, DigitrafficClient, LocalStorage};

#[derive(Parser)]
#[command(name = "stream-ingest")]
#[command(about = "Stream live train positions record-by-record into raw storage")]
struct Args {
    /// Seconds to wait between fetch cycles
    #[arg(long, default_value = "30")]
    interval_secs: u64,

    /// Number of fetch cycles to run; loops forever when absent
    #[arg(long)]
    cycles: Option<u64>,

    #[command(flatten)]
    cli: CliConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    logger::init_cli_logger(args.cli.verbose);
    tracing::info!("starting streaming ingest");

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

    let (stream, receiver) = ChannelStream::new(512);
    let archiver = StreamArchiver::new(storage);
    let archiver_task = tokio::spawn(async move { archiver.run(receiver).await });

    let mut interval = tokio::time::interval(std::time::Duration::from_secs(args.interval_secs));
    let mut cycle = 0u64;
    loop {
        interval.tick().await;
        cycle += 1;

        match publish_cycle(&client, &stream).await {
            Ok(0) => tracing::info!("no live trains reported, waiting"),
            Ok(published) => tracing::info!("published {} position records", published),
            Err(e) => tracing::error!("fetch cycle failed: {}", e),
        }

        if args.cycles.is_some_and(|max| cycle >= max) {
            break;
        }
    }

    drop(stream);
    let archived = archiver_task.await??;
    tracing::info!("ingest finished, {} records archived", archived);

    Ok(())
}

/// One fetch cycle: pull the latest batch and publish each position keyed
/// by train number so per-train ordering holds downstream.
async fn publish_cycle(
    client: &DigitrafficClient,
    stream: &ChannelStream,
) -> rata_etl::Result<usize> {
    let body = client.latest_raw().await?;
    let positions: Vec<serde_json::Value> = serde_json::from_str(&body)?;

    let mut published = 0usize;
    for position in &positions {
        let train_number = position
            .get("trainNumber")
            .and_then(|v| v.as_u64())
            .map(|n| n.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        stream
            .publish(train_number, position.to_string())
            .await?;
        published += 1;
    }

    Ok(published)
}
