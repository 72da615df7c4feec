pub mod file_config;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_path, validate_positive_number, validate_url, Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_POSITION_ENDPOINT: &str =
    "https://rata.digitraffic.fi/api/v1/train-locations/latest/";
pub const DEFAULT_DETAIL_ENDPOINT: &str = "https://rata.digitraffic.fi/api/v1/trains";

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "rata-etl")]
#[command(about = "Train delay ETL for the Digitraffic railway API")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_POSITION_ENDPOINT)]
    pub position_endpoint: String,

    #[arg(long, default_value = DEFAULT_DETAIL_ENDPOINT)]
    pub detail_endpoint: String,

    #[arg(long, default_value = "./data/raw")]
    pub raw_path: String,

    #[arg(long, default_value = "./data/processed")]
    pub processed_path: String,

    #[arg(long, default_value = "train_delays.csv")]
    pub output_filename: String,

    #[arg(long, default_value = "5")]
    pub concurrent_requests: usize,

    /// Only process raw files modified within the last N minutes
    #[arg(long)]
    pub window_minutes: Option<u64>,

    #[arg(long, default_value = "10")]
    pub request_timeout_secs: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
    fn position_endpoint(&self) -> &str {
        &self.position_endpoint
    }

    fn detail_endpoint(&self) -> &str {
        &self.detail_endpoint
    }

    fn raw_path(&self) -> &str {
        &self.raw_path
    }

    fn processed_path(&self) -> &str {
        &self.processed_path
    }

    fn output_filename(&self) -> &str {
        &self.output_filename
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }

    fn processing_window(&self) -> Option<Duration> {
        self.window_minutes.map(|m| Duration::from_secs(m * 60))
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("position_endpoint", &self.position_endpoint)?;
        validate_url("detail_endpoint", &self.detail_endpoint)?;
        validate_path("raw_path", &self.raw_path)?;
        validate_path("processed_path", &self.processed_path)?;
        validate_path("output_filename", &self.output_filename)?;
        validate_positive_number("concurrent_requests", self.concurrent_requests, 1)?;
        validate_positive_number("request_timeout_secs", self.request_timeout_secs as usize, 1)?;
        Ok(())
    }
}
