use crate::config::{DEFAULT_DETAIL_ENDPOINT, DEFAULT_POSITION_ENDPOINT};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{
    validate_path, validate_positive_number, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// TOML configuration file, the alternative to plain CLI flags:
///
/// ```toml
/// [pipeline]
/// name = "vr-train-delays"
///
/// [source]
/// position_endpoint = "https://rata.digitraffic.fi/api/v1/train-locations/latest/"
/// detail_endpoint = "https://rata.digitraffic.fi/api/v1/trains"
/// timeout_seconds = 10
///
/// [extract]
/// concurrent_requests = 8
/// window_minutes = 120
///
/// [load]
/// raw_path = "./data/raw"
/// processed_path = "${OUTPUT_DIR}"
/// output_filename = "train_delays.csv"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    pub pipeline: PipelineSection,
    pub source: SourceSection,
    pub extract: ExtractSection,
    pub load: LoadSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSection {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSection {
    #[serde(default = "default_position_endpoint")]
    pub position_endpoint: String,
    #[serde(default = "default_detail_endpoint")]
    pub detail_endpoint: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractSection {
    pub concurrent_requests: Option<usize>,
    pub window_minutes: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadSection {
    pub raw_path: String,
    pub processed_path: String,
    #[serde(default = "default_output_filename")]
    pub output_filename: String,
}

fn default_position_endpoint() -> String {
    DEFAULT_POSITION_ENDPOINT.to_string()
}

fn default_detail_endpoint() -> String {
    DEFAULT_DETAIL_ENDPOINT.to_string()
}

fn default_output_filename() -> String {
    "train_delays.csv".to_string()
}

impl FileConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);

        toml::from_str(&processed).map_err(|e| EtlError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR_NAME}` placeholders with environment values; unknown
    /// variables are left as-is so validation can complain about them.
    fn substitute_env_vars(content: &str) -> String {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").expect("valid literal regex");

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }
}

impl ConfigProvider for FileConfig {
    fn position_endpoint(&self) -> &str {
        &self.source.position_endpoint
    }

    fn detail_endpoint(&self) -> &str {
        &self.source.detail_endpoint
    }

    fn raw_path(&self) -> &str {
        &self.load.raw_path
    }

    fn processed_path(&self) -> &str {
        &self.load.processed_path
    }

    fn output_filename(&self) -> &str {
        &self.load.output_filename
    }

    fn concurrent_requests(&self) -> usize {
        self.extract.concurrent_requests.unwrap_or(5)
    }

    fn processing_window(&self) -> Option<Duration> {
        self.extract.window_minutes.map(|m| Duration::from_secs(m * 60))
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_seconds.unwrap_or(10))
    }
}

impl Validate for FileConfig {
    fn validate(&self) -> Result<()> {
        validate_url("source.position_endpoint", &self.source.position_endpoint)?;
        validate_url("source.detail_endpoint", &self.source.detail_endpoint)?;
        validate_path("load.raw_path", &self.load.raw_path)?;
        validate_path("load.processed_path", &self.load.processed_path)?;
        validate_path("load.output_filename", &self.load.output_filename)?;
        validate_positive_number("extract.concurrent_requests", self.concurrent_requests(), 1)?;
        Ok(())
    }
}
