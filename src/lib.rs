pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod stream;
pub mod utils;

pub use adapters::{DigitrafficClient, LocalStorage};
pub use config::{file_config::FileConfig, CliConfig};
pub use crate::core::{collector::Collector, engine::EtlEngine, pipeline::DelayPipeline};
pub use utils::error::{EtlError, Result};
