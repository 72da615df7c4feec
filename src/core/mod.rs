pub mod collector;
pub mod engine;
pub mod pipeline;
pub mod transform;

pub use crate::domain::model::{DelayRecord, TrainPosition, TrainRunKey};
pub use crate::domain::ports::{ConfigProvider, DetailFetcher, Pipeline, PositionSource, Storage};
pub use crate::utils::error::Result;
