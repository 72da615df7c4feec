use crate::domain::model::{DelayRecord, RawObject, TrainDetail, TrainPosition, TrainRunKey};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    /// List objects under a key prefix. An empty prefix lists everything.
    fn list_files(
        &self,
        prefix: &str,
    ) -> impl std::future::Future<Output = Result<Vec<RawObject>>> + Send;

    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;

    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Source of "currently active trains" position batches.
pub trait PositionSource: Send + Sync {
    /// Fetch the latest position batch as the verbatim response body.
    /// An empty array body is a valid result, not an error.
    fn latest_raw(&self) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Per-run timetable lookup. Returns `None` when the run is unknown, the
/// lookup fails, or the payload is malformed; implementations log the key
/// so no run is dropped silently.
pub trait DetailFetcher: Send + Sync {
    fn fetch_detail(
        &self,
        key: &TrainRunKey,
    ) -> impl std::future::Future<Output = Option<TrainDetail>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn position_endpoint(&self) -> &str;
    fn detail_endpoint(&self) -> &str;
    fn raw_path(&self) -> &str;
    fn processed_path(&self) -> &str;
    fn output_filename(&self) -> &str;
    fn concurrent_requests(&self) -> usize;
    /// Only process raw files modified within this window; `None` means all.
    fn processing_window(&self) -> Option<Duration>;
    fn request_timeout(&self) -> Duration;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<TrainPosition>>;
    async fn transform(&self, positions: Vec<TrainPosition>) -> Result<Vec<DelayRecord>>;
    async fn load(&self, records: Vec<DelayRecord>) -> Result<String>;
}

/// Publish side of the optional streaming ingest path. Payloads are the
/// verbatim per-train JSON objects, partitioned by train number so records
/// for one train stay ordered.
pub trait StreamPublisher: Send + Sync {
    fn publish(
        &self,
        partition_key: String,
        payload: String,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}
