use crate::domain::model::TrainPosition;
use crate::domain::ports::{PositionSource, Storage};
use crate::utils::error::{EtlError, Result};
use chrono::{DateTime, Datelike, Utc};

/// Hive-style partition key for one collected batch, so later scans can
/// prune by date: `year=2025/month=09/day=13/2025-09-13-14-30-00.json`.
pub fn partitioned_key(now: DateTime<Utc>) -> String {
    format!(
        "year={}/month={:02}/day={:02}/{}.json",
        now.year(),
        now.month(),
        now.day(),
        now.format("%Y-%m-%d-%H-%M-%S")
    )
}

/// Fetches the latest position batch and archives it verbatim into raw
/// storage. One instance per collection loop; no shared state.
pub struct Collector<S: Storage, P: PositionSource> {
    storage: S,
    source: P,
}

impl<S: Storage, P: PositionSource> Collector<S, P> {
    pub fn new(storage: S, source: P) -> Self {
        Self { storage, source }
    }

    /// One collection cycle. Returns the written key, or `None` when the
    /// source reported no live trains (a normal outcome, not an error).
    pub async fn run_once(&self) -> Result<Option<String>> {
        let body = self.source.latest_raw().await?;

        let positions: Vec<TrainPosition> = serde_json::from_str(&body)?;
        if positions.is_empty() {
            tracing::info!("no live trains reported, skipping this cycle");
            return Ok(None);
        }

        let key = partitioned_key(Utc::now());
        self.storage
            .write_file(&key, body.as_bytes())
            .await
            .map_err(|e| EtlError::SinkFailure {
                path: key.clone(),
                source: Box::new(e),
            })?;

        tracing::info!("saved {} position records to {}", positions.len(), key);
        Ok(Some(key))
    }
}
