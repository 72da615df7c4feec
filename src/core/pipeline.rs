use crate::core::transform;
use crate::domain::model::{DelayRecord, TrainPosition};
use crate::domain::ports::{ConfigProvider, DetailFetcher, Pipeline, Storage};
use crate::utils::error::{EtlError, Result};
use chrono::Utc;

/// The batch processing pipeline: raw position files in, delay table out.
pub struct DelayPipeline<S: Storage, C: ConfigProvider, F: DetailFetcher> {
    raw_store: S,
    processed_store: S,
    config: C,
    fetcher: F,
}

impl<S: Storage, C: ConfigProvider, F: DetailFetcher> DelayPipeline<S, C, F> {
    pub fn new(raw_store: S, processed_store: S, config: C, fetcher: F) -> Self {
        Self {
            raw_store,
            processed_store,
            config,
            fetcher,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, F: DetailFetcher> Pipeline for DelayPipeline<S, C, F> {
    /// Read every raw position file, newest window first if configured.
    /// A file that fails to parse is skipped with a warning; one bad batch
    /// must not sink the whole run.
    async fn extract(&self) -> Result<Vec<TrainPosition>> {
        let mut objects = self.raw_store.list_files("").await?;

        if let Some(window) = self.config.processing_window() {
            let cutoff = Utc::now()
                - chrono::Duration::from_std(window).unwrap_or_else(|_| chrono::Duration::zero());
            let before = objects.len();
            objects.retain(|obj| obj.modified.map_or(true, |m| m >= cutoff));
            tracing::debug!(
                "processing window kept {} of {} raw files",
                objects.len(),
                before
            );
        }

        let mut positions = Vec::new();
        for obj in &objects {
            let data = self.raw_store.read_file(&obj.key).await?;
            match serde_json::from_slice::<Vec<TrainPosition>>(&data) {
                Ok(batch) => {
                    tracing::debug!("read {} positions from {}", batch.len(), obj.key);
                    positions.extend(batch);
                }
                Err(e) => {
                    tracing::warn!("skipping malformed raw file {}: {}", obj.key, e);
                }
            }
        }

        Ok(positions)
    }

    async fn transform(&self, positions: Vec<TrainPosition>) -> Result<Vec<DelayRecord>> {
        let runs = transform::extract_unique_runs(&positions);
        tracing::info!(
            "found {} unique train runs in {} positions",
            runs.len(),
            positions.len()
        );

        transform::transform(runs, &self.fetcher, self.config.concurrent_requests()).await
    }

    async fn load(&self, records: Vec<DelayRecord>) -> Result<String> {
        let filename = self.config.output_filename();

        let mut writer = csv::Writer::from_writer(Vec::new());
        for record in &records {
            writer.serialize(record)?;
        }
        let data = writer
            .into_inner()
            .map_err(|e| EtlError::ProcessingError {
                message: format!("failed to finalize CSV output: {}", e),
            })?;

        self.processed_store
            .write_file(filename, &data)
            .await
            .map_err(|e| EtlError::SinkFailure {
                path: filename.to_string(),
                source: Box::new(e),
            })?;

        Ok(format!("{}/{}", self.config.processed_path(), filename))
    }
}
