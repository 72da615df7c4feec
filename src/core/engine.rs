use crate::domain::ports::Pipeline;
use crate::utils::error::{EtlError, Result};

/// Runs a pipeline end to end: extract raw positions, transform them into
/// delay records, load the result into processed storage.
pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Returns the output path on success. Zero positions or zero emitted
    /// records surface as [`EtlError::EmptyResult`], which callers treat as
    /// "nothing to do" rather than a failure.
    pub async fn run(&self) -> Result<String> {
        tracing::info!("starting ETL run");

        let positions = self.pipeline.extract().await?;
        if positions.is_empty() {
            return Err(EtlError::EmptyResult { stage: "extract" });
        }
        tracing::info!("extracted {} position records", positions.len());

        let records = self.pipeline.transform(positions).await?;
        if records.is_empty() {
            return Err(EtlError::EmptyResult { stage: "transform" });
        }
        tracing::info!("transformed into {} delay records", records.len());

        let output_path = self.pipeline.load(records).await?;
        tracing::info!("output saved to {}", output_path);

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{DelayRecord, TrainPosition};
    use async_trait::async_trait;

    struct StubPipeline {
        positions: Vec<TrainPosition>,
        records: Vec<DelayRecord>,
    }

    #[async_trait]
    impl Pipeline for StubPipeline {
        async fn extract(&self) -> Result<Vec<TrainPosition>> {
            Ok(self.positions.clone())
        }

        async fn transform(&self, _positions: Vec<TrainPosition>) -> Result<Vec<DelayRecord>> {
            Ok(self.records.clone())
        }

        async fn load(&self, _records: Vec<DelayRecord>) -> Result<String> {
            Ok("out/train_delays.csv".to_string())
        }
    }

    fn sample_record() -> DelayRecord {
        DelayRecord {
            train_number: 1,
            train_type: "IC".to_string(),
            departure_station: "HKI".to_string(),
            destination_station: "TPE".to_string(),
            scheduled_departure_time: "2025-01-01T08:00:00Z".parse().unwrap(),
            actual_departure_time: "2025-01-01T08:00:00Z".parse().unwrap(),
            delay_minutes: 0,
        }
    }

    #[tokio::test]
    async fn test_run_signals_empty_result_on_no_positions() {
        let engine = EtlEngine::new(StubPipeline {
            positions: vec![],
            records: vec![],
        });

        let err = engine.run().await.unwrap_err();

        assert!(err.is_empty_result());
        assert!(matches!(err, EtlError::EmptyResult { stage: "extract" }));
    }

    #[tokio::test]
    async fn test_run_signals_empty_result_on_no_records() {
        let engine = EtlEngine::new(StubPipeline {
            positions: vec![TrainPosition {
                train_number: 1,
                departure_date: "2025-01-01".parse().unwrap(),
            }],
            records: vec![],
        });

        let err = engine.run().await.unwrap_err();

        assert!(matches!(err, EtlError::EmptyResult { stage: "transform" }));
    }

    #[tokio::test]
    async fn test_run_returns_output_path() {
        let engine = EtlEngine::new(StubPipeline {
            positions: vec![TrainPosition {
                train_number: 1,
                departure_date: "2025-01-01".parse().unwrap(),
            }],
            records: vec![sample_record()],
        });

        let path = engine.run().await.unwrap();

        assert_eq!(path, "out/train_delays.csv");
    }
}
