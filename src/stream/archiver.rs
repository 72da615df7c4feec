use crate::domain::ports::Storage;
use crate::stream::channel::StreamRecord;
use crate::utils::error::Result;
use chrono::{DateTime, Datelike, Timelike, Utc};
use tokio::sync::mpsc;

/// Storage key for one streamed record, partitioned down to the hour:
/// `realtime-ingest/year=2025/month=09/day=13/hour=14/train_8_....json`.
pub fn record_key(partition_key: &str, now: DateTime<Utc>) -> String {
    format!(
        "realtime-ingest/year={}/month={:02}/day={:02}/hour={:02}/train_{}_{}.json",
        now.year(),
        now.month(),
        now.day(),
        now.hour(),
        partition_key,
        now.format("%Y-%m-%dT%H-%M-%S%.3f")
    )
}

/// Drains a stream receiver and archives each record into raw storage.
/// Write failures are logged per record and do not stop the consumer.
pub struct StreamArchiver<S: Storage> {
    storage: S,
}

impl<S: Storage> StreamArchiver<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Consume until the channel closes. Returns how many records were
    /// archived successfully.
    pub async fn run(&self, mut receiver: mpsc::Receiver<StreamRecord>) -> Result<usize> {
        let mut archived = 0usize;

        while let Some(record) = receiver.recv().await {
            let key = record_key(&record.partition_key, Utc::now());
            match self.storage.write_file(&key, record.payload.as_bytes()).await {
                Ok(()) => {
                    tracing::debug!("archived stream record to {}", key);
                    archived += 1;
                }
                Err(e) => {
                    tracing::error!(
                        "failed to archive record for train {}: {}",
                        record.partition_key,
                        e
                    );
                }
            }
        }

        tracing::info!("stream closed, archived {} records", archived);
        Ok(archived)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::RawObject;
    use crate::domain::ports::StreamPublisher;
    use crate::stream::ChannelStream;
    use crate::utils::error::EtlError;
    use chrono::TimeZone;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MemStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl Storage for MemStorage {
        async fn list_files(&self, prefix: &str) -> Result<Vec<RawObject>> {
            Ok(self
                .files
                .lock()
                .await
                .keys()
                .filter(|k| k.starts_with(prefix))
                .map(|k| RawObject {
                    key: k.clone(),
                    modified: None,
                })
                .collect())
        }

        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            self.files.lock().await.get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(std::io::ErrorKind::NotFound, path))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.files.lock().await.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    #[test]
    fn test_record_key_partitions_by_hour_and_train() {
        let now = Utc.with_ymd_and_hms(2025, 9, 13, 14, 30, 5).unwrap();

        let key = record_key("42", now);

        assert!(key.starts_with("realtime-ingest/year=2025/month=09/day=13/hour=14/train_42_"));
        assert!(key.ends_with(".json"));
    }

    #[tokio::test]
    async fn test_archiver_writes_each_published_record() {
        let storage = MemStorage {
            files: Arc::new(Mutex::new(HashMap::new())),
        };
        let (stream, receiver) = ChannelStream::new(8);

        stream
            .publish("1".to_string(), r#"{"trainNumber": 1}"#.to_string())
            .await
            .unwrap();
        stream
            .publish("2".to_string(), r#"{"trainNumber": 2}"#.to_string())
            .await
            .unwrap();
        drop(stream);

        let archiver = StreamArchiver::new(storage.clone());
        let archived = archiver.run(receiver).await.unwrap();

        assert_eq!(archived, 2);
        let files = storage.files.lock().await;
        assert_eq!(files.len(), 2);
        assert!(files.keys().any(|k| k.contains("train_1_")));
        assert!(files.keys().any(|k| k.contains("train_2_")));
    }
}
