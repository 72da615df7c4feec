use crate::domain::ports::StreamPublisher;
use crate::utils::error::{EtlError, Result};
use tokio::sync::mpsc;

/// One published position record in flight.
#[derive(Debug, Clone)]
pub struct StreamRecord {
    pub partition_key: String,
    pub payload: String,
}

/// In-process stream transport over a bounded tokio channel. A single
/// receiver preserves publish order, which per-train ordering relies on.
#[derive(Clone)]
pub struct ChannelStream {
    sender: mpsc::Sender<StreamRecord>,
}

impl ChannelStream {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<StreamRecord>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }
}

impl StreamPublisher for ChannelStream {
    async fn publish(&self, partition_key: String, payload: String) -> Result<()> {
        self.sender
            .send(StreamRecord {
                partition_key,
                payload,
            })
            .await
            .map_err(|_| EtlError::ProcessingError {
                message: "stream consumer is gone, cannot publish".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_preserves_order() {
        let (stream, mut receiver) = ChannelStream::new(8);

        stream.publish("1".to_string(), "a".to_string()).await.unwrap();
        stream.publish("1".to_string(), "b".to_string()).await.unwrap();

        assert_eq!(receiver.recv().await.unwrap().payload, "a");
        assert_eq!(receiver.recv().await.unwrap().payload, "b");
    }

    #[tokio::test]
    async fn test_publish_fails_after_receiver_dropped() {
        let (stream, receiver) = ChannelStream::new(8);
        drop(receiver);

        let result = stream.publish("1".to_string(), "a".to_string()).await;

        assert!(result.is_err());
    }
}
