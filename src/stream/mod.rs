//! Optional streaming ingest path.
//!
//! Instead of archiving whole position batches, individual position
//! records can flow through a publish/subscribe transport partitioned by
//! train number, then land in raw storage one file per record.

mod archiver;
mod channel;

pub use archiver::{record_key, StreamArchiver};
pub use channel::{ChannelStream, StreamRecord};
