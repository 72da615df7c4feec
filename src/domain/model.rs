use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One live position report from the Digitraffic train-locations feed.
///
/// The feed carries more fields (speed, coordinates) but the transform only
/// needs the run key; unknown fields are ignored on deserialization. Raw
/// storage keeps the verbatim JSON, so nothing is lost by parsing leniently.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainPosition {
    pub train_number: u32,
    pub departure_date: NaiveDate,
}

/// Identifies one train run: a train number alone is reused across days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrainRunKey {
    pub train_number: u32,
    pub departure_date: NaiveDate,
}

impl TrainRunKey {
    pub fn new(train_number: u32, departure_date: NaiveDate) -> Self {
        Self {
            train_number,
            departure_date,
        }
    }
}

impl From<&TrainPosition> for TrainRunKey {
    fn from(position: &TrainPosition) -> Self {
        Self {
            train_number: position.train_number,
            departure_date: position.departure_date,
        }
    }
}

impl std::fmt::Display for TrainRunKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "train {} on {}", self.train_number, self.departure_date)
    }
}

/// Stop-event kind within a timetable. The API also reports other kinds
/// (e.g. passing without stopping); those never contribute to delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StopEventType {
    Departure,
    Arrival,
    #[serde(other)]
    Other,
}

/// One scheduled stop event within a train run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableRow {
    pub station_short_code: String,
    #[serde(rename = "type")]
    pub event_type: StopEventType,
    pub scheduled_time: DateTime<Utc>,
    /// Absent means the train ran to schedule at this stop.
    #[serde(default)]
    pub actual_time: Option<DateTime<Utc>>,
}

/// Full timetable detail for one train run, fetched per run key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainDetail {
    pub train_number: u32,
    pub departure_date: NaiveDate,
    pub train_type: String,
    pub time_table_rows: Vec<TimetableRow>,
}

/// One row of the processed delay table. Created once per run key during a
/// processing run and never updated in place; reprocessing writes a new batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayRecord {
    pub train_number: u32,
    pub train_type: String,
    pub departure_station: String,
    pub destination_station: String,
    pub scheduled_departure_time: DateTime<Utc>,
    pub actual_departure_time: DateTime<Utc>,
    pub delay_minutes: i64,
}

/// A listed object in raw storage.
#[derive(Debug, Clone)]
pub struct RawObject {
    pub key: String,
    pub modified: Option<DateTime<Utc>>,
}
