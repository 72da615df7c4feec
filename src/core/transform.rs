//! Delay computation for train runs.
//!
//! Takes raw position records, reduces them to unique run keys, pairs each
//! key with its timetable detail and emits one delay row per run that has
//! both a departure and an arrival on record.

use crate::domain::model::{
    DelayRecord, StopEventType, TimetableRow, TrainDetail, TrainPosition, TrainRunKey,
};
use crate::domain::ports::DetailFetcher;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use futures::{stream, StreamExt};
use std::collections::HashSet;

/// Reduce a position batch to the distinct (trainNumber, departureDate)
/// pairs. The feed reports each moving train many times per run.
pub fn extract_unique_runs(positions: &[TrainPosition]) -> HashSet<TrainRunKey> {
    positions.iter().map(TrainRunKey::from).collect()
}

/// Pick the origin departure and final arrival out of a timetable.
///
/// The first DEPARTURE row and the last ARRIVAL row, in original order.
/// Intermediate stops produce rows of both types; only the endpoints of
/// the journey matter for the delay table.
pub fn select_departure_arrival(
    rows: &[TimetableRow],
) -> (Option<&TimetableRow>, Option<&TimetableRow>) {
    let departure = rows
        .iter()
        .find(|row| row.event_type == StopEventType::Departure);
    let arrival = rows
        .iter()
        .rev()
        .find(|row| row.event_type == StopEventType::Arrival);
    (departure, arrival)
}

/// Delay in whole minutes, truncated toward zero. A missing actual time
/// means the train ran to schedule, so the delay is zero by definition.
/// Early departures stay negative; clamping is left to consumers.
pub fn compute_delay_minutes(scheduled: DateTime<Utc>, actual: Option<DateTime<Utc>>) -> i64 {
    match actual {
        Some(actual) => (actual - scheduled).num_seconds() / 60,
        None => 0,
    }
}

/// Build the delay row for one train run, or `None` when the timetable has
/// no matched departure + arrival pair and the run has no well-defined delay.
pub fn delay_record_from_detail(detail: &TrainDetail) -> Option<DelayRecord> {
    let (departure, arrival) = select_departure_arrival(&detail.time_table_rows);
    let (departure, arrival) = (departure?, arrival?);

    let scheduled = departure.scheduled_time;
    let actual = departure.actual_time;

    Some(DelayRecord {
        train_number: detail.train_number,
        train_type: detail.train_type.clone(),
        departure_station: departure.station_short_code.clone(),
        destination_station: arrival.station_short_code.clone(),
        scheduled_departure_time: scheduled,
        actual_departure_time: actual.unwrap_or(scheduled),
        delay_minutes: compute_delay_minutes(scheduled, actual),
    })
}

/// Fetch details for every run key and emit one [`DelayRecord`] per run
/// that resolves. Fetches run concurrently with at most `concurrency` in
/// flight, which keeps the pressure on the remote endpoint bounded.
///
/// Missing details and unmatched timetables are skipped with a log line
/// naming the run; output order is unspecified.
pub async fn transform<F: DetailFetcher>(
    runs: HashSet<TrainRunKey>,
    fetcher: &F,
    concurrency: usize,
) -> Result<Vec<DelayRecord>> {
    let results: Vec<Option<DelayRecord>> = stream::iter(runs)
        .map(|key| async move {
            let Some(detail) = fetcher.fetch_detail(&key).await else {
                tracing::warn!("no timetable detail for {}, skipping", key);
                return None;
            };
            match delay_record_from_detail(&detail) {
                Some(record) => Some(record),
                None => {
                    tracing::warn!("{} has no matched departure and arrival, skipping", key);
                    None
                }
            }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    Ok(results.into_iter().flatten().collect())
}
