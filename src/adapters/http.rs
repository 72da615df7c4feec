use crate::domain::model::{TrainDetail, TrainRunKey};
use crate::domain::ports::{DetailFetcher, PositionSource};
use crate::utils::error::{EtlError, Result};
use reqwest::Client;
use std::time::Duration;

/// Client for the Digitraffic "rata" API. Owns its connection pool; one
/// instance is built per run and passed to whatever needs it, so tests can
/// swap in fakes instead of reaching for shared globals.
#[derive(Debug, Clone)]
pub struct DigitrafficClient {
    client: Client,
    position_endpoint: String,
    detail_endpoint: String,
}

impl DigitrafficClient {
    pub fn new(
        position_endpoint: String,
        detail_endpoint: String,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            position_endpoint,
            detail_endpoint,
        })
    }

    fn detail_url(&self, key: &TrainRunKey) -> String {
        format!(
            "{}/{}/{}",
            self.detail_endpoint.trim_end_matches('/'),
            key.departure_date,
            key.train_number
        )
    }
}

impl PositionSource for DigitrafficClient {
    async fn latest_raw(&self) -> Result<String> {
        tracing::debug!("fetching latest positions from {}", self.position_endpoint);
        let response = self.client.get(&self.position_endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EtlError::SourceUnavailable {
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

impl DetailFetcher for DigitrafficClient {
    /// Look up the timetable detail for one run. The endpoint answers with
    /// a JSON array; a valid run has exactly one element. Every failure
    /// mode maps to `None` with a log line naming the run.
    async fn fetch_detail(&self, key: &TrainRunKey) -> Option<TrainDetail> {
        let url = self.detail_url(key);
        tracing::debug!("fetching timetable for {}", key);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("detail request for {} failed: {}", key, e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!("detail request for {} returned HTTP {}", key, response.status());
            return None;
        }

        let body: Vec<serde_json::Value> = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("detail response for {} is not a JSON array: {}", key, e);
                return None;
            }
        };

        let first = body.into_iter().next()?;
        match serde_json::from_value::<TrainDetail>(first) {
            Ok(detail) => Some(detail),
            Err(e) => {
                tracing::warn!("malformed timetable detail for {}: {}", key, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client_for(server: &MockServer) -> DigitrafficClient {
        DigitrafficClient::new(
            server.url("/train-locations/latest/"),
            server.url("/trains"),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn key() -> TrainRunKey {
        TrainRunKey::new(59, "2025-01-01".parse().unwrap())
    }

    #[tokio::test]
    async fn test_latest_raw_returns_verbatim_body() {
        let server = MockServer::start();
        let body = r#"[{"trainNumber": 59, "departureDate": "2025-01-01", "speed": 114}]"#;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/train-locations/latest/");
            then.status(200)
                .header("Content-Type", "application/json")
                .body(body);
        });

        let raw = client_for(&server).latest_raw().await.unwrap();

        mock.assert();
        assert_eq!(raw, body);
    }

    #[tokio::test]
    async fn test_latest_raw_surfaces_http_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/train-locations/latest/");
            then.status(503);
        });

        let err = client_for(&server).latest_raw().await.unwrap_err();

        assert!(matches!(err, EtlError::SourceUnavailable { status: 503 }));
    }

    #[tokio::test]
    async fn test_fetch_detail_parses_first_element() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/trains/2025-01-01/59");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!([{
                    "trainNumber": 59,
                    "departureDate": "2025-01-01",
                    "trainType": "S",
                    "timeTableRows": [
                        {
                            "stationShortCode": "HKI",
                            "type": "DEPARTURE",
                            "scheduledTime": "2025-01-01T06:24:00.000Z",
                            "actualTime": "2025-01-01T06:26:10.000Z"
                        },
                        {
                            "stationShortCode": "OL",
                            "type": "ARRIVAL",
                            "scheduledTime": "2025-01-01T12:07:00.000Z"
                        }
                    ]
                }]));
        });

        let detail = client_for(&server).fetch_detail(&key()).await.unwrap();

        mock.assert();
        assert_eq!(detail.train_number, 59);
        assert_eq!(detail.train_type, "S");
        assert_eq!(detail.time_table_rows.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_detail_none_on_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/trains/2025-01-01/59");
            then.status(404);
        });

        assert!(client_for(&server).fetch_detail(&key()).await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_detail_none_on_empty_array() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/trains/2025-01-01/59");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!([]));
        });

        assert!(client_for(&server).fetch_detail(&key()).await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_detail_none_on_malformed_detail() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/trains/2025-01-01/59");
            then.status(200)
                .header("Content-Type", "application/json")
                // timeTableRows missing entirely
                .json_body(serde_json::json!([{"trainNumber": 59}]));
        });

        assert!(client_for(&server).fetch_detail(&key()).await.is_none());
    }
}
