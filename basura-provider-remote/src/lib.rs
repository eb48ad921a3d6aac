//! Provider implementation backed by the waste-data HTTP API and its level predictor.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use basura_core::{
    model::{VolumeMeasurement, WasteLevel},
    plugin::{SourceId, SourceMeta, SourcePlugin},
    ports::{MeasurementFeedPort, PortError, PredictorPort, RemotePrediction},
};

/// Identifier under which this provider registers.
pub const SOURCE_ID: &str = "remote";

/// Single row from GET /waste-data
#[derive(Debug, Deserialize)]
struct WasteDataEntry {
    barangay: String,
    /// kg per day
    predicted: f64,
}

/// Body for POST /predict
#[derive(Debug, Serialize)]
struct PredictRequest {
    #[serde(rename = "totalWaste")]
    total_waste: f64,
}

/// Response from POST /predict
#[derive(Debug, Deserialize)]
struct PredictResponse {
    level: String,
    predicted_daily_kg: f64,
    predicted_weekly_kg: f64,
}

/// Measurement feed reading `{base_url}/waste-data`.
pub struct RemoteFeedPort {
    client: Client,
    base_url: String,
}

impl RemoteFeedPort {
    /// Create a new feed port bound to the given HTTP client and API root.
    #[must_use]
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
        }
    }
}

#[async_trait]
impl MeasurementFeedPort for RemoteFeedPort {
    async fn measurements(&self) -> Result<Vec<VolumeMeasurement>, PortError> {
        let req = self.client.get(format!("{}/waste-data", self.base_url));
        let rows = fetch_json::<Vec<WasteDataEntry>>(req).await?;
        debug!(rows = rows.len(), "Waste data received");
        to_measurements(rows)
    }
}

/// Level predictor reached through `{base_url}/predict`.
pub struct RemotePredictorPort {
    client: Client,
    base_url: String,
}

impl RemotePredictorPort {
    /// Create a new predictor port bound to the given HTTP client and API root.
    #[must_use]
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
        }
    }
}

#[async_trait]
impl PredictorPort for RemotePredictorPort {
    async fn predict(&self, volume_kg_per_day: f64) -> Result<RemotePrediction, PortError> {
        let req = self
            .client
            .post(format!("{}/predict", self.base_url))
            .json(&PredictRequest {
                total_waste: volume_kg_per_day,
            });
        let resp = fetch_json::<PredictResponse>(req).await?;
        debug!(level = %resp.level, "Predictor answered");
        to_prediction(resp)
    }
}

/// Build the plugin bundle for the remote provider.
#[must_use]
pub fn plugin(client: Client, base_url: &str) -> SourcePlugin {
    let feed_port = Arc::new(RemoteFeedPort::new(client.clone(), base_url));
    let predictor_port = Arc::new(RemotePredictorPort::new(client, base_url));

    SourcePlugin {
        meta: source_meta(base_url),
        feed_port,
        predictor_port: Some(predictor_port),
    }
}

fn source_meta(base_url: &str) -> SourceMeta {
    SourceMeta {
        id: SourceId(String::from(SOURCE_ID)),
        name: format!("Live API ({})", trim_base(base_url)),
    }
}

fn trim_base(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_owned()
}

fn to_measurements(rows: Vec<WasteDataEntry>) -> Result<Vec<VolumeMeasurement>, PortError> {
    rows.into_iter()
        .map(|row| VolumeMeasurement::new(row.barangay, row.predicted).map_err(PortError::from))
        .collect()
}

fn to_prediction(resp: PredictResponse) -> Result<RemotePrediction, PortError> {
    let level = resp
        .level
        .parse::<WasteLevel>()
        .map_err(PortError::UnknownLevel)?;

    Ok(RemotePrediction {
        level,
        predicted_daily_kg: resp.predicted_daily_kg,
        predicted_weekly_kg: resp.predicted_weekly_kg,
    })
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, PortError> {
    serde_json::from_str(body).map_err(PortError::from)
}

// Small helper to fetch and decode JSON with status handling.
async fn fetch_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, PortError> {
    let body = req
        .send()
        .await
        .map_err(PortError::from)?
        .error_for_status()
        .map_err(PortError::from)?
        .text()
        .await
        .map_err(PortError::from)?;
    decode(&body)
}
