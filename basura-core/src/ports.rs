//! Traits describing data-source capabilities and shared helper types.

use async_trait::async_trait;
use reqwest::Error as ReqwestError;
use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;

use crate::error::WasteError;
use crate::model::{VolumeMeasurement, WasteLevel};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to data sources or predictors.
pub enum PortError {
    /// Network layer failed.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// Response body was not the expected JSON.
    #[error("Decode error: {0}")]
    Decode(#[from] JsonError),
    /// Predictor returned a level name we do not know.
    #[error("Unknown level: {0}")]
    UnknownLevel(String),
    /// Source delivered a row that fails validation.
    #[error("Invalid measurement: {0}")]
    InvalidMeasurement(#[from] WasteError),
    /// No source is registered under the requested id.
    #[error("Unsupported source")]
    UnsupportedSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Projection returned by an external level predictor.
///
/// This is an independent opinion; it is reported next to the local
/// classification and never folded into it.
pub struct RemotePrediction {
    /// Level the predictor assigned.
    pub level: WasteLevel,
    /// Predicted kilograms per day.
    pub predicted_daily_kg: f64,
    /// Predicted kilograms per week.
    pub predicted_weekly_kg: f64,
}

#[async_trait]
/// Source of per-district daily volumes.
pub trait MeasurementFeedPort: Send + Sync {
    /// Load the current measurement for every district the source knows.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the source cannot be read or yields invalid rows.
    async fn measurements(&self) -> Result<Vec<VolumeMeasurement>, PortError>;
}

#[async_trait]
/// External classifier that predicts a level for a daily volume.
pub trait PredictorPort: Send + Sync {
    /// Ask the predictor for its projection of `volume_kg_per_day`.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the request fails or the answer cannot be decoded.
    async fn predict(&self, volume_kg_per_day: f64) -> Result<RemotePrediction, PortError>;
}
