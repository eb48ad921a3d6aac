//! High-level service facade combining data sources with the classifier.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::classifier::Classifier;
use crate::error::WasteError;
use crate::model::{ClassificationResult, Period};
use crate::plugin::{SourceId, SourceRegistry};
use crate::ports::{PortError, RemotePrediction};
use crate::stats::{StatisticsSummary, summarize, top_n, total_fleet};

#[derive(thiserror::Error, Debug)]
/// Errors surfaced by [`BasuraService`].
pub enum ServiceError {
    /// A source or predictor failed.
    #[error(transparent)]
    Port(#[from] PortError),
    /// Classification or statistics rejected the data.
    #[error(transparent)]
    Core(#[from] WasteError),
}

#[derive(Debug, Clone, Serialize)]
/// Everything the dashboard renders for one refresh of a source.
pub struct DashboardSnapshot {
    /// Time the snapshot was computed.
    pub generated_at: DateTime<Utc>,
    /// Per-district classifications in feed order.
    pub results: Vec<ClassificationResult>,
    /// Statistics over `results`.
    pub summary: StatisticsSummary,
    /// Highest-volume districts.
    pub top: Vec<ClassificationResult>,
    /// Vehicles needed to follow every recommendation.
    pub total_fleet: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// What the external predictor said about a volume, relative to the local result.
pub enum RemoteOutcome {
    /// Predictor assigned the same level.
    Agrees(RemotePrediction),
    /// Predictor assigned a different level.
    Disagrees(RemotePrediction),
    /// Predictor call failed; the reason is kept for display.
    Unavailable(String),
    /// The source has no predictor.
    NotConfigured,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Local classification plus the labelled external opinion.
pub struct PredictionReport {
    /// Result of the local threshold table.
    pub local: ClassificationResult,
    /// External predictor outcome.
    pub remote: RemoteOutcome,
}

/// Public entry point for dashboards and predictions.
pub struct BasuraService {
    registry: Arc<SourceRegistry>,
    classifier: Classifier,
}

impl BasuraService {
    /// Create a new service bound to the provided registry and classifier.
    #[must_use]
    pub fn new(registry: Arc<SourceRegistry>, classifier: Classifier) -> Self {
        Self {
            registry,
            classifier,
        }
    }

    /// Classifier used for every computation.
    #[must_use]
    pub fn classifier(&self) -> Classifier {
        self.classifier
    }

    /// List all available sources and their display names.
    #[must_use]
    pub fn sources(&self) -> Vec<(SourceId, String)> {
        self.registry
            .sources()
            .into_iter()
            .map(|meta| (meta.id, meta.name))
            .collect()
    }

    /// Load a source and derive classifications, statistics, and the top `top` districts.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Port`] if the source is unknown or fails, and
    /// [`ServiceError::Core`] with [`WasteError::EmptyInput`] if it has no districts
    /// or [`WasteError::VolumeOverflow`] if their volumes cannot be summed.
    #[tracing::instrument(skip(self, source), fields(source = %source))]
    pub async fn dashboard(
        &self,
        source: &SourceId,
        top: usize,
    ) -> Result<DashboardSnapshot, ServiceError> {
        let plugin = self.registry.plugin(source)?;
        let measurements = plugin.feed_port.measurements().await?;
        debug!(count = measurements.len(), "Measurements loaded");

        let results: Vec<ClassificationResult> = measurements
            .into_iter()
            .map(|measurement| self.classifier.classify_measurement(measurement))
            .collect();

        let summary = summarize(&results)?;
        let ranked = top_n(&results, top);
        let fleet = total_fleet(&results);

        info!(
            districts = summary.total_records(),
            total_kg = summary.total_volume_kg(),
            total_fleet = fleet,
            "Dashboard computed"
        );

        Ok(DashboardSnapshot {
            generated_at: Utc::now(),
            results,
            summary,
            top: ranked,
            total_fleet: fleet,
        })
    }

    /// Classify a user-entered volume and ask the source's predictor for a second opinion.
    ///
    /// A failing predictor does not fail the call; it is reported as
    /// [`RemoteOutcome::Unavailable`].
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Port`] if the source is unknown and
    /// [`ServiceError::Core`] if the input does not validate.
    #[tracing::instrument(skip(self, source), fields(source = %source))]
    pub async fn predict(
        &self,
        source: &SourceId,
        district_name: &str,
        volume_kg: f64,
        period: Period,
    ) -> Result<PredictionReport, ServiceError> {
        let plugin = self.registry.plugin(source)?;
        let local = self.classifier.classify(district_name, volume_kg, period)?;

        let remote = match &plugin.predictor_port {
            None => RemoteOutcome::NotConfigured,
            Some(predictor) => {
                match predictor
                    .predict(local.measurement().volume_kg_per_day())
                    .await
                {
                    Ok(prediction) if prediction.level == local.level() => {
                        RemoteOutcome::Agrees(prediction)
                    }
                    Ok(prediction) => {
                        info!(
                            local = %local.level(),
                            remote = %prediction.level,
                            "Predictor disagrees with threshold table"
                        );
                        RemoteOutcome::Disagrees(prediction)
                    }
                    Err(err) => {
                        warn!(error = %err, "Predictor call failed");
                        RemoteOutcome::Unavailable(err.to_string())
                    }
                }
            }
        };

        Ok(PredictionReport { local, remote })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::model::{VolumeMeasurement, WasteLevel};
    use crate::plugin::{SourceMeta, SourcePlugin};
    use crate::ports::{MeasurementFeedPort, PredictorPort};

    struct FixedFeed(Vec<(&'static str, f64)>);

    #[async_trait]
    impl MeasurementFeedPort for FixedFeed {
        async fn measurements(&self) -> Result<Vec<VolumeMeasurement>, PortError> {
            self.0
                .iter()
                .map(|(name, volume)| VolumeMeasurement::new(*name, *volume).map_err(PortError::from))
                .collect()
        }
    }

    struct FixedPredictor(Option<WasteLevel>);

    #[async_trait]
    impl PredictorPort for FixedPredictor {
        async fn predict(&self, volume_kg_per_day: f64) -> Result<RemotePrediction, PortError> {
            let level = self
                .0
                .ok_or_else(|| PortError::UnknownLevel("offline".to_owned()))?;
            Ok(RemotePrediction {
                level,
                predicted_daily_kg: volume_kg_per_day,
                predicted_weekly_kg: volume_kg_per_day * 7.0,
            })
        }
    }

    fn service(
        rows: Vec<(&'static str, f64)>,
        predictor: Option<FixedPredictor>,
    ) -> (BasuraService, SourceId) {
        let id = SourceId("test".to_owned());
        let plugin = SourcePlugin {
            meta: SourceMeta {
                id: id.clone(),
                name: "Test".to_owned(),
            },
            feed_port: Arc::new(FixedFeed(rows)),
            predictor_port: predictor.map(|port| Arc::new(port) as Arc<dyn PredictorPort>),
        };
        let registry = Arc::new(SourceRegistry::new(vec![plugin]));
        (BasuraService::new(registry, Classifier::default()), id)
    }

    #[tokio::test]
    async fn test_dashboard_snapshot() {
        let (service, id) = service(
            vec![("Bulua", 40.0), ("Carmen", 250.0), ("Lapasan", 100.0)],
            None,
        );

        let snapshot = service.dashboard(&id, 2).await.expect("dashboard");

        assert_eq!(snapshot.results.len(), 3);
        assert_eq!(snapshot.summary.total_records(), 3);
        assert_eq!(snapshot.summary.total_volume_kg(), 390.0);
        assert_eq!(snapshot.top.len(), 2);
        assert_eq!(snapshot.top[0].measurement().district_name(), "Carmen");
        assert_eq!(snapshot.top[1].measurement().district_name(), "Lapasan");
        // Low (1) + High (3) + Medium (2)
        assert_eq!(snapshot.total_fleet, 6);
    }

    #[tokio::test]
    async fn test_dashboard_empty_feed() {
        let (service, id) = service(Vec::new(), None);
        let err = service.dashboard(&id, 5).await.expect_err("empty feed");
        assert!(matches!(err, ServiceError::Core(WasteError::EmptyInput)));
    }

    #[tokio::test]
    async fn test_unknown_source() {
        let (service, _) = service(vec![("Bulua", 1.0)], None);
        let err = service
            .dashboard(&SourceId("missing".to_owned()), 5)
            .await
            .expect_err("unknown source");
        assert!(matches!(err, ServiceError::Port(PortError::UnsupportedSource)));
    }

    #[tokio::test]
    async fn test_predict_reconciliation() {
        let (agreeing, id) = service(Vec::new(), Some(FixedPredictor(Some(WasteLevel::Medium))));
        let report = agreeing
            .predict(&id, "Carmen", 100.0, Period::Daily)
            .await
            .expect("prediction");
        assert_eq!(report.local.level(), WasteLevel::Medium);
        assert!(matches!(report.remote, RemoteOutcome::Agrees(_)));

        let (disagreeing, id) = service(Vec::new(), Some(FixedPredictor(Some(WasteLevel::Low))));
        let report = disagreeing
            .predict(&id, "Carmen", 100.0, Period::Daily)
            .await
            .expect("prediction");
        assert_eq!(report.local.level(), WasteLevel::Medium);
        assert!(matches!(
            report.remote,
            RemoteOutcome::Disagrees(RemotePrediction {
                level: WasteLevel::Low,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_predict_without_or_with_failing_predictor() {
        let (plain, id) = service(Vec::new(), None);
        let report = plain
            .predict(&id, "Carmen", 700.0, Period::Weekly)
            .await
            .expect("prediction");
        assert_eq!(report.remote, RemoteOutcome::NotConfigured);
        assert_eq!(report.local.weekly_volume_kg(), 700.0);

        let (offline, id) = service(Vec::new(), Some(FixedPredictor(None)));
        let report = offline
            .predict(&id, "Carmen", 10.0, Period::Daily)
            .await
            .expect("prediction");
        assert!(matches!(report.remote, RemoteOutcome::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_predict_rejects_negative_volume() {
        let (plain, id) = service(Vec::new(), None);
        let err = plain
            .predict(&id, "Carmen", -3.0, Period::Daily)
            .await
            .expect_err("negative volume");
        assert!(matches!(err, ServiceError::Core(WasteError::InvalidVolume(_))));
    }
}
