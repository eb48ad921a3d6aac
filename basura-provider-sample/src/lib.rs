//! Offline provider serving a fixed barangay dataset.
//!
//! Used when the live API is unreachable so the dashboard still has numbers
//! to show. It has no predictor.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use basura_core::{
    model::VolumeMeasurement,
    plugin::{SourceId, SourceMeta, SourcePlugin},
    ports::{MeasurementFeedPort, PortError},
};

/// Identifier under which this provider registers.
pub const SOURCE_ID: &str = "sample";

/// District name and daily kilograms.
const SAMPLE_ROWS: [(&str, f64); 3] = [
    ("Barangay 1", 850.0),
    ("Barangay 2", 600.0),
    ("Barangay 3", 350.0),
];

/// Measurement feed returning [`SAMPLE_ROWS`].
pub struct SampleFeedPort;

#[async_trait]
impl MeasurementFeedPort for SampleFeedPort {
    async fn measurements(&self) -> Result<Vec<VolumeMeasurement>, PortError> {
        debug!(rows = SAMPLE_ROWS.len(), "Serving sample dataset");
        SAMPLE_ROWS
            .iter()
            .map(|(name, volume)| VolumeMeasurement::new(*name, *volume).map_err(PortError::from))
            .collect()
    }
}

/// Build the plugin bundle for the sample provider.
#[must_use]
pub fn plugin() -> SourcePlugin {
    SourcePlugin {
        meta: source_meta(),
        feed_port: Arc::new(SampleFeedPort),
        predictor_port: None,
    }
}

fn source_meta() -> SourceMeta {
    SourceMeta {
        id: SourceId(String::from(SOURCE_ID)),
        name: String::from("Sample data (offline)"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use basura_core::{
        BasuraService, Classifier, Period, RemoteOutcome, SourceRegistry, WasteLevel,
    };

    use super::*;

    fn service() -> BasuraService {
        let registry = Arc::new(SourceRegistry::new(vec![plugin()]));
        BasuraService::new(registry, Classifier::default())
    }

    #[tokio::test]
    async fn test_sample_rows_are_valid() {
        let rows = SampleFeedPort.measurements().await.expect("static rows");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].district_name(), "Barangay 1");
    }

    #[tokio::test]
    async fn test_sample_dashboard() {
        let id = SourceId(SOURCE_ID.to_owned());
        let snapshot = service().dashboard(&id, 1).await.expect("dashboard");

        assert_eq!(snapshot.summary.total_records(), 3);
        assert_eq!(snapshot.summary.total_volume_kg(), 1800.0);
        assert_eq!(snapshot.summary.average_volume_kg(), 600.0);
        assert_eq!(snapshot.summary.min_volume_kg(), 350.0);
        assert_eq!(snapshot.summary.max_volume_kg(), 850.0);
        // 5950 and 4200 kg/week are Very High, 2450 kg/week is High
        assert_eq!(snapshot.summary.count(WasteLevel::VeryHigh), 2);
        assert_eq!(snapshot.summary.count(WasteLevel::High), 1);
        assert_eq!(snapshot.total_fleet, 11);
        assert_eq!(snapshot.top.len(), 1);
        assert_eq!(snapshot.top[0].measurement().district_name(), "Barangay 1");
    }

    #[tokio::test]
    async fn test_sample_has_no_predictor() {
        let id = SourceId(SOURCE_ID.to_owned());
        let report = service()
            .predict(&id, "Barangay 9", 20.0, Period::Daily)
            .await
            .expect("prediction");
        assert_eq!(report.local.level(), WasteLevel::Low);
        assert_eq!(report.remote, RemoteOutcome::NotConfigured);
    }
}
