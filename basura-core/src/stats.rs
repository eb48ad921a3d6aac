//! Summary statistics and rankings over classified districts.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::WasteError;
use crate::model::{ClassificationResult, WasteLevel};

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Descriptive statistics over daily volumes of a set of results.
///
/// Only [`summarize`] builds a summary.
pub struct StatisticsSummary {
    total_records: usize,
    total_volume_kg: f64,
    average_volume_kg: f64,
    min_volume_kg: f64,
    max_volume_kg: f64,
    counts_by_level: BTreeMap<WasteLevel, usize>,
}

impl StatisticsSummary {
    /// Number of records summarized.
    #[must_use]
    pub fn total_records(&self) -> usize {
        self.total_records
    }

    /// Sum of daily volumes.
    #[must_use]
    pub fn total_volume_kg(&self) -> f64 {
        self.total_volume_kg
    }

    /// Mean daily volume.
    #[must_use]
    pub fn average_volume_kg(&self) -> f64 {
        self.average_volume_kg
    }

    /// Smallest daily volume.
    #[must_use]
    pub fn min_volume_kg(&self) -> f64 {
        self.min_volume_kg
    }

    /// Largest daily volume.
    #[must_use]
    pub fn max_volume_kg(&self) -> f64 {
        self.max_volume_kg
    }

    /// Records per level; every level is present, possibly with zero.
    #[must_use]
    pub fn counts_by_level(&self) -> &BTreeMap<WasteLevel, usize> {
        &self.counts_by_level
    }

    /// Number of records assigned to `level`.
    #[must_use]
    pub fn count(&self, level: WasteLevel) -> usize {
        self.counts_by_level.get(&level).copied().unwrap_or(0)
    }

    /// Percentage of records assigned to `level`.
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "record counts stay far below 2^52")]
    pub fn share(&self, level: WasteLevel) -> f64 {
        if self.total_records == 0 {
            0.0
        } else {
            (self.count(level) as f64 / self.total_records as f64) * 100.0
        }
    }
}

/// Compute totals, extremes, and the per-level tally of `results`.
///
/// # Errors
///
/// Returns [`WasteError::EmptyInput`] when `results` is empty and
/// [`WasteError::VolumeOverflow`] when the summed volume exceeds `f64::MAX`.
#[expect(clippy::cast_precision_loss, reason = "record counts stay far below 2^52")]
pub fn summarize(results: &[ClassificationResult]) -> Result<StatisticsSummary, WasteError> {
    let Some(first) = results.first() else {
        return Err(WasteError::EmptyInput);
    };

    let mut counts_by_level: BTreeMap<WasteLevel, usize> =
        WasteLevel::ALL.into_iter().map(|level| (level, 0)).collect();

    let seed = first.measurement().volume_kg_per_day();
    let mut total_volume_kg = 0.0;
    let mut min_volume_kg = seed;
    let mut max_volume_kg = seed;

    for result in results {
        let volume = result.measurement().volume_kg_per_day();
        total_volume_kg += volume;
        min_volume_kg = min_volume_kg.min(volume);
        max_volume_kg = max_volume_kg.max(volume);
        *counts_by_level.entry(result.level()).or_insert(0) += 1;
    }

    if !total_volume_kg.is_finite() {
        return Err(WasteError::VolumeOverflow);
    }

    let total_records = results.len();

    Ok(StatisticsSummary {
        total_records,
        total_volume_kg,
        average_volume_kg: total_volume_kg / total_records as f64,
        min_volume_kg,
        max_volume_kg,
        counts_by_level,
    })
}

/// The `count` results with the largest daily volume, highest first.
///
/// Equal volumes keep their input order. The input slice is left untouched.
#[must_use]
pub fn top_n(results: &[ClassificationResult], count: usize) -> Vec<ClassificationResult> {
    if count == 0 {
        return Vec::new();
    }

    let mut ranked = results.to_vec();
    // sort_by is stable
    ranked.sort_by(|left, right| {
        right
            .measurement()
            .volume_kg_per_day()
            .total_cmp(&left.measurement().volume_kg_per_day())
    });
    ranked.truncate(count);
    ranked
}

/// Sum of recommended vehicles across `results`.
#[must_use]
pub fn total_fleet(results: &[ClassificationResult]) -> u32 {
    results
        .iter()
        .map(|result| result.recommended_fleet_size())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classifier;
    use crate::model::Period;

    fn daily(name: &str, volume: f64) -> ClassificationResult {
        Classifier::default()
            .classify(name, volume, Period::Daily)
            .expect("valid volume")
    }

    fn names(results: &[ClassificationResult]) -> Vec<&str> {
        results
            .iter()
            .map(|result| result.measurement().district_name())
            .collect()
    }

    #[test]
    fn test_summarize_empty_fails() {
        assert_eq!(summarize(&[]), Err(WasteError::EmptyInput));
    }

    #[test]
    fn test_summarize_rejects_overflowing_total() {
        let huge = f64::MAX / 8.0;
        let results: Vec<_> = (0..9).map(|idx| daily(&format!("D{idx}"), huge)).collect();
        assert_eq!(summarize(&results), Err(WasteError::VolumeOverflow));

        let summary = summarize(&results[..2]).expect("fits");
        assert!(summary.total_volume_kg().is_finite());
        assert!(summary.average_volume_kg().is_finite());
    }

    #[test]
    fn test_summarize_single_record() {
        let summary = summarize(&[daily("Barangay 1", 100.0)]).expect("non-empty");

        assert_eq!(summary.total_records(), 1);
        assert_eq!(summary.total_volume_kg(), 100.0);
        assert_eq!(summary.average_volume_kg(), 100.0);
        assert_eq!(summary.min_volume_kg(), 100.0);
        assert_eq!(summary.max_volume_kg(), 100.0);
        // 100 kg/day is 700 kg/week, inside the Medium band
        assert_eq!(summary.count(WasteLevel::Low), 0);
        assert_eq!(summary.count(WasteLevel::Medium), 1);
        assert_eq!(summary.count(WasteLevel::High), 0);
        assert_eq!(summary.count(WasteLevel::VeryHigh), 0);
        assert_eq!(summary.counts_by_level().len(), WasteLevel::ALL.len());
    }

    #[test]
    fn test_summarize_mixed_records() {
        let results = vec![
            daily("Barangay 1", 850.0),
            daily("Barangay 2", 600.0),
            daily("Barangay 3", 350.0),
            daily("Barangay 4", 50.0),
        ];
        let summary = summarize(&results).expect("non-empty");

        assert_eq!(summary.total_records(), 4);
        assert_eq!(summary.total_volume_kg(), 1850.0);
        assert_eq!(summary.average_volume_kg(), 462.5);
        assert_eq!(summary.min_volume_kg(), 50.0);
        assert_eq!(summary.max_volume_kg(), 850.0);
        assert_eq!(summary.count(WasteLevel::VeryHigh), 2);
        assert_eq!(summary.count(WasteLevel::High), 1);
        assert_eq!(summary.count(WasteLevel::Medium), 0);
        assert_eq!(summary.count(WasteLevel::Low), 1);
        assert_eq!(summary.counts_by_level().values().sum::<usize>(), 4);
        assert_eq!(summary.share(WasteLevel::VeryHigh), 50.0);
        assert_eq!(summary.share(WasteLevel::Medium), 0.0);
    }

    #[test]
    fn test_summarize_ignores_order() {
        let forward = vec![daily("A", 10.0), daily("B", 300.0), daily("C", 80.0)];
        let mut backward = forward.clone();
        backward.reverse();

        let left = summarize(&forward).expect("non-empty");
        let right = summarize(&backward).expect("non-empty");
        assert_eq!(left.total_records(), right.total_records());
        assert_eq!(left.min_volume_kg(), right.min_volume_kg());
        assert_eq!(left.max_volume_kg(), right.max_volume_kg());
        assert_eq!(left.counts_by_level(), right.counts_by_level());
        assert!((left.total_volume_kg() - right.total_volume_kg()).abs() < 1e-9);
    }

    #[test]
    fn test_top_n_sorts_descending_and_keeps_ties_stable() {
        let results = vec![
            daily("Bulua", 200.0),
            daily("Carmen", 900.0),
            daily("Lapasan", 200.0),
            daily("Nazareth", 450.0),
        ];
        let ranked = top_n(&results, 3);
        assert_eq!(names(&ranked), vec!["Carmen", "Nazareth", "Bulua"]);
    }

    #[test]
    fn test_top_n_longer_than_input() {
        let results = vec![daily("A", 1.0), daily("B", 3.0), daily("C", 2.0)];
        let snapshot = results.clone();

        let ranked = top_n(&results, 10);

        assert_eq!(names(&ranked), vec!["B", "C", "A"]);
        assert_eq!(results, snapshot);
    }

    #[test]
    fn test_top_n_zero_and_empty() {
        let results = vec![daily("A", 1.0)];
        assert!(top_n(&results, 0).is_empty());
        assert!(top_n(&[], 5).is_empty());
    }

    #[test]
    fn test_total_fleet() {
        let results = vec![daily("A", 10.0), daily("B", 100.0), daily("C", 300.0)];
        // Low (1) + Medium (2) + High (3)
        assert_eq!(total_fleet(&results), 6);
    }
}
