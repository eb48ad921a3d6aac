//! Threshold table mapping weekly volumes to levels and collection advice.

use serde::{Deserialize, Serialize};

use crate::error::WasteError;
use crate::model::{
    ClassificationResult, CollectionFrequency, DAYS_PER_WEEK, Period, VolumeMeasurement,
    WasteLevel,
};

/// Weekly kilograms at which a district becomes [`WasteLevel::Medium`].
pub const MEDIUM_THRESHOLD_KG: f64 = 500.0;
/// Weekly kilograms at which a district becomes [`WasteLevel::High`].
pub const HIGH_THRESHOLD_KG: f64 = 1500.0;
/// Weekly kilograms at which a district becomes [`WasteLevel::VeryHigh`].
pub const VERY_HIGH_THRESHOLD_KG: f64 = 3000.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Pickup cadence recommended for [`WasteLevel::Low`] districts.
pub enum LowFrequency {
    /// Once per week.
    Once,
    /// Twice per week.
    #[default]
    Twice,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Tunable parts of the collection policy.
pub struct ClassificationPolicy {
    /// Cadence for low-volume districts.
    pub low_frequency: LowFrequency,
}

/// Assigns levels, cadences, and fleet sizes according to a policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier {
    policy: ClassificationPolicy,
}

impl Classifier {
    /// Create a classifier bound to the given policy.
    #[must_use]
    pub fn new(policy: ClassificationPolicy) -> Self {
        Self { policy }
    }

    /// Policy this classifier applies.
    #[must_use]
    pub fn policy(&self) -> ClassificationPolicy {
        self.policy
    }

    /// Validate and classify a raw volume for a district.
    ///
    /// Daily volumes are multiplied by seven; weekly volumes are compared as-is.
    ///
    /// # Errors
    ///
    /// Returns [`WasteError::InvalidVolume`] for negative or non-finite volumes,
    /// or daily volumes whose weekly total overflows, and
    /// [`WasteError::EmptyDistrictName`] for a blank district.
    pub fn classify(
        &self,
        district_name: &str,
        volume_kg: f64,
        period: Period,
    ) -> Result<ClassificationResult, WasteError> {
        match period {
            Period::Daily => {
                let measurement = VolumeMeasurement::new(district_name, volume_kg)?;
                Ok(self.classify_measurement(measurement))
            }
            Period::Weekly => {
                let measurement = VolumeMeasurement::from_weekly(district_name, volume_kg)?;
                // keep the caller's weekly figure exact instead of re-multiplying the average
                Ok(self.build(measurement, volume_kg))
            }
        }
    }

    /// Classify an already validated daily measurement.
    #[must_use]
    pub fn classify_measurement(&self, measurement: VolumeMeasurement) -> ClassificationResult {
        let weekly_volume_kg = measurement.volume_kg_per_day() * DAYS_PER_WEEK;
        self.build(measurement, weekly_volume_kg)
    }

    fn build(&self, measurement: VolumeMeasurement, weekly_volume_kg: f64) -> ClassificationResult {
        let level = level_for_weekly(weekly_volume_kg);
        ClassificationResult::new(
            measurement,
            weekly_volume_kg,
            level,
            self.frequency_for(level),
        )
    }

    /// Pickup cadence for a level under this policy.
    #[must_use]
    pub fn frequency_for(&self, level: WasteLevel) -> CollectionFrequency {
        match level {
            WasteLevel::Low => match self.policy.low_frequency {
                LowFrequency::Once => CollectionFrequency::OnceWeekly,
                LowFrequency::Twice => CollectionFrequency::TwiceWeekly,
            },
            WasteLevel::Medium => CollectionFrequency::TwoToThreeWeekly,
            WasteLevel::High => CollectionFrequency::Daily,
            WasteLevel::VeryHigh => CollectionFrequency::DailyWithSegregation,
        }
    }
}

/// Whether some policy would recommend `frequency` for `level`.
pub(crate) fn frequency_allowed(level: WasteLevel, frequency: CollectionFrequency) -> bool {
    [LowFrequency::Once, LowFrequency::Twice]
        .into_iter()
        .any(|low_frequency| {
            Classifier::new(ClassificationPolicy { low_frequency }).frequency_for(level) == frequency
        })
}

/// Map a weekly volume onto the threshold table. Lower bounds are inclusive.
///
/// | Weekly kg    | Level     |
/// |--------------|-----------|
/// | >= 3000      | Very High |
/// | >= 1500      | High      |
/// | >= 500       | Medium    |
/// | < 500        | Low       |
#[must_use]
pub fn level_for_weekly(weekly_volume_kg: f64) -> WasteLevel {
    match weekly_volume_kg {
        kg if kg >= VERY_HIGH_THRESHOLD_KG => WasteLevel::VeryHigh,
        kg if kg >= HIGH_THRESHOLD_KG => WasteLevel::High,
        kg if kg >= MEDIUM_THRESHOLD_KG => WasteLevel::Medium,
        _ => WasteLevel::Low,
    }
}

/// Number of collection vehicles recommended for a level.
#[must_use]
pub fn fleet_size_for(level: WasteLevel) -> u32 {
    match level {
        WasteLevel::Low => 1,
        WasteLevel::Medium => 2,
        WasteLevel::High => 3,
        WasteLevel::VeryHigh => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weekly(volume: f64) -> ClassificationResult {
        Classifier::default()
            .classify("Kauswagan", volume, Period::Weekly)
            .expect("valid volume")
    }

    #[test]
    fn test_level_boundaries() {
        assert_eq!(weekly(0.0).level(), WasteLevel::Low);
        assert_eq!(weekly(499.999).level(), WasteLevel::Low);
        assert_eq!(weekly(500.0).level(), WasteLevel::Medium);
        assert_eq!(weekly(1499.99).level(), WasteLevel::Medium);
        assert_eq!(weekly(1500.0).level(), WasteLevel::High);
        assert_eq!(weekly(2999.99).level(), WasteLevel::High);
        assert_eq!(weekly(3000.0).level(), WasteLevel::VeryHigh);
        assert_eq!(weekly(1.0e9).level(), WasteLevel::VeryHigh);
    }

    #[test]
    fn test_daily_volume_is_multiplied_by_seven() {
        let result = Classifier::default()
            .classify("Carmen", 100.0, Period::Daily)
            .expect("valid volume");
        assert_eq!(result.weekly_volume_kg(), 700.0);
        assert_eq!(result.level(), WasteLevel::Medium);
        assert_eq!(result.recommended_fleet_size(), 2);
    }

    #[test]
    fn test_weekly_volume_is_kept_as_is() {
        let result = weekly(1234.5);
        assert_eq!(result.weekly_volume_kg(), 1234.5);
    }

    #[test]
    fn test_fleet_and_frequency_per_level() {
        let classifier = Classifier::default();
        assert_eq!(fleet_size_for(WasteLevel::Low), 1);
        assert_eq!(fleet_size_for(WasteLevel::Medium), 2);
        assert_eq!(fleet_size_for(WasteLevel::High), 3);
        assert_eq!(fleet_size_for(WasteLevel::VeryHigh), 4);
        assert_eq!(
            classifier.frequency_for(WasteLevel::Medium),
            CollectionFrequency::TwoToThreeWeekly
        );
        assert_eq!(
            classifier.frequency_for(WasteLevel::High),
            CollectionFrequency::Daily
        );
        assert_eq!(
            classifier.frequency_for(WasteLevel::VeryHigh),
            CollectionFrequency::DailyWithSegregation
        );
    }

    #[test]
    fn test_low_frequency_follows_policy() {
        let once = Classifier::new(ClassificationPolicy {
            low_frequency: LowFrequency::Once,
        });
        let twice = Classifier::default();

        assert_eq!(
            once.frequency_for(WasteLevel::Low),
            CollectionFrequency::OnceWeekly
        );
        assert_eq!(
            twice.frequency_for(WasteLevel::Low),
            CollectionFrequency::TwiceWeekly
        );
    }

    #[test]
    fn test_invalid_input_is_rejected() {
        let classifier = Classifier::default();
        assert_eq!(
            classifier.classify("Carmen", -0.5, Period::Daily),
            Err(WasteError::InvalidVolume(-0.5))
        );
        assert!(matches!(
            classifier.classify("Carmen", f64::NAN, Period::Weekly),
            Err(WasteError::InvalidVolume(_))
        ));
        assert_eq!(
            classifier.classify("", 1.0, Period::Daily),
            Err(WasteError::EmptyDistrictName)
        );
    }

    #[test]
    fn test_weekly_overflow_is_rejected() {
        let classifier = Classifier::default();
        assert_eq!(
            classifier.classify("Carmen", f64::MAX, Period::Daily),
            Err(WasteError::InvalidVolume(f64::MAX))
        );
        let result = classifier
            .classify("Carmen", f64::MAX / 2.0, Period::Weekly)
            .expect("finite weekly volume");
        assert!(result.weekly_volume_kg().is_finite());
        assert_eq!(result.level(), WasteLevel::VeryHigh);
    }

    #[test]
    fn test_frequency_allowed_covers_both_low_policies() {
        assert!(frequency_allowed(WasteLevel::Low, CollectionFrequency::OnceWeekly));
        assert!(frequency_allowed(WasteLevel::Low, CollectionFrequency::TwiceWeekly));
        assert!(!frequency_allowed(WasteLevel::Low, CollectionFrequency::Daily));
        assert!(frequency_allowed(WasteLevel::High, CollectionFrequency::Daily));
        assert!(!frequency_allowed(WasteLevel::High, CollectionFrequency::TwiceWeekly));
    }

    #[test]
    fn test_classification_is_repeatable() {
        let classifier = Classifier::default();
        let first = classifier.classify("Bulua", 321.25, Period::Daily);
        let second = classifier.classify("Bulua", 321.25, Period::Daily);
        assert_eq!(first, second);
    }

    #[test]
    fn test_recommendation_text() {
        let result = weekly(3500.0);
        assert_eq!(
            result.recommendation(),
            "4 collection trucks are recommended for Kauswagan. \
             Schedule pickups daily + segregation program."
        );
        let low = weekly(10.0);
        assert_eq!(
            low.recommendation(),
            "One collection truck is sufficient for Kauswagan. Schedule pickups twice per week."
        );
    }
}
