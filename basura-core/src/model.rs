//! Domain data structures for districts, measurements, levels, and derived results.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::classifier::{fleet_size_for, frequency_allowed, level_for_weekly};
use crate::error::WasteError;

/// Days used to normalize a daily figure to a weekly one.
pub const DAYS_PER_WEEK: f64 = 7.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMeasurement")]
/// Waste volume reported for a single district.
///
/// Fields are private so every instance has passed validation: the district
/// name is non-empty, the volume is finite and non-negative, and seven days of
/// it still fit in an `f64`.
pub struct VolumeMeasurement {
    district_name: String,
    volume_kg_per_day: f64,
}

impl VolumeMeasurement {
    /// Build a measurement from a daily volume.
    ///
    /// # Errors
    ///
    /// Returns [`WasteError::EmptyDistrictName`] for a blank name and
    /// [`WasteError::InvalidVolume`] for a negative or non-finite volume, or one
    /// whose weekly total overflows.
    pub fn new<S: Into<String>>(district_name: S, volume_kg_per_day: f64) -> Result<Self, WasteError> {
        let district_name = district_name.into().trim().to_owned();
        if district_name.is_empty() {
            return Err(WasteError::EmptyDistrictName);
        }
        validate_volume(volume_kg_per_day)?;
        if !(volume_kg_per_day * DAYS_PER_WEEK).is_finite() {
            return Err(WasteError::InvalidVolume(volume_kg_per_day));
        }
        Ok(Self {
            district_name,
            volume_kg_per_day,
        })
    }

    /// Build a measurement from a weekly volume, storing its daily average.
    ///
    /// # Errors
    ///
    /// Same conditions as [`VolumeMeasurement::new`], checked on the weekly figure.
    pub fn from_weekly<S: Into<String>>(district_name: S, volume_kg_per_week: f64) -> Result<Self, WasteError> {
        validate_volume(volume_kg_per_week)?;
        Self::new(district_name, volume_kg_per_week / DAYS_PER_WEEK).map_err(|err| match err {
            WasteError::InvalidVolume(_) => WasteError::InvalidVolume(volume_kg_per_week),
            other => other,
        })
    }

    /// District the volume was measured in.
    #[must_use]
    pub fn district_name(&self) -> &str {
        &self.district_name
    }

    /// Daily volume in kilograms.
    #[must_use]
    pub fn volume_kg_per_day(&self) -> f64 {
        self.volume_kg_per_day
    }
}

#[derive(Deserialize)]
struct RawMeasurement {
    district_name: String,
    volume_kg_per_day: f64,
}

impl TryFrom<RawMeasurement> for VolumeMeasurement {
    type Error = WasteError;

    fn try_from(raw: RawMeasurement) -> Result<Self, Self::Error> {
        Self::new(raw.district_name, raw.volume_kg_per_day)
    }
}

pub(crate) fn validate_volume(volume_kg: f64) -> Result<(), WasteError> {
    if volume_kg.is_finite() && volume_kg >= 0.0 {
        Ok(())
    } else {
        Err(WasteError::InvalidVolume(volume_kg))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Unit an input volume was measured in.
pub enum Period {
    /// Kilograms per day.
    Daily,
    /// Kilograms per week.
    Weekly,
}

impl fmt::Display for Period {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slug = match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
        };
        write!(formatter, "{slug}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// Severity tier assigned to a weekly volume.
///
/// Variants are declared in threshold order, so the derived ordering is the
/// tier ordering.
pub enum WasteLevel {
    /// Below 500 kg per week.
    Low,
    /// 500 kg up to 1500 kg per week.
    Medium,
    /// 1500 kg up to 3000 kg per week.
    High,
    /// 3000 kg per week or more.
    VeryHigh,
}

impl WasteLevel {
    /// Every tier, lowest first.
    pub const ALL: [WasteLevel; 4] = [
        WasteLevel::Low,
        WasteLevel::Medium,
        WasteLevel::High,
        WasteLevel::VeryHigh,
    ];

    /// Short display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            WasteLevel::Low => "Low",
            WasteLevel::Medium => "Medium",
            WasteLevel::High => "High",
            WasteLevel::VeryHigh => "Very High",
        }
    }
}

impl fmt::Display for WasteLevel {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.label())
    }
}

impl FromStr for WasteLevel {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let tag = raw.trim().to_lowercase();
        match tag.as_str() {
            "low" => Ok(WasteLevel::Low),
            "medium" => Ok(WasteLevel::Medium),
            "high" => Ok(WasteLevel::High),
            "very high" | "very_high" | "veryhigh" | "very-high" => Ok(WasteLevel::VeryHigh),
            _ => Err(raw.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Recommended pickup cadence.
pub enum CollectionFrequency {
    /// One pickup per week.
    OnceWeekly,
    /// Two pickups per week.
    TwiceWeekly,
    /// Two or three pickups per week.
    TwoToThreeWeekly,
    /// A pickup every day.
    Daily,
    /// Daily pickups plus a segregation program.
    DailyWithSegregation,
}

impl fmt::Display for CollectionFrequency {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            CollectionFrequency::OnceWeekly => "once per week",
            CollectionFrequency::TwiceWeekly => "twice per week",
            CollectionFrequency::TwoToThreeWeekly => "2-3 times per week",
            CollectionFrequency::Daily => "daily",
            CollectionFrequency::DailyWithSegregation => "daily + segregation program",
        };
        write!(formatter, "{text}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawClassification")]
/// Outcome of classifying one measurement.
///
/// Only the classifier builds results, and a deserialized result must agree
/// with the threshold table, so the level, cadence, and fleet size always
/// follow from the weekly volume.
pub struct ClassificationResult {
    measurement: VolumeMeasurement,
    weekly_volume_kg: f64,
    level: WasteLevel,
    recommended_frequency: CollectionFrequency,
    recommended_fleet_size: u32,
}

#[derive(Deserialize)]
struct RawClassification {
    measurement: VolumeMeasurement,
    weekly_volume_kg: f64,
    level: WasteLevel,
    recommended_frequency: CollectionFrequency,
    recommended_fleet_size: u32,
}

impl TryFrom<RawClassification> for ClassificationResult {
    type Error = WasteError;

    fn try_from(raw: RawClassification) -> Result<Self, Self::Error> {
        validate_volume(raw.weekly_volume_kg)?;

        let projected = raw.measurement.volume_kg_per_day() * DAYS_PER_WEEK;
        if (projected - raw.weekly_volume_kg).abs() > 1e-9 * raw.weekly_volume_kg.max(1.0) {
            return Err(WasteError::InconsistentResult(format!(
                "weekly volume {} kg does not match {} kg/day",
                raw.weekly_volume_kg,
                raw.measurement.volume_kg_per_day()
            )));
        }

        let level = level_for_weekly(raw.weekly_volume_kg);
        if raw.level != level {
            return Err(WasteError::InconsistentResult(format!(
                "level {} does not match {} kg/week ({level})",
                raw.level, raw.weekly_volume_kg
            )));
        }
        if raw.recommended_fleet_size != fleet_size_for(level) {
            return Err(WasteError::InconsistentResult(format!(
                "fleet size {} does not match level {level}",
                raw.recommended_fleet_size
            )));
        }
        if !frequency_allowed(level, raw.recommended_frequency) {
            return Err(WasteError::InconsistentResult(format!(
                "pickups {} do not match level {level}",
                raw.recommended_frequency
            )));
        }

        Ok(Self::new(
            raw.measurement,
            raw.weekly_volume_kg,
            level,
            raw.recommended_frequency,
        ))
    }
}

impl ClassificationResult {
    pub(crate) fn new(
        measurement: VolumeMeasurement,
        weekly_volume_kg: f64,
        level: WasteLevel,
        recommended_frequency: CollectionFrequency,
    ) -> Self {
        Self {
            measurement,
            weekly_volume_kg,
            level,
            recommended_frequency,
            recommended_fleet_size: fleet_size_for(level),
        }
    }

    /// Measurement the result was derived from.
    #[must_use]
    pub fn measurement(&self) -> &VolumeMeasurement {
        &self.measurement
    }

    /// Volume normalized to seven days; the figure the thresholds apply to.
    #[must_use]
    pub fn weekly_volume_kg(&self) -> f64 {
        self.weekly_volume_kg
    }

    /// Assigned tier.
    #[must_use]
    pub fn level(&self) -> WasteLevel {
        self.level
    }

    /// Suggested pickup cadence.
    #[must_use]
    pub fn recommended_frequency(&self) -> CollectionFrequency {
        self.recommended_frequency
    }

    /// Suggested number of collection vehicles.
    #[must_use]
    pub fn recommended_fleet_size(&self) -> u32 {
        self.recommended_fleet_size
    }

    /// Advice sentence shown next to the result.
    #[must_use]
    pub fn recommendation(&self) -> String {
        let trucks = match self.recommended_fleet_size {
            1 => "One collection truck is sufficient".to_owned(),
            count => format!("{count} collection trucks are recommended"),
        };
        let extra = match self.level {
            WasteLevel::Low | WasteLevel::Medium | WasteLevel::VeryHigh => "",
            WasteLevel::High => " to prevent overflow",
        };
        format!(
            "{trucks} for {}. Schedule pickups {}{extra}.",
            self.measurement.district_name(),
            self.recommended_frequency
        )
    }
}
