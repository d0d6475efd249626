//! Accumulated Cyclone Energy.

use crate::processing::synoptic::is_synoptic;
use crate::types::basin::Classification;
use crate::types::observation::Observation;
use bon::Builder;
use serde::{Deserialize, Serialize};

/// Only observations at or above this wind (kt) contribute.
pub const ACE_WIND_THRESHOLD_KT: f64 = 34.0;

/// Agencies whose reported wind is a 10-minute average.
pub const TEN_MINUTE_AGENCIES: [&str; 5] = ["bom", "nadi", "reunion", "tokyo", "wellington"];

/// Ratio of 10-minute to 1-minute sustained wind.
pub const TEN_TO_ONE_MINUTE_FACTOR: f64 = 0.88;

/// How reported winds are treated before squaring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WindAveraging {
    /// Use the wind exactly as the agency reported it.
    #[default]
    AsReported,
    /// Divide 10-minute agency winds by 0.88 to estimate the 1-minute wind.
    /// 3-minute winds (`newdelhi`) are not converted.
    OneMinuteEquivalent,
}

/// Options for [`accumulated_cyclone_energy`].
///
/// # Examples
///
/// ```
/// use ibtracs::{AceOptions, WindAveraging};
///
/// let options = AceOptions::builder()
///     .subtropical(false)
///     .wind_averaging(WindAveraging::OneMinuteEquivalent)
///     .build();
/// assert!(!options.subtropical);
/// assert!(AceOptions::default().subtropical);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder, Serialize, Deserialize)]
pub struct AceOptions {
    /// Count subtropical observations.
    #[builder(default = true)]
    pub subtropical: bool,
    #[builder(default)]
    pub wind_averaging: WindAveraging,
}

impl Default for AceOptions {
    fn default() -> Self {
        AceOptions::builder().build()
    }
}

impl AceOptions {
    fn counts(&self, classification: Classification) -> bool {
        match classification {
            Classification::Extratropical | Classification::Disturbance => false,
            Classification::Subtropical => self.subtropical,
            _ => true,
        }
    }

    fn effective_wind(&self, observation: &Observation) -> f64 {
        match self.wind_averaging {
            WindAveraging::OneMinuteEquivalent
                if TEN_MINUTE_AGENCIES.contains(&observation.agency.as_str()) =>
            {
                observation.wind / TEN_TO_ONE_MINUTE_FACTOR
            }
            _ => observation.wind,
        }
    }
}

/// Sum of squared winds (kt²) over counted synoptic observations, times 1e-4.
///
/// Missing winds never count. An empty track yields zero.
pub fn accumulated_cyclone_energy(observations: &[Observation], options: &AceOptions) -> f64 {
    let sum: f64 = observations
        .iter()
        .filter(|o| is_synoptic(&o.time) && options.counts(o.classification))
        .map(|o| options.effective_wind(o))
        .filter(|&wind| wind >= ACE_WIND_THRESHOLD_KT)
        .map(|wind| wind * wind)
        .sum();
    1e-4 * sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::storm_with_winds;
    use crate::types::basin::Basin;
    use chrono::Duration;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-12, "{} != {}", a, b);
    }

    #[test]
    fn test_threshold_and_missing() {
        let storm = storm_with_winds("ANA", Basin::NorthAtlantic, &[30.0, 40.0, 50.0, f64::NAN]);
        assert_close(
            accumulated_cyclone_energy(&storm.observations, &AceOptions::default()),
            0.41,
        );
    }

    #[test]
    fn test_empty_track_is_zero() {
        assert_eq!(accumulated_cyclone_energy(&[], &AceOptions::default()), 0.0);
    }

    #[test]
    fn test_classification_exclusions() {
        let mut storm = storm_with_winds("ANA", Basin::NorthAtlantic, &[40.0, 50.0, 60.0]);
        storm.observations[0].classification = Classification::Subtropical;
        storm.observations[2].classification = Classification::Extratropical;

        let with_subtropical = AceOptions::default();
        assert_close(
            accumulated_cyclone_energy(&storm.observations, &with_subtropical),
            1e-4 * (1600.0 + 2500.0),
        );

        let without = AceOptions::builder().subtropical(false).build();
        assert_close(accumulated_cyclone_energy(&storm.observations, &without), 0.25);
    }

    #[test]
    fn test_off_synoptic_points_do_not_count() {
        let mut storm = storm_with_winds("ANA", Basin::NorthAtlantic, &[40.0, 50.0]);
        storm.observations[1].time += Duration::hours(1);
        assert_close(
            accumulated_cyclone_energy(&storm.observations, &AceOptions::default()),
            0.16,
        );
    }

    #[test]
    fn test_one_minute_equivalent_rescales_ten_minute_agencies() {
        let mut storm = storm_with_winds("ANA", Basin::WesternPacific, &[31.0, 44.0]);
        for observation in storm.observations.iter_mut() {
            observation.agency = "tokyo".to_string();
        }
        let as_reported = AceOptions::default();
        assert_close(accumulated_cyclone_energy(&storm.observations, &as_reported), 0.1936);

        let rescaled = AceOptions::builder()
            .wind_averaging(WindAveraging::OneMinuteEquivalent)
            .build();
        // 31 / 0.88 crosses the threshold once rescaled.
        let expected = 1e-4 * ((31.0f64 / 0.88).powi(2) + (44.0f64 / 0.88).powi(2));
        assert!((accumulated_cyclone_energy(&storm.observations, &rescaled) - expected).abs() < 1e-9);

        // US agencies are never rescaled.
        storm.observations[1].agency = "hurdat_epa".to_string();
        let expected = 1e-4 * ((31.0f64 / 0.88).powi(2) + 44.0 * 44.0);
        assert!((accumulated_cyclone_energy(&storm.observations, &rescaled) - expected).abs() < 1e-9);
    }
}
