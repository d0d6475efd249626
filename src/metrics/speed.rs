//! Forward speed of a storm centre, in knots.

use crate::types::observation::Observation;
use crate::utils::{earth_distance_km, earth_distances_km, KM_TO_NM};
use chrono::NaiveDateTime;

/// Speed in kt between two `(time, lat, lon)` fixes.
///
/// NaN when the second fix is not strictly later than the first.
pub fn forward_speed_kt(from: (NaiveDateTime, f64, f64), to: (NaiveDateTime, f64, f64)) -> f64 {
    let seconds = (to.0 - from.0).num_seconds();
    if seconds <= 0 {
        return f64::NAN;
    }
    let distance_nm = KM_TO_NM * earth_distance_km((from.1, from.2), (to.1, to.2));
    3600.0 * distance_nm / seconds as f64
}

/// Speeds between consecutive observations of a track. The first entry is NaN.
pub fn forward_speeds(observations: &[Observation]) -> Vec<f64> {
    if observations.is_empty() {
        return Vec::new();
    }
    let positions: Vec<(f64, f64)> = observations.iter().map(|o| (o.lat, o.lon)).collect();
    let distances = earth_distances_km(&positions[..positions.len() - 1], &positions[1..]);

    let mut speeds = Vec::with_capacity(observations.len());
    speeds.push(f64::NAN);
    for (pair, distance_km) in observations.windows(2).zip(distances) {
        let seconds = (pair[1].time - pair[0].time).num_seconds();
        speeds.push(if seconds <= 0 {
            f64::NAN
        } else {
            3600.0 * (KM_TO_NM * distance_km) / seconds as f64
        });
    }
    speeds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{storm_with_winds, ts};
    use crate::types::basin::Basin;

    #[test]
    fn test_one_degree_of_latitude_in_six_hours() {
        let speed = forward_speed_kt((ts(2020, 1, 1, 0), 0.0, 100.0), (ts(2020, 1, 1, 6), 1.0, 100.0));
        // 60 nm over 6 h, give or take the spherical approximation.
        assert!((speed - 10.0).abs() < 0.05, "speed was {}", speed);
    }

    #[test]
    fn test_non_increasing_time_is_missing() {
        let t = ts(2020, 1, 1, 0);
        assert!(forward_speed_kt((t, 0.0, 0.0), (t, 1.0, 1.0)).is_nan());
        assert!(forward_speed_kt((ts(2020, 1, 1, 6), 0.0, 0.0), (t, 1.0, 1.0)).is_nan());
    }

    #[test]
    fn test_track_speeds_match_pairwise() {
        let storm = storm_with_winds("ANA", Basin::NorthAtlantic, &[30.0, 40.0, 50.0]);
        let speeds = forward_speeds(&storm.observations);
        assert_eq!(speeds.len(), 3);
        assert!(speeds[0].is_nan());
        for i in 1..3 {
            let (a, b) = (&storm.observations[i - 1], &storm.observations[i]);
            let expected = forward_speed_kt((a.time, a.lat, a.lon), (b.time, b.lat, b.lon));
            assert!((speeds[i] - expected).abs() < 1e-12);
        }
        assert!(forward_speeds(&[]).is_empty());
    }
}
