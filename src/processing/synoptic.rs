//! Restricts a track to the four standard daily observation times.
//!
//! Points between 00, 06, 12 and 18 UTC are frequently interpolated or
//! incomplete in the archive, so they are dropped before anything is derived.

use crate::types::observation::Observation;
use chrono::{NaiveDateTime, Timelike};

/// Whether `time` falls on 00, 06, 12 or 18 UTC exactly.
pub fn is_synoptic(time: &NaiveDateTime) -> bool {
    time.hour() % 6 == 0 && time.minute() == 0
}

/// Indices of the synoptic times, in their original order.
pub fn synoptic_indices<'a>(times: impl IntoIterator<Item = &'a NaiveDateTime>) -> Vec<usize> {
    times
        .into_iter()
        .enumerate()
        .filter(|(_, t)| is_synoptic(t))
        .map(|(i, _)| i)
        .collect()
}

/// Drops every non-synoptic observation in place, keeping relative order.
/// Returns how many observations were removed.
pub fn retain_synoptic(observations: &mut Vec<Observation>) -> usize {
    let before = observations.len();
    observations.retain(|o| is_synoptic(&o.time));
    before - observations.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{storm_with_winds, ts};
    use crate::types::basin::Basin;
    use chrono::Duration;

    #[test]
    fn test_is_synoptic() {
        assert!(is_synoptic(&ts(2020, 1, 1, 0)));
        assert!(is_synoptic(&ts(2020, 1, 1, 18)));
        assert!(!is_synoptic(&ts(2020, 1, 1, 3)));
        assert!(!is_synoptic(&(ts(2020, 1, 1, 6) + Duration::minutes(30))));
    }

    #[test]
    fn test_indices_preserve_order() {
        let times = [
            ts(2020, 1, 1, 3),
            ts(2020, 1, 1, 6),
            ts(2020, 1, 1, 9),
            ts(2020, 1, 1, 12),
        ];
        assert_eq!(synoptic_indices(&times), vec![1, 3]);
    }

    #[test]
    fn test_retain_synoptic() {
        let mut storm = storm_with_winds("ANA", Basin::NorthAtlantic, &[30.0, 35.0, 40.0]);
        storm.observations[1].time = storm.observations[0].time + Duration::hours(3);
        let removed = retain_synoptic(&mut storm.observations);
        assert_eq!(removed, 1);
        let winds: Vec<f64> = storm.observations.iter().map(|o| o.wind).collect();
        assert_eq!(winds, vec![30.0, 40.0]);
    }
}
