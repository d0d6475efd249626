//! Rewrites track longitudes into one continuous east-positive convention.

use crate::types::observation::Observation;

/// Tracks whose maximum longitude stays below this magnitude cannot have crossed
/// the antimeridian, so a sign change means they crossed the prime meridian.
pub const PRIME_MERIDIAN_MAX_LON: f64 = 140.0;

/// Normalizes a synoptic track's longitudes (degrees, `[-180, 180]` or `[0, 360)`).
///
/// 1. A track that changes sign with `|max| < 140` crossed the prime meridian;
///    every non-negative longitude is moved up by 360 so the track stays
///    continuous east of 360.
/// 2. Any remaining negative longitude is moved up by 360.
///
/// The crossing test requires a strictly negative minimum. A track sitting
/// exactly on 0 with nothing west of it is therefore left alone, which keeps
/// the operation idempotent on already-normalized input.
pub fn normalize_longitudes(lons: &mut [f64]) {
    if lons.is_empty() {
        return;
    }
    let min = lons.iter().copied().fold(f64::INFINITY, f64::min);
    let max = lons.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min < 0.0 && min * max <= 0.0 && max.abs() < PRIME_MERIDIAN_MAX_LON {
        for lon in lons.iter_mut().filter(|lon| **lon >= 0.0) {
            *lon += 360.0;
        }
    }
    for lon in lons.iter_mut().filter(|lon| **lon < 0.0) {
        *lon += 360.0;
    }
}

/// [`normalize_longitudes`] applied to the longitudes of a track.
pub fn normalize_track(observations: &mut [Observation]) {
    let mut lons: Vec<f64> = observations.iter().map(|o| o.lon).collect();
    normalize_longitudes(&mut lons);
    for (observation, lon) in observations.iter_mut().zip(lons) {
        observation.lon = lon;
    }
}
