//! Whether a track passes through a latitude/longitude box.

use crate::types::observation::Observation;
use serde::{Deserialize, Serialize};

/// A latitude/longitude box with inclusive bounds, longitudes in `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl BoundingBox {
    pub fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Self {
        BoundingBox {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        }
    }

    /// Inclusive on all four sides. Track longitudes past 360 (prime meridian
    /// crossers) are also tested one turn back.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        let lon_inside = |lon: f64| lon >= self.lon_min && lon <= self.lon_max;
        lat >= self.lat_min
            && lat <= self.lat_max
            && (lon_inside(lon) || (lon >= 360.0 && lon_inside(lon - 360.0)))
    }
}

/// Interpolates the track linearly to hourly positions and reports whether any
/// of them, including every observed position, lies inside `bbox`.
///
/// Each segment contributes its start point and `floor(hours) - 1` interior
/// points; the final observation is tested last.
pub fn intersects_box(observations: &[Observation], bbox: &BoundingBox) -> bool {
    for pair in observations.windows(2) {
        let (from, to) = (&pair[0], &pair[1]);
        if bbox.contains(from.lat, from.lon) {
            return true;
        }
        let steps = (to.time - from.time).num_seconds() / 3600;
        let dlat = (to.lat - from.lat) / steps as f64;
        let dlon = (to.lon - from.lon) / steps as f64;
        for h in 1..steps {
            let h = h as f64;
            if bbox.contains(from.lat + h * dlat, from.lon + h * dlon) {
                return true;
            }
        }
    }
    observations
        .last()
        .is_some_and(|last| bbox.contains(last.lat, last.lon))
}
