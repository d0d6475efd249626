//! One track point of a storm and its optional extended attributes.

use crate::types::basin::{Basin, Classification, Subbasin};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Wind speed threshold of a wind-radii measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WindThreshold {
    Kt34,
    Kt50,
    Kt64,
}

impl WindThreshold {
    pub const ALL: [WindThreshold; 3] = [WindThreshold::Kt34, WindThreshold::Kt50, WindThreshold::Kt64];

    pub fn knots(&self) -> u32 {
        match self {
            WindThreshold::Kt34 => 34,
            WindThreshold::Kt50 => 50,
            WindThreshold::Kt64 => 64,
        }
    }
}

/// Geographic quadrant relative to the storm centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Quadrant {
    Ne,
    Se,
    Sw,
    Nw,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [Quadrant::Ne, Quadrant::Se, Quadrant::Sw, Quadrant::Nw];

    pub fn code(&self) -> &'static str {
        match self {
            Quadrant::Ne => "NE",
            Quadrant::Se => "SE",
            Quadrant::Sw => "SW",
            Quadrant::Nw => "NW",
        }
    }
}

/// Radial extent (nm) of one wind threshold in each quadrant. NaN when not reported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quadrants {
    pub ne: f64,
    pub se: f64,
    pub sw: f64,
    pub nw: f64,
}

impl Quadrants {
    pub const MISSING: Quadrants = Quadrants {
        ne: f64::NAN,
        se: f64::NAN,
        sw: f64::NAN,
        nw: f64::NAN,
    };

    pub fn get(&self, quadrant: Quadrant) -> f64 {
        match quadrant {
            Quadrant::Ne => self.ne,
            Quadrant::Se => self.se,
            Quadrant::Sw => self.sw,
            Quadrant::Nw => self.nw,
        }
    }

    pub fn set(&mut self, quadrant: Quadrant, value: f64) {
        match quadrant {
            Quadrant::Ne => self.ne = value,
            Quadrant::Se => self.se = value,
            Quadrant::Sw => self.sw = value,
            Quadrant::Nw => self.nw = value,
        }
    }
}

/// Wind radii for the 34, 50 and 64 kt thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindRadii {
    pub r34: Quadrants,
    pub r50: Quadrants,
    pub r64: Quadrants,
}

impl WindRadii {
    pub const MISSING: WindRadii = WindRadii {
        r34: Quadrants::MISSING,
        r50: Quadrants::MISSING,
        r64: Quadrants::MISSING,
    };

    pub fn threshold(&self, threshold: WindThreshold) -> &Quadrants {
        match threshold {
            WindThreshold::Kt34 => &self.r34,
            WindThreshold::Kt50 => &self.r50,
            WindThreshold::Kt64 => &self.r64,
        }
    }

    pub fn get(&self, threshold: WindThreshold, quadrant: Quadrant) -> f64 {
        self.threshold(threshold).get(quadrant)
    }

    pub fn set(&mut self, threshold: WindThreshold, quadrant: Quadrant, value: f64) {
        let quadrants = match threshold {
            WindThreshold::Kt34 => &mut self.r34,
            WindThreshold::Kt50 => &mut self.r50,
            WindThreshold::Kt64 => &mut self.r64,
        };
        quadrants.set(quadrant, value);
    }
}

/// Attributes only present in the extended field set, reported by USA agencies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtendedObservation {
    /// Distance to land in km.
    pub dist2land: f64,
    /// Radius of maximum wind in nm.
    pub rmw: f64,
    pub radii: WindRadii,
}

impl ExtendedObservation {
    pub const MISSING: ExtendedObservation = ExtendedObservation {
        dist2land: f64::NAN,
        rmw: f64::NAN,
        radii: WindRadii::MISSING,
    };
}

/// A single reported position of a storm.
///
/// Missing measurements are stored as `NaN` rather than `Option`, so that
/// the numeric fields line up one-to-one with the columns of the relational
/// and JSON representations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub time: NaiveDateTime,
    /// Latitude in degrees north.
    pub lat: f64,
    /// Longitude in degrees east.
    pub lon: f64,
    pub classification: Classification,
    /// Maximum sustained wind in kt.
    pub wind: f64,
    /// Central pressure in hPa.
    pub mslp: f64,
    /// Forward speed in kt.
    pub speed: f64,
    pub basin: Basin,
    pub subbasin: Subbasin,
    pub agency: String,
    pub extended: Option<ExtendedObservation>,
}

impl Observation {
    /// Field-by-field equality that treats two NaNs as equal and otherwise
    /// compares floats by bit pattern.
    pub fn is_identical_to(&self, other: &Observation) -> bool {
        let same = |a: f64, b: f64| (a.is_nan() && b.is_nan()) || a.to_bits() == b.to_bits();
        let same_extended = match (&self.extended, &other.extended) {
            (None, None) => true,
            (Some(a), Some(b)) => {
                same(a.dist2land, b.dist2land)
                    && same(a.rmw, b.rmw)
                    && WindThreshold::ALL.iter().all(|&t| {
                        Quadrant::ALL
                            .iter()
                            .all(|&q| same(a.radii.get(t, q), b.radii.get(t, q)))
                    })
            }
            _ => false,
        };
        self.time == other.time
            && same(self.lat, other.lat)
            && same(self.lon, other.lon)
            && self.classification == other.classification
            && same(self.wind, other.wind)
            && same(self.mslp, other.mslp)
            && same(self.speed, other.speed)
            && self.basin == other.basin
            && self.subbasin == other.subbasin
            && self.agency == other.agency
            && same_extended
    }
}
