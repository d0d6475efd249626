//! The per-storm aggregate: identity fields, genesis and the ordered track.

use crate::metrics::ace::{accumulated_cyclone_energy, AceOptions};
use crate::metrics::intersect::{intersects_box, BoundingBox};
use crate::metrics::speed::forward_speeds;
use crate::types::basin::{Basin, Subbasin};
use crate::types::observation::Observation;
use crate::types::schema::FieldSet;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Name the archive gives to storms that were never named.
pub const UNNAMED: &str = "NOT_NAMED";

/// First-position coordinates are rounded to this many decimal places before
/// taking part in storm identity.
pub const IDENTITY_DECIMALS: i32 = 4;

/// Formation time of a storm and the quantities derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genesis {
    pub time: NaiveDateTime,
    /// Basin recorded at the genesis observation.
    pub basin: Basin,
    /// Subbasin recorded at the genesis observation.
    pub subbasin: Subbasin,
    /// Calendar year for northern basins; the later year of the July-June
    /// season for southern basins.
    pub season: i32,
}

/// A violated structural invariant of a [`Storm`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("Observation times are not strictly increasing at index {0}")]
    NonMonotonicTime(usize),
    #[error("Genesis time {0} does not match any observation time")]
    GenesisNotObserved(NaiveDateTime),
    #[error("Storm has observations but no genesis")]
    MissingGenesis,
    #[error("Storm has no observations but carries a genesis")]
    UnexpectedGenesis,
    #[error("Observation {0} does not match the storm's field set")]
    FieldSetMismatch(usize),
}

/// A tropical cyclone track restricted to synoptic times.
///
/// A storm whose raw lines contained no synoptic observation has an empty
/// `observations` list and no [`Genesis`]; season and genesis basin are then
/// undefined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Storm {
    /// Unique ID assigned by the archive.
    pub id: String,
    /// ATCF ID, when one exists.
    pub atcf_id: Option<String>,
    /// Storm name, or [`UNNAMED`].
    pub name: String,
    pub field_set: FieldSet,
    pub genesis: Option<Genesis>,
    pub observations: Vec<Observation>,
}

/// Natural identity of a storm, with the first position quantized so that
/// floating-point noise cannot split or merge identities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StormIdentity {
    pub name: String,
    pub basin: Option<Basin>,
    pub season: Option<i32>,
    pub first_position: Option<(i64, i64)>,
}

fn quantize(value: f64) -> i64 {
    (value * 10f64.powi(IDENTITY_DECIMALS)).round() as i64
}

impl Storm {
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn genesis_time(&self) -> Option<NaiveDateTime> {
        self.genesis.map(|g| g.time)
    }

    pub fn season(&self) -> Option<i32> {
        self.genesis.map(|g| g.season)
    }

    /// Basin of genesis.
    pub fn basin(&self) -> Option<Basin> {
        self.genesis.map(|g| g.basin)
    }

    /// Subbasin of genesis.
    pub fn subbasin(&self) -> Option<Subbasin> {
        self.genesis.map(|g| g.subbasin)
    }

    pub fn is_named(&self) -> bool {
        self.name != UNNAMED
    }

    /// Highest reported wind, ignoring missing values.
    pub fn max_wind(&self) -> Option<f64> {
        self.observations
            .iter()
            .map(|o| o.wind)
            .filter(|w| !w.is_nan())
            .fold(None, |max, w| Some(max.map_or(w, |m: f64| m.max(w))))
    }

    /// The observation recorded exactly at `time`, if any.
    pub fn observation_at(&self, time: NaiveDateTime) -> Option<&Observation> {
        self.observations
            .binary_search_by_key(&time, |o| o.time)
            .ok()
            .map(|i| &self.observations[i])
    }

    pub fn identity(&self) -> StormIdentity {
        StormIdentity {
            name: self.name.clone(),
            basin: self.basin(),
            season: self.season(),
            first_position: self
                .observations
                .first()
                .map(|o| (quantize(o.lat), quantize(o.lon))),
        }
    }

    /// Accumulated Cyclone Energy over the storm's lifetime. Zero for an empty storm.
    pub fn ace(&self, options: &AceOptions) -> f64 {
        accumulated_cyclone_energy(&self.observations, options)
    }

    /// Whether the hourly-interpolated track passes through `bbox`.
    pub fn intersects(&self, bbox: &BoundingBox) -> bool {
        intersects_box(&self.observations, bbox)
    }

    /// Forward speeds (kt) re-derived from the stored positions and times.
    ///
    /// The stored `speed` of each observation is taken against its predecessor
    /// in the full-resolution archive track, before off-synoptic points were
    /// dropped. The two agree only where no point was dropped between an
    /// observation and the one before it.
    pub fn derived_speeds(&self) -> Vec<f64> {
        forward_speeds(&self.observations)
    }

    /// Checks the structural invariants every constructed storm must satisfy.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        if let Some(i) = self
            .observations
            .windows(2)
            .position(|pair| pair[1].time <= pair[0].time)
        {
            return Err(InvariantViolation::NonMonotonicTime(i + 1));
        }
        let extended = self.field_set == FieldSet::Extended;
        if let Some(i) = self
            .observations
            .iter()
            .position(|o| o.extended.is_some() != extended)
        {
            return Err(InvariantViolation::FieldSetMismatch(i));
        }
        match (&self.genesis, self.observations.is_empty()) {
            (None, false) => Err(InvariantViolation::MissingGenesis),
            (Some(_), true) => Err(InvariantViolation::UnexpectedGenesis),
            (Some(genesis), false) if self.observation_at(genesis.time).is_none() => {
                Err(InvariantViolation::GenesisNotObserved(genesis.time))
            }
            _ => Ok(()),
        }
    }

    /// Observation-by-observation comparison, NaN matching NaN.
    pub fn is_identical_to(&self, other: &Storm) -> bool {
        self.id == other.id
            && self.atcf_id == other.atcf_id
            && self.name == other.name
            && self.field_set == other.field_set
            && self.genesis == other.genesis
            && self.observations.len() == other.observations.len()
            && self
                .observations
                .iter()
                .zip(&other.observations)
                .all(|(a, b)| a.is_identical_to(b))
    }
}

/// Two storms are the same physical storm when name, genesis basin, season
/// and quantized first position agree. The archive ID does not take part.
impl PartialEq for Storm {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Storm {}

impl Hash for Storm {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl fmt::Display for Storm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let basin = self.basin().map_or("--", |b| b.code());
        let max_wind = self
            .max_wind()
            .map_or_else(|| "--".to_string(), |w| format!("{:.0}", w));
        match self.genesis_time() {
            Some(genesis) => write!(
                f,
                "Storm(name={}, basin={}, maxwind={} kt, genesis={})",
                self.name,
                basin,
                max_wind,
                genesis.format("%HZ %d %b %Y")
            ),
            None => write!(
                f,
                "Storm(name={}, basin={}, maxwind={} kt, genesis=none)",
                self.name, basin, max_wind
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{storm_with_winds, ts};

    #[test]
    fn test_identity_ignores_id_and_float_noise() {
        let a = storm_with_winds("ANA", Basin::NorthAtlantic, &[40.0, 50.0]);
        let mut b = a.clone();
        b.id = "2020999N99999".to_string();
        b.observations[0].lat += 1e-9;
        assert_eq!(a, b);
        assert_eq!(a.identity(), b.identity());

        let mut c = a.clone();
        c.observations[0].lon += 0.5;
        assert_ne!(a, c);
    }

    #[test]
    fn test_observation_at() {
        let storm = storm_with_winds("ANA", Basin::NorthAtlantic, &[40.0, 50.0, 60.0]);
        let hit = storm.observation_at(ts(2020, 5, 22, 6));
        assert_eq!(hit.map(|o| o.wind), Some(50.0));
        assert!(storm.observation_at(ts(2020, 5, 22, 3)).is_none());
    }

    #[test]
    fn test_max_wind_skips_missing() {
        let storm = storm_with_winds("ANA", Basin::NorthAtlantic, &[f64::NAN, 45.0, 30.0]);
        assert_eq!(storm.max_wind(), Some(45.0));
        let calm = storm_with_winds("ANA", Basin::NorthAtlantic, &[f64::NAN]);
        assert_eq!(calm.max_wind(), None);
    }

    #[test]
    fn test_display() {
        let storm = storm_with_winds("ANA", Basin::NorthAtlantic, &[40.0, 52.4]);
        assert_eq!(
            storm.to_string(),
            "Storm(name=ANA, basin=NA, maxwind=52 kt, genesis=00Z 22 May 2020)"
        );
    }

    #[test]
    fn test_validate() {
        let storm = storm_with_winds("ANA", Basin::NorthAtlantic, &[40.0, 50.0, 60.0]);
        assert_eq!(storm.validate(), Ok(()));

        let mut out_of_order = storm.clone();
        out_of_order.observations.swap(1, 2);
        assert_eq!(
            out_of_order.validate(),
            Err(InvariantViolation::NonMonotonicTime(2))
        );

        let mut bad_genesis = storm.clone();
        if let Some(genesis) = bad_genesis.genesis.as_mut() {
            genesis.time = ts(2020, 5, 22, 3);
        }
        assert_eq!(
            bad_genesis.validate(),
            Err(InvariantViolation::GenesisNotObserved(ts(2020, 5, 22, 3)))
        );

        let mut empty = storm.clone();
        empty.observations.clear();
        assert_eq!(empty.validate(), Err(InvariantViolation::UnexpectedGenesis));
        empty.genesis = None;
        assert_eq!(empty.validate(), Ok(()));
    }
}
