//! Derives a storm's formation time, formation basin and season.

use crate::types::basin::Basin;
use crate::types::observation::Observation;
use crate::types::storm::Genesis;
use chrono::{Datelike, NaiveDateTime};

/// Genesis is the first observation classified as anything other than a
/// disturbance or not-rated; a storm that never organizes falls back to its
/// first observation. `None` only for an empty track.
pub fn resolve_genesis(observations: &[Observation]) -> Option<Genesis> {
    let genesis = observations
        .iter()
        .find(|o| o.classification.is_organized())
        .or_else(|| observations.first())?;
    Some(Genesis {
        time: genesis.time,
        basin: genesis.basin,
        subbasin: genesis.subbasin,
        season: season_for(genesis.time, genesis.basin),
    })
}

/// Northern storms belong to their calendar year. Southern storms belong to the
/// July-June season, named by its later calendar year.
pub fn season_for(genesis: NaiveDateTime, basin: Basin) -> i32 {
    let (year, month) = (genesis.year(), genesis.month());
    if basin.is_southern_hemisphere() && month >= 7 {
        year + 1
    } else {
        year
    }
}
