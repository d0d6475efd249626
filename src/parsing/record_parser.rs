//! Builds a finished [`Storm`] from the raw archive lines of a single storm.
//!
//! Pipeline: parse every line, order by time, compute forward speed over the
//! full-resolution track, keep synoptic times only, normalize longitudes,
//! resolve genesis and season, then take identity fields from the raw line
//! of the first synoptic observation.

use crate::metrics::speed::forward_speed_kt;
use crate::parsing::archive_line::{parse_line, RawObservation};
use crate::parsing::error::ParseError;
use crate::processing::genesis::resolve_genesis;
use crate::processing::longitude::normalize_track;
use crate::processing::synoptic::synoptic_indices;
use crate::types::observation::Observation;
use crate::types::schema::FieldSet;
use crate::types::storm::Storm;
use csv::StringRecord;
use log::debug;

/// Parses all raw archive records sharing one storm ID.
///
/// Records may arrive out of time order; they are stable-sorted by timestamp
/// before anything is derived. Two lines with the same timestamp are a hard
/// failure, as is any unparseable required field.
///
/// If no line falls on a synoptic time, the result has no observations and no
/// genesis. That is not an error; callers check [`Storm::is_empty`].
///
/// # Examples
///
/// ```
/// use ibtracs::{parse_storm, ArchiveReader, FieldSet};
///
/// let lines = "\
/// 2020143N25280,2020,1,NA,MM,ANA,2020-05-22 00:00:00,DS,25.0,-80.0,25,1009,hurdat_atl
/// 2020143N25280,2020,1,NA,MM,ANA,2020-05-22 06:00:00,TS,25.5,-79.5,35,1005,hurdat_atl
/// ";
/// let block = ArchiveReader::with_header_lines(lines.as_bytes(), 0)
///     .next()
///     .unwrap()
///     .unwrap();
/// let storm = parse_storm(&block.records, FieldSet::Basic).unwrap();
/// assert_eq!(storm.len(), 2);
/// assert_eq!(storm.season(), Some(2020));
/// assert_eq!(storm.observations[0].lon, 280.0);
/// ```
pub fn parse_storm(records: &[StringRecord], field_set: FieldSet) -> Result<Storm, ParseError> {
    let mut raws = records
        .iter()
        .enumerate()
        .map(|(i, record)| parse_line(record, i + 1, field_set))
        .collect::<Result<Vec<RawObservation>, ParseError>>()?;

    let block_id = raws.first().ok_or(ParseError::EmptyBlock)?.id.clone();
    if let Some((i, raw)) = raws.iter().enumerate().find(|(_, r)| r.id != block_id) {
        return Err(ParseError::MixedStormIds {
            line: i + 1,
            expected: block_id,
            found: raw.id.clone(),
        });
    }

    raws.sort_by_key(|r| r.time);
    if let Some(pair) = raws.windows(2).find(|pair| pair[0].time == pair[1].time) {
        return Err(ParseError::DuplicateTimestamp {
            id: block_id,
            time: pair[1].time,
        });
    }

    // Speed is taken between consecutive raw points, before thinning to synoptic times.
    let mut speeds = vec![f64::NAN; raws.len()];
    for i in 1..raws.len() {
        let (prev, curr) = (&raws[i - 1], &raws[i]);
        speeds[i] = forward_speed_kt((prev.time, prev.lat, prev.lon), (curr.time, curr.lat, curr.lon));
    }

    let kept = synoptic_indices(raws.iter().map(|r| &r.time));
    debug!(
        "Storm {}: {} raw lines, {} at synoptic times",
        block_id,
        raws.len(),
        kept.len()
    );

    let mut observations: Vec<Observation> = kept
        .iter()
        .map(|&i| {
            let raw = &raws[i];
            Observation {
                time: raw.time,
                lat: raw.lat,
                lon: raw.lon,
                classification: raw.classification,
                wind: raw.wind,
                mslp: raw.mslp,
                speed: speeds[i],
                basin: raw.basin,
                subbasin: raw.subbasin,
                agency: raw.agency.clone(),
                extended: raw.extended,
            }
        })
        .collect();

    // Index 0 of the synoptic track is generally not raw line 0, so identity
    // comes from the raw line that produced the first kept observation.
    let identity = kept.first().map_or(&raws[0], |&i| &raws[i]);

    normalize_track(&mut observations);
    let genesis = resolve_genesis(&observations);

    Ok(Storm {
        id: identity.id.clone(),
        atcf_id: identity.atcf_id.clone(),
        name: identity.name.clone(),
        field_set,
        genesis,
        observations,
    })
}
