//! Types the fields of a single archive record.

use crate::parsing::error::ParseError;
use crate::types::basin::{Basin, Classification, Subbasin};
use crate::types::observation::{ExtendedObservation, Quadrant, WindRadii, WindThreshold};
use crate::types::schema::FieldSet;
use chrono::NaiveDateTime;
use csv::StringRecord;

pub const FIELD_ID: usize = 0;
pub const FIELD_BASIN: usize = 3;
pub const FIELD_SUBBASIN: usize = 4;
pub const FIELD_NAME: usize = 5;
pub const FIELD_TIME: usize = 6;
pub const FIELD_NATURE: usize = 7;
pub const FIELD_LAT: usize = 8;
pub const FIELD_LON: usize = 9; // degrees east
pub const FIELD_WIND: usize = 10;
pub const FIELD_PRES: usize = 11;
pub const FIELD_AGENCY: usize = 12;
pub const FIELD_DIST2LAND: usize = 14;
pub const FIELD_ATCF_ID: usize = 18;
pub const FIELD_USA_WIND: usize = 23;
pub const FIELD_FIRST_RADIUS: usize = 26; // R34_NE, then SE, SW, NW, then R50, R64
pub const FIELD_RMW: usize = 40;

pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One archive line, typed but not yet placed in a track.
#[derive(Debug, Clone, PartialEq)]
pub struct RawObservation {
    pub id: String,
    pub atcf_id: Option<String>,
    pub name: String,
    pub time: NaiveDateTime,
    pub lat: f64,
    pub lon: f64,
    pub classification: Classification,
    pub wind: f64,
    pub mslp: f64,
    pub basin: Basin,
    pub subbasin: Subbasin,
    pub agency: String,
    pub extended: Option<ExtendedObservation>,
}

struct Fields<'a> {
    record: &'a StringRecord,
    line: usize,
}

impl<'a> Fields<'a> {
    fn required(&self, index: usize, field: &'static str) -> Result<&'a str, ParseError> {
        self.record
            .get(index)
            .ok_or(ParseError::MissingField {
                line: self.line,
                index,
                field,
            })
    }

    /// Columns past the end of a short line read as blank.
    fn optional(&self, index: usize) -> &'a str {
        self.record.get(index).unwrap_or("")
    }

    fn number(&self, value: &str, field: &'static str) -> Result<f64, ParseError> {
        value
            .parse::<f64>()
            .map_err(|source| ParseError::InvalidNumber {
                line: self.line,
                field,
                value: value.to_string(),
                source,
            })
    }

    fn coordinate(&self, index: usize, field: &'static str) -> Result<f64, ParseError> {
        let value = self.required(index, field)?;
        self.number(value, field)
    }

    /// Blank reads as NaN; anything else must be a number.
    fn optional_number(&self, value: &str, field: &'static str) -> Result<f64, ParseError> {
        if value.is_empty() {
            Ok(f64::NAN)
        } else {
            self.number(value, field)
        }
    }

    /// Wind, pressure and radii: blank or non-positive means not reported.
    fn measurement(&self, value: &str, field: &'static str) -> Result<f64, ParseError> {
        let v = self.optional_number(value, field)?;
        Ok(if v > 0.0 { v } else { f64::NAN })
    }

    fn code<T>(&self, index: usize, field: &'static str) -> Result<T, ParseError>
    where
        T: std::str::FromStr<Err = crate::types::basin::UnknownCode>,
    {
        self.required(index, field)?
            .parse()
            .map_err(|source| ParseError::InvalidCode {
                line: self.line,
                source,
            })
    }
}

/// Parses one archive record. `line` is its 1-based position within the storm's block.
pub fn parse_line(record: &StringRecord, line: usize, field_set: FieldSet) -> Result<RawObservation, ParseError> {
    let f = Fields { record, line };

    let time_text = f.required(FIELD_TIME, "time")?;
    let time = NaiveDateTime::parse_from_str(time_text, TIME_FORMAT).map_err(|source| {
        ParseError::InvalidTimestamp {
            line,
            value: time_text.to_string(),
            source,
        }
    })?;

    let mut wind = f.measurement(f.required(FIELD_WIND, "wind")?, "wind")?;
    let mslp = f.measurement(f.required(FIELD_PRES, "pressure")?, "pressure")?;

    let extended = match field_set {
        FieldSet::Basic => None,
        FieldSet::Extended => {
            // Fall back to the USA agency wind where WMO wind is unavailable.
            if wind.is_nan() {
                wind = f.measurement(f.optional(FIELD_USA_WIND), "USA wind")?;
            }
            let mut radii = WindRadii::MISSING;
            let slots = WindThreshold::ALL
                .iter()
                .flat_map(|&t| Quadrant::ALL.iter().map(move |&q| (t, q)));
            for (offset, (threshold, quadrant)) in slots.enumerate() {
                let value = f.optional(FIELD_FIRST_RADIUS + offset);
                radii.set(threshold, quadrant, f.measurement(value, "wind radius")?);
            }
            Some(ExtendedObservation {
                dist2land: f.optional_number(f.optional(FIELD_DIST2LAND), "distance to land")?,
                rmw: f.optional_number(f.optional(FIELD_RMW), "radius of maximum wind")?,
                radii,
            })
        }
    };

    let atcf_id = f.optional(FIELD_ATCF_ID);

    Ok(RawObservation {
        id: f.required(FIELD_ID, "id")?.to_string(),
        atcf_id: (!atcf_id.is_empty()).then(|| atcf_id.to_string()),
        name: f.required(FIELD_NAME, "name")?.to_string(),
        time,
        lat: f.coordinate(FIELD_LAT, "latitude")?,
        lon: f.coordinate(FIELD_LON, "longitude")?,
        classification: f.code(FIELD_NATURE, "classification")?,
        wind,
        mslp,
        basin: f.code(FIELD_BASIN, "basin")?,
        subbasin: f.code(FIELD_SUBBASIN, "subbasin")?,
        agency: f.required(FIELD_AGENCY, "agency")?.to_string(),
        extended,
    })
}
