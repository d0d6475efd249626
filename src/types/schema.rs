//! The explicit schema of a storm record: the identity columns shared by every row and
//! the named, typed list of per-observation fields. The relational and JSON codecs
//! walk this list instead of discovering fields at runtime.

use crate::types::observation::{Observation, Quadrant, WindThreshold};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const COL_ID: &str = "id";
pub const COL_ATCF_ID: &str = "atcf_id";
pub const COL_NAME: &str = "name";
pub const COL_SEASON: &str = "season";
pub const COL_BASIN: &str = "basin"; // basin of genesis
pub const COL_SUBBASIN: &str = "subbasin"; // subbasin of genesis
pub const COL_GENESIS: &str = "genesis";

/// Identity columns, repeated on every relational row.
pub const IDENTITY_COLUMNS: [&str; 7] = [
    COL_ID,
    COL_ATCF_ID,
    COL_NAME,
    COL_SEASON,
    COL_BASIN,
    COL_SUBBASIN,
    COL_GENESIS,
];

/// Storage type of a per-observation field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Float,
    Text,
    Timestamp,
}

/// Which per-observation fields a record carries.
///
/// `Basic` is the core track (position, intensity, codes). `Extended` adds the
/// USA-agency attributes: distance to land, radius of maximum wind and the
/// twelve wind-radii values. When parsing the archive, `Extended` also falls
/// back to the USA-agency wind when the WMO wind is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FieldSet {
    Basic,
    #[default]
    Extended,
}

impl FieldSet {
    /// The per-observation fields of this set, in column order.
    pub fn fields(&self) -> Vec<ObservationField> {
        let mut fields = BASIC_FIELDS.to_vec();
        if *self == FieldSet::Extended {
            fields.extend(EXTENDED_FIELDS);
        }
        fields
    }
}

/// A named per-observation field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObservationField {
    Time,
    Lat,
    Lon,
    Classification,
    Wind,
    Mslp,
    Speed,
    Basins,
    Subbasins,
    Agencies,
    Dist2Land,
    Rmw,
    Radius(WindThreshold, Quadrant),
}

pub const BASIC_FIELDS: [ObservationField; 10] = [
    ObservationField::Time,
    ObservationField::Lat,
    ObservationField::Lon,
    ObservationField::Classification,
    ObservationField::Wind,
    ObservationField::Mslp,
    ObservationField::Speed,
    ObservationField::Basins,
    ObservationField::Subbasins,
    ObservationField::Agencies,
];

pub const EXTENDED_FIELDS: [ObservationField; 14] = [
    ObservationField::Dist2Land,
    ObservationField::Rmw,
    ObservationField::Radius(WindThreshold::Kt34, Quadrant::Ne),
    ObservationField::Radius(WindThreshold::Kt34, Quadrant::Se),
    ObservationField::Radius(WindThreshold::Kt34, Quadrant::Sw),
    ObservationField::Radius(WindThreshold::Kt34, Quadrant::Nw),
    ObservationField::Radius(WindThreshold::Kt50, Quadrant::Ne),
    ObservationField::Radius(WindThreshold::Kt50, Quadrant::Se),
    ObservationField::Radius(WindThreshold::Kt50, Quadrant::Sw),
    ObservationField::Radius(WindThreshold::Kt50, Quadrant::Nw),
    ObservationField::Radius(WindThreshold::Kt64, Quadrant::Ne),
    ObservationField::Radius(WindThreshold::Kt64, Quadrant::Se),
    ObservationField::Radius(WindThreshold::Kt64, Quadrant::Sw),
    ObservationField::Radius(WindThreshold::Kt64, Quadrant::Nw),
];

/// The value of one field of one observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Float(f64),
    Text(&'a str),
    Timestamp(NaiveDateTime),
}

impl ObservationField {
    /// Column / JSON key name.
    pub fn name(&self) -> &'static str {
        use Quadrant::*;
        use WindThreshold::*;
        match self {
            ObservationField::Time => "time",
            ObservationField::Lat => "lat",
            ObservationField::Lon => "lon",
            ObservationField::Classification => "classification",
            ObservationField::Wind => "wind",
            ObservationField::Mslp => "mslp",
            ObservationField::Speed => "speed",
            ObservationField::Basins => "basins",
            ObservationField::Subbasins => "subbasins",
            ObservationField::Agencies => "agencies",
            ObservationField::Dist2Land => "dist2land",
            ObservationField::Rmw => "rmw",
            ObservationField::Radius(Kt34, Ne) => "R34_NE",
            ObservationField::Radius(Kt34, Se) => "R34_SE",
            ObservationField::Radius(Kt34, Sw) => "R34_SW",
            ObservationField::Radius(Kt34, Nw) => "R34_NW",
            ObservationField::Radius(Kt50, Ne) => "R50_NE",
            ObservationField::Radius(Kt50, Se) => "R50_SE",
            ObservationField::Radius(Kt50, Sw) => "R50_SW",
            ObservationField::Radius(Kt50, Nw) => "R50_NW",
            ObservationField::Radius(Kt64, Ne) => "R64_NE",
            ObservationField::Radius(Kt64, Se) => "R64_SE",
            ObservationField::Radius(Kt64, Sw) => "R64_SW",
            ObservationField::Radius(Kt64, Nw) => "R64_NW",
        }
    }

    pub fn from_name(name: &str) -> Option<ObservationField> {
        BASIC_FIELDS
            .into_iter()
            .chain(EXTENDED_FIELDS)
            .find(|field| field.name() == name)
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            ObservationField::Time => FieldKind::Timestamp,
            ObservationField::Classification
            | ObservationField::Basins
            | ObservationField::Subbasins
            | ObservationField::Agencies => FieldKind::Text,
            _ => FieldKind::Float,
        }
    }

    pub fn units(&self) -> Option<&'static str> {
        match self {
            ObservationField::Lat | ObservationField::Lon => Some("degrees"),
            ObservationField::Time => Some("minutes"),
            ObservationField::Wind | ObservationField::Speed => Some("kt"),
            ObservationField::Mslp => Some("hPa"),
            ObservationField::Dist2Land => Some("km"),
            ObservationField::Rmw | ObservationField::Radius(..) => Some("nm"),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ObservationField::Time => "observation time (UTC)",
            ObservationField::Lat => "storm latitude",
            ObservationField::Lon => "storm longitude, degrees east",
            ObservationField::Classification => "storm classification code",
            ObservationField::Wind => "maximum sustained wind (averaging interval varies by agency)",
            ObservationField::Mslp => "central pressure",
            ObservationField::Speed => "storm forward speed",
            ObservationField::Basins => "basin the storm is located in",
            ObservationField::Subbasins => "subbasin the storm is located in",
            ObservationField::Agencies => "agency from which the observation is provided",
            ObservationField::Dist2Land => "distance to land",
            ObservationField::Rmw => "radius of maximum wind (USA agencies only)",
            ObservationField::Radius(..) => "wind radii in one quadrant (USA agencies only)",
        }
    }

    /// Reads this field from an observation. Extended fields of a basic
    /// observation read as NaN.
    pub fn value<'a>(&self, observation: &'a Observation) -> FieldValue<'a> {
        let extended = observation.extended.as_ref();
        match self {
            ObservationField::Time => FieldValue::Timestamp(observation.time),
            ObservationField::Lat => FieldValue::Float(observation.lat),
            ObservationField::Lon => FieldValue::Float(observation.lon),
            ObservationField::Classification => FieldValue::Text(observation.classification.code()),
            ObservationField::Wind => FieldValue::Float(observation.wind),
            ObservationField::Mslp => FieldValue::Float(observation.mslp),
            ObservationField::Speed => FieldValue::Float(observation.speed),
            ObservationField::Basins => FieldValue::Text(observation.basin.code()),
            ObservationField::Subbasins => FieldValue::Text(observation.subbasin.code()),
            ObservationField::Agencies => FieldValue::Text(&observation.agency),
            ObservationField::Dist2Land => {
                FieldValue::Float(extended.map_or(f64::NAN, |e| e.dist2land))
            }
            ObservationField::Rmw => FieldValue::Float(extended.map_or(f64::NAN, |e| e.rmw)),
            ObservationField::Radius(threshold, quadrant) => FieldValue::Float(
                extended.map_or(f64::NAN, |e| e.radii.get(*threshold, *quadrant)),
            ),
        }
    }
}
