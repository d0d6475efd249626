//! Column-oriented view of a storm, shared by the JSON and frame codecs.
//!
//! Both representations are a set of named per-observation columns plus a
//! handful of identity scalars. Decoding goes through [`ObservationColumns`],
//! which checks every column against the schema before any observation is built.

use crate::codec::error::CodecError;
use crate::types::basin::{Basin, Classification, Subbasin};
use crate::types::observation::{ExtendedObservation, Observation};
use crate::types::schema::{
    FieldKind, FieldSet, FieldValue, ObservationField, BASIC_FIELDS, COL_BASIN, COL_GENESIS,
    COL_SEASON, COL_SUBBASIN, EXTENDED_FIELDS,
};
use crate::types::storm::{Genesis, Storm};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

/// Minute-precision ISO-8601, as written to JSON.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M";
const TIMESTAMP_FORMAT_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";

pub fn format_timestamp(time: &NaiveDateTime) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses minute-precision ISO-8601; a seconds component is also accepted.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, CodecError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT_SECONDS))
        .map_err(|source| CodecError::InvalidTimestamp {
            value: value.to_string(),
            source,
        })
}

/// The values of one per-observation column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Float(Vec<f64>),
    Text(Vec<String>),
    Timestamp(Vec<NaiveDateTime>),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Float(values) => values.len(),
            ColumnValues::Text(values) => values.len(),
            ColumnValues::Timestamp(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            ColumnValues::Float(_) => FieldKind::Float,
            ColumnValues::Text(_) => FieldKind::Text,
            ColumnValues::Timestamp(_) => FieldKind::Timestamp,
        }
    }

    fn empty(kind: FieldKind, capacity: usize) -> Self {
        match kind {
            FieldKind::Float => ColumnValues::Float(Vec::with_capacity(capacity)),
            FieldKind::Text => ColumnValues::Text(Vec::with_capacity(capacity)),
            FieldKind::Timestamp => ColumnValues::Timestamp(Vec::with_capacity(capacity)),
        }
    }

    fn push(&mut self, value: FieldValue<'_>) {
        match (self, value) {
            (ColumnValues::Float(values), FieldValue::Float(v)) => values.push(v),
            (ColumnValues::Text(values), FieldValue::Text(v)) => values.push(v.to_string()),
            (ColumnValues::Timestamp(values), FieldValue::Timestamp(v)) => values.push(v),
            // Kinds are fixed by the schema, so a column never sees a foreign value.
            _ => {}
        }
    }
}

fn expected_name(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Float => "a sequence of numbers or nulls",
        FieldKind::Text => "a sequence of strings",
        FieldKind::Timestamp => "a sequence of timestamps",
    }
}

/// Per-observation columns keyed by schema field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationColumns {
    columns: BTreeMap<ObservationField, ColumnValues>,
}

impl ObservationColumns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits a track into one column per field of `field_set`.
    pub fn from_observations(observations: &[Observation], field_set: FieldSet) -> Self {
        let columns = field_set
            .fields()
            .into_iter()
            .map(|field| {
                let mut values = ColumnValues::empty(field.kind(), observations.len());
                for observation in observations {
                    values.push(field.value(observation));
                }
                (field, values)
            })
            .collect();
        ObservationColumns { columns }
    }

    /// Adds a column, rejecting values whose kind differs from the schema's.
    pub fn insert(&mut self, field: ObservationField, values: ColumnValues) -> Result<(), CodecError> {
        if values.kind() != field.kind() {
            return Err(CodecError::WrongType {
                field: field.name().to_string(),
                expected: expected_name(field.kind()),
            });
        }
        self.columns.insert(field, values);
        Ok(())
    }

    pub fn get(&self, field: ObservationField) -> Option<&ColumnValues> {
        self.columns.get(&field)
    }

    /// Columns in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (ObservationField, &ColumnValues)> {
        self.columns.iter().map(|(field, values)| (*field, values))
    }

    /// Which field set the present columns make up. Every basic field is
    /// required; the extended fields are all present or all absent.
    pub fn field_set(&self) -> Result<FieldSet, CodecError> {
        if let Some(missing) = BASIC_FIELDS.iter().find(|f| !self.columns.contains_key(f)) {
            return Err(CodecError::MissingField(missing.name().to_string()));
        }
        let present = EXTENDED_FIELDS
            .iter()
            .filter(|f| self.columns.contains_key(f))
            .count();
        if present == 0 {
            return Ok(FieldSet::Basic);
        }
        match EXTENDED_FIELDS.iter().find(|f| !self.columns.contains_key(f)) {
            Some(missing) => Err(CodecError::IncompleteFieldSet(missing.name())),
            None => Ok(FieldSet::Extended),
        }
    }

    /// Rebuilds the observations, checking that every column is as long as `time`.
    pub fn into_observations(self) -> Result<(FieldSet, Vec<Observation>), CodecError> {
        let field_set = self.field_set()?;
        let len = self
            .get(ObservationField::Time)
            .map_or(0, ColumnValues::len);
        for (field, values) in self.iter() {
            if values.len() != len {
                return Err(CodecError::LengthMismatch {
                    field: field.name(),
                    expected: len,
                    found: values.len(),
                });
            }
        }

        let float = |field: ObservationField, i: usize| match self.get(field) {
            Some(ColumnValues::Float(values)) => values[i],
            _ => f64::NAN,
        };
        let text = |field: ObservationField, i: usize| match self.get(field) {
            Some(ColumnValues::Text(values)) => values[i].as_str(),
            _ => "",
        };

        let mut observations = Vec::with_capacity(len);
        for i in 0..len {
            let time = match self.get(ObservationField::Time) {
                Some(ColumnValues::Timestamp(values)) => values[i],
                _ => return Err(CodecError::MissingField(ObservationField::Time.name().to_string())),
            };
            let extended = match field_set {
                FieldSet::Basic => None,
                FieldSet::Extended => {
                    let mut extended = ExtendedObservation::MISSING;
                    extended.dist2land = float(ObservationField::Dist2Land, i);
                    extended.rmw = float(ObservationField::Rmw, i);
                    for field in EXTENDED_FIELDS {
                        if let ObservationField::Radius(threshold, quadrant) = field {
                            extended.radii.set(threshold, quadrant, float(field, i));
                        }
                    }
                    Some(extended)
                }
            };
            observations.push(Observation {
                time,
                lat: float(ObservationField::Lat, i),
                lon: float(ObservationField::Lon, i),
                classification: text(ObservationField::Classification, i).parse::<Classification>()?,
                wind: float(ObservationField::Wind, i),
                mslp: float(ObservationField::Mslp, i),
                speed: float(ObservationField::Speed, i),
                basin: text(ObservationField::Basins, i).parse::<Basin>()?,
                subbasin: text(ObservationField::Subbasins, i).parse::<Subbasin>()?,
                agency: text(ObservationField::Agencies, i).to_string(),
                extended,
            });
        }
        Ok((field_set, observations))
    }
}

/// The scalar identity fields of a storm, as stored next to its columns.
#[derive(Debug, Clone, PartialEq)]
pub struct StormHeader {
    pub id: String,
    pub atcf_id: Option<String>,
    pub name: String,
    pub season: Option<i32>,
    pub basin: Option<Basin>,
    pub subbasin: Option<Subbasin>,
    pub genesis: Option<NaiveDateTime>,
}

impl StormHeader {
    pub fn of(storm: &Storm) -> Self {
        StormHeader {
            id: storm.id.clone(),
            atcf_id: storm.atcf_id.clone(),
            name: storm.name.clone(),
            season: storm.season(),
            basin: storm.basin(),
            subbasin: storm.subbasin(),
            genesis: storm.genesis_time(),
        }
    }

    /// Joins the header with its columns and checks the storm invariants.
    pub fn into_storm(self, columns: ObservationColumns) -> Result<Storm, CodecError> {
        let (field_set, observations) = columns.into_observations()?;
        let genesis = match self.genesis {
            Some(time) => Some(Genesis {
                time,
                basin: self.basin.ok_or(CodecError::MissingIdentity(COL_BASIN))?,
                subbasin: self.subbasin.unwrap_or(Subbasin::Missing),
                season: self.season.ok_or(CodecError::MissingIdentity(COL_SEASON))?,
            }),
            None if !observations.is_empty() => {
                return Err(CodecError::MissingIdentity(COL_GENESIS));
            }
            None => None,
        };
        let storm = Storm {
            id: self.id,
            atcf_id: self.atcf_id,
            name: self.name,
            field_set,
            genesis,
            observations,
        };
        storm.validate()?;
        Ok(storm)
    }
}
