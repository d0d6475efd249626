//! One storm as relational rows in a polars [`DataFrame`].
//!
//! Each row is one observation. The identity columns repeat the same value on
//! every row; the observation columns follow the schema. Missing numbers are
//! stored as nulls, timestamps as `Datetime[ms]`.
//!
//! A storm without observations has no rows and therefore cannot be stored
//! in a frame; decoding an empty frame is an error.

use crate::codec::columns::{ColumnValues, ObservationColumns, StormHeader};
use crate::codec::error::CodecError;
use crate::types::basin::{Basin, Subbasin};
use crate::types::schema::{
    FieldKind, FieldSet, ObservationField, COL_ATCF_ID, COL_BASIN, COL_GENESIS, COL_ID, COL_NAME,
    COL_SEASON, COL_SUBBASIN,
};
use crate::types::storm::Storm;
use chrono::{DateTime, NaiveDateTime};
use polars::prelude::*;

fn datetime_column(name: &str, values: Vec<Option<i64>>) -> Result<Column, CodecError> {
    Ok(Column::new(name.into(), values).cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?)
}

fn millis(time: &NaiveDateTime) -> i64 {
    time.and_utc().timestamp_millis()
}

fn from_physical(value: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let ms = match unit {
        TimeUnit::Nanoseconds => value / 1_000_000,
        TimeUnit::Microseconds => value / 1_000,
        TimeUnit::Milliseconds => value,
    };
    DateTime::from_timestamp_millis(ms).map(|dt| dt.naive_utc())
}

/// Lays a storm out as one row per observation.
pub fn storm_to_frame(storm: &Storm) -> Result<DataFrame, CodecError> {
    let header = StormHeader::of(storm);
    let rows = storm.len();

    let mut columns = vec![
        Column::new(COL_ID.into(), vec![header.id.as_str(); rows]),
        Column::new(COL_ATCF_ID.into(), vec![header.atcf_id.as_deref(); rows]),
        Column::new(COL_NAME.into(), vec![header.name.as_str(); rows]),
        Column::new(COL_SEASON.into(), vec![header.season; rows]),
        Column::new(COL_BASIN.into(), vec![header.basin.map(|b| b.code()); rows]),
        Column::new(COL_SUBBASIN.into(), vec![header.subbasin.map(|s| s.code()); rows]),
        datetime_column(COL_GENESIS, vec![header.genesis.as_ref().map(millis); rows])?,
    ];

    let observation_columns = ObservationColumns::from_observations(&storm.observations, storm.field_set);
    for (field, values) in observation_columns.iter() {
        let name = field.name();
        columns.push(match values {
            ColumnValues::Float(values) => Column::new(
                name.into(),
                values
                    .iter()
                    .map(|v| (!v.is_nan()).then_some(*v))
                    .collect::<Vec<Option<f64>>>(),
            ),
            ColumnValues::Text(values) => Column::new(name.into(), values.as_slice()),
            ColumnValues::Timestamp(values) => {
                datetime_column(name, values.iter().map(|t| Some(millis(t))).collect())?
            }
        });
    }

    Ok(DataFrame::new(columns)?)
}

fn required<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, CodecError> {
    df.column(name)
        .map_err(|e| CodecError::ColumnNotFound(name.to_string(), e))
}

fn read_column(df: &DataFrame, field: ObservationField) -> Result<ColumnValues, CodecError> {
    let column = required(df, field.name())?;
    Ok(match field.kind() {
        FieldKind::Float => ColumnValues::Float(
            column
                .cast(&DataType::Float64)?
                .f64()?
                .into_iter()
                .map(|v| v.unwrap_or(f64::NAN))
                .collect(),
        ),
        FieldKind::Text => ColumnValues::Text(
            column
                .str()?
                .into_iter()
                .map(|v| v.unwrap_or_default().to_string())
                .collect(),
        ),
        FieldKind::Timestamp => {
            let times = column.datetime()?;
            let unit = times.time_unit();
            ColumnValues::Timestamp(
                (0..times.len())
                    .map(|i| {
                        times
                            .get(i)
                            .and_then(|v| from_physical(v, unit))
                            .ok_or_else(|| CodecError::MissingField(field.name().to_string()))
                    })
                    .collect::<Result<_, _>>()?,
            )
        }
    })
}

/// Rebuilds a storm from its rows, which must be ordered by time.
///
/// Identity is taken from the first row; every row must carry the same storm
/// ID. Columns outside the schema are ignored. The extended field set is
/// detected from which columns are present.
pub fn storm_from_frame(df: &DataFrame) -> Result<Storm, CodecError> {
    if df.height() == 0 {
        return Err(CodecError::EmptyFrame);
    }

    let ids = required(df, COL_ID)?.str()?;
    let id = ids.get(0).unwrap_or_default().to_string();
    if let Some(other) = ids.into_iter().flatten().find(|other| *other != id) {
        return Err(CodecError::MixedStormIds {
            expected: id,
            found: other.to_string(),
        });
    }

    let text = |name: &str| -> Result<Option<String>, CodecError> {
        Ok(required(df, name)?.str()?.get(0).map(str::to_string))
    };
    let genesis = required(df, COL_GENESIS)?.datetime()?;
    let header = StormHeader {
        atcf_id: text(COL_ATCF_ID)?,
        name: text(COL_NAME)?.unwrap_or_default(),
        season: required(df, COL_SEASON)?
            .cast(&DataType::Int32)?
            .i32()?
            .get(0),
        basin: text(COL_BASIN)?.map(|b| b.parse::<Basin>()).transpose()?,
        subbasin: text(COL_SUBBASIN)?
            .map(|s| s.parse::<Subbasin>())
            .transpose()?,
        genesis: genesis
            .get(0)
            .and_then(|v| from_physical(v, genesis.time_unit())),
        id,
    };

    let mut columns = ObservationColumns::new();
    for field in FieldSet::Extended.fields() {
        if df.get_column_index(field.name()).is_some() {
            columns.insert(field, read_column(df, field)?)?;
        }
    }
    header.into_storm(columns)
}
