//! One storm as a flat JSON object.
//!
//! Identity fields are scalars; every per-observation field is an array.
//! Missing numbers are written as `null` and read back as NaN, so the arrays
//! stay aligned with `time`. Any key outside the schema is rejected.
//!
//! ```json
//! {
//!   "id": "2020143N25280", "atcf_id": "AL012020", "name": "ANA",
//!   "season": 2020, "basin": "NA", "subbasin": "MM", "genesis": "2020-05-22T00:00",
//!   "time": ["2020-05-22T00:00", "2020-05-22T06:00"],
//!   "wind": [35.0, null],
//!   ...
//! }
//! ```

use crate::codec::columns::{
    format_timestamp, parse_timestamp, ColumnValues, ObservationColumns, StormHeader,
};
use crate::codec::error::CodecError;
use crate::types::basin::{Basin, Subbasin};
use crate::types::schema::{
    FieldKind, ObservationField, COL_ATCF_ID, COL_BASIN, COL_GENESIS, COL_ID, COL_NAME,
    COL_SEASON, COL_SUBBASIN, IDENTITY_COLUMNS,
};
use crate::types::storm::Storm;
use serde_json::{Map, Number, Value};

fn float_value(value: f64) -> Value {
    Number::from_f64(value).map_or(Value::Null, Value::Number)
}

fn optional_string(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |s| Value::String(s.to_string()))
}

/// Builds the JSON object for a storm.
pub fn to_json_value(storm: &Storm) -> Value {
    let header = StormHeader::of(storm);
    let mut map = Map::new();
    map.insert(COL_ID.to_string(), Value::String(header.id));
    map.insert(COL_ATCF_ID.to_string(), optional_string(header.atcf_id.as_deref()));
    map.insert(COL_NAME.to_string(), Value::String(header.name));
    map.insert(
        COL_SEASON.to_string(),
        header.season.map_or(Value::Null, Value::from),
    );
    map.insert(COL_BASIN.to_string(), optional_string(header.basin.map(|b| b.code())));
    map.insert(
        COL_SUBBASIN.to_string(),
        optional_string(header.subbasin.map(|s| s.code())),
    );
    map.insert(
        COL_GENESIS.to_string(),
        optional_string(header.genesis.map(|t| format_timestamp(&t)).as_deref()),
    );

    let columns = ObservationColumns::from_observations(&storm.observations, storm.field_set);
    for (field, values) in columns.iter() {
        let array = match values {
            ColumnValues::Float(values) => values.iter().copied().map(float_value).collect(),
            ColumnValues::Text(values) => values.iter().cloned().map(Value::String).collect(),
            ColumnValues::Timestamp(values) => values
                .iter()
                .map(|t| Value::String(format_timestamp(t)))
                .collect(),
        };
        map.insert(field.name().to_string(), Value::Array(array));
    }
    Value::Object(map)
}

/// Serializes a storm to a compact JSON string.
pub fn to_json(storm: &Storm) -> Result<String, CodecError> {
    Ok(serde_json::to_string(&to_json_value(storm))?)
}

/// Serializes a storm to an indented JSON string.
pub fn to_json_pretty(storm: &Storm) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(&to_json_value(storm))?)
}

/// Parses a storm from a JSON string. See [`from_json_value`].
pub fn from_json(text: &str) -> Result<Storm, CodecError> {
    let value: Value = serde_json::from_str(text)?;
    from_json_value(&value)
}

fn wrong_type(key: &str, expected: &'static str) -> CodecError {
    CodecError::WrongType {
        field: key.to_string(),
        expected,
    }
}

fn required_string(map: &Map<String, Value>, key: &str) -> Result<String, CodecError> {
    match map.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(wrong_type(key, "a string")),
        None => Err(CodecError::MissingField(key.to_string())),
    }
}

fn nullable_string<'a>(map: &'a Map<String, Value>, key: &str) -> Result<Option<&'a str>, CodecError> {
    match map.get(key) {
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(Value::Null) | None => Ok(None),
        Some(_) => Err(wrong_type(key, "a string or null")),
    }
}

fn array_values(field: ObservationField, value: &Value) -> Result<ColumnValues, CodecError> {
    let key = field.name();
    let items = value
        .as_array()
        .ok_or_else(|| wrong_type(key, "an array"))?;
    match field.kind() {
        FieldKind::Float => items
            .iter()
            .map(|item| match item {
                Value::Null => Ok(f64::NAN),
                Value::Number(n) => n.as_f64().ok_or_else(|| wrong_type(key, "an array of numbers")),
                _ => Err(wrong_type(key, "an array of numbers or nulls")),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(ColumnValues::Float),
        FieldKind::Text => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| wrong_type(key, "an array of strings"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(ColumnValues::Text),
        FieldKind::Timestamp => items
            .iter()
            .map(|item| {
                item.as_str()
                    .ok_or_else(|| wrong_type(key, "an array of timestamp strings"))
                    .and_then(parse_timestamp)
            })
            .collect::<Result<Vec<_>, _>>()
            .map(ColumnValues::Timestamp),
    }
}

/// Rebuilds a storm from its JSON object.
///
/// Unknown keys, arrays of unequal length, values of the wrong type and a
/// partially present extended field set are all errors. The result is
/// checked against the storm invariants before it is returned.
pub fn from_json_value(value: &Value) -> Result<Storm, CodecError> {
    let map = value.as_object().ok_or(CodecError::NotAnObject)?;

    let mut columns = ObservationColumns::new();
    for (key, value) in map {
        if IDENTITY_COLUMNS.contains(&key.as_str()) {
            continue;
        }
        let field = ObservationField::from_name(key)
            .ok_or_else(|| CodecError::UnknownField(key.clone()))?;
        columns.insert(field, array_values(field, value)?)?;
    }

    let season = match map.get(COL_SEASON) {
        Some(Value::Number(n)) => Some(
            n.as_i64()
                .and_then(|s| i32::try_from(s).ok())
                .ok_or_else(|| wrong_type(COL_SEASON, "an integer year"))?,
        ),
        Some(Value::Null) | None => None,
        Some(_) => return Err(wrong_type(COL_SEASON, "an integer year or null")),
    };
    let header = StormHeader {
        id: required_string(map, COL_ID)?,
        atcf_id: nullable_string(map, COL_ATCF_ID)?.map(str::to_string),
        name: required_string(map, COL_NAME)?,
        season,
        basin: nullable_string(map, COL_BASIN)?
            .map(str::parse::<Basin>)
            .transpose()?,
        subbasin: nullable_string(map, COL_SUBBASIN)?
            .map(str::parse::<Subbasin>)
            .transpose()?,
        genesis: nullable_string(map, COL_GENESIS)?
            .map(parse_timestamp)
            .transpose()?,
    };
    header.into_storm(columns)
}
