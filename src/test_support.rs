//! Builders shared by the unit tests.

use crate::processing::genesis::resolve_genesis;
use crate::types::basin::{Basin, Classification, Subbasin};
use crate::types::observation::Observation;
use crate::types::schema::FieldSet;
use crate::types::storm::Storm;
use crate::parsing::archive_reader::archive_reader_builder;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use csv::StringRecord;

pub fn ts(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

/// A basic-field-set storm with one tropical observation per wind value,
/// six hours apart from 2020-05-22 00Z, drifting north-east by half a degree per step.
pub fn storm_with_winds(name: &str, basin: Basin, winds: &[f64]) -> Storm {
    let start = ts(2020, 5, 22, 0);
    let observations: Vec<Observation> = winds
        .iter()
        .enumerate()
        .map(|(i, &wind)| Observation {
            time: start + Duration::hours(6 * i as i64),
            lat: 25.0 + 0.5 * i as f64,
            lon: 280.0 + 0.5 * i as f64,
            classification: Classification::Tropical,
            wind,
            mslp: f64::NAN,
            speed: f64::NAN,
            basin,
            subbasin: Subbasin::Missing,
            agency: "hurdat_atl".to_string(),
            extended: None,
        })
        .collect();
    Storm {
        id: format!("2020143N25280_{}", name),
        atcf_id: None,
        name: name.to_string(),
        field_set: FieldSet::Basic,
        genesis: resolve_genesis(&observations),
        observations,
    }
}

/// Raw observation fields written into an archive line.
pub struct LineSpec<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub basin: &'a str,
    pub subbasin: &'a str,
    pub time: &'a str,
    pub nature: &'a str,
    pub lat: &'a str,
    pub lon: &'a str,
    pub wind: &'a str,
    pub pres: &'a str,
    pub agency: &'a str,
}

impl Default for LineSpec<'_> {
    fn default() -> Self {
        LineSpec {
            id: "2020143N25280",
            name: "ANA",
            basin: "NA",
            subbasin: "MM",
            time: "2020-05-22 00:00:00",
            nature: "TS",
            lat: "25.0",
            lon: "-80.0",
            wind: "35",
            pres: "1005",
            agency: "hurdat_atl",
        }
    }
}

/// A full-width archive record (41 columns) with the given values, blank USA
/// columns except the ATCF ID, and 34-kt radii of 60 nm.
pub fn archive_record(spec: &LineSpec<'_>) -> StringRecord {
    let mut fields = vec![String::new(); 41];
    fields[0] = spec.id.to_string();
    fields[1] = spec.time.get(0..4).unwrap_or("").to_string();
    fields[2] = "1".to_string();
    fields[3] = spec.basin.to_string();
    fields[4] = spec.subbasin.to_string();
    fields[5] = spec.name.to_string();
    fields[6] = spec.time.to_string();
    fields[7] = spec.nature.to_string();
    fields[8] = spec.lat.to_string();
    fields[9] = spec.lon.to_string();
    fields[10] = spec.wind.to_string();
    fields[11] = spec.pres.to_string();
    fields[12] = spec.agency.to_string();
    fields[13] = "main".to_string();
    fields[14] = "250".to_string();
    fields[18] = "AL012020".to_string();
    for value in fields.iter_mut().skip(26).take(4) {
        *value = "60".to_string();
    }
    fields[40] = "20".to_string();
    StringRecord::from(fields)
}

/// [`archive_record`] as a line of archive text.
pub fn archive_line(spec: &LineSpec<'_>) -> String {
    archive_record(spec).iter().collect::<Vec<_>>().join(",")
}

/// One line of archive text read the way the archive reader reads it.
pub fn record(line: &str) -> StringRecord {
    archive_reader_builder()
        .from_reader(line.as_bytes())
        .into_records()
        .next()
        .unwrap()
        .unwrap()
}
