//! The main entry point: a loaded collection of storms.
//!
//! A collection is loaded from one of four representations (the raw archive,
//! a parquet storm table, a directory of JSON documents or a binary cache
//! snapshot), optionally cleared of duplicate records, and then queried or
//! saved back to any of the representations.

use crate::codec::frame::storm_from_frame;
use crate::codec::json::{from_json, to_json_pretty};
use crate::error::IbtracsError;
use crate::metrics::ace::AceOptions;
use crate::metrics::intersect::BoundingBox;
use crate::parsing::archive_reader::ArchiveReader;
use crate::parsing::record_parser::parse_storm;
use crate::processing::dedup::resolve_duplicates;
use crate::store::StormTable;
use crate::types::basin::Basin;
use crate::types::schema::{FieldSet, COL_ID};
use crate::types::storm::Storm;
use bincode::config::{Configuration, Fixint, LittleEndian};
use bon::bon;
use log::{debug, info, warn};
use ordered_float::OrderedFloat;
use std::fmt;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const BINCODE_CONFIG: Configuration<LittleEndian, Fixint> =
    bincode::config::standard().with_fixed_int_encoding();

/// The representation a collection is loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// The raw comma-separated archive.
    Archive,
    /// A parquet file written by [`StormTable::write_parquet`].
    Table,
    /// A directory tree of per-storm JSON documents.
    Json,
    /// A binary snapshot written by [`Ibtracs::save_cache`].
    Cache,
}

impl FromStr for SourceKind {
    type Err = IbtracsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" | "archive" => Ok(SourceKind::Archive),
            "db" | "table" | "parquet" => Ok(SourceKind::Table),
            "json" => Ok(SourceKind::Json),
            "cache" | "bin" => Ok(SourceKind::Cache),
            _ => Err(IbtracsError::UnknownSource(s.to_string())),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::Archive => "csv",
            SourceKind::Table => "db",
            SourceKind::Json => "json",
            SourceKind::Cache => "cache",
        };
        write!(f, "{}", name)
    }
}

/// Which storms a seasonal aggregate covers, by genesis basin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Region {
    #[default]
    Global,
    /// NA, EP, WP and NI.
    Northern,
    /// SP, SI and SA.
    Southern,
    Basin(Basin),
}

impl Region {
    pub fn contains(&self, basin: Basin) -> bool {
        match self {
            Region::Global => true,
            Region::Northern => !basin.is_southern_hemisphere(),
            Region::Southern => basin.is_southern_hemisphere(),
            Region::Basin(b) => *b == basin,
        }
    }
}

/// A storm that could not be loaded, and why.
#[derive(Debug)]
pub struct LoadFailure {
    /// Storm ID, or the file path when no ID could be read.
    pub source: String,
    pub error: IbtracsError,
}

/// What happened while loading a collection.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: usize,
    /// Storms whose raw lines held no synoptic observation.
    pub empty: usize,
    pub duplicates_discarded: usize,
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    fn fail(&mut self, source: impl Into<String>, error: impl Into<IbtracsError>) {
        let source = source.into();
        let error = error.into();
        warn!("Skipping storm {}: {}", source, error);
        self.failures.push(LoadFailure { source, error });
    }
}

/// ACE of one storm within a seasonal aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct StormAce {
    pub id: String,
    pub name: String,
    pub ace: f64,
}

/// A collection of storms and the report of how it was loaded.
///
/// # Examples
///
/// ```no_run
/// use ibtracs::{AceOptions, Ibtracs, IbtracsError, Region, SourceKind};
/// use std::path::Path;
///
/// # fn main() -> Result<(), IbtracsError> {
/// let ibtracs = Ibtracs::load()
///     .source("csv".parse::<SourceKind>()?)
///     .path(Path::new("ibtracs.ALL.list.v04r00.csv"))
///     .call()?;
/// println!("{} storms, {} failed", ibtracs.len(), ibtracs.report().failures.len());
///
/// let ace = ibtracs
///     .season_ace()
///     .season(2020)
///     .region(Region::Northern)
///     .options(AceOptions::builder().subtropical(false).build())
///     .call();
/// println!("2020 northern hemisphere ACE: {:.1}", ace);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct Ibtracs {
    storms: Vec<Storm>,
    field_set: FieldSet,
    report: LoadReport,
}

#[bon]
impl Ibtracs {
    /// Wraps an existing list of storms. Storms without observations are
    /// dropped; no duplicate resolution is applied.
    pub fn from_storms(storms: Vec<Storm>, field_set: FieldSet) -> Self {
        Self::finish(storms, field_set, LoadReport::default(), false)
    }

    /// Loads a collection.
    ///
    /// # Arguments
    ///
    /// * `.source(SourceKind)`: **Required.** Representation stored at `path`.
    /// * `.path(&Path)`: **Required.** Archive file, parquet file, JSON directory or cache file.
    /// * `.field_set(FieldSet)`: Optional. Fields to parse from the archive; other
    ///   sources carry their own. Defaults to [`FieldSet::Extended`].
    /// * `.resolve_duplicates(bool)`: Optional. Keep only the longest record of each
    ///   duplicate group. Defaults to `true`.
    ///
    /// # Errors
    ///
    /// Failures that concern a single storm are collected in [`Ibtracs::report`]
    /// and never abort the load. Failing to open or read the source itself does.
    #[builder]
    pub fn load(
        source: SourceKind,
        path: &Path,
        #[builder(default)] field_set: FieldSet,
        #[builder(default = true)] resolve_duplicates: bool,
    ) -> Result<Self, IbtracsError> {
        info!("Loading storms from {} source {:?}", source, path);
        let mut report = LoadReport::default();
        let (storms, field_set) = match source {
            SourceKind::Archive => {
                let file =
                    File::open(path).map_err(|e| IbtracsError::ArchiveOpen(path.to_path_buf(), e))?;
                let storms = Self::read_archive(file, field_set, &mut report)
                    .map_err(|e| IbtracsError::ArchiveRead(path.to_path_buf(), e))?;
                (storms, field_set)
            }
            SourceKind::Table => {
                let table = StormTable::read_parquet(path)?;
                (Self::read_table(&table, &mut report)?, table.field_set())
            }
            SourceKind::Json => {
                let (storms, found) = Self::read_json_dir(path, &mut report)?;
                (storms, found.unwrap_or(field_set))
            }
            SourceKind::Cache => Self::read_cache(path)?,
        };
        Ok(Self::finish(storms, field_set, report, resolve_duplicates))
    }

    /// Parses an archive from any reader, resolving duplicates.
    pub fn from_archive_reader<R: Read>(
        reader: R,
        field_set: FieldSet,
    ) -> Result<Self, IbtracsError> {
        let mut report = LoadReport::default();
        let storms = Self::read_archive(reader, field_set, &mut report)
            .map_err(IbtracsError::ArchiveStream)?;
        Ok(Self::finish(storms, field_set, report, true))
    }

    /// Drops storms without observations, then resolves duplicates if asked.
    fn finish(
        storms: Vec<Storm>,
        field_set: FieldSet,
        mut report: LoadReport,
        resolve: bool,
    ) -> Self {
        let (empty, storms): (Vec<Storm>, Vec<Storm>) =
            storms.into_iter().partition(Storm::is_empty);
        for storm in &empty {
            debug!("Storm {} has no synoptic observations", storm.id);
        }
        report.empty += empty.len();

        let storms = if resolve {
            let deduplicated = resolve_duplicates(storms);
            for storm in &deduplicated.discarded {
                warn!(
                    "Discarded duplicate record {} of {} ({} observations)",
                    storm.id,
                    storm.name,
                    storm.len()
                );
            }
            report.duplicates_discarded = deduplicated.discarded.len();
            deduplicated.kept
        } else {
            storms
        };
        report.loaded = storms.len();
        info!(
            "Loaded {} storms ({} empty, {} duplicates discarded, {} failed)",
            report.loaded,
            report.empty,
            report.duplicates_discarded,
            report.failures.len()
        );
        Ibtracs {
            storms,
            field_set,
            report,
        }
    }

    fn read_archive<R: Read>(
        reader: R,
        field_set: FieldSet,
        report: &mut LoadReport,
    ) -> csv::Result<Vec<Storm>> {
        let mut storms = Vec::new();
        for block in ArchiveReader::new(reader) {
            let block = block?;
            match parse_storm(&block.records, field_set) {
                Ok(storm) => storms.push(storm),
                Err(e) => report.fail(
                    format!("{} (archive line {})", block.id, block.first_line),
                    e,
                ),
            }
        }
        Ok(storms)
    }

    fn read_table(table: &StormTable, report: &mut LoadReport) -> Result<Vec<Storm>, IbtracsError> {
        let mut storms = Vec::new();
        for rows in table.partitions()? {
            match storm_from_frame(&rows) {
                Ok(storm) => storms.push(storm),
                Err(e) => {
                    let id = rows
                        .column(COL_ID)
                        .ok()
                        .and_then(|c| c.str().ok().and_then(|s| s.get(0).map(str::to_string)))
                        .unwrap_or_default();
                    report.fail(id, e);
                }
            }
        }
        Ok(storms)
    }

    fn collect_json_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), IbtracsError> {
        let entries = fs::read_dir(dir).map_err(|e| IbtracsError::JsonDirRead(dir.to_path_buf(), e))?;
        for entry in entries {
            let path = entry
                .map_err(|e| IbtracsError::JsonDirRead(dir.to_path_buf(), e))?
                .path();
            if path.is_dir() {
                Self::collect_json_files(&path, files)?;
            } else if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        Ok(())
    }

    /// Every document must share the field set of the first one decoded; the
    /// others are recorded as failures.
    fn read_json_dir(
        dir: &Path,
        report: &mut LoadReport,
    ) -> Result<(Vec<Storm>, Option<FieldSet>), IbtracsError> {
        let mut files = Vec::new();
        Self::collect_json_files(dir, &mut files)?;
        files.sort();
        let mut storms = Vec::with_capacity(files.len());
        let mut field_set = None;
        for file in files {
            let source = file.display().to_string();
            let text = match fs::read_to_string(&file) {
                Ok(text) => text,
                Err(e) => {
                    report.fail(source, IbtracsError::JsonDirRead(file, e));
                    continue;
                }
            };
            let storm = match from_json(&text) {
                Ok(storm) => storm,
                Err(e) => {
                    report.fail(source, e);
                    continue;
                }
            };
            match field_set {
                Some(expected) if expected != storm.field_set => report.fail(
                    source,
                    IbtracsError::MixedFieldSets {
                        id: storm.id,
                        expected,
                        found: storm.field_set,
                    },
                ),
                _ => {
                    field_set = Some(storm.field_set);
                    storms.push(storm);
                }
            }
        }
        Ok((storms, field_set))
    }

    fn read_cache(path: &Path) -> Result<(Vec<Storm>, FieldSet), IbtracsError> {
        let bytes = fs::read(path).map_err(|e| IbtracsError::CacheRead(path.to_path_buf(), e))?;
        let ((field_set, storms), _) =
            bincode::serde::decode_from_slice::<(FieldSet, Vec<Storm>), _>(&bytes, BINCODE_CONFIG)
                .map_err(|e| IbtracsError::CacheDecode(path.to_path_buf(), Box::from(e)))?;
        Ok((storms, field_set))
    }

    pub fn storms(&self) -> &[Storm] {
        &self.storms
    }

    pub fn into_storms(self) -> Vec<Storm> {
        self.storms
    }

    pub fn field_set(&self) -> FieldSet {
        self.field_set
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.storms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storms.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Storm> {
        self.storms.iter()
    }

    /// The storm with the given archive ID.
    pub fn get(&self, id: &str) -> Option<&Storm> {
        self.storms.iter().find(|s| s.id == id)
    }

    /// Looks a storm up by name (case-insensitive), season and genesis basin.
    pub fn find(&self, name: &str, season: i32, basin: Basin) -> Result<&Storm, IbtracsError> {
        let name = name.to_uppercase();
        self.storms
            .iter()
            .find(|s| s.name == name && s.season() == Some(season) && s.basin() == Some(basin))
            .ok_or(IbtracsError::NotFound {
                name,
                season,
                basin,
            })
    }

    /// Storms of one season whose genesis basin lies in `region`.
    pub fn season_storms(&self, season: i32, region: Region) -> impl Iterator<Item = &Storm> {
        self.storms.iter().filter(move |s| {
            s.season() == Some(season) && s.basin().is_some_and(|b| region.contains(b))
        })
    }

    /// Storms whose hourly-interpolated track passes through `bbox`.
    pub fn intersecting<'a>(&'a self, bbox: &'a BoundingBox) -> impl Iterator<Item = &'a Storm> {
        self.storms.iter().filter(move |s| s.intersects(bbox))
    }

    /// Total ACE of a season.
    ///
    /// * `.season(i32)`: **Required.**
    /// * `.region(Region)`: Optional. Defaults to [`Region::Global`].
    /// * `.options(AceOptions)`: Optional. Defaults to [`AceOptions::default`].
    #[builder]
    pub fn season_ace(
        &self,
        season: i32,
        #[builder(default)] region: Region,
        #[builder(default)] options: AceOptions,
    ) -> f64 {
        self.season_storms(season, region)
            .map(|s| s.ace(&options))
            .sum()
    }

    /// Per-storm ACE of a season, largest first.
    #[builder]
    pub fn season_ace_by_storm(
        &self,
        season: i32,
        #[builder(default)] region: Region,
        #[builder(default)] options: AceOptions,
    ) -> Vec<StormAce> {
        let mut by_storm: Vec<StormAce> = self
            .season_storms(season, region)
            .map(|s| StormAce {
                id: s.id.clone(),
                name: s.name.clone(),
                ace: s.ace(&options),
            })
            .collect();
        by_storm.sort_by_key(|s| std::cmp::Reverse(OrderedFloat(s.ace)));
        by_storm
    }

    /// The collection as a relational table.
    pub fn to_table(&self) -> Result<StormTable, IbtracsError> {
        Ok(StormTable::from_storms(&self.storms, self.field_set)?)
    }

    pub fn save_table(&self, path: &Path) -> Result<(), IbtracsError> {
        Ok(self.to_table()?.write_parquet(path)?)
    }

    /// Path of a storm's document below a JSON export root:
    /// `{basin}/{season}/{lowercase name}_{id}.json`.
    pub fn json_path(root: &Path, storm: &Storm) -> Option<PathBuf> {
        let basin = storm.basin()?;
        let season = storm.season()?;
        Some(
            root.join(basin.code())
                .join(season.to_string())
                .join(format!("{}_{}.json", storm.name.to_lowercase(), storm.id)),
        )
    }

    /// Writes one JSON document per storm below `root`. Storms without
    /// observations have no basin or season and are skipped. Returns how many
    /// documents were written.
    pub fn save_json_dir(&self, root: &Path) -> Result<usize, IbtracsError> {
        let mut written = 0;
        for storm in &self.storms {
            let Some(path) = Self::json_path(root, storm) else {
                debug!("Storm {} has no genesis, not exported", storm.id);
                continue;
            };
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| IbtracsError::JsonWrite(parent.to_path_buf(), e))?;
            }
            fs::write(&path, to_json_pretty(storm)?)
                .map_err(|e| IbtracsError::JsonWrite(path.clone(), e))?;
            written += 1;
        }
        info!("Wrote {} JSON documents below {:?}", written, root);
        Ok(written)
    }

    /// Writes a binary snapshot of the whole collection.
    pub fn save_cache(&self, path: &Path) -> Result<(), IbtracsError> {
        let bytes = bincode::serde::encode_to_vec((self.field_set, &self.storms), BINCODE_CONFIG)
            .map_err(|e| IbtracsError::CacheEncode(Box::new(e)))?;
        fs::write(path, &bytes).map_err(|e| IbtracsError::CacheWrite(path.to_path_buf(), e))?;
        info!("Wrote cache ({} bytes) to {:?}", bytes.len(), path);
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Ibtracs {
    type Item = &'a Storm;
    type IntoIter = std::slice::Iter<'a, Storm>;

    fn into_iter(self) -> Self::IntoIter {
        self.storms.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::json::to_json;
    use crate::test_support::{archive_line, storm_with_winds, LineSpec};
    use crate::types::observation::ExtendedObservation;
    use crate::types::storm::UNNAMED;
    use std::error::Error;
    use std::io::Write;

    const HEADER: &str = "SID,SEASON,NUMBER,BASIN,SUBBASIN,NAME,ISO_TIME,NATURE,LAT,LON\n \
                          ,Year, , , , ,,,degrees_north,degrees_east\n";

    fn archive() -> String {
        let mut text = HEADER.to_string();
        let mut push = |spec: LineSpec<'_>| {
            text.push_str(&archive_line(&spec));
            text.push('\n');
        };
        // ANA, two records of the same storm; the second is longer.
        for time in ["2020-05-22 00:00:00", "2020-05-22 06:00:00"] {
            push(LineSpec {
                time,
                wind: "45",
                ..Default::default()
            });
        }
        for time in ["2020-05-22 00:00:00", "2020-05-22 06:00:00", "2020-05-22 12:00:00"] {
            push(LineSpec {
                id: "2020143N25281",
                time,
                wind: "50",
                ..Default::default()
            });
        }
        // A storm whose only line is off-synoptic.
        push(LineSpec {
            id: "2020150N10300",
            name: UNNAMED,
            time: "2020-05-29 03:00:00",
            ..Default::default()
        });
        // A storm with a malformed latitude.
        push(LineSpec {
            id: "2020160N20270",
            name: "BOB",
            lat: "north",
            ..Default::default()
        });
        text
    }

    #[test]
    fn test_source_kind_parsing() {
        assert_eq!("csv".parse::<SourceKind>().ok(), Some(SourceKind::Archive));
        assert_eq!("db".parse::<SourceKind>().ok(), Some(SourceKind::Table));
        assert_eq!("JSON".parse::<SourceKind>().ok(), Some(SourceKind::Json));
        assert!(matches!(
            "xls".parse::<SourceKind>(),
            Err(IbtracsError::UnknownSource(s)) if s == "xls"
        ));
    }

    #[test]
    fn test_archive_load_isolates_failures() -> Result<(), Box<dyn Error>> {
        let ibtracs = Ibtracs::from_archive_reader(archive().as_bytes(), FieldSet::Extended)?;
        let report = ibtracs.report();
        assert_eq!(ibtracs.len(), 1);
        assert_eq!(report.loaded, 1);
        assert_eq!(report.empty, 1);
        assert_eq!(report.duplicates_discarded, 1);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].source.starts_with("2020160N20270"));
        assert!(matches!(report.failures[0].error, IbtracsError::Parse(_)));

        let ana = ibtracs.find("ana", 2020, Basin::NorthAtlantic)?;
        assert_eq!(ana.id, "2020143N25281");
        assert_eq!(ana.len(), 3);
        assert!(matches!(
            ibtracs.find("ANA", 2019, Basin::NorthAtlantic),
            Err(IbtracsError::NotFound { season: 2019, .. })
        ));
        Ok(())
    }

    #[test]
    fn test_load_from_file() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("archive.csv");
        File::create(&path)?.write_all(archive().as_bytes())?;

        let ibtracs = Ibtracs::load()
            .source(SourceKind::Archive)
            .path(&path)
            .resolve_duplicates(false)
            .call()?;
        assert_eq!(ibtracs.len(), 2);
        assert_eq!(ibtracs.field_set(), FieldSet::Extended);

        let missing = Ibtracs::load()
            .source(SourceKind::Archive)
            .path(&dir.path().join("missing.csv"))
            .call();
        assert!(matches!(missing, Err(IbtracsError::ArchiveOpen(..))));
        Ok(())
    }

    fn collection() -> Ibtracs {
        let mut southern = storm_with_winds("BETSY", Basin::SouthPacific, &[60.0, 70.0]);
        for observation in southern.observations.iter_mut() {
            observation.lat = -observation.lat;
        }
        Ibtracs::from_storms(
            vec![
                storm_with_winds("ANA", Basin::NorthAtlantic, &[40.0, 50.0]),
                storm_with_winds("CRIS", Basin::EasternPacific, &[100.0]),
                southern,
            ],
            FieldSet::Basic,
        )
    }

    #[test]
    fn test_season_ace() {
        let ibtracs = collection();
        let close = |a: f64, b: f64| (a - b).abs() < 1e-9;
        assert!(close(ibtracs.season_ace().season(2020).call(), 0.41 + 1.0 + 0.85));
        assert!(close(
            ibtracs.season_ace().season(2020).region(Region::Northern).call(),
            1.41
        ));
        assert!(close(
            ibtracs.season_ace().season(2020).region(Region::Southern).call(),
            0.85
        ));
        assert!(close(
            ibtracs
                .season_ace()
                .season(2020)
                .region(Region::Basin(Basin::NorthAtlantic))
                .call(),
            0.41
        ));
        assert_eq!(ibtracs.season_ace().season(1999).call(), 0.0);

        let ranked = ibtracs.season_ace_by_storm().season(2020).call();
        let names: Vec<_> = ranked.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["CRIS", "BETSY", "ANA"]);
    }

    #[test]
    fn test_intersecting() {
        let ibtracs = collection();
        let bbox = BoundingBox::new(-30.0, -20.0, 270.0, 290.0);
        let hits: Vec<_> = ibtracs.intersecting(&bbox).map(|s| s.name.as_str()).collect();
        assert_eq!(hits, ["BETSY"]);
    }

    #[test]
    fn test_table_json_and_cache_round_trips() -> Result<(), Box<dyn Error>> {
        let ibtracs = collection();
        let dir = tempfile::tempdir()?;

        let table_path = dir.path().join("storms.parquet");
        ibtracs.save_table(&table_path)?;
        let from_table = Ibtracs::load()
            .source(SourceKind::Table)
            .path(&table_path)
            .call()?;

        let json_root = dir.path().join("json");
        assert_eq!(ibtracs.save_json_dir(&json_root)?, 3);
        assert!(json_root.join("NA/2020/ana_2020143N25280_ANA.json").is_file());
        let from_json = Ibtracs::load()
            .source(SourceKind::Json)
            .path(&json_root)
            .call()?;

        let cache_path = dir.path().join("storms.bin");
        ibtracs.save_cache(&cache_path)?;
        let from_cache = Ibtracs::load()
            .source(SourceKind::Cache)
            .path(&cache_path)
            .call()?;

        for loaded in [&from_table, &from_json, &from_cache] {
            assert_eq!(loaded.len(), 3);
            assert_eq!(loaded.field_set(), FieldSet::Basic);
            assert!(loaded.report().failures.is_empty());
            for storm in &ibtracs {
                let other = loaded.get(&storm.id).ok_or("storm missing after reload")?;
                assert!(other.is_identical_to(storm));
            }
        }
        Ok(())
    }

    #[test]
    fn test_json_dir_reports_bad_documents() -> Result<(), Box<dyn Error>> {
        let ibtracs = collection();
        let dir = tempfile::tempdir()?;
        ibtracs.save_json_dir(dir.path())?;
        fs::write(dir.path().join("broken.json"), "{\"id\": 1}")?;

        let loaded = Ibtracs::load()
            .source(SourceKind::Json)
            .path(dir.path())
            .call()?;
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded.report().failures.len(), 1);
        assert!(loaded.report().failures[0].source.ends_with("broken.json"));
        Ok(())
    }

    #[test]
    fn test_empty_storms_are_dropped_from_every_source() -> Result<(), Box<dyn Error>> {
        let empty = storm_with_winds("EMPTY", Basin::NorthAtlantic, &[]);
        let ana = storm_with_winds("ANA", Basin::NorthAtlantic, &[40.0, 50.0]);
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("ana.json"), to_json(&ana)?)?;
        fs::write(dir.path().join("empty.json"), to_json(&empty)?)?;

        let loaded = Ibtracs::load()
            .source(SourceKind::Json)
            .path(dir.path())
            .call()?;
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.report().empty, 1);
        assert!(loaded.get(&empty.id).is_none());

        let wrapped = Ibtracs::from_storms(vec![empty, ana], FieldSet::Basic);
        assert_eq!(wrapped.len(), 1);
        assert_eq!(wrapped.report().empty, 1);
        assert_eq!(wrapped.report().loaded, 1);
        Ok(())
    }

    #[test]
    fn test_json_dir_rejects_mixed_field_sets() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        collection().save_json_dir(dir.path())?;

        let mut dora = storm_with_winds("DORA", Basin::NorthAtlantic, &[50.0]);
        dora.field_set = FieldSet::Extended;
        for observation in dora.observations.iter_mut() {
            observation.extended = Some(ExtendedObservation::MISSING);
        }
        fs::write(dir.path().join("zz_dora.json"), to_json(&dora)?)?;

        let loaded = Ibtracs::load()
            .source(SourceKind::Json)
            .path(dir.path())
            .call()?;
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded.field_set(), FieldSet::Basic);
        assert_eq!(loaded.report().failures.len(), 1);
        assert!(matches!(
            &loaded.report().failures[0].error,
            IbtracsError::MixedFieldSets { id, expected: FieldSet::Basic, found: FieldSet::Extended }
                if id == &dora.id
        ));
        loaded.to_table()?;
        Ok(())
    }
}
