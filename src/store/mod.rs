//! In-memory relational store of storm rows, backed by a single polars
//! [`DataFrame`] and persisted as parquet.
//!
//! Rows are laid out by [`storm_to_frame`]; storms without observations have
//! no rows and are not stored.

pub mod error;

use crate::codec::frame::{storm_from_frame, storm_to_frame};
use crate::store::error::StoreError;
use crate::types::basin::Basin;
use crate::types::schema::{FieldSet, ObservationField, COL_BASIN, COL_ID, COL_NAME, COL_SEASON};
use crate::types::storm::Storm;
use log::{debug, info};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct StormTable {
    frame: DataFrame,
    field_set: FieldSet,
}

fn by_time() -> (Vec<PlSmallStr>, SortMultipleOptions) {
    (
        vec![ObservationField::Time.name().into()],
        SortMultipleOptions::default().with_maintain_order(true),
    )
}

impl StormTable {
    pub fn new(field_set: FieldSet) -> Self {
        StormTable {
            frame: DataFrame::empty(),
            field_set,
        }
    }

    /// Builds a table holding every non-empty storm of `storms`.
    pub fn from_storms<'a>(
        storms: impl IntoIterator<Item = &'a Storm>,
        field_set: FieldSet,
    ) -> Result<Self, StoreError> {
        let mut table = StormTable::new(field_set);
        for storm in storms {
            table.insert(storm)?;
        }
        Ok(table)
    }

    pub fn field_set(&self) -> FieldSet {
        self.field_set
    }

    /// All rows, in insertion order.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn row_count(&self) -> usize {
        self.frame.height()
    }

    /// Appends a storm's rows. Returns `false` if the storm has no
    /// observations and was skipped.
    pub fn insert(&mut self, storm: &Storm) -> Result<bool, StoreError> {
        if storm.field_set != self.field_set {
            return Err(StoreError::FieldSetMismatch {
                id: storm.id.clone(),
                expected: self.field_set,
                found: storm.field_set,
            });
        }
        if storm.is_empty() {
            debug!("Storm {} has no observations, not stored", storm.id);
            return Ok(false);
        }
        let rows = storm_to_frame(storm)?;
        if self.frame.width() == 0 {
            self.frame = rows;
        } else {
            self.frame.vstack_mut(&rows)?;
        }
        Ok(true)
    }

    fn filtered(&self, predicate: Expr) -> Result<DataFrame, StoreError> {
        if self.frame.width() == 0 {
            return Ok(DataFrame::empty());
        }
        let (by, options) = by_time();
        Ok(self
            .frame
            .clone()
            .lazy()
            .filter(predicate)
            .sort(by, options)
            .collect()?)
    }

    /// Every row of one storm, ordered by time. Empty if the ID is unknown.
    pub fn rows_for_id(&self, id: &str) -> Result<DataFrame, StoreError> {
        self.filtered(col(COL_ID).eq(lit(id)))
    }

    /// The storm with the given archive ID.
    pub fn storm(&self, id: &str) -> Result<Storm, StoreError> {
        let rows = self.rows_for_id(id)?;
        if rows.height() == 0 {
            return Err(StoreError::IdNotFound(id.to_string()));
        }
        Ok(storm_from_frame(&rows)?)
    }

    /// Looks a storm up by name (case-insensitive), season and genesis basin.
    ///
    /// If several stored storms match, the one with the earliest observation
    /// time is returned.
    pub fn find(&self, name: &str, season: i32, basin: Basin) -> Result<Storm, StoreError> {
        let name = name.to_uppercase();
        let rows = self.filtered(
            col(COL_NAME)
                .eq(lit(name.as_str()))
                .and(col(COL_SEASON).eq(lit(season)))
                .and(col(COL_BASIN).eq(lit(basin.code()))),
        )?;
        let not_found = || StoreError::NotFound {
            name: name.clone(),
            season,
            basin,
        };
        if rows.height() == 0 {
            return Err(not_found());
        }
        let id = rows
            .column(COL_ID)?
            .str()?
            .get(0)
            .ok_or_else(not_found)?
            .to_string();
        self.storm(&id)
    }

    /// Rows split per storm ID, in insertion order, each ordered by time.
    pub fn partitions(&self) -> Result<Vec<DataFrame>, StoreError> {
        if self.frame.height() == 0 {
            return Ok(Vec::new());
        }
        let (by, options) = by_time();
        self.frame
            .partition_by_stable([COL_ID], true)?
            .into_iter()
            .map(|rows| -> Result<DataFrame, StoreError> {
                Ok(rows.sort(by.clone(), options.clone())?)
            })
            .collect()
    }

    /// Reconstructs every stored storm, in insertion order.
    pub fn storms(&self) -> Result<Vec<Storm>, StoreError> {
        self.partitions()?
            .iter()
            .map(|rows| -> Result<Storm, StoreError> { Ok(storm_from_frame(rows)?) })
            .collect()
    }

    pub fn write_parquet(&self, path: &Path) -> Result<(), StoreError> {
        let file = File::create(path).map_err(|e| StoreError::ParquetWriteIo(path.to_path_buf(), e))?;
        ParquetWriter::new(file)
            .with_compression(ParquetCompression::Snappy)
            .finish(&mut self.frame.clone())
            .map_err(|e| StoreError::ParquetWritePolars(path.to_path_buf(), e))?;
        info!("Wrote {} rows to {:?}", self.row_count(), path);
        Ok(())
    }

    /// Loads a table written by [`StormTable::write_parquet`]. The field set is
    /// taken from the columns present.
    pub fn read_parquet(path: &Path) -> Result<Self, StoreError> {
        let file = File::open(path).map_err(|e| StoreError::ParquetReadIo(path.to_path_buf(), e))?;
        let frame = ParquetReader::new(file)
            .finish()
            .map_err(|e| StoreError::ParquetReadPolars(path.to_path_buf(), e))?;
        let field_set = if frame
            .get_column_index(ObservationField::Dist2Land.name())
            .is_some()
        {
            FieldSet::Extended
        } else {
            FieldSet::Basic
        };
        info!("Read {} rows from {:?}", frame.height(), path);
        Ok(StormTable { frame, field_set })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::genesis::resolve_genesis;
    use crate::test_support::storm_with_winds;
    use chrono::Duration;
    use std::error::Error;

    fn table() -> Result<StormTable, StoreError> {
        let storms = [
            storm_with_winds("ANA", Basin::NorthAtlantic, &[35.0, 45.0]),
            storm_with_winds("BOB", Basin::NorthAtlantic, &[30.0, 40.0, 50.0]),
            storm_with_winds("CRIS", Basin::EasternPacific, &[60.0]),
        ];
        StormTable::from_storms(&storms, FieldSet::Basic)
    }

    #[test]
    fn test_lookup_by_id() -> Result<(), Box<dyn Error>> {
        let table = table()?;
        assert_eq!(table.row_count(), 6);
        let rows = table.rows_for_id("2020143N25280_BOB")?;
        assert_eq!(rows.height(), 3);
        let storm = table.storm("2020143N25280_BOB")?;
        assert_eq!(storm.name, "BOB");
        assert_eq!(storm.len(), 3);
        assert!(matches!(
            table.storm("nope"),
            Err(StoreError::IdNotFound(_))
        ));
        Ok(())
    }

    #[test]
    fn test_find_by_name_season_basin() -> Result<(), Box<dyn Error>> {
        let table = table()?;
        let storm = table.find("cris", 2020, Basin::EasternPacific)?;
        assert_eq!(storm.id, "2020143N25280_CRIS");

        let missing = table.find("CRIS", 2020, Basin::NorthAtlantic);
        assert!(matches!(
            missing,
            Err(StoreError::NotFound { ref name, season: 2020, basin: Basin::NorthAtlantic }) if name == "CRIS"
        ));
        Ok(())
    }

    #[test]
    fn test_find_prefers_earliest_observation() -> Result<(), Box<dyn Error>> {
        let mut later = storm_with_winds("ANA", Basin::NorthAtlantic, &[40.0, 50.0]);
        later.id = "later".to_string();
        for observation in later.observations.iter_mut() {
            observation.time += Duration::hours(12);
        }
        later.genesis = resolve_genesis(&later.observations);
        let mut earlier = storm_with_winds("ANA", Basin::NorthAtlantic, &[45.0]);
        earlier.id = "earlier".to_string();

        let table = StormTable::from_storms([&later, &earlier], FieldSet::Basic)?;
        assert_eq!(table.find("ANA", 2020, Basin::NorthAtlantic)?.id, "earlier");
        Ok(())
    }

    #[test]
    fn test_storms_round_trip_through_parquet() -> Result<(), Box<dyn Error>> {
        let table = table()?;
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("storms.parquet");
        table.write_parquet(&path)?;

        let loaded = StormTable::read_parquet(&path)?;
        assert_eq!(loaded.field_set(), FieldSet::Basic);
        let storms = loaded.storms()?;
        let names: Vec<_> = storms.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["ANA", "BOB", "CRIS"]);
        assert!(storms[1].is_identical_to(&storm_with_winds(
            "BOB",
            Basin::NorthAtlantic,
            &[30.0, 40.0, 50.0]
        )));
        Ok(())
    }

    #[test]
    fn test_insert_rules() -> Result<(), Box<dyn Error>> {
        let mut table = StormTable::new(FieldSet::Extended);
        let basic = storm_with_winds("ANA", Basin::NorthAtlantic, &[35.0]);
        assert!(matches!(
            table.insert(&basic),
            Err(StoreError::FieldSetMismatch { .. })
        ));

        let mut empty = storm_with_winds("ANA", Basin::NorthAtlantic, &[]);
        empty.field_set = FieldSet::Extended;
        assert!(!table.insert(&empty)?);
        assert_eq!(table.row_count(), 0);
        assert!(table.storms()?.is_empty());
        assert_eq!(table.rows_for_id("x")?.height(), 0);
        Ok(())
    }
}
