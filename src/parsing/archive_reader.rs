//! Streams an archive record by record, yielding one block of records per storm.
//!
//! Records for a storm are contiguous in the archive, so only the current
//! storm's records are held in memory at any time.

use crate::parsing::archive_line::FIELD_ID;
use csv::{StringRecord, StringRecordsIntoIter, Trim};
use std::io::Read;

/// Records preceding the data: column names, then units.
pub const DEFAULT_HEADER_LINES: usize = 2;

/// All raw records of one storm, in archive order.
#[derive(Debug, Clone)]
pub struct StormBlock {
    pub id: String,
    /// 1-based archive line number of the block's first record.
    pub first_line: usize,
    pub records: Vec<StringRecord>,
}

/// Iterator over the [`StormBlock`]s of an archive.
///
/// # Examples
///
/// ```
/// use ibtracs::ArchiveReader;
///
/// let archive = "SID,NAME\n ,\nA,X\nA,X\nB,Y\n";
/// let ids: Vec<String> = ArchiveReader::new(archive.as_bytes())
///     .map(|block| block.map(|b| b.id))
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(ids, ["A", "B"]);
/// ```
pub struct ArchiveReader<R> {
    records: StringRecordsIntoIter<R>,
    header_lines: usize,
    pending: Option<(StringRecord, usize)>,
}

/// The CSV dialect of the archive: no header handling, ragged rows allowed,
/// every field trimmed.
pub fn archive_reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(false).flexible(true).trim(Trim::All);
    builder
}

fn block_id(record: &StringRecord) -> &str {
    record.get(FIELD_ID).unwrap_or_default()
}

impl<R: Read> ArchiveReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_header_lines(reader, DEFAULT_HEADER_LINES)
    }

    pub fn with_header_lines(reader: R, header_lines: usize) -> Self {
        ArchiveReader {
            records: archive_reader_builder().from_reader(reader).into_records(),
            header_lines,
            pending: None,
        }
    }

    /// Next data record that holds any value, with its line number.
    fn next_record(&mut self) -> Option<csv::Result<(StringRecord, usize)>> {
        while self.header_lines > 0 {
            self.header_lines -= 1;
            if let Err(e) = self.records.next()? {
                return Some(Err(e));
            }
        }
        loop {
            let record = match self.records.next()? {
                Ok(record) => record,
                Err(e) => return Some(Err(e)),
            };
            if record.iter().all(str::is_empty) {
                continue;
            }
            let line = record.position().map_or(0, |p| p.line() as usize);
            return Some(Ok((record, line)));
        }
    }
}

impl<R: Read> Iterator for ArchiveReader<R> {
    type Item = csv::Result<StormBlock>;

    fn next(&mut self) -> Option<Self::Item> {
        let (record, first_line) = match self.pending.take() {
            Some(pending) => pending,
            None => match self.next_record()? {
                Ok(first) => first,
                Err(e) => return Some(Err(e)),
            },
        };
        let mut block = StormBlock {
            id: block_id(&record).to_string(),
            first_line,
            records: vec![record],
        };
        while let Some(next) = self.next_record() {
            match next {
                Ok((record, _)) if block_id(&record) == block.id => block.records.push(record),
                Ok(other) => {
                    self.pending = Some(other);
                    break;
                }
                Err(e) => return Some(Err(e)),
            }
        }
        Some(Ok(block))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARCHIVE: &str = "SID,SEASON,NUMBER\n\
                           ,Year,\n\
                           A,2020,1\n\
                           A , 2020 ,1\n\
                           \n\
                           B,2020,2\n\
                           A,2020,3\n";

    #[test]
    fn test_groups_contiguous_records() -> csv::Result<()> {
        let blocks = ArchiveReader::new(ARCHIVE.as_bytes()).collect::<csv::Result<Vec<_>>>()?;
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].id, "A");
        assert_eq!(blocks[0].records.len(), 2);
        assert_eq!(blocks[0].records[1].get(1), Some("2020"));
        assert_eq!(blocks[0].first_line, 3);
        assert_eq!(blocks[1].id, "B");
        assert!(blocks[1].first_line > blocks[0].first_line);
        // A storm ID reappearing after another storm starts a new block.
        assert_eq!(blocks[2].id, "A");
        assert_eq!(blocks[2].records[0].get(2), Some("3"));
        Ok(())
    }

    #[test]
    fn test_header_only_archive_is_empty() {
        let mut reader = ArchiveReader::new("SID\nunits\n".as_bytes());
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_custom_header_length_and_blank_records() -> csv::Result<()> {
        let blocks = ArchiveReader::with_header_lines("X,1\n , \nX,2\n".as_bytes(), 0)
            .collect::<csv::Result<Vec<_>>>()?;
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].records.len(), 2);
        Ok(())
    }

    #[test]
    fn test_quoted_fields_keep_commas() -> csv::Result<()> {
        let blocks = ArchiveReader::with_header_lines("X,\"A, B\"\n".as_bytes(), 0)
            .collect::<csv::Result<Vec<_>>>()?;
        assert_eq!(blocks[0].records[0].get(1), Some("A, B"));
        Ok(())
    }
}
