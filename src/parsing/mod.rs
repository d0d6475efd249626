pub mod archive_line;
pub mod archive_reader;
pub mod error;
pub mod record_parser;
