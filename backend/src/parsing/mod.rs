//! Shot table ingest.

pub mod csv_parser;


pub use csv_parser::{parse_shots_csv, parse_shots_csv_str, parse_shots_reader};
