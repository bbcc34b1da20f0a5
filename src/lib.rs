//! This crate splits a text file composed of line records into one file per category, each
//! file sorted by an integer key. For example a CSV file of employees can be split into one
//! file per department, sorted by employee number.
//!
//! The first line of the input is a header. It is repeated as the first line of every output
//! file. Lines that do not have the expected number of fields are skipped, a key that is not an
//! integer fails the run. Records with equal keys keep their input order.
//!
//! All records are held in memory between reading and writing, the input must fit in memory.
//! Output files are opened lazily, the first time a category is seen, and all of them are closed
//! when the run ends, including runs that fail.
//!
//! # Examples
//! ```no_run
//! use std::path::PathBuf;
//! use text_file_split::split::Split;
//!
//! fn split_by_department(input: PathBuf, output_dir: PathBuf) -> Result<(), anyhow::Error> {
//!     let mut split = Split::new(input, output_dir);
//!
//!     // set the field separator, the default is a comma
//!     split.with_field_separator(',');
//!
//!     // the files are named <department>.csv
//!     split.with_extension("csv");
//!
//!     let report = split.split()?;
//!     log::info!("records: {}, skipped: {}", report.records(), report.skipped());
//!     Ok(())
//! }
//! ```
//!

pub(crate) mod config;
pub(crate) mod destination;
pub(crate) mod line_record;

pub mod error;
pub mod generator;
pub mod line_ending;
pub mod phase;
pub mod split;
