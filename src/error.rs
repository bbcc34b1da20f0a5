//! Errors reported by a split run.
//!
//! Rows with the wrong number of columns are not errors, the parser drops them. Every
//! variant here is terminal for the run except [SplitError::CloseDestination], which is
//! reported after all destinations had their chance to close.

use std::io;
use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Failed to create output directory: {path}")]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to open input file: {path}")]
    OpenInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read input file: {path}, line: {line}")]
    ReadInput {
        path: PathBuf,
        line: usize,
        #[source]
        source: io::Error,
    },

    #[error("Invalid sort key {value:?} at line {line}")]
    KeyParse {
        line: usize,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Category {category:?} cannot be used as a file name")]
    InvalidCategory { category: String },

    #[error("Failed to open destination: {path}")]
    OpenDestination {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write destination: {path}")]
    WriteDestination {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to close destination: {path}")]
    CloseDestination {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
