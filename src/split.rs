use std::cmp::{max, min};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use regex::Regex;
use rlimit::{getrlimit, Resource, setrlimit};

use crate::config::Config;
use crate::destination::Destinations;
use crate::error::SplitError;
use crate::line_ending::LineEnding;
use crate::line_record::LineRecord;
use crate::phase::Phase;

// descriptors kept free for the input file, stdio and whatever the caller holds
const RESERVED_FILES: u64 = 256;

/// Split a delimited text file into one file per category, each sorted by a numeric key.
///
/// The first line of the input is a header and is repeated as the first line of every
/// output file. All accepted records are held in memory between reading and writing.
///
/// # Examples
/// ```no_run
/// use std::path::PathBuf;
/// use text_file_split::split::Split;
///
/// fn split_employees(input: PathBuf, output_dir: PathBuf) -> Result<(), anyhow::Error> {
///     let mut split = Split::new(input, output_dir);
///     // department is the first field and the employee number the second, which is
///     // also the default
///     split.with_category_field(1);
///     split.with_key_field(2);
///     let report = split.split()?;
///     println!("{} records in {} files", report.records(), report.destinations().len());
///     Ok(())
/// }
/// ```
pub struct Split {
    input: PathBuf,
    output_dir: PathBuf,
    field_separator: char,
    columns: usize,
    category_field: usize,
    key_field: usize,
    extension: String,
    line_ending: LineEnding,
    ignore_empty: bool,
    ignore_lines: Option<Regex>,
    create_output_dir: bool,
    flush_each_record: bool,
}

impl Split {
    /// Create a default Split definition.
    ///
    /// * The default field separator is a comma (',')
    /// * Every record has exactly 4 fields, other lines are skipped
    /// * The category is field 1 and the integer sort key is field 2
    /// * Output files are named `<category>.csv`
    /// * Output lines end with '\n'
    /// * No lines are ignored besides the ones with the wrong number of fields
    /// * The output directory is created when missing
    /// * Every output line is flushed as soon as it is written
    pub fn new(input: PathBuf, output_dir: PathBuf) -> Split {
        Split {
            input,
            output_dir,
            field_separator: ',',
            columns: 4,
            category_field: 1,
            key_field: 2,
            extension: "csv".to_string(),
            line_ending: LineEnding::Lf,
            ignore_empty: false,
            ignore_lines: None,
            create_output_dir: true,
            flush_each_record: true,
        }
    }

    /// Set the field separator. The default is ','
    pub fn with_field_separator(&mut self, field_separator: char) {
        self.field_separator = field_separator
    }

    /// Set the number of fields in a record. Lines with a different number of fields are
    /// skipped. The default is 4
    pub fn with_columns(&mut self, columns: usize) {
        self.columns = columns
    }

    /// Set the index of the category field, starting at 1. The default is 1
    pub fn with_category_field(&mut self, category_field: usize) {
        self.category_field = category_field
    }

    /// Set the index of the integer sort key field, starting at 1. The default is 2
    pub fn with_key_field(&mut self, key_field: usize) {
        self.key_field = key_field
    }

    /// Set the extension of the output files. The default is "csv"
    pub fn with_extension(&mut self, extension: &str) {
        self.extension = extension.to_string()
    }

    /// Set the line ending of the output files. The default is [LineEnding::Lf]
    pub fn with_line_ending(&mut self, line_ending: LineEnding) {
        self.line_ending = line_ending
    }

    /// Direct the algorithm to ignore empty lines. The default is false
    pub fn with_ignore_empty(&mut self) {
        self.ignore_empty = true;
    }

    /// Specify which lines to ignore. Each line matching the regex will be ignored and will not
    /// appear in the output.
    pub fn with_ignore_lines(&mut self, r: Regex) {
        self.ignore_lines = Some(r)
    }

    /// Create the output directory when it does not exist. The default is true
    pub fn with_create_output_dir(&mut self, create_output_dir: bool) {
        self.create_output_dir = create_output_dir
    }

    /// Flush every output line as soon as it is written. The default is true. Turning it
    /// off trades memory held by open writers for throughput.
    pub fn with_flush_each_record(&mut self, flush_each_record: bool) {
        self.flush_each_record = flush_each_record
    }

    /// Split the input file into the output directory
    pub fn split(&self) -> Result<SplitReport, anyhow::Error> {
        let config = self.create_config()?;
        if self.create_output_dir {
            if let Err(e) = Self::create_output_dir(config.output_dir()) {
                log::error!("{:#}", anyhow!(e));
            }
        }
        Self::internal_split(&self.input, &config)
    }

    fn create_config(&self) -> Result<Config, anyhow::Error> {
        let config = Config::new(
            self.output_dir.clone(),
            self.field_separator,
            self.columns,
            self.category_field,
            self.key_field,
            self.extension.clone(),
            self.line_ending,
            self.ignore_empty,
            self.ignore_lines.clone(),
            self.flush_each_record,
        )?;
        Ok(config)
    }

    fn create_output_dir(output_dir: &Path) -> Result<(), SplitError> {
        if !output_dir.exists() {
            std::fs::create_dir_all(output_dir)
                .map_err(|source| SplitError::CreateOutputDir { path: output_dir.to_path_buf(), source })?;
            log::info!("Created output directory: {}", output_dir.display());
        }
        Ok(())
    }

    fn internal_split(input: &Path, config: &Config) -> Result<SplitReport, anyhow::Error> {
        log::info!("Start split, input: {}, output: {}", input.display(), config.output_dir().display());
        let mut phase = Phase::Idle;
        let mut report = SplitReport::default();
        let mut destinations = Destinations::new(config.output_dir());
        let mut limits = None;

        let result = Self::run(input, config, &mut phase, &mut report, &mut destinations, &mut limits);

        let failed_phase = phase;
        Self::enter(&mut phase, Phase::Closing);
        report.destinations = destinations.paths();
        report.close_failures = destinations.close().len();
        if let Some((soft, hard)) = limits {
            log::info!("Restore rlimit NOFILE, soft: {}, hard: {}", soft, hard);
            if let Err(e) = Self::set_rlimits(soft, hard) {
                log::error!("{:#}", e);
            }
        }

        match result {
            Ok(()) => {
                Self::enter(&mut phase, Phase::Completed);
                log::info!(
                    "Finish split, records: {}, skipped: {}, files: {}",
                    report.records,
                    report.skipped,
                    report.destinations.len()
                );
                Ok(report)
            }
            Err(e) => {
                Self::enter(&mut phase, Phase::Failed);
                Err(e.context(format!("input: {}, phase: {}", input.display(), failed_phase)))
            }
        }
    }

    fn enter(phase: &mut Phase, next: Phase) {
        log::debug!("Split phase: {} -> {}", phase, next);
        *phase = next;
    }

    fn run(
        input: &Path,
        config: &Config,
        phase: &mut Phase,
        report: &mut SplitReport,
        destinations: &mut Destinations,
        limits: &mut Option<(u64, u64)>,
    ) -> Result<(), anyhow::Error> {
        Self::enter(phase, Phase::ReadingHeader);
        let file = File::open(input)
            .map_err(|source| SplitError::OpenInput { path: input.to_path_buf(), source })?;
        let mut reader = BufReader::new(file);
        let header = match Self::read_line(&mut reader, input, 1)? {
            None => {
                log::info!("Input is empty: {}", input.display());
                return Ok(());
            }
            Some(header) => header,
        };
        report.header = true;

        Self::enter(phase, Phase::Reading);
        let mut records = Self::read_records(&mut reader, input, config, report)?;

        Self::enter(phase, Phase::Sorting);
        // stable, records with equal keys keep their input order
        records.sort();

        Self::enter(phase, Phase::Writing);
        let categories = records.iter()
            .map(|record| record.category())
            .collect::<HashSet<&str>>()
            .len();
        *limits = Self::raise_rlimits(categories as u64)?;
        Self::write_records(&records, header.as_str(), config, destinations)
    }

    fn read_line(reader: &mut BufReader<File>, input: &Path, line_number: usize) -> Result<Option<String>, SplitError> {
        let mut line = String::new();
        let bytes = reader.read_line(&mut line)
            .map_err(|source| SplitError::ReadInput { path: input.to_path_buf(), line: line_number, source })?;
        if bytes == 0 {
            Ok(None)
        } else {
            let stripped = LineEnding::strip(line.as_str()).len();
            line.truncate(stripped);
            Ok(Some(line))
        }
    }

    fn read_records(
        reader: &mut BufReader<File>,
        input: &Path,
        config: &Config,
        report: &mut SplitReport,
    ) -> Result<Vec<LineRecord>, anyhow::Error> {
        let mut records = Vec::new();
        // the header is line 1
        let mut line_number = 1;
        loop {
            line_number += 1;
            let line = match Self::read_line(reader, input, line_number)? {
                None => break,
                Some(line) => line,
            };

            if config.ignore_empty() && line.trim().is_empty() {
                continue;
            }

            if let Some(r) = config.ignore_lines() {
                if r.is_match(line.trim()) {
                    continue;
                }
            }

            match LineRecord::parse(line, line_number, config)? {
                Some(record) => records.push(record),
                None => report.skipped += 1,
            }
        }
        report.records = records.len();
        log::info!("Read {} records, skipped {} lines", report.records, report.skipped);
        Ok(records)
    }

    fn write_records(
        records: &[LineRecord],
        header: &str,
        config: &Config,
        destinations: &mut Destinations,
    ) -> Result<(), anyhow::Error> {
        for record in records {
            log::trace!("Write record, category: {}, key: {}", record.category(), record.key());
            destinations
                .get_or_create(record.category(), header, config)?
                .write_line(record.line())?;
        }
        log::info!("Wrote {} records to {} files", records.len(), destinations.len());
        Ok(())
    }

    fn raise_rlimits(categories: u64) -> Result<Option<(u64, u64)>, anyhow::Error> {
        let (current_soft, current_hard) = Self::get_rlimits()?;
        let needed = categories + RESERVED_FILES;
        if needed <= current_soft {
            return Ok(None);
        }
        log::info!("Current rlimit NOFILE, soft: {}, hard: {}", current_soft, current_hard);
        let new_soft = min(max(needed, current_soft), current_hard);
        if new_soft < needed {
            log::warn!("{} categories may exceed the open files hard limit {}", categories, current_hard);
        }
        log::info!("Set new rlimit NOFILE, soft: {}, hard: {}", new_soft, current_hard);
        Self::set_rlimits(new_soft, current_hard)?;
        Ok(Some((current_soft, current_hard)))
    }

    fn get_rlimits() -> Result<(u64, u64), anyhow::Error> {
        getrlimit(Resource::NOFILE).with_context(|| "getrlimit")
    }

    fn set_rlimits(soft: u64, hard: u64) -> Result<(), anyhow::Error> {
        setrlimit(Resource::NOFILE, soft, hard)
            .with_context(|| format!("set rlimit NOFILE, soft: {}, hard: {}", soft, hard))?;
        Ok(())
    }
}

/// Summary of a completed split run.
#[derive(Clone, Debug, Default)]
pub struct SplitReport {
    header: bool,
    records: usize,
    skipped: usize,
    destinations: Vec<PathBuf>,
    close_failures: usize,
}

impl SplitReport {
    /// Whether the input had a header line. An input without one produces no output.
    pub fn header(&self) -> bool {
        self.header
    }

    /// Number of records written.
    pub fn records(&self) -> usize {
        self.records
    }

    /// Number of lines skipped for having the wrong number of fields or an empty category.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Output files in the order they were created.
    pub fn destinations(&self) -> &Vec<PathBuf> {
        &self.destinations
    }

    /// Number of output files that failed to close. Failures are logged.
    pub fn close_failures(&self) -> usize {
        self.close_failures
    }
}
