use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::SplitError;
use crate::line_ending::LineEnding;

/// An open output file bound to one category.
#[derive(Debug)]
pub(crate) struct Destination {
    path: PathBuf,
    writer: BufWriter<File>,
    line_ending: LineEnding,
    flush_each_record: bool,
    lines: usize,
}

impl Destination {
    fn create(path: PathBuf, header: &str, config: &Config) -> Result<Destination, SplitError> {
        let file = File::create(&path)
            .map_err(|source| SplitError::OpenDestination { path: path.clone(), source })?;
        let mut destination = Destination {
            path,
            writer: BufWriter::new(file),
            line_ending: config.line_ending(),
            flush_each_record: config.flush_each_record(),
            lines: 0,
        };
        destination.write_line(header)?;
        Ok(destination)
    }

    /// Append a line followed by the configured line ending.
    ///
    /// With flush_each_record the buffer is flushed after every line, so the memory held
    /// by the open writers stays bounded no matter how many categories there are.
    pub(crate) fn write_line(&mut self, line: &str) -> Result<(), SplitError> {
        self.writer.write_all(line.as_bytes())
            .and_then(|_| self.writer.write_all(self.line_ending.as_str().as_bytes()))
            .and_then(|_| if self.flush_each_record { self.writer.flush() } else { Ok(()) })
            .map_err(|source| SplitError::WriteDestination { path: self.path.clone(), source })?;
        self.lines += 1;
        Ok(())
    }

    pub(crate) fn path(&self) -> &PathBuf {
        &self.path
    }

    pub(crate) fn lines(&self) -> usize {
        self.lines
    }

    /// Flush the buffer and sync the file to disk, so failures that would otherwise surface
    /// only when the descriptor is dropped are reported.
    fn close(self) -> Result<(), SplitError> {
        let path = self.path;
        let file = self.writer.into_inner()
            .map_err(|e| SplitError::CloseDestination { path: path.clone(), source: e.into_error() })?;
        file.sync_all()
            .map_err(|source| SplitError::CloseDestination { path, source })
    }
}

/// Destinations opened by a run, keyed by category.
///
/// Destinations are created on first use and closed together by [Destinations::close].
/// Anything still open when the registry is dropped is closed then.
#[derive(Debug)]
pub(crate) struct Destinations {
    output_dir: PathBuf,
    destinations: HashMap<String, Destination>,
    order: Vec<String>,
}

impl Destinations {
    pub(crate) fn new(output_dir: &Path) -> Destinations {
        Destinations {
            output_dir: output_dir.to_path_buf(),
            destinations: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Return the destination for `category`, creating it and writing `header` first if
    /// this is the first record of the category.
    pub(crate) fn get_or_create(&mut self, category: &str, header: &str, config: &Config) -> Result<&mut Destination, SplitError> {
        match self.destinations.entry(category.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let path = destination_path(&self.output_dir, category, config)?;
                log::debug!("Create destination, category: {}, path: {}", category, path.display());
                let destination = Destination::create(path, header, config)?;
                self.order.push(category.to_string());
                Ok(entry.insert(destination))
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.destinations.len()
    }

    /// Paths of the destinations in the order they were created.
    pub(crate) fn paths(&self) -> Vec<PathBuf> {
        self.order.iter()
            .filter_map(|category| self.destinations.get(category))
            .map(|destination| destination.path().clone())
            .collect()
    }

    /// Close every open destination exactly once.
    ///
    /// A failure closing one destination does not stop the others from being closed. All
    /// failures are logged and returned.
    pub(crate) fn close(&mut self) -> Vec<SplitError> {
        let mut failures = Vec::new();
        for category in std::mem::take(&mut self.order) {
            if let Some(destination) = self.destinations.remove(&category) {
                let lines = destination.lines();
                let path = destination.path().clone();
                match destination.close() {
                    Ok(()) => {
                        log::debug!("Closed destination, path: {}, lines: {}", path.display(), lines);
                    }
                    Err(e) => {
                        log::error!("{}: {}", e, source_message(&e));
                        failures.push(e);
                    }
                }
            }
        }
        failures
    }
}

impl Drop for Destinations {
    fn drop(&mut self) {
        if !self.destinations.is_empty() {
            self.close();
        }
    }
}

fn destination_path(output_dir: &Path, category: &str, config: &Config) -> Result<PathBuf, SplitError> {
    if category == "." || category == ".." || category.contains(['/', '\\']) {
        return Err(SplitError::InvalidCategory { category: category.to_string() });
    }
    Ok(output_dir.join(format!("{}.{}", category, config.extension())))
}

fn source_message(e: &SplitError) -> String {
    std::error::Error::source(e)
        .map(|source| source.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crate::config::{test_config, Config};
    use crate::destination::Destinations;
    use crate::error::SplitError;
    use crate::line_ending::LineEnding;

    #[test]
    fn test_header_written_once() -> Result<(), anyhow::Error> {
        let dir = tempfile::tempdir()?;
        let config = test_config(dir.path().to_path_buf());
        let mut destinations = Destinations::new(dir.path());
        destinations.get_or_create("A", "dept,id,role,name", &config)?.write_line("A,1,x,n1")?;
        destinations.get_or_create("B", "dept,id,role,name", &config)?.write_line("B,1,x,n2")?;
        destinations.get_or_create("A", "dept,id,role,name", &config)?.write_line("A,2,x,n3")?;
        assert_eq!(destinations.len(), 2);
        assert_eq!(destinations.paths(), vec![dir.path().join("A.csv"), dir.path().join("B.csv")]);
        assert!(destinations.close().is_empty());
        assert_eq!(destinations.len(), 0);

        assert_eq!(fs::read_to_string(dir.path().join("A.csv"))?, "dept,id,role,name\nA,1,x,n1\nA,2,x,n3\n");
        assert_eq!(fs::read_to_string(dir.path().join("B.csv"))?, "dept,id,role,name\nB,1,x,n2\n");
        Ok(())
    }

    #[test]
    fn test_invalid_category() -> Result<(), anyhow::Error> {
        let dir = tempfile::tempdir()?;
        let config = test_config(dir.path().to_path_buf());
        let mut destinations = Destinations::new(dir.path());
        for category in ["..", ".", "a/b", "a\\b", "../escape"] {
            let result = destinations.get_or_create(category, "h", &config);
            assert!(matches!(result, Err(SplitError::InvalidCategory { .. })), "category: {}", category);
        }
        assert_eq!(destinations.len(), 0);
        Ok(())
    }

    #[test]
    fn test_open_failure() -> Result<(), anyhow::Error> {
        let dir = tempfile::tempdir()?;
        let missing = dir.path().join("missing");
        let config = test_config(missing.clone());
        let mut destinations = Destinations::new(&missing);
        let result = destinations.get_or_create("A", "h", &config);
        assert!(matches!(result, Err(SplitError::OpenDestination { .. })));
        assert_eq!(destinations.len(), 0);
        Ok(())
    }

    #[test]
    fn test_drop_closes() -> Result<(), anyhow::Error> {
        let dir = tempfile::tempdir()?;
        let config = Config::new(
            dir.path().to_path_buf(), ',', 4, 1, 2, "csv".to_string(), LineEnding::Lf, false, None, false,
        )?;
        {
            let mut destinations = Destinations::new(dir.path());
            destinations.get_or_create("A", "h", &config)?.write_line("A,1,x,y")?;
        }
        assert_eq!(fs::read_to_string(dir.path().join("A.csv"))?, "h\nA,1,x,y\n");
        Ok(())
    }
}
