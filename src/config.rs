use std::path::PathBuf;

use regex::Regex;

use crate::error::SplitError;
use crate::line_ending::LineEnding;

#[derive(Clone, Debug)]
pub(crate) struct Config {
    output_dir: PathBuf,
    field_separator: char,
    columns: usize,
    category_field: usize,
    key_field: usize,
    extension: String,
    line_ending: LineEnding,
    ignore_empty: bool,
    ignore_lines: Option<Regex>,
    flush_each_record: bool,
}

impl Config {
    pub(crate) fn new(
        output_dir: PathBuf,
        field_separator: char,
        columns: usize,
        category_field: usize,
        key_field: usize,
        extension: String,
        line_ending: LineEnding,
        ignore_empty: bool,
        ignore_lines: Option<Regex>,
        flush_each_record: bool,
    ) -> Result<Config, SplitError> {
        if columns == 0 {
            return Err(SplitError::InvalidConfig {
                message: "the number of columns must be greater than 0".to_string(),
            });
        }
        for (name, index) in [("category", category_field), ("key", key_field)] {
            if index == 0 || index > columns {
                return Err(SplitError::InvalidConfig {
                    message: format!("{name} field {index} is out of range 1..={columns}"),
                });
            }
        }
        if category_field == key_field {
            return Err(SplitError::InvalidConfig {
                message: format!("category and key fields must differ, both are {key_field}"),
            });
        }

        Ok(
            Config {
                output_dir,
                field_separator,
                columns,
                category_field,
                key_field,
                extension,
                line_ending,
                ignore_empty,
                ignore_lines,
                flush_each_record,
            }
        )
    }

    pub(crate) fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }

    pub(crate) fn field_separator(&self) -> char {
        self.field_separator
    }

    pub(crate) fn columns(&self) -> usize {
        self.columns
    }

    pub(crate) fn category_field(&self) -> usize {
        self.category_field
    }

    pub(crate) fn key_field(&self) -> usize {
        self.key_field
    }

    pub(crate) fn extension(&self) -> &String {
        &self.extension
    }

    pub(crate) fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub(crate) fn ignore_empty(&self) -> bool {
        self.ignore_empty
    }

    pub(crate) fn ignore_lines(&self) -> &Option<Regex> {
        &self.ignore_lines
    }

    pub(crate) fn flush_each_record(&self) -> bool {
        self.flush_each_record
    }
}

#[cfg(test)]
pub(crate) fn test_config(output_dir: PathBuf) -> Config {
    Config::new(output_dir, ',', 4, 1, 2, "csv".to_string(), LineEnding::Lf, false, None, true)
        .expect("default config is valid")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::config::Config;
    use crate::error::SplitError;
    use crate::line_ending::LineEnding;

    fn config(columns: usize, category_field: usize, key_field: usize) -> Result<Config, SplitError> {
        Config::new(
            PathBuf::from("post"),
            ',',
            columns,
            category_field,
            key_field,
            "csv".to_string(),
            LineEnding::Lf,
            false,
            None,
            true,
        )
    }

    #[test]
    fn test_valid_config() {
        let config = config(4, 1, 2).unwrap();
        assert_eq!(config.columns(), 4);
        assert_eq!(config.category_field(), 1);
        assert_eq!(config.key_field(), 2);
        assert_eq!(config.field_separator(), ',');
    }

    #[test]
    fn test_field_out_of_range() {
        assert!(matches!(config(4, 0, 2), Err(SplitError::InvalidConfig { .. })));
        assert!(matches!(config(4, 1, 5), Err(SplitError::InvalidConfig { .. })));
        assert!(matches!(config(0, 1, 2), Err(SplitError::InvalidConfig { .. })));
    }

    #[test]
    fn test_same_field() {
        assert!(matches!(config(4, 2, 2), Err(SplitError::InvalidConfig { .. })));
    }
}
