use std::cmp::Ordering;

use crate::config::Config;
use crate::error::SplitError;

/// One accepted data row: the category it is routed by, the key it is ordered by, and the
/// line itself, kept verbatim for output.
#[derive(Debug)]
pub(crate) struct LineRecord {
    category: String,
    key: i64,
    line: String,
}

impl LineRecord {
    /// Parse a line, without its terminator.
    ///
    /// Trailing empty fields are not counted, `A,1,x,y,` has 4 columns and `A,1,x,` has 3.
    /// Returns `Ok(None)` for a line that must be skipped: wrong number of columns or an
    /// empty category. A key that is not an integer fails the run, records without a key
    /// cannot be placed in the output order.
    pub(crate) fn parse(line: String, line_number: usize, config: &Config) -> Result<Option<LineRecord>, SplitError> {
        let mut parts: Vec<&str> = line.split(config.field_separator()).collect();
        while parts.last().map_or(false, |part| part.is_empty()) {
            parts.pop();
        }
        if parts.len() != config.columns() {
            log::trace!("Skip line {}, {} columns instead of {}", line_number, parts.len(), config.columns());
            return Ok(None);
        }

        let category = parts[config.category_field() - 1].trim();
        if category.is_empty() {
            log::trace!("Skip line {}, empty category", line_number);
            return Ok(None);
        }

        let value = parts[config.key_field() - 1].trim();
        let key = value.parse::<i64>()
            .map_err(|source| SplitError::KeyParse {
                line: line_number,
                value: value.to_string(),
                source,
            })?;

        let category = category.to_string();
        Ok(
            Some(
                LineRecord {
                    category,
                    key,
                    line,
                }
            )
        )
    }

    pub(crate) fn category(&self) -> &str {
        self.category.as_str()
    }

    pub(crate) fn key(&self) -> i64 {
        self.key
    }

    pub(crate) fn line(&self) -> &str {
        self.line.as_str()
    }
}

impl Eq for LineRecord {}

impl PartialEq<Self> for LineRecord {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl PartialOrd<Self> for LineRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// records compare by key only, ties keep input order under a stable sort
impl Ord for LineRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}
